//! Cleanup applied to raw speech-recognition transcripts before they land in
//! the draft input.

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Trims the transcript, capitalizes its first character and makes sure it
/// ends with sentence punctuation. Blank input yields an empty string.
pub fn format_transcript(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut formatted: String = first.to_uppercase().chain(chars).collect();
    if !formatted.ends_with(TERMINAL_PUNCTUATION) {
        formatted.push('.');
    }
    formatted
}
