//! URL helpers for building Gemini endpoint addresses.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use chatline::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Address of the `generateContent` method for `model`.
///
/// Accepts model names with or without the `models/` prefix the API uses in
/// its own listings.
///
/// ```
/// use chatline::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://example.test/v1beta", "gemini-2.0-flash"),
///     "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches('/');
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}/models/{}:generateContent",
        normalize_base_url(base_url),
        model
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(normalize_base_url("https://a.test/v1///"), "https://a.test/v1");
        assert_eq!(normalize_base_url("https://a.test"), "https://a.test");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn model_prefix_is_not_doubled() {
        assert_eq!(
            generate_content_url("https://a.test/v1beta/", "models/gemini-pro"),
            "https://a.test/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            generate_content_url("https://a.test/v1beta", " /gemini-pro "),
            "https://a.test/v1beta/models/gemini-pro:generateContent"
        );
    }
}
