//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::auth::AuthManager;
use crate::cli::say::run_say;
use crate::cli::settings::{set_value, unset_value};
use crate::core::config::{path_display, Config};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", ",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "chatline", version, long_version = LONG_VERSION)]
#[command(about = "A full-screen terminal chat client for Gemini")]
#[command(
    long_about = "Chatline is a full-screen terminal chat interface for Google's Gemini models. \
Each message is sent as a single prompt and the reply is shown in the transcript. \
Earlier conversations stay in the sidebar for the rest of the session.\n\n\
Authentication:\n\
  Use 'chatline auth' to store your Gemini API key in the system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY        API key (takes precedence over the keyring)\n\
  CHATLINE_LOG          Log filter for --log output (default: info)\n\
  CHATLINE_SPEECH_LANG  Language passed to speech commands (set from config)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/PgUp/PgDn Scroll through the conversation\n\
  Ctrl+N            Start a new chat (saves the current one)\n\
  Ctrl+B            Show or hide the history sidebar\n\
  Ctrl+T            Switch between dark and light themes\n\
  Ctrl+R            Dictate a message (needs speech.listen_command)\n\
  Ctrl+P            Read the last reply aloud (needs speech.speak_command)\n\
  Esc / Ctrl+C      Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this session (overrides the configured model)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Only read the API key from GEMINI_API_KEY; never touch the keyring
    #[arg(long, global = true)]
    pub env: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the reply without starting the UI
    Say {
        /// Prompt text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Set a configuration value, or show all values when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Err(err) = init_logging(args.log.as_deref()) {
        eprintln!("❌ Cannot open log file: {err}");
        std::process::exit(1);
    }

    let auth_manager = if args.env {
        AuthManager::env_only()
    } else {
        AuthManager::new()
    };

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            if let Err(e) = AuthManager::new().interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = AuthManager::new().interactive_deauth() {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                println!();
                println!("Config file: {}", path_display(Config::config_path()?));
                return Ok(());
            };
            match set_value(&mut config, &key, &value) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match unset_value(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Say { prompt } => run_say(prompt, args.model, &auth_manager).await,
        Commands::Chat => run_chat(args.model, &auth_manager).await,
    }
}
