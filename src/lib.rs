//! Chatline is a full-screen terminal chat client for Google's Gemini models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation store, the response client, the speech
//!   bridge, configuration, and the action/command state machine.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that turns key presses and background results into actions.
//! - [`api`] defines the `generateContent` request and response payloads.
//! - [`auth`] resolves the API key from the environment or the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
