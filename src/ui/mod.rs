//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that turns key presses into
//!   [`crate::core::app::AppAction`]s and runs the resulting background work.
//! - [`renderer`], [`chat_view`] and [`history_panel`]: frame composition.
//! - [`theme`]: light and dark color policy.
//!
//! This layer only presents and captures interaction state; conversation
//! rules live in [`crate::core`].

pub mod chat_loop;
pub mod chat_view;
pub mod history_panel;
pub mod renderer;
pub mod theme;
