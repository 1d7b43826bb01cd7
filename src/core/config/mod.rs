pub mod data;
pub mod io;
pub mod theme_store;

pub use data::{path_display, Config, SpeechConfig, ThemeMode};
pub use io::ConfigError;
pub use theme_store::ThemeStore;
