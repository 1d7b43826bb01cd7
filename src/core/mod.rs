pub mod app;
pub mod config;
pub mod message;
pub mod response_client;
pub mod session;
pub mod speech;
pub mod transcript;
