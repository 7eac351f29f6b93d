//! Terminal front end for the Blog-to-PDF backend.
pub mod cli;
pub mod config;
pub mod platform;

pub use cli::Cli;
pub use config::{AppConfig, ConfigError};
