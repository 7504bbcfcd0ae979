//! Core application infrastructure
//!
//! - `cli` - Command-line argument parsing
//! - `config` - Layered configuration (defaults, file, CLI/env)
//! - `constants` - Application-wide constants
//! - `shutdown` - Graceful shutdown coordination

pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;

pub use crate::app::CoreApp;
pub use cli::CliConfig;
pub use config::AppConfig;
pub use shutdown::ShutdownService;
