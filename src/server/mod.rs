//! Server module for Strikebot
//!
//! This module contains bot initialization and runtime logic.

mod config;
mod init;
mod loader;
mod validation;

pub use config::AppConfig;
pub use init::run;
pub use loader::load_config;
pub use validation::{config_warnings, validate_config};
