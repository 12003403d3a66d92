pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{notifier_for, ConsoleNotifier, LocalStorage, SmtpNotifier, UberDirectClient};
pub use config::{ConfigOverrides, MonitorConfig, TomlConfig};
pub use crate::core::engine::{MonitorEngine, RunSummary};
pub use domain::stores::StoreDirectory;
pub use utils::error::{MonitorError, Result};

#[cfg(feature = "cli")]
pub use config::CliArgs;
