// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod http;
pub mod mail;
pub mod storage;

pub use http::UberDirectClient;
pub use mail::{notifier_for, ConsoleNotifier, SmtpNotifier};
pub use storage::LocalStorage;
