//! Infrastructure layer: concrete adapters behind the domain ports.

pub mod config;
pub mod http_sync;
pub mod json_directory;
pub mod scripted_ui;

pub use config::{ConfigError, ConfigLoader};
pub use http_sync::HttpSyncClient;
pub use json_directory::JsonDirectory;
pub use scripted_ui::{ScriptScreen, ScriptedUiDriver, TapRule, UiScript};
