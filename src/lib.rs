//! Changeling - autonomous list extraction and reconciliation.
//!
//! Changeling drives an externally-owned messaging UI through a fixed
//! protocol, extracts list-style membership data from its noisy tree,
//! resolves identities against a contact directory, and reconciles the
//! extracted lists into a common-members aggregate.
//!
//! # Architecture
//!
//! The crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, ports, and the error taxonomy
//! - **Service Layer** (`services`): the extraction state machine and the
//!   heuristics it sequences
//! - **Infrastructure Layer** (`infrastructure`): config loading and
//!   concrete port adapters
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use changeling::services::ExtractionEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = Arc::new(ExtractionEngine::new(driver, directory, sync, config));
//!     engine.start()?;
//!     engine.join().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainResult, ExtractionError};
pub use domain::models::{
    Config, DirectoryEntry, Member, MemberList, ProgressUpdate, RunState, Session, UiNode,
    UiSnapshot,
};
pub use domain::ports::{
    DirectoryProvider, NullDirectory, RunObserver, SyncClient, SyncPayload, UiDriver,
};
pub use infrastructure::{ConfigError, ConfigLoader, HttpSyncClient, JsonDirectory, UiScript};
pub use services::{ExtractionEngine, IdentityResolver, ListStore};
