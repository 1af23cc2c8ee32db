//! Ports - async trait seams to everything the engine does not own.

pub mod directory;
pub mod null_directory;
pub mod observer;
pub mod sync;
pub mod ui_driver;

pub use directory::DirectoryProvider;
pub use null_directory::NullDirectory;
pub use observer::RunObserver;
pub use sync::{SyncClient, SyncPayload};
pub use ui_driver::UiDriver;
