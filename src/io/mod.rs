pub mod config_io;
pub mod lock;
pub mod recovery;
pub mod store;
pub mod sync;
pub mod watcher;

pub use store::{JsonFileStore, MemoryStore, Store, StoreError};
pub use sync::{LoadSource, Loaded, SyncCoordinator, SyncError};
