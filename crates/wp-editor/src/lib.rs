pub mod config;
pub mod engine;
pub mod history;
pub mod persist;
pub mod store;

pub use config::EngineConfig;
pub use engine::SceneEngine;
pub use history::{EditKind, History};
pub use persist::{DEFAULT_KEY, PersistError, Persistence};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
