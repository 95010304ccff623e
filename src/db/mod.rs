//! Persistence medium: a small key-value store holding serialized workouts.
//!
//! The whole workout list lives under one logical key, mirroring browser
//! local storage.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key used for the workout list unless configured otherwise.
pub const DEFAULT_WORKOUTS_KEY: &str = "workouts";

/// Key-value storage for serialized application data.
pub trait KeyValueStore: Send {
    /// Read the value stored at `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value stored at `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// Errors from reading or writing persisted workouts.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("No saved workouts")]
    Absent,

    #[error("Saved workouts are malformed: {0}")]
    Malformed(String),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("Storage error: {0}")]
    Storage(String),
}
