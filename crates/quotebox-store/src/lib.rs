// SQLite-backed key-value store
// Holds everything that has to outlive a single session

pub mod store;

pub use store::{KvStore, StoreError};
