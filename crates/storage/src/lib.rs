#![forbid(unsafe_code)]

//! Durable local key-value storage for the course catalog, enrollment set,
//! watched-lesson ledger and lesson notes.

pub mod keys;
pub mod repository;
pub mod sqlite;

pub use keys::StoreKey;
pub use repository::{KeyValueStore, Storage, StorageError};
