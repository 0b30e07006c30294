//! Storage module for persisted application state
//!
//! Provides a JSON key-value store with file-backed and in-memory
//! implementations.

mod kv_store;

pub use kv_store::{
    read_json, write_json, FileKvStore, KeyValueStore, MemoryKvStore, StorageError,
};
