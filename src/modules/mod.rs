//! Modules layer - Infrastructure components for persistence
//!
//! Contains adapters for the stores the features read and write.

pub mod storage;
