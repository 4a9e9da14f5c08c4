//! Factbase Types
//!
//! This crate defines the value model shared across the factbase ecosystem
//! (currently `factbase-core` and `factbase-prelude`). It provides the
//! `FactValue` enum that fact tuples are built from, keeping the value model
//! free of any storage or retrieval dependencies.

#![deny(warnings)]
#![deny(missing_docs)]

// Re-export types
mod types;
pub use types::FactValue;
