//! Factbase Prelude
//!
//! This crate re-exports the most frequently used public items from the
//! factbase ecosystem (currently `factbase-core` and `factbase-types`).
//! Down-stream applications can depend on `factbase-prelude` to avoid long
//! import lists and to stay insulated from internal module reshuffles.

#![deny(warnings)]
#![deny(missing_docs)]

// Re-export the value model -------------------------------------------------------------------

pub use factbase_types::FactValue;

// Re-export store & type system ---------------------------------------------------------------

pub use factbase_core::{
    // Fundamental data types
    Fact, FactId, Schema,
    // The store itself
    FactBase,
    // Predicate retrieval
    FnPredicate, Predicate, Retrieval, boolean_predicate,
    // Errors
    FactBaseError, FactBaseResult, InvalidIdKind,
    // Snapshots
    Snapshot, deserialize_factbase, serialize_factbase,
};

// When new crates expose stable public APIs, add re-exports here in a backwards-compatible
// manner.
