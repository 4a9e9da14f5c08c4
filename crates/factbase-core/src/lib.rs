#![deny(warnings)]
#![allow(missing_docs)]
//! Core functionality for the factbase tuple store.
//!
//! This crate provides an embeddable in-memory store of fixed-arity tuples
//! ("facts") over a named schema: set-semantics assertion with multi-column
//! index intersection for duplicate detection, stable identifiers with
//! permanent tombstones, and a linear scan/sample pipeline driven by an
//! externally supplied boolean predicate.

/// Typed error surface for store and retrieval operations
pub mod error;
/// Indexed fact storage with stable identifiers
pub mod fact_store;
/// Predicate-driven scanning and sampling over live facts
pub mod retrieval;
/// Field-name schemas fixed at store creation
pub mod schema;
/// Snapshot export/import for fact bases
pub mod serialization;
/// Core types for facts and identifiers
pub mod types;

// Re-export the public surface for downstream crates
pub use error::{FactBaseError, FactBaseResult, InvalidIdKind};
pub use fact_store::FactBase;
pub use retrieval::{FnPredicate, Predicate, Retrieval, boolean_predicate};
pub use schema::Schema;
pub use serialization::{Snapshot, deserialize_factbase, serialize_factbase};
pub use types::{Fact, FactId, FactValue};
