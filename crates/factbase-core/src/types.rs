//! Core types for the factbase store.

pub use factbase_types::FactValue;

/// Unique identifier assigned to an asserted fact.
///
/// Ids are assigned strictly increasing from 0 and are never reused.
/// Retracting a fact invalidates its id permanently; re-asserting an
/// identical tuple afterwards produces a brand-new, larger id.
pub type FactId = u64;

/// A fact is an ordered tuple of values, one per schema field, in schema order.
pub type Fact = Vec<FactValue>;
