//! Snapshot export/import for fact bases
//!
//! A snapshot is the portable form of a fact base: the field names followed
//! by the live facts in their original assertion order. Importing replays the
//! facts through `assert_fact`, so duplicates collapse and fresh ids are
//! assigned; the reconstructed store is structurally equal to the source but
//! carries no tombstone history.

use crate::error::{FactBaseError, FactBaseResult};
use crate::fact_store::FactBase;
use crate::types::Fact;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Portable representation of a fact base: schema first, then the live facts
/// in assertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// The field names in schema order.
    pub field_names: Vec<String>,
    /// The live facts in original assertion order, tombstones skipped.
    pub facts: Vec<Fact>,
}

impl FactBase {
    /// Export this fact base as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            field_names: self.field_names().to_vec(),
            facts: self.live_facts().map(|(_, fact)| fact.clone()).collect(),
        }
    }

    /// Reconstruct a fact base from a snapshot by asserting each fact in
    /// sequence. Fails with `ArityMismatch` when a fact does not fit the
    /// snapshot's schema.
    pub fn from_snapshot(snapshot: &Snapshot) -> FactBaseResult<Self> {
        let mut store = Self::with_schema(crate::schema::Schema::from_names(
            snapshot.field_names.clone(),
        ));
        for fact in &snapshot.facts {
            store.assert_fact(fact)?;
        }
        debug!(fact_count = store.len(), "fact base restored from snapshot");
        Ok(store)
    }
}

/// Serialize a fact base to a JSON snapshot string.
pub fn serialize_factbase(store: &FactBase) -> FactBaseResult<String> {
    serde_json::to_string(&store.snapshot())
        .map_err(|e| FactBaseError::serialization(e.to_string()))
}

/// Reconstruct a fact base from a JSON snapshot string.
pub fn deserialize_factbase(json: &str) -> FactBaseResult<FactBase> {
    let snapshot: Snapshot =
        serde_json::from_str(json).map_err(|e| FactBaseError::serialization(e.to_string()))?;
    FactBase::from_snapshot(&snapshot)
}
