//! Indexed fact storage with stable identifiers
//!
//! A `FactBase` can be thought of as a table with named columns ("fields")
//! where each row is an entry ("fact"). Facts are tuples of opaque values,
//! one per field, in schema order. Duplicate facts are not allowed: asserting
//! a tuple identical to an existing fact returns the existing id unchanged.
//!
//! Each fact is assigned an id at insertion, strictly increasing from 0.
//! Retracting a fact tombstones its id permanently; the log slot is never
//! removed or renumbered, so ids of other facts are unaffected.

use crate::error::{FactBaseError, FactBaseResult};
use crate::schema::Schema;
use crate::types::{Fact, FactId, FactValue};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, instrument, trace};

/// In-memory set of fixed-arity tuples with exact-match indexing.
///
/// # Architecture
/// - **Per-field indices**: one insertion-ordered map per field position,
///   from value to the ids of live facts holding that value there. Used only
///   for exact-match duplicate detection, never for predicate retrieval.
/// - **Fact log**: every fact ever asserted, indexed by id; a retracted slot
///   holds `None` and is never reused.
/// - **Tombstones**: ids invalidated by retraction.
///
/// The store assumes exclusive, sequential access per instance. Callers that
/// need concurrent writers must add their own mutual exclusion around the
/// whole store; partial updates would break the index/log invariants.
#[derive(Debug, Clone)]
pub struct FactBase {
    schema: Schema,
    /// One inverted index per field position: value -> ids of live facts
    indices: Vec<IndexMap<FactValue, Vec<FactId>>>,
    /// Every fact ever asserted, indexed by id; `None` marks a tombstone
    log: Vec<Option<Fact>>,
    /// Ids invalidated by retraction
    tombstones: HashSet<FactId>,
    /// The next id to assign
    next_id: FactId,
}

impl FactBase {
    /// Create an empty fact base with the given field names. An empty list
    /// falls back to the single default field `"unnamed"`.
    pub fn new(fields: &[&str]) -> Self {
        Self::with_schema(Schema::new(fields))
    }

    /// Create an empty fact base over an existing schema.
    pub fn with_schema(schema: Schema) -> Self {
        let indices = (0..schema.arity()).map(|_| IndexMap::new()).collect();
        Self {
            schema,
            indices,
            log: Vec::new(),
            tombstones: HashSet::new(),
            next_id: 0,
        }
    }

    /// The schema this store was created with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The field names in schema order.
    pub fn field_names(&self) -> &[String] {
        self.schema.field_names()
    }

    /// Number of fields per fact.
    pub fn arity(&self) -> usize {
        self.schema.arity()
    }

    /// Position of the given field name, or `None` if it is not a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.schema.field_index(name)
    }

    /// Number of live (non-retracted) facts.
    pub fn len(&self) -> usize {
        self.log.len() - self.tombstones.len()
    }

    /// True if the store holds no live facts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id the next asserted fact will receive. All ids ever assigned lie
    /// in `[0, next_fact_id)`.
    pub fn next_fact_id(&self) -> FactId {
        self.next_id
    }

    /// True if the given id belonged to a fact that has been retracted.
    pub fn is_retracted(&self, id: FactId) -> bool {
        self.tombstones.contains(&id)
    }

    fn check_arity(&self, fact: &[FactValue]) -> FactBaseResult<()> {
        if fact.len() != self.arity() {
            return Err(FactBaseError::arity_mismatch(self.arity(), fact.len()));
        }
        Ok(())
    }

    /// Check whether the given tuple is contained in this fact base and
    /// return its id if so.
    ///
    /// Intersects the id sets of all per-field indices, narrowing left to
    /// right with early exit once the candidate set is empty. A final set
    /// with more than one element means the indices have lost the set
    /// property and is reported as `IndexCorruption`.
    pub fn contains_fact(&self, fact: &[FactValue]) -> FactBaseResult<Option<FactId>> {
        self.check_arity(fact)?;
        // An empty first index means the store is empty
        if self.indices[0].is_empty() {
            return Ok(None);
        }
        let mut candidates: Vec<FactId> = match self.indices[0].get(&fact[0]) {
            Some(ids) => ids.clone(),
            None => return Ok(None),
        };
        for (index, value) in self.indices.iter().zip(fact).skip(1) {
            if candidates.is_empty() {
                break;
            }
            match index.get(value) {
                Some(ids) => candidates.retain(|id| ids.contains(id)),
                None => candidates.clear(),
            }
        }
        trace!(survivors = candidates.len(), "index intersection complete");
        match candidates.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(FactBaseError::index_corruption(format!(
                "found {} facts with identical values, expected at most one",
                candidates.len()
            ))),
        }
    }

    /// Assert the given fact. If an identical fact already exists its id is
    /// returned unchanged and nothing else happens.
    ///
    /// The stored tuple is a copy taken at the ownership boundary, so later
    /// mutation of the caller's values cannot reach the store.
    #[instrument(skip(self, fact))]
    pub fn assert_fact(&mut self, fact: &[FactValue]) -> FactBaseResult<FactId> {
        self.check_arity(fact)?;
        if let Some(existing) = self.contains_fact(fact)? {
            trace!(fact_id = existing, "fact already present, assert is a no-op");
            return Ok(existing);
        }
        let id = self.next_id;
        for (index, value) in self.indices.iter_mut().zip(fact) {
            index.entry(value.clone()).or_default().push(id);
        }
        self.log.push(Some(fact.to_vec()));
        self.next_id += 1;
        debug!(fact_id = id, "asserted new fact");
        Ok(id)
    }

    /// Assert a sequence of facts, returning the id each one resolved to.
    /// Duplicates within the sequence collapse onto the first occurrence's id.
    #[instrument(skip(self, facts))]
    pub fn assert_all<'a, I>(&mut self, facts: I) -> FactBaseResult<Vec<FactId>>
    where
        I: IntoIterator<Item = &'a [FactValue]>,
    {
        let mut ids = Vec::new();
        for fact in facts {
            ids.push(self.assert_fact(fact)?);
        }
        debug!(fact_count = ids.len(), "bulk assert complete");
        Ok(ids)
    }

    /// Retract the given fact. If it is not contained in the store, nothing
    /// happens. Retraction removes the fact's id from every per-field index
    /// (dropping value entries that become empty), tombstones its log slot,
    /// and never renumbers any other id.
    #[instrument(skip(self, fact))]
    pub fn retract_fact(&mut self, fact: &[FactValue]) -> FactBaseResult<()> {
        self.check_arity(fact)?;
        let Some(id) = self.contains_fact(fact)? else {
            trace!("fact not present, retract is a no-op");
            return Ok(());
        };
        for (index, value) in self.indices.iter_mut().zip(fact) {
            if let Some(ids) = index.get_mut(value) {
                ids.retain(|&i| i != id);
                if ids.is_empty() {
                    // shift_remove keeps the remaining entries in insertion order
                    index.shift_remove(value);
                }
            }
        }
        self.log[id as usize] = None;
        self.tombstones.insert(id);
        debug!(fact_id = id, "retracted fact");
        Ok(())
    }

    /// Retract each of the given facts in sequence. Absent facts are skipped
    /// as usual.
    #[instrument(skip(self, facts))]
    pub fn retract_all_of<'a, I>(&mut self, facts: I) -> FactBaseResult<()>
    where
        I: IntoIterator<Item = &'a [FactValue]>,
    {
        for fact in facts {
            self.retract_fact(fact)?;
        }
        Ok(())
    }

    /// Retrieve the fact with the given id as a fresh copy.
    ///
    /// Fails with `InvalidId` if the id was never assigned or points at a
    /// retracted fact.
    pub fn retrieve_fact(&self, id: FactId) -> FactBaseResult<Fact> {
        if id >= self.next_id {
            return Err(FactBaseError::id_out_of_range(id));
        }
        if self.tombstones.contains(&id) {
            return Err(FactBaseError::id_retracted(id));
        }
        match &self.log[id as usize] {
            Some(fact) => Ok(fact.clone()),
            // A live id must have a live log slot; anything else means the
            // log and the tombstone set have diverged.
            None => Err(FactBaseError::index_corruption(format!(
                "log slot {id} is empty but the id is not tombstoned"
            ))),
        }
    }

    /// Iterate over the live facts in id order, tombstones skipped.
    pub fn live_facts(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.log
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|fact| (id as FactId, fact)))
    }
}

impl Default for FactBase {
    fn default() -> Self {
        Self::with_schema(Schema::default())
    }
}

/// Structural equality: same schema (field names compared case-insensitively,
/// in order) and the same set of live tuples. Id values are not compared, so
/// two stores with different retraction histories can still be equal.
impl PartialEq for FactBase {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if !self.schema.same_structure(&other.schema) {
            return false;
        }
        // Equal cardinality plus one-way containment gives set equality,
        // since neither store holds duplicates. An internal fault during
        // lookup counts as inequality.
        self.live_facts()
            .all(|(_, fact)| matches!(other.contains_fact(fact), Ok(Some(_))))
    }
}

impl fmt::Display for FactBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "factbase (")?;
        for name in self.field_names() {
            write!(f, " <{name}> ")?;
        }
        write!(f, ")")?;
        write!(f, "\n---------------------------------------------------------")?;
        for (id, fact) in self.live_facts() {
            write!(f, "\n{id}: ( ")?;
            for value in fact {
                write!(f, "{value} ")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_store() -> FactBase {
        let mut store = FactBase::new(&["name", "is-male", "type"]);
        store
            .assert_fact(&["Boris".into(), true.into(), "cat".into()])
            .unwrap();
        store
            .assert_fact(&["Felix".into(), true.into(), "cat".into()])
            .unwrap();
        store
            .assert_fact(&["Kitty".into(), false.into(), "guinea pig".into()])
            .unwrap();
        store
    }

    #[test]
    fn default_store_has_one_unnamed_field() {
        let store = FactBase::default();
        assert_eq!(store.arity(), 1);
        assert_eq!(store.field_index("unnamed"), Some(0));
        assert!(store.is_empty());
    }

    #[test]
    fn assert_assigns_sequential_ids() {
        let store = pet_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.next_fact_id(), 3);
        assert_eq!(
            store
                .contains_fact(&["Boris".into(), true.into(), "cat".into()])
                .unwrap(),
            Some(0)
        );
        assert_eq!(
            store
                .contains_fact(&["Kitty".into(), false.into(), "guinea pig".into()])
                .unwrap(),
            Some(2)
        );
    }

    #[test]
    fn assert_of_duplicate_is_a_no_op() {
        let mut store = pet_store();
        let id = store
            .assert_fact(&["Felix".into(), true.into(), "cat".into()])
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(store.next_fact_id(), 3);
    }

    #[test]
    fn arity_is_checked_on_every_tuple_operation() {
        let mut store = pet_store();
        let short: Fact = vec!["Boris".into(), true.into()];
        assert_eq!(
            store.assert_fact(&short),
            Err(FactBaseError::arity_mismatch(3, 2))
        );
        assert_eq!(
            store.retract_fact(&short),
            Err(FactBaseError::arity_mismatch(3, 2))
        );
        assert_eq!(
            store.contains_fact(&short),
            Err(FactBaseError::arity_mismatch(3, 2))
        );
    }

    #[test]
    fn retract_leaves_a_permanent_gap() {
        let mut store = pet_store();
        let felix: Fact = vec!["Felix".into(), true.into(), "cat".into()];
        store.retract_fact(&felix).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.is_retracted(1));
        assert_eq!(store.retrieve_fact(1), Err(FactBaseError::id_retracted(1)));
        assert_eq!(store.contains_fact(&felix).unwrap(), None);

        // Re-asserting the identical tuple creates a brand-new, larger id
        let id = store.assert_fact(&felix).unwrap();
        assert_eq!(id, 3);
        assert_eq!(store.len(), 3);
        // Id 1 stays dead forever
        assert!(store.is_retracted(1));
    }

    #[test]
    fn retract_of_absent_fact_is_a_no_op() {
        let mut store = pet_store();
        store
            .retract_fact(&["Rex".into(), true.into(), "dog".into()])
            .unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn retract_drops_emptied_index_entries() {
        let mut store = pet_store();
        store
            .retract_fact(&["Kitty".into(), false.into(), "guinea pig".into()])
            .unwrap();
        // "guinea pig" was the only fact with that type; a fresh assert of a
        // different guinea pig must not see stale index entries
        assert_eq!(
            store
                .contains_fact(&["Snowball".into(), false.into(), "guinea pig".into()])
                .unwrap(),
            None
        );
    }

    #[test]
    fn retrieve_returns_a_defensive_copy() {
        let store = pet_store();
        let mut fact = store.retrieve_fact(0).unwrap();
        fact[0] = "Mangled".into();
        assert_eq!(
            store.retrieve_fact(0).unwrap(),
            vec![
                FactValue::from("Boris"),
                FactValue::from(true),
                FactValue::from("cat")
            ]
        );
    }

    #[test]
    fn retrieve_rejects_unassigned_ids() {
        let store = pet_store();
        assert_eq!(
            store.retrieve_fact(99),
            Err(FactBaseError::id_out_of_range(99))
        );
    }

    #[test]
    fn assert_all_collapses_duplicates() {
        let mut store = FactBase::new(&["x", "y"]);
        let a: Fact = vec![1i64.into(), 2i64.into()];
        let b: Fact = vec![3i64.into(), 4i64.into()];
        let ids = store
            .assert_all([a.as_slice(), b.as_slice(), a.as_slice()])
            .unwrap();
        assert_eq!(ids, vec![0, 1, 0]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn structural_equality_ignores_ids_and_name_case() {
        let mut left = pet_store();
        let mut right = FactBase::new(&["NAME", "IS-MALE", "TYPE"]);
        // Insert in a different order, with a retraction in between, so the
        // ids differ between the two stores
        right
            .assert_fact(&["Kitty".into(), false.into(), "guinea pig".into()])
            .unwrap();
        right
            .assert_fact(&["Mieze".into(), false.into(), "cat".into()])
            .unwrap();
        right
            .retract_fact(&["Mieze".into(), false.into(), "cat".into()])
            .unwrap();
        right
            .assert_fact(&["Boris".into(), true.into(), "cat".into()])
            .unwrap();
        right
            .assert_fact(&["Felix".into(), true.into(), "cat".into()])
            .unwrap();

        assert_eq!(left, right);

        left.retract_fact(&["Boris".into(), true.into(), "cat".into()])
            .unwrap();
        assert_ne!(left, right);
    }

    #[test]
    fn display_lists_live_facts_in_id_order() {
        let mut store = pet_store();
        store
            .retract_fact(&["Felix".into(), true.into(), "cat".into()])
            .unwrap();
        let dump = store.to_string();
        assert!(dump.starts_with("factbase ( <name>  <is-male>  <type> )"));
        assert!(dump.contains("0: ( Boris true cat )"));
        assert!(!dump.contains("1: "));
        assert!(dump.contains("2: ( Kitty false guinea pig )"));
    }
}
