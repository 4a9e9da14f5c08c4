//! Predicate-driven retrieval from a fact base
//!
//! Retrieval is a linear scan: every live fact is projected onto the bound
//! input fields and handed to an externally supplied predicate. The store's
//! indices are never consulted here; predicates are opaque callbacks, so the
//! only available strategy is O(live facts) predicate invocations. This is
//! the deliberate trade-off of the store: cheap exact-match duplicate
//! detection, linear-cost arbitrary querying.

use crate::error::{FactBaseError, FactBaseResult};
use crate::fact_store::FactBase;
use crate::types::{Fact, FactValue};
use rand::Rng;
use tracing::{debug, instrument, trace};

/// A retrieval condition supplied by the host.
///
/// The predicate declares how many positional arguments it accepts; the
/// declared arity is validated against the bound input fields when a
/// [`Retrieval`] is constructed. `invoke` receives the projected field values
/// in binding order and reports an arbitrary value: only `Boolean(true)`
/// counts as a match, anything else (including `Null`) is a non-match.
///
/// Predicates must not mutate the fact base they are scanned against; the
/// scan holds the store exclusively for exactly that reason.
pub trait Predicate {
    /// Number of positional arguments the predicate accepts.
    fn arity(&self) -> usize;

    /// Evaluate the predicate against one fact's projected field values.
    fn invoke(&self, args: &[FactValue]) -> FactBaseResult<FactValue>;
}

/// Adapter turning a closure plus a declared arity into a [`Predicate`].
pub struct FnPredicate<F> {
    arity: usize,
    f: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&[FactValue]) -> FactBaseResult<FactValue>,
{
    /// Wrap a fallible closure reporting an arbitrary value.
    pub fn new(arity: usize, f: F) -> Self {
        Self { arity, f }
    }
}

/// Wrap an infallible boolean closure into a [`Predicate`], the common case
/// for host conditions like `type == "cat"`.
pub fn boolean_predicate(
    arity: usize,
    f: impl Fn(&[FactValue]) -> bool,
) -> FnPredicate<impl Fn(&[FactValue]) -> FactBaseResult<FactValue>> {
    FnPredicate::new(arity, move |args: &[FactValue]| {
        Ok(FactValue::Boolean(f(args)))
    })
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&[FactValue]) -> FactBaseResult<FactValue>,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn invoke(&self, args: &[FactValue]) -> FactBaseResult<FactValue> {
        (self.f)(args)
    }
}

fn resolve_fields(store: &FactBase, fields: &[&str]) -> FactBaseResult<Vec<usize>> {
    fields
        .iter()
        .map(|name| {
            store
                .field_index(name)
                .ok_or_else(|| FactBaseError::unknown_field(*name))
        })
        .collect()
}

/// A retrieval bound to a fact base, a predicate and field bindings.
///
/// Input fields are bound positionally to the predicate's parameters. Output
/// fields, when given, project each match down to the named fields; without
/// them the full tuple is returned. All field names are resolved and the
/// predicate arity is validated at construction, before any scanning.
///
/// The retrieval borrows the store exclusively for its lifetime, which is the
/// single-writer access model of the store made explicit: nothing can mutate
/// the store mid-scan, and `retract_matching` can mutate it afterwards.
pub struct Retrieval<'a, P: Predicate> {
    store: &'a mut FactBase,
    predicate: P,
    input_indices: Vec<usize>,
    output_indices: Option<Vec<usize>>,
}

impl<'a, P: Predicate> Retrieval<'a, P> {
    /// Bind a predicate and field lists to a store.
    ///
    /// Fails with `ArityMismatch` when the predicate's declared arity differs
    /// from the number of input fields, and with `UnknownField` when any
    /// named field is not in the store's schema.
    pub fn new(
        store: &'a mut FactBase,
        predicate: P,
        input_fields: &[&str],
        output_fields: Option<&[&str]>,
    ) -> FactBaseResult<Self> {
        if predicate.arity() != input_fields.len() {
            return Err(FactBaseError::arity_mismatch(
                input_fields.len(),
                predicate.arity(),
            ));
        }
        let input_indices = resolve_fields(store, input_fields)?;
        let output_indices = match output_fields {
            Some(fields) => Some(resolve_fields(store, fields)?),
            None => None,
        };
        trace!(
            input_indices = ?input_indices,
            output_indices = ?output_indices,
            "retrieval bound"
        );
        Ok(Self { store, predicate, input_indices, output_indices })
    }

    fn matches(&self, fact: &Fact) -> FactBaseResult<bool> {
        let args: Vec<FactValue> = self.input_indices.iter().map(|&i| fact[i].clone()).collect();
        let verdict = self.predicate.invoke(&args)?;
        // Anything but an explicit true is a non-match
        Ok(matches!(verdict, FactValue::Boolean(true)))
    }

    fn project(&self, fact: &Fact) -> Fact {
        match &self.output_indices {
            None => fact.clone(),
            Some(indices) => indices.iter().map(|&i| fact[i].clone()).collect(),
        }
    }

    /// Collect the raw matching tuples in id order, without output projection.
    fn scan_raw(&self) -> FactBaseResult<Vec<Fact>> {
        let mut results = Vec::new();
        for (_, fact) in self.store.live_facts() {
            if self.matches(fact)? {
                results.push(fact.clone());
            }
        }
        Ok(results)
    }

    /// Find all facts satisfying the predicate, in ascending id order, each
    /// projected onto the output fields if any were bound. An empty result is
    /// not an error.
    #[instrument(skip(self))]
    pub fn scan_all(&self) -> FactBaseResult<Vec<Fact>> {
        let mut results = Vec::new();
        for (id, fact) in self.store.live_facts() {
            if self.matches(fact)? {
                trace!(fact_id = id, "fact matched");
                results.push(self.project(fact));
            }
        }
        debug!(match_count = results.len(), "scan complete");
        Ok(results)
    }

    /// Find the first fact satisfying the predicate, or `None` when no fact
    /// matches. The raw tuple is returned; output projection does not apply.
    #[instrument(skip(self))]
    pub fn scan_first(&self) -> FactBaseResult<Option<Fact>> {
        for (id, fact) in self.store.live_facts() {
            if self.matches(fact)? {
                trace!(fact_id = id, "first match found");
                return Ok(Some(fact.clone()));
            }
        }
        Ok(None)
    }

    /// True if any fact satisfies the predicate.
    pub fn exists(&self) -> FactBaseResult<bool> {
        Ok(self.scan_first()?.is_some())
    }

    /// Return one uniformly random fact from the full match set.
    /// Fails with `EmptyResult` when no fact matches.
    pub fn sample_one(&self) -> FactBaseResult<Fact> {
        self.sample_one_with_rng(&mut rand::thread_rng())
    }

    /// `sample_one` with a caller-supplied source of randomness.
    pub fn sample_one_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> FactBaseResult<Fact> {
        let mut matches = self.scan_all()?;
        if matches.is_empty() {
            return Err(FactBaseError::EmptyResult);
        }
        let index = rng.gen_range(0..matches.len());
        Ok(matches.swap_remove(index))
    }

    /// Return `n` distinct matching facts, drawn without replacement.
    /// Fails with `SampleSizeExceeded` when `n` exceeds the match count or
    /// the match set is empty.
    pub fn sample_n(&self, n: usize) -> FactBaseResult<Vec<Fact>> {
        self.sample_n_with_rng(n, &mut rand::thread_rng())
    }

    /// `sample_n` with a caller-supplied source of randomness.
    ///
    /// Each draw picks a uniformly random remaining position and removes it
    /// from the candidate pool, so the result is a uniformly random subset of
    /// size `n`. Result order follows draw order, not scan order.
    pub fn sample_n_with_rng<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> FactBaseResult<Vec<Fact>> {
        let matches = self.scan_all()?;
        if matches.is_empty() || n > matches.len() {
            return Err(FactBaseError::sample_size_exceeded(n, matches.len()));
        }
        let mut pool: Vec<usize> = (0..matches.len()).collect();
        let mut picked = Vec::with_capacity(n);
        for _ in 0..n {
            let slot = rng.gen_range(0..pool.len());
            picked.push(matches[pool[slot]].clone());
            pool.remove(slot);
        }
        Ok(picked)
    }

    /// Retract every fact satisfying the predicate from the bound store and
    /// return how many were retracted. Matches are collected before any
    /// retraction, so the scan is unaffected by the removals. The raw tuples
    /// are retracted; output projection does not apply.
    #[instrument(skip(self))]
    pub fn retract_matching(&mut self) -> FactBaseResult<usize> {
        let selected = self.scan_raw()?;
        for fact in &selected {
            self.store.retract_fact(fact)?;
        }
        debug!(retracted = selected.len(), "matching facts retracted");
        Ok(selected.len())
    }
}
