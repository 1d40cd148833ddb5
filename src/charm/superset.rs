use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::tidset::Tidset;
use crate::rules::Antecedent;

/// Items together with the instances they all occur in.
///
/// Equality and hashing look at the items only.
#[derive(Debug, Clone)]
pub struct Itemset {
    pub items: Antecedent,
    pub tidset: Tidset,
}

impl Itemset {
    pub fn new(items: Antecedent, tidset: Tidset) -> Self {
        Self { items, tidset }
    }

    pub fn support(&self) -> usize {
        self.tidset.support()
    }
}

impl PartialEq for Itemset {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Itemset {}

impl Hash for Itemset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

/// Closed itemsets accepted so far, bucketed by tidset sum.
///
/// Entries are only ever appended during a run.
#[derive(Debug, Default)]
pub struct SupersetTable {
    buckets: HashMap<u64, Vec<usize>>,
    closed: Vec<Itemset>,
}

impl SupersetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    /// True when an accepted itemset with the same support contains every
    /// item of `candidate`.
    pub fn is_subsumed(&self, candidate: &Itemset) -> bool {
        self.is_subsumed_in(candidate, candidate.tidset.tid_sum())
    }

    fn is_subsumed_in(&self, candidate: &Itemset, key: u64) -> bool {
        self.buckets.get(&key).is_some_and(|bucket| {
            bucket.iter().any(|&idx| {
                let existing = &self.closed[idx];
                existing.support() == candidate.support()
                    && candidate.items.is_subset_of(existing.items.items())
            })
        })
    }

    /// Insert `candidate` unless it is subsumed. Returns whether it was kept.
    pub fn insert_if_closed(&mut self, candidate: Itemset) -> bool {
        let key = candidate.tidset.tid_sum();
        if self.is_subsumed_in(&candidate, key) {
            return false;
        }
        self.buckets.entry(key).or_default().push(self.closed.len());
        self.closed.push(candidate);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Itemset> {
        self.closed.iter()
    }

    pub fn into_itemsets(self) -> Vec<Itemset> {
        self.closed
    }
}
