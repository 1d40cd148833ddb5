use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{is_sorted_subset, Item};

/// Left-hand side of a rule: items kept sorted ascending and duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Antecedent(Vec<Item>);

impl Antecedent {
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    /// Wrap items the caller already keeps sorted and unique.
    pub(crate) fn from_sorted(items: Vec<Item>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Item> {
        self.0.last().copied()
    }

    /// All items but the last.
    pub fn prefix(&self) -> &[Item] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    pub fn contains(&self, item: Item) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    /// Copy with `item` added in order.
    pub fn extended(&self, item: Item) -> Self {
        let mut items = self.0.clone();
        if let Err(pos) = items.binary_search(&item) {
            items.insert(pos, item);
        }
        Self(items)
    }

    /// Copy with the item at `position` removed.
    pub fn without(&self, position: usize) -> Self {
        let mut items = self.0.clone();
        items.remove(position);
        Self(items)
    }

    /// Sorted union of both antecedents.
    pub fn union(&self, other: &Antecedent) -> Self {
        let (a, b) = (&self.0, &other.0);
        let mut items = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    items.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    items.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    items.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        items.extend_from_slice(&a[i..]);
        items.extend_from_slice(&b[j..]);
        Self(items)
    }

    /// True when every item also occurs in the sorted slice `items`.
    pub fn is_subset_of(&self, items: &[Item]) -> bool {
        is_sorted_subset(&self.0, items)
    }
}

impl From<Vec<Item>> for Antecedent {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, item) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}
