//! Encoded, read-only training data shared by every miner.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{Array2, ArrayView1};

use crate::error::DatasetError;

/// Global id of one (attribute, value) pair.
pub type Item = usize;

/// Global id of a class value. Class ids never overlap item ids.
pub type ClassId = usize;

/// Nominal dataset where every instance is one item per attribute plus a class.
///
/// All aggregate counts are computed once at construction, so miners only
/// ever borrow the dataset.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    items: Array2<Item>,
    rows: Vec<Vec<Item>>,
    labels: Vec<usize>,
    class_ids: Vec<ClassId>,
    frequency_by_class: Vec<usize>,
    item_frequency: BTreeMap<Item, usize>,
    item_class_frequency: BTreeMap<Item, Vec<usize>>,
}

impl EncodedDataset {
    /// Build a dataset from an `instances x attributes` item matrix and one
    /// class id per instance.
    pub fn new(items: Array2<Item>, labels: &[ClassId]) -> Result<Self, DatasetError> {
        let num_rows = items.nrows();
        if labels.len() != num_rows {
            return Err(DatasetError::LabelLenMismatch {
                rows: num_rows,
                labels: labels.len(),
            });
        }
        if num_rows > u32::MAX as usize {
            return Err(DatasetError::TooManyInstances {
                rows: num_rows,
                max: u32::MAX as usize,
            });
        }

        let class_ids: Vec<ClassId> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let num_classes = class_ids.len();
        let class_index: BTreeMap<ClassId, usize> = class_ids
            .iter()
            .enumerate()
            .map(|(idx, &class)| (class, idx))
            .collect();

        let mut rows = Vec::with_capacity(num_rows);
        let mut label_index = Vec::with_capacity(num_rows);
        let mut frequency_by_class = vec![0; num_classes];
        let mut item_frequency: BTreeMap<Item, usize> = BTreeMap::new();
        let mut item_class_frequency: BTreeMap<Item, Vec<usize>> = BTreeMap::new();

        for (row, &label) in items.rows().into_iter().zip(labels) {
            let class = class_index[&label];
            frequency_by_class[class] += 1;
            label_index.push(class);

            let mut sorted: Vec<Item> = row.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            for &item in &sorted {
                *item_frequency.entry(item).or_insert(0) += 1;
                item_class_frequency
                    .entry(item)
                    .or_insert_with(|| vec![0; num_classes])[class] += 1;
            }
            rows.push(sorted);
        }

        if let Some(&class) = class_ids
            .iter()
            .find(|class| item_frequency.contains_key(class))
        {
            return Err(DatasetError::ClassCollidesWithItem { class });
        }

        Ok(Self {
            items,
            rows,
            labels: label_index,
            class_ids,
            frequency_by_class,
            item_frequency,
            item_class_frequency,
        })
    }

    /// Build a dataset from equally long item rows.
    pub fn from_rows(rows: &[Vec<Item>], labels: &[ClassId]) -> Result<Self, DatasetError> {
        let width = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DatasetError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        let items = Array2::from_shape_vec((rows.len(), width), flat).map_err(|_| {
            DatasetError::RaggedRow {
                row: 0,
                expected: width,
                got: 0,
            }
        })?;
        Self::new(items, labels)
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_attributes(&self) -> usize {
        self.items.ncols()
    }

    pub fn num_classes(&self) -> usize {
        self.class_ids.len()
    }

    /// Distinct class ids, ascending. Position in this slice is the class index.
    pub fn class_ids(&self) -> &[ClassId] {
        &self.class_ids
    }

    pub fn class_id(&self, class_idx: usize) -> ClassId {
        self.class_ids[class_idx]
    }

    pub fn class_index(&self, class: ClassId) -> Option<usize> {
        self.class_ids.binary_search(&class).ok()
    }

    /// Encoded attribute values of one instance, in attribute order.
    pub fn instance(&self, idx: usize) -> ArrayView1<'_, Item> {
        self.items.row(idx)
    }

    /// Items of one instance sorted ascending.
    pub fn instance_items(&self, idx: usize) -> &[Item] {
        &self.rows[idx]
    }

    /// Class index of one instance.
    pub fn label(&self, idx: usize) -> usize {
        self.labels[idx]
    }

    /// `(sorted items, class index)` for every instance, in order.
    pub fn instances(&self) -> impl Iterator<Item = (&[Item], usize)> + '_ {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }

    /// Instance count per class index.
    pub fn frequency_by_class(&self) -> &[usize] {
        &self.frequency_by_class
    }

    /// Singleton supports of every item present, ascending by item id.
    pub fn item_frequencies(&self) -> &BTreeMap<Item, usize> {
        &self.item_frequency
    }

    pub fn item_frequency(&self, item: Item) -> usize {
        self.item_frequency.get(&item).copied().unwrap_or(0)
    }

    /// Per-class support of a single item, indexed by class index.
    pub fn item_class_frequency(&self, item: Item) -> Option<&[usize]> {
        self.item_class_frequency.get(&item).map(Vec::as_slice)
    }

    /// Recount `(support of antecedent, support of antecedent with class)`
    /// by scanning every instance. `antecedent` must be sorted.
    pub fn count_rule(&self, antecedent: &[Item], class_idx: usize) -> (usize, usize) {
        self.instances()
            .filter(|(row, _)| is_sorted_subset(antecedent, row))
            .fold((0, 0), |(ant, rule), (_, label)| {
                (ant + 1, rule + usize::from(label == class_idx))
            })
    }
}

/// True when every element of sorted `needle` occurs in sorted `haystack`.
pub(crate) fn is_sorted_subset(needle: &[Item], haystack: &[Item]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    let mut rest = haystack.iter();
    needle
        .iter()
        .all(|item| rest.by_ref().any(|candidate| candidate == item))
}
