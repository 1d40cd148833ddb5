use std::collections::HashMap;

use super::tree::{FPTree, PrefixPath};
use crate::data::{EncodedDataset, Item};

/// Global item order of one run: descending support, ties by ascending id.
#[derive(Debug, Clone, Default)]
pub struct ItemOrder {
    rank: HashMap<Item, usize>,
}

impl ItemOrder {
    pub fn from_supports(mut supports: Vec<(Item, usize)>) -> Self {
        supports.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let rank = supports
            .into_iter()
            .enumerate()
            .map(|(rank, (item, _))| (item, rank))
            .collect();
        Self { rank }
    }

    pub fn len(&self) -> usize {
        self.rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rank.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.rank.contains_key(&item)
    }

    pub fn rank(&self, item: Item) -> Option<usize> {
        self.rank.get(&item).copied()
    }

    /// Sort ranked items into tree order; unranked items go last.
    pub fn sort(&self, items: &mut [Item]) {
        items.sort_unstable_by_key(|&item| (self.rank(item).unwrap_or(usize::MAX), item));
    }
}

/// Build the tree of every instance restricted to items with support of at
/// least `min_count`.
pub fn build_fp_tree(dataset: &EncodedDataset, min_count: usize) -> (FPTree, ItemOrder) {
    let frequent_items: Vec<(Item, usize)> = dataset
        .item_frequencies()
        .iter()
        .filter(|(_, &count)| count >= min_count)
        .map(|(&item, &count)| (item, count))
        .collect();
    let order = ItemOrder::from_supports(frequent_items);

    let num_classes = dataset.num_classes();
    let unit_counts: Vec<Vec<usize>> = (0..num_classes)
        .map(|class| {
            let mut counts = vec![0; num_classes];
            counts[class] = 1;
            counts
        })
        .collect();

    let mut fp_tree = FPTree::new(num_classes);
    let mut tx_items: Vec<Item> = Vec::new();
    for (row, label) in dataset.instances() {
        tx_items.clear();
        tx_items.extend(row.iter().copied().filter(|&item| order.contains(item)));
        if tx_items.is_empty() {
            continue;
        }
        order.sort(&mut tx_items);
        fp_tree.insert_path(&tx_items, 1, &unit_counts[label]);
    }

    fp_tree.finish_header(&order);
    (fp_tree, order)
}

/// Build the conditional tree of a pattern base, dropping items whose
/// aggregate count in the base stays below `min_count`.
pub fn build_conditional_fp_tree(
    prefix_paths: &[PrefixPath],
    min_count: usize,
    order: &ItemOrder,
    num_classes: usize,
) -> FPTree {
    let mut item_counts: HashMap<Item, usize> = HashMap::new();
    for path in prefix_paths {
        for &item in &path.items {
            *item_counts.entry(item).or_insert(0) += path.count;
        }
    }

    let mut conditional_tree = FPTree::new(num_classes);
    let mut filtered_path: Vec<Item> = Vec::new();
    for path in prefix_paths {
        // ancestor chains are already in tree order
        filtered_path.clear();
        filtered_path.extend(
            path.items
                .iter()
                .copied()
                .filter(|item| item_counts.get(item).is_some_and(|&c| c >= min_count)),
        );

        if !filtered_path.is_empty() {
            conditional_tree.insert_path(&filtered_path, path.count, &path.class_counts);
        }
    }

    conditional_tree.finish_header(order);
    conditional_tree
}
