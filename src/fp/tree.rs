use std::collections::HashMap;

use super::builder::ItemOrder;
use crate::data::Item;

#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<Item>,
    pub count: usize,
    /// Share of `count` per class index.
    pub class_counts: Vec<usize>,
    pub parent: Option<usize>,
    pub children: HashMap<Item, usize>,
    /// Next node holding the same item, in insertion order.
    pub next_same_item: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct NodeLink {
    head: usize,
    tail: usize,
}

/// One conditional pattern base entry: the ancestors of a node, root side
/// first, with that node's counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPath {
    pub items: Vec<Item>,
    pub count: usize,
    pub class_counts: Vec<usize>,
}

/// Prefix tree stored as an arena; parents and node links are indices.
#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub root_index: usize,
    /// Items present in the tree, most frequent first.
    pub header_table: Vec<Item>,
    links: HashMap<Item, NodeLink>,
    num_classes: usize,
}

impl FPNode {
    pub fn new_root(num_classes: usize) -> Self {
        Self {
            item: None,
            count: 0,
            class_counts: vec![0; num_classes],
            parent: None,
            children: HashMap::new(),
            next_same_item: None,
        }
    }

    pub fn new_item(item: Item, num_classes: usize, parent: usize) -> Self {
        Self {
            item: Some(item),
            count: 0,
            class_counts: vec![0; num_classes],
            parent: Some(parent),
            children: HashMap::new(),
            next_same_item: None,
        }
    }
}

impl FPTree {
    pub fn new(num_classes: usize) -> Self {
        Self {
            nodes: vec![FPNode::new_root(num_classes)],
            root_index: 0,
            header_table: Vec::new(),
            links: HashMap::new(),
            num_classes,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// True when only the sentinel root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Insert one ordered path carrying `count` occurrences split over
    /// classes as `class_counts`.
    pub fn insert_path(&mut self, path: &[Item], count: usize, class_counts: &[usize]) {
        debug_assert_eq!(class_counts.len(), self.num_classes);
        let mut current_index = self.root_index;

        for &item in path {
            let child_index = match self.nodes[current_index].children.get(&item) {
                Some(&child_index) => child_index,
                None => {
                    let new_index = self.nodes.len();
                    self.nodes
                        .push(FPNode::new_item(item, self.num_classes, current_index));
                    self.nodes[current_index].children.insert(item, new_index);
                    self.link(item, new_index);
                    new_index
                }
            };

            let node = &mut self.nodes[child_index];
            node.count += count;
            for (total, &add) in node.class_counts.iter_mut().zip(class_counts) {
                *total += add;
            }
            current_index = child_index;
        }
    }

    fn link(&mut self, item: Item, node_index: usize) {
        match self.links.get_mut(&item) {
            Some(link) => {
                self.nodes[link.tail].next_same_item = Some(node_index);
                link.tail = node_index;
            }
            None => {
                self.links.insert(
                    item,
                    NodeLink {
                        head: node_index,
                        tail: node_index,
                    },
                );
            }
        }
    }

    /// Order the header table by the global item order.
    pub fn finish_header(&mut self, order: &ItemOrder) {
        let mut header: Vec<Item> = self.links.keys().copied().collect();
        order.sort(&mut header);
        self.header_table = header;
    }

    /// Every node holding `item`, following the node-link chain.
    pub fn node_links(&self, item: Item) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.links.get(&item).map(|link| link.head);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.nodes[current].next_same_item;
            Some(current)
        })
    }

    /// Total count of `item` in this tree and its per-class split.
    pub fn item_support(&self, item: Item) -> (usize, Vec<usize>) {
        let mut class_counts = vec![0; self.num_classes];
        let mut support = 0;
        for idx in self.node_links(item) {
            let node = &self.nodes[idx];
            support += node.count;
            for (total, &add) in class_counts.iter_mut().zip(&node.class_counts) {
                *total += add;
            }
        }
        (support, class_counts)
    }

    /// Conditional pattern base of `item`.
    pub fn prefix_paths(&self, item: Item) -> Vec<PrefixPath> {
        self.node_links(item)
            .filter_map(|idx| {
                let node = &self.nodes[idx];
                let mut items = Vec::new();
                let mut current = node.parent;

                while let Some(i) = current {
                    if let Some(ancestor) = self.nodes[i].item {
                        items.push(ancestor);
                    }
                    current = self.nodes[i].parent;
                }

                items.reverse();
                (!items.is_empty()).then(|| PrefixPath {
                    items,
                    count: node.count,
                    class_counts: node.class_counts.clone(),
                })
            })
            .collect()
    }

    pub fn has_single_path(&self) -> bool {
        let mut current_index = self.root_index;

        loop {
            let current_node = &self.nodes[current_index];
            if current_node.children.len() > 1 {
                return false;
            }
            match current_node.children.values().next() {
                Some(&child) => current_index = child,
                None => return true,
            }
        }
    }

    /// Node indices from the root's child down to the leaf of a single-path
    /// tree. For a branching tree this follows an arbitrary branch.
    pub fn single_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current_index = self.root_index;

        while let Some(&child) = self.nodes[current_index].children.values().next() {
            path.push(child);
            current_index = child;
        }
        path
    }
}

/// Node counts never grow from the root down to a leaf.
pub fn counts_non_increasing(tree: &FPTree, path: &[usize]) -> bool {
    path.windows(2)
        .all(|pair| tree.nodes[pair[0]].count >= tree.nodes[pair[1]].count)
}
