use std::collections::BTreeMap;

use log::{debug, info};
use roaring::RoaringBitmap;

use super::superset::{Itemset, SupersetTable};
use super::tidset::Tidset;
use crate::algorithm::RuleMiner;
use crate::budget::MiningBudget;
use crate::config::{MiningConfig, SupportThresholds};
use crate::data::{EncodedDataset, Item};
use crate::error::MiningError;
use crate::rules::{confidence, Antecedent, Rule};

#[derive(Debug, Clone)]
struct Node {
    itemset: Itemset,
    removed: bool,
}

impl Node {
    fn new(itemset: Itemset) -> Self {
        Self {
            itemset,
            removed: false,
        }
    }
}

/// Equivalence class being combined: members sharing a prefix, the next
/// member to extend, and the itemset waiting for its children to finish.
#[derive(Debug)]
struct Frame {
    nodes: Vec<Node>,
    next: usize,
    pending: Option<Itemset>,
}

impl Frame {
    fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            next: 0,
            pending: None,
        }
    }
}

/// CHARM-style miner over closed itemsets, emitting rules from them.
pub struct ClosedMiner<'a> {
    dataset: &'a EncodedDataset,
    thresholds: SupportThresholds,
    min_confidence: f64,
    budget: MiningBudget,
}

impl<'a> ClosedMiner<'a> {
    pub fn new(dataset: &'a EncodedDataset, config: &MiningConfig) -> Result<Self, MiningError> {
        config.validate()?;
        Ok(Self {
            dataset,
            thresholds: config.thresholds(dataset),
            min_confidence: config.min_confidence,
            budget: MiningBudget::from_limit(config.max_work),
        })
    }

    pub fn budget(&self) -> &MiningBudget {
        &self.budget
    }

    /// Tidsets of the frequent items, ascending by support, and of every
    /// class index.
    fn tidsets(&self) -> (Vec<Itemset>, Vec<Tidset>) {
        let mut item_bits: BTreeMap<Item, RoaringBitmap> = BTreeMap::new();
        let mut class_bits = vec![RoaringBitmap::new(); self.dataset.num_classes()];

        for (tid, (row, label)) in (0u32..).zip(self.dataset.instances()) {
            for &item in row {
                item_bits.entry(item).or_default().insert(tid);
            }
            class_bits[label].insert(tid);
        }

        let min_count = self.thresholds.floor();
        let mut singletons: Vec<Itemset> = item_bits
            .into_iter()
            .map(|(item, bits)| Itemset::new(Antecedent::from_sorted(vec![item]), Tidset::new(bits)))
            .filter(|itemset| itemset.support() >= min_count)
            .collect();
        sort_by_support(&mut singletons);

        let class_tidsets = class_bits.into_iter().map(Tidset::new).collect();
        (singletons, class_tidsets)
    }

    /// Combine member `i` with every later live member of its class.
    ///
    /// Returns the (possibly grown) itemset of `i` and the new equivalence
    /// class prefixed by it.
    fn extend_node(
        &mut self,
        nodes: &mut [Node],
        i: usize,
    ) -> Result<(Itemset, Vec<Node>), MiningError> {
        let min_count = self.thresholds.floor();
        let mut current = nodes[i].itemset.clone();
        let mut children: Vec<Node> = Vec::new();

        for j in i + 1..nodes.len() {
            if nodes[j].removed {
                continue;
            }
            self.budget.charge(1)?;
            let tidset = current.tidset.intersect(&nodes[j].itemset.tidset);
            let support = tidset.support();
            if support < min_count {
                continue;
            }

            let covers_current = support == current.support();
            let covers_other = support == nodes[j].itemset.support();
            match (covers_current, covers_other) {
                (true, true) => {
                    nodes[j].removed = true;
                    absorb(&mut current, &mut children, &nodes[j].itemset.items);
                }
                (true, false) => {
                    absorb(&mut current, &mut children, &nodes[j].itemset.items);
                }
                (false, true) => {
                    nodes[j].removed = true;
                    let items = current.items.union(&nodes[j].itemset.items);
                    children.push(Node::new(Itemset::new(items, tidset)));
                }
                (false, false) => {
                    let items = current.items.union(&nodes[j].itemset.items);
                    children.push(Node::new(Itemset::new(items, tidset)));
                }
            }
        }

        let mut itemsets: Vec<Itemset> = children.into_iter().map(|node| node.itemset).collect();
        sort_by_support(&mut itemsets);
        Ok((current, itemsets.into_iter().map(Node::new).collect()))
    }

    /// The closed frequent itemsets of the dataset, without rules.
    pub fn closed_itemsets(&mut self) -> Result<Vec<Itemset>, MiningError> {
        let (singletons, _) = self.tidsets();
        Ok(self.search(singletons)?.into_itemsets())
    }

    /// Run the search with an explicit stack of equivalence classes. An
    /// itemset is offered to the table only after all of its extensions.
    fn search(&mut self, singletons: Vec<Itemset>) -> Result<SupersetTable, MiningError> {
        let mut table = SupersetTable::new();
        let mut stack = vec![Frame::new(singletons.into_iter().map(Node::new).collect())];

        while let Some(frame) = stack.last_mut() {
            if let Some(done) = frame.pending.take() {
                table.insert_if_closed(done);
            }
            while frame.next < frame.nodes.len() && frame.nodes[frame.next].removed {
                frame.next += 1;
            }
            if frame.next == frame.nodes.len() {
                stack.pop();
                continue;
            }

            let i = frame.next;
            frame.next += 1;
            let (itemset, children) = self.extend_node(&mut frame.nodes, i)?;
            if children.is_empty() {
                table.insert_if_closed(itemset);
            } else {
                frame.pending = Some(itemset);
                stack.push(Frame::new(children));
            }
        }
        Ok(table)
    }

    /// Closed itemsets are never truncated to `max_antecedent_length`: a
    /// shorter antecedent is only represented through its closure.
    fn generate_rules(&self, table: &SupersetTable, class_tidsets: &[Tidset]) -> Vec<Rule> {
        let mut rules = Vec::new();
        for itemset in table.iter() {
            let support = itemset.support();
            for (class, class_tidset) in class_tidsets.iter().enumerate() {
                let support_rule = itemset.tidset.intersection_len(class_tidset);
                if support_rule < self.thresholds.for_class(class) {
                    continue;
                }
                if confidence(support_rule, support) < self.min_confidence {
                    continue;
                }
                rules.push(Rule::new(
                    itemset.items.clone(),
                    self.dataset.class_id(class),
                    support,
                    class_tidset.support(),
                    support_rule,
                ));
            }
        }
        rules
    }
}

/// Grow `current` (and every extension already derived from it) by `items`.
fn absorb(current: &mut Itemset, children: &mut [Node], items: &Antecedent) {
    current.items = current.items.union(items);
    for child in children.iter_mut() {
        child.itemset.items = child.itemset.items.union(items);
    }
}

fn sort_by_support(itemsets: &mut [Itemset]) {
    itemsets.sort_by(|a, b| {
        a.support()
            .cmp(&b.support())
            .then_with(|| a.items.cmp(&b.items))
    });
}

impl RuleMiner for ClosedMiner<'_> {
    fn mine(&mut self) -> Result<Vec<Rule>, MiningError> {
        let (singletons, class_tidsets) = self.tidsets();
        debug!("closed mining: {} frequent items", singletons.len());
        if singletons.is_empty() {
            return Ok(Vec::new());
        }

        let table = self.search(singletons)?;
        debug!("{} closed itemsets", table.len());
        let rules = self.generate_rules(&table, &class_tidsets);
        info!(
            "closed mining produced {} rules ({} work units)",
            rules.len(),
            self.budget.used()
        );
        Ok(rules)
    }
}
