use log::{debug, info, trace};

use super::builder::{build_conditional_fp_tree, build_fp_tree, ItemOrder};
use super::combinations::for_each_combination;
use super::tree::{counts_non_increasing, FPTree};
use crate::algorithm::RuleMiner;
use crate::budget::MiningBudget;
use crate::config::{MiningConfig, SupportThresholds};
use crate::data::{EncodedDataset, Item};
use crate::error::MiningError;
use crate::rules::{confidence, Antecedent, Rule};

/// FP-Growth rule miner.
///
/// The dataset is compressed into an [`FPTree`] whose nodes also count
/// classes, so every frequent antecedent yields its rules without another
/// scan. Rule acceptance uses the per-class thresholds; tree pruning uses
/// their minimum.
pub struct TreeMiner<'a> {
    dataset: &'a EncodedDataset,
    thresholds: SupportThresholds,
    min_confidence: f64,
    max_antecedent_length: usize,
    budget: MiningBudget,
}

impl<'a> TreeMiner<'a> {
    pub fn new(dataset: &'a EncodedDataset, config: &MiningConfig) -> Result<Self, MiningError> {
        config.validate()?;
        Ok(Self {
            dataset,
            thresholds: config.thresholds(dataset),
            min_confidence: config.min_confidence,
            max_antecedent_length: config.max_antecedent_length,
            budget: MiningBudget::from_limit(config.max_work),
        })
    }

    pub fn budget(&self) -> &MiningBudget {
        &self.budget
    }

    fn fp_growth_recursive(
        &mut self,
        fp_tree: &FPTree,
        order: &ItemOrder,
        alpha: &[Item],
        alpha_support: usize,
        rules: &mut Vec<Rule>,
    ) -> Result<(), MiningError> {
        if fp_tree.has_single_path() {
            return self.mine_single_path(fp_tree, alpha, alpha_support, rules);
        }

        let min_count = self.thresholds.floor();
        // least frequent first
        for &item in fp_tree.header_table.iter().rev() {
            let (item_support, class_counts) = fp_tree.item_support(item);
            let support = item_support.min(alpha_support);
            if support < min_count {
                continue;
            }

            let mut beta = Vec::with_capacity(alpha.len() + 1);
            beta.extend_from_slice(alpha);
            beta.push(item);
            self.budget.charge(1)?;
            self.generate_rules(&beta, support, &class_counts, rules);

            if beta.len() >= self.max_antecedent_length {
                continue;
            }
            let prefix_paths = fp_tree.prefix_paths(item);
            if prefix_paths.is_empty() {
                continue;
            }
            let conditional_tree =
                build_conditional_fp_tree(&prefix_paths, min_count, order, fp_tree.num_classes());
            if !conditional_tree.is_empty() {
                trace!(
                    "conditional tree for {:?}: {} nodes",
                    beta,
                    conditional_tree.nodes.len() - 1
                );
                self.fp_growth_recursive(&conditional_tree, order, &beta, support, rules)?;
            }
        }
        Ok(())
    }

    /// Every subset of a single path is a pattern; its counts are those of
    /// the deepest node it includes.
    fn mine_single_path(
        &mut self,
        fp_tree: &FPTree,
        alpha: &[Item],
        alpha_support: usize,
        rules: &mut Vec<Rule>,
    ) -> Result<(), MiningError> {
        let path = fp_tree.single_path();
        debug_assert!(
            counts_non_increasing(fp_tree, &path),
            "node counts must not grow along a path"
        );

        let min_count = self.thresholds.floor();
        let max_k = self.max_antecedent_length.saturating_sub(alpha.len());
        let mut pattern: Vec<Item> = Vec::with_capacity(alpha.len() + path.len());

        for_each_combination(path.len(), max_k, |combination| {
            let deepest = &fp_tree.nodes[path[combination[combination.len() - 1]]];
            let support = deepest.count.min(alpha_support);
            if support < min_count {
                return Ok(());
            }

            pattern.clear();
            pattern.extend_from_slice(alpha);
            pattern.extend(
                combination
                    .iter()
                    .filter_map(|&idx| fp_tree.nodes[path[idx]].item),
            );
            self.budget.charge(1)?;
            self.generate_rules(&pattern, support, &deepest.class_counts, rules);
            Ok(())
        })
    }

    /// Emit one rule per class that the antecedent co-occurs with and that
    /// passes the thresholds.
    fn generate_rules(
        &self,
        antecedent: &[Item],
        support: usize,
        class_counts: &[usize],
        rules: &mut Vec<Rule>,
    ) {
        let antecedent = Antecedent::new(antecedent.to_vec());
        for (class, &support_rule) in class_counts.iter().enumerate() {
            if support_rule == 0 || support_rule < self.thresholds.for_class(class) {
                continue;
            }
            if confidence(support_rule, support) < self.min_confidence {
                continue;
            }
            rules.push(Rule::new(
                antecedent.clone(),
                self.dataset.class_id(class),
                support,
                self.dataset.frequency_by_class()[class],
                support_rule,
            ));
        }
    }
}

impl RuleMiner for TreeMiner<'_> {
    fn mine(&mut self) -> Result<Vec<Rule>, MiningError> {
        let mut rules = Vec::new();
        let (fp_tree, order) = build_fp_tree(self.dataset, self.thresholds.floor());
        debug!(
            "fp-tree: {} frequent items, {} nodes",
            order.len(),
            fp_tree.nodes.len() - 1
        );
        if fp_tree.is_empty() {
            return Ok(rules);
        }

        self.fp_growth_recursive(&fp_tree, &order, &[], usize::MAX, &mut rules)?;
        info!(
            "tree mining produced {} rules ({} work units)",
            rules.len(),
            self.budget.used()
        );
        Ok(rules)
    }
}
