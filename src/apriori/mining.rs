use std::collections::{HashMap, HashSet};
use std::iter;

use log::{debug, info, trace};

use super::level::CandidateLevel;
use super::policy::LevelPolicy;
use crate::algorithm::RuleMiner;
use crate::budget::MiningBudget;
use crate::config::{check_fraction, MiningConfig, SupportThresholds};
use crate::data::{is_sorted_subset, EncodedDataset, Item};
use crate::error::MiningError;
use crate::rules::{confidence, Antecedent, Rule};

#[derive(Debug, Clone, Copy, Default)]
struct CandidateCount {
    antecedent: usize,
    rule: usize,
}

/// Apriori-style search over `antecedent -> class` candidates.
///
/// Level `k` holds antecedents of length `k` paired with one class. Each
/// level is counted, filtered by the support thresholds and the policy, and
/// joined into the next level until nothing survives.
pub struct LevelwiseMiner<'a> {
    dataset: &'a EncodedDataset,
    thresholds: SupportThresholds,
    min_confidence: f64,
    max_antecedent_length: usize,
    policy: LevelPolicy,
    budget: MiningBudget,
}

impl<'a> LevelwiseMiner<'a> {
    pub fn new(
        dataset: &'a EncodedDataset,
        config: &MiningConfig,
        policy: LevelPolicy,
    ) -> Result<Self, MiningError> {
        config.validate()?;
        if let LevelPolicy::AllConfidence { min_all_confidence } = policy {
            check_fraction("min_all_confidence", min_all_confidence)?;
        }
        Ok(Self {
            dataset,
            thresholds: config.thresholds(dataset),
            min_confidence: config.min_confidence,
            max_antecedent_length: config.max_antecedent_length,
            policy,
            budget: MiningBudget::from_limit(config.max_work),
        })
    }

    pub fn budget(&self) -> &MiningBudget {
        &self.budget
    }

    fn frequent_singletons(&self) -> Vec<Item> {
        let floor = self.thresholds.floor();
        self.dataset
            .item_frequencies()
            .iter()
            .filter(|(_, &count)| count >= floor)
            .map(|(&item, _)| item)
            .collect()
    }

    fn count_level(&self, level: &CandidateLevel) -> Vec<CandidateCount> {
        if level.antecedent_len == 1 {
            return level
                .iter()
                .map(|(antecedent, class)| CandidateCount {
                    antecedent: self.dataset.item_frequency(antecedent[0]),
                    rule: self
                        .dataset
                        .item_class_frequency(antecedent[0])
                        .map_or(0, |per_class| per_class[class]),
                })
                .collect();
        }

        // candidates of different classes share one antecedent count
        let mut slots: HashMap<&[Item], usize> = HashMap::new();
        let mut distinct: Vec<&[Item]> = Vec::new();
        let slot_of: Vec<usize> = level
            .iter()
            .map(|(antecedent, _)| {
                *slots.entry(antecedent).or_insert_with(|| {
                    distinct.push(antecedent);
                    distinct.len() - 1
                })
            })
            .collect();

        let num_classes = self.dataset.num_classes();
        let mut antecedent_counts = vec![0usize; distinct.len()];
        let mut class_counts = vec![0usize; distinct.len() * num_classes];
        for (row, label) in self.dataset.instances() {
            for (slot, antecedent) in distinct.iter().enumerate() {
                if is_sorted_subset(antecedent, row) {
                    antecedent_counts[slot] += 1;
                    class_counts[slot * num_classes + label] += 1;
                }
            }
        }

        level
            .iter()
            .zip(slot_of)
            .map(|((_, class), slot)| CandidateCount {
                antecedent: antecedent_counts[slot],
                rule: class_counts[slot * num_classes + class],
            })
            .collect()
    }

    /// `support_rule / max(support of each antecedent item, class support)`.
    fn all_confidence(&self, antecedent: &[Item], class: usize, support_rule: usize) -> f64 {
        let max_parent = antecedent
            .iter()
            .map(|&item| self.dataset.item_frequency(item))
            .chain(iter::once(self.dataset.frequency_by_class()[class]))
            .max()
            .unwrap_or(0);
        confidence(support_rule, max_parent)
    }

    /// Filter one counted level, pushing confident candidates to `rules` and
    /// returning the candidates that take part in the next join.
    fn accept_level(
        &self,
        level: &CandidateLevel,
        counts: &[CandidateCount],
        rules: &mut Vec<Rule>,
    ) -> CandidateLevel {
        let tracks_all_confidence = self.policy.tracks_all_confidence();
        let mut retained = CandidateLevel::new(level.antecedent_len);
        let mut seen: HashSet<(&[Item], usize)> = HashSet::with_capacity(level.len());

        for ((antecedent, class), count) in level.iter().zip(counts) {
            if count.rule < self.thresholds.for_class(class) {
                continue;
            }
            let all_confidence = if tracks_all_confidence {
                self.all_confidence(antecedent, class, count.rule)
            } else {
                0.0
            };
            if !self.policy.keeps(all_confidence) || !seen.insert((antecedent, class)) {
                continue;
            }

            let confident = confidence(count.rule, count.antecedent) >= self.min_confidence;
            if confident {
                let mut rule = Rule::new(
                    Antecedent::from_sorted(antecedent.to_vec()),
                    self.dataset.class_id(class),
                    count.antecedent,
                    self.dataset.frequency_by_class()[class],
                    count.rule,
                );
                if tracks_all_confidence {
                    rule = rule.with_all_confidence(all_confidence);
                }
                trace!("emit {rule}");
                rules.push(rule);
            }
            if self.policy.extends(confident) {
                retained.push(antecedent, class);
            }
        }
        retained
    }

    /// Join retained candidates that share class and prefix, keeping only
    /// joins whose every one-shorter subset was retained too.
    pub(super) fn next_level(&self, retained: &CandidateLevel) -> CandidateLevel {
        let k = retained.antecedent_len;
        let mut order: Vec<usize> = (0..retained.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            retained
                .class(a)
                .cmp(&retained.class(b))
                .then_with(|| retained.antecedent(a).cmp(retained.antecedent(b)))
        });
        let mut known: Vec<HashSet<&[Item]>> = vec![HashSet::new(); self.dataset.num_classes()];
        for (antecedent, class) in retained.iter() {
            known[class].insert(antecedent);
        }

        let mut next = CandidateLevel::new(k + 1);
        let mut candidate = Vec::with_capacity(k + 1);
        let mut scratch = Vec::with_capacity(k);

        for (pos, &a) in order.iter().enumerate() {
            let (left, class) = (retained.antecedent(a), retained.class(a));
            for &b in &order[pos + 1..] {
                let right = retained.antecedent(b);
                if retained.class(b) != class || left[..k - 1] != right[..k - 1] {
                    break;
                }
                if left[k - 1] >= right[k - 1] {
                    continue;
                }
                candidate.clear();
                candidate.extend_from_slice(left);
                candidate.push(right[k - 1]);
                if all_subsets_known(&candidate, &known[class], &mut scratch) {
                    next.push(&candidate, class);
                }
            }
        }
        next
    }
}

/// Anti-monotone check. Dropping either of the last two items gives back
/// the two joined candidates, so only the other positions are looked up.
fn all_subsets_known(
    candidate: &[Item],
    known: &HashSet<&[Item]>,
    scratch: &mut Vec<Item>,
) -> bool {
    (0..candidate.len().saturating_sub(2)).all(|drop| {
        scratch.clear();
        scratch.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(pos, _)| pos != drop)
                .map(|(_, &item)| item),
        );
        known.contains(scratch.as_slice())
    })
}

impl RuleMiner for LevelwiseMiner<'_> {
    fn mine(&mut self) -> Result<Vec<Rule>, MiningError> {
        let mut rules = Vec::new();
        let singletons = self.frequent_singletons();
        let num_classes = self.dataset.num_classes();
        if singletons.is_empty() || num_classes == 0 {
            debug!("no frequent singleton, nothing to mine");
            return Ok(rules);
        }

        let mut level = CandidateLevel::with_capacity(1, singletons.len() * num_classes);
        for &item in &singletons {
            for class in 0..num_classes {
                level.push(&[item], class);
            }
        }

        loop {
            self.budget.charge(level.len())?;
            let counts = self.count_level(&level);
            let emitted_before = rules.len();
            let retained = self.accept_level(&level, &counts, &mut rules);
            debug!(
                "level {}: {} candidates, {} retained, {} rules",
                level.antecedent_len,
                level.len(),
                retained.len(),
                rules.len() - emitted_before
            );

            if retained.is_empty() || retained.antecedent_len >= self.max_antecedent_length {
                break;
            }
            level = self.next_level(&retained);
            if level.is_empty() {
                break;
            }
        }

        info!(
            "level-wise mining produced {} rules ({} work units)",
            rules.len(),
            self.budget.used()
        );
        Ok(rules)
    }
}
