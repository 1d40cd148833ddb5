use std::collections::HashMap;

use super::*;
use crate::algorithm::RuleMiner;
use crate::config::{MiningConfig, SupportScope};
use crate::data::{is_sorted_subset, EncodedDataset};
use crate::error::MiningError;
use crate::testing::{assert_supports_match_scan, find, two_attribute, weather, X, Y};

/// Items shared by every instance containing `items`, and how many
/// instances that is.
fn closure(data: &EncodedDataset, items: &[usize]) -> (Vec<usize>, usize) {
    let mut common: Option<Vec<usize>> = None;
    let mut support = 0;
    for (row, _) in data.instances() {
        if !is_sorted_subset(items, row) {
            continue;
        }
        support += 1;
        common = Some(match common {
            None => row.to_vec(),
            Some(shared) => shared.into_iter().filter(|item| row.contains(item)).collect(),
        });
    }
    (common.unwrap_or_default(), support)
}

fn closed_family(data: &EncodedDataset, min_support: f64) -> HashMap<Vec<usize>, usize> {
    let mut miner = ClosedMiner::new(data, &MiningConfig::new(min_support, 0.0)).unwrap();
    let itemsets = miner.closed_itemsets().unwrap();
    let total = itemsets.len();
    let family: HashMap<Vec<usize>, usize> = itemsets
        .into_iter()
        .map(|itemset| (itemset.items.items().to_vec(), itemset.support()))
        .collect();
    assert_eq!(family.len(), total, "an itemset was reported twice");
    family
}

#[test]
fn test_closed_family_exact() {
    let data = EncodedDataset::from_rows(
        &[vec![0, 1, 2], vec![0, 1, 2], vec![0, 1, 3], vec![4, 1, 3]],
        &[10, 10, 11, 11],
    )
    .unwrap();

    let family = closed_family(&data, 0.0);
    let expected: HashMap<Vec<usize>, usize> = [
        (vec![1], 4),
        (vec![0, 1], 3),
        (vec![0, 1, 2], 2),
        (vec![1, 3], 2),
        (vec![0, 1, 3], 1),
        (vec![1, 3, 4], 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(family, expected);
}

#[test]
fn test_every_itemset_is_closed() {
    let data = weather();
    for min_support in [0.0, 0.2] {
        for (items, support) in closed_family(&data, min_support) {
            assert_eq!(closure(&data, &items), (items.clone(), support));
        }
    }
}

#[test]
fn test_every_frequent_closure_is_found() {
    let data = weather();
    for (min_support, min_count) in [(0.0, 1), (0.2, 2), (0.4, 4)] {
        let family = closed_family(&data, min_support);
        for (row, _) in data.instances() {
            for mask in 1u32..(1 << row.len()) {
                let subset: Vec<usize> = (0..row.len())
                    .filter(|bit| mask & (1 << bit) != 0)
                    .map(|bit| row[bit])
                    .collect();
                let (closed, support) = closure(&data, &subset);
                if support < min_count {
                    continue;
                }
                assert_eq!(family.get(&closed), Some(&support), "closure of {subset:?}");
            }
        }
    }
}

#[test]
fn test_mine_two_attribute() {
    let data = two_attribute();
    let rules = ClosedMiner::new(&data, &MiningConfig::new(0.2, 0.6))
        .unwrap()
        .mine()
        .unwrap();

    let rule = find(&rules, &[3], Y).expect("{3} -> Y");
    assert_eq!(rule.support_rule(), 2);
    assert_eq!(rule.support_antecedent(), 3);
    assert_supports_match_scan(&data, &rules);
}

#[test]
fn test_supports_match_scan() {
    let data = weather();
    for min_support in [0.0, 0.1, 0.3] {
        let rules = ClosedMiner::new(&data, &MiningConfig::new(min_support, 0.0))
            .unwrap()
            .mine()
            .unwrap();
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|rule| rule.support_rule() > 0));
        assert_supports_match_scan(&data, &rules);
    }
}

#[test]
fn test_per_class_rule_support() {
    let data = two_attribute();
    let config = MiningConfig::new(0.6, 0.0).with_support_scope(SupportScope::PerClass);
    let rules = ClosedMiner::new(&data, &config).unwrap().mine().unwrap();

    // both classes need two occurrences
    assert!(!rules.is_empty());
    assert!(rules.iter().all(|rule| rule.support_rule() >= 2));
    assert!(find(&rules, &[3], Y).is_some());
}

#[test]
fn test_global_rule_support() {
    let data = two_attribute();
    // 0.4 of 5 instances is 2
    let rules = ClosedMiner::new(&data, &MiningConfig::new(0.4, 0.3))
        .unwrap()
        .mine()
        .unwrap();

    // {2} and {3} are frequent but meet X only once
    assert!(find(&rules, &[2], X).is_none());
    assert!(find(&rules, &[2], Y).is_none());
    assert!(find(&rules, &[3], X).is_none());

    let mut found: Vec<(Vec<usize>, usize)> = rules
        .iter()
        .map(|rule| (rule.antecedent().items().to_vec(), rule.class()))
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![(vec![0], X), (vec![1], Y), (vec![1, 3], Y), (vec![3], Y)]
    );
    assert!(rules.iter().all(|rule| rule.support_rule() >= 2));
}

#[test]
fn test_closures_exceed_length_cap() {
    let data = EncodedDataset::from_rows(
        &[vec![0, 1, 2], vec![0, 1, 2], vec![3, 4, 5]],
        &[X, X, Y],
    )
    .unwrap();
    let config = MiningConfig::new(0.0, 0.0).with_max_antecedent_length(2);
    let rules = ClosedMiner::new(&data, &config).unwrap().mine().unwrap();

    // {0, 1} -> X is represented by its closure {0, 1, 2}
    let rule = find(&rules, &[0, 1, 2], X).expect("{0, 1, 2} -> X");
    assert_eq!(rule.support_rule(), 2);
    assert_eq!(rule.support_antecedent(), 2);
    assert!(find(&rules, &[3, 4, 5], Y).is_some());
    assert_eq!(rules.len(), 2);
}

#[test]
fn test_budget_exceeded() {
    let data = weather();
    let config = MiningConfig::new(0.0, 0.0).with_max_work(2);
    let mut miner = ClosedMiner::new(&data, &config).unwrap();

    let err = miner.mine().unwrap_err();
    assert_eq!(err, MiningError::BudgetExceeded { limit: 2, used: 3 });
}

#[test]
fn test_nothing_frequent() {
    let data = two_attribute();
    let mut miner = ClosedMiner::new(&data, &MiningConfig::new(0.9, 0.0)).unwrap();
    assert!(miner.closed_itemsets().unwrap().is_empty());
    assert!(miner.mine().unwrap().is_empty());
}
