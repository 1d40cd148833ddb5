use std::collections::{BTreeSet, HashMap};

use approx::assert_relative_eq;
use carmine::{
    mine_rules, Algorithm, ClosedMiner, EncodedDataset, ItemCatalog, LevelPolicy, MiningConfig,
    MiningJob, Preset, Rule, SupportScope,
};
use proptest::prelude::*;

const LEVELWISE: Algorithm = Algorithm::Levelwise(LevelPolicy::Frequent);
const ALL: [Algorithm; 3] = [LEVELWISE, Algorithm::Tree, Algorithm::Closed];

type RuleKey = (Vec<usize>, usize, usize, usize);

fn keys(rules: &[Rule]) -> BTreeSet<RuleKey> {
    rules
        .iter()
        .map(|rule| {
            (
                rule.antecedent().items().to_vec(),
                rule.class(),
                rule.support_rule(),
                rule.support_antecedent(),
            )
        })
        .collect()
}

fn contains_all(row: &[usize], items: &[usize]) -> bool {
    items.iter().all(|item| row.contains(item))
}

/// Count `(antecedent, antecedent and class)` with a plain scan.
fn scan(data: &EncodedDataset, antecedent: &[usize], class: usize) -> (usize, usize) {
    let mut counts = (0, 0);
    for idx in 0..data.len() {
        if contains_all(data.instance_items(idx), antecedent) {
            counts.0 += 1;
            if data.class_id(data.label(idx)) == class {
                counts.1 += 1;
            }
        }
    }
    counts
}

/// Random categorical data: attribute `a` takes items `a * values + v`,
/// classes are numbered from 100.
fn dataset_strategy() -> impl Strategy<Value = EncodedDataset> {
    (1usize..=4, 2usize..=3, 1usize..=3).prop_flat_map(|(attributes, values, classes)| {
        prop::collection::vec(
            (prop::collection::vec(0..values, attributes), 0..classes),
            1..=14,
        )
        .prop_map(move |instances| {
            let rows: Vec<Vec<usize>> = instances
                .iter()
                .map(|(row, _)| {
                    row.iter()
                        .enumerate()
                        .map(|(attr, &value)| attr * values + value)
                        .collect()
                })
                .collect();
            let labels: Vec<usize> = instances.iter().map(|&(_, class)| 100 + class).collect();
            EncodedDataset::from_rows(&rows, &labels).unwrap()
        })
    })
}

fn two_attribute() -> EncodedDataset {
    EncodedDataset::from_rows(
        &[vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![1, 3]],
        &[10, 10, 11, 11, 11],
    )
    .unwrap()
}

#[test]
fn test_two_attribute_every_preset() {
    let data = two_attribute();
    for preset in Preset::ALL {
        let config = preset.configure(MiningConfig::new(0.2, 0.6));
        let rules = MiningJob::from_preset(&data, preset, config).run().unwrap();
        if preset == Preset::Acac {
            assert!(rules.iter().all(|rule| rule.all_confidence().is_some()));
        }

        let rule = rules
            .iter()
            .find(|rule| rule.antecedent().items() == [3] && rule.class() == 11)
            .unwrap_or_else(|| panic!("{preset} misses {{3}} -> 11"));
        assert_eq!(rule.support_rule(), 2);
        assert_eq!(rule.support_antecedent(), 3);
        assert_eq!(rule.support_class(), 3);
        assert_relative_eq!(rule.confidence(), 2.0 / 3.0);
    }
}

#[test]
fn test_empty_dataset() {
    let data = EncodedDataset::from_rows(&[], &[]).unwrap();
    for algorithm in ALL {
        let rules = mine_rules(&data, algorithm, &MiningConfig::new(0.0, 0.0)).unwrap();
        assert!(rules.is_empty());
    }
}

#[test]
fn test_catalog_round_trip() {
    let attributes = ["outlook", "windy"];
    let rows = [
        vec!["sunny", "false"],
        vec!["sunny", "true"],
        vec!["rain", "false"],
        vec!["rain", "false"],
    ];
    let labels = ["no", "no", "yes", "yes"];
    let (catalog, data) = ItemCatalog::encode(&attributes, &rows, &labels).unwrap();

    let rules = mine_rules(&data, Algorithm::Tree, &MiningConfig::new(0.5, 1.0)).unwrap();
    let described: BTreeSet<String> = rules.iter().map(|rule| catalog.describe_rule(rule)).collect();
    assert!(described.contains("outlook=rain -> yes"), "{described:?}");
    assert!(described.contains("outlook=sunny -> no"), "{described:?}");
}

#[test]
fn test_rule_serde() {
    let data = two_attribute();
    let rules = mine_rules(&data, Algorithm::Closed, &MiningConfig::new(0.2, 0.6)).unwrap();
    let json = serde_json::to_string(&rules).unwrap();
    let back: Vec<Rule> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rules);
}

/// Every rule is represented by its closure with identical counters.
fn assert_closed_cover(rules: &[Rule], closed: &[Rule]) -> Result<(), TestCaseError> {
    for rule in rules {
        let covered = closed.iter().any(|other| {
            other.class() == rule.class()
                && other.support_antecedent() == rule.support_antecedent()
                && other.support_rule() == rule.support_rule()
                && rule.antecedent().is_subset_of(other.antecedent().items())
        });
        prop_assert!(covered, "no closed rule covers {}", rule);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_supports_match_scan(
        data in dataset_strategy(),
        min_support in 0.0f64..0.6,
        min_confidence in 0.0f64..1.0,
        per_class in any::<bool>(),
    ) {
        let scope = if per_class { SupportScope::PerClass } else { SupportScope::Global };
        let config = MiningConfig::new(min_support, min_confidence).with_support_scope(scope);
        let thresholds = config.thresholds(&data);
        for algorithm in ALL {
            let rules = mine_rules(&data, algorithm, &config).unwrap();
            let mut seen = BTreeSet::new();
            for rule in &rules {
                let (antecedent, with_class) = scan(&data, rule.antecedent().items(), rule.class());
                prop_assert_eq!(rule.support_antecedent(), antecedent);
                prop_assert_eq!(rule.support_rule(), with_class);
                prop_assert!(rule.support_rule() > 0);
                let class_idx = data.class_index(rule.class()).unwrap();
                prop_assert!(
                    rule.support_rule() >= thresholds.for_class(class_idx),
                    "{:?} emitted {} below its threshold",
                    algorithm,
                    rule
                );
                prop_assert!(rule.confidence() >= min_confidence);
                prop_assert!(seen.insert((rule.antecedent().clone(), rule.class())));
            }
        }
    }

    #[test]
    fn prop_levelwise_and_tree_agree(
        data in dataset_strategy(),
        min_support in 0.0f64..0.6,
        min_confidence in 0.0f64..1.0,
        per_class in any::<bool>(),
    ) {
        let scope = if per_class { SupportScope::PerClass } else { SupportScope::Global };
        let config = MiningConfig::new(min_support, min_confidence).with_support_scope(scope);
        let levelwise = mine_rules(&data, LEVELWISE, &config).unwrap();
        let tree = mine_rules(&data, Algorithm::Tree, &config).unwrap();
        prop_assert_eq!(keys(&levelwise), keys(&tree));
    }

    #[test]
    fn prop_closed_rules_cover_levelwise(
        data in dataset_strategy(),
        min_support in 0.0f64..0.6,
        min_confidence in 0.0f64..1.0,
    ) {
        let config = MiningConfig::new(min_support, min_confidence);
        let levelwise = mine_rules(&data, LEVELWISE, &config).unwrap();
        let closed = mine_rules(&data, Algorithm::Closed, &config).unwrap();

        assert_closed_cover(&levelwise, &closed)?;
    }

    #[test]
    fn prop_closed_itemsets_are_closed(data in dataset_strategy(), min_support in 0.0f64..0.6) {
        let mut miner = ClosedMiner::new(&data, &MiningConfig::new(min_support, 0.0)).unwrap();
        let itemsets = miner.closed_itemsets().unwrap();

        let mut by_items: HashMap<Vec<usize>, usize> = HashMap::new();
        for itemset in &itemsets {
            let items = itemset.items.items();
            let rows: Vec<&[usize]> = (0..data.len())
                .map(|idx| data.instance_items(idx))
                .filter(|row| contains_all(row, items))
                .collect();
            prop_assert_eq!(rows.len(), itemset.support());
            // no item outside the set occurs in every supporting row
            for &item in data.item_frequencies().keys() {
                if !items.contains(&item) {
                    prop_assert!(!rows.iter().all(|row| row.contains(&item)));
                }
            }
            prop_assert!(by_items.insert(items.to_vec(), itemset.support()).is_none());
        }
    }

    #[test]
    fn prop_raising_thresholds_never_adds_rules(
        data in dataset_strategy(),
        low_support in 0.0f64..0.5,
        support_step in 0.0f64..0.5,
        low_confidence in 0.0f64..0.9,
        confidence_step in 0.0f64..0.1,
    ) {
        let low = MiningConfig::new(low_support, low_confidence);
        let high = MiningConfig::new(low_support + support_step, low_confidence + confidence_step);
        for algorithm in ALL {
            let loose = keys(&mine_rules(&data, algorithm, &low).unwrap());
            let strict = keys(&mine_rules(&data, algorithm, &high).unwrap());
            prop_assert!(strict.is_subset(&loose), "{:?}", algorithm);
        }
    }

    #[test]
    fn prop_mining_is_deterministic(data in dataset_strategy(), min_support in 0.0f64..0.6) {
        let config = MiningConfig::new(min_support, 0.3);
        for preset in Preset::ALL {
            let job = MiningJob::from_preset(&data, preset, config.clone());
            prop_assert_eq!(job.run().unwrap(), job.run().unwrap());
        }
    }

    #[test]
    fn prop_antecedent_length_cap(data in dataset_strategy(), max_len in 1usize..=3) {
        let config = MiningConfig::new(0.0, 0.0).with_max_antecedent_length(max_len);
        let levelwise = mine_rules(&data, LEVELWISE, &config).unwrap();
        let tree = mine_rules(&data, Algorithm::Tree, &config).unwrap();
        prop_assert!(levelwise.iter().all(|rule| rule.antecedent().len() <= max_len));
        prop_assert_eq!(keys(&levelwise), keys(&tree));

        // closures may be longer than the cap but still cover every rule
        let closed = mine_rules(&data, Algorithm::Closed, &config).unwrap();
        assert_closed_cover(&levelwise, &closed)?;
    }
}
