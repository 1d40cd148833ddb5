//! Fixtures shared by the unit tests.

use crate::data::EncodedDataset;
use crate::rules::Rule;

pub const X: usize = 10;
pub const Y: usize = 11;

/// Attributes A (items 0/1) and B (items 2/3), classes X and Y.
pub fn two_attribute() -> EncodedDataset {
    EncodedDataset::from_rows(
        &[vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![1, 3]],
        &[X, X, Y, Y, Y],
    )
    .unwrap()
}

pub const NO: usize = 20;
pub const YES: usize = 21;

/// Ten instances, four nominal attributes, two classes.
///
/// outlook: sunny=0 overcast=1 rain=2, temperature: hot=3 mild=4 cool=5,
/// humidity: high=6 normal=7, windy: false=8 true=9.
pub fn weather() -> EncodedDataset {
    EncodedDataset::from_rows(
        &[
            vec![0, 3, 6, 8],
            vec![0, 3, 6, 9],
            vec![1, 3, 6, 8],
            vec![2, 4, 6, 8],
            vec![2, 5, 7, 8],
            vec![2, 5, 7, 9],
            vec![1, 5, 7, 9],
            vec![0, 4, 6, 8],
            vec![0, 5, 7, 8],
            vec![2, 4, 7, 8],
        ],
        &[NO, NO, YES, YES, YES, NO, YES, NO, YES, YES],
    )
    .unwrap()
}

/// Check every counter of every rule against a full scan.
pub fn assert_supports_match_scan(dataset: &EncodedDataset, rules: &[Rule]) {
    for rule in rules {
        let class_idx = dataset.class_index(rule.class()).unwrap();
        let (antecedent, with_class) = dataset.count_rule(rule.antecedent().items(), class_idx);
        assert_eq!(rule.support_antecedent(), antecedent, "{rule}");
        assert_eq!(rule.support_rule(), with_class, "{rule}");
        assert_eq!(
            rule.support_class(),
            dataset.frequency_by_class()[class_idx],
            "{rule}"
        );
        assert!(rule.support_rule() <= rule.support_antecedent().min(rule.support_class()));
        assert!(rule.support_antecedent() <= dataset.len());
    }
}

pub fn find<'r>(rules: &'r [Rule], antecedent: &[usize], class: usize) -> Option<&'r Rule> {
    rules
        .iter()
        .find(|rule| rule.antecedent().items() == antecedent && rule.class() == class)
}
