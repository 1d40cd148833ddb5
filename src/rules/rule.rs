use std::fmt;

use serde::{Deserialize, Serialize};

use super::Antecedent;
use crate::data::ClassId;

/// Class-association rule `antecedent -> class` with its support counters.
///
/// Invariant: `support_rule <= min(support_antecedent, support_class)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    antecedent: Antecedent,
    class: ClassId,
    support_antecedent: usize,
    support_class: usize,
    support_rule: usize,
    all_confidence: Option<f64>,
}

impl Rule {
    pub fn new(
        antecedent: Antecedent,
        class: ClassId,
        support_antecedent: usize,
        support_class: usize,
        support_rule: usize,
    ) -> Self {
        debug_assert!(support_rule <= support_antecedent.min(support_class));
        Self {
            antecedent,
            class,
            support_antecedent,
            support_class,
            support_rule,
            all_confidence: None,
        }
    }

    pub fn with_all_confidence(mut self, all_confidence: f64) -> Self {
        self.all_confidence = Some(all_confidence);
        self
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn support_antecedent(&self) -> usize {
        self.support_antecedent
    }

    pub fn support_class(&self) -> usize {
        self.support_class
    }

    pub fn support_rule(&self) -> usize {
        self.support_rule
    }

    /// All-confidence recorded by the level-wise miner, when tracked.
    pub fn all_confidence(&self) -> Option<f64> {
        self.all_confidence
    }

    /// `support_rule / support_antecedent`, 0 for an unsupported antecedent.
    pub fn confidence(&self) -> f64 {
        confidence(self.support_rule, self.support_antecedent)
    }

    /// Rule support as a fraction of `num_instances`.
    pub fn support_fraction(&self, num_instances: usize) -> f64 {
        if num_instances == 0 {
            0.0
        } else {
            self.support_rule as f64 / num_instances as f64
        }
    }

    /// Pearson chi-square of the 2x2 table antecedent x class.
    pub fn chi_square(&self, num_instances: usize) -> f64 {
        let n = num_instances as f64;
        let (a, c, r) = (
            self.support_antecedent as f64,
            self.support_class as f64,
            self.support_rule as f64,
        );
        if n == 0.0 {
            return 0.0;
        }
        let observed = [r, a - r, c - r, n - a - c + r];
        let expected = [
            a * c / n,
            a * (n - c) / n,
            (n - a) * c / n,
            (n - a) * (n - c) / n,
        ];
        observed
            .iter()
            .zip(expected.iter())
            .filter(|(_, &e)| e > 0.0)
            .map(|(&o, &e)| (o - e) * (o - e) / e)
            .sum()
    }

    /// Largest chi-square any rule with the same antecedent and class
    /// supports could reach.
    pub fn max_chi_square(&self, num_instances: usize) -> f64 {
        let n = num_instances as f64;
        let (a, c) = (self.support_antecedent as f64, self.support_class as f64);
        if a <= 0.0 || c <= 0.0 || a >= n || c >= n {
            return 0.0;
        }
        let e = 1.0 / (a * c)
            + 1.0 / (a * (n - c))
            + 1.0 / ((n - a) * c)
            + 1.0 / ((n - a) * (n - c));
        let gap = a.min(c) - a * c / n;
        gap * gap * n * e
    }
}

pub(crate) fn confidence(support_rule: usize, support_antecedent: usize) -> f64 {
    if support_antecedent == 0 {
        0.0
    } else {
        support_rule as f64 / support_antecedent as f64
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (rule={}, antecedent={}, class={}, conf={:.3})",
            self.antecedent,
            self.class,
            self.support_rule,
            self.support_antecedent,
            self.support_class,
            self.confidence()
        )
    }
}
