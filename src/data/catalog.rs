use std::collections::HashMap;

use super::dataset::{ClassId, EncodedDataset, Item};
use crate::error::DatasetError;
use crate::rules::Rule;

/// Maps nominal `(attribute, value)` pairs and class labels to global ids.
///
/// Item ids are assigned attribute by attribute in first-seen order; class
/// ids follow after the last item id so the two ranges never overlap.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    attributes: Vec<String>,
    items: Vec<(usize, String)>,
    classes: Vec<String>,
}

impl ItemCatalog {
    /// Encode nominal rows and labels into a catalog plus dataset.
    pub fn encode<S: AsRef<str>>(
        attributes: &[S],
        rows: &[Vec<S>],
        labels: &[S],
    ) -> Result<(Self, EncodedDataset), DatasetError> {
        let width = attributes.len();
        let mut lookup: Vec<HashMap<&str, Item>> = vec![HashMap::new(); width];
        let mut items = Vec::new();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DatasetError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    got: row.len(),
                });
            }
        }

        for attribute in 0..width {
            for row in rows {
                let value = row[attribute].as_ref();
                if !lookup[attribute].contains_key(value) {
                    lookup[attribute].insert(value, items.len());
                    items.push((attribute, value.to_string()));
                }
            }
        }

        let mut class_lookup: HashMap<&str, ClassId> = HashMap::new();
        let mut classes = Vec::new();
        for label in labels {
            let label = label.as_ref();
            if !class_lookup.contains_key(label) {
                class_lookup.insert(label, items.len() + classes.len());
                classes.push(label.to_string());
            }
        }

        let encoded: Vec<Vec<Item>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(attribute, value)| lookup[attribute][value.as_ref()])
                    .collect()
            })
            .collect();
        let class_labels: Vec<ClassId> = labels
            .iter()
            .map(|label| class_lookup[label.as_ref()])
            .collect();

        let dataset = EncodedDataset::from_rows(&encoded, &class_labels)?;
        let catalog = Self {
            attributes: attributes.iter().map(|a| a.as_ref().to_string()).collect(),
            items,
            classes,
        };
        Ok((catalog, dataset))
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Id of `attribute=value`, if that pair was seen.
    pub fn item(&self, attribute: &str, value: &str) -> Option<Item> {
        let attr_idx = self.attributes.iter().position(|a| a == attribute)?;
        self.items
            .iter()
            .position(|(idx, v)| *idx == attr_idx && v == value)
    }

    pub fn class(&self, label: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c == label)
            .map(|pos| self.items.len() + pos)
    }

    /// `attribute=value` rendering of an item id.
    pub fn describe_item(&self, item: Item) -> Option<String> {
        let (attribute, value) = self.items.get(item)?;
        Some(format!("{}={}", self.attributes[*attribute], value))
    }

    pub fn describe_class(&self, class: ClassId) -> Option<&str> {
        let pos = class.checked_sub(self.items.len())?;
        self.classes.get(pos).map(String::as_str)
    }

    /// Human readable `a=x, b=y -> label` form of a rule.
    pub fn describe_rule(&self, rule: &Rule) -> String {
        let lhs: Vec<String> = rule
            .antecedent()
            .items()
            .iter()
            .map(|&item| {
                self.describe_item(item)
                    .unwrap_or_else(|| format!("#{item}"))
            })
            .collect();
        let rhs = self
            .describe_class(rule.class())
            .map_or_else(|| format!("#{}", rule.class()), str::to_string);
        format!("{} -> {}", lhs.join(", "), rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_assigns_disjoint_ids() {
        let (catalog, data) = ItemCatalog::encode(
            &["outlook", "windy"],
            &[
                vec!["sunny", "no"],
                vec!["rain", "yes"],
                vec!["sunny", "yes"],
            ],
            &["play", "stay", "play"],
        )
        .unwrap();

        assert_eq!(catalog.num_items(), 4);
        assert_eq!(catalog.item("outlook", "sunny"), Some(0));
        assert_eq!(catalog.item("outlook", "rain"), Some(1));
        assert_eq!(catalog.item("windy", "no"), Some(2));
        assert_eq!(catalog.item("windy", "maybe"), None);
        assert_eq!(catalog.class("play"), Some(4));
        assert_eq!(catalog.class("stay"), Some(5));

        assert_eq!(data.class_ids(), &[4, 5]);
        assert_eq!(data.instance_items(1), &[1, 3]);
        assert_eq!(catalog.describe_item(3).as_deref(), Some("windy=yes"));
        assert_eq!(catalog.describe_class(5), Some("stay"));
        assert_eq!(catalog.describe_class(2), None);
    }

    #[test]
    fn test_encode_rejects_ragged_rows() {
        let err = ItemCatalog::encode(&["a", "b"], &[vec!["x"]], &["c"]).unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { row: 0, .. }));
    }
}
