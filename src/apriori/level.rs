use crate::data::Item;

/// Candidates of one level, stored flat.
///
/// Every antecedent in a level has the same length, so the items of
/// candidate `i` live at `items[i * len..(i + 1) * len]`.
#[derive(Debug, Clone)]
pub struct CandidateLevel {
    items: Vec<Item>,
    classes: Vec<usize>,
    pub antecedent_len: usize,
}

impl CandidateLevel {
    pub fn new(antecedent_len: usize) -> Self {
        Self {
            items: Vec::new(),
            classes: Vec::new(),
            antecedent_len,
        }
    }

    pub fn with_capacity(antecedent_len: usize, estimated_candidates: usize) -> Self {
        Self {
            items: Vec::with_capacity(estimated_candidates * antecedent_len),
            classes: Vec::with_capacity(estimated_candidates),
            antecedent_len,
        }
    }

    /// Append a sorted antecedent for class index `class`.
    pub fn push(&mut self, antecedent: &[Item], class: usize) -> usize {
        debug_assert_eq!(antecedent.len(), self.antecedent_len);
        debug_assert!(antecedent.windows(2).all(|w| w[0] < w[1]));
        self.items.extend_from_slice(antecedent);
        self.classes.push(class);
        self.classes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn antecedent(&self, idx: usize) -> &[Item] {
        let start = idx * self.antecedent_len;
        &self.items[start..start + self.antecedent_len]
    }

    pub fn class(&self, idx: usize) -> usize {
        self.classes[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Item], usize)> {
        (0..self.len()).map(move |idx| (self.antecedent(idx), self.classes[idx]))
    }
}
