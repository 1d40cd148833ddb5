use roaring::RoaringBitmap;

/// Set of instance indices with its cardinality cached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tidset {
    bits: RoaringBitmap,
    support: usize,
}

impl Tidset {
    pub fn new(bits: RoaringBitmap) -> Self {
        let support = bits.len() as usize;
        Self { bits, support }
    }

    pub fn support(&self) -> usize {
        self.support
    }

    pub fn is_empty(&self) -> bool {
        self.support == 0
    }

    pub fn contains(&self, tid: u32) -> bool {
        self.bits.contains(tid)
    }

    pub fn intersect(&self, other: &Tidset) -> Tidset {
        Tidset::new(&self.bits & &other.bits)
    }

    /// `|self ∩ other|` without materialising the intersection.
    pub fn intersection_len(&self, other: &Tidset) -> usize {
        self.bits.intersection_len(&other.bits) as usize
    }

    pub fn is_subset(&self, other: &Tidset) -> bool {
        self.bits.is_subset(&other.bits)
    }

    /// Bucket key: sum of the ids. Equal tidsets always share a key.
    pub fn tid_sum(&self) -> u64 {
        self.bits.iter().map(u64::from).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter()
    }
}

impl FromIterator<u32> for Tidset {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Tidset::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_keeps_cached_support() {
        let a: Tidset = [0, 1, 3, 4].into_iter().collect();
        let b: Tidset = [1, 2, 4].into_iter().collect();
        let both = a.intersect(&b);

        assert_eq!(a.support(), 4);
        assert_eq!(both.support(), 2);
        assert_eq!(both.iter().collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(a.intersection_len(&b), 2);
        assert!(both.is_subset(&a));
        assert!(!a.is_subset(&b));
        assert_eq!(both.tid_sum(), 5);
        assert!(both.contains(4) && !both.contains(0));
    }
}
