use crate::error::MiningError;

/// Counts work units spent by one mining run against an optional limit.
///
/// A unit is one evaluated candidate, one emitted pattern or one tidset
/// intersection, depending on the miner.
#[derive(Debug, Clone)]
pub struct MiningBudget {
    max_units: usize,
    used_units: usize,
}

impl MiningBudget {
    pub fn new(max_units: usize) -> Self {
        Self {
            max_units,
            used_units: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn from_limit(limit: Option<usize>) -> Self {
        limit.map_or_else(Self::unlimited, Self::new)
    }

    /// Spend `units`, failing once the total would pass the limit.
    pub fn charge(&mut self, units: usize) -> Result<(), MiningError> {
        let used = self.used_units.saturating_add(units);
        if used > self.max_units {
            return Err(MiningError::BudgetExceeded {
                limit: self.max_units,
                used,
            });
        }
        self.used_units = used;
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used_units
    }

    pub fn remaining(&self) -> usize {
        self.max_units.saturating_sub(self.used_units)
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_units == usize::MAX
    }
}

impl Default for MiningBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}
