//! # Change Calculator
//!
//! Greedy breakdown of a cash balance into denomination counts.
//!
//! Change is handed out in whole currency units: the fractional part of the
//! balance is dropped, not rounded, before the greedy walk. Greedy selection
//! is optimal for canonical denomination sets (which the default set is);
//! for arbitrary sets it is merely correct, never optimal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

/// Default denomination set, largest to smallest.
///
/// Configured once at engine construction; this is only the fallback.
pub const DEFAULT_DENOMINATIONS: [i64; 10] = [2000, 500, 200, 100, 50, 20, 10, 5, 2, 1];

// =============================================================================
// Denominations
// =============================================================================

/// An ordered set of positive whole-unit denominations.
///
/// Construction normalizes: values are sorted descending and deduplicated,
/// so the greedy walk can iterate front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denominations(Vec<i64>);

impl Denominations {
    /// Builds a denomination set from arbitrary values.
    ///
    /// Rejects an empty list and any zero or negative value.
    pub fn new(mut values: Vec<i64>) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::Required {
                field: "denominations".to_string(),
            });
        }
        if values.iter().any(|v| *v <= 0) {
            return Err(ValidationError::MustBePositive {
                field: "denominations".to_string(),
            });
        }

        values.sort_unstable_by(|a, b| b.cmp(a));
        values.dedup();
        Ok(Denominations(values))
    }

    /// The denominations, descending.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// The smallest denomination in the set.
    pub fn smallest(&self) -> i64 {
        // Non-empty by construction
        self.0.last().copied().unwrap_or(1)
    }
}

impl Default for Denominations {
    fn default() -> Self {
        // DEFAULT_DENOMINATIONS is already sorted descending and unique
        Denominations(DEFAULT_DENOMINATIONS.to_vec())
    }
}

// =============================================================================
// Change Breakdown
// =============================================================================

/// Counts of each denomination handed back, keyed by denomination value.
///
/// Only denominations with a nonzero count appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeBreakdown(BTreeMap<i64, i64>);

impl ChangeBreakdown {
    /// The raw denomination → count mapping.
    pub fn counts(&self) -> &BTreeMap<i64, i64> {
        &self.0
    }

    /// Count for one denomination (zero when absent).
    pub fn count_of(&self, denomination: i64) -> i64 {
        self.0.get(&denomination).copied().unwrap_or(0)
    }

    /// True when no change is due.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of `denomination * count` over the breakdown, in whole units.
    pub fn total_units(&self) -> i64 {
        self.0.iter().map(|(denom, count)| denom * count).sum()
    }

    /// Iterates entries largest denomination first (display order).
    pub fn iter_desc(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.0.iter().rev().map(|(denom, count)| (*denom, *count))
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Greedily decomposes `balance` into denomination counts.
///
/// Pure: same inputs, same breakdown. The caller guarantees a non-negative
/// balance (the billing engine rejects underpayment before any change is
/// computed); a negative input simply yields an empty breakdown.
///
/// ## Example
/// ```rust
/// use cashew_core::change::{breakdown, Denominations};
/// use cashew_core::money::Money;
///
/// let change = breakdown(Money::from_cents(3780), &Denominations::default());
/// // 37.80 truncates to 37 = 20 + 10 + 5 + 2
/// assert_eq!(change.count_of(20), 1);
/// assert_eq!(change.count_of(10), 1);
/// assert_eq!(change.count_of(5), 1);
/// assert_eq!(change.count_of(2), 1);
/// assert_eq!(change.total_units(), 37);
/// ```
pub fn breakdown(balance: Money, denominations: &Denominations) -> ChangeBreakdown {
    // Whole units only; cents below 1 are dropped
    let mut remaining = balance.dollars();
    let mut counts = BTreeMap::new();

    for &denom in denominations.as_slice() {
        if remaining <= 0 {
            break;
        }
        let count = remaining / denom;
        if count > 0 {
            counts.insert(denom, count);
            remaining -= count * denom;
        }
    }

    ChangeBreakdown(counts)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_before_breaking_down() {
        let change = breakdown(Money::from_cents(3780), &Denominations::default());
        assert_eq!(change.count_of(20), 1);
        assert_eq!(change.count_of(10), 1);
        assert_eq!(change.count_of(5), 1);
        assert_eq!(change.count_of(2), 1);
        assert_eq!(change.counts().len(), 4);
        assert_eq!(change.total_units(), 37);
    }

    #[test]
    fn test_walks_several_denominations() {
        // 168 = 100 + 50 + 10 + 5 + 2 + 1
        let change = breakdown(Money::from_cents(16_800), &Denominations::default());
        assert_eq!(change.count_of(100), 1);
        assert_eq!(change.count_of(50), 1);
        assert_eq!(change.count_of(10), 1);
        assert_eq!(change.count_of(5), 1);
        assert_eq!(change.count_of(2), 1);
        assert_eq!(change.count_of(1), 1);
        assert_eq!(change.total_units(), 168);
    }

    #[test]
    fn test_zero_and_subunit_balances_yield_nothing() {
        let denoms = Denominations::default();
        assert!(breakdown(Money::zero(), &denoms).is_empty());
        // 0.99 truncates to 0
        assert!(breakdown(Money::from_cents(99), &denoms).is_empty());
    }

    #[test]
    fn test_repeated_denominations_counted() {
        // 6000 = 2000 × 3
        let change = breakdown(Money::from_cents(600_000), &Denominations::default());
        assert_eq!(change.count_of(2000), 3);
        assert_eq!(change.counts().len(), 1);
    }

    #[test]
    fn test_skips_denominations_that_do_not_fit() {
        let denoms = Denominations::new(vec![100, 7]).unwrap();
        // 25 → no 100s, three 7s, remainder 4 undispensable
        let change = breakdown(Money::from_cents(2500), &denoms);
        assert_eq!(change.count_of(100), 0);
        assert_eq!(change.count_of(7), 3);
        assert_eq!(change.total_units(), 21);
    }

    #[test]
    fn test_construction_normalizes() {
        let denoms = Denominations::new(vec![5, 100, 5, 20]).unwrap();
        assert_eq!(denoms.as_slice(), &[100, 20, 5]);
        assert_eq!(denoms.smallest(), 5);
    }

    #[test]
    fn test_construction_rejects_bad_sets() {
        assert!(Denominations::new(vec![]).is_err());
        assert!(Denominations::new(vec![100, 0]).is_err());
        assert!(Denominations::new(vec![-5]).is_err());
    }

    #[test]
    fn test_same_input_same_breakdown() {
        let denoms = Denominations::default();
        let balance = Money::from_cents(16_800);
        assert_eq!(breakdown(balance, &denoms), breakdown(balance, &denoms));
    }

    #[test]
    fn test_iter_desc_order() {
        let change = breakdown(Money::from_cents(16_800), &Denominations::default());
        let denoms: Vec<i64> = change.iter_desc().map(|(d, _)| d).collect();
        assert_eq!(denoms, vec![100, 50, 10, 5, 2, 1]);
    }
}
