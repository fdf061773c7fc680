//! Property-based tests for the change calculator.
//!
//! These verify the breakdown invariants for any balance and any valid
//! denomination set, not just the canonical default.

use cashew_core::change::{breakdown, Denominations};
use cashew_core::money::Money;
use proptest::prelude::*;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a non-negative balance up to $100,000.00 in cents.
fn arb_balance() -> impl Strategy<Value = Money> {
    (0i64..=10_000_000i64).prop_map(Money::from_cents)
}

/// Generate a valid denomination set (1 to 8 positive values, pre-dedup).
fn arb_denominations() -> impl Strategy<Value = Denominations> {
    prop::collection::vec(1i64..=5000, 1..8).prop_map(|values| {
        Denominations::new(values).expect("strategy only yields positive non-empty sets")
    })
}

// =============================================================================
// Breakdown Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Dispensed change never exceeds the truncated balance, and what cannot
    /// be dispensed is smaller than the smallest denomination.
    #[test]
    fn dispensed_bounded_by_truncated_balance(
        balance in arb_balance(),
        denoms in arb_denominations(),
    ) {
        let change = breakdown(balance, &denoms);
        let dispensed = change.total_units();
        let truncated = balance.dollars();

        prop_assert!(dispensed <= truncated);
        prop_assert!(truncated - dispensed < denoms.smallest());
    }

    /// Every reported count is positive; zero counts never appear.
    #[test]
    fn only_nonzero_counts_reported(
        balance in arb_balance(),
        denoms in arb_denominations(),
    ) {
        let change = breakdown(balance, &denoms);
        for (denomination, count) in change.counts() {
            prop_assert!(*count > 0, "zero count for denomination {denomination}");
            prop_assert!(denoms.as_slice().contains(denomination));
        }
    }

    /// Pure function: the same inputs always yield the same breakdown.
    #[test]
    fn breakdown_is_deterministic(
        balance in arb_balance(),
        denoms in arb_denominations(),
    ) {
        prop_assert_eq!(breakdown(balance, &denoms), breakdown(balance, &denoms));
    }

    /// The cents part of the balance never influences the result.
    #[test]
    fn subunit_cents_are_ignored(
        units in 0i64..=100_000,
        cents in 0i64..=99,
        denoms in arb_denominations(),
    ) {
        let exact = breakdown(Money::from_cents(units * 100), &denoms);
        let fractional = breakdown(Money::from_cents(units * 100 + cents), &denoms);
        prop_assert_eq!(exact, fractional);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The default set contains 1, so greedy change over it is always exact.
    #[test]
    fn default_set_dispenses_exactly(
        balance in arb_balance(),
    ) {
        let change = breakdown(balance, &Denominations::default());
        prop_assert_eq!(change.total_units(), balance.dollars());
    }

    /// With the default canonical set, greedy is optimal; spot-check that
    /// the breakdown never uses more pieces than the balance in units
    /// (trivial upper bound) and reconstructs the truncated balance.
    #[test]
    fn default_set_reconstructs_balance(
        units in 0i64..=50_000,
    ) {
        let change = breakdown(Money::from_major_minor(units, 0), &Denominations::default());
        let reconstructed: i64 = change
            .counts()
            .iter()
            .map(|(denom, count)| denom * count)
            .sum();
        prop_assert_eq!(reconstructed, units);

        let pieces: i64 = change.counts().values().sum();
        prop_assert!(pieces <= units.max(1));
    }
}
