//! Billing arithmetic and recomputation rules.
//!
//! Bills store computed amounts, never live tariff references: the amount is
//! fixed at creation or at the update that last touched usage or tariff, and
//! tariff edits are never retroactive.

use rust_decimal::{Decimal, RoundingStrategy};

/// Bill amount for a usage reading under a tariff rate, rounded half-up to
/// two decimal places.
pub fn compute_amount(usage_kwh: Decimal, rate_per_kwh: Decimal) -> Decimal {
    (usage_kwh * rate_per_kwh).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Where a partial bill update sources the rate for recomputation, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeSource {
    /// Neither usage nor tariff supplied; the stored amount stands.
    None,
    /// Usage changed under the bill's existing tariff. Its rate is reused
    /// even if the tariff has been deactivated since the bill was issued.
    ExistingTariff,
    /// The bill moves to a new tariff, which must exist and be active.
    NewTariff(i64),
}

/// Amounts are recomputed only when the update explicitly supplies a tariff
/// or a usage reading; a status-only or due-date-only update never changes
/// the amount.
pub fn recompute_source(
    new_tariff_id: Option<i64>,
    new_usage_kwh: Option<Decimal>,
) -> RecomputeSource {
    match (new_tariff_id, new_usage_kwh) {
        (Some(tariff_id), _) => RecomputeSource::NewTariff(tariff_id),
        (None, Some(_)) => RecomputeSource::ExistingTariff,
        (None, None) => RecomputeSource::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn amount_is_usage_times_rate() {
        assert_eq!(compute_amount(d("120"), d("0.50")), d("60.00"));
        assert_eq!(compute_amount(d("200"), d("0.50")), d("100.00"));
    }

    #[test]
    fn amount_rounds_half_away_from_zero() {
        assert_eq!(compute_amount(d("100.125"), d("1")), d("100.13"));
        assert_eq!(compute_amount(d("33.335"), d("1")), d("33.34"));
    }

    #[test]
    fn amount_handles_four_decimal_rates() {
        // 153.20 kWh at 0.1785 per kWh is 27.3462, billed as 27.35.
        assert_eq!(compute_amount(d("153.20"), d("0.1785")), d("27.35"));
    }

    #[test]
    fn zero_usage_bills_zero() {
        assert_eq!(compute_amount(Decimal::ZERO, d("0.9999")), Decimal::ZERO);
    }

    #[test]
    fn status_only_update_skips_recompute() {
        assert_eq!(recompute_source(None, None), RecomputeSource::None);
    }

    #[test]
    fn usage_change_reuses_existing_tariff() {
        assert_eq!(
            recompute_source(None, Some(d("200"))),
            RecomputeSource::ExistingTariff
        );
    }

    #[test]
    fn tariff_change_wins_over_usage_change() {
        assert_eq!(
            recompute_source(Some(7), Some(d("200"))),
            RecomputeSource::NewTariff(7)
        );
        assert_eq!(recompute_source(Some(7), None), RecomputeSource::NewTariff(7));
    }
}
