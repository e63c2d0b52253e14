use rust_decimal::Decimal;

/// Wasted units as a percentage of all units handled, rounded to 2 places.
///
/// `None` when nothing was sold or wasted (the percentage is undefined), or
/// when the counts overflow `Decimal`.
pub fn waste_pct(sold: Decimal, wasted: Decimal) -> Option<Decimal> {
    let total = sold.checked_add(wasted)?;
    if total <= Decimal::ZERO {
        return None;
    }
    let pct = wasted
        .checked_div(total)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(pct.round_dp(2))
}

/// Signed week-over-week change in single-origin mix %. Not clamped.
pub fn mix_improvement(previous_pct: Decimal, current_pct: Decimal) -> Decimal {
    current_pct - previous_pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_waste_pct() {
        assert_eq!(waste_pct(dec!(80), dec!(20)), Some(dec!(20.00)));
        assert_eq!(waste_pct(dec!(60), dec!(20)), Some(dec!(25.00)));
        assert_eq!(waste_pct(dec!(0), dec!(5)), Some(dec!(100)));
        assert_eq!(waste_pct(dec!(5), dec!(0)), Some(dec!(0)));
    }

    #[test]
    fn test_waste_pct_rounds_to_two_places() {
        assert_eq!(waste_pct(dec!(2), dec!(1)), Some(dec!(33.33)));
        assert_eq!(waste_pct(dec!(1), dec!(2)), Some(dec!(66.67)));
    }

    #[test]
    fn test_waste_pct_undefined_without_activity() {
        assert_eq!(waste_pct(dec!(0), dec!(0)), None);
    }

    #[test]
    fn test_waste_pct_overflow_is_none() {
        assert_eq!(waste_pct(Decimal::MAX, Decimal::MAX), None);
        assert_eq!(waste_pct(Decimal::MAX, dec!(0)), Some(dec!(0)));
    }

    #[test]
    fn test_mix_improvement_is_signed() {
        assert_eq!(mix_improvement(dec!(30), dec!(45)), dec!(15));
        assert_eq!(mix_improvement(dec!(45), dec!(30)), dec!(-15));
    }
}
