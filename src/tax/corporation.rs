use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Small profits rate, for profits up to the lower limit
pub const SMALL_PROFITS_RATE: Decimal = dec!(0.19);

/// Main rate, for profits at or above the upper limit
pub const MAIN_RATE: Decimal = dec!(0.25);

/// Profit at or below which the small profits rate applies
pub const LOWER_LIMIT: Decimal = dec!(50000);

/// Profit from which the main rate applies in full
pub const UPPER_LIMIT: Decimal = dec!(250000);

/// Standard marginal relief fraction (3/200)
pub const MARGINAL_RELIEF_FRACTION: Decimal = dec!(0.015);

/// Cost of each extra pound of profit between the limits: the main rate
/// plus the relief withdrawn as profit rises
pub const MARGINAL_RELIEF_RATE: Decimal = dec!(0.265);

/// Corporation tax band a profit falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitBand {
    /// At or below the lower limit (including losses)
    SmallProfits,
    /// Strictly between the lower and upper limits
    MarginalRelief,
    /// At or above the upper limit
    Main,
}

impl ProfitBand {
    pub fn for_profit(profit: Decimal) -> Self {
        if profit <= LOWER_LIMIT {
            ProfitBand::SmallProfits
        } else if profit >= UPPER_LIMIT {
            ProfitBand::Main
        } else {
            ProfitBand::MarginalRelief
        }
    }

    /// Tax on the next pound of profit in this band
    pub fn marginal_rate(&self) -> Decimal {
        match self {
            ProfitBand::SmallProfits => SMALL_PROFITS_RATE,
            ProfitBand::MarginalRelief => MARGINAL_RELIEF_RATE,
            ProfitBand::Main => MAIN_RATE,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            ProfitBand::SmallProfits => "small profits",
            ProfitBand::MarginalRelief => "marginal relief",
            ProfitBand::Main => "main rate",
        }
    }
}

impl std::fmt::Display for ProfitBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Corporation tax due on a year's profit
pub fn corporation_tax(profit: Decimal) -> Decimal {
    if profit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let band = ProfitBand::for_profit(profit);
    let tax = match band {
        ProfitBand::SmallProfits => profit * SMALL_PROFITS_RATE,
        ProfitBand::Main => profit * MAIN_RATE,
        ProfitBand::MarginalRelief => profit * MAIN_RATE - marginal_relief(profit),
    };
    log::debug!("Corporation tax on {}: {} ({})", profit, tax, band);
    tax
}

/// Relief deducted from the main-rate charge between the limits
fn marginal_relief(profit: Decimal) -> Decimal {
    MARGINAL_RELIEF_FRACTION * (UPPER_LIMIT - profit)
}

/// Corporation tax as a share of profit. None when there is no profit.
pub fn effective_rate(profit: Decimal) -> Option<Decimal> {
    if profit > Decimal::ZERO {
        Some(corporation_tax(profit) / profit)
    } else {
        None
    }
}

pub fn marginal_rate(profit: Decimal) -> Decimal {
    ProfitBand::for_profit(profit).marginal_rate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn losses_are_not_taxed() {
        assert_eq!(corporation_tax(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(corporation_tax(dec!(-25000)), Decimal::ZERO);
    }

    #[test]
    fn small_profits_rate() {
        assert_eq!(corporation_tax(dec!(10000)), dec!(1900));
        assert_eq!(corporation_tax(dec!(50000)), dec!(9500));
    }

    #[test]
    fn main_rate() {
        assert_eq!(corporation_tax(dec!(250000)), dec!(62500));
        assert_eq!(corporation_tax(dec!(1000000)), dec!(250000));
    }

    #[test]
    fn marginal_relief_band() {
        // 100,000 x 25% - 3/200 x 150,000
        assert_eq!(corporation_tax(dec!(100000)), dec!(22750));
        assert_eq!(corporation_tax(dec!(86294.5)), dec!(19118.0425));
    }

    #[test]
    fn continuous_at_lower_limit() {
        // The marginal formula evaluated at the limit meets the small profits charge
        assert_eq!(
            LOWER_LIMIT * MAIN_RATE - marginal_relief(LOWER_LIMIT),
            LOWER_LIMIT * SMALL_PROFITS_RATE
        );
        let just_above = corporation_tax(dec!(50000.01));
        assert!(just_above > dec!(9500));
        assert!(just_above - dec!(9500) < dec!(0.01));
    }

    #[test]
    fn continuous_at_upper_limit() {
        assert_eq!(
            UPPER_LIMIT * MAIN_RATE - marginal_relief(UPPER_LIMIT),
            UPPER_LIMIT * MAIN_RATE
        );
        let just_below = corporation_tax(dec!(249999.99));
        assert!(dec!(62500) - just_below < dec!(0.01));
    }

    #[test]
    fn band_classification() {
        assert_eq!(ProfitBand::for_profit(dec!(-1)), ProfitBand::SmallProfits);
        assert_eq!(ProfitBand::for_profit(dec!(50000)), ProfitBand::SmallProfits);
        assert_eq!(ProfitBand::for_profit(dec!(50000.01)), ProfitBand::MarginalRelief);
        assert_eq!(ProfitBand::for_profit(dec!(249999.99)), ProfitBand::MarginalRelief);
        assert_eq!(ProfitBand::for_profit(dec!(250000)), ProfitBand::Main);
    }

    #[test]
    fn marginal_rates() {
        assert_eq!(marginal_rate(dec!(50000)), dec!(0.19));
        assert_eq!(marginal_rate(dec!(120000)), dec!(0.265));
        assert_eq!(marginal_rate(dec!(250000)), dec!(0.25));
    }

    #[test]
    fn effective_rate_needs_profit() {
        assert_eq!(effective_rate(Decimal::ZERO), None);
        assert_eq!(effective_rate(dec!(-10)), None);
        assert_eq!(effective_rate(dec!(40000)), Some(dec!(0.19)));
        assert_eq!(effective_rate(dec!(100000)), Some(dec!(0.2275)));
    }

    proptest! {
        #[test]
        fn prop_small_profits_taxed_at_19(pence in 0i64..=5_000_000) {
            let profit = Decimal::new(pence, 2);
            prop_assert_eq!(corporation_tax(profit), profit * dec!(0.19));
        }

        #[test]
        fn prop_main_rate_taxed_at_25(pence in 25_000_000i64..10_000_000_000) {
            let profit = Decimal::new(pence, 2);
            prop_assert_eq!(corporation_tax(profit), profit * dec!(0.25));
        }

        #[test]
        fn prop_effective_rate_between_small_and_main(pence in 1i64..10_000_000_000) {
            let profit = Decimal::new(pence, 2);
            let tax = corporation_tax(profit);
            prop_assert!(tax >= profit * SMALL_PROFITS_RATE);
            prop_assert!(tax <= profit * MAIN_RATE);
        }

        #[test]
        fn prop_tax_never_decreases_with_profit(
            pence in 0i64..30_000_000,
            step in 1i64..1_000_000
        ) {
            let lower = Decimal::new(pence, 2);
            let higher = Decimal::new(pence + step, 2);
            prop_assert!(corporation_tax(higher) >= corporation_tax(lower));
        }
    }
}
