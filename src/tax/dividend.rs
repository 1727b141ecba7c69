use crate::tax::uk::{TaxYearRates, BASIC_RATE_THRESHOLD, DIVIDEND_ALLOWANCE};
use rust_decimal::Decimal;
use serde::Serialize;

/// After-tax profit paid out as dividends, split across the basic and higher bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DividendSplit {
    pub basic_band_dividend: Decimal,
    pub basic_band_tax: Decimal,
    pub higher_band_dividend: Decimal,
    pub higher_band_tax: Decimal,
}

impl DividendSplit {
    pub fn total_tax(&self) -> Decimal {
        self.basic_band_tax + self.higher_band_tax
    }
}

/// Room left in the basic rate band once salary has been drawn
pub fn basic_band_capacity(salary: Decimal) -> Decimal {
    (BASIC_RATE_THRESHOLD - salary).max(Decimal::ZERO)
}

/// Split a dividend across the bands and tax each part.
///
/// The allowance only reduces the basic band. A negative dividend (the
/// company made a loss) is not clamped: it stays in the basic band as a
/// negative amount, untaxed, and the higher band is left empty.
pub fn split_dividends(
    after_tax_profit: Decimal,
    salary: Decimal,
    rates: &TaxYearRates,
) -> DividendSplit {
    let basic_band_dividend = after_tax_profit.min(basic_band_capacity(salary));
    let basic_taxable = basic_band_dividend
        .saturating_sub(DIVIDEND_ALLOWANCE)
        .max(Decimal::ZERO);
    let basic_band_tax = basic_taxable * rates.basic_dividend_rate;

    let higher_band_dividend = after_tax_profit.saturating_sub(basic_band_dividend);
    let higher_band_tax = higher_band_dividend * rates.higher_dividend_rate;

    log::debug!(
        "Dividend {} ({}): basic {} taxed {}, higher {} taxed {}",
        after_tax_profit,
        rates.year,
        basic_band_dividend,
        basic_band_tax,
        higher_band_dividend,
        higher_band_tax
    );

    DividendSplit {
        basic_band_dividend,
        basic_band_tax,
        higher_band_dividend,
        higher_band_tax,
    }
}
