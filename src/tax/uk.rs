use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Director's salary, drawn at the personal allowance
pub const FIXED_SALARY: Decimal = dec!(12570);

/// Top of the basic rate band for income tax
pub const BASIC_RATE_THRESHOLD: Decimal = dec!(50270);

/// Dividend allowance, set against the basic band only
pub const DIVIDEND_ALLOWANCE: Decimal = dec!(500);

/// UK Tax Year (runs 6 April to 5 April)
/// The year value is the year the tax year starts in (e.g., 2025 = 2025/26 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Tax year whose rates apply when the requested one has no entry
    pub const DEFAULT: TaxYear = TaxYear(2025);

    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        // On or after 6 April the new tax year has started
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(date.year())
        } else {
            TaxYear(date.year() - 1)
        }
    }

    /// The tax year containing today's date
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Parse "2025", "2025/26" or "2025-26". Anything else is the default year.
    pub fn parse_lenient(s: &str) -> Self {
        let s = s.trim();
        let start = s.split(['/', '-']).next().unwrap_or(s).trim();
        match start.parse::<i32>() {
            Ok(year) if (1900..=2999).contains(&year) => TaxYear(year),
            _ => {
                log::warn!("Unrecognised tax year '{}', using {}", s, Self::DEFAULT);
                Self::DEFAULT
            }
        }
    }

    /// Display as "2025/26" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }

    /// Rates in force for this tax year
    pub fn rates(&self) -> &'static TaxYearRates {
        TaxYearRates::for_year(*self)
    }
}

impl Default for TaxYear {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Year-specific dividend rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxYearRates {
    pub year: TaxYear,
    pub basic_dividend_rate: Decimal,
    pub higher_dividend_rate: Decimal,
}

/// Supported tax years. The first entry is the default.
const TAX_YEAR_RATES: &[TaxYearRates] = &[
    TaxYearRates {
        year: TaxYear::DEFAULT,
        basic_dividend_rate: dec!(0.0875),  // 8.75%
        higher_dividend_rate: dec!(0.3375), // 33.75%
    },
    TaxYearRates {
        year: TaxYear(2026),
        basic_dividend_rate: dec!(0.1075),  // 10.75%
        higher_dividend_rate: dec!(0.3575), // 35.75%
    },
];

impl TaxYearRates {
    /// Look up the rates for a tax year, falling back to the default year
    pub fn for_year(year: TaxYear) -> &'static TaxYearRates {
        TAX_YEAR_RATES
            .iter()
            .find(|rates| rates.year == year)
            .unwrap_or_else(|| {
                log::debug!("No rates for {}, using {}", year, TaxYear::DEFAULT);
                &TAX_YEAR_RATES[0]
            })
    }

    /// All tax years with their own rate set
    pub fn supported_years() -> impl Iterator<Item = TaxYear> {
        TAX_YEAR_RATES.iter().map(|rates| rates.year)
    }
}
