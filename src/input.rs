//! Scenario inputs: the canonical record the engine consumes, the two ways of
//! building it (annual turnover or day rate), and lenient batch records.

use crate::tax::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Working days in a year before any holiday is taken
pub const WORKING_DAYS_PER_YEAR: Decimal = dec!(253);

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unsupported input format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pension contribution as entered: a yearly figure or a monthly one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PensionContribution {
    Annual(Decimal),
    Monthly(Decimal),
}

impl PensionContribution {
    /// Prefer the annual figure when both are given. Neither means no contribution.
    pub fn from_options(annual: Option<Decimal>, monthly: Option<Decimal>) -> Self {
        match (annual, monthly) {
            (Some(annual), _) => PensionContribution::Annual(annual),
            (None, Some(monthly)) => PensionContribution::Monthly(monthly),
            (None, None) => PensionContribution::Annual(Decimal::ZERO),
        }
    }

    pub fn annual(&self) -> Decimal {
        match self {
            PensionContribution::Annual(amount) => *amount,
            PensionContribution::Monthly(amount) => amount.saturating_mul(dec!(12)),
        }
    }
}

/// Days billed in a year after holidays, never below zero
pub fn working_days(holidays: Decimal) -> Decimal {
    WORKING_DAYS_PER_YEAR
        .saturating_sub(holidays)
        .max(Decimal::ZERO)
}

/// Everything the scenario engine needs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScenarioInput {
    pub turnover: Decimal,
    pub annual_pension: Decimal,
    pub yearly_expenses: Decimal,
    pub tax_year: TaxYear,
}

impl ScenarioInput {
    /// Input for a known annual turnover
    pub fn from_turnover(
        turnover: Decimal,
        pension: PensionContribution,
        yearly_expenses: Decimal,
        tax_year: TaxYear,
    ) -> Self {
        ScenarioInput {
            turnover,
            annual_pension: pension.annual(),
            yearly_expenses,
            tax_year,
        }
    }

    /// Input for a contractor billing a day rate
    pub fn from_day_rate(
        day_rate: Decimal,
        holidays: Decimal,
        pension: PensionContribution,
        yearly_expenses: Decimal,
        tax_year: TaxYear,
    ) -> Self {
        let turnover = day_rate.saturating_mul(working_days(holidays));
        log::debug!(
            "Turnover {} from day rate {} over {} days",
            turnover,
            day_rate,
            working_days(holidays)
        );
        Self::from_turnover(turnover, pension, yearly_expenses, tax_year)
    }

    /// Same inputs with a different annual pension
    pub fn with_pension(&self, annual_pension: Decimal) -> Self {
        ScenarioInput {
            annual_pension,
            ..*self
        }
    }
}

/// Turn a raw field into an amount. Blank or missing is zero; so is anything
/// that does not parse, with a warning. Accepts "£" and thousands separators.
pub fn coerce_money(raw: Option<&str>, field: &str) -> Decimal {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Decimal::ZERO;
    };
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '£' | ',' | '_' | ' '))
        .collect();
    match Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned)) {
        Ok(amount) => amount,
        Err(_) => {
            log::warn!("{}: '{}' is not a number, using 0", field, raw);
            Decimal::ZERO
        }
    }
}

/// One row of a batch file. Every field is optional and kept as text so that
/// bad values can be coerced rather than rejected.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ScenarioRecord {
    /// Label carried through to the output
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    /// Annual turnover in GBP
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub turnover: Option<String>,
    /// Day rate in GBP, used when turnover is blank
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub day_rate: Option<String>,
    /// Holiday days taken, used with day_rate
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub holidays: Option<String>,
    /// Annual employer pension contribution in GBP
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub pension: Option<String>,
    /// Monthly employer pension contribution in GBP, used when pension is blank
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub monthly_pension: Option<String>,
    /// Yearly business expenses in GBP
    #[serde(default, deserialize_with = "lenient_text")]
    #[schemars(with = "Option<f64>")]
    pub expenses: Option<String>,
    /// Tax year (e.g., 2025 or 2025/26)
    #[serde(default, deserialize_with = "lenient_text")]
    pub tax_year: Option<String>,
}

impl ScenarioRecord {
    pub fn to_input(&self) -> ScenarioInput {
        let tax_year = present(&self.tax_year).map_or(TaxYear::DEFAULT, TaxYear::parse_lenient);
        let expenses = coerce_money(present(&self.expenses), "expenses");

        let pension = match (present(&self.pension), present(&self.monthly_pension)) {
            (None, Some(monthly)) => {
                PensionContribution::Monthly(coerce_money(Some(monthly), "monthly_pension"))
            }
            (annual, _) => PensionContribution::Annual(coerce_money(annual, "pension")),
        };

        match (present(&self.turnover), present(&self.day_rate)) {
            (None, Some(day_rate)) => ScenarioInput::from_day_rate(
                coerce_money(Some(day_rate), "day_rate"),
                coerce_money(present(&self.holidays), "holidays"),
                pension,
                expenses,
                tax_year,
            ),
            (turnover, _) => ScenarioInput::from_turnover(
                coerce_money(turnover, "turnover"),
                pension,
                expenses,
                tax_year,
            ),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accept strings, numbers or booleans, keeping them as text
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase) {
            Some(ext) if ext == "csv" => Ok(InputFormat::Csv),
            Some(ext) if ext == "json" => Ok(InputFormat::Json),
            _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Guess the format of piped input from its first character
    pub fn sniff(data: &[u8]) -> Self {
        match data.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'[') | Some(b'{') => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}

/// Read batch records. JSON may be a single object or an array.
pub fn read_records<R: Read>(
    reader: R,
    format: InputFormat,
) -> Result<Vec<ScenarioRecord>, InputError> {
    match format {
        InputFormat::Csv => {
            let mut rdr = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(reader);
            let records = rdr
                .deserialize()
                .collect::<Result<Vec<ScenarioRecord>, _>>()?;
            Ok(records)
        }
        InputFormat::Json => {
            let value: serde_json::Value = serde_json::from_reader(reader)?;
            let records = match value {
                serde_json::Value::Array(_) => serde_json::from_value(value)?,
                other => vec![serde_json::from_value(other)?],
            };
            Ok(records)
        }
    }
}
