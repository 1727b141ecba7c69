pub mod batch;
pub mod calc;
pub mod compare;
pub mod project;
pub mod schema;
pub mod strategies;

use crate::input::{
    self, coerce_money, InputFormat, PensionContribution, ScenarioInput, ScenarioRecord,
};
use crate::tax::TaxYear;
use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Scenario inputs shared by `calc`, `compare` and `strategies`
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Annual turnover in GBP
    #[arg(short, long, value_parser = money_arg, conflicts_with = "day_rate")]
    turnover: Option<Decimal>,

    /// Day rate in GBP; turnover is day rate x (253 - holidays)
    #[arg(long, value_parser = money_arg)]
    day_rate: Option<Decimal>,

    /// Holiday days taken, used with --day-rate
    #[arg(long, value_parser = money_arg, default_value = "0")]
    holidays: Decimal,

    /// Annual employer pension contribution in GBP
    #[arg(short, long, value_parser = money_arg, conflicts_with = "monthly_pension")]
    pension: Option<Decimal>,

    /// Monthly employer pension contribution in GBP
    #[arg(long, value_parser = money_arg)]
    monthly_pension: Option<Decimal>,

    /// Yearly business expenses in GBP
    #[arg(short, long, value_parser = money_arg, default_value = "0")]
    expenses: Decimal,

    /// Tax year (e.g., 2025 or 2025/26). Defaults to the current tax year.
    #[arg(short, long, value_parser = year_arg)]
    year: Option<TaxYear>,
}

impl ScenarioArgs {
    pub fn to_input(&self) -> ScenarioInput {
        let pension = PensionContribution::from_options(self.pension, self.monthly_pension);
        let tax_year = self.year.unwrap_or_else(TaxYear::current);
        match (self.turnover, self.day_rate) {
            (None, Some(day_rate)) => ScenarioInput::from_day_rate(
                day_rate,
                self.holidays,
                pension,
                self.expenses,
                tax_year,
            ),
            (turnover, _) => ScenarioInput::from_turnover(
                turnover.unwrap_or_default(),
                pension,
                self.expenses,
                tax_year,
            ),
        }
    }
}

/// Amounts on the command line are coerced like batch fields: anything unparseable is zero
pub fn money_arg(s: &str) -> Result<Decimal, Infallible> {
    Ok(coerce_money(Some(s), "argument"))
}

pub fn year_arg(s: &str) -> Result<TaxYear, Infallible> {
    Ok(TaxYear::parse_lenient(s))
}

/// Read batch records from a file, or stdin with "-"
pub fn read_scenario_records(path: &Path) -> anyhow::Result<Vec<ScenarioRecord>> {
    let records = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        read_from_file(path)?
    };
    log::info!("Read {} scenario records", records.len());
    Ok(records)
}

fn read_from_file(path: &Path) -> anyhow::Result<Vec<ScenarioRecord>> {
    let format = InputFormat::from_path(path)?;
    let file = File::open(path)?;
    let records = input::read_records(BufReader::new(file), format)?;
    Ok(records)
}

fn read_from_stdin() -> anyhow::Result<Vec<ScenarioRecord>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.iter().all(u8::is_ascii_whitespace) {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let format = InputFormat::sniff(&buffer);
    let records = input::read_records(io::Cursor::new(buffer), format)?;
    Ok(records)
}

/// `£1,234.56`, negatives as `-£1,234.56`
pub fn format_gbp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (pounds, pence) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}£{}.{}", sign(rounded), group_thousands(pounds), pence)
}

/// `£1,235`, rounded to the nearest pound
pub fn format_whole_gbp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!(
        "{}£{}",
        sign(rounded),
        group_thousands(&rounded.abs().trunc().to_string())
    )
}

/// A fraction as a percentage with two decimals
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", rate.saturating_mul(dec!(100)))
}

pub fn format_rate(rate: Option<Decimal>) -> String {
    rate.map_or_else(|| "n/a".to_string(), format_percent)
}

fn sign(amount: Decimal) -> &'static str {
    if amount < Decimal::ZERO {
        "-"
    } else {
        ""
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
