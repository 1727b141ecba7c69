//! Batch command - run many scenarios from a CSV or JSON file

use crate::cmd::read_scenario_records;
use crate::scenario::{run_scenario, ScenarioResult};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Scenarios file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = BatchFormat::Csv)]
    format: BatchFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum BatchFormat {
    #[default]
    Csv,
    Json,
}

/// One output row per input record
#[derive(Debug, Serialize)]
struct BatchRow {
    label: String,
    tax_year: String,
    turnover: Decimal,
    pension: Decimal,
    employer_ni: Decimal,
    profit: Decimal,
    corporation_tax: Decimal,
    dividend_tax: Decimal,
    annual_net_cash: Decimal,
    monthly_net_cash: Decimal,
    total_annual_value: Decimal,
    total_tax_and_ni: Decimal,
    effective_tax_rate: Option<Decimal>,
}

impl BatchRow {
    fn new(label: String, r: &ScenarioResult) -> Self {
        BatchRow {
            label,
            tax_year: r.tax_year.display(),
            turnover: r.turnover.round_dp(2),
            pension: r.pension.round_dp(2),
            employer_ni: r.employer_ni.round_dp(2),
            profit: r.profit.round_dp(2),
            corporation_tax: r.corporation_tax.round_dp(2),
            dividend_tax: r.total_dividend_tax.round_dp(2),
            annual_net_cash: r.annual_net_cash.round_dp(2),
            monthly_net_cash: r.monthly_net_cash.round_dp(2),
            total_annual_value: r.total_annual_value.round_dp(2),
            total_tax_and_ni: r.total_tax_and_ni.round_dp(2),
            effective_tax_rate: r.effective_tax_rate.map(|rate| rate.round_dp(4)),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchResult {
    label: String,
    result: ScenarioResult,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let records = read_scenario_records(&self.file)?;
        let results: Vec<BatchResult> = records
            .iter()
            .enumerate()
            .map(|(i, record)| BatchResult {
                label: record
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("row {}", i + 1)),
                result: run_scenario(&record.to_input()),
            })
            .collect();

        match self.format {
            BatchFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            BatchFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(io::stdout());
                for BatchResult { label, result } in results {
                    wtr.serialize(BatchRow::new(label, &result))?;
                }
                wtr.flush()?;
            }
        }
        Ok(())
    }
}
