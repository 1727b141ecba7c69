//! Compare command - the same company at each pension level, side by side

use crate::cmd::{format_gbp, format_rate, ScenarioArgs};
use crate::scenario::{run_scenario_set, ScenarioKind, ScenarioResult, ScenarioSet};
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// The pension figure is used for the custom column
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Table rows: label and how to read the figure from a result
const METRICS: &[(&str, fn(&ScenarioResult) -> String)] = &[
    ("Pension", |r| format_gbp(r.pension)),
    ("Profit", |r| format_gbp(r.profit)),
    ("Corporation Tax", |r| format_gbp(r.corporation_tax)),
    ("Dividend Tax", |r| format_gbp(r.total_dividend_tax)),
    ("Net Dividend", |r| format_gbp(r.net_dividend)),
    ("Annual Net Cash", |r| format_gbp(r.annual_net_cash)),
    ("Monthly Net Cash", |r| format_gbp(r.monthly_net_cash)),
    ("Total Value", |r| format_gbp(r.total_annual_value)),
    ("Tax and NI", |r| format_gbp(r.total_tax_and_ni)),
    ("Effective Rate", |r| format_rate(r.effective_tax_rate)),
];

impl CompareCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.scenario.to_input();
        let set = run_scenario_set(&input);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&set)?);
        } else {
            print_comparison(&set);
        }
        Ok(())
    }
}

fn print_comparison(set: &ScenarioSet) {
    let base = set.get(ScenarioKind::NoPension);
    println!();
    println!(
        "PENSION COMPARISON ({}) - turnover {}",
        base.tax_year.display(),
        format_gbp(base.turnover)
    );
    println!();

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(ScenarioKind::ALL.iter().map(|kind| kind.display().to_string()));
    builder.push_record(header);

    for (label, metric) in METRICS {
        let mut row = vec![label.to_string()];
        row.extend(set.iter().map(|(_, result)| metric(result)));
        builder.push_record(row);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    let best = set
        .iter()
        .max_by_key(|(_, result)| result.total_annual_value)
        .map(|(kind, result)| {
            let gain = result
                .total_annual_value
                .saturating_sub(base.total_annual_value);
            (kind, gain)
        });
    if let Some((kind, gain)) = best {
        if gain > Decimal::ZERO {
            println!(
                "Highest total value: {} (+{} on no pension)",
                kind.display(),
                format_gbp(gain)
            );
        }
    }
    println!();
}
