//! Strategies command - ways to keep more of the company's profit

use crate::cmd::{format_gbp, format_percent, ScenarioArgs};
use crate::scenario::{run_scenario, ScenarioResult};
use crate::strategy::{apply_strategy, optimisation_strategies, Strategy};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct StrategiesCommand {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StrategiesOutput {
    current: ScenarioResult,
    strategies: Vec<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with_profit_banding: Option<ScenarioResult>,
}

impl StrategiesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.scenario.to_input();
        let current = run_scenario(&input);
        let strategies = optimisation_strategies(&current);
        let applied = strategies
            .iter()
            .find_map(|strategy| apply_strategy(strategy, &input))
            .map(|applied| run_scenario(&applied));

        let output = StrategiesOutput {
            current,
            strategies,
            with_profit_banding: applied,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_strategies(&output);
        }
        Ok(())
    }
}

fn print_strategies(output: &StrategiesOutput) {
    let current = &output.current;
    println!();
    println!(
        "OPTIMISATION STRATEGIES ({}) - profit {}, marginal rate {}",
        current.tax_year.display(),
        format_gbp(current.profit),
        format_percent(current.marginal_corporation_tax_rate)
    );
    println!();

    let rows: Vec<StrategyRow> = output
        .strategies
        .iter()
        .map(|s| StrategyRow {
            strategy: s.id.title().to_string(),
            saving: format_gbp(s.estimated_annual_saving),
            applicable: if s.applicable { "yes" } else { "-" }.to_string(),
            detail: s.id.description().to_string(),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    let target = output
        .strategies
        .iter()
        .find_map(|s| s.applied_pension_target);
    match (target, &output.with_profit_banding) {
        (Some(target), Some(after)) => {
            println!(
                "Raising the pension to {} brings profit to {}:",
                format_gbp(target),
                format_gbp(after.profit)
            );
            println!(
                "  Corporation Tax {} -> {} | Total value {} -> {}",
                format_gbp(current.corporation_tax),
                format_gbp(after.corporation_tax),
                format_gbp(current.total_annual_value),
                format_gbp(after.total_annual_value)
            );
        }
        _ => println!("Profit is already within the small profits band."),
    }
    println!("Savings other than profit banding are illustrative estimates.");
    println!();
}

#[derive(Debug, Clone, Tabled)]
struct StrategyRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Est. Saving")]
    saving: String,
    #[tabled(rename = "Applicable")]
    applicable: String,
    #[tabled(rename = "Detail")]
    detail: String,
}
