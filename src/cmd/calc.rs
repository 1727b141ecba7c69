//! Calc command - full breakdown for one scenario

use crate::cmd::{format_gbp, format_percent, format_rate, ScenarioArgs};
use crate::scenario::{run_scenario, ScenarioResult};
use crate::tax::corporation::LOWER_LIMIT;
use crate::tax::uk::DIVIDEND_ALLOWANCE;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    input: crate::input::ScenarioInput,
    result: &'a ScenarioResult,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.scenario.to_input();
        let result = run_scenario(&input);

        if self.json {
            let output = CalcOutput {
                input,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_breakdown(&result);
        }
        Ok(())
    }
}

fn print_breakdown(r: &ScenarioResult) {
    println!();
    println!("LIMITED COMPANY TAKE-HOME ({})", r.tax_year.display());
    println!();

    println!("COMPANY");
    println!("  Turnover: {}", format_gbp(r.turnover));
    println!(
        "  Salary: {} | Employer NI: {}",
        format_gbp(r.salary),
        format_gbp(r.employer_ni)
    );
    println!(
        "  Pension: {} | Expenses: {}",
        format_gbp(r.pension),
        format_gbp(r.yearly_expenses)
    );
    println!("  Profit: {} ({})", format_gbp(r.profit), r.profit_band);
    println!(
        "  Corporation Tax: {} (effective {}, marginal {})",
        format_gbp(r.corporation_tax),
        format_rate(r.corporation_tax_effective_rate),
        format_percent(r.marginal_corporation_tax_rate)
    );
    println!("  After-tax Profit: {}", format_gbp(r.after_tax_profit));
    println!();

    println!("DIVIDENDS");
    println!(
        "  Basic band: {} (Allowance: {}, Tax @ {}: {})",
        format_gbp(r.basic_band_dividend),
        format_gbp(DIVIDEND_ALLOWANCE),
        format_percent(r.basic_dividend_rate),
        format_gbp(r.basic_band_tax)
    );
    println!(
        "  Higher band: {} (Tax @ {}: {})",
        format_gbp(r.higher_band_dividend),
        format_percent(r.higher_dividend_rate),
        format_gbp(r.higher_band_tax)
    );
    println!(
        "  Dividend Tax: {} | Net Dividend: {}",
        format_gbp(r.total_dividend_tax),
        format_gbp(r.net_dividend)
    );
    println!();

    println!("TAKE-HOME");
    println!(
        "  Annual: {} | Monthly: {}",
        format_gbp(r.annual_net_cash),
        format_gbp(r.monthly_net_cash)
    );
    println!("  Total value incl. pension: {}", format_gbp(r.total_annual_value));
    println!();

    println!(
        "TOTAL TAX AND NI: {} (effective rate {})",
        format_gbp(r.total_tax_and_ni),
        format_rate(r.effective_tax_rate)
    );
    if r.profit > LOWER_LIMIT {
        println!(
            "Profit is {} above the small profits limit; run `strategies` for options.",
            format_gbp(r.profit - LOWER_LIMIT)
        );
    }
    println!();
}
