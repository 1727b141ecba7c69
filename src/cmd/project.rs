//! Project command - pension pot over the next 25 years

use crate::cmd::{format_whole_gbp, money_arg};
use crate::input::PensionContribution;
use crate::pension::{project_pension, Projection, MILESTONE_BALANCE, PROJECTION_YEARS};
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Current pension pot in GBP
    #[arg(short, long, value_parser = money_arg, default_value = "0")]
    start_balance: Decimal,

    /// Age at the start of the first year
    #[arg(short, long)]
    age: u32,

    /// Annual growth rate in percent
    #[arg(short, long, value_parser = money_arg, default_value = "5")]
    growth: Decimal,

    /// Annual contribution in GBP
    #[arg(short, long, value_parser = money_arg, conflicts_with = "monthly_pension")]
    pension: Option<Decimal>,

    /// Monthly contribution in GBP
    #[arg(long, value_parser = money_arg)]
    monthly_pension: Option<Decimal>,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ProjectCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let contribution =
            PensionContribution::from_options(self.pension, self.monthly_pension).annual();
        let projection = project_pension(self.start_balance, contribution, self.growth, self.age);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&projection)?);
        } else {
            self.print_projection(&projection, contribution);
        }
        Ok(())
    }

    fn print_projection(&self, projection: &Projection, contribution: Decimal) {
        println!();
        println!(
            "PENSION PROJECTION - {} a year at {}% growth from age {}",
            format_whole_gbp(contribution),
            self.growth,
            self.age
        );
        println!();

        let rows: Vec<ProjectionTableRow> = projection
            .rows
            .iter()
            .map(|row| ProjectionTableRow {
                year: row.year,
                age: row.age,
                start: format_whole_gbp(row.start_balance),
                contribution: format_whole_gbp(row.contribution),
                growth: format_whole_gbp(row.growth),
                end: format_whole_gbp(row.end_balance),
                milestone: if row.is_milestone_row { "*" } else { "" }.to_string(),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        match projection.milestone() {
            Some(row) => println!(
                "Reaches {} in year {} (age {})",
                format_whole_gbp(MILESTONE_BALANCE),
                row.year,
                row.age
            ),
            None => println!(
                "Does not reach {} within {} years",
                format_whole_gbp(MILESTONE_BALANCE),
                PROJECTION_YEARS
            ),
        }
        println!(
            "Contributions: {} | Growth: {} | Final pot: {}",
            format_whole_gbp(projection.total_contributions()),
            format_whole_gbp(projection.total_growth()),
            format_whole_gbp(projection.final_balance())
        );
        println!();
    }
}

#[derive(Debug, Clone, Tabled)]
struct ProjectionTableRow {
    #[tabled(rename = "Year")]
    year: u32,
    #[tabled(rename = "Age")]
    age: u32,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Contribution")]
    contribution: String,
    #[tabled(rename = "Growth")]
    growth: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "£1M")]
    milestone: String,
}
