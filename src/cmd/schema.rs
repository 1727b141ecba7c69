//! Schema command - print the batch input format

use crate::input::{ScenarioRecord, WORKING_DAYS_PER_YEAR};
use crate::tax::TaxYearRates;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for one batch record
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(ScenarioRecord);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", CSV_COLUMNS.join(",")),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for (name, description) in CSV_FIELD_DESCRIPTIONS {
        println!("{:16}  {}", name, description);
    }
    println!();
    println!("All columns are optional. Blank or unreadable amounts count as 0.");
    println!(
        "Day rate turnover = day_rate x ({} - holidays).",
        WORKING_DAYS_PER_YEAR
    );
    let years: Vec<String> = TaxYearRates::supported_years().map(|y| y.display()).collect();
    println!("Tax years with their own rates: {}", years.join(", "));
}

const CSV_COLUMNS: &[&str] = &[
    "label",
    "turnover",
    "day_rate",
    "holidays",
    "pension",
    "monthly_pension",
    "expenses",
    "tax_year",
];

const CSV_FIELD_DESCRIPTIONS: &[(&str, &str)] = &[
    ("label", "Name carried through to the output"),
    ("turnover", "Annual turnover in GBP"),
    ("day_rate", "Day rate in GBP, used when turnover is blank"),
    ("holidays", "Holiday days taken, used with day_rate"),
    ("pension", "Annual employer pension contribution in GBP"),
    (
        "monthly_pension",
        "Monthly employer pension contribution, used when pension is blank",
    ),
    ("expenses", "Yearly business expenses in GBP"),
    ("tax_year", "Tax year, e.g. 2025 or 2025/26 (default 2025/26)"),
];
