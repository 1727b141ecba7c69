mod cmd;
mod input;
mod pension;
mod scenario;
mod strategy;
mod tax;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ltdc", version, about = "UK limited company take-home calculator")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full take-home breakdown for one scenario
    Calc(cmd::calc::CalcCommand),
    /// Compare take-home at £0, £18k, £21k, £24k and a custom pension
    Compare(cmd::compare::CompareCommand),
    /// Project a pension pot over 25 years
    Project(cmd::project::ProjectCommand),
    /// Estimate savings from tax-efficiency strategies
    Strategies(cmd::strategies::StrategiesCommand),
    /// Run scenarios from a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Print the batch input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    log::debug!("{:?}", opts);

    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Compare(compare) => compare.exec(),
        Command::Project(project) => project.exec(),
        Command::Strategies(strategies) => strategies.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
