use crate::demo::{run_demo, DemoArgs};
use crate::quote::{run_bounds, run_quote, BoundsArgs, QuoteArgs};
use clap::{Parser, Subcommand};
use registration_fees::config::AppConfig;
use registration_fees::error::AppError;
use registration_fees::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Registration Fee Calculator",
    about = "Quote registration fees with relaxation policies and combination rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote the payable fee for an applicant holding the given criteria
    Quote(QuoteArgs),
    /// Check a council's fee override against the national envelope
    Bounds(BoundsArgs),
    /// Walk through the reference scenarios using a built-in catalog
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, "fee calculator configured");

    match cli.command {
        Command::Quote(args) => run_quote(args, &config),
        Command::Bounds(args) => run_bounds(args, &config),
        Command::Demo(args) => run_demo(args),
    }
}
