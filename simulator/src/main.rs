//! FixedToken Simulator
//!
//! Test environment that drives a ledger instance through scripted scenarios
//! or a random workload and reports acceptance metrics.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod accounts;
mod controller;
mod metrics;
mod scenario;

use controller::SimulationController;
use scenario::Scenario;

/// FixedToken Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "FixedToken test and simulation environment")]
struct Args {
    /// Number of accounts to create (the first is the treasury)
    #[arg(short, long, default_value = "4")]
    accounts: usize,

    /// Total token supply credited to the treasury
    #[arg(long, default_value = "1000000")]
    supply: u128,

    /// Token name
    #[arg(long, default_value = "SimToken")]
    token_name: String,

    /// Token symbol
    #[arg(long, default_value = "SIM")]
    token_symbol: String,

    /// Scenario to run (omit for a random workload)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Number of random operations to run
    #[arg(short, long, default_value = "1000")]
    ops: u64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting FixedToken Simulator");
    info!("Accounts: {}", args.accounts);
    info!("Supply: {}", args.supply);

    let mut controller = SimulationController::new(
        args.accounts,
        args.supply,
        &args.token_name,
        &args.token_symbol,
        args.seed,
    );

    if let Some(scenario_name) = &args.scenario {
        info!("Running scenario: {}", scenario_name);

        let scenario = Scenario::load(scenario_name)?;
        controller.run_scenario(scenario)?;
    } else {
        info!("Running random workload of {} operations", args.ops);
        controller.run_random(args.ops)?;
    }

    // Print metrics
    let metrics = controller.metrics();
    info!("Simulation complete");
    info!("Total operations: {}", metrics.total_operations);
    info!("Accepted: {}", metrics.accepted_operations);
    info!("Rejected: {}", metrics.rejected_operations);
    for (code, count) in metrics.rejection_breakdown() {
        info!("  {}: {}", code, count);
    }
    info!("Events emitted: {}", controller.events_emitted());

    Ok(())
}
