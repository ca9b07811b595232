// simulation_main.rs
use clap::Parser;
use four_way_signal::communication::observer::spawn_printer;
use four_way_signal::communication::OutputFormat;
use four_way_signal::{launch, Result, SimulationConfig};
use std::error::Error as _;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "traffic")]
#[command(about = "Four-way intersection traffic light simulation")]
struct Cli {
    /// Number of vehicles to send through the intersection
    #[arg(short = 'n', long = "vehicle-count", visible_alias = "vc", value_name = "COUNT")]
    vehicle_count: String,

    /// JSON file overriding timings and vehicle count limits
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible vehicle directions
    #[arg(long)]
    seed: Option<u64>,

    /// Output format for the observation stream
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        log::error!("{}", err);
        eprintln!("Error, {err}.");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    let format = cli.format;
    let summary = launch(&cli.vehicle_count, &config, cli.seed, |vehicle_count, rx| {
        if format == OutputFormat::Text {
            println!("\x1b[0;4mFour-Way Intersection -> Traffic Light Simulation\x1b[0m");
            println!("Vehicles: {vehicle_count}\n");
        }
        spawn_printer(rx, format)
    })
    .await?;

    log::info!(
        "per-direction counts {:?}, residual gate capacity {:?}",
        summary.per_direction,
        summary.residual_capacity
    );
    Ok(())
}
