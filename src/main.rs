use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use frameloop::{report::ReportWriter, scenario::ScenarioLoader, systems::ExpirationSystem};

#[derive(Debug, Parser)]
#[command(author, version, about = "Runs a frameloop scenario headless")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/asteroid_field.yaml")]
    scenario: PathBuf,

    /// Override frame count (uses scenario default when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Override report interval in frames
    #[arg(long)]
    report_interval: Option<u64>,

    /// Directory for frame reports
    #[arg(long, default_value = "reports")]
    report_dir: PathBuf,

    /// Log filter, e.g. `debug` or `frameloop=trace` (RUST_LOG wins when set)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let frames = scenario.frames(cli.frames);
    let interval = cli
        .report_interval
        .unwrap_or(scenario.report_interval_frames);
    let reports = ReportWriter::new(&cli.report_dir, interval);

    let mut engine = scenario.build_engine()?;
    let mut write_error = None;
    engine.run_with_hook(frames, |summary| {
        if write_error.is_some() {
            return;
        }
        match reports.maybe_write(&scenario.name, summary) {
            Ok(Some(path)) => info!("wrote frame report {}", path.display()),
            Ok(None) => {}
            Err(err) => write_error = Some(err),
        }
    })?;
    if let Some(err) = write_error {
        return Err(err);
    }

    let expired = engine
        .world()
        .system::<ExpirationSystem>()
        .map_or(0, ExpirationSystem::expired_total);
    println!(
        "Scenario '{}' completed {} frames. Live entities: {}, expired: {}",
        scenario.name,
        frames,
        engine.world().entity_count(),
        expired
    );
    Ok(())
}
