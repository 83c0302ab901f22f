//! Polarity Simulation Runner
//!
//! Headless driver: runs a seeded simulation for a number of frames, applies a
//! scripted list of interventions, and writes the metrics log, event log and a
//! final snapshot.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use polarity_core::config::DEFAULT_CONFIG_PATH;
use polarity_core::output::{write_metrics_csv, write_snapshot};
use polarity_core::{InterventionScript, SimConfig, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "polarity")]
#[command(about = "An agent-based political polarization simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of frames to run (each frame is `simulation_speed` steps)
    #[arg(long, default_value_t = 500)]
    frames: u64,

    /// Override the configured steps per frame
    #[arg(long)]
    speed: Option<u32>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of {ideology, y} records used to seed agent positions
    #[arg(long)]
    seed_data: Option<PathBuf>,

    /// JSON intervention script; entry steps count scheduled steps, paused or not
    #[arg(long)]
    script: Option<PathBuf>,

    /// Where to write the metrics CSV
    #[arg(long, default_value = "output/polarization_data.csv")]
    metrics_out: PathBuf,

    /// Where to mirror the event log as JSONL
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Where to write the final world snapshot
    #[arg(long, default_value = "output/final_state.json")]
    snapshot_out: PathBuf,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load_or_default(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => SimConfig::load_or_default(DEFAULT_CONFIG_PATH),
        None => SimConfig::default(),
    };
    if let Some(path) = &args.seed_data {
        config.population.seed_data = Some(path.clone());
    }
    if let Some(speed) = args.speed {
        config.params.simulation_speed = speed;
    }

    let script = match &args.script {
        Some(path) => InterventionScript::load(path)?,
        None => InterventionScript::default(),
    };

    println!("Polarity Simulation Engine");
    println!("==========================");
    println!("Seed: {}", args.seed);
    println!("Frames: {}", args.frames);
    println!("Steps per frame: {}", config.params.simulation_speed);
    println!("Agents: {}", config.population.size);
    println!("Scripted interventions: {}", script.len());
    println!();

    for path in [Some(&args.metrics_out), Some(&args.snapshot_out), args.events_out.as_ref()]
        .into_iter()
        .flatten()
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut sim = Simulation::new(config, args.seed);
    if let Some(path) = &args.events_out {
        sim = sim.with_event_sink(path)?;
    }

    for party in sim.parties().all_parties() {
        println!("  {:<22} {:+.2}  {}", party.name, party.base_ideology, party.color);
    }
    println!();

    let mut cursor = script.cursor();
    sim.apply_due(&mut cursor);

    for frame in 0..args.frames {
        sim.run_scripted_frame(&mut cursor);

        if frame > 0 && frame % 100 == 0 {
            let institutions = sim.institutions();
            println!(
                "Frame {} / {} (T+{}): polarization {:.2}, judiciary {:.1}, legislative {:.1}, gini {:.2}",
                frame,
                args.frames,
                sim.step_count(),
                institutions.polarization,
                institutions.judiciary_capacity,
                institutions.legislative_output,
                institutions.gini
            );
        }
    }

    write_metrics_csv(&args.metrics_out, sim.metrics_log())?;
    let snapshot = sim.snapshot(true);
    write_snapshot(&args.snapshot_out, &snapshot)?;
    sim.flush_events()?;

    println!();
    println!("Simulation complete. Ran {} steps.", sim.step_count());
    println!("Recorded {} metrics rows and {} events.", sim.metrics_log().len(), sim.events().len());
    println!("Wrote {}", args.metrics_out.display());
    println!("Wrote {}", args.snapshot_out.display());
    for event in sim.events().iter().rev().take(5).rev() {
        println!("  {}", event);
    }

    Ok(())
}
