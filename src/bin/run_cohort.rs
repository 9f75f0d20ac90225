//! Entry point A CLI: simulate a single arm for a cohort given as a JSON
//! patient map and print the aggregate result as JSON.
//!
//! Grounded on `src/main.rs` in the teacher for the println!-summary texture,
//! generalized from a single hardcoded policy to a JSON-file-driven cohort.

use anyhow::{Context, Result};
use clap::Parser;
use htn_microsim::bridge::simulate_single_arm;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Run a single treatment arm over a cohort and print aggregate results.
#[derive(Parser, Debug)]
#[command(name = "run_cohort")]
struct Args {
    /// Path to a JSON file holding the patient map (one key per column, one
    /// array per patient).
    #[arg(long)]
    patients: PathBuf,

    /// Path to a JSON file holding the config map.
    #[arg(long)]
    config: PathBuf,

    /// Path to a JSON file holding the PSA parameter map.
    #[arg(long)]
    psa: PathBuf,

    /// Treatment arm to force onto every patient: Intervention, Mra, or StandardCare.
    #[arg(long, default_value = "Intervention")]
    treatment: String,

    /// RNG seed for this run.
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn load_map(path: &PathBuf) -> Result<HashMap<String, Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {} as a JSON object", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let patient_map = load_map(&args.patients)?;
    let config_map = load_map(&args.config)?;
    let psa_map = load_map(&args.psa)?;

    log::info!("simulating {} arm, seed {}", args.treatment, args.seed);
    let result = simulate_single_arm(&patient_map, &args.treatment, &config_map, &psa_map, args.seed)
        .map_err(|e| anyhow::anyhow!("simulation failed: {e}"))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
