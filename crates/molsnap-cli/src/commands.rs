//! CLI command implementations.

use std::path::Path;

use molsnap_checkpoint::{inspect as inspect_file, Layout};
use molsnap_engine::{
    store_properties, validate_config, FeatureSet, FreeFlight, Simulation, SimulationConfig,
};
use molsnap_types::SubsystemId;

/// Build a simulation, step it and checkpoint it.
pub fn sample(
    out: &str,
    config_path: Option<&str>,
    layout: Option<&str>,
    steps: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("molsnap Sample");
    println!("──────────────");

    let (mut sim, configured_layout) = match config_path {
        Some(path) => {
            println!("Config:    {path}");
            let config = SimulationConfig::load(Path::new(path))?;
            (Simulation::from_config(&config)?, config.checkpoint.layout)
        }
        None => {
            println!("Config:    store_properties (built-in)");
            (store_properties()?, Layout::default())
        }
    };
    let layout = match layout {
        Some(name) => name.parse::<Layout>()?,
        None => configured_layout,
    };

    sim.step(&mut FreeFlight::new(), steps)?;
    let snapshot = sim.checkpoint_with(Path::new(out), layout)?;

    println!("Particles: {}", sim.system().len());
    println!("Steps:     {}", sim.system().step_count());
    println!("Sim time:  {:.4}", sim.system().sim_time());
    println!("Layout:    {layout}");
    println!();
    for payload in snapshot.iter() {
        println!("  {:<18} {:>8} bytes", payload.subsystem.name(), payload.len());
    }
    println!();
    println!("Checkpoint written to: {out}");
    Ok(())
}

/// Restore a checkpoint into a fresh simulation.
pub fn restore(dir: &str, steps: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("molsnap Restore");
    println!("───────────────");
    println!();

    let mut sim = Simulation::from_config(&SimulationConfig::default())?;
    sim.restore(Path::new(dir))?;

    let system = sim.system();
    let (charged, q2) = system.charge_summary();
    println!("Particles:   {} ({charged} charged, Σq² = {q2:.3})", system.len());
    println!("Box:         {:?}", system.box_l());
    println!("Step:        {}", system.step_count());
    println!("Sim time:    {:.4}", system.sim_time());
    println!("Pairs:       {}", sim.interactions().len());
    println!(
        "Thermostat:  {} (reproducible: {})",
        sim.thermostat().mode(),
        sim.thermostat().is_reproducible()
    );
    match sim.solver() {
        Some(solver) => println!(
            "P3M:         mesh {:?}, cao {}, alpha {:.4}, error {:.3e}",
            solver.params().mesh,
            solver.params().cao,
            solver.tuning().alpha,
            solver.tuning().estimated_error
        ),
        None => println!("P3M:         none"),
    }

    if steps > 0 {
        sim.step(&mut FreeFlight::new(), steps)?;
        println!();
        println!("Ran {steps} more steps, sim time {:.4}", sim.system().sim_time());
    }

    Ok(())
}

/// List the records of a checkpoint file.
pub fn inspect(path: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = inspect_file(Path::new(path))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("molsnap Checkpoint Inspector");
    println!("────────────────────────────");
    println!("File: {path}");
    println!();
    println!("{:<18} {:>6} {:>10}  sha256", "subsystem", "schema", "bytes");
    for r in &records {
        println!(
            "{:<18} {:>6} {:>10}  {}",
            r.subsystem.name(),
            r.schema_version,
            r.body_len,
            r.digest
        );
    }
    Ok(())
}

/// Validate a simulation config.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("molsnap Validator");
    println!("─────────────────");
    println!();

    if !path.ends_with(".toml") {
        println!("Unsupported file format. Use .toml (config).");
        return Ok(());
    }

    println!("Validating config: {path}");
    let config = SimulationConfig::load(Path::new(path))?;
    match validate_config(&config) {
        Ok(()) => {
            let subsystems = if config.p3m.is_some() {
                SubsystemId::all().len()
            } else {
                SubsystemId::all().len() - 1
            };
            println!(
                "✅ Config is valid ({} particles, {} pairs, {subsystems} subsystems).",
                config.particles.count,
                config.pairs.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Config validation failed: {e}");
            Err(e.into())
        }
    }
}

/// Print the compiled feature set.
pub fn features(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let features = FeatureSet::current();
    if json {
        println!("{}", serde_json::to_string_pretty(&features)?);
        return Ok(());
    }

    for name in molsnap_engine::features::FEATURE_NAMES {
        let mark = if features.is_enabled(name) { "✅" } else { "-" };
        println!("{mark} {name}");
    }
    Ok(())
}
