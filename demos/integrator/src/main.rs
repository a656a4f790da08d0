// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recurrent neural integrator demo
//!
//! A single ensemble wired back onto itself through a slow synapse
//! integrates its input: with feedback decoders computing the identity and
//! the input scaled by the synapse time constant, the represented value
//! accumulates the input signal over time.
//!
//! The run writes a CSV with the input, the decoded value, and the ideal
//! integral, and logs summary statistics. Defaults reproduce the classic
//! demonstration: 100 LIF neurons, tau = 0.1 s, a piecewise input schedule
//! stepping through +1, -2, and +1 pulses, simulated for 6 seconds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nefsim::config::{load_or_default, validate_config, NefsimConfig};
use nefsim::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "integrator", about = "1-D recurrent neural integrator demo")]
struct Cli {
    /// Path to a nefsim.toml (searched for if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the run duration in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Override the output CSV path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the build seed
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_or_default(cli.config.as_deref()).context("loading configuration")?;
    if let Some(duration) = cli.duration {
        config.simulation.duration = duration;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    validate_config(&config).context("validating configuration")?;

    info!("neural integrator demo (nefsim v{})", nefsim::VERSION);
    info!(
        "{} neurons, {} dim, tau={}s, dt={}s, {}s run",
        config.integrator.n_neurons,
        config.integrator.dimensions,
        config.integrator.tau,
        config.simulation.dt,
        config.simulation.duration
    );

    let (network, value_probe, input_probe) =
        build_integrator(&config).context("building network")?;

    let mut sim =
        Simulator::with_dt(&network, config.simulation.dt).context("building simulator")?;
    sim.run(config.simulation.duration);

    let stats = sim.stats();
    info!(
        "run complete: {} steps, {} spikes ({:.1} per step), {:.1}ms wall time",
        stats.steps,
        stats.spikes_emitted,
        stats.avg_spikes_per_step(),
        stats.wall_time_us as f64 / 1000.0
    );

    report(&sim, &config, value_probe, input_probe)
}

/// Assemble the integrator network from the configuration.
fn build_integrator(config: &NefsimConfig) -> Result<(Network, ProbeId, ProbeId)> {
    let tau = config.integrator.tau;
    let dims = config.integrator.dimensions;

    // Scalar schedule broadcast across the represented dimensions
    let steps: Vec<(f64, Vec<f64>)> = config
        .input
        .steps
        .iter()
        .map(|&[time, value]| (time, vec![value; dims]))
        .collect();
    let schedule = Piecewise::new(steps).context("building input schedule")?;

    let mut network = Network::new("integrator");
    if let Some(seed) = config.simulation.seed {
        network = network.with_seed(seed);
    }

    let ensemble = network.add_ensemble(
        Ensemble::new(config.integrator.n_neurons, dims)
            .with_label("memory")
            .with_radius(config.integrator.radius),
    );
    let input = network.add_node(Node::new(Process::Piecewise(schedule)).with_label("input"));

    // Feedback: identity through the slow synapse
    network.connect(Connection::new(ensemble, ensemble).with_synapse(Synapse::lowpass(tau)));
    // Input scaled by tau through the same synapse
    network.connect(
        Connection::new(input, ensemble)
            .with_synapse(Synapse::lowpass(tau))
            .scaled(tau),
    );

    let mut value_probe = Probe::decoded(ensemble, config.probe.synapse_tau);
    let mut input_probe = Probe::node(input).with_label("input");
    if let Some(interval) = config.probe.sample_every {
        value_probe = value_probe.with_sample_every(interval);
        input_probe = input_probe.with_sample_every(interval);
    }
    let value_probe = network.probe(value_probe.with_label("decoded"));
    let input_probe = network.probe(input_probe);

    Ok((network, value_probe, input_probe))
}

/// Export the recorded series and log the summary.
fn report(
    sim: &Simulator,
    config: &NefsimConfig,
    value_probe: ProbeId,
    input_probe: ProbeId,
) -> Result<()> {
    let decoded = sim.probe_record(value_probe)?;
    let input = sim.probe_record(input_probe)?;

    // Running integral of the recorded input, as the reference trace
    let sample_dt = config
        .probe
        .sample_every
        .unwrap_or(config.simulation.dt);
    let mut ideal = Vec::with_capacity(input.len());
    let mut acc = 0.0;
    for row in input.rows() {
        acc += row[0] * sample_dt;
        ideal.push(acc);
    }

    let mut writer =
        csv::Writer::from_path(&config.output.csv_path).context("opening output CSV")?;
    writer.write_record(["t", "input", "decoded", "ideal"])?;
    for i in 0..decoded.len() {
        writer.write_record(&[
            format!("{:.6}", decoded.times()[i]),
            format!("{}", input.row(i)[0]),
            format!("{}", decoded.row(i)[0]),
            format!("{}", ideal[i]),
        ])?;
    }
    writer.flush()?;

    let final_value = decoded.last().map(|row| row[0]).unwrap_or(0.0);
    let final_ideal = ideal.last().copied().unwrap_or(0.0);
    let rmse = {
        let sum: f64 = decoded
            .rows()
            .zip(ideal.iter())
            .map(|(row, &target)| (row[0] - target) * (row[0] - target))
            .sum();
        (sum / decoded.len().max(1) as f64).sqrt()
    };

    info!(
        "final value {:.3} (ideal integral {:.3}), RMSE {:.3}",
        final_value, final_ideal, rmse
    );
    info!("wrote {} samples to {}", decoded.len(), config.output.csv_path);
    Ok(())
}
