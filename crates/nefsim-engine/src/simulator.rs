// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Time-stepped simulation
//!
//! Step order, per timestep at `t = (k+1) * dt`:
//! 1. Sample node processes at `t`.
//! 2. Compute each connection's source value (node output, or the previous
//!    step's spikes through the connection decoders) and advance its
//!    synapse filter.
//! 3. Accumulate filtered connection outputs into ensemble inputs.
//! 4. Compute per-neuron currents and step the neuron models.
//! 5. Advance probe filters on the fresh outputs and record due samples.
//!
//! Recurrent loops are well-defined because connections always read the
//! previous step's spikes; the synapse state carries the feedback delay.

use std::time::Instant;

use tracing::debug;

use nefsim_model::{Network, ProbeId};

use crate::builder::{self, BuiltConnection, BuiltEnsemble, BuiltNode, BuiltProbe, BuiltProbeSource, BuiltSource};
use crate::error::{EngineError, Result};
use crate::probe_data::ProbeRecord;
use crate::SimStats;

/// A built, runnable simulation.
pub struct Simulator {
    dt: f64,
    time: f64,
    n_steps: u64,
    ensembles: Vec<BuiltEnsemble>,
    nodes: Vec<BuiltNode>,
    connections: Vec<BuiltConnection>,
    probes: Vec<BuiltProbe>,
    stats: SimStats,
}

impl Simulator {
    /// Default timestep: 1 ms.
    pub const DEFAULT_DT: f64 = 0.001;

    /// Build a simulator with the default timestep.
    pub fn new(network: &Network) -> Result<Self> {
        Self::with_dt(network, Self::DEFAULT_DT)
    }

    /// Build a simulator with an explicit timestep.
    pub fn with_dt(network: &Network, dt: f64) -> Result<Self> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(EngineError::InvalidTimestep(dt));
        }
        let built = builder::build(network, dt)?;
        Ok(Self {
            dt,
            time: 0.0,
            n_steps: 0,
            ensembles: built.ensembles,
            nodes: built.nodes,
            connections: built.connections,
            probes: built.probes,
            stats: SimStats::default(),
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Run for `duration` seconds, rounded to the nearest whole step count.
    pub fn run(&mut self, duration: f64) {
        let steps = if duration > 0.0 {
            (duration / self.dt).round() as u64
        } else {
            0
        };
        self.run_steps(steps);
    }

    /// Run a fixed number of steps.
    pub fn run_steps(&mut self, steps: u64) {
        let start = Instant::now();
        for _ in 0..steps {
            self.step();
        }
        self.stats.wall_time_us += start.elapsed().as_micros() as u64;
        debug!(
            "ran {} steps to t={:.3}s ({} spikes total)",
            steps, self.time, self.stats.spikes_emitted
        );
    }

    /// Advance one timestep.
    pub fn step(&mut self) {
        let t = (self.n_steps + 1) as f64 * self.dt;

        // 1. Node outputs at t
        for node in &mut self.nodes {
            node.process.sample_into(t, &mut node.value);
        }

        // 2. Connection values from previous-step spikes, then filters
        let ensembles = &self.ensembles;
        let nodes = &self.nodes;
        for conn in &mut self.connections {
            match &conn.source {
                BuiltSource::Node(idx) => {
                    let v = &nodes[*idx].value;
                    match &conn.transform {
                        None => conn.value.copy_from_slice(v),
                        Some(m) => {
                            for (row, out) in conn.value.iter_mut().enumerate() {
                                let mut acc = 0.0;
                                for (col, &vi) in v.iter().enumerate() {
                                    acc += m[[row, col]] * vi;
                                }
                                *out = acc;
                            }
                        }
                    }
                }
                BuiltSource::Ensemble { index, decoders } => {
                    let spikes = &ensembles[*index].spikes;
                    conn.value.fill(0.0);
                    for (i, &s) in spikes.iter().enumerate() {
                        if s != 0.0 {
                            for (dim, out) in conn.value.iter_mut().enumerate() {
                                *out += s * decoders[[i, dim]];
                            }
                        }
                    }
                }
            }
            conn.filter.step(&conn.value);
        }

        // 3. Accumulate into ensemble inputs
        for ens in &mut self.ensembles {
            ens.input.fill(0.0);
        }
        for conn in &self.connections {
            let input = &mut self.ensembles[conn.post].input;
            for (acc, &v) in input.iter_mut().zip(conn.filter.value().iter()) {
                *acc += v;
            }
        }

        // 4. Currents and neuron dynamics
        for ens in &mut self.ensembles {
            for i in 0..ens.n_neurons {
                let mut j = ens.bias[i];
                for k in 0..ens.dimensions {
                    j += ens.scaled_encoders[[i, k]] * ens.input[k];
                }
                ens.current[i] = j;
            }
            ens.neuron
                .step(self.dt, &ens.current, &mut ens.state, &mut ens.spikes);
            if ens.neuron.is_spiking() {
                self.stats.spikes_emitted +=
                    ens.spikes.iter().filter(|&&s| s > 0.0).count() as u64;
            }
        }

        self.n_steps += 1;
        self.time = t;
        self.stats.steps += 1;

        // 5. Probes: filters advance every step, records only when due
        let ensembles = &self.ensembles;
        let nodes = &self.nodes;
        for probe in &mut self.probes {
            match &probe.source {
                BuiltProbeSource::Decoded { ens, decoders } => {
                    let spikes = &ensembles[*ens].spikes;
                    probe.scratch.fill(0.0);
                    for (i, &s) in spikes.iter().enumerate() {
                        if s != 0.0 {
                            for (dim, out) in probe.scratch.iter_mut().enumerate() {
                                *out += s * decoders[[i, dim]];
                            }
                        }
                    }
                }
                BuiltProbeSource::Spikes { ens } => {
                    probe.scratch.copy_from_slice(&ensembles[*ens].spikes);
                }
                BuiltProbeSource::Node { node } => {
                    probe.scratch.copy_from_slice(&nodes[*node].value);
                }
            }
            probe.filter.step(&probe.scratch);
            if self.n_steps % probe.every_steps == 0 {
                probe.record.push(self.time, probe.filter.value());
            }
        }
    }

    /// Recorded data for a probe.
    pub fn probe_record(&self, id: ProbeId) -> Result<&ProbeRecord> {
        self.probes
            .get(id.index())
            .map(|p| &p.record)
            .ok_or(EngineError::ProbeNotFound(id))
    }

    /// Return the simulation to its just-built state: time zero, zeroed
    /// neuron and filter state, empty probe records. Sampled parameters and
    /// solved decoders are untouched.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.n_steps = 0;
        self.stats = SimStats::default();
        for ens in &mut self.ensembles {
            ens.state.reset();
            ens.input.fill(0.0);
            ens.current.fill(0.0);
            ens.spikes.fill(0.0);
        }
        for node in &mut self.nodes {
            node.value.fill(0.0);
        }
        for conn in &mut self.connections {
            conn.filter.reset();
            conn.value.fill(0.0);
        }
        for probe in &mut self.probes {
            probe.filter.reset();
            probe.scratch.fill(0.0);
            probe.record.clear();
        }
    }
}
