// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network build step
//!
//! Translates a validated [`Network`] into the flat runtime structures the
//! simulator steps over: sampled tuning parameters, scaled encoders,
//! solved decoders, discretized filters, and zeroed state. Everything
//! random happens here; the run itself is deterministic given the build.

use ahash::AHashMap;
use ndarray::Array2;
use tracing::{debug, info};

use nefsim_model::{
    ConnSource, FilterState, Network, Probe, ProbeTarget, Process, Transform,
};
use nefsim_neural::{NeuronModel, PopulationState};

use crate::error::Result;
use crate::probe_data::ProbeRecord;
use crate::sampling;
use crate::solver::lstsq_l2;

/// Default L2 regularization fraction for identity (probe) decoders.
const DEFAULT_REG: f64 = 0.1;

pub(crate) struct BuiltEnsemble {
    pub neuron: NeuronModel,
    pub n_neurons: usize,
    pub dimensions: usize,
    pub bias: Vec<f64>,
    /// Encoders with gain/radius folded in: `J = scaled_encoders . x + bias`.
    pub scaled_encoders: Array2<f64>,
    pub state: PopulationState,
    /// Represented-space input accumulated from connections each step.
    pub input: Vec<f64>,
    /// Per-neuron current scratch.
    pub current: Vec<f64>,
    /// Last step's neuron output (spike impulses or rates).
    pub spikes: Vec<f64>,
}

pub(crate) struct BuiltNode {
    pub process: Process,
    pub value: Vec<f64>,
}

pub(crate) enum BuiltSource {
    Node(usize),
    /// Decoded ensemble output; decoders have the connection's function and
    /// transform folded in (`n_neurons x post_dims`).
    Ensemble { index: usize, decoders: Array2<f64> },
}

pub(crate) struct BuiltConnection {
    pub source: BuiltSource,
    pub post: usize,
    /// Node sources only: transform matrix (`post_dims x node_dims`);
    /// `None` is identity.
    pub transform: Option<Array2<f64>>,
    pub filter: FilterState,
    /// Unfiltered value scratch (`post_dims`).
    pub value: Vec<f64>,
}

pub(crate) enum BuiltProbeSource {
    Decoded { ens: usize, decoders: Array2<f64> },
    Spikes { ens: usize },
    Node { node: usize },
}

pub(crate) struct BuiltProbe {
    pub source: BuiltProbeSource,
    pub filter: FilterState,
    pub every_steps: u64,
    pub scratch: Vec<f64>,
    pub record: ProbeRecord,
}

pub(crate) struct BuiltNetwork {
    pub ensembles: Vec<BuiltEnsemble>,
    pub nodes: Vec<BuiltNode>,
    pub connections: Vec<BuiltConnection>,
    pub probes: Vec<BuiltProbe>,
}

/// Per-ensemble data kept only for decoder solving.
struct EnsembleBuildData {
    eval_points: Array2<f64>,
    activities: Array2<f64>,
}

pub(crate) fn build(network: &Network, dt: f64) -> Result<BuiltNetwork> {
    network.validate()?;

    let mut ensembles = Vec::with_capacity(network.ensembles().len());
    let mut build_data = Vec::with_capacity(network.ensembles().len());

    for (index, ens) in network.ensembles().iter().enumerate() {
        let n = ens.n_neurons;
        let d = ens.dimensions;
        let mut rng = sampling::ensemble_rng(network.seed, ens.seed, index);

        let max_rates = sampling::sample_distribution(&ens.max_rates, n, &mut rng);
        let intercepts = sampling::sample_distribution(&ens.intercepts, n, &mut rng);
        let (gain, bias) = ens.neuron.gain_bias(&max_rates, &intercepts)?;

        let encoders = sampling::sample_unit_encoders(n, d, &mut rng);
        let mut scaled_encoders = encoders;
        for i in 0..n {
            let scale = gain[i] / ens.radius;
            for k in 0..d {
                scaled_encoders[[i, k]] *= scale;
            }
        }

        // Tuning-curve activities at evaluation points, for decoder solving
        let m = sampling::default_n_eval_points(n);
        let eval_points = sampling::sample_eval_points(m, d, ens.radius, &mut rng);
        let mut currents = vec![0.0; m * n];
        for p in 0..m {
            for i in 0..n {
                let mut j = bias[i];
                for k in 0..d {
                    j += scaled_encoders[[i, k]] * eval_points[[p, k]];
                }
                currents[p * n + i] = j;
            }
        }
        let rates = ens.neuron.rates(&currents);
        let mut activities = Array2::zeros((m, n));
        for p in 0..m {
            for i in 0..n {
                activities[[p, i]] = rates[p * n + i];
            }
        }

        debug!(
            "built ensemble `{}`: {} neurons, {} dims, {} eval points",
            ens.name(),
            n,
            d,
            m
        );

        ensembles.push(BuiltEnsemble {
            neuron: ens.neuron,
            n_neurons: n,
            dimensions: d,
            bias,
            scaled_encoders,
            state: PopulationState::new(n),
            input: vec![0.0; d],
            current: vec![0.0; n],
            spikes: vec![0.0; n],
        });
        build_data.push(EnsembleBuildData {
            eval_points,
            activities,
        });
    }

    let nodes: Vec<BuiltNode> = network
        .nodes()
        .iter()
        .map(|node| BuiltNode {
            value: vec![0.0; node.dimensions()],
            process: node.output.clone(),
        })
        .collect();

    // Identity decoders are shared between probes and plain connections
    let mut identity_cache: AHashMap<usize, Array2<f64>> = AHashMap::new();

    let mut connections = Vec::with_capacity(network.connections().len());
    for conn in network.connections() {
        let post_idx = conn.post.index();
        let post_dims = ensembles[post_idx].dimensions;

        let (source, transform) = match conn.pre {
            ConnSource::Node(id) => {
                let node_dims = nodes[id.index()].value.len();
                (
                    BuiltSource::Node(id.index()),
                    transform_matrix(&conn.transform, node_dims, post_dims),
                )
            }
            ConnSource::Ensemble(id) => {
                let pre_idx = id.index();
                let data = &build_data[pre_idx];

                let mut decoders = match (&conn.function, conn.solver_reg) {
                    (None, reg) if reg == DEFAULT_REG => identity_decoders(
                        &mut identity_cache,
                        pre_idx,
                        data,
                    )?,
                    (None, reg) => lstsq_l2(&data.activities, &data.eval_points, reg)?,
                    (Some(f), reg) => {
                        let m = data.eval_points.nrows();
                        let d_in = data.eval_points.ncols();
                        let mut targets = Array2::zeros((m, f.output_dims));
                        let mut x = vec![0.0; d_in];
                        let mut y = vec![0.0; f.output_dims];
                        for p in 0..m {
                            for k in 0..d_in {
                                x[k] = data.eval_points[[p, k]];
                            }
                            f.eval_into(&x, &mut y);
                            for k in 0..f.output_dims {
                                targets[[p, k]] = y[k];
                            }
                        }
                        lstsq_l2(&data.activities, &targets, reg)?
                    }
                };

                // Fold the transform into the decoders
                match &conn.transform {
                    Transform::Identity => {}
                    Transform::Scalar(s) => decoders.mapv_inplace(|v| v * s),
                    Transform::Matrix(rows) => {
                        let t = matrix_from_rows(rows);
                        decoders = decoders.dot(&t.t());
                    }
                }

                (
                    BuiltSource::Ensemble {
                        index: pre_idx,
                        decoders,
                    },
                    None,
                )
            }
        };

        connections.push(BuiltConnection {
            source,
            post: post_idx,
            transform,
            filter: FilterState::new(conn.synapse, post_dims, dt),
            value: vec![0.0; post_dims],
        });
    }

    let mut probes = Vec::with_capacity(network.probes().len());
    for probe in network.probes() {
        let (source, dims) = match probe.target {
            ProbeTarget::Decoded(id) => {
                let idx = id.index();
                let decoders = identity_decoders(&mut identity_cache, idx, &build_data[idx])?;
                (
                    BuiltProbeSource::Decoded {
                        ens: idx,
                        decoders,
                    },
                    ensembles[idx].dimensions,
                )
            }
            ProbeTarget::Spikes(id) => {
                let idx = id.index();
                (BuiltProbeSource::Spikes { ens: idx }, ensembles[idx].n_neurons)
            }
            ProbeTarget::Node(id) => {
                let idx = id.index();
                (BuiltProbeSource::Node { node: idx }, nodes[idx].value.len())
            }
        };

        let every_steps = match probe.sample_every {
            Some(interval) => ((interval / dt).round() as u64).max(1),
            None => 1,
        };

        probes.push(BuiltProbe {
            source,
            filter: FilterState::new(probe.synapse, dims, dt),
            every_steps,
            scratch: vec![0.0; dims],
            record: ProbeRecord::new(probe_label(network, probe), dims),
        });
    }

    info!(
        "network built: {} ensembles, {} nodes, {} connections, {} probes",
        ensembles.len(),
        nodes.len(),
        connections.len(),
        probes.len()
    );

    Ok(BuiltNetwork {
        ensembles,
        nodes,
        connections,
        probes,
    })
}

fn identity_decoders(
    cache: &mut AHashMap<usize, Array2<f64>>,
    ens_idx: usize,
    data: &EnsembleBuildData,
) -> Result<Array2<f64>> {
    if let Some(dec) = cache.get(&ens_idx) {
        return Ok(dec.clone());
    }
    let dec = lstsq_l2(&data.activities, &data.eval_points, DEFAULT_REG)?;
    cache.insert(ens_idx, dec.clone());
    Ok(dec)
}

/// Materialize a transform for node-sourced connections.
fn transform_matrix(
    transform: &Transform,
    source_dims: usize,
    post_dims: usize,
) -> Option<Array2<f64>> {
    match transform {
        Transform::Identity => None,
        Transform::Scalar(s) => {
            let mut m = Array2::zeros((post_dims, source_dims));
            for i in 0..post_dims.min(source_dims) {
                m[[i, i]] = *s;
            }
            Some(m)
        }
        Transform::Matrix(rows) => Some(matrix_from_rows(rows)),
    }
}

fn matrix_from_rows(rows: &[Vec<f64>]) -> Array2<f64> {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut m = Array2::zeros((nrows, ncols));
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            m[[i, j]] = v;
        }
    }
    m
}

fn probe_label(network: &Network, probe: &Probe) -> String {
    if let Some(label) = &probe.label {
        return label.clone();
    }
    match probe.target {
        ProbeTarget::Decoded(id) => format!("{}.decoded", id),
        ProbeTarget::Spikes(id) => format!("{}.spikes", id),
        ProbeTarget::Node(id) => match network.node(id) {
            Ok(node) if node.label.is_some() => node.label.clone().unwrap_or_default(),
            _ => id.to_string(),
        },
    }
}
