// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Workspace-level integration test: the integrator demo assembled and run
//! through the umbrella crate's public API.

use nefsim::config::{validate_config, NefsimConfig};
use nefsim::prelude::*;

#[test]
fn test_integrator_through_umbrella_api() {
    let mut net = Network::new("integrator").with_seed(9);
    let ens = net.add_ensemble(Ensemble::new(100, 1).with_label("memory"));
    let input = net.add_node(Node::new(Process::Piecewise(
        Piecewise::scalar(&[(0.0, 0.0), (0.2, 1.0), (0.6, 0.0)]).unwrap(),
    )));

    net.connect(Connection::new(ens, ens).with_synapse(Synapse::lowpass(0.1)));
    net.connect(
        Connection::new(input, ens)
            .with_synapse(Synapse::lowpass(0.1))
            .scaled(0.1),
    );
    let probe = net.probe(Probe::decoded(ens, 0.01));

    let mut sim = Simulator::new(&net).expect("build failed");
    sim.run(1.5);

    let record = sim.probe_record(probe).expect("probe missing");
    assert_eq!(record.len(), 1500);

    // 0.4 s of unit input -> the integrator should sit near 0.4
    let held = record.last().unwrap()[0];
    assert!(
        (held - 0.4).abs() < 0.2,
        "expected ~0.4 integrated, got {:.3}",
        held
    );
}

#[test]
fn test_default_demo_config_builds_valid_network() {
    let config = NefsimConfig::default();
    validate_config(&config).expect("defaults must validate");

    // The config's parameters assemble into a buildable network
    let mut net = Network::new("from-config").with_seed(config.simulation.seed.unwrap_or(0));
    let ens = net.add_ensemble(Ensemble::new(
        config.integrator.n_neurons,
        config.integrator.dimensions,
    ));
    let steps: Vec<(f64, f64)> = config.input.steps.iter().map(|&[t, v]| (t, v)).collect();
    let input = net.add_node(Node::new(Process::Piecewise(
        Piecewise::scalar(&steps).unwrap(),
    )));
    net.connect(
        Connection::new(ens, ens).with_synapse(Synapse::lowpass(config.integrator.tau)),
    );
    net.connect(
        Connection::new(input, ens)
            .with_synapse(Synapse::lowpass(config.integrator.tau))
            .scaled(config.integrator.tau),
    );
    net.probe(Probe::decoded(ens, config.probe.synapse_tau));

    let mut sim = Simulator::new(&net).expect("network from default config must build");
    sim.run_steps(10);
    assert_eq!(sim.stats().steps, 10);
}
