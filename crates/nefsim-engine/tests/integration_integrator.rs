// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Integration Tests: Recurrent Integrator
//!
//! End-to-end tests of the canonical recurrent network: an ensemble fed
//! back onto itself through a slow synapse, with input scaled by the same
//! time constant. The decoded output should track the running integral of
//! the input within population-coding error.

use nefsim_engine::Simulator;
use nefsim_model::{
    Connection, Ensemble, Network, Node, Piecewise, Probe, ProbeId, Process, Synapse,
};

const TAU: f64 = 0.1;

/// Build an integrator over the given input schedule.
fn integrator(n_neurons: usize, seed: u64, schedule: &[(f64, f64)]) -> (Network, ProbeId, ProbeId) {
    let mut net = Network::new("integrator").with_seed(seed);

    let ens = net.add_ensemble(Ensemble::new(n_neurons, 1).with_label("memory"));
    let input = net.add_node(
        Node::new(Process::Piecewise(Piecewise::scalar(schedule).unwrap())).with_label("input"),
    );

    // Feedback: identity through the slow synapse
    net.connect(Connection::new(ens, ens).with_synapse(Synapse::lowpass(TAU)));
    // Input scaled by tau through the same synapse
    net.connect(
        Connection::new(input, ens)
            .with_synapse(Synapse::lowpass(TAU))
            .scaled(TAU),
    );

    let value_probe = net.probe(Probe::decoded(ens, 0.01));
    let input_probe = net.probe(Probe::node(input));
    (net, value_probe, input_probe)
}

fn value_at(sim: &Simulator, probe: ProbeId, t: f64) -> f64 {
    let record = sim.probe_record(probe).unwrap();
    let idx = record
        .times()
        .iter()
        .position(|&rt| rt >= t)
        .unwrap_or(record.len() - 1);
    record.row(idx)[0]
}

#[test]
fn test_integrator_accumulates_and_holds() {
    // One 0.5-second unit pulse: the integral ramps to 0.5 and holds there.
    let (net, value_probe, _) = integrator(150, 17, &[(0.0, 0.0), (0.2, 1.0), (0.7, 0.0)]);
    let mut sim = Simulator::new(&net).unwrap();
    sim.run(2.0);

    let plateau = value_at(&sim, value_probe, 0.95);
    assert!(
        (plateau - 0.5).abs() < 0.15,
        "expected ~0.5 after the pulse, got {:.3}",
        plateau
    );

    // Memory: the value holds with only slow drift
    let held = value_at(&sim, value_probe, 2.0);
    assert!(
        (held - 0.5).abs() < 0.2,
        "integrator drifted to {:.3} after 1.3 s of holding",
        held
    );

    // Before the pulse the integrator is near zero
    let early = value_at(&sim, value_probe, 0.15);
    assert!(early.abs() < 0.1, "nonzero start: {:.3}", early);
}

#[test]
fn test_integrator_with_notebook_schedule() {
    // The classic demo schedule: up to 0.8, hold, down past the
    // representational range, back up.
    let schedule = [
        (0.0, 0.0),
        (0.2, 1.0),
        (1.0, 0.0),
        (2.0, -2.0),
        (3.0, 0.0),
        (4.0, 1.0),
        (5.0, 0.0),
    ];
    let (net, value_probe, input_probe) = integrator(100, 42, &schedule);
    let mut sim = Simulator::new(&net).unwrap();
    sim.run(6.0);

    assert_eq!(sim.stats().steps, 6000);

    // Plateau at 0.8 between the first two input steps
    let plateau = value_at(&sim, value_probe, 1.5);
    assert!(
        (plateau - 0.8).abs() < 0.2,
        "expected ~0.8 plateau, got {:.3}",
        plateau
    );

    // The -2 pulse drives the value to the bottom of the representational
    // range; saturation keeps it near -1 rather than the ideal -1.2
    let bottom = value_at(&sim, value_probe, 3.5);
    assert!(bottom < -0.7, "expected saturation near -1, got {:.3}", bottom);

    // The final +1 pulse brings it back up
    let end = value_at(&sim, value_probe, 6.0);
    assert!(end > bottom + 0.5, "no recovery: {:.3} -> {:.3}", bottom, end);

    // Input probe reproduces the schedule exactly
    let input_record = sim.probe_record(input_probe).unwrap();
    assert_eq!(value_at(&sim, input_probe, 2.5), -2.0);
    assert_eq!(input_record.len(), 6000);
}

#[test]
fn test_seeded_build_is_reproducible() {
    let schedule = [(0.0, 0.0), (0.2, 1.0), (0.7, 0.0)];
    let (net_a, probe_a, _) = integrator(80, 7, &schedule);
    let (net_b, probe_b, _) = integrator(80, 7, &schedule);

    let mut sim_a = Simulator::new(&net_a).unwrap();
    let mut sim_b = Simulator::new(&net_b).unwrap();
    sim_a.run(1.0);
    sim_b.run(1.0);

    let rec_a = sim_a.probe_record(probe_a).unwrap();
    let rec_b = sim_b.probe_record(probe_b).unwrap();
    assert_eq!(rec_a.len(), rec_b.len());
    for i in 0..rec_a.len() {
        assert_eq!(rec_a.row(i), rec_b.row(i), "divergence at sample {}", i);
    }
}

#[test]
fn test_reset_reproduces_run() {
    let (net, value_probe, _) = integrator(60, 3, &[(0.0, 0.0), (0.1, 1.0)]);
    let mut sim = Simulator::new(&net).unwrap();
    sim.run(0.5);
    let first: Vec<f64> = sim
        .probe_record(value_probe)
        .unwrap()
        .rows()
        .map(|r| r[0])
        .collect();

    sim.reset();
    sim.run(0.5);
    let second: Vec<f64> = sim
        .probe_record(value_probe)
        .unwrap()
        .rows()
        .map(|r| r[0])
        .collect();

    assert_eq!(first, second);
}
