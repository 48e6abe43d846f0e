//! Closed-loop tuning from theta = (4, 0.5) under budget 6.0

use abhrs_core::config::TunerConfig;
use abhrs_core::{AttributeSet, Effects, ParameterStore, Theta};
use abhrs_crypto::ProtocolBackend;
use abhrs_protocol::Policy;
use abhrs_testkit::init_test_tracing;
use abhrs_tuner::{
    CodesignTuner, CostBudget, ItemOutcome, LinearCost, Simulation, Workload, WorkloadItem,
};
use assert_matches::assert_matches;
use std::sync::Arc;

fn doctors() -> Policy {
    Policy::attribute_equals("doctors".into(), "role", "doctor")
}

fn simulation(test_name: &str, backend: ProtocolBackend) -> Simulation {
    Simulation::bootstrap(
        backend,
        3,
        AttributeSet::new().with("role", "doctor"),
        Effects::for_test(test_name),
    )
    .unwrap()
}

fn workload() -> Workload {
    Workload::new(
        (0..6)
            .map(|i| WorkloadItem::new(format!("read_record_patient_{i:03}"), doctors()))
            .collect(),
    )
}

#[test]
fn ring_size_climbs_then_holds_at_budget() {
    init_test_tracing();
    let store = Arc::new(ParameterStore::new(Theta::new(4, 0.5)));
    let tuner = CodesignTuner::new(
        simulation("scenario_b", ProtocolBackend::symbolic()),
        store.clone(),
        CostBudget::new(6.0, 64),
    )
    .with_cost_model(LinearCost::new(1.0));

    let history = tuner.run(&workload(), 4);

    assert_eq!(history.ring_sizes(), vec![4, 5, 6, 6]);
    assert_eq!(store.history_len(), 5);
    assert_eq!(store.snapshot().target_ring_size, 6);
    assert_eq!(history.final_theta().map(|t| t.target_ring_size), Some(6));

    for report in &history.reports {
        assert_eq!(report.accepted, 6);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.cost, report.theta.target_ring_size as f64);
    }

    let aggregate: Vec<f64> = history
        .reports
        .iter()
        .map(|report| report.aggregate_leakage)
        .collect();
    assert!(aggregate[1] < aggregate[0]);
    assert!(aggregate[2] < aggregate[1]);
    assert!((aggregate[3] - aggregate[2]).abs() < 1e-12);
}

#[test]
fn configured_tuner_matches_reference_run() {
    let store = Arc::new(ParameterStore::new(Theta::new(4, 0.5)));
    let config = TunerConfig::default();
    let tuner = CodesignTuner::from_config(
        &config,
        simulation("scenario_b_config", ProtocolBackend::symbolic()),
        store,
    );
    let history = tuner.run(&workload(), config.rounds);
    assert_eq!(history.ring_sizes(), vec![4, 5, 6, 6]);
}

#[test]
fn attested_backend_runs_the_same_loop() {
    let effects = Effects::for_test("scenario_b_attested");
    let backend = ProtocolBackend::attested(&effects);
    let sim = Simulation::bootstrap(
        backend,
        2,
        AttributeSet::new().with("role", "doctor"),
        effects,
    )
    .unwrap();
    let store = Arc::new(ParameterStore::new(Theta::new(4, 0.5)));
    let tuner = CodesignTuner::new(sim, store, CostBudget::new(6.0, 64));

    let history = tuner.run(&workload(), 3);
    assert_eq!(history.ring_sizes(), vec![4, 5, 6]);
    assert!(history.reports.iter().all(|r| r.accepted == 6));
}

#[test]
fn failing_items_are_rejected_not_fatal() {
    let sim = simulation("scenario_b_rejections", ProtocolBackend::symbolic());
    let nurses = Policy::attribute_equals("nurses".into(), "role", "nurse");
    let mixed = Workload::new(vec![
        WorkloadItem::new("read_record_patient_001", doctors()),
        WorkloadItem::new("read_record_patient_002", nurses),
        WorkloadItem::new("read_record_patient_003", doctors()),
    ]);
    let theta = Theta::new(4, 0.5);

    let outcomes = sim.simulate(&theta, &mixed);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|outcome| outcome.ring_size() == 4));
    assert_matches!(outcomes[1], ItemOutcome::Rejected { .. });
    assert!(outcomes[0].accepted_transcript().is_some());

    let tuner = CodesignTuner::new(
        sim,
        Arc::new(ParameterStore::new(theta)),
        CostBudget::new(6.0, 64),
    );
    let report = tuner.run_codesign_round(0, &theta, &mixed, &CostBudget::new(6.0, 64));
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.next_theta.target_ring_size, 5);
}

#[test]
fn more_honest_members_than_target_keeps_every_member() {
    let sim = simulation("scenario_b_floor", ProtocolBackend::symbolic());
    let outcomes = sim.simulate(&Theta::new(2, 0.5), &workload());
    assert!(outcomes.iter().all(|outcome| outcome.ring_size() == 3));
}
