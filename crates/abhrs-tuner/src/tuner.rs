//! Adversarial co-design loop
//!
//! Each round runs the whole workload under one theta snapshot, waits for
//! every item, scores leakage, prices theta, and asks the update rule for the
//! next snapshot. The loop stops after a fixed number of rounds; the ring
//! size can never exceed the budget's hard maximum.

use crate::cost::{CostBudget, CostModel, LinearCost};
use crate::leakage::{LeakageModel, LeakageScores, LeakageWeights, ReferenceLeakageModel};
use crate::simulation::{Simulation, Workload};
use crate::update::{HillClimb, UpdateRule};
use abhrs_core::config::TunerConfig;
use abhrs_core::{ParameterStore, Theta};
use std::sync::Arc;

/// Summary of one tuning round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Zero-based round index
    pub round: usize,
    /// Snapshot the round ran under
    pub theta: Theta,
    /// Snapshot proposed for the next round
    pub next_theta: Theta,
    /// Items that signed and verified
    pub accepted: usize,
    /// Items that failed to sign or verify
    pub rejected: usize,
    /// Mean per-axis leakage over accepted items
    pub leakage: LeakageScores,
    /// Weighted leakage
    pub aggregate_leakage: f64,
    /// Cost of `theta`
    pub cost: f64,
}

/// Reports of a completed run, in round order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuningHistory {
    /// Per-round reports
    pub reports: Vec<RoundReport>,
}

impl TuningHistory {
    /// Target ring size each round ran under
    pub fn ring_sizes(&self) -> Vec<usize> {
        self.reports
            .iter()
            .map(|report| report.theta.target_ring_size)
            .collect()
    }

    /// Snapshot proposed by the last round
    pub fn final_theta(&self) -> Option<Theta> {
        self.reports.last().map(|report| report.next_theta)
    }
}

/// Closed-loop tuner over the shared parameter store
pub struct CodesignTuner {
    simulation: Simulation,
    store: Arc<ParameterStore>,
    leakage: Box<dyn LeakageModel>,
    weights: LeakageWeights,
    cost: Box<dyn CostModel>,
    update: Box<dyn UpdateRule>,
    budget: CostBudget,
}

impl CodesignTuner {
    /// Reference strategies with default weights and unit linear cost
    pub fn new(simulation: Simulation, store: Arc<ParameterStore>, budget: CostBudget) -> Self {
        Self {
            simulation,
            store,
            leakage: Box::new(ReferenceLeakageModel::default()),
            weights: LeakageWeights::default(),
            cost: Box::new(LinearCost::default()),
            update: Box::new(HillClimb),
            budget,
        }
    }

    /// Reference strategies parameterized from configuration
    pub fn from_config(
        config: &TunerConfig,
        simulation: Simulation,
        store: Arc<ParameterStore>,
    ) -> Self {
        Self::new(simulation, store, CostBudget::from(config))
            .with_leakage_model(ReferenceLeakageModel::new(config.leakage_floor))
            .with_weights(LeakageWeights::from(&config.weights))
            .with_cost_model(LinearCost::new(config.cost_per_member))
    }

    /// Replace the leakage model
    pub fn with_leakage_model(mut self, model: impl LeakageModel + 'static) -> Self {
        self.leakage = Box::new(model);
        self
    }

    /// Replace the aggregation weights
    pub fn with_weights(mut self, weights: LeakageWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the cost model
    pub fn with_cost_model(mut self, model: impl CostModel + 'static) -> Self {
        self.cost = Box::new(model);
        self
    }

    /// Replace the update rule
    pub fn with_update_rule(mut self, rule: impl UpdateRule + 'static) -> Self {
        self.update = Box::new(rule);
        self
    }

    /// Parameter store the tuner publishes to
    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Run one round under `theta`
    ///
    /// Total: failed items count as rejected and never abort the round.
    pub fn run_codesign_round(
        &self,
        round: usize,
        theta: &Theta,
        workload: &Workload,
        budget: &CostBudget,
    ) -> RoundReport {
        let outcomes = self.simulation.simulate(theta, workload);

        let scores: Vec<LeakageScores> = outcomes
            .iter()
            .filter_map(|outcome| outcome.accepted_transcript())
            .map(|transcript| self.leakage.score(transcript))
            .collect();
        let accepted = scores.len();
        let rejected = outcomes.len() - accepted;

        let leakage = LeakageScores::mean(&scores);
        let aggregate_leakage = self.weights.combine(&leakage);
        let cost = self.cost.cost(theta);
        let next_theta = self.update.next(theta, cost, budget);

        tracing::info!(
            round,
            ring_size = theta.target_ring_size,
            next_ring_size = next_theta.target_ring_size,
            accepted,
            rejected,
            aggregate_leakage,
            cost,
            rule = self.update.name(),
            "Completed co-design round"
        );

        RoundReport {
            round,
            theta: *theta,
            next_theta,
            accepted,
            rejected,
            leakage,
            aggregate_leakage,
            cost,
        }
    }

    /// Run `rounds` rounds, publishing each proposed snapshot between rounds
    pub fn run(&self, workload: &Workload, rounds: usize) -> TuningHistory {
        let mut history = TuningHistory::default();
        for round in 0..rounds {
            let theta = self.store.snapshot();
            let report = self.run_codesign_round(round, &theta, workload, &self.budget);
            self.store.publish(report.next_theta);
            history.reports.push(report);
        }
        history
    }
}

impl std::fmt::Debug for CodesignTuner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodesignTuner")
            .field("weights", &self.weights)
            .field("budget", &self.budget)
            .field("update", &self.update.name())
            .finish()
    }
}
