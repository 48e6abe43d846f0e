//! ABHRS Tuner - closed-loop anonymity/cost tuning
//!
//! Repeatedly simulates sign/verify cycles under the live parameter
//! snapshot, scores what an adversary learns, prices the parameters, and
//! publishes a new snapshot. Every strategy is pluggable:
//!
//! - [`LeakageModel`]: per-transcript leakage on three axes
//! - [`CostModel`]: monotone price of a parameter vector
//! - [`UpdateRule`]: next parameter vector from the current one

#![forbid(unsafe_code)]

/// Cost models and the budget
pub mod cost;
/// Leakage models and weights
pub mod leakage;
/// Sign/verify simulation
pub mod simulation;
/// Tuning loop
pub mod tuner;
/// Update rules
pub mod update;

pub use cost::{CostBudget, CostModel, LinearCost};
pub use leakage::{LeakageModel, LeakageScores, LeakageWeights, ReferenceLeakageModel};
pub use simulation::{ItemOutcome, Participant, Simulation, Workload, WorkloadItem};
pub use tuner::{CodesignTuner, RoundReport, TuningHistory};
pub use update::{HillClimb, UpdateRule};
