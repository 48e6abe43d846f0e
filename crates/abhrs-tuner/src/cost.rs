//! Cost models and the round budget

use abhrs_core::config::TunerConfig;
use abhrs_core::Theta;
use serde::{Deserialize, Serialize};

/// Monotone cost of running with a parameter vector
pub trait CostModel: Send + Sync {
    /// Cost of `theta`; total and non-decreasing in ring size
    fn cost(&self, theta: &Theta) -> f64;
}

/// Cost proportional to ring size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCost {
    /// Cost per ring member
    pub per_member: f64,
}

impl LinearCost {
    /// Create with a per-member cost
    pub fn new(per_member: f64) -> Self {
        Self { per_member }
    }
}

impl Default for LinearCost {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CostModel for LinearCost {
    fn cost(&self, theta: &Theta) -> f64 {
        self.per_member * theta.target_ring_size as f64
    }
}

/// Bounds the update rule works within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBudget {
    /// Cost ceiling C_max
    pub c_max: f64,
    /// Hard cap on the target ring size
    pub hard_max_ring_size: usize,
}

impl CostBudget {
    /// Create a budget
    pub fn new(c_max: f64, hard_max_ring_size: usize) -> Self {
        Self {
            c_max,
            hard_max_ring_size,
        }
    }
}

impl From<&TunerConfig> for CostBudget {
    fn from(config: &TunerConfig) -> Self {
        Self::new(config.cost_budget, config.hard_max_ring_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_cost() {
        let cost = LinearCost::new(1.5);
        assert_eq!(cost.cost(&Theta::new(4, 0.5)), 6.0);
        assert!(cost.cost(&Theta::new(5, 0.5)) > cost.cost(&Theta::new(4, 0.5)));
    }
}
