//! Parameter update rules

use crate::cost::CostBudget;
use abhrs_core::Theta;

/// Produces the next parameter vector from the current one and its cost
pub trait UpdateRule: Send + Sync {
    /// Rule name for logs
    fn name(&self) -> &'static str;

    /// Next theta; must never grow the ring past `hard_max`
    fn next(&self, theta: &Theta, cost: f64, budget: &CostBudget) -> Theta;
}

/// Grow the ring by one while under budget, otherwise hold
///
/// Never shrinks: a ring already above `hard_max` stays where it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimb;

impl UpdateRule for HillClimb {
    fn name(&self) -> &'static str {
        "hill-climb"
    }

    fn next(&self, theta: &Theta, cost: f64, budget: &CostBudget) -> Theta {
        let size = theta.target_ring_size;
        let next_size = if cost < budget.c_max && size < budget.hard_max_ring_size {
            size + 1
        } else {
            size
        };
        theta.with_target_ring_size(next_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_under_budget() {
        let budget = CostBudget::new(6.0, 64);
        let next = HillClimb.next(&Theta::new(4, 0.5), 4.0, &budget);
        assert_eq!(next.target_ring_size, 5);
        assert_eq!(next.version, 1);
    }

    #[test]
    fn test_holds_at_budget() {
        let budget = CostBudget::new(6.0, 64);
        let next = HillClimb.next(&Theta::new(6, 0.5), 6.0, &budget);
        assert_eq!(next.target_ring_size, 6);
    }

    #[test]
    fn test_respects_hard_max() {
        let budget = CostBudget::new(1000.0, 8);
        let next = HillClimb.next(&Theta::new(8, 0.5), 8.0, &budget);
        assert_eq!(next.target_ring_size, 8);
    }

    #[test]
    fn test_holds_above_hard_max() {
        let budget = CostBudget::new(1000.0, 8);
        let next = HillClimb.next(&Theta::new(10, 0.5), 1.0, &budget);
        assert_eq!(next.target_ring_size, 10);
        assert_eq!(next.version, 1);
    }

    #[test]
    fn test_keeps_decoy_ratio() {
        let budget = CostBudget::new(10.0, 64);
        let next = HillClimb.next(&Theta::new(2, 0.75), 2.0, &budget);
        assert_eq!(next.decoy_ratio, 0.75);
    }
}
