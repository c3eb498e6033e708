//! 随机分配：在可达候选中均匀选择，显式种子保证可复现

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Assignment, AssignmentStrategy, plan_candidate};
use crate::net::{Network, NodeId, Request};

#[derive(Debug, Clone)]
pub struct RandomAssignment {
    seed: u64,
    rng: StdRng,
}

impl RandomAssignment {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl AssignmentStrategy for RandomAssignment {
    fn name(&self) -> String {
        format!("Random({})", self.seed)
    }

    #[tracing::instrument(skip_all, fields(strategy = "Random", request = request.id().0))]
    fn select_compute_node(
        &mut self,
        request: &Request,
        candidates: &[NodeId],
        network: &Network,
    ) -> Option<Assignment> {
        let mut reachable: Vec<Assignment> = candidates
            .iter()
            .filter_map(|&id| plan_candidate(network, request, id))
            .collect();
        if reachable.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..reachable.len());
        Some(reachable.swap_remove(pick))
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
