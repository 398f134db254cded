use crate::common::{Cube, Plan, State, StopSignal};
use crate::config::Config;
use crate::heuristic::{self, UNREACHABLE};
use crate::scheduler::SliceBudget;
use crate::search::{Direction, NodeState, SearchQueue, SearchTree, Strategy};

use dashmap::DashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace};

/// States already claimed by some solver, shared across worker threads.
pub type SharedVisited = Arc<DashSet<State>>;

/// Forward search over one cube that can be advanced slice by slice. The
/// frontier and visited set survive between calls.
pub struct CubeSolver {
    cube: Cube,
    tree: SearchTree,
    queue: SearchQueue,
    shared: Option<SharedVisited>,
    signal: StopSignal,
    exhausted: bool,
    total_iterations: u64,
    total_time: Duration,
}

impl CubeSolver {
    pub fn new(
        cube: Cube,
        config: &Config,
        seed: u64,
        shared: Option<SharedVisited>,
        signal: StopSignal,
    ) -> Self {
        let strategy = Strategy {
            mode: config.cube_solve_search_strategy,
            weight: config.cube_solve_heuristic_weight,
            seed,
        };
        let heuristic = config
            .cube_solve_heuristic
            .map(|kind| heuristic::build(kind, seed));
        let mut tree = SearchTree::new(cube.problem().clone(), Direction::Forward);
        let mut queue = SearchQueue::new(strategy, heuristic, None);
        let root = tree.root();
        let exhausted = queue.add(&mut tree, root).is_none();
        if exhausted {
            debug!("cube cannot reach the goal");
        }
        CubeSolver {
            cube,
            tree,
            queue,
            shared,
            signal,
            exhausted,
            total_iterations: 0,
            total_time: Duration::ZERO,
        }
    }

    /// Expands nodes until the budget is spent, the frontier runs dry, the
    /// stop signal fires or a goal node is reached. A goal node yields a plan
    /// for the original problem.
    #[instrument(skip_all, name = "calculate_steps", level = "trace")]
    pub fn calculate_steps(&mut self, budget: &SliceBudget) -> Option<Plan> {
        if self.exhausted {
            return None;
        }
        let start = Instant::now();
        let mut iterations = 0;
        let mut plan = None;
        loop {
            if budget.iterations > 0 && iterations >= budget.iterations {
                break;
            }
            if budget.time.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }
            if self.signal.should_stop() {
                break;
            }
            let Some(id) = self.queue.get(&self.tree) else {
                debug!("cube exhausted after {} iterations", self.total_iterations + iterations);
                self.exhausted = true;
                break;
            };
            iterations += 1;
            if self.tree.satisfies_problem(id) {
                let local = self.tree.partial_plan(id);
                trace!("cube solved with {} local steps", local.len());
                plan = Some(self.cube.finalize_plan(local));
                break;
            }
            for child in self.tree.successors(id) {
                if let (Some(shared), NodeState::Forward(state)) = (&self.shared, &child.state) {
                    if !shared.insert(state.clone()) {
                        continue;
                    }
                }
                self.queue.add(&mut self.tree, child);
            }
        }
        if plan.is_none() && !self.exhausted && !self.queue.has_open_nodes(&self.tree) {
            debug!("cube exhausted after {} iterations", self.total_iterations + iterations);
            self.exhausted = true;
        }
        self.total_iterations += iterations;
        self.total_time += start.elapsed();
        if plan.is_some() || self.exhausted {
            debug!(
                "cube solver done: iterations {} time(ms) {}",
                self.total_iterations,
                self.total_time.as_millis()
            );
        }
        plan
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Lowest heuristic value on the frontier, `UNREACHABLE` once nothing is
    /// left. `None` when solving without a heuristic.
    pub fn best_distance(&self) -> Option<u32> {
        if !self.queue.has_heuristic() {
            return None;
        }
        if self.exhausted {
            return Some(UNREACHABLE);
        }
        Some(self.queue.best_distance(&self.tree))
    }

    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }
}
