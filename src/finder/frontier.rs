use super::CubeFinder;
use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::{Config, HeuristicType};
use crate::heuristic;
use crate::search::{CutOff, Direction, SearchQueue, SearchTree, Strategy};

use tracing::{debug, info, instrument};

/// Grows a search frontier from the initial state (forward) or the goal
/// (backward) until it holds enough nodes, then turns every frontier node
/// into a cube.
pub struct FrontierCubeFinder {
    direction: Direction,
    num_cubes: usize,
    strategy: Strategy,
    heuristic: Option<HeuristicType>,
    cut_off_depth: Option<usize>,
    cut_off_ratio: f64,
    signal: StopSignal,
    plan: Option<Plan>,
    iterations: usize,
    anchors: usize,
    cut_offs: usize,
}

impl FrontierCubeFinder {
    pub fn new(config: &Config, direction: Direction, signal: StopSignal) -> Self {
        FrontierCubeFinder {
            direction,
            num_cubes: config.num_cubes,
            strategy: Strategy {
                mode: config.cube_find_search_strategy,
                weight: config.cube_find_heuristic_weight,
                seed: config.seed,
            },
            heuristic: config.cube_find_heuristic,
            cut_off_depth: config.cut_off_depth,
            cut_off_ratio: config.cut_off_distance_ratio,
            signal,
            plan: None,
            iterations: 0,
            anchors: 0,
            cut_offs: 0,
        }
    }
}

impl CubeFinder for FrontierCubeFinder {
    #[instrument(skip_all, name = "frontier_cube_finder", fields(direction = ?self.direction), level = "debug")]
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>> {
        self.plan = None;
        let mut tree = SearchTree::new(problem.clone(), self.direction);
        let heuristic = self
            .heuristic
            .map(|kind| heuristic::build(kind, self.strategy.seed));
        let cut_off = self
            .cut_off_depth
            .map(|depth| CutOff::new(depth, self.cut_off_ratio, problem.num_atoms()));
        let mut queue = SearchQueue::new(self.strategy, heuristic, cut_off);
        let root = tree.root();
        queue.add(&mut tree, root);

        while !queue.is_empty() && queue.len() < self.num_cubes {
            if self.signal.should_stop() {
                info!("cube finding stopped after {} iterations", self.iterations);
                return Some(Vec::new());
            }
            let Some(id) = queue.get(&tree) else {
                break;
            };
            self.iterations += 1;
            if tree.satisfies_problem(id) {
                debug!("goal reached while finding cubes at depth {}", tree.node(id).depth);
                self.plan = Some(tree.partial_plan(id));
                return None;
            }
            for child in tree.successors(id) {
                queue.add(&mut tree, child);
            }
        }

        self.anchors = queue.num_anchors();
        self.cut_offs = queue.num_cut_offs();
        let cubes: Vec<Cube> = queue
            .drain_nodes(&tree)
            .into_iter()
            .map(|id| tree.to_cube(id))
            .collect();
        debug!("found {} cubes", cubes.len());
        Some(cubes)
    }

    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "{:?} frontier finder: iterations {} anchors {} cut-offs {}",
            self.direction, self.iterations, self.anchors, self.cut_offs
        );
    }
}
