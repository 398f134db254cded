use super::CubeFinder;
use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::{Config, HeuristicType};
use crate::heuristic;
use crate::search::{Direction, SearchQueue, SearchTree, Strategy};

use tracing::{debug, info, instrument};

/// Samples one expanded node every `interval` expansions of a forward search,
/// starting with the initial node.
pub struct SparseCubeFinder {
    num_cubes: usize,
    interval: usize,
    strategy: Strategy,
    heuristic: Option<HeuristicType>,
    signal: StopSignal,
    plan: Option<Plan>,
    iterations: usize,
}

impl SparseCubeFinder {
    pub fn new(config: &Config, signal: StopSignal) -> Self {
        SparseCubeFinder {
            num_cubes: config.num_cubes,
            interval: config.cube_sparse_interval,
            strategy: Strategy {
                mode: config.cube_find_search_strategy,
                weight: config.cube_find_heuristic_weight,
                seed: config.seed,
            },
            heuristic: config.cube_find_heuristic,
            signal,
            plan: None,
            iterations: 0,
        }
    }
}

impl CubeFinder for SparseCubeFinder {
    #[instrument(skip_all, name = "sparse_cube_finder", level = "debug")]
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>> {
        self.plan = None;
        let mut tree = SearchTree::new(problem.clone(), Direction::Forward);
        let heuristic = self
            .heuristic
            .map(|kind| heuristic::build(kind, self.strategy.seed));
        let mut queue = SearchQueue::new(self.strategy, heuristic, None);
        let root = tree.root();
        let mut sampled: Vec<_> = queue.add(&mut tree, root).into_iter().collect();

        while !queue.is_empty() && sampled.len() < self.num_cubes {
            if self.signal.should_stop() {
                info!("cube finding stopped after {} iterations", self.iterations);
                return Some(Vec::new());
            }
            let Some(id) = queue.get(&tree) else {
                break;
            };
            self.iterations += 1;
            if tree.satisfies_problem(id) {
                debug!("goal reached while sampling at depth {}", tree.node(id).depth);
                self.plan = Some(tree.partial_plan(id));
                return None;
            }
            if self.iterations % self.interval == 0 && !sampled.contains(&id) {
                sampled.push(id);
            }
            for child in tree.successors(id) {
                queue.add(&mut tree, child);
            }
        }

        Some(sampled.into_iter().map(|id| tree.to_cube(id)).collect())
    }

    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!("sparse finder: iterations {}", self.iterations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures;
    use crate::config::SearchStrategy;

    #[test]
    fn test_sparse_samples_every_interval() {
        let problem = fixtures::grid_problem(8);
        let config = Config {
            num_cubes: 4,
            cube_sparse_interval: 3,
            cube_find_search_strategy: SearchStrategy::BreadthFirst,
            cube_find_heuristic: None,
            ..Config::default()
        };
        let mut finder = SparseCubeFinder::new(&config, StopSignal::unlimited());
        let cubes = finder.find_cubes(&problem).expect("goal is far away");
        assert_eq!(cubes.len(), 4);
        assert_eq!(cubes[0].problem().initial_state(), problem.initial_state());
        assert!(cubes[0].front().is_empty());
        // Samples at expansions 3, 6 and 9.
        assert_eq!(finder.iterations, 9);
        for cube in &cubes[1..] {
            assert!(!cube.front().is_empty());
        }
    }
}
