mod descent;
mod frontier;
mod greedy;
mod portfolio;
mod sparse;

pub use descent::CutOffCubeFinder;
pub use frontier::FrontierCubeFinder;
pub use greedy::GreedyDescentCubeFinder;
pub use portfolio::PortfolioCubeFinder;
pub use sparse::SparseCubeFinder;

use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::{Config, CubeFinderMode};
use crate::search::Direction;

/// Splits a problem into cubes.
///
/// `find_cubes` returns `None` exactly when a plan for the whole problem was
/// found on the way, which `plan` then returns. An empty list means the time
/// ran out (or nothing is left to split) and no conclusion was reached.
pub trait CubeFinder {
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>>;

    fn plan(&self) -> Option<&Plan>;

    fn take_plan(&mut self) -> Option<Plan>;

    fn log_information(&self);
}

pub fn build(config: &Config, signal: StopSignal) -> Box<dyn CubeFinder> {
    match config.cube_finder_mode {
        CubeFinderMode::ForwardSearch => {
            Box::new(FrontierCubeFinder::new(config, Direction::Forward, signal))
        }
        CubeFinderMode::BackwardSearch => {
            Box::new(FrontierCubeFinder::new(config, Direction::Backward, signal))
        }
        CubeFinderMode::CutOff => Box::new(CutOffCubeFinder::new(config, signal)),
        CubeFinderMode::Portfolio => Box::new(PortfolioCubeFinder::new(config, signal)),
        CubeFinderMode::Sparse => Box::new(SparseCubeFinder::new(config, signal)),
        CubeFinderMode::GreedyDescent => Box::new(GreedyDescentCubeFinder::new(config, signal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures::{self, init_tracing};
    use crate::config::{HeuristicType, SearchStrategy};

    const MODES: [CubeFinderMode; 6] = [
        CubeFinderMode::ForwardSearch,
        CubeFinderMode::BackwardSearch,
        CubeFinderMode::CutOff,
        CubeFinderMode::Portfolio,
        CubeFinderMode::Sparse,
        CubeFinderMode::GreedyDescent,
    ];

    fn config(mode: CubeFinderMode, num_cubes: usize) -> Config {
        Config {
            cube_finder_mode: mode,
            num_cubes,
            cut_off_anchors: 2,
            cube_sparse_interval: 2,
            cube_find_descents: 2,
            ..Config::default()
        }
    }

    fn check_exclusive(finder: &mut dyn CubeFinder, problem: &GroundPlanningProblem) {
        match finder.find_cubes(problem) {
            Some(cubes) => {
                assert!(finder.plan().is_none());
                for cube in &cubes {
                    assert!(cube.front().is_empty() || cube.back().is_empty());
                }
            }
            None => {
                let plan = finder.plan().expect("no cubes means a plan");
                assert!(plan.verify(problem));
            }
        }
    }

    #[test]
    fn test_finder_result_and_plan_are_exclusive() {
        init_tracing();
        let problems = [
            fixtures::chain_problem(),
            fixtures::grid_problem(4),
            fixtures::switches_problem(),
            fixtures::unsolvable_problem(),
        ];
        for mode in MODES {
            for num_cubes in [1, 3, 50] {
                for problem in &problems {
                    let mut finder = build(&config(mode, num_cubes), StopSignal::unlimited());
                    check_exclusive(finder.as_mut(), problem);
                }
            }
        }
    }

    #[test]
    fn test_every_finder_solves_tiny_problem_or_splits_it() {
        init_tracing();
        let problem = fixtures::chain_problem();
        for mode in MODES {
            let mut finder = build(&config(mode, 200), StopSignal::unlimited());
            // Two hundred cubes cannot be found in a three-atom problem, so
            // every finder runs into the goal first.
            assert!(finder.find_cubes(&problem).is_none(), "{mode:?}");
            let plan = finder.take_plan().expect("plan was found");
            assert!(plan.verify(&problem));
            assert!(finder.plan().is_none());
        }
    }

    #[test]
    fn test_stopped_finder_returns_no_cubes() {
        let problem = fixtures::grid_problem(5);
        let signal = StopSignal::unlimited();
        signal.cancel();
        for mode in MODES {
            let mut finder = build(&config(mode, 10), signal.clone());
            assert_eq!(finder.find_cubes(&problem).map(|cubes| cubes.len()), Some(0));
            assert!(finder.plan().is_none());
        }
    }

    #[test]
    fn test_breadth_first_single_cube_is_the_initial_state() {
        let problem = fixtures::chain_problem();
        let config = Config {
            cube_find_search_strategy: SearchStrategy::BreadthFirst,
            cube_find_heuristic: None,
            ..config(CubeFinderMode::ForwardSearch, 1)
        };
        let mut finder = build(&config, StopSignal::unlimited());
        let cubes = finder.find_cubes(&problem).expect("no plan with one cube");
        assert_eq!(cubes.len(), 1);
        assert_eq!(cubes[0].problem().initial_state(), problem.initial_state());
        assert!(cubes[0].front().is_empty());
        assert!(cubes[0].back().is_empty());
    }

    #[test]
    fn test_unsolvable_problem_yields_no_cubes() {
        let problem = fixtures::unsolvable_problem();
        for mode in MODES {
            let config = Config {
                cube_find_heuristic: Some(HeuristicType::RelaxedPathLength),
                ..config(mode, 4)
            };
            let mut finder = build(&config, StopSignal::unlimited());
            let cubes = finder.find_cubes(&problem).expect("no plan exists");
            assert!(cubes.is_empty(), "{mode:?}");
        }
    }
}
