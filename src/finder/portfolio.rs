use super::descent::{greedy_descent, Descent, DescentStats};
use super::CubeFinder;
use crate::common::{Cube, GroundPlanningProblem, Plan, State, StopSignal};
use crate::config::{Config, HeuristicType};
use crate::heuristic;
use crate::search::{Direction, SearchTree};

use std::collections::HashSet;
use tracing::{debug, info, instrument};

const PORTFOLIO: [HeuristicType; 3] = [
    HeuristicType::RelaxedPlan,
    HeuristicType::GoalCount,
    HeuristicType::RelaxedPathLength,
];

/// Runs one greedy descent per heuristic of a fixed portfolio, each asked for
/// its share of the cubes, and pools the distinct results.
pub struct PortfolioCubeFinder {
    num_cubes: usize,
    seed: u64,
    signal: StopSignal,
    plan: Option<Plan>,
    stats: DescentStats,
    cubes_per_heuristic: Vec<usize>,
}

impl PortfolioCubeFinder {
    pub fn new(config: &Config, signal: StopSignal) -> Self {
        PortfolioCubeFinder {
            num_cubes: config.num_cubes,
            seed: config.seed,
            signal,
            plan: None,
            stats: DescentStats::default(),
            cubes_per_heuristic: Vec::new(),
        }
    }
}

impl CubeFinder for PortfolioCubeFinder {
    #[instrument(skip_all, name = "portfolio_cube_finder", level = "debug")]
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>> {
        self.plan = None;
        self.cubes_per_heuristic.clear();
        let share = self.num_cubes.div_ceil(PORTFOLIO.len());
        let mut seen: HashSet<State> = HashSet::new();
        let mut cubes = Vec::new();

        for kind in PORTFOLIO {
            let mut tree = SearchTree::new(problem.clone(), Direction::Forward);
            let mut heuristic = heuristic::build(kind, self.seed);
            match greedy_descent(
                &mut tree,
                heuristic.as_mut(),
                share,
                None,
                &self.signal,
                &mut self.stats,
            ) {
                Descent::Plan(plan) => {
                    debug!("{kind:?} descent reached the goal");
                    self.plan = Some(plan);
                    return None;
                }
                Descent::Stopped => {
                    info!("cube finding stopped during the {kind:?} descent");
                    return Some(Vec::new());
                }
                Descent::Nodes(nodes) => {
                    let before = cubes.len();
                    for id in nodes {
                        let cube = tree.to_cube(id);
                        if seen.insert(cube.problem().initial_state().clone()) {
                            cubes.push(cube);
                        }
                    }
                    self.cubes_per_heuristic.push(cubes.len() - before);
                }
            }
        }
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
            "portfolio finder: iterations {} backtracks {} new cubes per heuristic {:?}",
            self.stats.iterations, self.stats.backtracks, self.cubes_per_heuristic
        );
    }
}
