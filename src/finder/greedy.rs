use super::descent::evaluate;
use super::CubeFinder;
use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::{Config, HeuristicType};
use crate::heuristic::{self, UNREACHABLE};
use crate::search::{Direction, NodeId, NodeState, SearchTree};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Several randomized greedy descents from the initial state. At each step a
/// child is drawn with weight `1 - h / sum(h)`, so better children are more
/// likely without being certain. Every node visited on any descent becomes a
/// cube.
pub struct GreedyDescentCubeFinder {
    num_cubes: usize,
    descents: usize,
    heuristic: HeuristicType,
    seed: u64,
    signal: StopSignal,
    plan: Option<Plan>,
    steps: usize,
    dead_ends: usize,
}

impl GreedyDescentCubeFinder {
    pub fn new(config: &Config, signal: StopSignal) -> Self {
        GreedyDescentCubeFinder {
            num_cubes: config.num_cubes,
            descents: config.cube_find_descents,
            heuristic: config.cube_find_heuristic_or_default(),
            seed: config.seed,
            signal,
            plan: None,
            steps: 0,
            dead_ends: 0,
        }
    }
}

fn draw(rng: &mut StdRng, values: &[u32]) -> usize {
    let sum: f64 = values.iter().map(|&h| h as f64).sum();
    if sum > 0.0 {
        let weights = values.iter().map(|&h| 1.0 - h as f64 / sum);
        if let Ok(index) = WeightedIndex::new(weights) {
            return index.sample(rng);
        }
    }
    let indices: Vec<usize> = (0..values.len()).collect();
    *indices.choose(rng).unwrap_or(&0)
}

impl CubeFinder for GreedyDescentCubeFinder {
    #[instrument(skip_all, name = "greedy_descent_cube_finder", level = "debug")]
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>> {
        self.plan = None;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut heuristic = heuristic::build(self.heuristic, self.seed);
        let mut tree = SearchTree::new(problem.clone(), Direction::Forward);

        let mut root = tree.root();
        root.heuristic = evaluate(heuristic.as_mut(), &tree, &root);
        if root.heuristic == UNREACHABLE {
            debug!("initial node cannot reach the goal");
            return Some(Vec::new());
        }
        let root = tree.insert(root);
        let mut seen: HashSet<NodeState> = HashSet::from([tree.node(root).state.clone()]);
        let mut found: Vec<NodeId> = vec![root];
        let depth = self.num_cubes.div_ceil(self.descents);

        for descent in 0..self.descents {
            let mut current = root;
            let mut path: HashSet<NodeState> = HashSet::from([tree.node(root).state.clone()]);
            for step in 0..=depth {
                if self.signal.should_stop() {
                    info!("cube finding stopped in descent {descent}");
                    return Some(Vec::new());
                }
                if tree.satisfies_problem(current) {
                    debug!("descent {descent} reached the goal");
                    self.plan = Some(tree.partial_plan(current));
                    return None;
                }
                if step == depth {
                    break;
                }
                self.steps += 1;

                let mut children = Vec::new();
                for mut child in tree.successors(current) {
                    if path.contains(&child.state) {
                        continue;
                    }
                    child.heuristic = evaluate(heuristic.as_mut(), &tree, &child);
                    if child.heuristic != UNREACHABLE {
                        children.push(child);
                    }
                }
                if children.is_empty() {
                    self.dead_ends += 1;
                    break;
                }
                let values: Vec<u32> = children.iter().map(|child| child.heuristic).collect();
                let child = children.swap_remove(draw(&mut rng, &values));
                path.insert(child.state.clone());
                let fresh = seen.insert(child.state.clone());
                current = tree.insert(child);
                if fresh {
                    found.push(current);
                }
            }
        }

        Some(found.into_iter().map(|id| tree.to_cube(id)).collect())
    }

    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "greedy descent finder: steps {} dead ends {}",
            self.steps, self.dead_ends
        );
    }
}
