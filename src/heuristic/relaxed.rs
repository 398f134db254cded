use super::{Heuristic, UNREACHABLE};
use crate::common::{AtomSet, Goal, GroundPlanningProblem, State};

/// Delete-relaxed reachability layers. `layers[0]` is the start state and
/// every further layer adds the positive effects of all actions whose
/// positive preconditions hold in the previous one. Construction stops at the
/// first layer satisfying the goal.
#[derive(Debug, Clone)]
pub struct RelaxedGraph {
    layers: Vec<AtomSet>,
}

impl RelaxedGraph {
    /// Returns `None` when the fixpoint is reached before the goal.
    pub fn build(problem: &GroundPlanningProblem, state: &State, goal: &Goal) -> Option<Self> {
        let mut layers = vec![state.atom_set().clone()];
        loop {
            let current = &layers[layers.len() - 1];
            if goal.is_satisfied_relaxed(current) {
                return Some(RelaxedGraph { layers });
            }
            let mut next = current.clone();
            for action in problem.actions() {
                if action.is_applicable_relaxed(current) {
                    next.union_with(&action.eff_pos);
                }
            }
            if &next == current {
                return None;
            }
            layers.push(next);
        }
    }

    /// Index of the first layer satisfying the goal.
    pub fn goal_layer(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn layer(&self, i: usize) -> &AtomSet {
        &self.layers[i]
    }

    /// First layer each atom shows up in, `None` for atoms never reached.
    fn atom_levels(&self) -> Vec<Option<usize>> {
        let mut levels = vec![None; self.layers[0].len()];
        for (i, layer) in self.layers.iter().enumerate() {
            for atom in layer.ones() {
                levels[atom].get_or_insert(i);
            }
        }
        levels
    }
}

/// Number of relaxed layers until the goal holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedPathLength;

impl Heuristic for RelaxedPathLength {
    fn value(&mut self, problem: &GroundPlanningProblem, state: &State, goal: &Goal, _: usize) -> u32 {
        match RelaxedGraph::build(problem, state, goal) {
            Some(graph) => graph.goal_layer() as u32,
            None => UNREACHABLE,
        }
    }
}

/// Size of a relaxed plan extracted backwards from the goal layer. Achievers
/// are chosen in action order, so the estimate is reproducible but not
/// admissible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedPlan;

impl Heuristic for RelaxedPlan {
    fn value(&mut self, problem: &GroundPlanningProblem, state: &State, goal: &Goal, _: usize) -> u32 {
        let Some(graph) = RelaxedGraph::build(problem, state, goal) else {
            return UNREACHABLE;
        };
        let goal_layer = graph.goal_layer();
        if goal_layer == 0 {
            return 0;
        }

        let num_atoms = problem.num_atoms();
        let levels = graph.atom_levels();
        let mut needed = vec![AtomSet::new(num_atoms); goal_layer + 1];
        for atom in goal.positive().ones() {
            if let Some(level) = levels[atom].filter(|&level| level > 0) {
                needed[level].insert(atom);
            }
        }

        let actions = problem.actions();
        let mut achieved = AtomSet::new(num_atoms);
        let mut count = 0;
        for i in (1..=goal_layer).rev() {
            let targets: Vec<usize> = needed[i].ones().collect();
            for atom in targets {
                if achieved.contains(atom) {
                    continue;
                }
                // Some action applicable one layer below adds the atom, it
                // would not have appeared at this layer otherwise.
                let Some(&achiever) = problem
                    .index()
                    .adding(atom)
                    .iter()
                    .find(|&&id| actions[id].is_applicable_relaxed(graph.layer(i - 1)))
                else {
                    continue;
                };
                count += 1;
                let action = &actions[achiever];
                achieved.union_with(&action.eff_pos);
                for pre in action.pre_pos.ones() {
                    if let Some(level) = levels[pre].filter(|&level| level > 0) {
                        if !achieved.contains(pre) {
                            needed[level].insert(pre);
                        }
                    }
                }
            }
        }
        count
    }
}
