use super::CubeFinder;
use crate::common::{ActionId, Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::{Config, HeuristicType};
use crate::heuristic::{self, Heuristic, UNREACHABLE};
use crate::search::{Direction, NodeId, NodeState, SearchNode, SearchTree};

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, instrument, trace};

pub(super) enum Descent {
    Plan(Plan),
    Nodes(Vec<NodeId>),
    Stopped,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Anchoring {
    /// Cubes to accumulate between two anchors.
    pub(super) interval: usize,
    pub(super) ratio: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub(super) struct DescentStats {
    pub(super) iterations: usize,
    pub(super) backtracks: usize,
    pub(super) anchors: usize,
    pub(super) cut_offs: usize,
}

struct Frame {
    node: NodeId,
    applicable: Vec<ActionId>,
    // Unexplored children, best last.
    children: Vec<NodeId>,
}

pub(super) fn evaluate(heuristic: &mut dyn Heuristic, tree: &SearchTree, node: &SearchNode) -> u32 {
    let (state, goal) = tree.endpoints(&node.state);
    heuristic.value(tree.problem(), state, goal, node.depth)
}

fn applicable_after(tree: &SearchTree, frame: &Frame, child: NodeId) -> Vec<ActionId> {
    let problem = tree.problem();
    match (&tree.node(frame.node).state, &tree.node(child).state) {
        (NodeState::Forward(old), NodeState::Forward(new)) => {
            problem
                .index()
                .update_applicable(problem.actions(), &frame.applicable, old, new)
        }
        _ => tree.applicable(child),
    }
}

/// Greedy depth-first descent from the root of `tree`, always expanding the
/// child with the lowest heuristic value and backtracking on dead ends. Every
/// generated but unexpanded node is a cube candidate. With anchoring, each
/// time another `interval` candidates have piled up the current node becomes
/// an anchor, and children closer to an anchor than `ratio` times the
/// anchor's own distance from the root are cut off.
pub(super) fn greedy_descent(
    tree: &mut SearchTree,
    heuristic: &mut dyn Heuristic,
    num_cubes: usize,
    anchoring: Option<Anchoring>,
    signal: &StopSignal,
    stats: &mut DescentStats,
) -> Descent {
    let mut root = tree.root();
    root.heuristic = evaluate(heuristic, tree, &root);
    if root.heuristic == UNREACHABLE {
        debug!("initial node cannot reach the goal");
        return Descent::Nodes(Vec::new());
    }
    let root = tree.insert(root);

    let mut visited = HashSet::from([tree.node(root).state.clone()]);
    let mut open = BTreeSet::from([root]);
    let mut cut_offs = Vec::new();
    let mut anchors: Vec<(NodeId, f64)> = Vec::new();
    let mut next_anchor = anchoring.map(|anchoring| anchoring.interval);
    let mut history: Vec<Frame> = Vec::new();
    let mut current = root;
    let mut applicable = tree.applicable(root);

    'descent: loop {
        if signal.should_stop() {
            return Descent::Stopped;
        }
        stats.iterations += 1;
        if tree.satisfies_problem(current) {
            debug!("goal reached at depth {}", tree.node(current).depth);
            return Descent::Plan(tree.partial_plan(current));
        }

        let found = open.len() + cut_offs.len();
        if found >= num_cubes {
            break;
        }
        if let (Some(anchoring), Some(threshold)) = (anchoring, next_anchor.as_mut()) {
            if found >= *threshold {
                let value = tree.distance(root, current) as f64;
                trace!("node {current} becomes an anchor at distance {value}");
                anchors.push((current, value));
                *threshold += anchoring.interval;
                stats.anchors += 1;
            }
        }

        open.remove(&current);
        let mut children = Vec::new();
        for mut child in tree.successors_with(current, &applicable) {
            if visited.contains(&child.state) {
                continue;
            }
            child.heuristic = evaluate(heuristic, tree, &child);
            if child.heuristic == UNREACHABLE {
                continue;
            }
            visited.insert(child.state.clone());
            let id = tree.insert(child);
            let near_anchor = anchoring.is_some_and(|anchoring| {
                anchors
                    .iter()
                    .any(|&(anchor, value)| (tree.distance(id, anchor) as f64) < anchoring.ratio * value)
            });
            if near_anchor {
                cut_offs.push(id);
                stats.cut_offs += 1;
            } else {
                open.insert(id);
                children.push(id);
            }
        }
        children.sort_by_key(|&id| Reverse((tree.node(id).heuristic, id)));
        history.push(Frame {
            node: current,
            applicable,
            children,
        });

        loop {
            let Some(frame) = history.last_mut() else {
                debug!("descent backtracked to the root");
                break 'descent;
            };
            if let Some(next) = frame.children.pop() {
                applicable = applicable_after(tree, frame, next);
                current = next;
                break;
            }
            history.pop();
            stats.backtracks += 1;
        }
    }

    let mut nodes: Vec<NodeId> = open.into_iter().chain(cut_offs).collect();
    nodes.sort_unstable();
    Descent::Nodes(nodes)
}

/// One greedy descent over the forward search space, designating anchors
/// along the way and cutting off nodes close to them. Cubes are the nodes
/// left open plus the nodes cut off.
pub struct CutOffCubeFinder {
    num_cubes: usize,
    num_anchors: usize,
    ratio: f64,
    heuristic: HeuristicType,
    seed: u64,
    signal: StopSignal,
    plan: Option<Plan>,
    stats: DescentStats,
}

impl CutOffCubeFinder {
    pub fn new(config: &Config, signal: StopSignal) -> Self {
        CutOffCubeFinder {
            num_cubes: config.num_cubes,
            num_anchors: config.cut_off_anchors,
            ratio: config.cut_off_distance_ratio,
            heuristic: config.cube_find_heuristic_or_default(),
            seed: config.seed,
            signal,
            plan: None,
            stats: DescentStats::default(),
        }
    }
}

impl CubeFinder for CutOffCubeFinder {
    #[instrument(skip_all, name = "cut_off_cube_finder", level = "debug")]
    fn find_cubes(&mut self, problem: &GroundPlanningProblem) -> Option<Vec<Cube>> {
        self.plan = None;
        let mut tree = SearchTree::new(problem.clone(), Direction::Forward);
        let mut heuristic = heuristic::build(self.heuristic, self.seed);
        let anchoring = Anchoring {
            interval: (self.num_cubes / self.num_anchors).max(1),
            ratio: self.ratio,
        };
        match greedy_descent(
            &mut tree,
            heuristic.as_mut(),
            self.num_cubes,
            Some(anchoring),
            &self.signal,
            &mut self.stats,
        ) {
            Descent::Plan(plan) => {
                self.plan = Some(plan);
                None
            }
            Descent::Stopped => {
                info!("cube finding stopped after {} iterations", self.stats.iterations);
                Some(Vec::new())
            }
            Descent::Nodes(nodes) => Some(nodes.into_iter().map(|id| tree.to_cube(id)).collect()),
        }
    }

    fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        info!(
            "cut-off finder: iterations {} backtracks {} anchors {} cut-offs {}",
            self.stats.iterations, self.stats.backtracks, self.stats.anchors, self.stats.cut_offs
        );
    }
}
