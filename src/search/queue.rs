use super::tree::{NodeId, NodeState, SearchNode, SearchTree};
use crate::config::SearchStrategy;
use crate::heuristic::{Heuristic, UNREACHABLE};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub mode: SearchStrategy,
    pub weight: u32,
    pub seed: u64,
}

/// Diversity pruning. Nodes at `anchor_depth` or deeper become anchors, later
/// nodes closer than `min_distance` atoms to any anchor are cut off.
#[derive(Debug, Clone, Copy)]
pub struct CutOff {
    pub anchor_depth: usize,
    pub min_distance: f64,
}

impl CutOff {
    pub fn new(anchor_depth: usize, ratio: f64, num_atoms: usize) -> Self {
        CutOff {
            anchor_depth,
            min_distance: ratio * num_atoms as f64,
        }
    }
}

#[derive(Debug)]
enum Frontier {
    Queue(VecDeque<NodeId>),
    Stack(Vec<NodeId>),
    // (key, insertion order, node)
    Priority(BinaryHeap<Reverse<(u64, u64, NodeId)>>),
    Random(Vec<NodeId>, StdRng),
}

impl Frontier {
    fn new(strategy: &Strategy) -> Self {
        match strategy.mode {
            SearchStrategy::BreadthFirst => Frontier::Queue(VecDeque::new()),
            SearchStrategy::DepthFirst => Frontier::Stack(Vec::new()),
            SearchStrategy::BestFirst | SearchStrategy::AStar | SearchStrategy::WeightedAStar => {
                Frontier::Priority(BinaryHeap::new())
            }
            SearchStrategy::RandomChoice => {
                Frontier::Random(Vec::new(), StdRng::seed_from_u64(strategy.seed))
            }
        }
    }

    fn push(&mut self, id: NodeId, key: u64, seq: u64) {
        match self {
            Frontier::Queue(queue) => queue.push_back(id),
            Frontier::Stack(stack) => stack.push(id),
            Frontier::Priority(heap) => heap.push(Reverse((key, seq, id))),
            Frontier::Random(nodes, _) => nodes.push(id),
        }
    }

    fn pop(&mut self) -> Option<NodeId> {
        match self {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Priority(heap) => heap.pop().map(|Reverse((_, _, id))| id),
            Frontier::Random(nodes, rng) => {
                if nodes.is_empty() {
                    None
                } else {
                    let i = rng.gen_range(0..nodes.len());
                    Some(nodes.swap_remove(i))
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Queue(queue) => queue.len(),
            Frontier::Stack(stack) => stack.len(),
            Frontier::Priority(heap) => heap.len(),
            Frontier::Random(nodes, _) => nodes.len(),
        }
    }

    /// Remaining nodes in the order they would have been popped, except for
    /// the random frontier which keeps insertion order.
    fn drain(&mut self) -> Vec<NodeId> {
        match self {
            Frontier::Queue(queue) => queue.drain(..).collect(),
            Frontier::Stack(stack) => stack.drain(..).rev().collect(),
            Frontier::Priority(heap) => {
                let mut entries: Vec<_> = std::mem::take(heap)
                    .into_iter()
                    .map(|Reverse(entry)| entry)
                    .collect();
                entries.sort_unstable();
                entries.into_iter().map(|(_, _, id)| id).collect()
            }
            Frontier::Random(nodes, _) => nodes.drain(..).collect(),
        }
    }

    fn ids(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match self {
            Frontier::Queue(queue) => Box::new(queue.iter().copied()),
            Frontier::Stack(stack) => Box::new(stack.iter().copied()),
            Frontier::Priority(heap) => Box::new(heap.iter().map(|Reverse((_, _, id))| *id)),
            Frontier::Random(nodes, _) => Box::new(nodes.iter().copied()),
        }
    }
}

/// Open list of a search, ordered by a strategy and an optional heuristic,
/// with a visited set and optional anchor cut-off.
pub struct SearchQueue {
    strategy: Strategy,
    heuristic: Option<Box<dyn Heuristic>>,
    frontier: Frontier,
    seq: u64,
    visited: HashSet<NodeState>,
    cut_off: Option<CutOff>,
    anchors: Vec<NodeId>,
    cut_offs: Vec<NodeId>,
}

impl SearchQueue {
    pub fn new(
        strategy: Strategy,
        heuristic: Option<Box<dyn Heuristic>>,
        cut_off: Option<CutOff>,
    ) -> Self {
        SearchQueue {
            frontier: Frontier::new(&strategy),
            strategy,
            heuristic,
            seq: 0,
            visited: HashSet::new(),
            cut_off,
            anchors: Vec::new(),
            cut_offs: Vec::new(),
        }
    }

    pub fn has_heuristic(&self) -> bool {
        self.heuristic.is_some()
    }

    /// Evaluates `node`, stores it in `tree` and queues it. Visited nodes and
    /// nodes the heuristic deems unreachable are dropped.
    pub fn add(&mut self, tree: &mut SearchTree, mut node: SearchNode) -> Option<NodeId> {
        if self.visited.contains(&node.state) {
            return None;
        }
        if let Some(heuristic) = self.heuristic.as_mut() {
            let (state, goal) = tree.endpoints(&node.state);
            node.heuristic = heuristic.value(tree.problem(), state, goal, node.depth);
            if node.heuristic == UNREACHABLE {
                trace!("drop unreachable node at depth {}", node.depth);
                return None;
            }
        }
        let key = self.key(&node);
        let id = tree.insert(node);
        self.seq += 1;
        self.frontier.push(id, key, self.seq);
        Some(id)
    }

    fn key(&self, node: &SearchNode) -> u64 {
        let depth = node.depth as u64;
        let h = node.heuristic as u64;
        match self.strategy.mode {
            SearchStrategy::BestFirst => h,
            SearchStrategy::AStar => depth + h,
            SearchStrategy::WeightedAStar => depth + self.strategy.weight as u64 * h,
            _ => 0,
        }
    }

    /// Next node to expand. Every node is delivered at most once; with a
    /// cut-off configured, nodes near an anchor are set aside instead.
    pub fn get(&mut self, tree: &SearchTree) -> Option<NodeId> {
        while let Some(id) = self.frontier.pop() {
            if !self.visited.insert(tree.node(id).state.clone()) {
                continue;
            }
            if let Some(cut_off) = &self.cut_off {
                if self
                    .anchors
                    .iter()
                    .any(|&anchor| (tree.distance(id, anchor) as f64) < cut_off.min_distance)
                {
                    trace!("cut off node {id}");
                    self.cut_offs.push(id);
                    continue;
                }
                if tree.node(id).depth >= cut_off.anchor_depth {
                    trace!("node {id} becomes an anchor");
                    self.anchors.push(id);
                }
            }
            return Some(id);
        }
        None
    }

    /// Whether the frontier holds no entries at all. Entries whose state was
    /// expanded through another path still count, see `has_open_nodes`.
    pub fn is_empty(&self) -> bool {
        self.frontier.len() == 0
    }

    /// Whether `get` would still deliver a node.
    pub fn has_open_nodes(&self, tree: &SearchTree) -> bool {
        self.frontier
            .ids()
            .any(|id| !self.visited.contains(&tree.node(id).state))
    }

    /// Frontier size including nodes set aside by the cut-off.
    pub fn len(&self) -> usize {
        self.frontier.len() + self.cut_offs.len()
    }

    pub fn num_anchors(&self) -> usize {
        self.anchors.len()
    }

    pub fn num_cut_offs(&self) -> usize {
        self.cut_offs.len()
    }

    /// Takes every node still held: cut-off nodes first, then the frontier.
    /// Duplicate and already expanded states are skipped.
    pub fn drain_nodes(&mut self, tree: &SearchTree) -> Vec<NodeId> {
        let mut seen: HashSet<&NodeState> = HashSet::new();
        let mut nodes = std::mem::take(&mut self.cut_offs);
        for id in self.frontier.drain() {
            let state = &tree.node(id).state;
            if !self.visited.contains(state) && seen.insert(state) {
                nodes.push(id);
            }
        }
        nodes
    }

    /// Smallest heuristic value among nodes `get` would still deliver,
    /// `UNREACHABLE` when there are none.
    pub fn best_distance(&self, tree: &SearchTree) -> u32 {
        self.frontier
            .ids()
            .map(|id| tree.node(id))
            .filter(|node| !self.visited.contains(&node.state))
            .map(|node| node.heuristic)
            .min()
            .unwrap_or(UNREACHABLE)
    }
}
