use crate::common::{ActionId, Cube, Goal, GroundPlanningProblem, Plan, State};

/// Handle of a node inside its `SearchTree`.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Forward nodes own a state, backward nodes own a goal region. Equality and
/// hashing only look at this part of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    Forward(State),
    Backward(Goal),
}

#[derive(Clone, Debug)]
pub struct SearchNode {
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub action: Option<ActionId>,
    pub heuristic: u32,
    pub state: NodeState,
}

/// Arena of search nodes. Children point to their parent by handle, parents
/// never know their children.
#[derive(Debug)]
pub struct SearchTree {
    problem: GroundPlanningProblem,
    direction: Direction,
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new(problem: GroundPlanningProblem, direction: Direction) -> Self {
        SearchTree {
            problem,
            direction,
            nodes: Vec::new(),
        }
    }

    pub fn problem(&self) -> &GroundPlanningProblem {
        &self.problem
    }

    /// Node standing for the whole problem: the initial state going forward,
    /// the goal going backward. Not yet inserted.
    pub fn root(&self) -> SearchNode {
        let state = match self.direction {
            Direction::Forward => NodeState::Forward(self.problem.initial_state().clone()),
            Direction::Backward => NodeState::Backward(self.problem.goal().clone()),
        };
        SearchNode {
            depth: 0,
            parent: None,
            action: None,
            heuristic: 0,
            state,
        }
    }

    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Start and target a heuristic should measure between for this node.
    pub fn endpoints<'a>(&'a self, state: &'a NodeState) -> (&'a State, &'a Goal) {
        match state {
            NodeState::Forward(state) => (state, self.problem.goal()),
            NodeState::Backward(goal) => (self.problem.initial_state(), goal),
        }
    }

    /// Applicable actions of a forward node, ordered by id.
    pub fn applicable(&self, id: NodeId) -> Vec<ActionId> {
        match &self.nodes[id].state {
            NodeState::Forward(state) => {
                self.problem.index().applicable(self.problem.actions(), state)
            }
            NodeState::Backward(goal) => {
                self.problem.index().relevant(self.problem.actions(), goal)
            }
        }
    }

    /// Children of `id`, one per usable action. Regressions that would
    /// contradict themselves are left out.
    pub fn successors(&self, id: NodeId) -> Vec<SearchNode> {
        let usable = self.applicable(id);
        self.successors_with(id, &usable)
    }

    /// Like `successors` but with the usable actions already known.
    pub fn successors_with(&self, id: NodeId, usable: &[ActionId]) -> Vec<SearchNode> {
        let node = &self.nodes[id];
        let actions = self.problem.actions();
        usable
            .iter()
            .filter_map(|&action_id| {
                let action = &actions[action_id];
                let state = match &node.state {
                    NodeState::Forward(state) => NodeState::Forward(action.apply(state)),
                    NodeState::Backward(goal) => NodeState::Backward(goal.regress(action)?),
                };
                Some(SearchNode {
                    depth: node.depth + 1,
                    parent: Some(id),
                    action: Some(action_id),
                    heuristic: 0,
                    state,
                })
            })
            .collect()
    }

    pub fn satisfies_problem(&self, id: NodeId) -> bool {
        match &self.nodes[id].state {
            NodeState::Forward(state) => self.problem.goal().is_satisfied(state),
            NodeState::Backward(goal) => goal.is_satisfied(self.problem.initial_state()),
        }
    }

    /// Actions on the way from the root to `id`, in execution order.
    pub fn partial_plan(&self, id: NodeId) -> Plan {
        let mut plan = Plan::new();
        let mut current = id;
        while let (Some(parent), Some(action)) = (self.nodes[current].parent, self.nodes[current].action) {
            match self.direction {
                Direction::Forward => plan.push_front(action),
                Direction::Backward => plan.push_back(action),
            }
            current = parent;
        }
        plan
    }

    pub fn to_cube(&self, id: NodeId) -> Cube {
        match &self.nodes[id].state {
            NodeState::Forward(state) => {
                Cube::forward(&self.problem, state.clone(), self.partial_plan(id))
            }
            NodeState::Backward(goal) => {
                Cube::backward(&self.problem, goal.clone(), self.partial_plan(id))
            }
        }
    }

    /// Hamming distance between the atom sets of two nodes.
    pub fn distance(&self, a: NodeId, b: NodeId) -> usize {
        match (&self.nodes[a].state, &self.nodes[b].state) {
            (NodeState::Forward(x), NodeState::Forward(y)) => x.distance(y),
            (NodeState::Backward(x), NodeState::Backward(y)) => x.distance(y),
            _ => unreachable!("nodes of one tree share a direction"),
        }
    }
}
