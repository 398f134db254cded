mod queue;
mod tree;

pub use queue::{CutOff, SearchQueue, Strategy};
pub use tree::{Direction, NodeId, NodeState, SearchNode, SearchTree};
