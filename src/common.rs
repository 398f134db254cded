mod action;
mod atom;
mod cube;
mod goal;
mod index;
mod plan;
mod problem;
mod signal;
mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use action::{Action, ActionId};
pub use atom::{Atom, AtomSet};
pub use cube::Cube;
pub use goal::Goal;
pub use index::ActionIndex;
pub use plan::Plan;
pub use problem::GroundPlanningProblem;
pub use signal::StopSignal;
pub use state::State;
