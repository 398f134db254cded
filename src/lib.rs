pub mod common;
pub mod config;
pub mod finder;
pub mod heuristic;
pub mod planner;
pub mod scheduler;
pub mod search;
pub mod solver;
pub mod stat;
pub mod yaml;
