use crate::common::{Cube, GroundPlanningProblem, Plan, StopSignal};
use crate::config::Config;
use crate::finder;
use crate::scheduler::{self, ExitStatus};
use crate::solver::{CubeSolver, SharedVisited};
use crate::stat::Stats;

use dashmap::DashSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Cube-and-conquer driver: splits the problem into cubes, hands equal
/// shares to worker threads and returns the first plan any of them finds.
pub struct CubePlanner {
    config: Config,
    stats: Stats,
}

/// The single recorded plan. The first writer wins and cancels everybody.
struct Winner {
    plan: Mutex<Option<Plan>>,
    discarded: Mutex<usize>,
    signal: StopSignal,
}

impl Winner {
    fn offer(&self, worker: usize, plan: Plan) {
        let mut slot = self.plan.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_none() {
            info!("worker {worker} found a plan of length {}", plan.len());
            *slot = Some(plan);
            self.signal.cancel();
        } else {
            debug!("worker {worker} found a plan too late");
            *self.discarded.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        }
    }
}

impl CubePlanner {
    pub fn new(config: Config) -> Self {
        CubePlanner {
            config,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[instrument(skip_all, name = "cube_planner", level = "debug")]
    pub fn find_plan(&mut self, problem: &GroundPlanningProblem) -> Option<Plan> {
        self.stats = Stats::default();
        let signal = StopSignal::new(self.config.time_limit());

        let start = Instant::now();
        let mut cube_finder = finder::build(&self.config, signal.clone());
        let cubes = cube_finder.find_cubes(problem);
        cube_finder.log_information();
        self.stats.cube_find_time = start.elapsed();

        let plan = match cubes {
            None => {
                self.stats.found_while_cubing = true;
                cube_finder.take_plan()
            }
            Some(cubes) if cubes.is_empty() => {
                info!("no cubes found, giving up");
                None
            }
            Some(cubes) => {
                let start = Instant::now();
                let plan = self.conquer(cubes, signal);
                self.stats.cube_solve_time = start.elapsed();
                plan
            }
        };
        self.stats.plan_length = plan.as_ref().map(Plan::len);
        self.stats.print();
        plan
    }

    fn conquer(&mut self, mut cubes: Vec<Cube>, signal: StopSignal) -> Option<Plan> {
        let config = &self.config;
        self.stats.num_cubes = cubes.len();
        let mut rng = StdRng::seed_from_u64(config.seed);
        cubes.shuffle(&mut rng);

        let shared: Option<SharedVisited> = config.share_visited_states.then(|| {
            let visited = DashSet::new();
            for cube in &cubes {
                visited.insert(cube.problem().initial_state().clone());
            }
            Arc::new(visited)
        });

        let chunk = cubes.len().div_ceil(config.num_threads);
        let mut partitions = Vec::new();
        while !cubes.is_empty() {
            let rest = cubes.split_off(chunk.min(cubes.len()));
            partitions.push(std::mem::replace(&mut cubes, rest));
        }
        self.stats.num_workers = partitions.len();
        info!(
            "solving {} cubes with {} workers",
            self.stats.num_cubes,
            partitions.len()
        );

        let winner = Winner {
            plan: Mutex::new(None),
            discarded: Mutex::new(0),
            signal: signal.clone(),
        };
        thread::scope(|scope| {
            for (worker, cubes) in partitions.into_iter().enumerate() {
                let seed: u64 = rng.gen();
                let shared = shared.clone();
                let signal = signal.clone();
                let winner = &winner;
                scope.spawn(move || run_worker(worker, cubes, seed, config, shared, signal, winner));
            }
        });

        self.stats.discarded_plans = winner
            .discarded
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        winner
            .plan
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[instrument(skip_all, name = "worker", fields(worker = worker, cubes = cubes.len()), level = "debug")]
fn run_worker(
    worker: usize,
    cubes: Vec<Cube>,
    seed: u64,
    config: &Config,
    shared: Option<SharedVisited>,
    signal: StopSignal,
    winner: &Winner,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let solvers = cubes
        .into_iter()
        .map(|cube| CubeSolver::new(cube, config, rng.gen(), shared.clone(), signal.clone()))
        .collect();
    let mut scheduler = scheduler::build(config, solvers);

    while !signal.should_stop() {
        match scheduler.schedule_next() {
            ExitStatus::FoundNoPlan => {}
            ExitStatus::FoundPlan => {
                if let Some(plan) = scheduler.take_plan() {
                    winner.offer(worker, plan);
                }
                break;
            }
            ExitStatus::Exhausted => {
                debug!("worker {worker} exhausted its cubes");
                break;
            }
            ExitStatus::Error => {
                error!("scheduler of worker {worker} has neither an iteration nor a time budget");
                break;
            }
        }
    }
    scheduler.log_information();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures::{self, init_tracing};
    use crate::config::{CubeFinderMode, HeuristicType, SchedulerMode, SearchStrategy};

    fn config(num_threads: usize) -> Config {
        Config {
            num_threads,
            num_cubes: 12,
            scheduler_mode: SchedulerMode::RoundRobin,
            scheduler_iterations: 5,
            scheduler_time: 0,
            ..Config::default()
        }
    }

    #[test]
    fn test_chain_scenario() {
        init_tracing();
        let problem = fixtures::chain_problem();
        let config = Config {
            num_cubes: 1,
            cube_find_search_strategy: SearchStrategy::BreadthFirst,
            cube_find_heuristic: None,
            cube_solve_search_strategy: SearchStrategy::BreadthFirst,
            cube_solve_heuristic: None,
            ..config(1)
        };
        let mut planner = CubePlanner::new(config);
        let plan = planner.find_plan(&problem).expect("chain is solvable");
        assert_eq!(plan.names(&problem), vec!["a1", "a2"]);
        assert!(plan.verify(&problem));
        assert!(!planner.stats().found_while_cubing);
        assert_eq!(planner.stats().num_cubes, 1);
        assert_eq!(planner.stats().num_workers, 1);
    }

    #[test]
    fn test_single_thread_is_deterministic() {
        init_tracing();
        let problem = fixtures::grid_problem(7);
        for mode in [SchedulerMode::RoundRobin, SchedulerMode::Bandit, SchedulerMode::HillClimbing] {
            let config = Config {
                scheduler_mode: mode,
                cube_solve_heuristic: Some(HeuristicType::GoalCount),
                ..config(1)
            };
            let first = CubePlanner::new(config.clone()).find_plan(&problem);
            assert!(first.as_ref().is_some_and(|plan| plan.verify(&problem)));
            for _ in 0..3 {
                assert_eq!(CubePlanner::new(config.clone()).find_plan(&problem), first);
            }
        }
    }

    #[test]
    fn test_eight_threads_record_one_valid_plan() {
        init_tracing();
        let problem = fixtures::bits_problem(10);
        for finder_mode in [CubeFinderMode::ForwardSearch, CubeFinderMode::BackwardSearch] {
            let config = Config {
                cube_finder_mode: finder_mode,
                num_cubes: 40,
                cube_find_search_strategy: SearchStrategy::BreadthFirst,
                cube_find_heuristic: None,
                ..config(8)
            };
            let mut planner = CubePlanner::new(config);
            let plan = planner.find_plan(&problem).expect("bits are solvable");
            assert!(plan.verify(&problem));
            assert!(!planner.stats().found_while_cubing);
            assert!((2..=8).contains(&planner.stats().num_workers));
        }
    }

    #[test]
    fn test_simultaneous_offers_keep_exactly_one_plan() {
        let signal = StopSignal::unlimited();
        let winner = Winner {
            plan: Mutex::new(None),
            discarded: Mutex::new(0),
            signal: signal.clone(),
        };
        let num_workers = 8;
        let barrier = std::sync::Barrier::new(num_workers);
        thread::scope(|scope| {
            for worker in 0..num_workers {
                let (winner, barrier) = (&winner, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    // Worker `w` offers `w + 1` copies of action `w`.
                    winner.offer(worker, std::iter::repeat(worker).take(worker + 1).collect());
                });
            }
        });

        assert!(signal.is_cancelled());
        assert_eq!(winner.discarded.into_inner().unwrap(), num_workers - 1);
        let plan = winner.plan.into_inner().unwrap().expect("one offer was kept");
        let worker = plan.len() - 1;
        assert!(worker < num_workers);
        assert!(plan.iter().all(|action| action == worker));
    }

    #[test]
    fn test_shared_visited_states_still_find_a_plan() {
        let problem = fixtures::grid_problem(6);
        let config = Config {
            num_cubes: 10,
            cube_find_search_strategy: SearchStrategy::BreadthFirst,
            share_visited_states: true,
            ..config(4)
        };
        let plan = CubePlanner::new(config).find_plan(&problem).expect("grid is solvable");
        assert!(plan.verify(&problem));
    }

    #[test]
    fn test_plan_found_while_cubing_short_circuits() {
        let problem = fixtures::switches_problem();
        let mut planner = CubePlanner::new(config(2));
        let plan = planner.find_plan(&problem).expect("switches are solvable");
        assert!(plan.verify(&problem));
        assert!(planner.stats().found_while_cubing);
        assert_eq!(planner.stats().num_workers, 0);
    }

    #[test]
    fn test_unsolvable_problem_has_no_plan() {
        let problem = fixtures::unsolvable_problem();
        for mode in [CubeFinderMode::ForwardSearch, CubeFinderMode::Sparse] {
            let config = Config {
                cube_finder_mode: mode,
                cube_find_heuristic: None,
                cube_find_search_strategy: SearchStrategy::BreadthFirst,
                cube_solve_heuristic: None,
                num_cubes: 1,
                ..config(3)
            };
            let mut planner = CubePlanner::new(config);
            assert_eq!(planner.find_plan(&problem), None);
            assert_eq!(planner.stats().plan_length, None);
        }
    }

    #[test]
    fn test_time_limit_leaves_room_for_small_problems() {
        let problem = fixtures::grid_problem(6);
        let config = Config {
            max_time_seconds: 30,
            ..config(2)
        };
        let plan = CubePlanner::new(config).find_plan(&problem);
        assert!(plan.is_some_and(|plan| plan.verify(&problem)));
    }
}
