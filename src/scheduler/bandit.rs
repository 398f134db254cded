use super::regression;
use super::{distance, ExitStatus, Scheduler, SliceBudget};
use crate::common::Plan;
use crate::config::BanditReward;
use crate::heuristic::UNREACHABLE;
use crate::solver::CubeSolver;

use tracing::{debug, info, trace};

struct Arm {
    solver: CubeSolver,
    plays: u32,
    total_reward: f64,
    history: Vec<u32>,
    retired: bool,
}

impl Arm {
    fn ucb(&self, total_plays: u32) -> f64 {
        let average = self.total_reward / self.plays as f64;
        average + (2.0 * (total_plays as f64).ln() / self.plays as f64).sqrt()
    }
}

/// UCB1 over the cube solvers. The reward of a play is either the solver's
/// overall distance improvement relative to the worst starting distance, or
/// a regression estimate of how close it is to reaching the goal. Exhausted
/// solvers are retired for good.
pub struct BanditScheduler {
    arms: Vec<Arm>,
    budget: SliceBudget,
    reward: BanditReward,
    horizon: f64,
    starting_distance: f64,
    total_plays: u32,
    plan: Option<Plan>,
}

impl BanditScheduler {
    pub fn new(
        solvers: Vec<CubeSolver>,
        budget: SliceBudget,
        reward: BanditReward,
        horizon: f64,
    ) -> Self {
        let starting_distance = solvers
            .iter()
            .map(distance)
            .filter(|&d| d != UNREACHABLE)
            .max()
            .unwrap_or(0) as f64;
        let arms = solvers
            .into_iter()
            .map(|solver| Arm {
                retired: solver.is_exhausted(),
                solver,
                plays: 0,
                total_reward: 0.0,
                history: Vec::new(),
            })
            .collect();
        BanditScheduler {
            arms,
            budget,
            reward,
            horizon,
            starting_distance,
            total_plays: 0,
            plan: None,
        }
    }

    fn select(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, arm) in self.arms.iter().enumerate() {
            if arm.retired {
                continue;
            }
            if arm.plays == 0 {
                return Some(index);
            }
            let value = arm.ucb(self.total_plays);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((index, value));
            }
        }
        best.map(|(index, _)| index)
    }

    fn reward_of(&self, arm: &Arm) -> f64 {
        match self.reward {
            BanditReward::Improvement => {
                if self.starting_distance == 0.0 {
                    return 0.0;
                }
                let current = distance(&arm.solver) as f64;
                ((self.starting_distance - current) / self.starting_distance).clamp(0.0, 1.0)
            }
            BanditReward::Regression => regression::reward(&arm.history, self.horizon),
        }
    }

    #[cfg(test)]
    fn plays(&self) -> Vec<u32> {
        self.arms.iter().map(|arm| arm.plays).collect()
    }
}

impl Scheduler for BanditScheduler {
    fn schedule_next(&mut self) -> ExitStatus {
        if self.budget.is_unbounded() {
            return ExitStatus::Error;
        }
        let Some(index) = self.select() else {
            return ExitStatus::Exhausted;
        };

        let arm = &mut self.arms[index];
        if let Some(plan) = arm.solver.calculate_steps(&self.budget) {
            self.plan = Some(plan);
            return ExitStatus::FoundPlan;
        }
        arm.plays += 1;
        self.total_plays += 1;
        if arm.solver.is_exhausted() {
            debug!("arm {index} retired");
            arm.retired = true;
            return ExitStatus::FoundNoPlan;
        }
        let current = distance(&arm.solver);
        if current != UNREACHABLE {
            arm.history.push(current);
        }

        let reward = self.reward_of(&self.arms[index]);
        trace!("arm {index} reward {reward}");
        self.arms[index].total_reward += reward;
        ExitStatus::FoundNoPlan
    }

    fn take_plan(&mut self) -> Option<Plan> {
        self.plan.take()
    }

    fn log_information(&self) {
        let plays: Vec<u32> = self.arms.iter().map(|arm| arm.plays).collect();
        let retired = self.arms.iter().filter(|arm| arm.retired).count();
        info!(
            "bandit: total plays {} retired {} plays per arm {:?}",
            self.total_plays, retired, plays
        );
    }
}
