use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(
    name = "Cube Planner",
    about = "Cube-and-conquer parallel STRIPS planner.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to the ground problem file (YAML or JSON)")]
    pub problem_path: String,

    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Write the plan's action names to this file")]
    pub plan_path: Option<String>,

    #[arg(long, help = "Number of worker threads")]
    pub num_threads: Option<usize>,

    #[arg(long, help = "Number of cubes the cube finder should produce")]
    pub num_cubes: Option<usize>,

    #[arg(long, value_enum, help = "Cube finding algorithm")]
    pub cube_finder_mode: Option<CubeFinderMode>,

    #[arg(long, value_enum, help = "Policy distributing budget over cube solvers")]
    pub scheduler_mode: Option<SchedulerMode>,

    #[arg(long, help = "Node expansions per scheduler slice, 0 disables the limit")]
    pub scheduler_iterations: Option<u64>,

    #[arg(long, help = "Milliseconds per scheduler slice, 0 disables the limit")]
    pub scheduler_time: Option<u64>,

    #[arg(long, help = "Growth factor of the exponential scheduler")]
    pub scheduler_growth: Option<f64>,

    #[arg(long, help = "Plateau fraction of the hill-climbing scheduler")]
    pub scheduler_hill_climb: Option<f64>,

    #[arg(long, value_enum, help = "Reward used by the bandit scheduler")]
    pub bandit_reward: Option<BanditReward>,

    #[arg(long, value_enum, help = "Heuristic used while finding cubes")]
    pub cube_find_heuristic: Option<HeuristicType>,

    #[arg(long, help = "Heuristic weight for weighted A* while finding cubes")]
    pub cube_find_heuristic_weight: Option<u32>,

    #[arg(long, value_enum, help = "Search strategy while finding cubes")]
    pub cube_find_search_strategy: Option<SearchStrategy>,

    #[arg(long, value_enum, help = "Heuristic used while solving cubes")]
    pub cube_solve_heuristic: Option<HeuristicType>,

    #[arg(long, help = "Solve cubes without a heuristic")]
    pub no_cube_solve_heuristic: bool,

    #[arg(long, help = "Heuristic weight for weighted A* while solving cubes")]
    pub cube_solve_heuristic_weight: Option<u32>,

    #[arg(long, value_enum, help = "Search strategy while solving cubes")]
    pub cube_solve_search_strategy: Option<SearchStrategy>,

    #[arg(long, help = "Global time limit in seconds, 0 means unlimited")]
    pub max_time_seconds: Option<u64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Depth from which frontier nodes become anchors")]
    pub cut_off_depth: Option<usize>,

    #[arg(long, help = "Fraction of atoms below which nodes are cut off near an anchor")]
    pub cut_off_distance_ratio: Option<f64>,

    #[arg(long, help = "Number of anchors of the greedy cut-off finder")]
    pub cut_off_anchors: Option<usize>,

    #[arg(long, help = "Expansions between two samples of the sparse finder")]
    pub cube_sparse_interval: Option<usize>,

    #[arg(long, help = "Number of descents of the greedy descent finder")]
    pub cube_find_descents: Option<usize>,

    #[arg(long, help = "Share visited states between all cube solvers")]
    pub share_visited_states: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum CubeFinderMode {
    ForwardSearch,
    BackwardSearch,
    CutOff,
    Portfolio,
    Sparse,
    GreedyDescent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum SchedulerMode {
    RoundRobin,
    Exponential,
    Bandit,
    GreedyBandit,
    HillClimbing,
    ForcedImprovement,
}

impl SchedulerMode {
    /// Policies driven by the solvers' best heuristic value.
    pub fn needs_distance(&self) -> bool {
        !matches!(self, SchedulerMode::RoundRobin | SchedulerMode::Exponential)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum SearchStrategy {
    BreadthFirst,
    DepthFirst,
    BestFirst,
    AStar,
    WeightedAStar,
    RandomChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum HeuristicType {
    RelaxedPlan,
    RelaxedPathLength,
    GoalCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum BanditReward {
    Improvement,
    Regression,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub num_threads: usize,
    pub num_cubes: usize,
    pub cube_finder_mode: CubeFinderMode,
    pub scheduler_mode: SchedulerMode,
    pub scheduler_iterations: u64,
    pub scheduler_time: u64,
    pub scheduler_growth: f64,
    pub scheduler_hill_climb: f64,
    pub bandit_reward: BanditReward,
    pub cube_find_heuristic: Option<HeuristicType>,
    pub cube_find_heuristic_weight: u32,
    pub cube_find_search_strategy: SearchStrategy,
    pub cube_solve_heuristic: Option<HeuristicType>,
    pub cube_solve_heuristic_weight: u32,
    pub cube_solve_search_strategy: SearchStrategy,
    pub max_time_seconds: u64,
    pub seed: u64,
    pub cut_off_depth: Option<usize>,
    pub cut_off_distance_ratio: f64,
    pub cut_off_anchors: usize,
    pub cube_sparse_interval: usize,
    pub cube_find_descents: usize,
    pub share_visited_states: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_threads: 1,
            num_cubes: 200,
            cube_finder_mode: CubeFinderMode::ForwardSearch,
            scheduler_mode: SchedulerMode::Exponential,
            scheduler_iterations: 0,
            scheduler_time: 1000,
            scheduler_growth: 1.5,
            scheduler_hill_climb: 0.5,
            bandit_reward: BanditReward::Improvement,
            cube_find_heuristic: Some(HeuristicType::RelaxedPlan),
            cube_find_heuristic_weight: 10,
            cube_find_search_strategy: SearchStrategy::BestFirst,
            cube_solve_heuristic: Some(HeuristicType::RelaxedPlan),
            cube_solve_heuristic_weight: 10,
            cube_solve_search_strategy: SearchStrategy::BestFirst,
            max_time_seconds: 0,
            seed: 1337,
            cut_off_depth: None,
            cut_off_distance_ratio: 0.1,
            cut_off_anchors: 10,
            cube_sparse_interval: 10,
            cube_find_descents: 5,
            share_visited_states: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(value) = cli.$field {
                    self.$field = value;
                })*
            };
        }
        take!(
            num_threads,
            num_cubes,
            cube_finder_mode,
            scheduler_mode,
            scheduler_iterations,
            scheduler_time,
            scheduler_growth,
            scheduler_hill_climb,
            bandit_reward,
            cube_find_heuristic_weight,
            cube_find_search_strategy,
            cube_solve_heuristic_weight,
            cube_solve_search_strategy,
            max_time_seconds,
            seed,
            cut_off_distance_ratio,
            cut_off_anchors,
            cube_sparse_interval,
            cube_find_descents
        );
        if cli.cube_find_heuristic.is_some() {
            self.cube_find_heuristic = cli.cube_find_heuristic;
        }
        if cli.cube_solve_heuristic.is_some() {
            self.cube_solve_heuristic = cli.cube_solve_heuristic;
        }
        if cli.no_cube_solve_heuristic {
            self.cube_solve_heuristic = None;
        }
        if cli.cut_off_depth.is_some() {
            self.cut_off_depth = cli.cut_off_depth;
        }
        self.share_visited_states |= cli.share_visited_states;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_threads == 0 {
            return Err(anyhow!("Number of threads must be at least 1"));
        }
        if self.num_cubes == 0 {
            return Err(anyhow!("Number of cubes must be at least 1"));
        }
        if self.scheduler_iterations == 0 && self.scheduler_time == 0 {
            return Err(anyhow!(
                "Scheduler needs an iteration or a time budget, both are 0"
            ));
        }
        if self.scheduler_growth < 1.0 {
            return Err(anyhow!(
                "Scheduler growth must be at least 1.0, got {}",
                self.scheduler_growth
            ));
        }
        for (name, value) in [
            ("Hill climbing fraction", self.scheduler_hill_climb),
            ("Cut-off distance ratio", self.cut_off_distance_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{name} must be within [0, 1], got {value}"));
            }
        }
        if self.cube_sparse_interval == 0 {
            return Err(anyhow!("Sparse cube interval must be at least 1"));
        }
        if self.cube_find_descents == 0 {
            return Err(anyhow!("Number of descents must be at least 1"));
        }
        if self.cut_off_anchors == 0 {
            return Err(anyhow!("Number of cut-off anchors must be at least 1"));
        }
        if self.scheduler_mode.needs_distance() && self.cube_solve_heuristic.is_none() {
            return Err(anyhow!(
                "Scheduler {:?} needs a cube solve heuristic",
                self.scheduler_mode
            ));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        (self.max_time_seconds > 0).then(|| Duration::from_secs(self.max_time_seconds))
    }

    /// Heuristic for the finders that cannot work without one.
    pub fn cube_find_heuristic_or_default(&self) -> HeuristicType {
        self.cube_find_heuristic
            .unwrap_or(HeuristicType::RelaxedPlan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_yaml_config_overrides_defaults() {
        let config = Config::from_yaml_str(
            "numThreads: 4\nschedulerMode: greedyBandit\ncubeFinderMode: cutOff\ncubeSolveSearchStrategy: aStar\nmaxTimeSeconds: 5\n",
        )
        .unwrap();
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.scheduler_mode, SchedulerMode::GreedyBandit);
        assert_eq!(config.cube_finder_mode, CubeFinderMode::CutOff);
        assert_eq!(config.cube_solve_search_strategy, SearchStrategy::AStar);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(5)));
        assert_eq!(config.num_cubes, 200);
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let cli = Cli::parse_from([
            "cube_planner",
            "--problem-path",
            "problem.yaml",
            "--num-cubes",
            "8",
            "--scheduler-mode",
            "roundRobin",
            "--no-cube-solve-heuristic",
        ]);
        let config = Config::from_yaml_str("numCubes: 50\n")
            .unwrap()
            .override_from_command_line(&cli)
            .unwrap();
        assert_eq!(config.num_cubes, 8);
        assert_eq!(config.scheduler_mode, SchedulerMode::RoundRobin);
        assert_eq!(config.cube_solve_heuristic, None);
    }

    #[test]
    fn test_validate_rejects_contradictions() {
        let config = Config {
            scheduler_iterations: 0,
            scheduler_time: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            scheduler_mode: SchedulerMode::Bandit,
            cube_solve_heuristic: None,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            num_threads: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
