use cube_planner::config::{Cli, Config};
use cube_planner::planner::CubePlanner;
use cube_planner::yaml::ProblemYaml;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let problem = ProblemYaml::load(&cli.problem_path)?.into_problem()?;

    let mut planner = CubePlanner::new(config);
    let Some(plan) = planner.find_plan(&problem) else {
        error!("no plan found");
        return Err(anyhow!("no plan found for {}", cli.problem_path));
    };
    if !plan.verify(&problem) {
        return Err(anyhow!("planner returned an invalid plan"));
    }

    info!("plan length {} cost {}", plan.len(), plan.cost(&problem));
    let names = plan.names(&problem).join("\n");
    println!("{names}");
    if let Some(plan_path) = cli.plan_path.as_ref() {
        std::fs::write(plan_path, format!("{names}\n"))
            .with_context(|| format!("failed to write plan to {plan_path}"))?;
    }

    Ok(())
}
