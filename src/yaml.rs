use crate::common::{Action, Atom, AtomSet, Goal, GroundPlanningProblem, State};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GoalYaml {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionYaml {
    pub name: String,
    #[serde(default = "default_cost")]
    pub cost: u32,
    #[serde(default)]
    pub pre_pos: Vec<String>,
    #[serde(default)]
    pub pre_neg: Vec<String>,
    #[serde(default)]
    pub eff_pos: Vec<String>,
    #[serde(default)]
    pub eff_neg: Vec<String>,
}

fn default_cost() -> u32 {
    1
}

/// Grounded problem as stored on disk. Atoms are referenced by name.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemYaml {
    pub atoms: Vec<String>,
    #[serde(default)]
    pub initial: Vec<String>,
    pub goal: GoalYaml,
    pub actions: Vec<ActionYaml>,
}

impl ProblemYaml {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// `.json` files are read as JSON, everything else as YAML.
    pub fn load(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open problem file {path}"))?;
        let reader = BufReader::new(file);
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let problem = if is_json {
            serde_json::from_reader(reader).with_context(|| format!("error with JSON problem {path}"))?
        } else {
            serde_yaml::from_reader(reader).with_context(|| format!("error with YAML problem {path}"))?
        };
        Ok(problem)
    }

    pub fn into_problem(self) -> Result<GroundPlanningProblem> {
        let num_atoms = self.atoms.len();
        let mut ids = HashMap::with_capacity(num_atoms);
        for (id, name) in self.atoms.iter().enumerate() {
            if ids.insert(name.as_str(), id).is_some() {
                return Err(anyhow!("atom {name} is declared twice"));
            }
        }
        let atom_set = |names: &[String], context: &str| -> Result<AtomSet> {
            let mut set = AtomSet::new(num_atoms);
            for name in names {
                let id = ids
                    .get(name.as_str())
                    .ok_or_else(|| anyhow!("unknown atom {name} in {context}"))?;
                set.insert(*id);
            }
            Ok(set)
        };

        let initial_state = State::new(atom_set(&self.initial, "initial state")?);
        let mut literals: Vec<Atom> = Vec::new();
        for (names, value) in [(&self.goal.positive, true), (&self.goal.negative, false)] {
            for name in names {
                let id = *ids
                    .get(name.as_str())
                    .ok_or_else(|| anyhow!("unknown atom {name} in goal"))?;
                if literals.iter().any(|atom| atom.id == id && atom.value != value) {
                    return Err(anyhow!("goal requires atom {name} to be both true and false"));
                }
                literals.push(Atom {
                    id,
                    name: name.clone(),
                    value,
                });
            }
        }
        let goal = Goal::from_atoms(num_atoms, &literals);

        let actions = self
            .actions
            .iter()
            .map(|action| -> Result<Action> {
                let context = format!("action {}", action.name);
                Ok(Action {
                    name: action.name.clone(),
                    cost: action.cost,
                    pre_pos: atom_set(&action.pre_pos, &context)?,
                    pre_neg: atom_set(&action.pre_neg, &context)?,
                    eff_pos: atom_set(&action.eff_pos, &context)?,
                    eff_neg: atom_set(&action.eff_neg, &context)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "loaded problem with {} atoms and {} actions",
            num_atoms,
            actions.len()
        );
        Ok(GroundPlanningProblem::new(
            initial_state,
            goal,
            actions,
            self.atoms,
        ))
    }
}
