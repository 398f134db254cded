//! Small hand-built problems shared by the unit tests.

use super::{Action, AtomSet, Goal, GroundPlanningProblem, State};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn action(
    num_atoms: usize,
    name: &str,
    pre_pos: &[usize],
    pre_neg: &[usize],
    eff_pos: &[usize],
    eff_neg: &[usize],
) -> Action {
    Action {
        name: name.to_string(),
        cost: 1,
        pre_pos: AtomSet::from_ids(num_atoms, pre_pos.iter().copied()),
        pre_neg: AtomSet::from_ids(num_atoms, pre_neg.iter().copied()),
        eff_pos: AtomSet::from_ids(num_atoms, eff_pos.iter().copied()),
        eff_neg: AtomSet::from_ids(num_atoms, eff_neg.iter().copied()),
    }
}

fn problem(
    names: Vec<String>,
    initial: &[usize],
    goal_pos: &[usize],
    goal_neg: &[usize],
    actions: Vec<Action>,
) -> GroundPlanningProblem {
    let n = names.len();
    GroundPlanningProblem::new(
        State::new(AtomSet::from_ids(n, initial.iter().copied())),
        Goal::new(
            AtomSet::from_ids(n, goal_pos.iter().copied()),
            AtomSet::from_ids(n, goal_neg.iter().copied()),
        ),
        actions,
        names,
    )
}

/// Atoms A, B, C with A initially true. a1: A -> +B, a2: B -> +C, goal C.
pub(crate) fn chain_problem() -> GroundPlanningProblem {
    let names = ["A", "B", "C"].map(String::from).to_vec();
    problem(
        names,
        &[0],
        &[2],
        &[],
        vec![
            action(3, "a1", &[0], &[], &[1], &[]),
            action(3, "a2", &[1], &[], &[2], &[]),
        ],
    )
}

/// Agent on a `k`x`k` grid, starting at (0, 0) with goal (k-1, k-1). The
/// shortest plan has 2(k-1) moves.
pub(crate) fn grid_problem(k: usize) -> GroundPlanningProblem {
    let n = k * k;
    let cell = |x: usize, y: usize| y * k + x;
    let names = (0..n)
        .map(|id| format!("at_{}_{}", id % k, id / k))
        .collect();
    let mut actions = Vec::new();
    for y in 0..k {
        for x in 0..k {
            let mut neighbors = Vec::new();
            if x > 0 {
                neighbors.push((x - 1, y));
            }
            if x + 1 < k {
                neighbors.push((x + 1, y));
            }
            if y > 0 {
                neighbors.push((x, y - 1));
            }
            if y + 1 < k {
                neighbors.push((x, y + 1));
            }
            for (nx, ny) in neighbors {
                let from = cell(x, y);
                let to = cell(nx, ny);
                actions.push(action(
                    n,
                    &format!("move_{x}_{y}_{nx}_{ny}"),
                    &[from],
                    &[],
                    &[to],
                    &[from],
                ));
            }
        }
    }
    problem(names, &[cell(0, 0)], &[cell(k - 1, k - 1)], &[], actions)
}

/// Two switches and a lamp. The lamp can only be lit while both switches are
/// on, and the goal wants the lamp lit with both switches off.
///
/// Actions: 0 light, 1 off1, 2 off2, 3 on1.
pub(crate) fn switches_problem() -> GroundPlanningProblem {
    let names = ["on1", "on2", "lamp"].map(String::from).to_vec();
    problem(
        names,
        &[0, 1],
        &[2],
        &[0, 1],
        vec![
            action(3, "light", &[0, 1], &[], &[2], &[]),
            action(3, "off1", &[0], &[], &[], &[0]),
            action(3, "off2", &[1], &[], &[], &[1]),
            action(3, "on1", &[], &[0], &[0], &[]),
        ],
    )
}

/// B can never become true.
pub(crate) fn unsolvable_problem() -> GroundPlanningProblem {
    let names = ["A", "B", "C"].map(String::from).to_vec();
    problem(
        names,
        &[0],
        &[1],
        &[],
        vec![
            action(3, "make_c", &[0], &[], &[2], &[]),
            action(3, "make_a", &[1], &[], &[0], &[]),
        ],
    )
}

/// `n` independent bits, all off initially, all on in the goal. Bit `i` is
/// set by action `i` and cleared by action `n + i`.
pub(crate) fn bits_problem(n: usize) -> GroundPlanningProblem {
    let names = (0..n).map(|i| format!("bit_{i}")).collect();
    let set = (0..n).map(|i| action(n, &format!("set_{i}"), &[], &[i], &[i], &[]));
    let clear = (0..n).map(|i| action(n, &format!("clear_{i}"), &[i], &[], &[], &[i]));
    let goal: Vec<usize> = (0..n).collect();
    problem(names, &[], &goal, &[], set.chain(clear).collect())
}
