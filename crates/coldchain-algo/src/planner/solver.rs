//! Backend dispatch and solve lifecycle
//!
//! The model is solver-agnostic; this module hands it to whichever backend
//! was compiled in. `solver-microlp` (pure Rust) is the default;
//! `solver-highs` and `solver-cbc` bind native branch-and-cut solvers.
//! Time limit and MIP gap are passed through where the backend exposes them
//! and ignored otherwise; solver-level infeasibility is a first-class result,
//! not an error.

use crate::costs::decompose_costs;
use crate::planner::model::{build_model, PlanModel};
use crate::planner::problem::PlanProblem;
use crate::planner::solution::{extract_solution, PlanSolution, SolvedValues};
use crate::planner::warmstart::{generate_campaign_hints, resolve_hints};
use coldchain_core::{PlanError, PlanResult};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Which MIP backend to hand the model to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Pure-Rust branch-and-bound (`microlp`).
    Microlp,
    /// HiGHS via `good_lp/highs`.
    Highs,
    /// COIN-OR CBC via `good_lp/coin_cbc`.
    Cbc,
}

impl Default for SolverBackend {
    fn default() -> Self {
        #[cfg(feature = "solver-microlp")]
        {
            return SolverBackend::Microlp;
        }
        #[cfg(all(not(feature = "solver-microlp"), feature = "solver-highs"))]
        {
            return SolverBackend::Highs;
        }
        #[allow(unreachable_code)]
        SolverBackend::Cbc
    }
}

/// Solver configuration, passed through to the backend where supported.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Maximum solve time (seconds).
    pub time_limit_seconds: f64,
    /// MIP optimality gap tolerance.
    pub mip_gap: f64,
    /// Whether to enable verbose solver output.
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::default(),
            time_limit_seconds: 300.0,
            mip_gap: 0.01,
            verbose: false,
        }
    }
}

/// Solve-level errors.
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    #[error("solver backend {0:?} not compiled in; enable its cargo feature")]
    BackendUnavailable(SolverBackend),
    #[error("solver failed: {0}")]
    Failed(String),
}

impl From<SolveError> for PlanError {
    fn from(err: SolveError) -> Self {
        PlanError::Solver(err.to_string())
    }
}

/// How the solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCondition {
    Optimal,
    /// An incumbent within the time limit, without proven optimality.
    Feasible,
    Infeasible,
    Timeout,
    Error,
}

impl TerminationCondition {
    pub fn is_feasible(&self) -> bool {
        matches!(self, TerminationCondition::Optimal | TerminationCondition::Feasible)
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, TerminationCondition::Optimal)
    }
}

impl std::fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TerminationCondition::Optimal => "optimal",
            TerminationCondition::Feasible => "feasible",
            TerminationCondition::Infeasible => "infeasible",
            TerminationCondition::Timeout => "timeout",
            TerminationCondition::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Solve outcome summary.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub termination: TerminationCondition,
    pub objective_value: f64,
    /// Relative MIP gap, when the backend reports one.
    pub gap: Option<f64>,
    pub solve_time: Duration,
    pub variable_count: usize,
    pub constraint_count: usize,
    pub status_message: String,
}

/// Build the model for `problem`, optionally seed it with warmstart hints,
/// solve, and extract the plan. Infeasibility comes back as a result with an
/// empty solution, not an error.
pub fn solve(
    problem: &PlanProblem,
    config: &SolverConfig,
) -> PlanResult<(SolveResult, PlanSolution)> {
    let started = Instant::now();
    let mut model = build_model(problem)?;
    let variable_count = model.variable_count;
    let constraint_count = model.constraint_count();

    let hints = if problem.config.use_warmstart {
        let raw = match &problem.config.warmstart_hints {
            Some(hints) => hints.clone(),
            None => generate_campaign_hints(problem)?,
        };
        resolve_hints(&raw, &model, &problem.network)
    } else {
        Vec::new()
    };

    tracing::info!(
        variables = variable_count,
        constraints = constraint_count,
        backend = ?config.backend,
        warmstart_hints = hints.len(),
        "solving plan model"
    );

    // The backend consumes variables, objective, and constraints; the
    // registry and index stay behind for extraction.
    let vars = std::mem::replace(&mut model.vars, good_lp::variables!());
    let objective = std::mem::replace(&mut model.objective, good_lp::Expression::from(0.0));
    let constraints = std::mem::take(&mut model.constraints);

    let (termination, values, objective_value, status_message) =
        dispatch(vars, objective, constraints, &model, config, hints)?;

    let solve_time = started.elapsed();
    let termination = reclassify_on_time_limit(termination, solve_time, config);

    let solution = match &values {
        Some(solved) => {
            let mut solution = extract_solution(problem, &model.index, &model.demand, solved);
            solution.cost_breakdown = decompose_costs(problem, &model.labor_days, &solution);
            solution
        }
        None => PlanSolution::empty(),
    };

    Ok((
        SolveResult {
            termination,
            objective_value,
            gap: None,
            solve_time,
            variable_count,
            constraint_count,
            status_message,
        },
        solution,
    ))
}

type DispatchOutcome = (TerminationCondition, Option<SolvedValues>, f64, String);

macro_rules! run_backend {
    ($backend:expr, $model:expr, $objective:expr) => {{
        match $backend.solve() {
            Ok(solution) => {
                let values = SolvedValues::read(&solution, &$model.registry);
                let objective_value = $objective.eval_with(&solution);
                (
                    TerminationCondition::Optimal,
                    Some(values),
                    objective_value,
                    String::new(),
                )
            }
            Err(good_lp::ResolutionError::Infeasible) => (
                TerminationCondition::Infeasible,
                None,
                0.0,
                "problem is infeasible".to_string(),
            ),
            Err(other) => (TerminationCondition::Error, None, 0.0, format!("{other:?}")),
        }
    }};
}

#[allow(unused_variables, unused_mut)]
fn dispatch(
    vars: good_lp::ProblemVariables,
    objective: good_lp::Expression,
    constraints: Vec<good_lp::Constraint>,
    model: &PlanModel,
    config: &SolverConfig,
    hints: Vec<(good_lp::Variable, f64)>,
) -> PlanResult<DispatchOutcome> {
    let unsolved = vars.minimise(objective.clone());

    match config.backend {
        #[cfg(feature = "solver-microlp")]
        SolverBackend::Microlp => {
            use good_lp::SolverModel;
            // microlp exposes no time limit, gap, or warmstart; the config
            // and hints are accepted and ignored.
            let mut backend = unsolved.using(good_lp::solvers::microlp::microlp);
            for constraint in constraints {
                backend = backend.with(constraint);
            }
            Ok(run_backend!(backend, model, objective))
        }
        #[cfg(feature = "solver-highs")]
        SolverBackend::Highs => {
            use good_lp::{SolverModel, WithInitialSolution, WithMipGap};
            let mut backend = unsolved
                .using(good_lp::solvers::highs::highs)
                .set_verbose(config.verbose)
                .set_time_limit(config.time_limit_seconds);
            backend = backend
                .with_mip_gap(config.mip_gap as f32)
                .map_err(|e| PlanError::Config(format!("invalid MIP gap: {e:?}")))?;
            if !hints.is_empty() {
                backend = backend.with_initial_solution(hints);
            }
            for constraint in constraints {
                backend = backend.with(constraint);
            }
            Ok(run_backend!(backend, model, objective))
        }
        #[cfg(feature = "solver-cbc")]
        SolverBackend::Cbc => {
            use good_lp::{SolverModel, WithInitialSolution, WithMipGap};
            let mut backend = unsolved.using(good_lp::solvers::coin_cbc::coin_cbc);
            backend = backend
                .with_mip_gap(config.mip_gap as f32)
                .map_err(|e| PlanError::Config(format!("invalid MIP gap: {e:?}")))?;
            if !hints.is_empty() {
                backend = backend.with_initial_solution(hints);
            }
            for constraint in constraints {
                backend = backend.with(constraint);
            }
            Ok(run_backend!(backend, model, objective))
        }
        #[allow(unreachable_patterns)]
        other => Err(SolveError::BackendUnavailable(other).into()),
    }
}

/// A successful return at (or past) the time limit is an incumbent without
/// proven optimality; an unsuccessful one is a timeout.
fn reclassify_on_time_limit(
    termination: TerminationCondition,
    elapsed: Duration,
    config: &SolverConfig,
) -> TerminationCondition {
    if config.time_limit_seconds <= 0.0 {
        return termination;
    }
    let hit_limit = elapsed.as_secs_f64() >= config.time_limit_seconds * 0.95;
    match termination {
        TerminationCondition::Optimal if hit_limit => TerminationCondition::Feasible,
        TerminationCondition::Error if hit_limit => TerminationCondition::Timeout,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_matches_features() {
        let backend = SolverBackend::default();
        #[cfg(feature = "solver-microlp")]
        assert_eq!(backend, SolverBackend::Microlp);
    }

    #[test]
    fn test_termination_predicates() {
        assert!(TerminationCondition::Optimal.is_feasible());
        assert!(TerminationCondition::Feasible.is_feasible());
        assert!(!TerminationCondition::Infeasible.is_feasible());
        assert!(TerminationCondition::Optimal.is_optimal());
        assert!(!TerminationCondition::Feasible.is_optimal());
    }

    #[test]
    fn test_time_limit_reclassification() {
        let config = SolverConfig {
            time_limit_seconds: 1.0,
            ..SolverConfig::default()
        };
        assert_eq!(
            reclassify_on_time_limit(
                TerminationCondition::Optimal,
                Duration::from_secs(2),
                &config
            ),
            TerminationCondition::Feasible
        );
        assert_eq!(
            reclassify_on_time_limit(
                TerminationCondition::Optimal,
                Duration::from_millis(10),
                &config
            ),
            TerminationCondition::Optimal
        );
        assert_eq!(
            reclassify_on_time_limit(
                TerminationCondition::Error,
                Duration::from_secs(2),
                &config
            ),
            TerminationCondition::Timeout
        );
    }
}
