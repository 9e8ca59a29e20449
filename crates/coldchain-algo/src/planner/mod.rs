//! The planning MIP
//!
//! Shaped as problem → model → solve → solution:
//!
//! - [`problem`]: inputs and configuration ([`PlanProblem`], [`PlanConfig`])
//! - [`features`]: conditional structural reductions ([`FeatureGates`])
//! - [`model`]: variable, constraint, and objective emission
//! - [`warmstart`]: campaign-style SKU-day selection hints
//! - [`solver`]: backend dispatch and [`SolveResult`]
//! - [`solution`]: value extraction and the material-balance check

pub mod features;
pub mod model;
pub mod problem;
pub mod solution;
pub mod solver;
pub mod warmstart;

pub use features::FeatureGates;
pub use model::{build_model, PlanModel};
pub use problem::{PlanConfig, PlanProblem};
pub use solution::{MaterialBalance, PlanSolution, ShipmentRecord};
pub use solver::{solve, SolveError, SolveResult, SolverBackend, SolverConfig, TerminationCondition};
pub use warmstart::{generate_campaign_hints, WarmstartHints};
