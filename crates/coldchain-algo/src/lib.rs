//! # coldchain-algo: Planning Algorithms
//!
//! The planning engine for integrated production-distribution of perishable
//! goods: route enumeration, cohort indexing, mixed-integer model
//! construction, solving, solution extraction, pre-flight validation, and
//! post-solve cost decomposition.
//!
//! Construction order is strict and deterministic: validation gates route
//! enumeration, which feeds the cohort indexer, whose index sets are fully
//! materialized before any decision variable is created. The model itself is
//! solver-agnostic; backends are selected through cargo features
//! (`solver-microlp` is the pure-Rust default, `solver-highs` and
//! `solver-cbc` bind native branch-and-cut solvers).
//!
//! ```no_run
//! use coldchain_algo::planner::{solve, PlanProblem, SolverConfig};
//! # fn problem() -> PlanProblem { unimplemented!() }
//!
//! let problem = problem();
//! let report = coldchain_algo::validate::validate(&problem);
//! assert!(report.is_planning_feasible());
//!
//! let (result, solution) = solve(&problem, &SolverConfig::default()).unwrap();
//! println!("{:?}: ${:.2}", result.termination, result.objective_value);
//! println!("{}", solution.material_balance.discrepancy);
//! ```

pub mod cohorts;
pub mod costs;
pub mod planner;
pub mod routing;
pub mod validate;

pub use cohorts::{CohortIndex, CohortKey, DemandKey, FreezeThawKey, ShipmentKey};
pub use costs::CostBreakdown;
pub use planner::{
    solve, FeatureGates, PlanConfig, PlanProblem, PlanSolution, SolveResult, SolverConfig,
    TerminationCondition,
};
pub use routing::{EnumeratedRoute, RouteEnumerator};
pub use validate::validate;
