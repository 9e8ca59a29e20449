//! Solution extraction and the material-balance check
//!
//! Copies solver values out of the model into plain dictionaries keyed by
//! external codes, aggregates per-date production/shipment/shortage views,
//! accounts for expired cohorts, and verifies conservation:
//! production + initial inventory = consumption + end-horizon inventory +
//! expiry (within a one-unit tolerance).

use crate::cohorts::{CohortIndex, CohortKey, DemandKey, FreezeThawKey, ShipmentKey};
use crate::costs::CostBreakdown;
use crate::planner::model::VarRegistry;
use crate::planner::problem::PlanProblem;
use chrono::NaiveDate;
use coldchain_core::{NodeId, ProductId, ProductState};
use good_lp::Solution;
use std::collections::BTreeMap;

/// Values below this are numerical noise from the solver.
const VALUE_TOLERANCE: f64 = 1e-6;

/// Conservation tolerance, in units.
const BALANCE_TOLERANCE: f64 = 1.0;

/// Raw variable values copied out of a solver solution, keyed like the
/// registry. The solver's solution object is dropped after this copy.
#[derive(Debug, Default, Clone)]
pub struct SolvedValues {
    pub production: BTreeMap<(ProductId, NaiveDate), f64>,
    pub inventory: BTreeMap<CohortKey, f64>,
    pub shipment: BTreeMap<ShipmentKey, f64>,
    pub freeze: BTreeMap<FreezeThawKey, f64>,
    pub thaw: BTreeMap<FreezeThawKey, f64>,
    pub demand: BTreeMap<DemandKey, f64>,
    pub shortage: BTreeMap<(NodeId, ProductId, NaiveDate), f64>,
    pub labor_hours: BTreeMap<NaiveDate, f64>,
    pub overtime: BTreeMap<NaiveDate, f64>,
    pub non_fixed_used: BTreeMap<NaiveDate, f64>,
    pub truck_load: BTreeMap<(coldchain_core::TruckId, NaiveDate, NodeId, ProductId), f64>,
    pub product_start: BTreeMap<(ProductId, NaiveDate), f64>,
}

impl SolvedValues {
    pub fn read<S: Solution>(solution: &S, registry: &VarRegistry) -> Self {
        Self {
            production: registry
                .production
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            inventory: registry
                .inventory
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            shipment: registry
                .shipment
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            freeze: registry
                .freeze
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            thaw: registry
                .thaw
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            demand: registry
                .demand
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            shortage: registry
                .shortage
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            labor_hours: registry
                .labor_hours
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            overtime: registry
                .overtime
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            non_fixed_used: registry
                .non_fixed_used
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            truck_load: registry
                .truck_load
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
            product_start: registry
                .product_start
                .iter()
                .map(|(&k, &v)| (k, solution.value(v)))
                .collect(),
        }
    }
}

/// One realized shipment over one leg.
#[derive(Debug, Clone)]
pub struct ShipmentRecord {
    pub route_code: String,
    pub origin: String,
    pub destination: String,
    pub product: String,
    pub produced: NaiveDate,
    pub departs: NaiveDate,
    pub delivers: NaiveDate,
    pub delivered_state: ProductState,
    pub quantity: f64,
}

/// Conservation accounting over the whole horizon.
#[derive(Debug, Clone, Default)]
pub struct MaterialBalance {
    pub produced: f64,
    pub initial_inventory: f64,
    pub consumed: f64,
    pub end_inventory: f64,
    pub expired: f64,
    pub changeover_loss: f64,
    /// produced + initial − consumed − end − expired − loss
    pub discrepancy: f64,
    pub ok: bool,
}

/// The extracted plan.
#[derive(Debug, Clone, Default)]
pub struct PlanSolution {
    pub production_by_date_product: BTreeMap<(NaiveDate, String), f64>,
    pub shipments: Vec<ShipmentRecord>,
    /// Unmet demand by (destination code, product code, date).
    pub shortages: BTreeMap<(String, String, NaiveDate), f64>,
    /// Demand served by (destination code, product code, date).
    pub demand_consumed: BTreeMap<(String, String, NaiveDate), f64>,
    /// Non-zero cohort holdings.
    pub cohort_inventory: BTreeMap<CohortKey, f64>,
    pub freeze_operations: Vec<(FreezeThawKey, f64)>,
    pub thaw_operations: Vec<(FreezeThawKey, f64)>,
    /// (truck code, date, stop code, product code) → units.
    pub truck_loads: BTreeMap<(String, NaiveDate, String, String), f64>,
    pub labor_hours_by_date: BTreeMap<NaiveDate, f64>,
    pub overtime_hours_by_date: BTreeMap<NaiveDate, f64>,
    pub non_fixed_hours_by_date: BTreeMap<NaiveDate, f64>,
    /// Days on which a product's run started (binary SKU selection only).
    pub production_starts: Vec<(String, NaiveDate)>,
    pub total_production: f64,
    pub total_demand: f64,
    pub total_shortage: f64,
    pub end_horizon_inventory: f64,
    pub expired_units: f64,
    pub material_balance: MaterialBalance,
    pub cost_breakdown: CostBreakdown,
}

impl PlanSolution {
    /// Placeholder for infeasible/error terminations.
    pub fn empty() -> Self {
        let mut solution = Self::default();
        solution.material_balance.ok = true;
        solution
    }
}

/// Build the solution dictionaries from raw values and verify conservation.
pub fn extract_solution(
    problem: &PlanProblem,
    index: &CohortIndex,
    demand_map: &BTreeMap<(NodeId, ProductId, NaiveDate), f64>,
    values: &SolvedValues,
) -> PlanSolution {
    let network = &problem.network;
    let mut solution = PlanSolution::default();

    for (&(product, date), &qty) in &values.production {
        if qty > VALUE_TOLERANCE {
            let code = network.product(product).code.clone();
            *solution
                .production_by_date_product
                .entry((date, code))
                .or_insert(0.0) += qty;
            solution.total_production += qty;
        }
    }

    for (key, &qty) in &values.shipment {
        if qty <= VALUE_TOLERANCE {
            continue;
        }
        let route = network.route(key.route);
        solution.shipments.push(ShipmentRecord {
            route_code: route.code.clone(),
            origin: network.node(route.origin).code.clone(),
            destination: network.node(route.destination).code.clone(),
            product: network.product(key.product).code.clone(),
            produced: key.produced,
            departs: key.departs,
            delivers: key.delivers,
            delivered_state: key.delivered_state,
            quantity: qty,
        });
    }

    for (key, &qty) in &values.demand {
        if qty > VALUE_TOLERANCE {
            let node = network.node(key.node).code.clone();
            let product = network.product(key.product).code.clone();
            *solution
                .demand_consumed
                .entry((node, product, key.date))
                .or_insert(0.0) += qty;
        }
    }

    for (&(node, product, date), &qty) in &values.shortage {
        if qty > VALUE_TOLERANCE {
            let node = network.node(node).code.clone();
            let product = network.product(product).code.clone();
            solution.shortages.insert((node, product, date), qty);
            solution.total_shortage += qty;
        }
    }
    solution.total_demand = demand_map.values().sum();

    let mut expired = 0.0;
    for (key, &qty) in &values.inventory {
        if qty <= VALUE_TOLERANCE {
            continue;
        }
        solution.cohort_inventory.insert(*key, qty);
        if key.date == index.end {
            solution.end_horizon_inventory += qty;
        } else if !index.survives_to_next_day(key) {
            // The cohort's shelf clock ran out here; whatever is left spoils.
            expired += qty;
        }
    }
    solution.expired_units = expired;

    for (key, &qty) in &values.freeze {
        if qty > VALUE_TOLERANCE {
            solution.freeze_operations.push((*key, qty));
        }
    }
    for (key, &qty) in &values.thaw {
        if qty > VALUE_TOLERANCE {
            solution.thaw_operations.push((*key, qty));
        }
    }

    for (&(truck, date, stop, product), &qty) in &values.truck_load {
        if qty > VALUE_TOLERANCE {
            solution.truck_loads.insert(
                (
                    network.truck(truck).code.clone(),
                    date,
                    network.node(stop).code.clone(),
                    network.product(product).code.clone(),
                ),
                qty,
            );
        }
    }

    solution.labor_hours_by_date = values.labor_hours.clone();
    solution.overtime_hours_by_date = values.overtime.clone();
    solution.non_fixed_hours_by_date = values.non_fixed_used.clone();

    for (&(product, date), &value) in &values.product_start {
        if value > 0.5 {
            solution
                .production_starts
                .push((network.product(product).code.clone(), date));
        }
    }

    let consumed: f64 = values.demand.values().sum();
    let initial: f64 = index.initial.iter().map(|(_, qty)| qty).sum();
    let changeover_loss = problem.costs.changeover_waste_units
        * values
            .product_start
            .values()
            .filter(|&&v| v > 0.5)
            .count() as f64;

    let discrepancy = solution.total_production + initial
        - consumed
        - solution.end_horizon_inventory
        - expired
        - changeover_loss;
    solution.material_balance = MaterialBalance {
        produced: solution.total_production,
        initial_inventory: initial,
        consumed,
        end_inventory: solution.end_horizon_inventory,
        expired,
        changeover_loss,
        discrepancy,
        ok: discrepancy.abs() <= BALANCE_TOLERANCE,
    };
    if !solution.material_balance.ok {
        tracing::warn!(
            discrepancy = solution.material_balance.discrepancy,
            "material balance violated"
        );
    }

    solution
}
