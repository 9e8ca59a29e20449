//! MIP construction
//!
//! Emits the cohort-indexed mixed-integer model: decision variables over the
//! index families, linear constraints for cohort balance, shipments,
//! freeze/thaw linkage, demand, trucks, labor, and the conditional integer
//! structures, plus the cost-minimizing objective.
//!
//! The model is solver-agnostic: variables, an objective [`Expression`], and
//! a list of [`Constraint`]s, handed to whichever backend the solver module
//! dispatches to. Construction order is strict — route enumeration, then
//! cohort indexing, then feature-gate inspection, then variables, constraints,
//! and the objective — so variable identity is stable for warmstart lookup.

use crate::cohorts::{CohortIndex, CohortKey, DemandKey, FreezeThawKey, IndexConfig, ShipmentKey};
use crate::planner::features::FeatureGates;
use crate::planner::problem::PlanProblem;
use crate::routing::{legs_in_use, RouteEnumerator};
use chrono::{Duration, NaiveDate};
use coldchain_core::{
    LaborDay, Network, NodeId, PlanError, PlanResult, ProductId, ProductState, Route, TruckId,
};
use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use std::collections::BTreeMap;

/// Every decision variable, keyed by its domain index.
#[derive(Debug, Default)]
pub struct VarRegistry {
    pub production: BTreeMap<(ProductId, NaiveDate), Variable>,
    pub mix_count: BTreeMap<(ProductId, NaiveDate), Variable>,
    pub inventory: BTreeMap<CohortKey, Variable>,
    pub shipment: BTreeMap<ShipmentKey, Variable>,
    pub freeze: BTreeMap<FreezeThawKey, Variable>,
    pub thaw: BTreeMap<FreezeThawKey, Variable>,
    pub demand: BTreeMap<DemandKey, Variable>,
    pub shortage: BTreeMap<(NodeId, ProductId, NaiveDate), Variable>,
    pub labor_hours: BTreeMap<NaiveDate, Variable>,
    pub overtime: BTreeMap<NaiveDate, Variable>,
    pub non_fixed_used: BTreeMap<NaiveDate, Variable>,
    pub production_active: BTreeMap<NaiveDate, Variable>,
    pub truck_load: BTreeMap<(TruckId, NaiveDate, NodeId, ProductId), Variable>,
    pub truck_pallets: BTreeMap<(TruckId, NaiveDate, ProductId), Variable>,
    pub truck_cases: BTreeMap<(TruckId, NaiveDate, NodeId, ProductId), Variable>,
    pub truck_used: BTreeMap<(TruckId, NaiveDate), Variable>,
    pub pallet_count: BTreeMap<CohortKey, Variable>,
    pub product_produced: BTreeMap<(ProductId, NaiveDate), Variable>,
    pub product_start: BTreeMap<(ProductId, NaiveDate), Variable>,
}

/// The fully emitted model, ready for a backend.
pub struct PlanModel {
    pub vars: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub registry: VarRegistry,
    pub gates: FeatureGates,
    pub index: CohortIndex,
    pub demand: BTreeMap<(NodeId, ProductId, NaiveDate), f64>,
    pub labor_days: Vec<LaborDay>,
    pub dates: Vec<NaiveDate>,
    pub mfg: NodeId,
    pub variable_count: usize,
}

impl PlanModel {
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

/// Build the complete model for a problem. The cohort index sets are fully
/// materialized before any variable is created.
pub fn build_model(problem: &PlanProblem) -> PlanResult<PlanModel> {
    let mfg = problem.manufacturing()?;
    let rate = problem
        .network
        .node(mfg)
        .capabilities
        .production_rate_per_hour;
    if rate <= 0.0 {
        return Err(PlanError::Config(
            "manufacturing node has a non-positive production rate".into(),
        ));
    }

    let demand = problem.demand_map()?;
    let labor_days = problem.labor_days()?;
    let dates = problem.dates();

    let destinations = problem.demand_nodes()?;
    let enumerator = RouteEnumerator::new(
        &problem.network,
        mfg,
        problem.config.max_routes_per_destination,
    );
    let enumerated = enumerator.enumerate(&destinations);
    let legs = legs_in_use(&enumerated);

    let snapshot = problem.initial_inventory.as_ref().map(|i| i.snapshot_date);
    let initial = problem.resolved_initial_inventory()?;
    let index = CohortIndex::build(
        &problem.network,
        problem.start_date,
        problem.end_date,
        &demand,
        &legs,
        &initial,
        snapshot,
        &IndexConfig {
            use_batch_tracking: problem.config.use_batch_tracking,
            enforce_shelf_life: problem.config.enforce_shelf_life,
        },
    );

    let gates = FeatureGates::detect(problem);

    let mut builder = ModelBuilder {
        problem,
        network: &problem.network,
        index,
        gates,
        demand,
        labor_days,
        dates,
        mfg,
        rate,
        vars: variables!(),
        objective: Expression::from(0.0),
        constraints: Vec::new(),
        registry: VarRegistry::default(),
        flow: BTreeMap::new(),
        variable_count: 0,
    };

    builder.emit_production_and_labor()?;
    builder.emit_cohort_variables();
    builder.emit_shipments()?;
    builder.emit_freeze_thaw()?;
    builder.emit_demand()?;
    builder.emit_trucks();
    builder.emit_cohort_balances()?;
    builder.emit_storage_costs_and_capacity();

    let ModelBuilder {
        index,
        gates,
        demand,
        labor_days,
        dates,
        mfg,
        vars,
        objective,
        constraints,
        registry,
        variable_count,
        ..
    } = builder;

    Ok(PlanModel {
        vars,
        objective,
        constraints,
        registry,
        gates,
        index,
        demand,
        labor_days,
        dates,
        mfg,
        variable_count,
    })
}

struct ModelBuilder<'a> {
    problem: &'a PlanProblem,
    network: &'a Network,
    index: CohortIndex,
    gates: FeatureGates,
    demand: BTreeMap<(NodeId, ProductId, NaiveDate), f64>,
    labor_days: Vec<LaborDay>,
    dates: Vec<NaiveDate>,
    mfg: NodeId,
    rate: f64,
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    registry: VarRegistry,
    /// Net (inflow − outflow) accumulated per cohort-day, consumed by the
    /// balance equalities at the end.
    flow: BTreeMap<CohortKey, Expression>,
    variable_count: usize,
}

impl ModelBuilder<'_> {
    fn add_var(&mut self, definition: good_lp::variable::VariableDefinition) -> Variable {
        self.variable_count += 1;
        self.vars.add(definition)
    }

    fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Daily production ceiling in units, from the day's labor cap.
    fn daily_capacity(&self, day_index: usize) -> f64 {
        self.labor_days[day_index].max_hours * self.rate
    }

    /// Per-unit cost of a leg, falling back to the mode's default rate.
    fn leg_cost(&self, route: &Route) -> f64 {
        if route.cost_per_unit > 0.0 {
            route.cost_per_unit
        } else {
            match route.transport_mode {
                coldchain_core::TransportMode::Frozen => {
                    self.problem.costs.transport_cost_frozen_per_unit
                }
                coldchain_core::TransportMode::Ambient => {
                    self.problem.costs.transport_cost_ambient_per_unit
                }
            }
        }
    }

    fn flow_add(&mut self, key: &CohortKey, term: Expression) -> PlanResult<()> {
        match self.flow.get_mut(key) {
            Some(expr) => {
                *expr += term;
                Ok(())
            }
            None => Err(PlanError::Internal(format!(
                "flow references cohort outside the index: {key:?}"
            ))),
        }
    }

    // =========================================================================
    // Production, labor, SKU selection
    // =========================================================================

    fn emit_production_and_labor(&mut self) -> PlanResult<()> {
        let costs = self.problem.costs.clone();
        let caps = self.network.node(self.mfg).capabilities.clone();
        let products: Vec<_> = self.network.products().to_vec();
        let dates = self.dates.clone();

        for (i, &date) in dates.iter().enumerate() {
            let labor = self.labor_days[i].clone();
            let capacity = self.daily_capacity(i);

            let active = self.add_var(variable().binary());
            self.registry.production_active.insert(date, active);

            let mut day_production = Expression::from(0.0);
            for product in &products {
                let prod_var = self.add_var(variable().min(0.0).max(capacity));
                self.registry.production.insert((product.id, date), prod_var);
                day_production += prod_var;

                if self.gates.mix_based_production && product.units_per_mix > 1 {
                    let mix = product.units_per_mix as f64;
                    let max_mixes = (capacity / mix).ceil();
                    let mix_var = self.add_var(variable().integer().min(0.0).max(max_mixes));
                    self.registry.mix_count.insert((product.id, date), mix_var);
                    self.push(constraint!(prod_var == mix * mix_var));
                }

                if self.gates.binary_sku_selection {
                    let produced = self.add_var(variable().binary());
                    self.registry.product_produced.insert((product.id, date), produced);
                    self.push(constraint!(prod_var <= capacity * produced));

                    let start = self.add_var(variable().binary());
                    self.registry.product_start.insert((product.id, date), start);
                    match i.checked_sub(1).map(|j| dates[j]) {
                        Some(prev) => {
                            let prev_produced = self.registry.product_produced[&(product.id, prev)];
                            self.push(constraint!(start >= produced - prev_produced));
                        }
                        // A run beginning on the first day is a start.
                        None => self.push(constraint!(start >= produced)),
                    }
                    self.objective += costs.changeover_cost_per_start * start;
                }
            }

            // Any production switches the day on and pays startup/shutdown.
            self.push(constraint!(day_production.clone() <= capacity * active));

            if self.gates.binary_sku_selection {
                if let Some(max_skus) = self.problem.config.max_products_per_day {
                    let mut produced_sum = Expression::from(0.0);
                    for product in &products {
                        produced_sum += self.registry.product_produced[&(product.id, date)];
                    }
                    self.push(constraint!(produced_sum <= max_skus as f64));
                }
            }

            let labor_hours = self.add_var(variable().min(0.0).max(labor.max_hours));
            self.registry.labor_hours.insert(date, labor_hours);
            let overhead = caps.daily_startup_hours + caps.daily_shutdown_hours;
            let hours_needed = (1.0 / self.rate) * day_production + overhead * active;
            self.push(constraint!(labor_hours >= hours_needed));

            if labor.is_fixed_day {
                // Fixed hours are sunk: a constant in the objective whether or
                // not anything runs. Only overtime is decision-driven.
                self.objective += Expression::from(labor.fixed_hours * labor.regular_rate);
                let ot_cap = (labor.max_hours - labor.fixed_hours).max(0.0);
                let overtime = self.add_var(variable().min(0.0).max(ot_cap));
                self.registry.overtime.insert(date, overtime);
                self.push(constraint!(overtime >= labor_hours - labor.fixed_hours));
                self.objective += labor.overtime_rate * overtime;
            } else {
                // Non-fixed days pay max(hours, minimum) only when production
                // actually runs.
                let paid = self.add_var(variable().min(0.0).max(labor.max_hours));
                self.registry.non_fixed_used.insert(date, paid);
                self.push(constraint!(paid >= labor_hours));
                self.push(constraint!(paid >= labor.minimum_hours * active));
                self.push(constraint!(paid <= labor.max_hours * active));
                self.objective += labor.non_fixed_rate_or_overtime() * paid;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Cohorts and flows
    // =========================================================================

    fn emit_cohort_variables(&mut self) {
        let keys: Vec<CohortKey> = self.index.inv.iter().copied().collect();
        for key in keys {
            let inv = self.add_var(variable().min(0.0));
            self.registry.inventory.insert(key, inv);
            self.flow.insert(key, Expression::from(0.0));
        }
        for (key, qty) in self.index.initial.clone() {
            if let Some(expr) = self.flow.get_mut(&key) {
                *expr += Expression::from(qty);
            }
        }
    }

    fn emit_shipments(&mut self) -> PlanResult<()> {
        let ships: Vec<ShipmentKey> = self.index.ship.clone();
        for key in ships {
            let route = self.network.route(key.route).clone();
            let var = self.add_var(variable().min(0.0));
            self.registry.shipment.insert(key, var);
            self.objective += self.leg_cost(&route) * var;

            let origin = self.index.origin_cohort(&key, self.network);
            let destination = self.index.destination_cohort(&key, self.network);
            self.flow_add(&origin, Expression::from(0.0) - var)?;
            self.flow_add(&destination, Expression::from(0.0) + var)?;
        }
        Ok(())
    }

    fn emit_freeze_thaw(&mut self) -> PlanResult<()> {
        let ft_keys: Vec<FreezeThawKey> = self.index.ft.clone();
        for key in ft_keys {
            if let Some((source, target)) = self.index.freeze_cohorts(&key) {
                let freeze = self.add_var(variable().min(0.0));
                self.registry.freeze.insert(key, freeze);
                self.flow_add(&source, Expression::from(0.0) - freeze)?;
                self.flow_add(&target, Expression::from(0.0) + freeze)?;
            }
            if let Some((source, target)) = self.index.thaw_cohorts(&key) {
                let thaw = self.add_var(variable().min(0.0));
                self.registry.thaw.insert(key, thaw);
                self.flow_add(&source, Expression::from(0.0) - thaw)?;
                self.flow_add(&target, Expression::from(0.0) + thaw)?;
            }
        }
        Ok(())
    }

    fn emit_demand(&mut self) -> PlanResult<()> {
        let costs = self.problem.costs.clone();
        let mut satisfied: BTreeMap<(NodeId, ProductId, NaiveDate), Expression> = self
            .demand
            .keys()
            .map(|&k| (k, Expression::from(0.0)))
            .collect();

        let demand_keys: Vec<DemandKey> = self.index.demand.clone();
        for key in demand_keys {
            let group = (key.node, key.product, key.date);
            let Some(quantity) = self.demand.get(&group).copied() else {
                return Err(PlanError::Internal(format!(
                    "demand cohort without a demand entry: {key:?}"
                )));
            };
            let var = self.add_var(variable().min(0.0).max(quantity));
            self.registry.demand.insert(key, var);
            self.flow_add(&key.cohort(), Expression::from(0.0) - var)?;
            if let Some(expr) = satisfied.get_mut(&group) {
                *expr += var;
            }

            if self.gates.freshness_incentive {
                let product = self.network.product(key.product);
                let remaining =
                    product.shelf_life(key.state) - (key.date - key.entered).num_days();
                self.objective -=
                    costs.freshness_incentive_weight * remaining.max(0) as f64 * var;
            }
        }

        for (group, expr) in satisfied {
            let quantity = self.demand[&group];
            if self.problem.config.allow_shortages {
                let shortage = self.add_var(variable().min(0.0).max(quantity));
                self.registry.shortage.insert(group, shortage);
                self.objective += costs.shortage_penalty_per_unit * shortage;
                self.push(constraint!(expr + shortage == quantity));
            } else {
                self.push(constraint!(expr == quantity));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Trucks
    // =========================================================================

    fn emit_trucks(&mut self) {
        // Departures grouped by (origin, drop-off, product, date), with the
        // same-day-produced subtotal for the morning loading rule.
        let mut ship_groups: BTreeMap<(NodeId, NodeId, ProductId, NaiveDate), Vec<Variable>> =
            BTreeMap::new();
        let mut same_day_groups: BTreeMap<(NodeId, NodeId, ProductId, NaiveDate), Vec<Variable>> =
            BTreeMap::new();
        for (key, &var) in &self.registry.shipment {
            let route = self.network.route(key.route);
            if !self.network.node(route.origin).requires_trucks() {
                continue;
            }
            let group = (route.origin, route.destination, key.product, key.departs);
            ship_groups.entry(group).or_default().push(var);
            if route.origin == self.mfg && key.produced == key.departs {
                same_day_groups.entry(group).or_default().push(var);
            }
        }

        // Load variables for trucks that can carry those groups.
        let trucks: Vec<_> = self.network.trucks().to_vec();
        let dates = self.dates.clone();
        let mut truck_any_load: BTreeMap<(TruckId, NaiveDate), Vec<Variable>> = BTreeMap::new();
        for truck in &trucks {
            for &date in &dates {
                if !truck.applies_on_date(date) {
                    continue;
                }
                for stop in truck.stops() {
                    for product in self.network.products() {
                        let group = (truck.origin, stop, product.id, date);
                        if !ship_groups.contains_key(&group) {
                            continue;
                        }
                        let load = self.add_var(variable().min(0.0).max(truck.capacity));
                        self.registry
                            .truck_load
                            .insert((truck.id, date, stop, product.id), load);
                        truck_any_load.entry((truck.id, date)).or_default().push(load);
                        if truck.cost_per_unit > 0.0 {
                            self.objective += truck.cost_per_unit * load;
                        }
                        if self.problem.config.require_case_multiples {
                            let case_size = truck.units_per_case as f64;
                            let max_cases = (truck.capacity / case_size).ceil();
                            let cases =
                                self.add_var(variable().integer().min(0.0).max(max_cases));
                            self.registry
                                .truck_cases
                                .insert((truck.id, date, stop, product.id), cases);
                            self.push(constraint!(load == case_size * cases));
                        }
                    }
                }
            }
        }

        // Departing quantity must equal assigned truck loads, leg by leg.
        for (group, ship_vars) in &ship_groups {
            let &(origin, stop, product, date) = group;
            let mut shipped = Expression::from(0.0);
            for &v in ship_vars {
                shipped += v;
            }
            let mut loaded = Expression::from(0.0);
            let mut afternoon_loaded = Expression::from(0.0);
            for truck in &trucks {
                if truck.origin != origin || !truck.applies_on_date(date) {
                    continue;
                }
                if !truck.stops().any(|s| s == stop) {
                    continue;
                }
                if let Some(&load) = self.registry.truck_load.get(&(truck.id, date, stop, product))
                {
                    loaded += load;
                    if truck.is_afternoon() {
                        afternoon_loaded += load;
                    }
                }
            }
            self.push(constraint!(shipped == loaded));

            // Morning trucks carry previously produced cohorts only:
            // units produced on the departure day fit inside afternoon loads.
            if let Some(same_day) = same_day_groups.get(group) {
                let mut fresh = Expression::from(0.0);
                for &v in same_day {
                    fresh += v;
                }
                self.push(constraint!(fresh <= afternoon_loaded));
            }
        }

        // Per-departure capacity, pallet rounding, and fixed-cost binaries.
        for truck in &trucks {
            for &date in &dates {
                let Some(loads) = truck_any_load.get(&(truck.id, date)) else {
                    continue;
                };
                let mut total = Expression::from(0.0);
                for &load in loads {
                    total += load;
                }

                if self.gates.truck_fixed_costs && truck.cost_fixed > 0.0 {
                    let used = self.add_var(variable().binary());
                    self.registry.truck_used.insert((truck.id, date), used);
                    self.objective += truck.cost_fixed * used;
                    self.push(constraint!(total.clone() <= truck.capacity * used));
                } else {
                    self.push(constraint!(total.clone() <= truck.capacity));
                }

                // Partial pallets occupy whole pallet slots, per product.
                let mut pallet_sum = Expression::from(0.0);
                for product in self.network.products() {
                    let mut product_load = Expression::from(0.0);
                    let mut any = false;
                    for stop in truck.stops() {
                        if let Some(&load) =
                            self.registry.truck_load.get(&(truck.id, date, stop, product.id))
                        {
                            product_load += load;
                            any = true;
                        }
                    }
                    if !any {
                        continue;
                    }
                    let pallets = self.add_var(
                        variable()
                            .integer()
                            .min(0.0)
                            .max(truck.pallet_capacity as f64),
                    );
                    self.registry
                        .truck_pallets
                        .insert((truck.id, date, product.id), pallets);
                    self.push(constraint!(
                        truck.units_per_pallet as f64 * pallets >= product_load
                    ));
                    pallet_sum += pallets;
                }
                self.push(constraint!(pallet_sum <= truck.pallet_capacity as f64));
            }
        }
    }

    // =========================================================================
    // Balance equalities and storage
    // =========================================================================

    fn emit_cohort_balances(&mut self) -> PlanResult<()> {
        // Production feeds the fresh ambient cohort at the plant, less the
        // run-start yield loss.
        let products: Vec<ProductId> = self.network.products().iter().map(|p| p.id).collect();
        let dates = self.dates.clone();
        let waste = self.problem.costs.changeover_waste_units;
        for &product in &products {
            for &date in &dates {
                let key = CohortKey {
                    node: self.mfg,
                    product,
                    produced: date,
                    date,
                    state: ProductState::Ambient,
                    entered: date,
                };
                if !self.index.contains(&key) {
                    return Err(PlanError::Internal(format!(
                        "production cohort missing from index: {key:?}"
                    )));
                }
                let prod_var = self.registry.production[&(product, date)];
                let mut inflow = Expression::from(0.0) + prod_var;
                if self.gates.binary_sku_selection && waste > 0.0 {
                    let start = self.registry.product_start[&(product, date)];
                    inflow -= waste * start;
                }
                self.flow_add(&key, inflow)?;
            }
        }

        // Every cohort: today's holding = yesterday's + net flow. Cohorts
        // whose predecessor fell out of the index restart from flow alone;
        // whatever the predecessor still held expired there.
        let keys: Vec<CohortKey> = self.index.inv.iter().copied().collect();
        for key in keys {
            let inv = self.registry.inventory[&key];
            let flow = self
                .flow
                .remove(&key)
                .ok_or_else(|| PlanError::Internal(format!("missing flow for {key:?}")))?;
            let prev_key = CohortKey {
                date: key.date - Duration::days(1),
                ..key
            };
            match self.registry.inventory.get(&prev_key).copied() {
                Some(prev) => self.push(constraint!(inv == prev + flow)),
                None => self.push(constraint!(inv == flow)),
            }
        }
        Ok(())
    }

    fn emit_storage_costs_and_capacity(&mut self) {
        let costs = self.problem.costs.clone();
        let waste_rate = costs.waste_cost_multiplier * costs.production_cost_per_unit;
        let pallet_units = costs.units_per_pallet_storage as f64;
        let horizon_cap: f64 = (0..self.dates.len()).map(|i| self.daily_capacity(i)).sum();
        let max_pallets = (horizon_cap / pallet_units).ceil().max(1.0);

        let mut node_day_inventory: BTreeMap<(NodeId, NaiveDate), Expression> = BTreeMap::new();
        let keys: Vec<CohortKey> = self.index.inv.iter().copied().collect();
        for key in keys {
            let inv = self.registry.inventory[&key];

            if self.gates.pallet_tracking(key.state) {
                let pallets = self.add_var(variable().integer().min(0.0).max(max_pallets));
                self.registry.pallet_count.insert(key, pallets);
                self.push(constraint!(pallet_units * pallets >= inv));
                self.objective += costs.pallet_cost_per_day(key.state) * pallets;
            } else {
                let rate = costs.unit_storage_cost_per_day(key.state);
                if rate > 0.0 {
                    self.objective += rate * inv;
                }
            }

            // Leftovers at the horizon end are waste.
            if key.date == self.index.end && waste_rate > 0.0 {
                self.objective += waste_rate * inv;
            }

            if self
                .network
                .node(key.node)
                .capabilities
                .storage_capacity
                .is_some()
            {
                *node_day_inventory
                    .entry((key.node, key.date))
                    .or_insert_with(|| Expression::from(0.0)) += inv;
            }
        }

        for ((node, _date), held) in node_day_inventory {
            if let Some(capacity) = self.network.node(node).capabilities.storage_capacity {
                self.push(constraint!(held <= capacity));
            }
        }

        // Production cost applies to every unit made.
        if costs.production_cost_per_unit > 0.0 {
            let production: Vec<Variable> = self.registry.production.values().copied().collect();
            for var in production {
                self.objective += costs.production_cost_per_unit * var;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use coldchain_core::{
        CostStructure, Forecast, ForecastEntry, LaborCalendar, Network, NodeCapabilities,
        ProductSpec, TransportMode, TruckSpec,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn labor_week(start: NaiveDate) -> LaborCalendar {
        let days = (0..7)
            .map(|i| {
                let d = start + Duration::days(i);
                let weekend = i >= 5;
                coldchain_core::LaborDay {
                    date: d,
                    is_fixed_day: !weekend,
                    fixed_hours: if weekend { 0.0 } else { 12.0 },
                    regular_rate: 25.0,
                    overtime_rate: 37.5,
                    non_fixed_rate: Some(40.0),
                    minimum_hours: if weekend { 4.0 } else { 0.0 },
                    max_hours: 14.0,
                }
            })
            .collect();
        LaborCalendar::new(days)
    }

    fn small_problem(costs: CostStructure) -> PlanProblem {
        let start = date(2025, 10, 13); // Monday
        let mut network = Network::new();
        network.add_node(
            "M",
            "Plant",
            NodeCapabilities {
                can_manufacture: true,
                production_rate_per_hour: 1400.0,
                requires_truck_schedules: true,
                ..NodeCapabilities::default()
            },
        );
        network.add_node(
            "D",
            "Dest",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network
            .add_route("R1", "M", "D", 1.0, TransportMode::Ambient, 0.3)
            .unwrap();
        network.add_product(ProductSpec {
            code: "P1".into(),
            name: "Product 1".into(),
            sku: "SKU-P1".into(),
            ..ProductSpec::default()
        });
        network
            .add_truck(TruckSpec {
                code: "T1".into(),
                origin: "M".into(),
                destination: "D".into(),
                departure_type: coldchain_core::DepartureType::Afternoon,
                ..TruckSpec::default()
            })
            .unwrap();

        let forecast = Forecast {
            name: "t".into(),
            entries: vec![ForecastEntry {
                location_code: "D".into(),
                product_code: "P1".into(),
                date: start + Duration::days(2),
                quantity: 500.0,
                confidence: None,
            }],
        };
        PlanProblem::new(
            network,
            forecast,
            labor_week(start),
            costs,
            start,
            start + Duration::days(6),
        )
    }

    #[test]
    fn test_build_plain_model() {
        let model = build_model(&small_problem(CostStructure {
            production_cost_per_unit: 0.8,
            shortage_penalty_per_unit: 100.0,
            ..CostStructure::default()
        }))
        .unwrap();

        assert!(model.variable_count > 0);
        assert!(model.constraint_count() > 0);
        assert!(!model.registry.production.is_empty());
        assert!(!model.registry.inventory.is_empty());
        assert!(!model.registry.shipment.is_empty());
        assert!(!model.registry.demand.is_empty());
        assert!(!model.registry.truck_load.is_empty());
        // No gates fired: no integer structures beyond trucks.
        assert!(model.registry.mix_count.is_empty());
        assert!(model.registry.product_produced.is_empty());
        assert!(model.registry.pallet_count.is_empty());
        // Hard demand: no shortage variables.
        assert!(model.registry.shortage.is_empty());
    }

    #[test]
    fn test_shortage_variables_follow_config() {
        let mut problem = small_problem(CostStructure {
            shortage_penalty_per_unit: 100.0,
            ..CostStructure::default()
        });
        problem.config.allow_shortages = true;
        let model = build_model(&problem).unwrap();
        assert_eq!(model.registry.shortage.len(), 1);
    }

    #[test]
    fn test_changeover_costs_emit_sku_binaries() {
        let model = build_model(&small_problem(CostStructure {
            changeover_cost_per_start: 500.0,
            ..CostStructure::default()
        }))
        .unwrap();
        assert!(!model.registry.product_produced.is_empty());
        assert_eq!(
            model.registry.product_produced.len(),
            model.registry.product_start.len()
        );
    }

    #[test]
    fn test_pallet_variables_only_for_costed_states() {
        let model = build_model(&small_problem(CostStructure {
            storage_cost_fixed_per_pallet_frozen: 5.0,
            ..CostStructure::default()
        }))
        .unwrap();
        // The network has no frozen storage, so no frozen cohorts exist and
        // ambient cohorts are not pallet-tracked.
        assert!(model.registry.pallet_count.is_empty());

        let model = build_model(&small_problem(CostStructure {
            storage_cost_fixed_per_pallet_ambient: 2.0,
            ..CostStructure::default()
        }))
        .unwrap();
        assert!(!model.registry.pallet_count.is_empty());
        assert!(model
            .registry
            .pallet_count
            .keys()
            .all(|k| k.state != ProductState::Frozen));
    }

    #[test]
    fn test_mix_quantum_emits_integer_counts() {
        let mut problem = small_problem(CostStructure::default());
        problem.network.add_product(ProductSpec {
            code: "P2".into(),
            units_per_mix: 415,
            ..ProductSpec::default()
        });
        let model = build_model(&problem).unwrap();
        // Only the quantized product gets mix variables.
        assert!(model
            .registry
            .mix_count
            .keys()
            .all(|(p, _)| problem.network.product(*p).units_per_mix > 1));
        assert!(!model.registry.mix_count.is_empty());
    }
}
