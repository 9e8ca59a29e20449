//! Post-solve cost decomposition
//!
//! Breaks the realized objective into labor (sunk fixed hours, overtime,
//! non-fixed), production, transport, storage, changeovers, and waste
//! (unmet demand, expiry, end-of-horizon leftovers). Rates come from the
//! labor calendar and cost structure, quantities from the extracted plan.

use crate::planner::problem::PlanProblem;
use crate::planner::solution::PlanSolution;
use chrono::NaiveDate;
use coldchain_core::{LaborDay, ProductState};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct LaborCost {
    pub fixed_hours: f64,
    pub fixed_hours_cost: f64,
    pub overtime_hours: f64,
    pub overtime_cost: f64,
    pub non_fixed_hours: f64,
    pub non_fixed_cost: f64,
    pub total_cost: f64,
    pub cost_by_date: BTreeMap<NaiveDate, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductionCost {
    pub total_units: f64,
    pub total_cost: f64,
    pub average_cost_per_unit: f64,
    pub cost_by_product: BTreeMap<String, f64>,
    pub cost_by_date: BTreeMap<NaiveDate, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TransportCost {
    pub total_units_shipped: f64,
    pub total_cost: f64,
    pub cost_by_route: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct StorageCost {
    pub pallet_cost: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WasteCost {
    pub unmet_demand_units: f64,
    pub unmet_demand_cost: f64,
    pub expired_units: f64,
    pub expired_cost: f64,
    pub end_inventory_units: f64,
    pub end_inventory_cost: f64,
    pub total_cost: f64,
}

/// Full cost-to-serve decomposition.
#[derive(Debug, Clone, Default)]
pub struct CostBreakdown {
    pub labor: LaborCost,
    pub production: ProductionCost,
    pub transport: TransportCost,
    pub storage: StorageCost,
    pub changeover_cost: f64,
    pub waste: WasteCost,
    pub total_cost: f64,
    pub cost_per_unit_delivered: f64,
}

/// Decompose a solved plan's cost. Fixed-day hours are charged whether or not
/// anything ran; the remainder follows the realized decision variables.
pub fn decompose_costs(
    problem: &PlanProblem,
    labor_days: &[LaborDay],
    solution: &PlanSolution,
) -> CostBreakdown {
    let costs = &problem.costs;
    let network = &problem.network;
    let mut breakdown = CostBreakdown::default();

    // Labor: sunk fixed hours plus realized overtime and non-fixed hours.
    for labor in labor_days {
        let mut day_cost = 0.0;
        if labor.is_fixed_day {
            breakdown.labor.fixed_hours += labor.fixed_hours;
            let fixed = labor.fixed_hours * labor.regular_rate;
            breakdown.labor.fixed_hours_cost += fixed;
            day_cost += fixed;
            let overtime = solution
                .overtime_hours_by_date
                .get(&labor.date)
                .copied()
                .unwrap_or(0.0);
            breakdown.labor.overtime_hours += overtime;
            let overtime_cost = overtime * labor.overtime_rate;
            breakdown.labor.overtime_cost += overtime_cost;
            day_cost += overtime_cost;
        } else {
            let paid = solution
                .non_fixed_hours_by_date
                .get(&labor.date)
                .copied()
                .unwrap_or(0.0);
            breakdown.labor.non_fixed_hours += paid;
            let cost = paid * labor.non_fixed_rate_or_overtime();
            breakdown.labor.non_fixed_cost += cost;
            day_cost += cost;
        }
        if day_cost > 0.0 {
            breakdown.labor.cost_by_date.insert(labor.date, day_cost);
        }
    }
    breakdown.labor.total_cost = breakdown.labor.fixed_hours_cost
        + breakdown.labor.overtime_cost
        + breakdown.labor.non_fixed_cost;

    // Production.
    for (&(date, ref product), &qty) in &solution.production_by_date_product {
        let cost = qty * costs.production_cost_per_unit;
        breakdown.production.total_units += qty;
        breakdown.production.total_cost += cost;
        *breakdown
            .production
            .cost_by_product
            .entry(product.clone())
            .or_insert(0.0) += cost;
        *breakdown.production.cost_by_date.entry(date).or_insert(0.0) += cost;
    }
    if breakdown.production.total_units > 0.0 {
        breakdown.production.average_cost_per_unit =
            breakdown.production.total_cost / breakdown.production.total_units;
    }

    // Transport: per-leg route rates (with the mode default as fallback) plus
    // per-unit truck charges.
    for shipment in &solution.shipments {
        let rate = network
            .routes()
            .iter()
            .find(|r| r.code == shipment.route_code)
            .map(|route| {
                if route.cost_per_unit > 0.0 {
                    route.cost_per_unit
                } else {
                    match route.transport_mode {
                        coldchain_core::TransportMode::Frozen => {
                            costs.transport_cost_frozen_per_unit
                        }
                        coldchain_core::TransportMode::Ambient => {
                            costs.transport_cost_ambient_per_unit
                        }
                    }
                }
            })
            .unwrap_or(0.0);
        let cost = shipment.quantity * rate;
        breakdown.transport.total_units_shipped += shipment.quantity;
        breakdown.transport.total_cost += cost;
        *breakdown
            .transport
            .cost_by_route
            .entry(shipment.route_code.clone())
            .or_insert(0.0) += cost;
    }
    for (&(ref truck_code, _, _, _), &qty) in &solution.truck_loads {
        if let Some(truck) = network.trucks().iter().find(|t| &t.code == truck_code) {
            if truck.cost_per_unit > 0.0 {
                breakdown.transport.total_cost += qty * truck.cost_per_unit;
            }
        }
    }

    // Storage: pallet-based where the state's pallet cost is active, legacy
    // unit-day otherwise. Partial pallets occupy whole slots.
    let pallet_units = costs.units_per_pallet_storage as f64;
    for (key, &qty) in &solution.cohort_inventory {
        if costs.pallet_costing_active(key.state) {
            let pallets = (qty / pallet_units).ceil();
            breakdown.storage.pallet_cost += pallets * costs.pallet_cost_per_day(key.state);
        } else {
            breakdown.storage.unit_cost += qty * costs.unit_storage_cost_per_day(key.state);
        }
    }
    breakdown.storage.total_cost = breakdown.storage.pallet_cost + breakdown.storage.unit_cost;

    breakdown.changeover_cost =
        solution.production_starts.len() as f64 * costs.changeover_cost_per_start;

    // Waste: shortage penalty, spoilage, and end-of-horizon leftovers.
    let waste_rate = costs.production_cost_per_unit * costs.waste_cost_multiplier;
    breakdown.waste.unmet_demand_units = solution.total_shortage;
    breakdown.waste.unmet_demand_cost =
        solution.total_shortage * costs.shortage_penalty_per_unit;
    breakdown.waste.expired_units = solution.expired_units;
    breakdown.waste.expired_cost = solution.expired_units * waste_rate;
    breakdown.waste.end_inventory_units = solution.end_horizon_inventory;
    breakdown.waste.end_inventory_cost = solution.end_horizon_inventory * waste_rate;
    breakdown.waste.total_cost = breakdown.waste.unmet_demand_cost
        + breakdown.waste.expired_cost
        + breakdown.waste.end_inventory_cost;

    breakdown.total_cost = breakdown.labor.total_cost
        + breakdown.production.total_cost
        + breakdown.transport.total_cost
        + breakdown.storage.total_cost
        + breakdown.changeover_cost
        + breakdown.waste.total_cost;

    let delivered: f64 = solution.demand_consumed.values().sum();
    if delivered > 0.0 {
        breakdown.cost_per_unit_delivered = breakdown.total_cost / delivered;
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coldchain_core::{
        CostStructure, Forecast, LaborCalendar, Network, NodeCapabilities, ProductSpec,
        TransportMode,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (PlanProblem, Vec<LaborDay>) {
        let start = date(2025, 10, 13);
        let mut network = Network::new();
        network.add_node(
            "M",
            "Plant",
            NodeCapabilities {
                can_manufacture: true,
                production_rate_per_hour: 1400.0,
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
            ..ProductSpec::default()
        });
        let labor_days = vec![
            LaborDay {
                date: start,
                is_fixed_day: true,
                fixed_hours: 12.0,
                regular_rate: 25.0,
                overtime_rate: 37.5,
                non_fixed_rate: Some(40.0),
                minimum_hours: 0.0,
                max_hours: 14.0,
            },
            LaborDay {
                date: start + Duration::days(1),
                is_fixed_day: false,
                fixed_hours: 0.0,
                regular_rate: 25.0,
                overtime_rate: 37.5,
                non_fixed_rate: Some(40.0),
                minimum_hours: 4.0,
                max_hours: 14.0,
            },
        ];
        let problem = PlanProblem::new(
            network,
            Forecast::default(),
            LaborCalendar::new(labor_days.clone()),
            CostStructure {
                production_cost_per_unit: 0.8,
                shortage_penalty_per_unit: 100.0,
                waste_cost_multiplier: 1.5,
                changeover_cost_per_start: 500.0,
                ..CostStructure::default()
            },
            start,
            start + Duration::days(1),
        );
        (problem, labor_days)
    }

    #[test]
    fn test_fixed_labor_charged_with_zero_production() {
        let (problem, labor_days) = fixture();
        let solution = PlanSolution::default();
        let breakdown = decompose_costs(&problem, &labor_days, &solution);

        // The fixed weekday is sunk at 12h × $25 even though nothing ran;
        // the idle non-fixed day costs nothing.
        assert_eq!(breakdown.labor.fixed_hours_cost, 300.0);
        assert_eq!(breakdown.labor.non_fixed_cost, 0.0);
        assert_eq!(breakdown.labor.total_cost, 300.0);
        assert_eq!(breakdown.total_cost, 300.0);
    }

    #[test]
    fn test_component_sums() {
        let (problem, labor_days) = fixture();
        let start = date(2025, 10, 13);
        let mut solution = PlanSolution::default();
        solution
            .production_by_date_product
            .insert((start, "P1".into()), 500.0);
        solution.shipments.push(crate::planner::ShipmentRecord {
            route_code: "R1".into(),
            origin: "M".into(),
            destination: "D".into(),
            product: "P1".into(),
            produced: start,
            departs: start,
            delivers: start + Duration::days(1),
            delivered_state: ProductState::Ambient,
            quantity: 500.0,
        });
        solution
            .demand_consumed
            .insert(("D".into(), "P1".into(), start + Duration::days(1)), 500.0);
        solution.total_shortage = 10.0;
        solution.expired_units = 20.0;
        solution.end_horizon_inventory = 30.0;
        solution.production_starts.push(("P1".into(), start));

        let breakdown = decompose_costs(&problem, &labor_days, &solution);

        assert_eq!(breakdown.production.total_cost, 400.0); // 500 × 0.8
        assert_eq!(breakdown.transport.total_cost, 150.0); // 500 × 0.3
        assert_eq!(breakdown.changeover_cost, 500.0);
        assert_eq!(breakdown.waste.unmet_demand_cost, 1000.0); // 10 × 100
        assert!((breakdown.waste.expired_cost - 24.0).abs() < 1e-9); // 20 × 0.8 × 1.5
        assert!((breakdown.waste.end_inventory_cost - 36.0).abs() < 1e-9);
        let expected_total = 300.0 + 400.0 + 150.0 + 500.0 + 1000.0 + 24.0 + 36.0;
        assert!((breakdown.total_cost - expected_total).abs() < 1e-9);
        assert!((breakdown.cost_per_unit_delivered - expected_total / 500.0).abs() < 1e-9);
    }
}
