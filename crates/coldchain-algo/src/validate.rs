//! Pre-flight validation
//!
//! Checks a planning problem for completeness, consistency, capacity,
//! transport, shelf-life, date-coverage, data-quality, and business-rule
//! problems before any model is built. Issues come back as a
//! [`ValidationReport`]; critical issues block planning, errors are advisory.
//!
//! Checks run in a fixed order and never mutate the problem, so validating
//! twice yields identical reports.

use crate::routing::RouteEnumerator;
use coldchain_core::{Issue, Network, NodeId, ProductState, Severity, ValidationReport};
use std::collections::BTreeSet;

use crate::planner::problem::PlanProblem;

/// Hours per day covered by regular (fixed) labor.
const MAX_REGULAR_HOURS: f64 = 12.0;
/// Hard daily cap including overtime.
const MAX_DAILY_HOURS: f64 = 14.0;
/// Minimum shipping quantity granularity.
const UNITS_PER_CASE: f64 = 10.0;

/// Run every check against the problem.
pub fn validate(problem: &PlanProblem) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_completeness(problem, &mut report);
    check_consistency(problem, &mut report);
    check_production_capacity(problem, &mut report);
    check_transport_capacity(problem, &mut report);
    check_shelf_life(problem, &mut report);
    check_date_ranges(problem, &mut report);
    check_data_quality(problem, &mut report);
    check_business_rules(problem, &mut report);
    report
}

fn check_completeness(problem: &PlanProblem, report: &mut ValidationReport) {
    if problem.forecast.entries.is_empty() {
        report.add(
            Issue::new("MISSING_001", "Completeness", Severity::Critical, "No demand forecast")
                .with_impact("There is nothing to plan against.")
                .with_fix("Load a forecast covering the planning horizon."),
        );
    }
    if problem.network.nodes().is_empty() {
        report.add(
            Issue::new("MISSING_002", "Completeness", Severity::Critical, "No network nodes")
                .with_fix("Load the location list."),
        );
    }
    if problem.network.routes().is_empty() {
        report.add(
            Issue::new("MISSING_003", "Completeness", Severity::Critical, "No routes")
                .with_impact("No product can leave the manufacturing site.")
                .with_fix("Load the route list."),
        );
    }
    if problem.labor.is_empty() {
        report.add(
            Issue::new("MISSING_004", "Completeness", Severity::Critical, "Labor calendar is empty")
                .with_impact("Production hours cannot be costed or bounded.")
                .with_fix("Load the labor calendar."),
        );
    }
    if problem.network.products().is_empty() {
        report.add(
            Issue::new("MISSING_005", "Completeness", Severity::Critical, "No products defined")
                .with_fix("Load the product map with shelf-life values."),
        );
    }
    let sites = problem.network.manufacturing_nodes();
    if sites.is_empty() {
        report.add(
            Issue::new(
                "MISSING_006",
                "Completeness",
                Severity::Critical,
                "No manufacturing node",
            )
            .with_fix("Mark exactly one node with can_manufacture."),
        );
    } else if sites.len() > 1 {
        report.add(
            Issue::new(
                "MISSING_007",
                "Completeness",
                Severity::Critical,
                "Multiple manufacturing nodes",
            )
            .with_description(format!("Found {} manufacturing-capable nodes.", sites.len()))
            .with_impact("The planner optimizes a single site.")
            .with_affected(codes(&problem.network, &sites)),
        );
    }
}

fn check_consistency(problem: &PlanProblem, report: &mut ValidationReport) {
    let network = &problem.network;

    let mut unknown_locations = BTreeSet::new();
    let mut unknown_products = BTreeSet::new();
    for entry in &problem.forecast.entries {
        if network.node_id(&entry.location_code).is_none() {
            unknown_locations.insert(entry.location_code.clone());
        }
        if network.product_id(&entry.product_code).is_none() {
            unknown_products.insert(entry.product_code.clone());
        }
    }
    if !unknown_locations.is_empty() {
        report.add(
            Issue::new(
                "CON_001",
                "Consistency",
                Severity::Error,
                "Forecast references unknown locations",
            )
            .with_impact("Demand at these locations cannot be planned.")
            .with_fix("Add the locations to the network or fix the forecast codes.")
            .with_affected(unknown_locations.into_iter().collect()),
        );
    }
    if !unknown_products.is_empty() {
        report.add(
            Issue::new(
                "CON_002",
                "Consistency",
                Severity::Error,
                "Forecast references unknown products",
            )
            .with_fix("Add the products to the product map or fix the forecast codes.")
            .with_affected(unknown_products.into_iter().collect()),
        );
    }

    if let Some(inventory) = &problem.initial_inventory {
        let mut unknown = BTreeSet::new();
        for entry in &inventory.entries {
            if network.node_id(&entry.location_code).is_none() {
                unknown.insert(entry.location_code.clone());
            }
            if network.product_id(&entry.product_code).is_none() {
                unknown.insert(entry.product_code.clone());
            }
        }
        if !unknown.is_empty() {
            report.add(
                Issue::new(
                    "CON_003",
                    "Consistency",
                    Severity::Error,
                    "Initial inventory references unknown codes",
                )
                .with_affected(unknown.into_iter().collect()),
            );
        }
    }

    // Trucks with intermediate stops need a route leg from their origin to
    // every stop and to the final destination.
    for truck in network.trucks() {
        let mut missing = Vec::new();
        for stop in truck.stops() {
            let has_leg = network
                .routes()
                .iter()
                .any(|r| r.origin == truck.origin && r.destination == stop);
            if !has_leg {
                missing.push(network.node(stop).code.clone());
            }
        }
        if !missing.is_empty() {
            report.add(
                Issue::new(
                    "TRK_001",
                    "Consistency",
                    Severity::Error,
                    "Truck schedule without matching routes",
                )
                .with_description(format!(
                    "Truck {} serves stops with no route leg from {}.",
                    truck.code,
                    network.node(truck.origin).code
                ))
                .with_impact("Loads assigned to this truck cannot flow in the model.")
                .with_fix("Add the missing route legs or remove the stops.")
                .with_affected(missing),
            );
        }
        if !network.node(truck.origin).requires_trucks() {
            report.add(
                Issue::new(
                    "TRK_002",
                    "Consistency",
                    Severity::Info,
                    "Truck departs a node without truck scheduling",
                )
                .with_description(format!(
                    "Truck {} departs {}, which does not require truck schedules; departures there are unconstrained.",
                    truck.code,
                    network.node(truck.origin).code
                )),
            );
        }
    }
}

fn check_production_capacity(problem: &PlanProblem, report: &mut ValidationReport) {
    let Some(mfg) = problem.network.manufacturing_node() else {
        return;
    };
    let rate = problem.network.node(mfg).capabilities.production_rate_per_hour;
    if rate <= 0.0 {
        report.add(
            Issue::new(
                "CAP_000",
                "Capacity",
                Severity::Critical,
                "Non-positive production rate",
            )
            .with_fix("Set production_rate_per_hour on the manufacturing node."),
        );
        return;
    }
    if problem.labor.is_empty() {
        return;
    }

    let total_demand = horizon_demand(problem);
    if total_demand <= 0.0 {
        return;
    }

    let mut working_days = 0usize;
    let mut total_days = 0usize;
    let mut daily_demand: std::collections::BTreeMap<chrono::NaiveDate, f64> = Default::default();
    for date in problem.dates() {
        total_days += 1;
        if let Ok(day) = problem.labor.resolve(date, false) {
            if day.is_fixed_day && day.fixed_hours > 0.0 {
                working_days += 1;
            }
        }
    }
    for entry in &problem.forecast.entries {
        if entry.date >= problem.start_date && entry.date <= problem.end_date {
            *daily_demand.entry(entry.date).or_insert(0.0) += entry.quantity;
        }
    }

    let daily_regular = MAX_REGULAR_HOURS * rate;
    let daily_max = MAX_DAILY_HOURS * rate;
    let regular_capacity = working_days as f64 * daily_regular;
    let weekday_max = working_days as f64 * daily_max;
    let weekend_days = total_days.saturating_sub(working_days);
    let absolute_max = weekday_max + weekend_days as f64 * daily_max;

    if total_demand > absolute_max {
        report.add(
            Issue::new(
                "CAP_001",
                "Capacity",
                Severity::Critical,
                "Demand exceeds absolute maximum production capacity",
            )
            .with_description(format!(
                "Total demand {:.0} units vs {:.0} units with all overtime and weekends; shortfall {:.0}.",
                total_demand,
                absolute_max,
                total_demand - absolute_max
            ))
            .with_impact("Planning is mathematically infeasible as stated.")
            .with_fix("Reduce demand, extend the horizon, or raise the production rate."),
        );
    } else if total_demand > weekday_max {
        report.add(
            Issue::new(
                "CAP_002",
                "Capacity",
                Severity::Error,
                "Demand requires weekend production",
            )
            .with_description(format!(
                "Total demand {:.0} units vs weekday capacity {:.0} (with overtime).",
                total_demand, weekday_max
            ))
            .with_impact("Weekend minimum-payment premiums will apply."),
        );
    } else if total_demand > regular_capacity {
        report.add(
            Issue::new(
                "CAP_003",
                "Capacity",
                Severity::Warning,
                "Demand requires overtime production",
            )
            .with_description(format!(
                "Total demand {:.0} units vs regular capacity {:.0}; overtime hours ≈ {:.1}.",
                total_demand,
                regular_capacity,
                (total_demand - regular_capacity) / rate
            )),
        );
    } else {
        report.add(
            Issue::new(
                "CAP_004",
                "Capacity",
                Severity::Info,
                "Production capacity is sufficient",
            )
            .with_description(format!(
                "Utilization {:.1}% of regular capacity.",
                100.0 * total_demand / regular_capacity
            )),
        );
    }

    let peak_days: Vec<String> = daily_demand
        .iter()
        .filter(|(_, &qty)| qty > daily_max)
        .map(|(date, _)| date.to_string())
        .collect();
    if !peak_days.is_empty() {
        report.add(
            Issue::new(
                "CAP_005",
                "Capacity",
                Severity::Error,
                "Daily demand exceeds maximum daily capacity",
            )
            .with_description(format!(
                "{} day(s) demand more than {:.0} units.",
                peak_days.len(),
                daily_max
            ))
            .with_impact("Those days need pre-built inventory, which shelf life must allow.")
            .with_fix("Pre-build on earlier days or smooth the forecast.")
            .with_affected(peak_days),
        );
    }
}

fn check_transport_capacity(problem: &PlanProblem, report: &mut ValidationReport) {
    let Some(mfg) = problem.network.manufacturing_node() else {
        return;
    };
    if !problem.network.node(mfg).requires_trucks() {
        return;
    }
    let total_demand = horizon_demand(problem);
    if total_demand <= 0.0 {
        return;
    }

    let trucks = problem.network.trucks_from(mfg);
    if trucks.is_empty() {
        report.add(
            Issue::new(
                "TRANS_001",
                "Transport",
                Severity::Error,
                "No truck schedules from the manufacturing site",
            )
            .with_impact("The site requires scheduled trucks; nothing can depart.")
            .with_fix("Load truck schedules or clear requires_truck_schedules."),
        );
        return;
    }

    let weekly_capacity: f64 = trucks
        .iter()
        .map(|t| t.capacity * if t.is_day_specific() { 1.0 } else { 7.0 })
        .sum();
    let weeks = (problem.horizon_days() as f64 / 7.0).max(1.0 / 7.0);
    let weekly_demand = total_demand / weeks;

    if weekly_demand > weekly_capacity {
        report.add(
            Issue::new(
                "TRANS_002",
                "Transport",
                Severity::Error,
                "Demand exceeds weekly truck capacity",
            )
            .with_description(format!(
                "Average weekly demand {:.0} units vs {:.0} units of scheduled truck capacity.",
                weekly_demand, weekly_capacity
            ))
            .with_impact("Shipments will be left behind; expect shortages.")
            .with_fix("Add departures or spread demand across the horizon."),
        );
    } else if weekly_demand > 0.8 * weekly_capacity {
        report.add(
            Issue::new(
                "TRANS_003",
                "Transport",
                Severity::Warning,
                "Truck capacity utilization is high",
            )
            .with_description(format!(
                "Average weekly demand {:.0} units is above 80% of the {:.0}-unit weekly truck capacity.",
                weekly_demand, weekly_capacity
            )),
        );
    }
}

fn check_shelf_life(problem: &PlanProblem, report: &mut ValidationReport) {
    let Some(mfg) = problem.network.manufacturing_node() else {
        return;
    };
    if !problem.config.enforce_shelf_life {
        return;
    }
    let network = &problem.network;
    let enumerator =
        RouteEnumerator::new(network, mfg, problem.config.max_routes_per_destination);

    let mut demand_pairs: BTreeSet<(NodeId, String)> = BTreeSet::new();
    for entry in &problem.forecast.entries {
        if let (Some(node), Some(_)) = (
            network.node_id(&entry.location_code),
            network.product_id(&entry.product_code),
        ) {
            demand_pairs.insert((node, entry.product_code.clone()));
        }
    }

    for (node, product_code) in demand_pairs {
        let Some(product_id) = network.product_id(&product_code) else {
            continue;
        };
        let product = network.product(product_id);
        let paths = enumerator.enumerate_to(node);
        if paths.is_empty() {
            continue; // reported by the business-rules check
        }

        // Best remaining shelf life at delivery over all enumerated paths.
        let mut best_remaining: Option<i64> = None;
        for path in &paths {
            let mut state = ProductState::Ambient;
            let mut clock = 0i64;
            for &leg in &path.legs {
                let route = network.route(leg);
                let origin = network.node(route.origin);
                let destination = network.node(route.destination);
                let delivered = route.transport_mode.delivered_state(origin, destination);
                clock += route.transit_ceil_days();
                if delivered != state {
                    // Clock restarts whenever the state changes.
                    clock = 0;
                    state = delivered;
                }
            }
            if !state.is_consumable() {
                continue;
            }
            let remaining = product.shelf_life(state) - clock;
            best_remaining = Some(best_remaining.map_or(remaining, |b: i64| b.max(remaining)));
        }

        if let Some(remaining) = best_remaining {
            if remaining < product.min_acceptable_shelf_life_days {
                report.add(
                    Issue::new(
                        "SL_001",
                        "Shelf Life",
                        Severity::Error,
                        "Transit leaves less than the acceptable shelf life",
                    )
                    .with_description(format!(
                        "Best route to {} delivers {} with {} day(s) remaining; customers require {}.",
                        network.node(node).code,
                        product.code,
                        remaining,
                        product.min_acceptable_shelf_life_days
                    ))
                    .with_impact("Demand at this destination will show as shortage.")
                    .with_fix("Add a frozen route with thaw-on-arrival, or shorten transit.")
                    .with_affected(vec![network.node(node).code.clone(), product.code.clone()]),
                );
            }
        }
    }
}

fn check_date_ranges(problem: &PlanProblem, report: &mut ValidationReport) {
    if problem.labor.is_empty() {
        return;
    }
    let forecast_end = problem.forecast.date_range().map(|(_, end)| end);

    let mut missing_critical = Vec::new();
    let mut missing_minor = Vec::new();
    for date in problem.dates() {
        if problem.labor.get(date).is_some() {
            continue;
        }
        let is_weekday = chrono::Datelike::weekday(&date).num_days_from_monday() < 5;
        let within_forecast = forecast_end.map_or(false, |end| date <= end);
        if is_weekday && within_forecast {
            missing_critical.push(date.to_string());
        } else {
            missing_minor.push(date.to_string());
        }
    }
    if !missing_critical.is_empty() {
        report.add(
            Issue::new(
                "DATE_001",
                "Date Range",
                Severity::Error,
                "Labor calendar missing critical weekdays",
            )
            .with_description(format!(
                "{} weekday(s) inside the forecast window have no labor terms.",
                missing_critical.len()
            ))
            .with_impact("Standard weekday defaults will be assumed for those dates.")
            .with_fix("Extend the labor calendar to cover the horizon.")
            .with_affected(missing_critical),
        );
    }
    if !missing_minor.is_empty() {
        report.add(
            Issue::new(
                "DATE_002",
                "Date Range",
                Severity::Warning,
                "Labor calendar has non-critical gaps",
            )
            .with_description(format!(
                "{} date(s) (weekends or beyond the forecast) fall back to defaults.",
                missing_minor.len()
            ))
            .with_affected(missing_minor),
        );
    }

    let outside: usize = problem
        .forecast
        .entries
        .iter()
        .filter(|e| e.date < problem.start_date || e.date > problem.end_date)
        .count();
    if outside > 0 {
        report.add(
            Issue::new(
                "DATE_003",
                "Date Range",
                Severity::Warning,
                "Forecast entries outside the planning horizon",
            )
            .with_description(format!("{outside} entry(ies) will be ignored.")),
        );
    }
}

fn check_data_quality(problem: &PlanProblem, report: &mut ValidationReport) {
    let quantities: Vec<f64> = problem
        .forecast
        .entries
        .iter()
        .map(|e| e.quantity)
        .collect();
    if quantities.is_empty() {
        return;
    }

    let non_positive = quantities.iter().filter(|&&q| q <= 0.0).count();
    if non_positive > 0 {
        report.add(
            Issue::new(
                "DQ_001",
                "Data Quality",
                Severity::Warning,
                "Zero or negative forecast quantities",
            )
            .with_description(format!("{non_positive} entry(ies); they are ignored.")),
        );
    }

    let n = quantities.len() as f64;
    let mean = quantities.iter().sum::<f64>() / n;
    let variance = quantities.iter().map(|q| (q - mean).powi(2)).sum::<f64>() / n;
    let sigma = variance.sqrt();
    if sigma > 0.0 {
        let outliers = quantities
            .iter()
            .filter(|&&q| (q - mean).abs() > 3.0 * sigma)
            .count();
        if outliers > 0 {
            report.add(
                Issue::new(
                    "DQ_002",
                    "Data Quality",
                    Severity::Warning,
                    "Forecast outliers beyond 3 sigma",
                )
                .with_description(format!(
                    "{} entry(ies) deviate more than 3σ from the mean of {:.0}.",
                    outliers, mean
                ))
                .with_fix("Check for data-entry errors or one-off promotional spikes."),
            );
        }
    }

    let off_case = quantities
        .iter()
        .filter(|&&q| q > 0.0 && (q % UNITS_PER_CASE).abs() > 1e-9)
        .count();
    if off_case > 0 {
        report.add(
            Issue::new(
                "DQ_003",
                "Data Quality",
                Severity::Info,
                "Forecast quantities are not whole cases",
            )
            .with_description(format!(
                "{} entry(ies) are not multiples of {} units.",
                off_case, UNITS_PER_CASE
            )),
        );
    }
}

fn check_business_rules(problem: &PlanProblem, report: &mut ValidationReport) {
    let network = &problem.network;
    let orphans = coldchain_core::unreachable_demand_nodes(network);
    if !orphans.is_empty() {
        report.add(
            Issue::new(
                "BIZ_001",
                "Business Rules",
                Severity::Error,
                "Demand nodes unreachable from manufacturing",
            )
            .with_impact("Their demand will appear as shortage in the plan.")
            .with_fix("Add routes connecting these destinations.")
            .with_affected(codes(network, &orphans)),
        );
    }

    let mut unflagged = BTreeSet::new();
    for entry in &problem.forecast.entries {
        if let Some(node) = network.node_id(&entry.location_code) {
            if !network.node(node).capabilities.has_demand {
                unflagged.insert(entry.location_code.clone());
            }
        }
    }
    if !unflagged.is_empty() {
        report.add(
            Issue::new(
                "BIZ_002",
                "Business Rules",
                Severity::Info,
                "Forecast demand at nodes not flagged has_demand",
            )
            .with_affected(unflagged.into_iter().collect()),
        );
    }

    // Frozen-only legs into ambient-only nodes thaw on arrival; products with
    // a thawed life below acceptance can never be sold there.
    for product in network.products() {
        if product.thawed_shelf_life_days < product.min_acceptable_shelf_life_days {
            report.add(
                Issue::new(
                    "BIZ_003",
                    "Business Rules",
                    Severity::Warning,
                    "Thawed shelf life below customer acceptance",
                )
                .with_description(format!(
                    "Product {}: thawed life {}d < minimum acceptance {}d.",
                    product.code,
                    product.thawed_shelf_life_days,
                    product.min_acceptable_shelf_life_days
                ))
                .with_impact("Frozen routes with thaw-on-arrival cannot serve this product."),
            );
        }
    }
}

fn horizon_demand(problem: &PlanProblem) -> f64 {
    problem
        .forecast
        .entries
        .iter()
        .filter(|e| e.date >= problem.start_date && e.date <= problem.end_date && e.quantity > 0.0)
        .map(|e| e.quantity)
        .sum()
}

fn codes(network: &Network, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|&id| network.node(id).code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use coldchain_core::{
        CostStructure, Forecast, ForecastEntry, LaborCalendar, LaborDay, NodeCapabilities,
        ProductSpec, TransportMode,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_week_labor(start: NaiveDate, days: i64) -> LaborCalendar {
        LaborCalendar::new(
            (0..days)
                .map(|i| {
                    let d = start + Duration::days(i);
                    let weekend =
                        chrono::Datelike::weekday(&d).num_days_from_monday() >= 5;
                    LaborDay {
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
                .collect(),
        )
    }

    fn valid_problem() -> PlanProblem {
        let start = date(2025, 10, 13);
        let mut network = Network::new();
        network.add_node(
            "6122",
            "Manufacturing",
            NodeCapabilities {
                can_manufacture: true,
                production_rate_per_hour: 1400.0,
                ..NodeCapabilities::default()
            },
        );
        network.add_node(
            "6104",
            "Hub",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network
            .add_route("R1", "6122", "6104", 1.0, TransportMode::Ambient, 0.3)
            .unwrap();
        network.add_product(ProductSpec {
            code: "P1".into(),
            ..ProductSpec::default()
        });
        let forecast = Forecast {
            name: "t".into(),
            entries: vec![ForecastEntry {
                location_code: "6104".into(),
                product_code: "P1".into(),
                date: start + Duration::days(2),
                quantity: 500.0,
                confidence: None,
            }],
        };
        PlanProblem::new(
            network,
            forecast,
            full_week_labor(start, 7),
            CostStructure::default(),
            start,
            start + Duration::days(6),
        )
    }

    #[test]
    fn test_valid_problem_is_feasible() {
        let report = validate(&valid_problem());
        assert!(report.is_planning_feasible(), "{report}");
        assert!(!report.has_critical_issues());
        // Capacity headroom shows up as info.
        assert!(report.issues.iter().any(|i| i.id == "CAP_004"));
    }

    #[test]
    fn test_missing_forecast_is_critical() {
        let mut problem = valid_problem();
        problem.forecast.entries.clear();
        let report = validate(&problem);
        assert!(report.has_critical_issues());
        assert!(report.issues.iter().any(|i| i.id == "MISSING_001"));
    }

    #[test]
    fn test_unknown_forecast_codes_are_errors() {
        let mut problem = valid_problem();
        problem.forecast.entries.push(ForecastEntry {
            location_code: "9999".into(),
            product_code: "GHOST".into(),
            date: date(2025, 10, 15),
            quantity: 100.0,
            confidence: None,
        });
        let report = validate(&problem);
        assert!(report.issues.iter().any(|i| i.id == "CON_001"));
        assert!(report.issues.iter().any(|i| i.id == "CON_002"));
        // Advisory, not blocking.
        assert!(report.is_planning_feasible());
    }

    #[test]
    fn test_demand_beyond_absolute_capacity_is_critical() {
        let mut problem = valid_problem();
        // 7 days × 14h × 1400 u/h = 137,200 absolute max.
        problem.forecast.entries[0].quantity = 200_000.0;
        let report = validate(&problem);
        assert!(report.issues.iter().any(|i| i.id == "CAP_001"));
        assert!(!report.is_planning_feasible());
    }

    #[test]
    fn test_overtime_band_is_warning() {
        let mut problem = valid_problem();
        // Above 5×12h×1400 = 84,000 regular, below 5×14h×1400 = 98,000.
        problem.forecast.entries[0].quantity = 90_000.0;
        let report = validate(&problem);
        assert!(report.issues.iter().any(|i| i.id == "CAP_003"));
        assert!(report.is_planning_feasible());
    }

    #[test]
    fn test_unreachable_demand_node() {
        let mut problem = valid_problem();
        problem.network.add_node(
            "6130",
            "Perth",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        problem.forecast.entries.push(ForecastEntry {
            location_code: "6130".into(),
            product_code: "P1".into(),
            date: date(2025, 10, 16),
            quantity: 100.0,
            confidence: None,
        });
        let report = validate(&problem);
        let issue = report.issues.iter().find(|i| i.id == "BIZ_001").unwrap();
        assert!(issue.affected.contains(&"6130".to_string()));
        // Shortage-bearing, not blocking.
        assert!(report.is_planning_feasible());
    }

    #[test]
    fn test_shelf_life_infeasible_route() {
        let mut problem = valid_problem();
        // 12-day ambient transit on a 17-day shelf life leaves 5 < 7.
        problem.network.add_node(
            "6130",
            "Perth",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        problem
            .network
            .add_route("R9", "6122", "6130", 12.0, TransportMode::Ambient, 1.2)
            .unwrap();
        problem.forecast.entries.push(ForecastEntry {
            location_code: "6130".into(),
            product_code: "P1".into(),
            date: date(2025, 10, 18),
            quantity: 100.0,
            confidence: None,
        });
        let report = validate(&problem);
        assert!(report.issues.iter().any(|i| i.id == "SL_001"));
    }

    #[test]
    fn test_labor_gap_classification() {
        let mut problem = valid_problem();
        // Calendar only covers the first three days of the week.
        problem.labor = full_week_labor(date(2025, 10, 13), 3);
        let report = validate(&problem);
        // Thursday/Friday are critical weekdays inside the forecast window?
        // Forecast ends Wednesday, so the gap days are non-critical warnings.
        assert!(report.issues.iter().any(|i| i.id == "DATE_002"));
    }

    #[test]
    fn test_validator_is_idempotent() {
        let problem = valid_problem();
        let a = validate(&problem);
        let b = validate(&problem);
        assert_eq!(a.issues.len(), b.issues.len());
        for (x, y) in a.issues.iter().zip(b.issues.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.severity, y.severity);
            assert_eq!(x.affected, y.affected);
        }
    }

    #[test]
    fn test_case_quantity_info() {
        let mut problem = valid_problem();
        problem.forecast.entries[0].quantity = 505.0;
        let report = validate(&problem);
        assert!(report.issues.iter().any(|i| i.id == "DQ_003"));
    }
}
