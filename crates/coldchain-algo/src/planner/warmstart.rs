//! Campaign warmstart hints
//!
//! Generates a SKU-day selection hint for the `product_produced` binaries:
//! cycle the SKU set across weekdays so each SKU is produced on a fixed
//! subset of weekdays of the horizon. Warmstart is a pure function of the
//! problem; hints referencing unknown variables are silently skipped at
//! application time.

use crate::planner::model::PlanModel;
use crate::planner::problem::PlanProblem;
use chrono::{Datelike, NaiveDate};
use coldchain_core::{Network, PlanResult};
use good_lp::Variable;
use std::collections::BTreeMap;

/// Hint map keyed by (manufacturing node code, product code, date).
pub type WarmstartHints = BTreeMap<(String, String, NaiveDate), bool>;

/// Weekly campaign: SKU `i` runs on fixed weekdays (weekday index ≡ i modulo
/// the SKU count); weekends and non-fixed days stay off.
pub fn generate_campaign_hints(problem: &PlanProblem) -> PlanResult<WarmstartHints> {
    let mfg = problem.manufacturing()?;
    let mfg_code = problem.network.node(mfg).code.clone();
    let products = problem.network.products();
    let mut hints = WarmstartHints::new();
    if products.is_empty() {
        return Ok(hints);
    }
    let cycle = products.len();

    for labor in problem.labor_days()? {
        let weekday = labor.date.weekday().num_days_from_monday() as usize;
        for (slot, product) in products.iter().enumerate() {
            let on = labor.is_fixed_day && weekday % cycle == slot % cycle;
            hints.insert((mfg_code.clone(), product.code.clone(), labor.date), on);
        }
    }
    Ok(hints)
}

/// Resolve hints against the built model's `product_produced` variables.
/// Hints that reference unknown nodes, products, dates — or a model where
/// binary SKU selection is inactive — are skipped silently.
pub fn resolve_hints(
    hints: &WarmstartHints,
    model: &PlanModel,
    network: &Network,
) -> Vec<(Variable, f64)> {
    let mfg_code = &network.node(model.mfg).code;
    let mut resolved = Vec::new();
    let mut skipped = 0usize;
    for ((node_code, product_code, date), &on) in hints {
        let var = (node_code == mfg_code)
            .then(|| network.product_id(product_code))
            .flatten()
            .and_then(|product| model.registry.product_produced.get(&(product, *date)));
        match var {
            Some(&var) => resolved.push((var, if on { 1.0 } else { 0.0 })),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, applied = resolved.len(), "warmstart hints resolved");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::model::build_model;
    use chrono::Duration;
    use coldchain_core::{
        CostStructure, Forecast, ForecastEntry, LaborCalendar, LaborDay, NodeCapabilities,
        ProductSpec, TransportMode,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn campaign_problem(n_products: usize) -> PlanProblem {
        let start = date(2025, 10, 13); // Monday
        let mut network = Network::new();
        network.add_node(
            "6122",
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
            .add_route("R1", "6122", "D", 1.0, TransportMode::Ambient, 0.1)
            .unwrap();
        let mut entries = Vec::new();
        for i in 0..n_products {
            let code = format!("P{}", i + 1);
            network.add_product(ProductSpec {
                code: code.clone(),
                ..ProductSpec::default()
            });
            entries.push(ForecastEntry {
                location_code: "D".into(),
                product_code: code,
                date: start + Duration::days(3),
                quantity: 100.0,
                confidence: None,
            });
        }
        let labor = LaborCalendar::new(
            (0..7)
                .map(|i| {
                    let weekend = i >= 5;
                    LaborDay {
                        date: start + Duration::days(i),
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
        );
        let mut problem = PlanProblem::new(
            network,
            Forecast {
                name: "t".into(),
                entries,
            },
            labor,
            CostStructure {
                changeover_cost_per_start: 500.0,
                ..CostStructure::default()
            },
            start,
            start + Duration::days(6),
        );
        problem.config.allow_shortages = true;
        problem
    }

    #[test]
    fn test_campaign_cycles_skus_across_weekdays() {
        let problem = campaign_problem(5);
        let hints = generate_campaign_hints(&problem).unwrap();
        // 5 products × 7 days.
        assert_eq!(hints.len(), 35);

        // Monday runs the first SKU only.
        let monday = date(2025, 10, 13);
        assert!(hints[&("6122".into(), "P1".into(), monday)]);
        assert!(!hints[&("6122".into(), "P2".into(), monday)]);

        // Each SKU gets exactly one weekday; weekends are off.
        for i in 1..=5 {
            let on_days = hints
                .iter()
                .filter(|((_, p, _), &on)| p == &format!("P{i}") && on)
                .count();
            assert_eq!(on_days, 1);
        }
    }

    #[test]
    fn test_resolve_skips_unknown_hints() {
        let problem = campaign_problem(2);
        let model = build_model(&problem).unwrap();
        let mut hints = generate_campaign_hints(&problem).unwrap();
        hints.insert(("6122".into(), "GHOST".into(), date(2025, 10, 13)), true);
        hints.insert(("9999".into(), "P1".into(), date(2025, 10, 13)), true);
        hints.insert(("6122".into(), "P1".into(), date(2030, 1, 1)), true);

        let resolved = resolve_hints(&hints, &model, &problem.network);
        // All valid (product, date) pairs resolve; the three bad hints drop.
        assert_eq!(resolved.len(), 14);
    }

    #[test]
    fn test_hints_without_sku_selection_all_skip() {
        let mut problem = campaign_problem(2);
        problem.costs.changeover_cost_per_start = 0.0;
        let hints = generate_campaign_hints(&problem).unwrap();
        let model = build_model(&problem).unwrap();
        assert!(model.registry.product_produced.is_empty());
        assert!(resolve_hints(&hints, &model, &problem.network).is_empty());
    }
}
