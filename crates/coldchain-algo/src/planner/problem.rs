//! Planning problem data structures
//!
//! Bundles the network, forecast, labor calendar, and cost structure with the
//! planning horizon and the engine configuration.

use crate::planner::warmstart::WarmstartHints;
use chrono::NaiveDate;
use coldchain_core::{
    CostStructure, Forecast, InitialInventory, LaborCalendar, LaborDay, Network, NodeId, PlanError,
    PlanResult, ProductId, ProductState,
};
use std::collections::BTreeMap;

/// Engine configuration toggles.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// 6-tuple cohort indexing with state-entry dates.
    pub use_batch_tracking: bool,
    /// Soft demand with a per-unit penalty instead of hard satisfaction.
    pub allow_shortages: bool,
    /// Exclude cohorts past their shelf life from the index.
    pub enforce_shelf_life: bool,
    /// Disable binary SKU-day selection even when changeover costs are set.
    pub force_all_skus_daily: bool,
    /// Cap on enumerated paths per demand destination.
    pub max_routes_per_destination: usize,
    pub use_warmstart: bool,
    /// Externally supplied hints; when absent and `use_warmstart` is set, a
    /// campaign heuristic generates them.
    pub warmstart_hints: Option<WarmstartHints>,
    /// Treat labor calendar gaps as errors instead of falling back to
    /// standard weekday defaults.
    pub strict_validation: bool,
    /// Optional bound on distinct SKUs produced per day; setting it counts
    /// as requesting binary SKU selection.
    pub max_products_per_day: Option<usize>,
    /// Constrain truck loads to whole cases.
    pub require_case_multiples: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            use_batch_tracking: true,
            allow_shortages: false,
            enforce_shelf_life: true,
            force_all_skus_daily: false,
            max_routes_per_destination: 5,
            use_warmstart: false,
            warmstart_hints: None,
            strict_validation: false,
            max_products_per_day: None,
            require_case_multiples: false,
        }
    }
}

/// A complete planning instance: what to build the model from.
#[derive(Debug, Clone)]
pub struct PlanProblem {
    pub network: Network,
    pub forecast: Forecast,
    pub labor: LaborCalendar,
    pub costs: CostStructure,
    pub initial_inventory: Option<InitialInventory>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub config: PlanConfig,
}

impl PlanProblem {
    pub fn new(
        network: Network,
        forecast: Forecast,
        labor: LaborCalendar,
        costs: CostStructure,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            network,
            forecast,
            labor,
            costs,
            initial_inventory: None,
            start_date,
            end_date,
            config: PlanConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_initial_inventory(mut self, inventory: InitialInventory) -> Self {
        self.initial_inventory = Some(inventory);
        self
    }

    pub fn horizon_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        crate::cohorts::date_range(self.start_date, self.end_date).collect()
    }

    /// The single manufacturing site the model plans production at.
    pub fn manufacturing(&self) -> PlanResult<NodeId> {
        let sites = self.network.manufacturing_nodes();
        match sites.as_slice() {
            [site] => Ok(*site),
            [] => Err(PlanError::Validation(
                "no manufacturing node in network".into(),
            )),
            many => Err(PlanError::Validation(format!(
                "expected one manufacturing node, found {}",
                many.len()
            ))),
        }
    }

    /// Demand inside the horizon, resolved to ids and merged per
    /// (node, product, date). Entries referencing unknown codes error; the
    /// validator reports them before this is reached.
    pub fn demand_map(&self) -> PlanResult<BTreeMap<(NodeId, ProductId, NaiveDate), f64>> {
        let mut map = BTreeMap::new();
        for entry in &self.forecast.entries {
            if entry.date < self.start_date || entry.date > self.end_date {
                continue;
            }
            if entry.quantity <= 0.0 {
                continue;
            }
            let node = self.network.node_id(&entry.location_code).ok_or_else(|| {
                PlanError::Network(format!(
                    "forecast references unknown location {:?}",
                    entry.location_code
                ))
            })?;
            let product = self.network.product_id(&entry.product_code).ok_or_else(|| {
                PlanError::Network(format!(
                    "forecast references unknown product {:?}",
                    entry.product_code
                ))
            })?;
            *map.entry((node, product, entry.date)).or_insert(0.0) += entry.quantity;
        }
        Ok(map)
    }

    /// Initial inventory resolved to ids.
    pub fn resolved_initial_inventory(
        &self,
    ) -> PlanResult<Vec<(NodeId, ProductId, ProductState, f64)>> {
        let Some(inventory) = &self.initial_inventory else {
            return Ok(Vec::new());
        };
        inventory
            .entries
            .iter()
            .map(|entry| {
                let node = self.network.node_id(&entry.location_code).ok_or_else(|| {
                    PlanError::Network(format!(
                        "initial inventory references unknown location {:?}",
                        entry.location_code
                    ))
                })?;
                let product = self.network.product_id(&entry.product_code).ok_or_else(|| {
                    PlanError::Network(format!(
                        "initial inventory references unknown product {:?}",
                        entry.product_code
                    ))
                })?;
                Ok((node, product, entry.state, entry.quantity))
            })
            .collect()
    }

    /// Labor terms per horizon date, with calendar gaps resolved through the
    /// weekday/weekend fallback (or rejected under strict validation).
    pub fn labor_days(&self) -> PlanResult<Vec<LaborDay>> {
        self.dates()
            .into_iter()
            .map(|date| self.labor.resolve(date, self.config.strict_validation))
            .collect()
    }

    /// Demand destinations appearing in the horizon.
    pub fn demand_nodes(&self) -> PlanResult<Vec<NodeId>> {
        let mut nodes: Vec<NodeId> = self
            .demand_map()?
            .keys()
            .map(|&(node, _, _)| node)
            .collect();
        nodes.sort();
        nodes.dedup();
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldchain_core::{ForecastEntry, NodeCapabilities, ProductSpec};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn problem() -> PlanProblem {
        let mut network = Network::new();
        network.add_node(
            "M",
            "Manufacturing",
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
        network.add_product(ProductSpec {
            code: "P1".into(),
            ..ProductSpec::default()
        });
        let forecast = Forecast {
            name: "test".into(),
            entries: vec![
                ForecastEntry {
                    location_code: "D".into(),
                    product_code: "P1".into(),
                    date: date(2025, 10, 14),
                    quantity: 300.0,
                    confidence: None,
                },
                ForecastEntry {
                    location_code: "D".into(),
                    product_code: "P1".into(),
                    date: date(2025, 10, 14),
                    quantity: 200.0,
                    confidence: None,
                },
                // Outside the horizon; dropped.
                ForecastEntry {
                    location_code: "D".into(),
                    product_code: "P1".into(),
                    date: date(2025, 11, 1),
                    quantity: 999.0,
                    confidence: None,
                },
            ],
        };
        PlanProblem::new(
            network,
            forecast,
            LaborCalendar::new(vec![]),
            CostStructure::default(),
            date(2025, 10, 13),
            date(2025, 10, 19),
        )
    }

    #[test]
    fn test_demand_map_merges_and_clips() {
        let problem = problem();
        let demand = problem.demand_map().unwrap();
        assert_eq!(demand.len(), 1);
        let qty = demand.values().next().unwrap();
        assert_eq!(*qty, 500.0);
    }

    #[test]
    fn test_horizon() {
        let problem = problem();
        assert_eq!(problem.horizon_days(), 7);
        assert_eq!(problem.dates().len(), 7);
    }

    #[test]
    fn test_single_manufacturing_site_required() {
        let mut problem = problem();
        assert!(problem.manufacturing().is_ok());
        problem.network.add_node(
            "M2",
            "Second plant",
            NodeCapabilities {
                can_manufacture: true,
                production_rate_per_hour: 1000.0,
                ..NodeCapabilities::default()
            },
        );
        assert!(problem.manufacturing().is_err());
    }

    #[test]
    fn test_unknown_forecast_code_errors() {
        let mut problem = problem();
        problem.forecast.entries.push(ForecastEntry {
            location_code: "NOPE".into(),
            product_code: "P1".into(),
            date: date(2025, 10, 15),
            quantity: 10.0,
            confidence: None,
        });
        assert!(problem.demand_map().is_err());
    }
}
