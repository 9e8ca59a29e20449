//! Conditional feature gates
//!
//! A pre-build inspection of the cost structure and node capabilities decides
//! which structural reductions stay out of the model. Pallet variables for a
//! state with no pallet cost are omitted entirely; mix integrality only
//! applies to products with a quantum above one; SKU-day binaries only appear
//! when changeovers cost something (or the operator asked for them).

use crate::planner::problem::PlanProblem;
use coldchain_core::ProductState;

/// Which optional variable groups and constraints the model carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureGates {
    /// Integer pallet counting for frozen inventory.
    pub pallet_tracking_frozen: bool,
    /// Integer pallet counting for ambient and thawed inventory.
    pub pallet_tracking_ambient: bool,
    /// Production as integer multiples of each product's mix quantum.
    pub mix_based_production: bool,
    /// SKU-day selection binaries with run-start tracking.
    pub binary_sku_selection: bool,
    /// Negative objective term rewarding remaining shelf life at consumption.
    pub freshness_incentive: bool,
    /// Per-departure binaries carrying fixed truck costs.
    pub truck_fixed_costs: bool,
}

impl FeatureGates {
    pub fn detect(problem: &PlanProblem) -> Self {
        let costs = &problem.costs;
        let config = &problem.config;
        Self {
            pallet_tracking_frozen: costs.pallet_costing_active(ProductState::Frozen),
            pallet_tracking_ambient: costs.pallet_costing_active(ProductState::Ambient),
            mix_based_production: problem
                .network
                .products()
                .iter()
                .any(|p| p.units_per_mix > 1),
            binary_sku_selection: !config.force_all_skus_daily
                && (costs.changeover_cost_per_start > 0.0
                    || costs.changeover_waste_units > 0.0
                    || config.max_products_per_day.is_some()),
            freshness_incentive: costs.freshness_incentive_weight > 0.0,
            truck_fixed_costs: problem.network.trucks().iter().any(|t| t.cost_fixed > 0.0),
        }
    }

    pub fn pallet_tracking(&self, state: ProductState) -> bool {
        match state {
            ProductState::Frozen => self.pallet_tracking_frozen,
            ProductState::Ambient | ProductState::Thawed => self.pallet_tracking_ambient,
        }
    }

    pub fn any_pallet_tracking(&self) -> bool {
        self.pallet_tracking_frozen || self.pallet_tracking_ambient
    }
}
