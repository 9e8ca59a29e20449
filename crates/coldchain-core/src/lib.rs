//! # coldchain-core: Supply Network Modeling Core
//!
//! Provides the fundamental data structures and graph-based network model for
//! integrated production-distribution planning of perishable goods.
//!
//! ## Design Philosophy
//!
//! The supply chain is modeled as a **directed multigraph** where:
//! - **Nodes**: manufacturing sites, hubs, and demand locations, distinguished
//!   only by their capability flags (not by a location "type")
//! - **Edges**: routes with transit time and a transport temperature mode
//!
//! Truck schedules, products, the labor calendar, and the cost structure sit
//! beside the graph as plain collections; cross-references between them are
//! resolved to type-safe newtype IDs when the network is assembled.
//!
//! ## Quick Start
//!
//! ```rust
//! use coldchain_core::*;
//!
//! let mut network = Network::new();
//!
//! let mfg = network.add_node("6122", "Manufacturing", NodeCapabilities {
//!     can_manufacture: true,
//!     production_rate_per_hour: 1400.0,
//!     requires_truck_schedules: true,
//!     ..NodeCapabilities::default()
//! });
//! let hub = network.add_node("6104", "Hub NSW", NodeCapabilities {
//!     has_demand: true,
//!     ..NodeCapabilities::default()
//! });
//!
//! network
//!     .add_route("R1", "6122", "6104", 1.0, TransportMode::Ambient, 0.3)
//!     .unwrap();
//!
//! assert!(network.node(mfg).can_produce());
//! assert!(!network.node(hub).can_produce());
//! ```
//!
//! ## ID System
//!
//! Every element has a unique ID (newtype wrapper around `usize`) assigned at
//! insertion. External string codes (e.g. `"6122"`) stay on the structs as
//! `code` and are resolved through lookup maps, so upstream data keyed by code
//! can be checked for dangling references before planning starts.
//!
//! ## Modules
//!
//! - [`diagnostics`] - Validation issue model and reporting
//! - [`error`] - Unified error type
//! - [`graph_utils`] - Topological analysis (reachability, components)

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;

pub use diagnostics::{Issue, Severity, ValidationReport};
pub use error::{PlanError, PlanResult};
pub use graph_utils::*;

// ============================================================================
// IDs
// ============================================================================

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl $name {
            pub fn new(id: usize) -> Self {
                $name(id)
            }

            pub fn value(&self) -> usize {
                self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a network node
    NodeId
);
define_id!(
    /// Unique identifier for a route (one directed leg)
    RouteId
);
define_id!(
    /// Unique identifier for a truck schedule
    TruckId
);
define_id!(
    /// Unique identifier for a product (SKU)
    ProductId
);

// ============================================================================
// Closed enumerations
// ============================================================================

/// Storage temperature capability of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Frozen,
    Ambient,
    /// Both frozen and ambient storage; the node can freeze and thaw product.
    Both,
}

/// Temperature state of a product cohort. Governs which shelf-life clock runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductState {
    Ambient,
    Frozen,
    /// Previously frozen product whose (shorter) post-thaw clock restarted at
    /// the thaw date.
    Thawed,
}

impl ProductState {
    /// States in which product can be picked for customer demand.
    pub fn is_consumable(&self) -> bool {
        matches!(self, ProductState::Ambient | ProductState::Thawed)
    }

    pub const ALL: [ProductState; 3] = [
        ProductState::Ambient,
        ProductState::Frozen,
        ProductState::Thawed,
    ];
}

impl std::fmt::Display for ProductState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductState::Ambient => write!(f, "ambient"),
            ProductState::Frozen => write!(f, "frozen"),
            ProductState::Thawed => write!(f, "thawed"),
        }
    }
}

/// Transport temperature mode of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Frozen,
    Ambient,
}

impl TransportMode {
    /// The state goods are drawn from at the origin when loaded onto this
    /// mode. Frozen transport loads frozen stock where the origin has it and
    /// otherwise freezes ambient stock in transit; ambient transport loads
    /// ambient stock where the origin has it and otherwise thaws frozen stock
    /// in transit.
    pub fn departure_state(&self, origin: &Node) -> ProductState {
        match self {
            TransportMode::Frozen => {
                if origin.supports_frozen_storage() {
                    ProductState::Frozen
                } else {
                    ProductState::Ambient
                }
            }
            TransportMode::Ambient => {
                if origin.supports_ambient_storage() {
                    ProductState::Ambient
                } else {
                    ProductState::Frozen
                }
            }
        }
    }

    /// The state goods arrive in at the destination. Frozen transport delivers
    /// frozen where the destination can hold it and thawed otherwise; ambient
    /// transport delivers thawed when it picked up frozen stock, ambient
    /// otherwise.
    pub fn delivered_state(&self, origin: &Node, destination: &Node) -> ProductState {
        match self {
            TransportMode::Frozen => {
                if destination.supports_frozen_storage() {
                    ProductState::Frozen
                } else {
                    ProductState::Thawed
                }
            }
            TransportMode::Ambient => {
                if self.departure_state(origin) == ProductState::Frozen {
                    ProductState::Thawed
                } else {
                    ProductState::Ambient
                }
            }
        }
    }
}

/// Morning or afternoon truck departure window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureType {
    Morning,
    Afternoon,
}

// ============================================================================
// Nodes
// ============================================================================

/// Capability flags describing what a node can do. A node is manufacturing,
/// hub, breadroom, or any mix of those purely through these flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCapabilities {
    pub can_manufacture: bool,
    /// Units per hour when manufacturing (ignored otherwise).
    pub production_rate_per_hour: f64,
    pub daily_startup_hours: f64,
    pub daily_shutdown_hours: f64,
    pub default_changeover_hours: f64,
    pub can_store: bool,
    pub storage_mode: StorageMode,
    /// Maximum units held across all products and states, if bounded.
    pub storage_capacity: Option<f64>,
    pub has_demand: bool,
    /// Departures from this node must ride scheduled trucks.
    pub requires_truck_schedules: bool,
}

impl Default for NodeCapabilities {
    fn default() -> Self {
        Self {
            can_manufacture: false,
            production_rate_per_hour: 0.0,
            daily_startup_hours: 0.5,
            daily_shutdown_hours: 0.5,
            default_changeover_hours: 1.0,
            can_store: true,
            storage_mode: StorageMode::Ambient,
            storage_capacity: None,
            has_demand: false,
            requires_truck_schedules: false,
        }
    }
}

/// A location in the supply network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// External code from upstream data (e.g. `"6122"`).
    pub code: String,
    pub name: String,
    pub capabilities: NodeCapabilities,
}

impl Node {
    pub fn can_produce(&self) -> bool {
        self.capabilities.can_manufacture
    }

    pub fn supports_frozen_storage(&self) -> bool {
        self.capabilities.can_store
            && matches!(
                self.capabilities.storage_mode,
                StorageMode::Frozen | StorageMode::Both
            )
    }

    pub fn supports_ambient_storage(&self) -> bool {
        self.capabilities.can_store
            && matches!(
                self.capabilities.storage_mode,
                StorageMode::Ambient | StorageMode::Both
            )
    }

    /// State transitions (freeze/thaw) are possible only where both storage
    /// modes exist.
    pub fn can_freeze_thaw(&self) -> bool {
        self.capabilities.can_store && self.capabilities.storage_mode == StorageMode::Both
    }

    pub fn requires_trucks(&self) -> bool {
        self.capabilities.requires_truck_schedules
    }

    /// Whether inventory in the given state can sit at this node. Thawed
    /// product occupies ambient storage.
    pub fn can_hold(&self, state: ProductState) -> bool {
        match state {
            ProductState::Frozen => self.supports_frozen_storage(),
            ProductState::Ambient | ProductState::Thawed => self.supports_ambient_storage(),
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// A directed transport leg between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub code: String,
    pub origin: NodeId,
    pub destination: NodeId,
    /// Transit time in days; 0 means instant transfer.
    pub transit_days: f64,
    pub transport_mode: TransportMode,
    pub cost_per_unit: f64,
}

impl Route {
    pub fn is_frozen_transport(&self) -> bool {
        self.transport_mode == TransportMode::Frozen
    }

    pub fn is_ambient_transport(&self) -> bool {
        self.transport_mode == TransportMode::Ambient
    }

    pub fn is_instant_transfer(&self) -> bool {
        self.transit_days == 0.0
    }

    /// Whole-day transit used for delivery arithmetic: delivery date =
    /// departure date + ceil(transit_days).
    pub fn transit_ceil_days(&self) -> i64 {
        self.transit_days.ceil() as i64
    }
}

// ============================================================================
// Truck schedules
// ============================================================================

/// Input record for a truck schedule, keyed by external codes. Resolved to a
/// [`TruckSchedule`] when added to a [`Network`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckSpec {
    pub code: String,
    pub origin: String,
    pub destination: String,
    pub departure_type: DepartureType,
    pub departure_time: NaiveTime,
    /// `None` means the truck runs every day.
    pub day_of_week: Option<Weekday>,
    /// Capacity in units.
    pub capacity: f64,
    pub cost_fixed: f64,
    pub cost_per_unit: f64,
    /// Drop-off points before the final destination, in visiting order.
    pub intermediate_stops: Vec<String>,
    pub pallet_capacity: u32,
    pub units_per_pallet: u32,
    pub units_per_case: u32,
}

impl Default for TruckSpec {
    fn default() -> Self {
        Self {
            code: String::new(),
            origin: String::new(),
            destination: String::new(),
            departure_type: DepartureType::Morning,
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            day_of_week: None,
            capacity: 14_080.0,
            cost_fixed: 0.0,
            cost_per_unit: 0.0,
            intermediate_stops: Vec::new(),
            pallet_capacity: 44,
            units_per_pallet: 320,
            units_per_case: 10,
        }
    }
}

/// A scheduled truck departure on a fixed origin/destination pair, possibly
/// with intermediate drop-off stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckSchedule {
    pub id: TruckId,
    pub code: String,
    pub origin: NodeId,
    pub destination: NodeId,
    pub departure_type: DepartureType,
    pub departure_time: NaiveTime,
    pub day_of_week: Option<Weekday>,
    pub capacity: f64,
    pub cost_fixed: f64,
    pub cost_per_unit: f64,
    pub intermediate_stops: Vec<NodeId>,
    pub pallet_capacity: u32,
    pub units_per_pallet: u32,
    pub units_per_case: u32,
}

impl TruckSchedule {
    pub fn is_day_specific(&self) -> bool {
        self.day_of_week.is_some()
    }

    /// Daily schedules apply every day; day-specific schedules only on the
    /// matching weekday.
    pub fn applies_on_date(&self, date: NaiveDate) -> bool {
        match self.day_of_week {
            None => true,
            Some(dow) => date.weekday() == dow,
        }
    }

    pub fn is_morning(&self) -> bool {
        self.departure_type == DepartureType::Morning
    }

    pub fn is_afternoon(&self) -> bool {
        self.departure_type == DepartureType::Afternoon
    }

    pub fn has_intermediate_stops(&self) -> bool {
        !self.intermediate_stops.is_empty()
    }

    /// All drop-off points, intermediate stops first, final destination last.
    pub fn stops(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.intermediate_stops
            .iter()
            .copied()
            .chain(std::iter::once(self.destination))
    }

    /// Pallets needed for a load; partial pallets occupy full pallet space.
    /// Errors when the load cannot fit on the truck.
    pub fn required_pallets(&self, units: f64) -> PlanResult<u32> {
        if units <= 0.0 {
            return Ok(0);
        }
        let pallets = (units / self.units_per_pallet as f64).ceil() as u32;
        if pallets > self.pallet_capacity {
            return Err(PlanError::Capacity(format!(
                "{} units requires {} pallets, exceeds truck {} capacity of {} pallets",
                units, pallets, self.code, self.pallet_capacity
            )));
        }
        Ok(pallets)
    }
}

// ============================================================================
// Products
// ============================================================================

/// Input record for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    pub code: String,
    pub name: String,
    pub sku: String,
    /// Production quantum; output quantities are whole multiples of this.
    pub units_per_mix: u32,
    pub ambient_shelf_life_days: i64,
    pub frozen_shelf_life_days: i64,
    pub thawed_shelf_life_days: i64,
    /// Customer acceptance floor on remaining shelf life at delivery.
    pub min_acceptable_shelf_life_days: i64,
}

impl Default for ProductSpec {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            sku: String::new(),
            units_per_mix: 1,
            ambient_shelf_life_days: 17,
            frozen_shelf_life_days: 120,
            thawed_shelf_life_days: 14,
            min_acceptable_shelf_life_days: 7,
        }
    }
}

/// A product (SKU) with its shelf-life triple and production quantum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub sku: String,
    pub units_per_mix: u32,
    pub ambient_shelf_life_days: i64,
    pub frozen_shelf_life_days: i64,
    pub thawed_shelf_life_days: i64,
    pub min_acceptable_shelf_life_days: i64,
}

impl Product {
    /// Shelf life of the clock that runs in the given state.
    pub fn shelf_life(&self, state: ProductState) -> i64 {
        match state {
            ProductState::Ambient => self.ambient_shelf_life_days,
            ProductState::Frozen => self.frozen_shelf_life_days,
            ProductState::Thawed => self.thawed_shelf_life_days,
        }
    }

    /// Round a quantity up to the next whole multiple of `units_per_mix`.
    pub fn round_to_mix(&self, quantity: f64) -> f64 {
        if self.units_per_mix <= 1 || quantity <= 0.0 {
            return quantity.max(0.0);
        }
        let mix = self.units_per_mix as f64;
        (quantity / mix).ceil() * mix
    }
}

// ============================================================================
// Labor calendar
// ============================================================================

/// Labor terms for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborDay {
    pub date: NaiveDate,
    /// Fixed days pay `fixed_hours * regular_rate` regardless of use.
    pub is_fixed_day: bool,
    pub fixed_hours: f64,
    pub regular_rate: f64,
    pub overtime_rate: f64,
    /// Rate on non-fixed days (weekends/holidays).
    pub non_fixed_rate: Option<f64>,
    /// Paid floor on non-fixed days once any production occurs.
    pub minimum_hours: f64,
    /// Hard cap on total labor hours in the day.
    pub max_hours: f64,
}

impl LaborDay {
    pub fn non_fixed_rate_or_overtime(&self) -> f64 {
        self.non_fixed_rate.unwrap_or(self.overtime_rate)
    }
}

/// Per-date labor calendar with weekday/weekend fallback defaults for dates
/// the calendar does not cover.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaborCalendar {
    pub days: Vec<LaborDay>,
    #[serde(skip)]
    by_date: HashMap<NaiveDate, usize>,
}

impl LaborCalendar {
    pub fn new(days: Vec<LaborDay>) -> Self {
        let by_date = days.iter().enumerate().map(|(i, d)| (d.date, i)).collect();
        Self { days, by_date }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&LaborDay> {
        self.by_date.get(&date).map(|&i| &self.days[i])
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Standard-terms fallback for a missing date: weekdays become fixed days
    /// with 12 fixed hours, weekends non-fixed days with a 4 hour minimum,
    /// both at the calendar's first-day rates.
    pub fn default_day(&self, date: NaiveDate) -> PlanResult<LaborDay> {
        let first = self
            .days
            .first()
            .ok_or_else(|| PlanError::Validation("labor calendar is empty".into()))?;
        let is_weekday = date.weekday().num_days_from_monday() < 5;
        Ok(LaborDay {
            date,
            is_fixed_day: is_weekday,
            fixed_hours: if is_weekday { 12.0 } else { 0.0 },
            regular_rate: first.regular_rate,
            overtime_rate: first.overtime_rate,
            non_fixed_rate: Some(first.non_fixed_rate_or_overtime()),
            minimum_hours: if is_weekday { 0.0 } else { 4.0 },
            max_hours: 14.0,
        })
    }

    /// Labor terms for a date, falling back to [`default_day`](Self::default_day)
    /// with a warning when the calendar has a gap. `strict` turns the gap into
    /// an error instead.
    pub fn resolve(&self, date: NaiveDate, strict: bool) -> PlanResult<LaborDay> {
        if let Some(day) = self.get(date) {
            return Ok(day.clone());
        }
        if strict {
            return Err(PlanError::Validation(format!(
                "labor calendar missing date {date}; extend the calendar to cover the horizon"
            )));
        }
        let fallback = self.default_day(date)?;
        tracing::warn!(
            %date,
            fixed = fallback.is_fixed_day,
            "labor calendar missing date, using standard {} defaults",
            if fallback.is_fixed_day { "weekday" } else { "weekend" },
        );
        Ok(fallback)
    }
}

// ============================================================================
// Costs
// ============================================================================

/// All cost rates and penalties for the planning objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostStructure {
    pub production_cost_per_unit: f64,
    /// Default per-unit transport rates used where a route carries no cost.
    pub transport_cost_frozen_per_unit: f64,
    pub transport_cost_ambient_per_unit: f64,
    /// Legacy unit-day storage rates, used for states without pallet costs.
    pub storage_cost_frozen_per_unit_day: f64,
    pub storage_cost_ambient_per_unit_day: f64,
    /// State-specific pallet charges. A non-zero value switches the state to
    /// pallet-based storage costing and activates integer pallet counting.
    pub storage_cost_fixed_per_pallet_frozen: f64,
    pub storage_cost_fixed_per_pallet_ambient: f64,
    pub storage_cost_per_pallet_day_frozen: f64,
    pub storage_cost_per_pallet_day_ambient: f64,
    /// Units per storage pallet used for inventory pallet rounding.
    pub units_per_pallet_storage: u32,
    pub shortage_penalty_per_unit: f64,
    pub waste_cost_multiplier: f64,
    pub freshness_incentive_weight: f64,
    pub changeover_cost_per_start: f64,
    /// Yield loss at the start of a production run, in units.
    pub changeover_waste_units: f64,
}

impl Default for CostStructure {
    fn default() -> Self {
        Self {
            production_cost_per_unit: 0.0,
            transport_cost_frozen_per_unit: 0.0,
            transport_cost_ambient_per_unit: 0.0,
            storage_cost_frozen_per_unit_day: 0.0,
            storage_cost_ambient_per_unit_day: 0.0,
            storage_cost_fixed_per_pallet_frozen: 0.0,
            storage_cost_fixed_per_pallet_ambient: 0.0,
            storage_cost_per_pallet_day_frozen: 0.0,
            storage_cost_per_pallet_day_ambient: 0.0,
            units_per_pallet_storage: 320,
            shortage_penalty_per_unit: 0.0,
            waste_cost_multiplier: 1.0,
            freshness_incentive_weight: 0.0,
            changeover_cost_per_start: 0.0,
            changeover_waste_units: 0.0,
        }
    }
}

impl CostStructure {
    /// Whether the state is charged per pallet rather than per unit-day.
    /// Thawed product shares the ambient pallet rates.
    pub fn pallet_costing_active(&self, state: ProductState) -> bool {
        match state {
            ProductState::Frozen => {
                self.storage_cost_fixed_per_pallet_frozen > 0.0
                    || self.storage_cost_per_pallet_day_frozen > 0.0
            }
            ProductState::Ambient | ProductState::Thawed => {
                self.storage_cost_fixed_per_pallet_ambient > 0.0
                    || self.storage_cost_per_pallet_day_ambient > 0.0
            }
        }
    }

    /// Combined per-pallet-day charge (fixed + daily) for a state.
    pub fn pallet_cost_per_day(&self, state: ProductState) -> f64 {
        match state {
            ProductState::Frozen => {
                self.storage_cost_fixed_per_pallet_frozen + self.storage_cost_per_pallet_day_frozen
            }
            ProductState::Ambient | ProductState::Thawed => {
                self.storage_cost_fixed_per_pallet_ambient
                    + self.storage_cost_per_pallet_day_ambient
            }
        }
    }

    /// Legacy unit-day storage rate for a state.
    pub fn unit_storage_cost_per_day(&self, state: ProductState) -> f64 {
        match state {
            ProductState::Frozen => self.storage_cost_frozen_per_unit_day,
            ProductState::Ambient | ProductState::Thawed => self.storage_cost_ambient_per_unit_day,
        }
    }
}

// ============================================================================
// Forecast & initial inventory
// ============================================================================

/// One demand line: a location needs a quantity of a product on a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub location_code: String,
    pub product_code: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub confidence: Option<f64>,
}

/// Demand forecast over the planning horizon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub name: String,
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn total_quantity(&self) -> f64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.entries.iter().map(|e| e.date).min()?;
        let max = self.entries.iter().map(|e| e.date).max()?;
        Some((min, max))
    }

    pub fn location_codes(&self) -> std::collections::BTreeSet<&str> {
        self.entries
            .iter()
            .map(|e| e.location_code.as_str())
            .collect()
    }
}

/// On-hand stock of one product in one state at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub location_code: String,
    pub product_code: String,
    pub state: ProductState,
    pub quantity: f64,
}

/// Stock on hand at the start of the horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialInventory {
    pub snapshot_date: NaiveDate,
    pub entries: Vec<InventoryEntry>,
}

// ============================================================================
// Network
// ============================================================================

/// The supply network: nodes and routes as a directed graph, plus truck
/// schedules and the product catalog, with code→ID resolution.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub graph: DiGraph<NodeId, RouteId>,
    nodes: Vec<Node>,
    routes: Vec<Route>,
    trucks: Vec<TruckSchedule>,
    products: Vec<Product>,
    node_codes: HashMap<String, NodeId>,
    product_codes: HashMap<String, ProductId>,
    graph_indices: Vec<NodeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        capabilities: NodeCapabilities,
    ) -> NodeId {
        let code = code.into();
        let id = NodeId::new(self.nodes.len());
        let gidx = self.graph.add_node(id);
        self.graph_indices.push(gidx);
        self.node_codes.insert(code.clone(), id);
        self.nodes.push(Node {
            id,
            code,
            name: name.into(),
            capabilities,
        });
        id
    }

    pub fn add_route(
        &mut self,
        code: impl Into<String>,
        origin_code: &str,
        destination_code: &str,
        transit_days: f64,
        transport_mode: TransportMode,
        cost_per_unit: f64,
    ) -> PlanResult<RouteId> {
        let origin = self.require_node(origin_code)?;
        let destination = self.require_node(destination_code)?;
        let id = RouteId::new(self.routes.len());
        self.routes.push(Route {
            id,
            code: code.into(),
            origin,
            destination,
            transit_days,
            transport_mode,
            cost_per_unit,
        });
        self.graph.add_edge(
            self.graph_indices[origin.value()],
            self.graph_indices[destination.value()],
            id,
        );
        Ok(id)
    }

    pub fn add_truck(&mut self, spec: TruckSpec) -> PlanResult<TruckId> {
        let origin = self.require_node(&spec.origin)?;
        let destination = self.require_node(&spec.destination)?;
        let intermediate_stops = spec
            .intermediate_stops
            .iter()
            .map(|code| self.require_node(code))
            .collect::<PlanResult<Vec<_>>>()?;
        let id = TruckId::new(self.trucks.len());
        self.trucks.push(TruckSchedule {
            id,
            code: spec.code,
            origin,
            destination,
            departure_type: spec.departure_type,
            departure_time: spec.departure_time,
            day_of_week: spec.day_of_week,
            capacity: spec.capacity,
            cost_fixed: spec.cost_fixed,
            cost_per_unit: spec.cost_per_unit,
            intermediate_stops,
            pallet_capacity: spec.pallet_capacity,
            units_per_pallet: spec.units_per_pallet,
            units_per_case: spec.units_per_case,
        });
        Ok(id)
    }

    pub fn add_product(&mut self, spec: ProductSpec) -> ProductId {
        let id = ProductId::new(self.products.len());
        self.product_codes.insert(spec.code.clone(), id);
        self.products.push(Product {
            id,
            code: spec.code,
            name: spec.name,
            sku: spec.sku,
            units_per_mix: spec.units_per_mix,
            ambient_shelf_life_days: spec.ambient_shelf_life_days,
            frozen_shelf_life_days: spec.frozen_shelf_life_days,
            thawed_shelf_life_days: spec.thawed_shelf_life_days,
            min_acceptable_shelf_life_days: spec.min_acceptable_shelf_life_days,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.value()]
    }

    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.value()]
    }

    pub fn truck(&self, id: TruckId) -> &TruckSchedule {
        &self.trucks[id.value()]
    }

    pub fn product(&self, id: ProductId) -> &Product {
        &self.products[id.value()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn trucks(&self) -> &[TruckSchedule] {
        &self.trucks
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn node_id(&self, code: &str) -> Option<NodeId> {
        self.node_codes.get(code).copied()
    }

    pub fn product_id(&self, code: &str) -> Option<ProductId> {
        self.product_codes.get(code).copied()
    }

    fn require_node(&self, code: &str) -> PlanResult<NodeId> {
        self.node_id(code).ok_or_else(|| {
            PlanError::Network(format!("reference to unknown node code {code:?}"))
        })
    }

    /// The manufacturing site. Planning assumes a single site; the validator
    /// rejects inputs with zero or several.
    pub fn manufacturing_node(&self) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.can_produce()).map(|n| n.id)
    }

    pub fn manufacturing_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.can_produce())
            .map(|n| n.id)
            .collect()
    }

    pub fn graph_index(&self, id: NodeId) -> NodeIndex {
        self.graph_indices[id.value()]
    }

    pub fn node_at_index(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx]
    }

    /// Routes departing a node.
    pub fn outgoing_routes(&self, node: NodeId) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|r| r.origin == node)
            .collect()
    }

    /// Trucks departing a node.
    pub fn trucks_from(&self, node: NodeId) -> Vec<&TruckSchedule> {
        self.trucks.iter().filter(|t| t.origin == node).collect()
    }
}
