//! Cohort indexing
//!
//! A *cohort* identifies a batch of product at a point in the plan:
//! `(node, product, production_date, current_date, state, state_entry_date)`.
//! This module materializes the four index families the optimizer is built
//! over — inventory, shipment, freeze/thaw, and demand-consumption — as
//! immutable value sets, closed under:
//!
//! - the shelf-life sliding window: a cohort whose age in state reaches the
//!   state's shelf life is excluded, making spoilage implicit;
//! - the anti-phantom rule: shipments whose implied departure precedes the
//!   horizon start do not exist;
//! - the state algebra: freeze/thaw at dual-mode nodes and the transitions
//!   implied by each leg's transport mode and its endpoints' storage.
//!
//! Index sets are fully built before any decision variable exists, so the
//! model builder reads them without any iterative resolution between
//! inventory flow and shelf life.

use chrono::{Duration, NaiveDate};
use coldchain_core::{Network, NodeId, ProductId, ProductState, RouteId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Inventory cohort: product at a node on a date, in a state entered on a
/// given date. Ambient and frozen cohorts carry `entered == produced`; only
/// thawed cohorts restart the clock at the thaw date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CohortKey {
    pub node: NodeId,
    pub product: ProductId,
    pub produced: NaiveDate,
    pub date: NaiveDate,
    pub state: ProductState,
    pub entered: NaiveDate,
}

impl CohortKey {
    /// Age of the running shelf clock on this cohort-day.
    pub fn age_in_state(&self) -> i64 {
        (self.date - self.entered).num_days()
    }
}

/// Shipment cohort: a batch moving over one leg, keyed by delivery date and
/// the state it arrives in. The departure date is implied by the leg's
/// whole-day transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipmentKey {
    pub route: RouteId,
    pub product: ProductId,
    pub produced: NaiveDate,
    pub departs: NaiveDate,
    pub delivers: NaiveDate,
    pub delivered_state: ProductState,
}

/// Freeze/thaw opportunity at a dual-mode node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreezeThawKey {
    pub node: NodeId,
    pub product: ProductId,
    pub produced: NaiveDate,
    pub date: NaiveDate,
}

/// A cohort eligible to satisfy one demand line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DemandKey {
    pub node: NodeId,
    pub product: ProductId,
    pub produced: NaiveDate,
    /// Demand date (the cohort's current date at consumption).
    pub date: NaiveDate,
    pub state: ProductState,
    pub entered: NaiveDate,
}

impl DemandKey {
    pub fn cohort(&self) -> CohortKey {
        CohortKey {
            node: self.node,
            product: self.product,
            produced: self.produced,
            date: self.date,
            state: self.state,
            entered: self.entered,
        }
    }
}

/// Indexer options; both mirror the planner configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// 6-tuple cohorts: thawed batches keep their production date and carry
    /// the thaw date separately. Without it the production date resets at
    /// thaw (5-tuple behavior).
    pub use_batch_tracking: bool,
    pub enforce_shelf_life: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            use_batch_tracking: true,
            enforce_shelf_life: true,
        }
    }
}

/// A cohort lineage: everything about a cohort except its current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Family {
    node: NodeId,
    product: ProductId,
    produced: NaiveDate,
    state: ProductState,
    entered: NaiveDate,
}

impl Family {
    fn at(&self, date: NaiveDate) -> CohortKey {
        CohortKey {
            node: self.node,
            product: self.product,
            produced: self.produced,
            date,
            state: self.state,
            entered: self.entered,
        }
    }
}

/// The four cohort index families, plus the initial-inventory injections.
/// Owned by the indexer; the model builder reads them.
#[derive(Debug, Clone)]
pub struct CohortIndex {
    pub inv: BTreeSet<CohortKey>,
    pub ship: Vec<ShipmentKey>,
    pub ft: Vec<FreezeThawKey>,
    pub demand: Vec<DemandKey>,
    /// Initial stock entering the first horizon day, keyed by its cohort.
    pub initial: Vec<(CohortKey, f64)>,
    pub use_batch_tracking: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CohortIndex {
    /// Build all index families in one deterministic forward sweep.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        network: &Network,
        start: NaiveDate,
        end: NaiveDate,
        demand: &BTreeMap<(NodeId, ProductId, NaiveDate), f64>,
        legs: &HashSet<RouteId>,
        initial_inventory: &[(NodeId, ProductId, ProductState, f64)],
        snapshot_date: Option<NaiveDate>,
        config: &IndexConfig,
    ) -> CohortIndex {
        let mut builder = IndexBuilder {
            network,
            start,
            end,
            legs,
            config,
            first: HashMap::new(),
            queue: VecDeque::new(),
            ship: BTreeSet::new(),
        };

        // Production cohorts: a fresh ambient cohort at the plant every day.
        for &mfg in &network.manufacturing_nodes() {
            for product in network.products() {
                for date in date_range(start, end) {
                    builder.offer(
                        Family {
                            node: mfg,
                            product: product.id,
                            produced: date,
                            state: ProductState::Ambient,
                            entered: date,
                        },
                        date,
                    );
                }
            }
        }

        // Initial inventory cohorts, aged from the snapshot date.
        let snapshot = snapshot_date.unwrap_or(start);
        let mut initial_qty: BTreeMap<Family, f64> = BTreeMap::new();
        for &(node, product, state, qty) in initial_inventory {
            if qty <= 0.0 || !network.node(node).can_hold(state) {
                continue;
            }
            let family = Family {
                node,
                product,
                produced: snapshot,
                state,
                entered: snapshot,
            };
            if builder.family_last(&family).map_or(false, |last| last >= start) {
                builder.offer(family, start);
                *initial_qty.entry(family).or_insert(0.0) += qty;
            }
        }

        // Propagate through freeze/thaw siblings and shipment arrivals until
        // no family's first existence date improves.
        while let Some(family) = builder.queue.pop_front() {
            builder.process(family);
        }

        // Materialize per-day inventory cohorts.
        let mut inv = BTreeSet::new();
        let mut ft = BTreeSet::new();
        for (family, &first) in &builder.first {
            let Some(last) = builder.family_last(family) else {
                continue;
            };
            for date in date_range(first, last) {
                inv.insert(family.at(date));
                if network.node(family.node).can_freeze_thaw()
                    && family.state != ProductState::Thawed
                {
                    ft.insert(FreezeThawKey {
                        node: family.node,
                        product: family.product,
                        produced: family.produced,
                        date,
                    });
                }
            }
        }

        // Demand eligibility, filtered by remaining shelf life at the demand
        // date against the product's acceptance floor.
        let mut demand_idx = BTreeSet::new();
        for (&(node, product_id, date), _) in demand.iter() {
            let product = network.product(product_id);
            for (family, &first) in &builder.first {
                if family.node != node
                    || family.product != product_id
                    || !family.state.is_consumable()
                {
                    continue;
                }
                let Some(last) = builder.family_last(family) else {
                    continue;
                };
                if date < first || date > last {
                    continue;
                }
                if config.enforce_shelf_life {
                    let remaining =
                        product.shelf_life(family.state) - (date - family.entered).num_days();
                    if remaining < product.min_acceptable_shelf_life_days {
                        continue;
                    }
                }
                demand_idx.insert(DemandKey {
                    node,
                    product: product_id,
                    produced: family.produced,
                    date,
                    state: family.state,
                    entered: family.entered,
                });
            }
        }

        let initial = initial_qty
            .into_iter()
            .map(|(family, qty)| (family.at(start), qty))
            .collect();

        CohortIndex {
            inv,
            ship: builder.ship.into_iter().collect(),
            ft: ft.into_iter().collect(),
            demand: demand_idx.into_iter().collect(),
            initial,
            use_batch_tracking: config.use_batch_tracking,
            start,
            end,
        }
    }

    pub fn contains(&self, key: &CohortKey) -> bool {
        self.inv.contains(key)
    }

    /// The origin cohort a shipment draws down on its departure date.
    pub fn origin_cohort(&self, ship: &ShipmentKey, network: &Network) -> CohortKey {
        let route = network.route(ship.route);
        let state = route
            .transport_mode
            .departure_state(network.node(route.origin));
        CohortKey {
            node: route.origin,
            product: ship.product,
            produced: ship.produced,
            date: ship.departs,
            state,
            entered: ship.produced,
        }
    }

    /// The destination cohort a shipment feeds on its delivery date.
    pub fn destination_cohort(&self, ship: &ShipmentKey, network: &Network) -> CohortKey {
        let route = network.route(ship.route);
        let (produced, entered) = match ship.delivered_state {
            ProductState::Thawed => {
                let produced = if self.use_batch_tracking {
                    ship.produced
                } else {
                    ship.delivers
                };
                (produced, ship.delivers)
            }
            _ => (ship.produced, ship.produced),
        };
        CohortKey {
            node: route.destination,
            product: ship.product,
            produced,
            date: ship.delivers,
            state: ship.delivered_state,
            entered,
        }
    }

    /// The ambient→frozen pair a freeze operation moves between, if both
    /// cohorts are indexed on that date.
    pub fn freeze_cohorts(&self, key: &FreezeThawKey) -> Option<(CohortKey, CohortKey)> {
        let source = CohortKey {
            node: key.node,
            product: key.product,
            produced: key.produced,
            date: key.date,
            state: ProductState::Ambient,
            entered: key.produced,
        };
        let target = CohortKey {
            state: ProductState::Frozen,
            ..source
        };
        (self.contains(&source) && self.contains(&target)).then_some((source, target))
    }

    /// The frozen→thawed pair a thaw operation moves between, if both
    /// cohorts are indexed on that date. The thawed cohort's clock starts at
    /// the thaw date.
    pub fn thaw_cohorts(&self, key: &FreezeThawKey) -> Option<(CohortKey, CohortKey)> {
        let source = CohortKey {
            node: key.node,
            product: key.product,
            produced: key.produced,
            date: key.date,
            state: ProductState::Frozen,
            entered: key.produced,
        };
        let target = CohortKey {
            node: key.node,
            product: key.product,
            produced: if self.use_batch_tracking {
                key.produced
            } else {
                key.date
            },
            date: key.date,
            state: ProductState::Thawed,
            entered: key.date,
        };
        (self.contains(&source) && self.contains(&target)).then_some((source, target))
    }

    /// Whether the cohort survives into the next day, or drops out of the
    /// index (spoilage, or horizon end).
    pub fn survives_to_next_day(&self, key: &CohortKey) -> bool {
        let next = CohortKey {
            date: key.date + Duration::days(1),
            ..*key
        };
        self.contains(&next)
    }
}

struct IndexBuilder<'a> {
    network: &'a Network,
    start: NaiveDate,
    end: NaiveDate,
    legs: &'a HashSet<RouteId>,
    config: &'a IndexConfig,
    first: HashMap<Family, NaiveDate>,
    queue: VecDeque<Family>,
    ship: BTreeSet<ShipmentKey>,
}

impl IndexBuilder<'_> {
    /// Last date the family can exist: its shelf clock runs out the day its
    /// age in state reaches the shelf life.
    fn family_last(&self, family: &Family) -> Option<NaiveDate> {
        if !self.config.enforce_shelf_life {
            return Some(self.end);
        }
        let shelf = self.network.product(family.product).shelf_life(family.state);
        if shelf <= 0 {
            return None;
        }
        Some((family.entered + Duration::days(shelf - 1)).min(self.end))
    }

    /// Register a family's existence from `date` onward; re-enqueues on any
    /// improvement so downstream families see the widened window.
    fn offer(&mut self, family: Family, date: NaiveDate) {
        debug_assert!(date >= self.start);
        match self.first.get(&family) {
            Some(&existing) if existing <= date => {}
            _ => {
                self.first.insert(family, date);
                self.queue.push_back(family);
            }
        }
    }

    fn process(&mut self, family: Family) {
        let first = self.first[&family];
        let Some(last) = self.family_last(&family) else {
            return;
        };
        if last < first {
            return;
        }
        let node = self.network.node(family.node);

        // Freeze/thaw siblings at dual-mode nodes.
        if node.can_freeze_thaw() {
            match family.state {
                ProductState::Ambient => {
                    self.offer(
                        Family {
                            state: ProductState::Frozen,
                            entered: family.produced,
                            ..family
                        },
                        first,
                    );
                }
                ProductState::Frozen => {
                    for thaw_date in date_range(first, last) {
                        let produced = if self.config.use_batch_tracking {
                            family.produced
                        } else {
                            thaw_date
                        };
                        self.offer(
                            Family {
                                produced,
                                state: ProductState::Thawed,
                                entered: thaw_date,
                                ..family
                            },
                            thaw_date,
                        );
                    }
                }
                ProductState::Thawed => {}
            }
        }

        // Shipment cohorts on in-use legs departing this node.
        let routes: Vec<RouteId> = self
            .network
            .outgoing_routes(family.node)
            .iter()
            .filter(|r| self.legs.contains(&r.id))
            .map(|r| r.id)
            .collect();
        for route_id in routes {
            let route = self.network.route(route_id);
            let origin = self.network.node(route.origin);
            let destination = self.network.node(route.destination);
            if route.transport_mode.departure_state(origin) != family.state {
                continue;
            }
            let transit = route.transit_ceil_days();
            let delivered_state = route.transport_mode.delivered_state(origin, destination);
            if !destination.can_hold(delivered_state) {
                continue;
            }
            for departs in date_range(first, last) {
                let delivers = departs + Duration::days(transit);
                if delivers > self.end {
                    break;
                }
                let (produced, entered) = match delivered_state {
                    ProductState::Thawed => {
                        let produced = if self.config.use_batch_tracking {
                            family.produced
                        } else {
                            delivers
                        };
                        (produced, delivers)
                    }
                    _ => (family.produced, family.produced),
                };
                let arrival = Family {
                    node: route.destination,
                    product: family.product,
                    produced,
                    state: delivered_state,
                    entered,
                };
                // Skip arrivals that would be dead on delivery.
                if self
                    .family_last(&arrival)
                    .map_or(true, |arrival_last| arrival_last < delivers)
                {
                    continue;
                }
                self.offer(arrival, delivers);
                self.ship.insert(ShipmentKey {
                    route: route_id,
                    product: family.product,
                    produced: family.produced,
                    departs,
                    delivers,
                    delivered_state,
                });
            }
        }
    }
}

/// Inclusive day range.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let days = (end - start).num_days().max(-1);
    (0..=days).map(move |offset| start + Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldchain_core::{NodeCapabilities, ProductSpec, StorageMode, TransportMode};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// MFG → DEST, one ambient leg, one product with a short shelf life.
    fn direct_network(transit_days: f64, ambient_shelf: i64) -> Network {
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
            "Destination",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network
            .add_route("R1", "M", "D", transit_days, TransportMode::Ambient, 0.3)
            .unwrap();
        network.add_product(ProductSpec {
            code: "P1".into(),
            name: "Product 1".into(),
            sku: "SKU-P1".into(),
            ambient_shelf_life_days: ambient_shelf,
            ..ProductSpec::default()
        });
        network
    }

    fn build(
        network: &Network,
        start: NaiveDate,
        end: NaiveDate,
        demand: &[(&str, &str, NaiveDate, f64)],
        config: &IndexConfig,
    ) -> CohortIndex {
        let demand_map: BTreeMap<_, _> = demand
            .iter()
            .map(|(node, product, d, q)| {
                (
                    (
                        network.node_id(node).unwrap(),
                        network.product_id(product).unwrap(),
                        *d,
                    ),
                    *q,
                )
            })
            .collect();
        let legs: HashSet<RouteId> = network.routes().iter().map(|r| r.id).collect();
        CohortIndex::build(network, start, end, &demand_map, &legs, &[], None, config)
    }

    #[test]
    fn test_sliding_window_excludes_aged_cohorts() {
        let network = direct_network(1.0, 3);
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 20);
        let index = build(&network, start, end, &[], &IndexConfig::default());

        let mfg = network.node_id("M").unwrap();
        let p = network.product_id("P1").unwrap();
        // The day-1 cohort lives exactly shelf_life days at the plant.
        let alive: Vec<_> = index
            .inv
            .iter()
            .filter(|c| c.node == mfg && c.product == p && c.produced == start)
            .collect();
        assert_eq!(alive.len(), 3);
        assert_eq!(alive.last().unwrap().date, start + Duration::days(2));
        for cohort in alive {
            assert!(cohort.age_in_state() < 3);
        }
    }

    #[test]
    fn test_anti_phantom_departures() {
        let network = direct_network(2.0, 17);
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 16);
        let index = build(&network, start, end, &[], &IndexConfig::default());

        for ship in &index.ship {
            assert!(ship.departs >= start, "phantom departure {:?}", ship);
            assert!(ship.delivers <= end);
            assert_eq!((ship.delivers - ship.departs).num_days(), 2);
        }
        // Earliest possible delivery is start + transit.
        assert!(index.ship.iter().all(|s| s.delivers >= start + Duration::days(2)));
        assert!(!index.ship.is_empty());
    }

    /// M → L (freeze) → D (thaw on arrival): the destination cohort is thawed
    /// with its clock restarted at delivery, inheriting the production date
    /// when batch tracking is on and resetting it otherwise.
    fn frozen_chain() -> Network {
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
            "L",
            "Lineage",
            NodeCapabilities {
                storage_mode: StorageMode::Both,
                ..NodeCapabilities::default()
            },
        );
        network.add_node(
            "D",
            "WA breadroom",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network
            .add_route("R1", "M", "L", 1.0, TransportMode::Frozen, 0.2)
            .unwrap();
        network
            .add_route("R2", "L", "D", 3.0, TransportMode::Frozen, 0.5)
            .unwrap();
        network.add_product(ProductSpec {
            code: "P1".into(),
            name: "Product 1".into(),
            sku: "SKU-P1".into(),
            ..ProductSpec::default()
        });
        network
    }

    #[test]
    fn test_thaw_on_arrival_restarts_clock() {
        let network = frozen_chain();
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 27);
        let dest = network.node_id("D").unwrap();
        let index = build(
            &network,
            start,
            end,
            &[("D", "P1", date(2025, 10, 20), 100.0)],
            &IndexConfig::default(),
        );

        let thawed: Vec<_> = index
            .inv
            .iter()
            .filter(|c| c.node == dest && c.state == ProductState::Thawed)
            .collect();
        assert!(!thawed.is_empty());
        for cohort in &thawed {
            // Clock restarts on arrival; production date is inherited.
            assert!(cohort.entered > cohort.produced);
            assert!(cohort.age_in_state() < 14);
        }
        // No ambient path exists to D in this network.
        assert!(index
            .inv
            .iter()
            .filter(|c| c.node == dest)
            .all(|c| c.state == ProductState::Thawed));
    }

    #[test]
    fn test_five_tuple_mode_resets_production_date() {
        let network = frozen_chain();
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 27);
        let dest = network.node_id("D").unwrap();
        let index = build(
            &network,
            start,
            end,
            &[("D", "P1", date(2025, 10, 20), 100.0)],
            &IndexConfig {
                use_batch_tracking: false,
                enforce_shelf_life: true,
            },
        );

        for cohort in index.inv.iter().filter(|c| c.node == dest) {
            assert_eq!(cohort.state, ProductState::Thawed);
            assert_eq!(cohort.produced, cohort.entered);
        }
    }

    #[test]
    fn test_freeze_thaw_index_only_at_dual_mode_nodes() {
        let network = frozen_chain();
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 20);
        let index = build(&network, start, end, &[], &IndexConfig::default());

        let lineage = network.node_id("L").unwrap();
        assert!(!index.ft.is_empty());
        assert!(index.ft.iter().all(|k| k.node == lineage));

        // A thaw at Lineage moves into a thawed cohort whose clock starts
        // that day.
        let key = index.ft.iter().find(|k| k.date > k.produced).unwrap();
        if let Some((source, target)) = index.thaw_cohorts(key) {
            assert_eq!(source.state, ProductState::Frozen);
            assert_eq!(target.state, ProductState::Thawed);
            assert_eq!(target.entered, key.date);
        }
    }

    #[test]
    fn test_demand_respects_minimum_acceptance() {
        // 1-day transit; shelf 10, floor 7: cohorts older than 3 days at
        // delivery cannot serve demand.
        let network = direct_network(1.0, 10);
        {
            // Tighten the acceptance floor on the only product.
            let p = network.product_id("P1").unwrap();
            assert_eq!(network.product(p).min_acceptable_shelf_life_days, 7);
        }
        let start = date(2025, 10, 13);
        let demand_date = date(2025, 10, 18);
        let end = date(2025, 10, 20);
        let index = build(
            &network,
            start,
            end,
            &[("D", "P1", demand_date, 500.0)],
            &IndexConfig::default(),
        );

        assert!(!index.demand.is_empty());
        for key in &index.demand {
            let product = network.product(key.product);
            let remaining =
                product.shelf_life(key.state) - (key.date - key.entered).num_days();
            assert!(remaining >= product.min_acceptable_shelf_life_days);
        }
    }

    #[test]
    fn test_shipment_endpoint_cohorts_are_indexed() {
        let network = frozen_chain();
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 27);
        let index = build(
            &network,
            start,
            end,
            &[("D", "P1", date(2025, 10, 20), 100.0)],
            &IndexConfig::default(),
        );

        assert!(!index.ship.is_empty());
        for ship in &index.ship {
            let origin = index.origin_cohort(ship, &network);
            let dest = index.destination_cohort(ship, &network);
            assert!(index.contains(&origin), "missing origin cohort for {ship:?}");
            assert!(index.contains(&dest), "missing destination cohort for {ship:?}");
        }
    }

    #[test]
    fn test_initial_inventory_seeds_cohorts() {
        let network = direct_network(1.0, 17);
        let start = date(2025, 10, 13);
        let end = date(2025, 10, 15);
        let dest = network.node_id("D").unwrap();
        let p = network.product_id("P1").unwrap();
        let demand_map = BTreeMap::from([((dest, p, start), 400.0)]);
        let legs: HashSet<RouteId> = network.routes().iter().map(|r| r.id).collect();
        let index = CohortIndex::build(
            &network,
            start,
            end,
            &demand_map,
            &legs,
            &[(dest, p, ProductState::Ambient, 500.0)],
            Some(start - Duration::days(2)),
            &IndexConfig::default(),
        );

        assert_eq!(index.initial.len(), 1);
        let (cohort, qty) = &index.initial[0];
        assert_eq!(*qty, 500.0);
        assert_eq!(cohort.date, start);
        assert_eq!(cohort.produced, start - Duration::days(2));
        // Day-one demand can consume it.
        assert!(index
            .demand
            .iter()
            .any(|k| k.node == dest && k.produced == cohort.produced && k.date == start));
    }
}
