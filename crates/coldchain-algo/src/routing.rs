//! Route enumeration
//!
//! Enumerates ranked multi-leg paths from the manufacturing site to each
//! demand node, up to a per-destination cap. The cohort indexer only creates
//! shipment cohorts on legs that appear in some enumerated path; everything
//! else in the network is invisible to the optimizer.

use coldchain_core::{Network, NodeId, RouteId};
use std::collections::{HashMap, HashSet};

/// One enumerated path from the manufacturing site to a destination.
#[derive(Debug, Clone)]
pub struct EnumeratedRoute {
    pub origin: NodeId,
    pub destination: NodeId,
    /// Visited nodes, origin first, destination last.
    pub path: Vec<NodeId>,
    /// Legs in travel order.
    pub legs: Vec<RouteId>,
    /// Sum of per-leg cost per unit.
    pub total_cost: f64,
    /// Sum of whole-day per-leg transit.
    pub total_transit_days: i64,
    pub hops: usize,
}

/// Enumerates simple paths through the route graph, ranked by total cost with
/// ties broken by fewer hops, then shorter transit.
pub struct RouteEnumerator<'a> {
    network: &'a Network,
    origin: NodeId,
    max_routes_per_destination: usize,
}

impl<'a> RouteEnumerator<'a> {
    pub fn new(network: &'a Network, origin: NodeId, max_routes_per_destination: usize) -> Self {
        Self {
            network,
            origin,
            max_routes_per_destination,
        }
    }

    /// Enumerate up to the cap of simple paths to one destination.
    pub fn enumerate_to(&self, destination: NodeId) -> Vec<EnumeratedRoute> {
        let mut found = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut leg_stack: Vec<RouteId> = Vec::new();
        visited.insert(self.origin);
        self.dfs(self.origin, destination, &mut visited, &mut leg_stack, &mut found);

        found.sort_by(|a, b| {
            a.total_cost
                .partial_cmp(&b.total_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.hops.cmp(&b.hops))
                .then(a.total_transit_days.cmp(&b.total_transit_days))
        });
        found.truncate(self.max_routes_per_destination);
        found
    }

    /// Enumerate paths for every destination, keyed by destination.
    /// Destinations with no path get an empty entry; the validator reports
    /// them and the optimizer shows the demand as shortage.
    pub fn enumerate(&self, destinations: &[NodeId]) -> HashMap<NodeId, Vec<EnumeratedRoute>> {
        destinations
            .iter()
            .map(|&dest| (dest, self.enumerate_to(dest)))
            .collect()
    }

    fn dfs(
        &self,
        current: NodeId,
        destination: NodeId,
        visited: &mut HashSet<NodeId>,
        leg_stack: &mut Vec<RouteId>,
        found: &mut Vec<EnumeratedRoute>,
    ) {
        if current == destination && !leg_stack.is_empty() {
            found.push(self.materialize(leg_stack));
            return;
        }
        for route in self.network.outgoing_routes(current) {
            if visited.contains(&route.destination) {
                continue;
            }
            visited.insert(route.destination);
            leg_stack.push(route.id);
            self.dfs(route.destination, destination, visited, leg_stack, found);
            leg_stack.pop();
            visited.remove(&route.destination);
        }
    }

    fn materialize(&self, legs: &[RouteId]) -> EnumeratedRoute {
        let mut path = vec![self.origin];
        let mut total_cost = 0.0;
        let mut total_transit_days = 0;
        for &leg in legs {
            let route = self.network.route(leg);
            path.push(route.destination);
            total_cost += route.cost_per_unit;
            total_transit_days += route.transit_ceil_days();
        }
        EnumeratedRoute {
            origin: self.origin,
            destination: *path.last().unwrap_or(&self.origin),
            path,
            legs: legs.to_vec(),
            total_cost,
            total_transit_days,
            hops: legs.len(),
        }
    }
}

/// Legs appearing in any enumerated path.
pub fn legs_in_use(routes: &HashMap<NodeId, Vec<EnumeratedRoute>>) -> HashSet<RouteId> {
    routes
        .values()
        .flatten()
        .flat_map(|r| r.legs.iter().copied())
        .collect()
}

/// Shortest whole-day transit to each reachable destination.
pub fn earliest_arrival(routes: &HashMap<NodeId, Vec<EnumeratedRoute>>) -> HashMap<NodeId, i64> {
    let mut out = HashMap::new();
    for (dest, paths) in routes {
        if let Some(min) = paths.iter().map(|r| r.total_transit_days).min() {
            out.insert(*dest, min);
        }
    }
    out
}
