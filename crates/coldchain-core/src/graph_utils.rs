use crate::{Network, NodeId};
use anyhow::Result;
use petgraph::algo::connected_components;
use std::collections::{HashSet, VecDeque};

/// Summary statistics for the supply network graph.
#[derive(Debug)]
pub struct NetworkStats {
    pub node_count: usize,
    pub route_count: usize,
    pub truck_count: usize,
    pub weakly_connected_components: usize,
}

/// Calculates node/route counts and weak connectivity of the network.
pub fn network_stats(network: &Network) -> Result<NetworkStats> {
    Ok(NetworkStats {
        node_count: network.nodes().len(),
        route_count: network.routes().len(),
        truck_count: network.trucks().len(),
        weakly_connected_components: connected_components(&network.graph),
    })
}

/// Nodes reachable from `start` following route direction (breadth-first).
/// Includes `start` itself.
pub fn reachable_from(network: &Network, start: NodeId) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(network.graph_index(start));
    while let Some(idx) = queue.pop_front() {
        for neighbor in network.graph.neighbors(idx) {
            let id = network.node_at_index(neighbor);
            if visited.insert(id) {
                queue.push_back(neighbor);
            }
        }
    }
    visited
}

/// Demand nodes that no directed route path connects to the manufacturing
/// site. These surface as validation issues; the optimizer reports them as
/// shortage.
pub fn unreachable_demand_nodes(network: &Network) -> Vec<NodeId> {
    let Some(mfg) = network.manufacturing_node() else {
        return network
            .nodes()
            .iter()
            .filter(|n| n.capabilities.has_demand)
            .map(|n| n.id)
            .collect();
    };
    let reachable = reachable_from(network, mfg);
    network
        .nodes()
        .iter()
        .filter(|n| n.capabilities.has_demand && !reachable.contains(&n.id))
        .map(|n| n.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeCapabilities, TransportMode};

    fn hub_and_spoke() -> Network {
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
        network.add_node("H", "Hub", NodeCapabilities::default());
        network.add_node(
            "D1",
            "Dest 1",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network.add_node(
            "D2",
            "Dest 2 (orphan)",
            NodeCapabilities {
                has_demand: true,
                ..NodeCapabilities::default()
            },
        );
        network
            .add_route("R1", "M", "H", 1.0, TransportMode::Ambient, 0.2)
            .unwrap();
        network
            .add_route("R2", "H", "D1", 1.0, TransportMode::Ambient, 0.1)
            .unwrap();
        network
    }

    #[test]
    fn test_reachability() {
        let network = hub_and_spoke();
        let mfg = network.node_id("M").unwrap();
        let reachable = reachable_from(&network, mfg);
        assert!(reachable.contains(&network.node_id("D1").unwrap()));
        assert!(!reachable.contains(&network.node_id("D2").unwrap()));
    }

    #[test]
    fn test_unreachable_demand_nodes() {
        let network = hub_and_spoke();
        let orphans = unreachable_demand_nodes(&network);
        assert_eq!(orphans.len(), 1);
        assert_eq!(network.node(orphans[0]).code, "D2");
    }

    #[test]
    fn test_network_stats() {
        let network = hub_and_spoke();
        let stats = network_stats(&network).unwrap();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.route_count, 2);
        // The orphan destination is its own component.
        assert_eq!(stats.weakly_connected_components, 2);
    }
}
