//! `GraphRouter` — an in-process [`RoutingService`] over a [`RoadNetwork`].
//!
//! Snapping returns the nearest road node.  Routing runs Dijkstra on edge
//! travel time between the snapped endpoints and synthesizes one step per
//! traversed edge plus a terminal *arrive* step:
//!
//! | Step      | distance        | bearing_before      | bearing_after       |
//! |-----------|-----------------|---------------------|---------------------|
//! | depart    | first edge      | `0`                 | first edge bearing  |
//! | edge *i*  | edge *i* length | edge *i-1* bearing  | edge *i* bearing    |
//! | arrive    | `0`             | last edge bearing   | `0`                 |
//!
//! Identical endpoints produce a zero-distance route, which callers treat as
//! degenerate.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use async_trait::async_trait;

use ft_core::{EdgeId, GeoPoint, NodeId};

use crate::network::RoadNetwork;
use crate::routing::{Maneuver, RouteLeg, RouteResponse, RouteStep, RoutingService};
use crate::{SpatialError, SpatialResult};

pub struct GraphRouter {
    network: RoadNetwork,
}

impl GraphRouter {
    pub fn new(network: RoadNetwork) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    fn nearest(&self, point: GeoPoint) -> SpatialResult<NodeId> {
        self.network
            .snap_to_node(point)
            .ok_or(SpatialError::EmptyNetwork(point))
    }

    /// Synchronous core of [`RoutingService::route`].
    pub fn route_nodes(&self, from: NodeId, to: NodeId) -> SpatialResult<RouteResponse> {
        let n = self.network.node_count();
        if from.index() >= n || to.index() >= n {
            return Err(SpatialError::NoRoute { from, to });
        }
        let edges = dijkstra(&self.network, from, to)?;
        Ok(build_response(&self.network, from, &edges))
    }
}

#[async_trait]
impl RoutingService for GraphRouter {
    async fn snap(&self, point: GeoPoint) -> SpatialResult<GeoPoint> {
        let node = self.nearest(point)?;
        Ok(self.network.position(node))
    }

    async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> SpatialResult<RouteResponse> {
        let from = self.nearest(origin)?;
        let to = self.nearest(destination)?;
        self.route_nodes(from, to)
    }
}

// ── Response synthesis ────────────────────────────────────────────────────────

fn build_response(network: &RoadNetwork, from: NodeId, edges: &[EdgeId]) -> RouteResponse {
    let start = network.position(from);
    let mut geometry = vec![start];
    let mut steps = Vec::with_capacity(edges.len() + 1);
    let mut distance = 0.0;
    let mut duration_ms: u64 = 0;
    let mut prev_bearing = 0.0;

    for &e in edges {
        let edge = network.edge(e);
        let a = network.position(edge.from);
        let b = network.position(edge.to);
        let bearing = a.bearing_to(b);
        let length = edge.length_m;

        steps.push(RouteStep {
            distance: length,
            maneuver: Maneuver { bearing_before: prev_bearing, bearing_after: bearing },
        });
        geometry.push(b);
        distance += length;
        duration_ms += edge.travel_ms as u64;
        prev_bearing = bearing;
    }

    if edges.is_empty() {
        // Same-node route: a depart/arrive pair on a two-vertex line.
        geometry.push(start);
        steps.push(RouteStep {
            distance: 0.0,
            maneuver: Maneuver { bearing_before: 0.0, bearing_after: 0.0 },
        });
    }
    steps.push(RouteStep {
        distance: 0.0,
        maneuver: Maneuver { bearing_before: prev_bearing, bearing_after: 0.0 },
    });

    RouteResponse {
        geometry,
        distance,
        duration: duration_ms as f64 / 1000.0,
        legs: vec![RouteLeg { steps }],
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Vec<EdgeId>> {
    if from == to {
        return Ok(vec![]);
    }

    let n = network.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, to));
        }
        if cost > dist[node.index()] {
            continue;
        }
        for (id, edge) in network.out_edges(node) {
            let neighbor = edge.to;
            let new_cost = cost.saturating_add(edge.travel_ms as u64);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = id;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], to: NodeId) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge(e).from;
    }
    edges.reverse();
    edges
}
