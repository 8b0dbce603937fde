//! Road network representation and builder.
//!
//! Edges are stored sorted by source node, with a row pointer per node, so a
//! node's outgoing roads are one contiguous slice:
//!
//! ```text
//! edges[ first_out[n] .. first_out[n+1] ]
//! ```
//!
//! Nodes are also indexed in an R-tree (via `rstar`) for nearest-node
//! snapping.  Points are projected equirectangularly around the network's
//! mean latitude before insertion, so east-west and north-south offsets
//! compare in the same units.

use rstar::RTree;
use rstar::primitives::GeomWithData;

use ft_core::{EdgeId, GeoPoint, NodeId};

/// An R-tree point carrying its node.
type SnapEntry = GeomWithData<[f64; 2], NodeId>;

/// One directed road segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoadEdge {
    pub from:      NodeId,
    pub to:        NodeId,
    pub length_m:  f64,
    /// Dijkstra cost.
    pub travel_ms: u32,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph plus a spatial index for snapping.
///
/// Built with [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    positions: Vec<GeoPoint>,
    first_out: Vec<u32>,
    edges:     Vec<RoadEdge>,
    /// `cos(mean latitude)`, the longitude scale of the snapping projection.
    lon_scale: f64,
    snap_idx:  RTree<SnapEntry>,
}

impl RoadNetwork {
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.positions[node.index()]
    }

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &RoadEdge {
        &self.edges[edge.index()]
    }

    /// Outgoing edges of `node`, with their ids.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &RoadEdge)> + '_ {
        let start = self.first_out[node.index()] as usize;
        let end = self.first_out[node.index() + 1] as usize;
        self.edges[start..end]
            .iter()
            .enumerate()
            .map(move |(i, e)| (EdgeId((start + i) as u32), e))
    }

    /// Nearest road node to `pos`; `None` only for an empty network.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.snap_idx
            .nearest_neighbor(&project(pos, self.lon_scale))
            .map(|entry| entry.data)
    }
}

fn project(p: GeoPoint, lon_scale: f64) -> [f64; 2] {
    [p.lon * lon_scale, p.lat]
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ft_core::GeoPoint;
/// use ft_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(13.40, 52.52));
/// let c = b.add_node(GeoPoint::new(13.41, 52.52));
/// b.add_road(a, c, 680.0, 60_000);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // one per direction
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    positions: Vec<GeoPoint>,
    edges:     Vec<RoadEdge>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are handed out sequentially from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(pos);
        id
    }

    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, travel_ms: u32) {
        self.edges.push(RoadEdge { from, to, length_m, travel_ms });
    }

    /// A two-way road: one directed edge each way.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, travel_ms: u32) {
        self.add_directed_edge(a, b, length_m, travel_ms);
        self.add_directed_edge(b, a, length_m, travel_ms);
    }

    /// A two-way road whose length is the haversine distance between its
    /// ends and whose travel time follows from `speed_kmh`.
    pub fn add_road_at_speed(&mut self, a: NodeId, b: NodeId, speed_kmh: f64) {
        let length_m = self.positions[a.index()].distance_m(self.positions[b.index()]);
        let travel_ms = (length_m / (speed_kmh / 3.6) * 1000.0).round() as u32;
        self.add_road(a, b, length_m, travel_ms);
    }

    pub fn build(self) -> RoadNetwork {
        let Self { positions, mut edges } = self;
        edges.sort_by_key(|e| e.from);

        let mut first_out = vec![0u32; positions.len() + 1];
        for e in &edges {
            first_out[e.from.index() + 1] += 1;
        }
        for i in 1..first_out.len() {
            first_out[i] += first_out[i - 1];
        }

        let mean_lat = if positions.is_empty() {
            0.0
        } else {
            positions.iter().map(|p| p.lat).sum::<f64>() / positions.len() as f64
        };
        let lon_scale = mean_lat.to_radians().cos().max(1e-6);

        let entries = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| SnapEntry::new(project(p, lon_scale), NodeId(i as u32)))
            .collect();

        RoadNetwork {
            positions,
            first_out,
            edges,
            lon_scale,
            snap_idx: RTree::bulk_load(entries),
        }
    }
}
