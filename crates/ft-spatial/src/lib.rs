//! `ft-spatial` — spatial density, tile cover, and routing collaborators.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`tile`]    | `Tile` (x/y/zoom), quadkey codec, bounding boxes, `cover_disk`   |
//! | [`density`] | `SpatialWeights` trait, `DensityTable`, CSV loader               |
//! | [`routing`] | `RoutingService` (async snap + route), `RouteResponse` and steps |
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`               |
//! | [`router`]  | `GraphRouter` — in-process `RoutingService` over a `RoadNetwork` |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                               |
//!
//! The simulation core only depends on the [`SpatialWeights`] and
//! [`RoutingService`] traits.  `GraphRouter` is a self-contained backend for
//! tests and demos; production runs plug in a client for an external
//! snapping/routing service instead.

pub mod density;
pub mod error;
pub mod network;
pub mod router;
pub mod routing;
pub mod tile;


pub use density::{DensityTable, SpatialWeights, load_density_csv, load_density_reader};
pub use error::{SpatialError, SpatialResult};
pub use network::{RoadEdge, RoadNetwork, RoadNetworkBuilder};
pub use router::GraphRouter;
pub use routing::{Maneuver, RouteLeg, RouteResponse, RouteStep, RoutingService};
pub use tile::{BBox, Tile, cover_disk};
