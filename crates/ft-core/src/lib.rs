//! `ft-core` — foundational types for the `fleet-twin` telemetry simulator.
//!
//! This crate is a dependency of every other `ft-*` crate.  It intentionally
//! has no `ft-*` dependencies and minimal external ones (`rand`,
//! `rand_distr` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`, `VehicleId` (`ABC-1234`)   |
//! | [`geo`]         | `GeoPoint`, `LineString`, haversine / destination / along |
//! | [`time`]        | `Tick`, `Timestamp`, `SimClock`                           |
//! | [`rng`]         | `RandomSource` trait, `AgentRng` (per-agent)              |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, LineString};
pub use ids::{AgentId, EdgeId, NodeId, VehicleId};
pub use rng::{AgentRng, RandomSource};
pub use time::{SimClock, Tick, Timestamp};
