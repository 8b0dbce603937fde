//! `ft-mobility` — how an agent picks routes and moves along them.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`route`]      | `ActiveRoute` — one selected route plus step progress          |
//! | [`selector`]   | `RouteSelector`, `SelectPolicy` — density-weighted destination |
//! |                | sampling, snapping, routing, bounded retry                     |
//! | [`kinematics`] | pure heading / acceleration / yaw-rate model                   |
//! | [`noise`]      | `GeoNoise` — GPS jitter for externally visible positions       |
//! | [`error`]      | `MobilityError`, `SelectError`                                 |
//!
//! # Movement model
//!
//! Position along a route is linear in time: at `now` the agent has covered
//! `(now - start) / (next - start)` of the measured polyline.  Kinematics are
//! derived from where that puts the agent relative to the route's maneuver
//! steps, measured in *hops* (the distance covered per tick).

pub mod error;
pub mod kinematics;
pub mod noise;
pub mod route;
pub mod selector;

#[cfg(test)]
mod tests;

pub use error::{MobilityError, MobilityResult, SelectError};
pub use kinematics::{Motion, StepProgress, Vector3};
pub use noise::GeoNoise;
pub use route::ActiveRoute;
pub use selector::{RouteSelector, SelectPolicy, Selection};
