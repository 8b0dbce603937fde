//! The snapping/routing collaborator contract.
//!
//! The shapes mirror the responses of common open-source routing engines:
//! a route has a polyline geometry, a total distance in **metres**, a total
//! duration in **seconds**, and legs made of steps.  Each step carries its
//! own distance and the compass bearings immediately before and after the
//! maneuver that starts it.

use async_trait::async_trait;

use ft_core::GeoPoint;

use crate::SpatialResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maneuver {
    pub bearing_before: f64,
    pub bearing_after:  f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    /// Metres from this maneuver to the next one.
    pub distance: f64,
    pub maneuver: Maneuver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
}

/// A route as returned by a [`RoutingService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub geometry: Vec<GeoPoint>,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub legs:     Vec<RouteLeg>,
}

/// Asynchronous snapping and routing backend.
///
/// Both calls may fail; callers treat any error as transient.
///
/// # Thread safety
///
/// One service instance is shared by every agent and polled from many
/// concurrent agent ticks, so implementations must be `Send + Sync`.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Move `point` onto the routable network.
    async fn snap(&self, point: GeoPoint) -> SpatialResult<GeoPoint>;

    /// Compute a route from `origin` to `destination`.
    async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> SpatialResult<RouteResponse>;
}
