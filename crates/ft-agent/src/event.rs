//! Telemetry records produced by agent ticks.
//!
//! Every record serializes to one JSON object in the shape downstream
//! geodata pipelines expect: positions are GeoJSON `Feature`s with
//! `[lon, lat]` coordinates; change and trip records are flat objects with
//! snake_case keys.
//!
//! Reported positions are always passed through GPS noise before they land
//! in a record.

use serde::Serialize;

use ft_core::{GeoPoint, RandomSource, Timestamp, VehicleId};
use ft_mobility::{ActiveRoute, GeoNoise, Motion};

use crate::Status;

// ── GeoJSON shapes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
}

/// Empty `properties` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NoProperties {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    kind:           &'static str,
    pub geometry:   Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn point(p: GeoPoint, properties: P) -> Self {
        Self { kind: "Feature", geometry: Geometry::Point(p.to_lon_lat()), properties }
    }

    pub fn line(coords: &[GeoPoint], properties: P) -> Self {
        Self {
            kind:       "Feature",
            geometry:   Geometry::LineString(coords.iter().map(|p| p.to_lon_lat()).collect()),
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    kind:         &'static str,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self { kind: "FeatureCollection", features }
    }
}

// ── Change ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Available,
    Reserved,
    Unavailable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventReason {
    ServiceStart,
    UserPickUp,
    UserDropOff,
    Maintenance,
    ServiceEnd,
}

impl EventReason {
    /// The availability class each reason belongs to.
    pub fn event_type(self) -> EventType {
        match self {
            EventReason::ServiceStart | EventReason::UserDropOff => EventType::Available,
            EventReason::UserPickUp => EventType::Reserved,
            EventReason::Maintenance | EventReason::ServiceEnd => EventType::Unavailable,
        }
    }
}

/// A status change visible to a fleet operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub vehicle_id:        VehicleId,
    pub event_time:        Timestamp,
    pub event_type:        EventType,
    pub event_type_reason: EventReason,
    pub event_location:    Feature<NoProperties>,
}

impl ChangeRecord {
    pub fn new(vehicle_id: VehicleId, event_time: Timestamp, reason: EventReason, location: GeoPoint) -> Self {
        Self {
            vehicle_id,
            event_time,
            event_type: reason.event_type(),
            event_type_reason: reason,
            event_location: Feature::point(location, NoProperties {}),
        }
    }
}

// ── Probe ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeProperties {
    pub id:     VehicleId,
    pub time:   Timestamp,
    pub status: Status,
    pub motion: Motion,
}

/// One sensor sample: noised position, status and motion.
pub type ProbeRecord = Feature<ProbeProperties>;

// ── Trace ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceProperties {
    /// Route length, kilometres.
    pub d: f64,
}

/// A selected route's noised geometry.
pub type TraceRecord = Feature<TraceProperties>;

/// Build the trace of `route` with every vertex jittered.
pub fn trace<R: RandomSource + ?Sized>(route: &ActiveRoute, noise: GeoNoise, rng: &mut R) -> TraceRecord {
    let coords = noise.jitter_line(route.line.coords(), rng);
    Feature::line(&coords, TraceProperties { d: route.distance_km })
}

// ── Trip ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripPoint {
    pub timestamp: Timestamp,
}

/// A completed (or interrupted) trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub vehicle_id:    VehicleId,
    /// Seconds.
    pub trip_duration: f64,
    /// Metres.
    pub trip_distance: f64,
    pub start_time:    Timestamp,
    pub end_time:      Timestamp,
    pub route:         FeatureCollection<TripPoint>,
}

impl TripRecord {
    /// Summarize `route`.  Vertex `i` is stamped `start + i * tick_ms`.
    pub fn new<R: RandomSource + ?Sized>(
        vehicle_id: VehicleId,
        route:      &ActiveRoute,
        tick_ms:    u32,
        noise:      GeoNoise,
        rng:        &mut R,
    ) -> Self {
        let features = route
            .line
            .coords()
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let timestamp = Timestamp(route.start.0.saturating_add(i as i64 * tick_ms as i64));
                Feature::point(noise.jitter(c, rng), TripPoint { timestamp })
            })
            .collect();

        Self {
            vehicle_id,
            trip_duration: route.duration_ms / 1000.0,
            trip_distance: route.distance_km * 1000.0,
            start_time: route.start,
            end_time: route.next,
            route: FeatureCollection::new(features),
        }
    }
}

// ── AgentEvent ────────────────────────────────────────────────────────────────

/// Everything one agent tick can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Change(ChangeRecord),
    Probe(ProbeRecord),
    Trip(TripRecord),
    Trace(TraceRecord),
}

impl AgentEvent {
    /// The change record, if this is one.
    pub fn as_change(&self) -> Option<&ChangeRecord> {
        match self {
            AgentEvent::Change(c) => Some(c),
            _ => None,
        }
    }
}
