//! Density-weighted destination sampling with bounded retry.
//!
//! # Algorithm (one attempt)
//!
//! 1. Cover the disk of `radius` around the origin with cells at the weights'
//!    zoom level.
//! 2. Pick one cell, weighted by density score (absent cells score `0`).
//! 3. Pick a uniform point in the cell's bounding box and snap it.
//! 4. Route from the origin to the snapped point and adopt the response.
//!
//! An attempt that errors, or that produces a zero-length route, is retried
//! with the radius multiplied by [`SelectPolicy::growth`]; a zero radius
//! restarts from one density cell's width.  Retrying stops
//! after [`SelectPolicy::max_attempts`] attempts or once a failure happens at
//! [`SelectPolicy::radius_ceiling_km`], whichever comes first.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use ft_core::{GeoPoint, RandomSource, Timestamp};
use ft_spatial::{RoutingService, SpatialError, SpatialResult, SpatialWeights, Tile};

use crate::route::ActiveRoute;
use crate::{MobilityError, MobilityResult, SelectError};

// ── SelectPolicy ──────────────────────────────────────────────────────────────

/// Retry bounds for route selection and placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectPolicy {
    /// Attempts per call, including the first.
    pub max_attempts: u32,

    /// Largest radius ever searched, kilometres.
    pub radius_ceiling_km: f64,

    /// Radius multiplier applied after each failed attempt.
    pub growth: f64,

    /// Largest disk cover accepted; bigger covers fail the attempt.
    pub max_cover_tiles: u64,

    /// Deadline for each snap or route request.  `None` waits indefinitely.
    pub request_timeout_ms: Option<u64>,
}

impl Default for SelectPolicy {
    fn default() -> Self {
        Self {
            max_attempts:       12,
            radius_ceiling_km:  200.0,
            growth:             1.5,
            max_cover_tiles:    4_096,
            request_timeout_ms: None,
        }
    }
}

/// A successful selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub route:     ActiveRoute,
    /// Radius of the attempt that succeeded, kilometres.
    pub radius_km: f64,
    /// 1-based number of the attempt that succeeded.
    pub attempts:  u32,
}

// ── RouteSelector ─────────────────────────────────────────────────────────────

/// Borrowed view of the collaborators needed to pick destinations.
///
/// Cheap to build; the agent state machine creates one per tick from its
/// context.
pub struct RouteSelector<'a, W: ?Sized, S: ?Sized> {
    weights: &'a W,
    routing: &'a S,
    policy:  &'a SelectPolicy,
}

impl<'a, W, S> RouteSelector<'a, W, S>
where
    W: SpatialWeights + ?Sized,
    S: RoutingService + ?Sized,
{
    pub fn new(weights: &'a W, routing: &'a S, policy: &'a SelectPolicy) -> Self {
        Self { weights, routing, policy }
    }

    /// Select a non-degenerate route starting at `origin`.
    ///
    /// `speed` and `tick_ms` are forwarded to
    /// [`ActiveRoute::from_response`]; the route departs at `now`.
    ///
    /// # Errors
    ///
    /// [`SelectError::Exhausted`] when no attempt produced a usable route.
    pub async fn select<R: RandomSource + ?Sized>(
        &self,
        origin:    GeoPoint,
        radius_km: f64,
        speed:     f64,
        now:       Timestamp,
        tick_ms:   u32,
        rng:       &mut R,
    ) -> Result<Selection, SelectError> {
        let ceiling = self.policy.radius_ceiling_km;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut radius = if radius_km.is_finite() { radius_km.max(0.0).min(ceiling) } else { ceiling };

        for attempt in 1..=max_attempts {
            match self.attempt(origin, radius, speed, now, tick_ms, rng).await {
                Ok(route) if route.distance_km > 0.0 => {
                    log::debug!(
                        "route selected on attempt {attempt}: {:.3} km, {} steps, radius {radius:.3} km",
                        route.distance_km,
                        route.steps.len()
                    );
                    return Ok(Selection { route, radius_km: radius, attempts: attempt });
                }
                Ok(_) => log::debug!("attempt {attempt}: degenerate route at radius {radius:.3} km"),
                Err(e) => log::debug!("attempt {attempt}: {e} at radius {radius:.3} km"),
            }

            if attempt == max_attempts || radius >= ceiling {
                log::warn!("route selection from {origin} gave up after {attempt} attempts");
                return Err(SelectError::Exhausted { attempts: attempt, radius_km: radius });
            }
            radius = self.widen(origin, radius).min(ceiling);
        }

        Err(SelectError::Exhausted { attempts: max_attempts, radius_km: radius })
    }

    /// Pick an initial location: a density-weighted cell among all scored
    /// cells, a uniform point inside it, snapped.
    ///
    /// # Errors
    ///
    /// [`SelectError::PlacementExhausted`] when every attempt failed.
    pub async fn place<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<GeoPoint, SelectError> {
        let max_attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let placed = match rng.weighted_index(self.weights.scores()) {
                Some(i) => self.snap_in_cell(&self.weights.keys()[i], rng).await,
                None => Err(SpatialError::NoWeightedCell.into()),
            };
            match placed {
                Ok(p) => return Ok(p),
                Err(e) => log::debug!("placement attempt {attempt}: {e}"),
            }
        }
        log::warn!("placement gave up after {max_attempts} attempts");
        Err(SelectError::PlacementExhausted { attempts: max_attempts })
    }

    /// Next radius after a failed attempt.  A zero radius restarts from the
    /// width of one density cell at the origin so retries always widen.
    fn widen(&self, origin: GeoPoint, radius_km: f64) -> f64 {
        if radius_km > 0.0 {
            return radius_km * self.policy.growth;
        }
        let bb = Tile::containing(origin, self.weights.zoom()).bbox();
        GeoPoint::new(bb.west, origin.lat).distance_km(GeoPoint::new(bb.east, origin.lat))
    }

    async fn attempt<R: RandomSource + ?Sized>(
        &self,
        origin:    GeoPoint,
        radius_km: f64,
        speed:     f64,
        now:       Timestamp,
        tick_ms:   u32,
        rng:       &mut R,
    ) -> MobilityResult<ActiveRoute> {
        let keys = self.weights.cover(origin, radius_km, self.policy.max_cover_tiles)?;
        let scores: Vec<f64> = keys.iter().map(|k| self.weights.score(k)).collect();
        let pick = rng.weighted_index(&scores).ok_or(SpatialError::NoWeightedCell)?;

        let destination = self.snap_in_cell(&keys[pick], rng).await?;
        let response = self.bounded(self.routing.route(origin, destination)).await?;
        ActiveRoute::from_response(response, speed, now, tick_ms)
    }

    async fn snap_in_cell<R: RandomSource + ?Sized>(&self, quadkey: &str, rng: &mut R) -> MobilityResult<GeoPoint> {
        let bb = Tile::from_quadkey(quadkey)?.bbox();
        let p = GeoPoint::new(rng.uniform(bb.west, bb.east), rng.uniform(bb.south, bb.north));
        self.bounded(self.routing.snap(p)).await
    }

    async fn bounded<T, F>(&self, request: F) -> MobilityResult<T>
    where
        F: Future<Output = SpatialResult<T>>,
    {
        match self.policy.request_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), request)
                .await
                .map_err(|_| MobilityError::Timeout(ms))?
                .map_err(MobilityError::from),
            None => Ok(request.await?),
        }
    }
}
