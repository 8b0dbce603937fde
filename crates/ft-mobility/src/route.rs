//! The route an agent is currently driving.

use ft_core::{LineString, Timestamp};
use ft_spatial::{RouteResponse, RouteStep};

use crate::kinematics::StepProgress;
use crate::{MobilityError, MobilityResult};

/// A selected route, owned by one agent while SEARCHING or TRAVELING.
///
/// Step progress lives here rather than on the agent so that replacing the
/// route resets it by construction.
#[derive(Debug, Clone)]
pub struct ActiveRoute {
    pub line: LineString,

    /// Measured polyline length, kilometres.
    pub distance_km: f64,

    /// Travel time after applying the agent's speed multiplier, milliseconds.
    pub duration_ms: f64,

    /// Steps of the first leg.  Always at least two (depart + arrive).
    pub steps: Vec<RouteStep>,

    pub start: Timestamp,
    pub next:  Timestamp,

    /// Expected metres covered per tick at this route's pace.
    pub hop_distance_m: f64,

    /// Index of the step being driven.  Never exceeds `steps.len() - 2`.
    pub step_reached: usize,

    /// Sum of the distances of fully completed steps, metres.
    pub covered_step_distance_m: f64,
}

impl ActiveRoute {
    /// Adopt a routing response for an agent with personal `speed`
    /// multiplier, departing at `now`.
    ///
    /// # Errors
    ///
    /// [`MobilityError::MalformedRoute`] when the response has no leg, fewer
    /// than two steps, or a positive distance with a non-positive duration;
    /// [`MobilityError::Core`] when the geometry is not a valid line.
    pub fn from_response(
        response: RouteResponse,
        speed:    f64,
        now:      Timestamp,
        tick_ms:  u32,
    ) -> MobilityResult<Self> {
        let RouteResponse { geometry, duration, legs, .. } = response;

        let steps = legs
            .into_iter()
            .next()
            .ok_or(MobilityError::MalformedRoute("route has no legs"))?
            .steps;
        if steps.len() < 2 {
            return Err(MobilityError::MalformedRoute("leg has fewer than two steps"));
        }
        if steps.iter().any(|s| !s.distance.is_finite() || s.distance < 0.0) {
            return Err(MobilityError::MalformedRoute("step distance is negative or not finite"));
        }

        let line = LineString::new(geometry)?;
        let distance_km = line.length_km();
        let duration_ms = duration * speed * 1000.0;

        let hop_distance_m = if distance_km > 0.0 {
            if !(duration_ms > 0.0) || !duration_ms.is_finite() {
                return Err(MobilityError::MalformedRoute("route has distance but no duration"));
            }
            (tick_ms as f64 / duration_ms) * distance_km * 1000.0
        } else {
            0.0
        };

        Ok(Self {
            line,
            distance_km,
            duration_ms,
            steps,
            start: now,
            next: now.after_ms(duration_ms),
            hop_distance_m,
            step_reached: 0,
            covered_step_distance_m: 0.0,
        })
    }

    /// Index of the last drivable step (the one ending at the arrival).
    #[inline]
    pub fn terminal_step(&self) -> usize {
        self.steps.len() - 2
    }

    /// Heading at the very start of the route.
    #[inline]
    pub fn initial_heading(&self) -> f64 {
        ft_core::geo::normalize_bearing(self.steps[0].maneuver.bearing_after)
    }

    /// Fraction of the route's time window elapsed at `now`, unclamped.
    ///
    /// A zero-length window yields `0.0`.
    pub fn progress(&self, now: Timestamp) -> f64 {
        let total = self.next.since(self.start) as f64;
        let p = now.since(self.start) as f64 / total;
        if p.is_finite() { p } else { 0.0 }
    }

    /// Walk `step_reached` forward so it contains `covered_m` metres of
    /// route, and report where on that step the agent is.
    ///
    /// Never walks backward and never passes [`terminal_step`](Self::terminal_step).
    pub fn advance_to(&mut self, covered_m: f64) -> StepProgress {
        let covered_m = if covered_m.is_finite() { covered_m } else { self.covered_step_distance_m };
        let last = self.terminal_step();
        while self.step_reached < last {
            let d = self.steps[self.step_reached].distance;
            if covered_m - self.covered_step_distance_m < d {
                break;
            }
            self.covered_step_distance_m += d;
            self.step_reached += 1;
        }

        let step_distance_m = self.steps[self.step_reached].distance;
        let step_covering_m = (covered_m - self.covered_step_distance_m).clamp(0.0, step_distance_m);
        StepProgress {
            step_reached: self.step_reached,
            step_covering_m,
            step_distance_m,
        }
    }
}
