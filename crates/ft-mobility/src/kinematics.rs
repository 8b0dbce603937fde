//! Step-wise kinematic model: heading, linear acceleration, yaw rate.
//!
//! Everything here is a pure function of the route's steps, the agent's
//! [`StepProgress`] and the route's hop distance.  One hop is one tick,
//! which the profiles below treat as one simulated second.
//!
//! # Which maneuver matters
//!
//! In the first half of a step the agent is still finishing the maneuver
//! that *started* the step (look back, index `step_reached`).  In the second
//! half it is preparing the maneuver that *ends* the step (look ahead, index
//! `step_reached + 1`).  Departure (index 0) and arrival (the last index)
//! maneuvers are never eased.
//!
//! # Profiles
//!
//! ```text
//!  accel.y   +3 ┤  /‾\___                     ___/‾\   ┊
//!               │ /      ‾‾‾‾‾‾‾──┈┈┈┈┈┈┈┈──‾‾       \  ┊
//!             0 ┼/─────────────────────────────────── \─┤
//!            -4 ┤                                    \/ ┊
//!               0  3         10              6   3   0
//!               └ hops after step start ┘ └ hops before end ┘
//! ```
//!
//! Lateral acceleration (`x`) and yaw rate (`z`) ramp linearly from zero to
//! `1.7 * t` m/s² and `0.23 * t` rad/s over the turn's duration `t` seconds
//! (its angle at 30°/s), signed positive for right turns.

use serde::Serialize;

use ft_core::geo::{normalize_bearing, turn_delta};
use ft_spatial::RouteStep;

/// Maneuver turning rate, degrees per second.
pub const TURN_RATE_DEG_S: f64 = 30.0;

/// Lateral acceleration per second of turn duration.
pub const LATERAL_ACCEL_PER_S: f64 = 1.7;

/// Yaw rate per second of turn duration.
pub const YAW_RATE_PER_S: f64 = 0.23;

const ACCEL_PEAK: f64 = 3.0;
const ACCEL_RISE_HOPS: f64 = 3.0;
const ACCEL_END_HOPS: f64 = 10.0;
const DECEL_PEAK: f64 = -4.0;
const DECEL_FALL_HOPS: f64 = 3.0;
const DECEL_START_HOPS: f64 = 6.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Instantaneous kinematic state of a travelling agent.
///
/// Serializes with the probe field names (`rotationRate`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    /// Degrees in `[0, 360)`.
    pub heading:       f64,
    pub acceleration:  Vector3,
    pub rotation_rate: Vector3,
}

/// Where the agent is within its current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProgress {
    pub step_reached:    usize,
    /// Metres covered on the current step, in `[0, step_distance_m]`.
    pub step_covering_m: f64,
    pub step_distance_m: f64,
}

impl StepProgress {
    /// Fraction of the current step covered.  A zero-length step counts as
    /// fully covered.
    pub fn on_step(&self) -> f64 {
        if self.step_distance_m > 0.0 {
            (self.step_covering_m / self.step_distance_m).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

// ── Maneuver window ───────────────────────────────────────────────────────────

/// The maneuver nearest to the agent and its distance from it in hops.
struct Boundary {
    index:   usize,
    /// Hops remaining to the maneuver (ahead) or completed since it (behind).
    hops:    f64,
    ahead:   bool,
    /// Signed turn angle, degrees, positive clockwise.
    turn:    f64,
    /// Seconds the turn takes at [`TURN_RATE_DEG_S`].
    seconds: f64,
    /// Departure or arrival maneuver: no turn is simulated.
    exempt:  bool,
}

/// The maneuver nearest to the current position.
///
/// Both the departure and the arrival maneuver are exempt.  The arrive step
/// carries `bearing_after = 0`, so easing into it would fake a turn to north
/// at every destination.
fn boundary(steps: &[RouteStep], p: &StepProgress, hop_distance_m: f64) -> Boundary {
    let last = steps.len() - 1;
    let reached = p.step_reached.min(last.saturating_sub(1));
    let ahead = p.on_step() >= 0.5;
    let index = if ahead { reached + 1 } else { reached };

    let metres = if ahead { p.step_distance_m - p.step_covering_m } else { p.step_covering_m };
    let hops = if hop_distance_m > 0.0 { metres / hop_distance_m } else { f64::INFINITY };

    let m = steps[index].maneuver;
    let turn = turn_delta(m.bearing_before, m.bearing_after);

    Boundary {
        index,
        hops,
        ahead,
        turn,
        seconds: turn.abs() / TURN_RATE_DEG_S,
        exempt: index == 0 || index == last,
    }
}

// ── Public model ──────────────────────────────────────────────────────────────

/// Heading for the agent at `p`, in `[0, 360)`.
///
/// Interpolates from the current step's outgoing bearing to the next step's
/// incoming bearing along the shorter arc; within half a turn-duration of a
/// non-exempt maneuver the eased maneuver heading takes over.
pub fn heading(steps: &[RouteStep], p: &StepProgress, hop_distance_m: f64) -> f64 {
    if steps.len() < 2 {
        return 0.0;
    }
    let reached = p.step_reached.min(steps.len() - 2);
    let from = steps[reached].maneuver.bearing_after;
    let to = steps[reached + 1].maneuver.bearing_before;
    let base = normalize_bearing(from + turn_delta(from, to) * p.on_step());

    let b = boundary(steps, p, hop_distance_m);
    if b.exempt || !(b.seconds > 0.0) {
        return base;
    }

    let half = b.seconds / 2.0;
    let eased = if b.hops > half {
        0.0
    } else if b.ahead {
        (half - b.hops) / b.seconds
    } else {
        (b.hops + half) / b.seconds
    };

    if eased > 0.0 {
        normalize_bearing(steps[b.index].maneuver.bearing_before + b.turn * eased)
    } else {
        base
    }
}

/// Linear acceleration and rotation rate for the agent at `p`.
pub fn acceleration(steps: &[RouteStep], p: &StepProgress, hop_distance_m: f64) -> (Vector3, Vector3) {
    if steps.len() < 2 {
        return (Vector3::default(), Vector3::default());
    }
    let b = boundary(steps, p, hop_distance_m);

    let y = if b.ahead {
        if b.hops <= DECEL_FALL_HOPS {
            b.hops / DECEL_FALL_HOPS * DECEL_PEAK
        } else if b.hops <= DECEL_START_HOPS {
            (DECEL_START_HOPS - b.hops) / DECEL_FALL_HOPS * DECEL_PEAK
        } else {
            0.0
        }
    } else if b.hops <= ACCEL_RISE_HOPS {
        b.hops / ACCEL_RISE_HOPS * ACCEL_PEAK
    } else if b.hops <= ACCEL_END_HOPS {
        (ACCEL_END_HOPS - b.hops) / (ACCEL_END_HOPS - ACCEL_RISE_HOPS) * ACCEL_PEAK
    } else {
        0.0
    };

    let (x, z) = if b.exempt || !(b.seconds > 0.0) || b.hops > b.seconds {
        (0.0, 0.0)
    } else {
        let ramp = (b.seconds - b.hops) / b.seconds;
        let sign = if b.turn >= 0.0 { 1.0 } else { -1.0 };
        (
            ramp * sign * LATERAL_ACCEL_PER_S * b.seconds,
            ramp * sign * YAW_RATE_PER_S * b.seconds,
        )
    };

    (Vector3 { x, y, z: 0.0 }, Vector3 { x: 0.0, y: 0.0, z })
}

/// Heading, acceleration and rotation rate in one call.
pub fn motion(steps: &[RouteStep], p: &StepProgress, hop_distance_m: f64) -> Motion {
    let (acceleration, rotation_rate) = acceleration(steps, p, hop_distance_m);
    Motion {
        heading: heading(steps, p, hop_distance_m),
        acceleration,
        rotation_rate,
    }
}
