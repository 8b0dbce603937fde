//! Per-agent behaviour parameters.
//!
//! Keys are camelCase so existing JSON fleet configs load unchanged:
//!
//! ```json
//! {
//!   "idleTimeBetweenTrips": 300000,
//!   "distanceBetweenTrips": 1.0,
//!   "tripDistance": 3.0,
//!   "timeToBreakage": 86400000,
//!   "serviceDuration": 28800000,
//!   "horizontalAccuracy": 0.005
//! }
//! ```

use serde::Deserialize;

use crate::{AgentError, AgentResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Mean idle time after a drop-off, milliseconds.  `0` disables idling.
    pub idle_time_between_trips: f64,

    /// Mean radius searched for a customer, kilometres.  `0` skips SEARCHING.
    pub distance_between_trips: f64,

    /// Mean trip radius, kilometres.
    pub trip_distance: f64,

    /// Mean time until the vehicle breaks down, milliseconds.
    pub time_to_breakage: f64,

    /// Mean shift length, milliseconds.
    pub service_duration: f64,

    /// GPS noise standard deviation, kilometres.
    pub horizontal_accuracy: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            idle_time_between_trips: 300_000.0,
            distance_between_trips:  1.0,
            trip_distance:           3.0,
            time_to_breakage:        86_400_000.0,
            service_duration:        28_800_000.0,
            horizontal_accuracy:     0.005,
        }
    }
}

impl AgentConfig {
    /// Reject negative or non-finite parameters.
    pub fn validate(&self) -> AgentResult<()> {
        let fields = [
            ("idleTimeBetweenTrips", self.idle_time_between_trips),
            ("distanceBetweenTrips", self.distance_between_trips),
            ("tripDistance",         self.trip_distance),
            ("timeToBreakage",       self.time_to_breakage),
            ("serviceDuration",      self.service_duration),
            ("horizontalAccuracy",   self.horizontal_accuracy),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AgentError::Config(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}
