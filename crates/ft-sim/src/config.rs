//! Fleet-level configuration.
//!
//! ```json
//! {
//!   "agents": 100,
//!   "seed": 42,
//!   "startTime": 1700000000000,
//!   "stepSize": 1000,
//!   "totalTicks": 3600,
//!   "zoom": 16,
//!   "agent":  { "idleTimeBetweenTrips": 300000, "tripDistance": 3 },
//!   "select": { "maxAttempts": 12 }
//! }
//! ```
//!
//! `agents`, `stepSize` and `totalTicks` are required; everything else has a
//! default.

use std::path::Path;

use serde::Deserialize;

use ft_agent::AgentConfig;
use ft_core::{SimClock, Tick, Timestamp};
use ft_mobility::SelectPolicy;

use crate::{SimError, SimResult};

fn default_zoom() -> u8 {
    16
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetConfig {
    /// Number of agents created at tick 0.
    pub agents: usize,

    /// Master seed.  The same seed always produces the same run.
    #[serde(default)]
    pub seed: u64,

    /// Timestamp of tick 0, milliseconds.
    #[serde(default)]
    pub start_time: i64,

    /// Milliseconds per tick.
    pub step_size: u32,

    pub total_ticks: u64,

    /// Quadkey level of the density table.
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub select: SelectPolicy,
}

impl FleetConfig {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: FleetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.step_size == 0 {
            return Err(SimError::Config("stepSize must be positive".into()));
        }
        if !(1..=ft_spatial::tile::MAX_ZOOM).contains(&self.zoom) {
            return Err(SimError::Config(format!(
                "zoom must be in 1..={}, got {}",
                ft_spatial::tile::MAX_ZOOM,
                self.zoom
            )));
        }
        let s = &self.select;
        if !(s.growth > 1.0) || !s.growth.is_finite() {
            return Err(SimError::Config(format!("select.growth must exceed 1, got {}", s.growth)));
        }
        if !(s.radius_ceiling_km > 0.0) || !s.radius_ceiling_km.is_finite() {
            return Err(SimError::Config("select.radiusCeilingKm must be positive".into()));
        }
        if s.max_attempts == 0 {
            return Err(SimError::Config("select.maxAttempts must be at least 1".into()));
        }
        self.agent.validate()?;
        Ok(())
    }

    /// The tick at which the run ends (exclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(Timestamp(self.start_time), self.step_size)
    }
}
