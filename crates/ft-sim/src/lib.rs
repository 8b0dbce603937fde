//! `ft-sim` — fleet orchestrator for the fleet-twin simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Shift end — IDLING agents past their shift end become DEACTIVATING.
//!   ② Tick      — every agent's `tick` future is polled concurrently; an
//!                 agent waiting on the routing service does not hold up
//!                 the others.
//!   ③ Emit      — each agent's events go to the observer, in ascending
//!                 slot order so output is reproducible.
//!   ④ Retire    — agents that emitted their service end are dropped.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let config = FleetConfig::from_path(Path::new("fleet.json"))?;
//! let mut fleet = FleetBuilder::new(config, density, router).build()?;
//! fleet.run(&mut NoopObserver).await;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod fleet;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::FleetBuilder;
pub use config::FleetConfig;
pub use error::{SimError, SimResult};
pub use fleet::Fleet;
pub use observer::{FleetObserver, NoopObserver};
