//! `ft-agent` — the per-vehicle simulation engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`status`]  | `Status` — the six lifecycle states and their legal edges       |
//! | [`config`]  | `AgentConfig` — trip, idle, breakdown and shift parameters      |
//! | [`context`] | `TickContext` — clock reading plus shared collaborators         |
//! | [`agent`]   | `Agent` — identity, sampled traits, position, active route      |
//! | [`machine`] | `Agent::tick` — one lifecycle step, returning events            |
//! | [`event`]   | `AgentEvent` and the GeoJSON-shaped telemetry records           |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Events, not writes
//!
//! `tick` never performs I/O.  Every status change, trip, route trace and
//! probe it produces comes back as an [`AgentEvent`]; handing those to a sink
//! is the orchestrator's job.  This keeps the state machine testable against
//! scripted collaborators.

pub mod agent;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod machine;
pub mod status;


pub use agent::Agent;
pub use config::AgentConfig;
pub use context::TickContext;
pub use error::{AgentError, AgentResult};
pub use event::{
    AgentEvent, ChangeRecord, EventReason, EventType, Feature, FeatureCollection, Geometry,
    ProbeProperties, ProbeRecord, TraceProperties, TraceRecord, TripPoint, TripRecord,
};
pub use status::Status;
