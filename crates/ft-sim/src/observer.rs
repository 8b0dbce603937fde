//! Fleet observer trait for progress reporting and record collection.

use ft_agent::AgentEvent;
use ft_core::{AgentId, Tick};

/// Callbacks invoked by [`Fleet::run`][crate::Fleet::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl FleetObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, active: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {active} agents in service");
///         }
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per agent per tick with everything that agent emitted,
    /// in ascending slot order.
    fn on_events(&mut self, _agent: AgentId, _events: &[AgentEvent]) {}

    /// Called at the end of each tick.  `active` counts agents still in the
    /// fleet after retirement.
    fn on_tick_end(&mut self, _tick: Tick, _active: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}
