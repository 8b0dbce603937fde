//! The `Fleet` struct and its tick loop.

use futures::future::join_all;

use ft_agent::{Agent, TickContext};
use ft_core::{SimClock, Tick};
use ft_spatial::{RoutingService, SpatialWeights};

use crate::{FleetConfig, FleetObserver};

/// The fleet orchestrator.
///
/// Owns the clock, the agents and the shared collaborators.  Agents see the
/// collaborators only through the [`TickContext`] built for each tick.
///
/// Create via [`FleetBuilder`][crate::FleetBuilder].
pub struct Fleet<W, S> {
    pub config: FleetConfig,

    /// Maps the current tick to a timestamp.
    pub clock: SimClock,

    /// Agents in service, in ascending slot order.  Retired agents are
    /// removed at the end of the tick they retire in.
    pub agents: Vec<Agent>,

    /// Spatial density used for placement and destination sampling.
    pub weights: W,

    /// Snapping and routing backend.
    pub routing: S,
}

impl<W: SpatialWeights, S: RoutingService> Fleet<W, S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub async fn run<O: FleetObserver>(&mut self, observer: &mut O) {
        log::info!(
            "fleet of {} agents starting at {} for {} ticks",
            self.agents.len(),
            self.clock,
            self.config.total_ticks
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer).await;
        }
        observer.on_sim_end(self.clock.current_tick);
        log::info!("fleet finished at {} with {} agents in service", self.clock, self.agents.len());
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub async fn run_ticks<O: FleetObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer).await;
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    async fn step<O: FleetObserver>(&mut self, observer: &mut O) {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);
        self.process_tick(tick, observer).await;
        observer.on_tick_end(tick, self.agents.len());
        self.clock.advance();
    }

    async fn process_tick<O: FleetObserver>(&mut self, tick: Tick, observer: &mut O) {
        let now = self.clock.now();

        // ── Phase 1: shift end ────────────────────────────────────────────
        for agent in &mut self.agents {
            if agent.end_shift(now) {
                log::debug!("{tick}: {} shift over", agent.id());
            }
        }

        // ── Phase 2: concurrent agent ticks ───────────────────────────────
        let ctx = TickContext::new(
            &self.clock,
            &self.config.agent,
            &self.weights,
            &self.routing,
            &self.config.select,
        );
        let emitted = join_all(self.agents.iter_mut().map(|agent| agent.tick(&ctx))).await;

        // ── Phase 3: hand events over in slot order ───────────────────────
        for (agent, events) in self.agents.iter().zip(&emitted) {
            if !events.is_empty() {
                observer.on_events(agent.slot(), events);
            }
        }

        // ── Phase 4: retirement ───────────────────────────────────────────
        let before = self.agents.len();
        self.agents.retain(|a| !a.is_retired());
        let retired = before - self.agents.len();
        if retired > 0 {
            log::info!("{tick}: retired {retired} agents, {} in service", self.agents.len());
        }
    }
}
