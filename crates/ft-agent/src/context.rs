//! Read-only inputs passed to every agent tick.

use ft_core::{SimClock, Timestamp};
use ft_mobility::{GeoNoise, RouteSelector, SelectPolicy};
use ft_spatial::{RoutingService, SpatialWeights};

use crate::AgentConfig;

/// Everything an agent may consult during one tick.
///
/// Built once per tick by the orchestrator and shared by every agent ticking
/// concurrently; agents hold no reference back to the orchestrator.
pub struct TickContext<'a, W: ?Sized, S: ?Sized> {
    /// Clock reading for this tick.
    pub now: Timestamp,

    /// Milliseconds per tick.
    pub tick_ms: u32,

    pub config:  &'a AgentConfig,
    pub weights: &'a W,
    pub routing: &'a S,
    pub policy:  &'a SelectPolicy,
}

impl<'a, W: ?Sized, S: ?Sized> TickContext<'a, W, S> {
    #[inline]
    pub fn new(
        clock:   &SimClock,
        config:  &'a AgentConfig,
        weights: &'a W,
        routing: &'a S,
        policy:  &'a SelectPolicy,
    ) -> Self {
        Self {
            now: clock.now(),
            tick_ms: clock.tick_ms,
            config,
            weights,
            routing,
            policy,
        }
    }

    #[inline]
    pub fn noise(&self) -> GeoNoise {
        GeoNoise::new(self.config.horizontal_accuracy)
    }
}

impl<'a, W, S> TickContext<'a, W, S>
where
    W: SpatialWeights + ?Sized,
    S: RoutingService + ?Sized,
{
    #[inline]
    pub fn selector(&self) -> RouteSelector<'a, W, S> {
        RouteSelector::new(self.weights, self.routing, self.policy)
    }
}
