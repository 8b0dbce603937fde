//! Fluent builder for constructing a [`Fleet`].

use ft_agent::{Agent, AgentConfig};
use ft_core::AgentId;
use ft_mobility::SelectPolicy;
use ft_spatial::{RoutingService, SpatialWeights};

use crate::{Fleet, FleetConfig, SimError, SimResult};

/// Fluent builder for [`Fleet<W, S>`].
///
/// # Required inputs
///
/// - [`FleetConfig`] — agent count, seed, clock, nested agent parameters
/// - `W: SpatialWeights` — e.g. [`ft_spatial::DensityTable`]
/// - `S: RoutingService` — e.g. [`ft_spatial::GraphRouter`]
///
/// # Optional overrides
///
/// | Method               | Default              |
/// |----------------------|----------------------|
/// | `.agent_config(c)`   | `config.agent`       |
/// | `.select_policy(p)`  | `config.select`      |
///
/// # Example
///
/// ```rust,ignore
/// let mut fleet = FleetBuilder::new(config, density, router)
///     .select_policy(SelectPolicy { max_attempts: 4, ..Default::default() })
///     .build()?;
/// fleet.run(&mut NoopObserver).await;
/// ```
pub struct FleetBuilder<W, S> {
    config:  FleetConfig,
    weights: W,
    routing: S,
}

impl<W: SpatialWeights, S: RoutingService> FleetBuilder<W, S> {
    pub fn new(config: FleetConfig, weights: W, routing: S) -> Self {
        Self { config, weights, routing }
    }

    pub fn agent_config(mut self, agent: AgentConfig) -> Self {
        self.config.agent = agent;
        self
    }

    pub fn select_policy(mut self, select: SelectPolicy) -> Self {
        self.config.select = select;
        self
    }

    /// Validate inputs, create the agents and return a ready-to-run
    /// [`Fleet`].
    pub fn build(self) -> SimResult<Fleet<W, S>> {
        self.config.validate()?;
        if self.weights.zoom() != self.config.zoom {
            return Err(SimError::ZoomMismatch {
                config:  self.config.zoom,
                weights: self.weights.zoom(),
            });
        }

        let clock = self.config.make_clock();
        let agents = (0..self.config.agents)
            .map(|i| {
                let slot = AgentId::try_from(i)
                    .map_err(|_| SimError::Config(format!("too many agents: {}", self.config.agents)))?;
                Ok(Agent::new(slot, self.config.seed, &self.config.agent, clock.now()))
            })
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Fleet {
            config: self.config,
            clock,
            agents,
            weights: self.weights,
            routing: self.routing,
        })
    }
}
