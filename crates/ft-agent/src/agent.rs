//! The `Agent` struct: identity, sampled traits and live state.

use ft_core::{AgentId, AgentRng, GeoPoint, RandomSource, Timestamp, VehicleId};
use ft_mobility::{ActiveRoute, Motion};

use crate::{AgentConfig, Status};

/// One simulated vehicle.
///
/// Created in [`Status::Activating`] with no location; the first tick places
/// it.  All randomness an agent consumes comes from its own [`AgentRng`],
/// seeded from the fleet seed and its slot, so agents can tick concurrently
/// without affecting each other's samples.
pub struct Agent {
    pub(crate) slot:           AgentId,
    pub(crate) id:             VehicleId,
    pub(crate) status:         Status,
    /// Personal duration multiplier, `|N(1, 0.1)|`.
    pub(crate) speed:          f64,
    pub(crate) breakdown_time: Timestamp,
    pub(crate) shift_end_time: Timestamp,
    /// True position.  `None` until placed.
    pub(crate) location:       Option<GeoPoint>,
    pub(crate) motion:         Motion,
    /// Present while SEARCHING or TRAVELING.
    pub(crate) route:          Option<ActiveRoute>,
    /// End of the current idle period.
    pub(crate) next:           Timestamp,
    /// Set once the service-end change has been emitted.
    pub(crate) retired:        bool,
    pub(crate) rng:            AgentRng,
}

impl Agent {
    /// Create an agent at time `now`, sampling its speed, breakdown time,
    /// shift end and vehicle label.
    pub fn new(slot: AgentId, seed: u64, config: &AgentConfig, now: Timestamp) -> Self {
        let mut rng = AgentRng::new(seed, slot);

        let speed = rng.normal(1.0, 0.1).abs();
        let breakdown_time = now.after_ms((config.time_to_breakage * rng.normal(1.0, 1.0)).abs());
        let shift_end_time = now.after_ms((config.service_duration * rng.normal(1.0, 1.0)).abs());
        let id = VehicleId::generate(&mut rng);

        Self {
            slot,
            id,
            status: Status::Activating,
            speed,
            breakdown_time,
            shift_end_time,
            location: None,
            motion: Motion::default(),
            route: None,
            next: Timestamp::IMMEDIATE,
            retired: false,
            rng,
        }
    }

    #[inline]
    pub fn slot(&self) -> AgentId {
        self.slot
    }

    #[inline]
    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn breakdown_time(&self) -> Timestamp {
        self.breakdown_time
    }

    #[inline]
    pub fn shift_end_time(&self) -> Timestamp {
        self.shift_end_time
    }

    #[inline]
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Degrees in `[0, 360)`.
    #[inline]
    pub fn heading(&self) -> f64 {
        self.motion.heading
    }

    #[inline]
    pub fn active_route(&self) -> Option<&ActiveRoute> {
        self.route.as_ref()
    }

    /// End of the current idle period; [`Timestamp::IMMEDIATE`] when idling
    /// is disabled.
    #[inline]
    pub fn next(&self) -> Timestamp {
        self.next
    }

    /// True once the agent has emitted its service end and should be dropped.
    #[inline]
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("slot", &self.slot)
            .field("id", &self.id)
            .field("status", &self.status)
            .field("location", &self.location)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
