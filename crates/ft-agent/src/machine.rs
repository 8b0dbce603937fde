//! One lifecycle step per tick.
//!
//! | From          | Condition                               | To           | Events                     |
//! |---------------|-----------------------------------------|--------------|----------------------------|
//! | ACTIVATING    | placed                                  | IDLING       | `available/service_start`  |
//! | IDLING        | `now ≥ next`, search distance > 0       | SEARCHING    | trace                      |
//! | IDLING        | `now ≥ next`, search distance = 0       | TRAVELING    | `reserved/user_pick_up`, trace |
//! | IDLING        | shift over (set by the orchestrator)    | DEACTIVATING | —                          |
//! | SEARCHING     | `now ≥ route.next`                      | TRAVELING    | `reserved/user_pick_up`, trace |
//! | TRAVELING     | `now ≥ breakdown_time`                  | BROKEN       | `unavailable/maintenance`, trip |
//! | TRAVELING     | `now ≥ route.next`                      | IDLING       | `available/user_drop_off`, trip |
//! | DEACTIVATING  | first tick                              | (retired)    | `unavailable/service_end`  |
//!
//! A probe follows every tick once the agent has a location.
//!
//! When both TRAVELING exits are due on the same tick the breakdown wins: the
//! agent ends BROKEN with a single trip record.  A failed route selection or
//! placement leaves the status unchanged and emits nothing; the next tick
//! tries again.

use ft_core::{GeoPoint, RandomSource, Timestamp};
use ft_mobility::{kinematics, ActiveRoute, Motion};
use ft_spatial::{RoutingService, SpatialWeights};

use crate::event::{trace, ChangeRecord, EventReason, ProbeProperties, ProbeRecord, TripRecord};
use crate::{Agent, AgentEvent, Feature, Status, TickContext};

impl Agent {
    /// Advance the agent by one tick and return what it emitted.
    ///
    /// May suspend while route selection awaits the routing collaborator;
    /// other agents' ticks can make progress meanwhile.
    pub async fn tick<W, S>(&mut self, ctx: &TickContext<'_, W, S>) -> Vec<AgentEvent>
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        let mut events = Vec::new();

        match self.status {
            Status::Activating   => self.activate(ctx, &mut events).await,
            Status::Idling       => self.idle(ctx, &mut events).await,
            Status::Searching    => self.search(ctx, &mut events).await,
            Status::Traveling    => self.travel(ctx, &mut events),
            Status::Broken       => {}
            Status::Deactivating => self.deactivate(ctx, &mut events),
        }

        if let Some(probe) = self.probe(ctx) {
            events.push(AgentEvent::Probe(probe));
        }
        events
    }

    /// Move an IDLING agent whose shift is over to DEACTIVATING.
    ///
    /// Returns `true` if the agent changed status.
    pub fn end_shift(&mut self, now: Timestamp) -> bool {
        if self.status == Status::Idling && now >= self.shift_end_time {
            self.status = Status::Deactivating;
            true
        } else {
            false
        }
    }

    // ── States ────────────────────────────────────────────────────────────

    async fn activate<W, S>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>)
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        let location = match ctx.selector().place(&mut self.rng).await {
            Ok(p) => p,
            Err(e) => {
                log::warn!("{}: {e}; staying {}", self.id, self.status);
                return;
            }
        };

        self.location = Some(location);
        self.next = self.sample_idle(ctx);
        self.status = Status::Idling;
        events.extend(self.change(ctx, EventReason::ServiceStart));
    }

    async fn idle<W, S>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>)
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        if ctx.now < self.next {
            return;
        }

        let search = ctx.config.distance_between_trips;
        if search > 0.0 {
            let radius = self.sample_radius(search);
            if let Some(route) = self.select(ctx, radius).await {
                events.push(AgentEvent::Trace(trace(&route, ctx.noise(), &mut self.rng)));
                self.begin(route, Status::Searching);
            }
        } else {
            self.pick_up(ctx, events).await;
        }
    }

    async fn search<W, S>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>)
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        let Some(route) = self.route.as_ref() else {
            log::warn!("{}: searching without a route; back to idling", self.id);
            self.status = Status::Idling;
            return;
        };

        self.location = Some(route.line.along(route.progress(ctx.now) * route.distance_km));

        if ctx.now >= route.next {
            self.pick_up(ctx, events).await;
        }
    }

    fn travel<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>) {
        let Some(route) = self.route.as_mut() else {
            log::warn!("{}: traveling without a route; back to idling", self.id);
            self.status = Status::Idling;
            return;
        };

        let progress = route.progress(ctx.now).clamp(0.0, 1.0);
        let covered_km = progress * route.distance_km;
        self.location = Some(route.line.along(covered_km));

        let step = route.advance_to(covered_km * 1000.0);
        self.motion = kinematics::motion(&route.steps, &step, route.hop_distance_m);

        log::debug!(
            "{}: step {} ({:.1}/{:.1} m), progress {progress:.3}, heading {:.1}, accel ({:.2}, {:.2}), yaw {:.3}",
            self.id,
            step.step_reached,
            step.step_covering_m,
            step.step_distance_m,
            self.motion.heading,
            self.motion.acceleration.x,
            self.motion.acceleration.y,
            self.motion.rotation_rate.z,
        );

        let due = route.next;
        if ctx.now >= self.breakdown_time {
            self.finish_trip(ctx, Status::Broken, EventReason::Maintenance, events);
        } else if ctx.now >= due {
            self.finish_trip(ctx, Status::Idling, EventReason::UserDropOff, events);
            self.next = self.sample_idle(ctx);
        }
    }

    fn deactivate<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>) {
        if self.retired {
            return;
        }
        events.extend(self.change(ctx, EventReason::ServiceEnd));
        self.retired = true;
        log::debug!("{}: service ended", self.id);
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Pick up a customer: select a trip route and start TRAVELING.
    async fn pick_up<W, S>(&mut self, ctx: &TickContext<'_, W, S>, events: &mut Vec<AgentEvent>)
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        let radius = self.sample_radius(ctx.config.trip_distance);
        if let Some(route) = self.select(ctx, radius).await {
            events.extend(self.change(ctx, EventReason::UserPickUp));
            events.push(AgentEvent::Trace(trace(&route, ctx.noise(), &mut self.rng)));
            self.begin(route, Status::Traveling);
        }
    }

    fn begin(&mut self, route: ActiveRoute, status: Status) {
        self.motion = Motion { heading: route.initial_heading(), ..Motion::default() };
        self.route = Some(route);
        self.status = status;
    }

    fn finish_trip<W: ?Sized, S: ?Sized>(
        &mut self,
        ctx:    &TickContext<'_, W, S>,
        status: Status,
        reason: EventReason,
        events: &mut Vec<AgentEvent>,
    ) {
        self.status = status;
        events.extend(self.change(ctx, reason));
        if let Some(route) = self.route.take() {
            let trip = TripRecord::new(self.id.clone(), &route, ctx.tick_ms, ctx.noise(), &mut self.rng);
            events.push(AgentEvent::Trip(trip));
        }
        self.motion = Motion { heading: self.motion.heading, ..Motion::default() };
    }

    async fn select<W, S>(&mut self, ctx: &TickContext<'_, W, S>, radius_km: f64) -> Option<ActiveRoute>
    where
        W: SpatialWeights + ?Sized,
        S: RoutingService + ?Sized,
    {
        let origin = self.location?;
        match ctx
            .selector()
            .select(origin, radius_km, self.speed, ctx.now, ctx.tick_ms, &mut self.rng)
            .await
        {
            Ok(selection) => Some(selection.route),
            Err(e) => {
                log::warn!("{}: {e}; staying {}", self.id, self.status);
                None
            }
        }
    }

    // ── Sampling & records ────────────────────────────────────────────────

    fn sample_idle<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>) -> Timestamp {
        let idle = ctx.config.idle_time_between_trips;
        if idle > 0.0 {
            ctx.now.after_ms((idle * self.rng.normal(1.0, 1.0)).abs())
        } else {
            Timestamp::IMMEDIATE
        }
    }

    fn sample_radius(&mut self, mean_km: f64) -> f64 {
        (mean_km * self.rng.normal(1.0, 1.0)).abs()
    }

    /// `None` only for an agent that was never placed.
    fn change<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>, reason: EventReason) -> Option<AgentEvent> {
        let at = self.reported_location(ctx)?;
        Some(AgentEvent::Change(ChangeRecord::new(self.id.clone(), ctx.now, reason, at)))
    }

    fn probe<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>) -> Option<ProbeRecord> {
        let at = self.reported_location(ctx)?;
        Some(Feature::point(at, ProbeProperties {
            id:     self.id.clone(),
            time:   ctx.now,
            status: self.status,
            motion: self.motion,
        }))
    }

    fn reported_location<W: ?Sized, S: ?Sized>(&mut self, ctx: &TickContext<'_, W, S>) -> Option<GeoPoint> {
        let location = self.location?;
        Some(ctx.noise().jitter(location, &mut self.rng))
    }
}
