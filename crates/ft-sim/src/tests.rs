//! Integration tests for ft-sim.

use ft_agent::{AgentEvent, EventReason};
use ft_core::{AgentId, GeoPoint, Tick};
use ft_spatial::{DensityTable, GraphRouter, RoadNetworkBuilder, Tile};

use crate::{FleetBuilder, FleetConfig, FleetObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CENTRE: GeoPoint = GeoPoint { lon: 2.35, lat: 48.85 };

fn test_config(agents: usize, total_ticks: u64) -> FleetConfig {
    FleetConfig::from_json_str(&format!(
        r#"{{
            "agents": {agents},
            "seed": 42,
            "startTime": 0,
            "stepSize": 1000,
            "totalTicks": {total_ticks},
            "zoom": 15,
            "agent": {{
                "idleTimeBetweenTrips": 5000,
                "distanceBetweenTrips": 0.3,
                "tripDistance": 0.8,
                "timeToBreakage": 1e12,
                "serviceDuration": 1e12,
                "horizontalAccuracy": 0.002
            }}
        }}"#
    ))
    .unwrap()
}

/// Every z15 tile around [`CENTRE`] in a 3×3 block, scored 1.
fn density() -> DensityTable {
    let c = Tile::containing(CENTRE, 15);
    let mut t = DensityTable::new(15);
    for dx in 0..3 {
        for dy in 0..3 {
            let tile = Tile { x: c.x + dx - 1, y: c.y + dy - 1, z: 15 };
            t.insert(&tile.quadkey(), 1.0).unwrap();
        }
    }
    t
}

/// 9×9 road grid, ~150 m spacing, centred on [`CENTRE`].
fn grid() -> GraphRouter {
    let n = 9;
    let mut b = RoadNetworkBuilder::new();
    let ids: Vec<_> = (0..n * n)
        .map(|i| {
            let (row, col) = (i / n, i % n);
            b.add_node(GeoPoint::new(
                CENTRE.lon + (col as f64 - 4.0) * 0.002,
                CENTRE.lat + (row as f64 - 4.0) * 0.0014,
            ))
        })
        .collect();
    for row in 0..n {
        for col in 0..n {
            if col + 1 < n {
                b.add_road_at_speed(ids[row * n + col], ids[row * n + col + 1], 30.0);
            }
            if row + 1 < n {
                b.add_road_at_speed(ids[row * n + col], ids[(row + 1) * n + col], 30.0);
            }
        }
    }
    GraphRouter::new(b.build())
}

#[derive(Default)]
struct Recorder {
    ticks_started: u64,
    ticks_ended:   u64,
    final_tick:    Option<Tick>,
    events:        Vec<(AgentId, AgentEvent)>,
    active:        Vec<usize>,
}

impl FleetObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.ticks_started += 1;
    }

    fn on_events(&mut self, agent: AgentId, events: &[AgentEvent]) {
        self.events.extend(events.iter().cloned().map(|e| (agent, e)));
    }

    fn on_tick_end(&mut self, _tick: Tick, active: usize) {
        self.ticks_ended += 1;
        self.active.push(active);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.final_tick = Some(final_tick);
    }
}

impl Recorder {
    fn reasons(&self, reason: EventReason) -> usize {
        self.events
            .iter()
            .filter(|(_, e)| e.as_change().is_some_and(|c| c.event_type_reason == reason))
            .count()
    }

    fn probes(&self) -> usize {
        self.events.iter().filter(|(_, e)| matches!(e, AgentEvent::Probe(_))).count()
    }
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use ft_core::Timestamp;

    use super::*;
    use crate::SimError;

    #[test]
    fn loads_with_defaults() {
        let c = FleetConfig::from_json_str(r#"{ "agents": 3, "stepSize": 500, "totalTicks": 10 }"#).unwrap();
        assert_eq!(c.agents, 3);
        assert_eq!(c.zoom, 16);
        assert_eq!(c.seed, 0);
        assert_eq!(c.select.max_attempts, 12);
        assert_eq!(c.end_tick(), Tick(10));
        assert_eq!(c.make_clock().now(), Timestamp(0));
        assert_eq!(c.make_clock().tick_ms, 500);
    }

    #[test]
    fn rejects_zero_step() {
        let err = FleetConfig::from_json_str(r#"{ "agents": 1, "stepSize": 0, "totalTicks": 1 }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn rejects_bad_zoom() {
        let err = FleetConfig::from_json_str(r#"{ "agents": 1, "stepSize": 1, "totalTicks": 1, "zoom": 30 }"#)
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn rejects_negative_agent_parameters() {
        let err = FleetConfig::from_json_str(
            r#"{ "agents": 1, "stepSize": 1, "totalTicks": 1, "agent": { "tripDistance": -2 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Agent(_)));
    }

    #[test]
    fn rejects_non_growing_radius() {
        let err = FleetConfig::from_json_str(
            r#"{ "agents": 1, "stepSize": 1, "totalTicks": 1, "select": { "growth": 1.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(FleetConfig::from_json_str("{ agents: 1 }"), Err(SimError::Json(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "agents": 2, "stepSize": 1000, "totalTicks": 60, "seed": 9 }}"#).unwrap();
        let c = FleetConfig::from_path(file.path()).unwrap();
        assert_eq!(c.seed, 9);
    }
}

// ── FleetBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ft_mobility::SelectPolicy;

    use super::*;
    use crate::SimError;

    #[test]
    fn creates_one_agent_per_slot() {
        let fleet = FleetBuilder::new(test_config(4, 10), density(), grid()).build().unwrap();
        assert_eq!(fleet.agents.len(), 4);
        for (i, a) in fleet.agents.iter().enumerate() {
            assert_eq!(a.slot(), AgentId(i as u32));
        }
        assert_ne!(fleet.agents[0].id(), fleet.agents[1].id());
    }

    #[test]
    fn zoom_mismatch_errors() {
        let result = FleetBuilder::new(test_config(1, 10), DensityTable::new(12), grid()).build();
        assert!(matches!(result, Err(SimError::ZoomMismatch { config: 15, weights: 12 })));
    }

    #[test]
    fn overrides_replace_config_sections() {
        let fleet = FleetBuilder::new(test_config(1, 10), density(), grid())
            .select_policy(SelectPolicy { max_attempts: 3, ..Default::default() })
            .build()
            .unwrap();
        assert_eq!(fleet.config.select.max_attempts, 3);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[tokio::test]
    async fn run_visits_every_tick_and_starts_every_agent() {
        let mut fleet = FleetBuilder::new(test_config(5, 120), density(), grid()).build().unwrap();
        let mut obs = Recorder::default();
        fleet.run(&mut obs).await;

        assert_eq!(obs.ticks_started, 120);
        assert_eq!(obs.ticks_ended, 120);
        assert_eq!(obs.final_tick, Some(Tick(120)));
        assert_eq!(obs.reasons(EventReason::ServiceStart), 5);
        // Every placed agent probes every tick.
        assert_eq!(obs.probes(), 5 * 120);
        assert!(obs.reasons(EventReason::UserPickUp) > 0);
    }

    #[tokio::test]
    async fn events_arrive_in_slot_order_within_a_tick() {
        let mut fleet = FleetBuilder::new(test_config(4, 1), density(), grid()).build().unwrap();
        let mut obs = Recorder::default();
        fleet.run(&mut obs).await;

        let slots: Vec<u32> = obs.events.iter().map(|(a, _)| a.0).collect();
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(slots, sorted);
    }

    #[tokio::test]
    async fn same_seed_same_telemetry() {
        let mut a = FleetBuilder::new(test_config(3, 90), density(), grid()).build().unwrap();
        let mut b = FleetBuilder::new(test_config(3, 90), density(), grid()).build().unwrap();
        let (mut oa, mut ob) = (Recorder::default(), Recorder::default());
        a.run(&mut oa).await;
        b.run(&mut ob).await;
        assert_eq!(oa.events, ob.events);
    }

    #[tokio::test]
    async fn run_ticks_ignores_end_tick() {
        let mut fleet = FleetBuilder::new(test_config(1, 5), density(), grid()).build().unwrap();
        let mut obs = Recorder::default();
        fleet.run_ticks(8, &mut obs).await;
        assert_eq!(fleet.clock.current_tick, Tick(8));
        assert_eq!(obs.final_tick, None);
    }

    #[tokio::test]
    async fn shift_end_retires_idle_agents() {
        let mut config = test_config(3, 5);
        config.agent.service_duration = 1.0;
        config.agent.idle_time_between_trips = 1.0e9;
        let mut fleet = FleetBuilder::new(config, density(), grid()).build().unwrap();
        let mut obs = Recorder::default();
        fleet.run(&mut obs).await;

        assert_eq!(obs.reasons(EventReason::ServiceEnd), 3);
        assert!(fleet.agents.is_empty());
        assert_eq!(obs.active.last(), Some(&0));
    }
}
