//! Unit tests for ft-mobility.

#[cfg(test)]
mod helpers {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use ft_core::GeoPoint;
    use ft_spatial::{
        DensityTable, Maneuver, RouteLeg, RouteResponse, RouteStep, RoutingService, SpatialError,
        SpatialResult, Tile,
    };

    pub const ORIGIN: GeoPoint = GeoPoint { lon: 13.40, lat: 52.52 };

    pub fn step(distance: f64, before: f64, after: f64) -> RouteStep {
        RouteStep { distance, maneuver: Maneuver { bearing_before: before, bearing_after: after } }
    }

    /// Depart heading 45°, 100 m; turn right to 135°, 100 m; arrive.
    pub fn right_turn_steps() -> Vec<RouteStep> {
        vec![step(100.0, 0.0, 45.0), step(100.0, 45.0, 135.0), step(0.0, 135.0, 0.0)]
    }

    /// A straight two-vertex response with `duration` seconds.
    pub fn straight_response(from: GeoPoint, to: GeoPoint, duration: f64) -> RouteResponse {
        let distance = from.distance_m(to);
        let bearing = from.bearing_to(to);
        RouteResponse {
            geometry: vec![from, to],
            distance,
            duration,
            legs: vec![RouteLeg { steps: vec![step(distance, 0.0, bearing), step(0.0, bearing, 0.0)] }],
        }
    }

    /// A table holding only the zoom-14 cell containing [`ORIGIN`].
    pub fn origin_table() -> DensityTable {
        let mut t = DensityTable::new(14);
        t.insert(&Tile::containing(ORIGIN, 14).quadkey(), 1.0).unwrap();
        t
    }

    /// Routing double: snaps to the input point; the first `failures` route
    /// calls error, the next `degenerate` return zero-length routes, the rest
    /// succeed.  Optionally sleeps before answering.
    #[derive(Default)]
    pub struct Scripted {
        pub failures:    u32,
        pub degenerate:  u32,
        pub delay:       Option<Duration>,
        pub route_calls: AtomicU32,
        pub snap_calls:  AtomicU32,
    }

    impl Scripted {
        pub fn routes(&self) -> u32 {
            self.route_calls.load(Ordering::SeqCst)
        }

        pub fn snaps(&self) -> u32 {
            self.snap_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoutingService for Scripted {
        async fn snap(&self, point: GeoPoint) -> SpatialResult<GeoPoint> {
            self.snap_calls.fetch_add(1, Ordering::SeqCst);
            Ok(point)
        }

        async fn route(&self, origin: GeoPoint, destination: GeoPoint) -> SpatialResult<RouteResponse> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            let n = self.route_calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(SpatialError::Service("scripted failure".into()))
            } else if n < self.failures + self.degenerate {
                Ok(RouteResponse {
                    geometry: vec![origin, origin],
                    distance: 0.0,
                    duration: 0.0,
                    legs: vec![RouteLeg { steps: vec![step(0.0, 0.0, 0.0), step(0.0, 0.0, 0.0)] }],
                })
            } else {
                Ok(straight_response(origin, destination, 120.0))
            }
        }
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod kinematics {
    use super::helpers::{right_turn_steps, step};
    use crate::kinematics::{acceleration, heading, motion};
    use crate::StepProgress;

    fn at(step_reached: usize, covering: f64) -> StepProgress {
        StepProgress { step_reached, step_covering_m: covering, step_distance_m: 100.0 }
    }

    #[test]
    fn first_instant_heading_is_departure_bearing() {
        let steps = right_turn_steps();
        assert_eq!(heading(&steps, &at(0, 0.0), 10.0), 45.0);
    }

    #[test]
    fn easing_takes_over_near_a_turn() {
        let steps = right_turn_steps();
        // Half a hop before a 90° turn (3 s window, half-window 1.5 s):
        // eased progress (1.5 - 0.5) / 3.
        let h = heading(&steps, &at(0, 95.0), 10.0);
        assert!((h - 75.0).abs() < 1e-9, "{h}");
    }

    #[test]
    fn outside_easing_window_interpolates() {
        let steps = vec![step(100.0, 0.0, 10.0), step(100.0, 20.0, 20.0), step(0.0, 20.0, 0.0)];
        // Step 1 has no turn, so only the base interpolation applies.
        let h = heading(&steps, &at(0, 50.0), 10.0);
        assert!((h - 15.0).abs() < 1e-9, "{h}");
    }

    #[test]
    fn heading_wraps_through_north() {
        let steps = vec![step(100.0, 0.0, 350.0), step(100.0, 10.0, 10.0), step(0.0, 10.0, 0.0)];
        for i in 0..=100 {
            let h = heading(&steps, &at(0, i as f64), 10.0);
            assert!((0.0..360.0).contains(&h), "{h}");
            assert!(h >= 350.0 || h <= 10.0, "took the long way round: {h}");
        }
    }

    #[test]
    fn headings_stay_in_range_everywhere() {
        let steps = vec![
            step(80.0, 0.0, 359.9),
            step(40.0, 359.9, 181.0),
            step(60.0, 181.0, 0.1),
            step(0.0, 0.1, 0.0),
        ];
        for reached in 0..3 {
            for c in 0..=steps[reached].distance as usize {
                let p = StepProgress {
                    step_reached:    reached,
                    step_covering_m: c as f64,
                    step_distance_m: steps[reached].distance,
                };
                for hop in [0.0, 0.5, 7.0, 1e6] {
                    let h = heading(&steps, &p, hop);
                    assert!((0.0..360.0).contains(&h), "{h}");
                }
            }
        }
    }

    #[test]
    fn acceleration_after_a_turn() {
        let steps = right_turn_steps();
        let (a, r) = acceleration(&steps, &at(1, 15.0), 10.0);
        // 1.5 hops past the step start: rising leg of the +3 profile.
        assert!((a.y - 1.5).abs() < 1e-9);
        // Halfway through a 3 s turn, right-hand.
        assert!((a.x - 0.5 * 1.7 * 3.0).abs() < 1e-9);
        assert!((r.z - 0.5 * 0.23 * 3.0).abs() < 1e-9);
        assert_eq!(r.x, 0.0);
        assert_eq!(a.z, 0.0);
    }

    #[test]
    fn acceleration_profile_decays_back_to_zero() {
        let steps = right_turn_steps();
        let (a, _) = acceleration(&steps, &at(1, 32.5), 5.0); // 6.5 hops behind
        assert!((a.y - 3.5 / 7.0 * 3.0).abs() < 1e-9);
        let (a, _) = acceleration(&steps, &at(1, 22.5), 5.0); // 4.5 hops behind
        assert!((a.y - 5.5 / 7.0 * 3.0).abs() < 1e-9);
        let (a, _) = acceleration(&steps, &at(0, 40.0), 10.0); // 4 hops behind, departure
        assert!((a.y - 6.0 / 7.0 * 3.0).abs() < 1e-9);
        let (a, _) = acceleration(&steps, &at(0, 49.0), 1.0); // 49 hops behind
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn braking_before_arrival_without_lateral() {
        let steps = right_turn_steps();
        let (a, r) = acceleration(&steps, &at(1, 90.0), 10.0);
        assert!((a.y + 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(a.x, 0.0);
        assert_eq!(r.z, 0.0);

        let (a, _) = acceleration(&steps, &at(1, 55.0), 10.0); // 4.5 hops ahead
        assert!((a.y - 1.5 / 3.0 * -4.0).abs() < 1e-9);
    }

    #[test]
    fn left_turns_are_negative() {
        let steps = vec![step(100.0, 0.0, 90.0), step(100.0, 90.0, 0.0), step(0.0, 0.0, 0.0)];
        let (a, r) = acceleration(&steps, &at(0, 95.0), 10.0);
        assert!(a.x < 0.0);
        assert!(r.z < 0.0);
    }

    #[test]
    fn zero_hop_distance_is_inert() {
        let steps = right_turn_steps();
        let m = motion(&steps, &at(0, 99.0), 0.0);
        assert_eq!(m.acceleration.y, 0.0);
        assert_eq!(m.acceleration.x, 0.0);
        assert_eq!(m.rotation_rate.z, 0.0);
        assert!((0.0..360.0).contains(&m.heading));
    }

    #[test]
    fn zero_length_step_counts_as_covered() {
        let p = StepProgress { step_reached: 0, step_covering_m: 0.0, step_distance_m: 0.0 };
        assert_eq!(p.on_step(), 1.0);
    }
}

// ── ActiveRoute ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use ft_core::{GeoPoint, Timestamp};
    use ft_spatial::{RouteLeg, RouteResponse};

    use super::helpers::{right_turn_steps, straight_response, ORIGIN};
    use crate::{ActiveRoute, MobilityError};

    fn turn_route() -> ActiveRoute {
        let response = RouteResponse {
            geometry: vec![ORIGIN, ORIGIN.destination(0.1, 45.0), ORIGIN.destination(0.2, 90.0)],
            distance: 200.0,
            duration: 20.0,
            legs:     vec![RouteLeg { steps: right_turn_steps() }],
        };
        ActiveRoute::from_response(response, 1.0, Timestamp(0), 1_000).unwrap()
    }

    #[test]
    fn duration_scales_with_speed() {
        let to = ORIGIN.destination(1.0, 90.0);
        let r = ActiveRoute::from_response(straight_response(ORIGIN, to, 100.0), 1.2, Timestamp(5_000), 1_000)
            .unwrap();
        assert!((r.duration_ms - 120_000.0).abs() < 1e-6);
        assert_eq!(r.start, Timestamp(5_000));
        assert_eq!(r.next, Timestamp(125_000));
        assert!((r.distance_km - 1.0).abs() < 1e-6);
        // 1 km over 120 ticks.
        assert!((r.hop_distance_m - 1000.0 / 120.0).abs() < 1e-3);
        assert_eq!(r.step_reached, 0);
        assert_eq!(r.covered_step_distance_m, 0.0);
    }

    #[test]
    fn initial_heading_is_first_post_maneuver_bearing() {
        assert_eq!(turn_route().initial_heading(), 45.0);
    }

    #[test]
    fn rejects_short_legs() {
        let mut response = straight_response(ORIGIN, GeoPoint::new(13.41, 52.52), 10.0);
        response.legs[0].steps.truncate(1);
        let err = ActiveRoute::from_response(response, 1.0, Timestamp(0), 1_000).unwrap_err();
        assert!(matches!(err, MobilityError::MalformedRoute(_)));
    }

    #[test]
    fn rejects_distance_without_duration() {
        let response = straight_response(ORIGIN, GeoPoint::new(13.41, 52.52), 0.0);
        assert!(ActiveRoute::from_response(response, 1.0, Timestamp(0), 1_000).is_err());
    }

    #[test]
    fn rejects_single_vertex_geometry() {
        let mut response = straight_response(ORIGIN, GeoPoint::new(13.41, 52.52), 10.0);
        response.geometry.truncate(1);
        let err = ActiveRoute::from_response(response, 1.0, Timestamp(0), 1_000).unwrap_err();
        assert!(matches!(err, MobilityError::Core(_)));
    }

    #[test]
    fn step_walk_is_monotone_and_bounded() {
        let mut r = turn_route();
        let p = r.advance_to(150.0);
        assert_eq!(p.step_reached, 1);
        assert!((p.step_covering_m - 50.0).abs() < 1e-9);

        // Covered distance going backwards never rewinds the step.
        let p = r.advance_to(20.0);
        assert_eq!(p.step_reached, 1);
        assert_eq!(p.step_covering_m, 0.0);

        let p = r.advance_to(10_000.0);
        assert_eq!(p.step_reached, r.terminal_step());
        assert_eq!(p.step_covering_m, p.step_distance_m);
    }

    #[test]
    fn progress_is_linear_in_time() {
        let r = turn_route();
        assert_eq!(r.progress(Timestamp(0)), 0.0);
        assert!((r.progress(Timestamp(5_000)) - 0.25).abs() < 1e-12);
        assert!(r.progress(Timestamp(40_000)) > 1.0);
    }
}

// ── GeoNoise ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod noise {
    use ft_core::{AgentId, AgentRng, RandomSource};

    use super::helpers::ORIGIN;
    use crate::GeoNoise;

    #[test]
    fn zero_accuracy_is_identity() {
        let mut rng = AgentRng::new(7, AgentId(0));
        let mut reference = AgentRng::new(7, AgentId(0));
        let noise = GeoNoise::new(0.0);
        assert_eq!(noise.jitter(ORIGIN, &mut rng), ORIGIN);
        // No randomness was consumed.
        assert_eq!(rng.normal(0.0, 1.0), reference.normal(0.0, 1.0));
    }

    #[test]
    fn jitter_stays_near_the_point() {
        let mut rng = AgentRng::new(7, AgentId(1));
        let noise = GeoNoise::new(0.01);
        let mut moved = 0;
        for _ in 0..200 {
            let p = noise.jitter(ORIGIN, &mut rng);
            let d = ORIGIN.distance_km(p);
            assert!(d < 0.1, "{d} km");
            if d > 0.0 {
                moved += 1;
            }
        }
        assert!(moved > 190);
    }

    #[test]
    fn jitter_line_keeps_vertex_count() {
        let mut rng = AgentRng::new(1, AgentId(2));
        let line = vec![ORIGIN, ORIGIN.destination(1.0, 0.0), ORIGIN.destination(2.0, 0.0)];
        assert_eq!(GeoNoise::new(0.005).jitter_line(&line, &mut rng).len(), 3);
    }
}

// ── RouteSelector ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use std::time::Duration;

    use ft_core::{AgentId, AgentRng, Timestamp};
    use ft_spatial::{DensityTable, Tile};

    use super::helpers::{origin_table, Scripted, ORIGIN};
    use crate::{RouteSelector, SelectError, SelectPolicy};

    fn rng() -> AgentRng {
        AgentRng::new(42, AgentId(0))
    }

    #[tokio::test]
    async fn first_attempt_succeeds() {
        let table = origin_table();
        let routing = Scripted::default();
        let policy = SelectPolicy::default();
        let sel = RouteSelector::new(&table, &routing, &policy);

        let s = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap();
        assert_eq!(s.attempts, 1);
        assert_eq!(s.radius_km, 1.0);
        assert!(s.route.distance_km > 0.0);
        assert_eq!(s.route.start, Timestamp(0));
        assert_eq!(s.route.next, Timestamp(120_000));
        assert_eq!(routing.routes(), 1);
    }

    #[tokio::test]
    async fn degenerate_routes_retry_with_a_larger_radius() {
        let table = origin_table();
        let routing = Scripted { degenerate: 2, ..Default::default() };
        let policy = SelectPolicy::default();
        let sel = RouteSelector::new(&table, &routing, &policy);

        let s = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap();
        assert_eq!(s.attempts, 3);
        assert!(s.radius_km > 1.0);
        assert!((s.radius_km - 2.25).abs() < 1e-12);
        assert_eq!(routing.routes(), 3);
    }

    #[tokio::test]
    async fn failures_retry_like_degenerate_routes() {
        let table = origin_table();
        let routing = Scripted { failures: 1, degenerate: 1, ..Default::default() };
        let policy = SelectPolicy::default();
        let sel = RouteSelector::new(&table, &routing, &policy);

        let s = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap();
        assert_eq!(s.attempts, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let table = origin_table();
        let routing = Scripted { failures: u32::MAX, ..Default::default() };
        let policy = SelectPolicy { max_attempts: 4, ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        let err = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap_err();
        assert_eq!(err, SelectError::Exhausted { attempts: 4, radius_km: 3.375 });
        assert_eq!(routing.routes(), 4);
    }

    #[tokio::test]
    async fn gives_up_at_radius_ceiling() {
        let table = origin_table();
        let routing = Scripted { failures: u32::MAX, ..Default::default() };
        let policy = SelectPolicy { radius_ceiling_km: 2.0, ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        let err = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap_err();
        // 1.0 → 1.5 → 2.0 (clamped), then the failure at the ceiling stops it.
        assert_eq!(err, SelectError::Exhausted { attempts: 3, radius_km: 2.0 });
    }

    #[tokio::test]
    async fn zero_radius_widens_on_retry() {
        let table = origin_table();
        let routing = Scripted { degenerate: u32::MAX, ..Default::default() };
        let policy = SelectPolicy { max_attempts: 3, ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        let err = sel.select(ORIGIN, 0.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap_err();
        let SelectError::Exhausted { attempts, radius_km } = err else {
            panic!("expected exhaustion, got {err:?}");
        };
        assert_eq!(attempts, 3);
        // One z14 cell at 52.5°N is roughly 1.5 km wide; one more growth step follows.
        assert!(radius_km > 2.0 && radius_km < 2.5, "radius {radius_km}");
        assert_eq!(routing.routes(), 3);
    }

    #[tokio::test]
    async fn zero_radius_succeeds_after_widening() {
        let table = origin_table();
        let routing = Scripted { degenerate: 1, ..Default::default() };
        let policy = SelectPolicy::default();
        let sel = RouteSelector::new(&table, &routing, &policy);

        let s = sel.select(ORIGIN, 0.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap();
        assert_eq!(s.attempts, 2);
        assert!(s.radius_km > 0.0);
    }

    #[tokio::test]
    async fn empty_density_never_calls_routing() {
        let table = DensityTable::new(14);
        let routing = Scripted::default();
        let policy = SelectPolicy { max_attempts: 3, ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        assert!(sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.is_err());
        assert_eq!(routing.routes(), 0);
        assert_eq!(routing.snaps(), 0);
    }

    #[tokio::test]
    async fn slow_routing_times_out() {
        let table = origin_table();
        let routing = Scripted { delay: Some(Duration::from_millis(500)), ..Default::default() };
        let policy = SelectPolicy { max_attempts: 2, request_timeout_ms: Some(10), ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        let err = sel.select(ORIGIN, 1.0, 1.0, Timestamp(0), 1_000, &mut rng()).await.unwrap_err();
        assert!(matches!(err, SelectError::Exhausted { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn placement_lands_in_a_scored_cell() {
        let table = origin_table();
        let routing = Scripted::default();
        let policy = SelectPolicy::default();
        let sel = RouteSelector::new(&table, &routing, &policy);

        let p = sel.place(&mut rng()).await.unwrap();
        assert!(Tile::containing(ORIGIN, 14).bbox().contains(p));
        assert_eq!(routing.snaps(), 1);
    }

    #[tokio::test]
    async fn placement_without_density_fails() {
        let table = DensityTable::new(14);
        let routing = Scripted::default();
        let policy = SelectPolicy { max_attempts: 2, ..Default::default() };
        let sel = RouteSelector::new(&table, &routing, &policy);

        let err = sel.place(&mut rng()).await.unwrap_err();
        assert_eq!(err, SelectError::PlacementExhausted { attempts: 2 });
    }

    #[test]
    fn policy_defaults_fill_missing_keys() {
        let p: SelectPolicy = serde_json::from_str(r#"{ "maxAttempts": 3 }"#).unwrap();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.growth, 1.5);
        assert_eq!(p.radius_ceiling_km, 200.0);
        assert_eq!(p.request_timeout_ms, None);
    }
}
