//! city — a small fleet driving around a synthetic grid city.
//!
//! Usage: `city [config.json]`.  Without an argument the bundled
//! `config.json` is used.  Records are appended to the NDJSON sinks named in
//! the config; set `RUST_LOG=debug` to see per-tick agent diagnostics.

mod network;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use ft_agent::{AgentEvent, EventReason};
use ft_core::{AgentId, Tick};
use ft_output::{NdjsonWriter, RecordObserver, RecordWriter, SinkPaths};
use ft_sim::{FleetBuilder, FleetConfig, FleetObserver};
use ft_spatial::GraphRouter;

use network::{build_density, build_network};

const DEFAULT_CONFIG: &str = include_str!("../config.json");

/// Progress log every this many ticks.
const REPORT_INTERVAL_TICKS: u64 = 600;

#[derive(Deserialize)]
struct DemoConfig {
    fleet: FleetConfig,
    #[serde(default)]
    sinks: SinkPaths,
}

// ── Observer wrapper to count records ─────────────────────────────────────────

struct CountingObserver<W: RecordWriter> {
    inner:   RecordObserver<W>,
    reasons: BTreeMap<&'static str, usize>,
    probes:  usize,
    trips:   usize,
    traces:  usize,
}

impl<W: RecordWriter> CountingObserver<W> {
    fn new(inner: RecordObserver<W>) -> Self {
        Self { inner, reasons: BTreeMap::new(), probes: 0, trips: 0, traces: 0 }
    }
}

fn reason_label(reason: EventReason) -> &'static str {
    match reason {
        EventReason::ServiceStart => "service_start",
        EventReason::UserPickUp => "user_pick_up",
        EventReason::UserDropOff => "user_drop_off",
        EventReason::Maintenance => "maintenance",
        EventReason::ServiceEnd => "service_end",
    }
}

impl<W: RecordWriter> FleetObserver for CountingObserver<W> {
    fn on_events(&mut self, agent: AgentId, events: &[AgentEvent]) {
        for event in events {
            if let Some(c) = event.as_change() {
                *self.reasons.entry(reason_label(c.event_type_reason)).or_default() += 1;
            }
            match event {
                AgentEvent::Probe(_) => self.probes += 1,
                AgentEvent::Trip(_) => self.trips += 1,
                AgentEvent::Trace(_) => self.traces += 1,
                AgentEvent::Change(_) => {}
            }
        }
        self.inner.on_events(agent, events);
    }

    fn on_tick_end(&mut self, tick: Tick, active: usize) {
        if tick.0 > 0 && tick.0 % REPORT_INTERVAL_TICKS == 0 {
            log::info!("{tick}: {active} agents in service, {} trips so far", self.trips);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

fn load_config(arg: Option<String>) -> Result<DemoConfig> {
    let json = match &arg {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => DEFAULT_CONFIG.to_owned(),
    };
    let config: DemoConfig = serde_json::from_str(&json).context("parsing demo config")?;
    config.fleet.validate()?;
    Ok(config)
}

fn create_parent_dirs(sinks: &SinkPaths) -> Result<()> {
    for path in [&sinks.probes, &sinks.traces, &sinks.trips, &sinks.changes].into_iter().flatten() {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config(std::env::args().nth(1))?;
    let fleet_config = config.fleet;
    println!("=== city — fleet-twin telemetry ===");
    println!(
        "Agents: {}  |  Ticks: {} × {} ms  |  Seed: {}",
        fleet_config.agents, fleet_config.total_ticks, fleet_config.step_size, fleet_config.seed
    );

    // 1. Road network and density.
    let network = build_network();
    println!("Road network: {} nodes, {} edges", network.node_count(), network.edge_count());
    let density = build_density(fleet_config.zoom)?;
    println!("Density table: {} cells at zoom {}", density.len(), fleet_config.zoom);

    // 2. Fleet.
    let mut fleet = FleetBuilder::new(fleet_config, density, GraphRouter::new(network)).build()?;

    // 3. Sinks.
    create_parent_dirs(&config.sinks)?;
    let writer = NdjsonWriter::open(&config.sinks)?;
    let mut obs = CountingObserver::new(RecordObserver::new(writer));

    // 4. Run.
    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let t0 = Instant::now();
    runtime.block_on(fleet.run(&mut obs));
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  probes : {}", obs.probes);
    println!("  traces : {}", obs.traces);
    println!("  trips  : {}", obs.trips);
    for (reason, n) in &obs.reasons {
        println!("  change {reason:<14}: {n}");
    }
    for (name, path) in [("probes", &config.sinks.probes), ("changes", &config.sinks.changes)] {
        if let Some(p) = path.as_deref().map(Path::display) {
            println!("  {name} written to {p}");
        }
    }
    println!();

    // 6. Final fleet table.
    println!("{:<10} {:<14} {:<8} {:<24}", "Vehicle", "Status", "Serving", "Location");
    println!("{}", "-".repeat(58));
    for agent in &fleet.agents {
        let at = agent.location().map(|p| p.to_string()).unwrap_or_else(|| "-".into());
        let serving = if agent.status().is_terminal() { "no" } else { "yes" };
        println!("{:<10} {:<14} {:<8} {:<24}", agent.id().as_str(), agent.status().label(), serving, at);
    }
    let out = fleet.agents.iter().filter(|a| a.status().is_terminal()).count();
    println!("{out} of {} vehicles out of service", fleet.agents.len());

    Ok(())
}
