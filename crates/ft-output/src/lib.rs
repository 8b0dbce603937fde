//! `ft-output` — telemetry sinks for the fleet-twin simulator.
//!
//! Four record streams, each optional:
//!
//! | Sink      | Record                                   |
//! |-----------|------------------------------------------|
//! | `probes`  | GeoJSON point feature per agent per tick |
//! | `traces`  | GeoJSON line feature per selected route  |
//! | `trips`   | Trip summary with timestamped vertices   |
//! | `changes` | Availability change                      |
//!
//! All backends implement [`RecordWriter`] and are driven by
//! [`RecordObserver`], which implements `ft_sim::FleetObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ft_output::{NdjsonWriter, RecordObserver, SinkPaths};
//!
//! let writer = NdjsonWriter::open(&SinkPaths::in_dir(Path::new("./out")))?;
//! let mut obs = RecordObserver::new(writer);
//! fleet.run(&mut obs).await;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod error;
pub mod ndjson;
pub mod observer;
pub mod writer;


pub use error::{OutputError, OutputResult};
pub use ndjson::{NdjsonWriter, SinkPaths};
pub use observer::RecordObserver;
pub use writer::RecordWriter;
