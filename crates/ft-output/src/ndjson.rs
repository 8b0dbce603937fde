//! Newline-delimited JSON backend.
//!
//! Each configured path is opened in append mode.  A record is encoded in
//! memory and written with a single `write_all` of `json + "\n"`, so several
//! processes appending to the same file never interleave within a line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ft_agent::{ChangeRecord, ProbeRecord, TraceRecord, TripRecord};

use crate::writer::RecordWriter;
use crate::OutputResult;

/// Where each stream goes.  An absent path disables that stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinkPaths {
    pub probes:  Option<PathBuf>,
    pub traces:  Option<PathBuf>,
    pub trips:   Option<PathBuf>,
    pub changes: Option<PathBuf>,
}

impl SinkPaths {
    /// All four streams as `<name>.ndjson` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            probes:  Some(dir.join("probes.ndjson")),
            traces:  Some(dir.join("traces.ndjson")),
            trips:   Some(dir.join("trips.ndjson")),
            changes: Some(dir.join("changes.ndjson")),
        }
    }
}

pub struct NdjsonWriter {
    probes:  Option<File>,
    traces:  Option<File>,
    trips:   Option<File>,
    changes: Option<File>,
    written: u64,
}

impl NdjsonWriter {
    /// Open (creating if needed) every configured path for appending.
    pub fn open(paths: &SinkPaths) -> OutputResult<Self> {
        Ok(Self {
            probes:  open_append(paths.probes.as_deref())?,
            traces:  open_append(paths.traces.as_deref())?,
            trips:   open_append(paths.trips.as_deref())?,
            changes: open_append(paths.changes.as_deref())?,
            written: 0,
        })
    }

    /// Records written so far, across all streams.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn append<T: Serialize>(sink: &mut Option<File>, written: &mut u64, record: &T) -> OutputResult<()> {
        let Some(file) = sink else {
            return Ok(());
        };
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        file.write_all(&line)?;
        *written += 1;
        Ok(())
    }
}

fn open_append(path: Option<&Path>) -> OutputResult<Option<File>> {
    match path {
        Some(p) => {
            log::debug!("appending to {}", p.display());
            Ok(Some(OpenOptions::new().create(true).append(true).open(p)?))
        }
        None => Ok(None),
    }
}

impl RecordWriter for NdjsonWriter {
    fn write_change(&mut self, record: &ChangeRecord) -> OutputResult<()> {
        Self::append(&mut self.changes, &mut self.written, record)
    }

    fn write_probe(&mut self, record: &ProbeRecord) -> OutputResult<()> {
        Self::append(&mut self.probes, &mut self.written, record)
    }

    fn write_trip(&mut self, record: &TripRecord) -> OutputResult<()> {
        Self::append(&mut self.trips, &mut self.written, record)
    }

    fn write_trace(&mut self, record: &TraceRecord) -> OutputResult<()> {
        Self::append(&mut self.traces, &mut self.written, record)
    }

    fn finish(&mut self) -> OutputResult<()> {
        for file in [&mut self.probes, &mut self.traces, &mut self.trips, &mut self.changes] {
            if let Some(f) = file.take() {
                f.sync_all()?;
            }
        }
        Ok(())
    }
}
