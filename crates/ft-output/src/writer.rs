//! The `RecordWriter` trait implemented by all sink backends.

use ft_agent::{AgentEvent, ChangeRecord, ProbeRecord, TraceRecord, TripRecord};

use crate::OutputResult;

/// One method per record stream.
///
/// Backends silently drop records for streams they were not configured with.
pub trait RecordWriter {
    fn write_change(&mut self, record: &ChangeRecord) -> OutputResult<()>;

    fn write_probe(&mut self, record: &ProbeRecord) -> OutputResult<()>;

    fn write_trip(&mut self, record: &TripRecord) -> OutputResult<()>;

    fn write_trace(&mut self, record: &TraceRecord) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;

    /// Route `event` to the matching stream.
    fn write_event(&mut self, event: &AgentEvent) -> OutputResult<()> {
        match event {
            AgentEvent::Change(r) => self.write_change(r),
            AgentEvent::Probe(r) => self.write_probe(r),
            AgentEvent::Trip(r) => self.write_trip(r),
            AgentEvent::Trace(r) => self.write_trace(r),
        }
    }
}
