//! `RecordObserver<W>` — bridges `FleetObserver` to a `RecordWriter`.

use ft_agent::AgentEvent;
use ft_core::{AgentId, Tick};
use ft_sim::FleetObserver;

use crate::writer::RecordWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that writes every emitted record to a
/// [`RecordWriter`] backend.
///
/// Errors from the writer are stored internally because `FleetObserver`
/// methods have no return value.  After `fleet.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct RecordObserver<W: RecordWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: RecordWriter> RecordObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `fleet.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::error!("record sink failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: RecordWriter> FleetObserver for RecordObserver<W> {
    fn on_events(&mut self, _agent: AgentId, events: &[AgentEvent]) {
        for event in events {
            let result = self.writer.write_event(event);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
