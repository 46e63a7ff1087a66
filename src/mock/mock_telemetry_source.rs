use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::telemetry::telemetry_frame::TelemetryFrame;
use crate::telemetry::telemetry_source::TelemetrySource;

/// Telemetry source that replays the scripted samples. None in the script
/// means there is no data in that poll. The script is exhausted into no
/// data forever.
pub struct MockTelemetrySource {
    _script: VecDeque<Option<TelemetryFrame>>,
    // Number of the polls, shared with the test.
    _count_poll: Arc<AtomicUsize>,
}

impl MockTelemetrySource {
    /// Create a new mock source.
    ///
    /// # Arguments
    /// * `script` - Scripted samples.
    ///
    /// # Returns
    /// A new mock source.
    pub fn new(script: Vec<Option<TelemetryFrame>>) -> Self {
        Self {
            _script: VecDeque::from(script),
            _count_poll: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the reference to the number of the polls.
    pub fn get_count_poll_reference(&self) -> Arc<AtomicUsize> {
        self._count_poll.clone()
    }
}

impl TelemetrySource for MockTelemetrySource {
    fn name(&self) -> &str {
        "Mock"
    }

    fn poll(&mut self) -> Option<TelemetryFrame> {
        self._count_poll.fetch_add(1, Ordering::Relaxed);

        self._script.pop_front().flatten()
    }
}
