use std::collections::VecDeque;

use crate::constants::NUM_AXIS;
use crate::telemetry::telemetry_frame::TelemetryFrame;

pub struct FrameSmoother {
    _smoothing: f64,
    _num_history: usize,
    _history: VecDeque<TelemetryFrame>,
}

impl FrameSmoother {
    /// Moving-average filter of the telemetry frames.
    ///
    /// # Notes
    /// The output is the average of the latest N frames in the history:
    ///
    /// N = max(1, floor(len(history) * smoothing))
    ///
    /// The filter is disabled if the smoothing <= 0.
    ///
    /// # Arguments
    /// * `smoothing` - Smoothing factor. It is limited to [0, 1].
    /// * `num_history` - Maximum number of the frames in the history. The
    /// minimum is 1.
    ///
    /// # Returns
    /// A new FrameSmoother object.
    pub fn new(smoothing: f64, num_history: usize) -> Self {
        let smoothing = if smoothing.is_finite() {
            smoothing.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let num_history = num_history.max(1);

        Self {
            _smoothing: smoothing,
            _num_history: num_history,
            _history: VecDeque::with_capacity(num_history),
        }
    }

    /// The filter is enabled or not.
    pub fn is_enabled(&self) -> bool {
        self._smoothing > 0.0
    }

    /// Reset the filter.
    pub fn reset(&mut self) {
        self._history.clear();
    }

    /// Filter the frame.
    ///
    /// # Arguments
    /// * `frame` - Input frame.
    ///
    /// # Returns
    /// Filtered frame. It is the input frame if the filter is disabled.
    pub fn filter(&mut self, frame: &TelemetryFrame) -> TelemetryFrame {
        if !self.is_enabled() {
            return *frame;
        }

        if self._history.len() == self._num_history {
            self._history.pop_front();
        }
        self._history.push_back(*frame);

        let number = (((self._history.len() as f64) * self._smoothing) as usize).max(1);

        let mut sum = [0.0; NUM_AXIS];
        self._history.iter().rev().take(number).for_each(|item| {
            sum.iter_mut()
                .zip(item.values().iter())
                .for_each(|(total, value)| *total += value);
        });

        TelemetryFrame::from_values(sum.map(|total| total / (number as f64)))
    }
}
