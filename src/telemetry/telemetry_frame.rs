use serde::Serialize;

use crate::constants::NUM_AXIS;
use crate::enums::Axis;

/// Snapshot of the vehicle motion. The linear accelerations are in m/s^2 and
/// the angular axes are in rad.
#[derive(Serialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct TelemetryFrame {
    pub surge: f64,
    pub sway: f64,
    pub heave: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl TelemetryFrame {
    /// Create the frame from the values in the order of `Axis`.
    ///
    /// # Arguments
    /// * `values` - [surge, sway, heave, roll, pitch, yaw].
    ///
    /// # Returns
    /// Telemetry frame.
    pub fn from_values(values: [f64; NUM_AXIS]) -> Self {
        Self {
            surge: values[0],
            sway: values[1],
            heave: values[2],
            roll: values[3],
            pitch: values[4],
            yaw: values[5],
        }
    }

    /// Values in the order of `Axis`.
    pub fn values(&self) -> [f64; NUM_AXIS] {
        [
            self.surge, self.sway, self.heave, self.roll, self.pitch, self.yaw,
        ]
    }

    /// Get the value of the axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Surge => self.surge,
            Axis::Sway => self.sway,
            Axis::Heave => self.heave,
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }

    /// All the values are finite or not.
    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|value| value.is_finite())
    }
}

/// Target heights of the actuators in mm, index-aligned with the actuators
/// of the rig profile.
#[derive(Serialize, Clone, PartialEq, Debug, Default)]
pub struct ActuatorTargets(Vec<f64>);

impl ActuatorTargets {
    pub fn heights(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for ActuatorTargets {
    fn from(heights: Vec<f64>) -> Self {
        Self(heights)
    }
}
