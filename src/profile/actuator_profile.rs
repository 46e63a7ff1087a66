// This file is part of motion_hub.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::constants::{
    DEFAULT_GAIN_PITCH, DEFAULT_GAIN_ROLL, DEFAULT_GAIN_YAW, MAX_NUM_ACTUATOR,
    NUM_DEFAULT_ACTUATOR,
};
use crate::enums::Axis;
use crate::error::ProfileError;

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct ActuatorLimits {
    // Display label.
    pub name: String,
    // Travel range in mm.
    pub min_height: f64,
    pub max_height: f64,
    // Neutral height in mm.
    pub home_height: f64,
    // Maximum speed in mm/s. The firmware owns the rate limiting.
    pub max_speed: f64,
    // Mount offset in mm.
    pub mount_offset: f64,
}

impl ActuatorLimits {
    /// Create a new actuator with the default limits.
    ///
    /// # Arguments
    /// * `name` - Display label.
    ///
    /// # Returns
    /// New actuator limits.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            min_height: 0.0,
            max_height: 500.0,
            home_height: 10.0,
            max_speed: 12000.0,
            mount_offset: 0.0,
        }
    }

    /// Neutral height of the actuator: home height plus the mount offset.
    /// This is not clamped.
    pub fn neutral_height(&self) -> f64 {
        self.home_height + self.mount_offset
    }

    /// Clamp the height into the travel range.
    ///
    /// # Arguments
    /// * `height` - Height in mm.
    ///
    /// # Returns
    /// Height in [min_height, max_height].
    pub fn clamp(&self, height: f64) -> f64 {
        height.clamp(self.min_height, self.max_height)
    }

    /// Validate the limits.
    ///
    /// # Arguments
    /// * `index` - 0-based index of the actuator in the profile.
    ///
    /// # Returns
    /// Ok if min_height <= home_height <= max_height and max_speed > 0.
    pub fn validate(&self, index: usize) -> Result<(), ProfileError> {
        let values = [
            self.min_height,
            self.max_height,
            self.home_height,
            self.max_speed,
            self.mount_offset,
        ];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(self.invalid(index, "values should be finite"));
        }

        if !((self.min_height <= self.home_height) && (self.home_height <= self.max_height)) {
            return Err(self.invalid(
                index,
                &format!(
                    "home height {} should be in [{}, {}]",
                    self.home_height, self.min_height, self.max_height
                ),
            ));
        }

        if self.max_speed <= 0.0 {
            return Err(self.invalid(index, "max speed should be positive"));
        }

        Ok(())
    }

    fn invalid(&self, index: usize, reason: &str) -> ProfileError {
        ProfileError::InvalidActuator {
            index: index,
            reason: format!("{} ({})", reason, self.name),
        }
    }
}

/// Mix coefficients of the six axes for one actuator. The coefficient can be
/// negative (inverted actuator) or larger than 1 (amplified response).
#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
pub struct AxisBlend {
    pub surge: f64,
    pub sway: f64,
    pub heave: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Default for AxisBlend {
    fn default() -> Self {
        Self {
            surge: 0.0,
            sway: 0.0,
            heave: 1.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl AxisBlend {
    /// Get the coefficient of the axis.
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

    /// Set the coefficient of the axis.
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Surge => self.surge = value,
            Axis::Sway => self.sway = value,
            Axis::Heave => self.heave = value,
            Axis::Roll => self.roll = value,
            Axis::Pitch => self.pitch = value,
            Axis::Yaw => self.yaw = value,
        }
    }
}

/// Gains that convert the angular axes (rad) into the height unit (mm).
#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
pub struct MotionGains {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Default for MotionGains {
    fn default() -> Self {
        Self {
            roll: DEFAULT_GAIN_ROLL,
            pitch: DEFAULT_GAIN_PITCH,
            yaw: DEFAULT_GAIN_YAW,
        }
    }
}

impl MotionGains {
    /// Get the gain of the axis. The linear axes have the unit gain.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
            _ => 1.0,
        }
    }
}

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct RigProfile {
    _actuators: Vec<ActuatorLimits>,
    // Actuator i uses the blend i.
    _blends: Vec<AxisBlend>,
    pub gains: MotionGains,
}

impl RigProfile {
    /// Create a new rig profile.
    ///
    /// # Arguments
    /// * `actuators` - Limits of the actuators.
    /// * `blends` - Axis blends, index-aligned with the actuators.
    /// * `gains` - Gains of the angular axes.
    ///
    /// # Returns
    /// A validated rig profile.
    pub fn new(
        actuators: Vec<ActuatorLimits>,
        blends: Vec<AxisBlend>,
        gains: MotionGains,
    ) -> Result<Self, ProfileError> {
        if actuators.is_empty() || actuators.len() > MAX_NUM_ACTUATOR {
            return Err(ProfileError::ActuatorCount {
                max: MAX_NUM_ACTUATOR,
            });
        }

        if actuators.len() != blends.len() {
            return Err(ProfileError::MisalignedBlends {
                actuators: actuators.len(),
                blends: blends.len(),
            });
        }

        for (idx, actuator) in actuators.iter().enumerate() {
            actuator.validate(idx)?;
        }

        for axis in Axis::iter().filter(|axis| axis.is_angular()) {
            if !gains.get(axis).is_finite() {
                return Err(ProfileError::InvalidGain {
                    axis: String::from(axis.as_ref()),
                });
            }
        }

        Ok(Self {
            _actuators: actuators,
            _blends: blends,
            gains: gains,
        })
    }

    /// Number of the actuators.
    pub fn num_actuator(&self) -> usize {
        self._actuators.len()
    }

    pub fn actuators(&self) -> &[ActuatorLimits] {
        &self._actuators
    }

    pub fn blends(&self) -> &[AxisBlend] {
        &self._blends
    }

    /// Iterate the (limits, blend) pairs in the actuator order.
    pub fn iter(&self) -> impl Iterator<Item = (&ActuatorLimits, &AxisBlend)> {
        self._actuators.iter().zip(self._blends.iter())
    }
}

/// Default limits of the actuator.
///
/// # Arguments
/// * `index` - 0-based index of the actuator.
///
/// # Returns
/// Default actuator limits.
pub fn default_actuator(index: usize) -> ActuatorLimits {
    ActuatorLimits::new(&format!("Actuator {}", index + 1))
}

/// Default blend of the actuator. The first half of the actuators are at the
/// front and the even indexes are on the left.
///
/// # Arguments
/// * `index` - 0-based index of the actuator.
/// * `num_actuator` - Number of the actuators.
///
/// # Returns
/// Default axis blend.
pub fn default_blend(index: usize, num_actuator: usize) -> AxisBlend {
    let is_left = index % 2 == 0;
    let is_front = index < (num_actuator / 2).max(1);

    AxisBlend {
        surge: if is_front { 0.5 } else { -0.5 },
        sway: if is_left { -0.5 } else { 0.5 },
        heave: 1.0,
        roll: if is_left { -0.5 } else { 0.5 },
        pitch: if is_front { -0.5 } else { 0.5 },
        yaw: 0.0,
    }
}

/// Built-in rig profile.
///
/// # Arguments
/// * `num_actuator` - Number of the actuators. It is limited to
/// [1, MAX_NUM_ACTUATOR].
///
/// # Returns
/// Default rig profile.
pub fn default_profile(num_actuator: usize) -> RigProfile {
    let number = num_actuator.clamp(1, MAX_NUM_ACTUATOR);

    RigProfile {
        _actuators: (0..number).map(default_actuator).collect(),
        _blends: (0..number).map(|idx| default_blend(idx, number)).collect(),
        gains: MotionGains::default(),
    }
}

impl Default for RigProfile {
    fn default() -> Self {
        default_profile(NUM_DEFAULT_ACTUATOR)
    }
}
