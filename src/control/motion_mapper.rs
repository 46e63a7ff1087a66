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

use strum::IntoEnumIterator;

use crate::enums::Axis;
use crate::profile::actuator_profile::{ActuatorLimits, AxisBlend, MotionGains, RigProfile};
use crate::telemetry::telemetry_frame::{ActuatorTargets, TelemetryFrame};

/// Map the telemetry frame to the actuator target heights.
///
/// # Notes
/// For each actuator i:
///
/// h_i = home_i + offset_i + sum_axis (blend_i[axis] * gain[axis] * frame[axis])
///
/// The gain is 1 for the linear axes. h_i is then clamped into
/// [min_height_i, max_height_i]. There is no rate limit here.
///
/// # Arguments
/// * `profile` - Rig profile.
/// * `frame` - Telemetry frame.
///
/// # Returns
/// Target heights in mm, index-aligned with the actuators.
pub fn map(profile: &RigProfile, frame: &TelemetryFrame) -> ActuatorTargets {
    ActuatorTargets::from(
        profile
            .iter()
            .map(|(actuator, blend)| map_actuator(actuator, blend, &profile.gains, frame))
            .collect::<Vec<f64>>(),
    )
}

/// Map the telemetry frame to the target height of a single actuator.
///
/// # Arguments
/// * `actuator` - Actuator limits.
/// * `blend` - Axis blend of the actuator.
/// * `gains` - Gains of the angular axes.
/// * `frame` - Telemetry frame.
///
/// # Returns
/// Target height in mm.
pub fn map_actuator(
    actuator: &ActuatorLimits,
    blend: &AxisBlend,
    gains: &MotionGains,
    frame: &TelemetryFrame,
) -> f64 {
    let mut height = actuator.neutral_height();
    for axis in Axis::iter() {
        height += blend.get(axis) * frame.get(axis) * gains.get(axis);
    }

    // The overflow to +/-inf is clamped to the travel range. NaN has no
    // direction, so hold the neutral height.
    if height.is_nan() {
        height = actuator.neutral_height();
    }

    let height_clamp = actuator.clamp(height);
    debug_assert!(
        (actuator.min_height <= height_clamp) && (height_clamp <= actuator.max_height),
        "Target height {height_clamp} of {} is out of range.",
        actuator.name
    );

    height_clamp
}
