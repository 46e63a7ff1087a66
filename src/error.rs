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

use thiserror::Error;

/// Failure to build a rig profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read the profile: {0}")]
    Read(#[from] config::ConfigError),

    #[error("invalid value {value:?} of {key}")]
    InvalidValue { key: String, value: String },

    #[error("actuator {index} is invalid: {reason}")]
    InvalidActuator { index: usize, reason: String },

    #[error("gain of {axis} should be finite")]
    InvalidGain { axis: String },

    #[error("{blends} axis blends do not align with {actuators} actuators")]
    MisalignedBlends { actuators: usize, blends: usize },

    #[error("the rig should have 1 to {max} actuators")]
    ActuatorCount { max: usize },
}
