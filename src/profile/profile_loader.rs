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

use config::{Config, FileFormat};
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::constants::{MAX_NUM_ACTUATOR, NUM_DEFAULT_ACTUATOR};
use crate::enums::Axis;
use crate::error::ProfileError;
use crate::profile::actuator_profile::{
    default_actuator, default_blend, default_profile, ActuatorLimits, AxisBlend, MotionGains,
    RigProfile,
};
use crate::utility::{get_config, get_optional_string};

/// Load the rig profile from the file. This never fails: any read or parse
/// error falls back to the built-in default profile.
///
/// # Notes
/// The file is INI-like:
///
/// [rig]          actuators (optional, default 4)
/// [gain]         roll, pitch, yaw (optional)
/// [actuatorK]    name, min_height, max_height, home_height, max_speed, offset
/// [blendK]       surge, sway, heave, roll, pitch, yaw
///
/// K is 1-based. Unknown keys and sections beyond the actuator count are
/// ignored.
///
/// # Arguments
/// * `filepath` - Path to the profile file.
///
/// # Returns
/// * `profile` - Rig profile.
/// * `is_loaded` - True if the profile is read from the file. False if it is
/// the default profile.
pub fn load_profile(filepath: &Path) -> (RigProfile, bool) {
    match read_profile(filepath) {
        Ok(profile) => {
            info!(
                "Load the profile of {} actuators from {:?}.",
                profile.num_actuator(),
                filepath
            );

            (profile, true)
        }
        Err(error) => {
            warn!("Use the default profile. Failed to load {filepath:?}: {error}.");

            (default_profile(NUM_DEFAULT_ACTUATOR), false)
        }
    }
}

/// Read the rig profile from the file.
///
/// # Arguments
/// * `filepath` - Path to the profile file.
///
/// # Returns
/// Rig profile.
pub fn read_profile(filepath: &Path) -> Result<RigProfile, ProfileError> {
    let config = get_config(filepath, FileFormat::Ini)?;

    let num_actuator = read_num_actuator(&config)?;

    let mut actuators = Vec::with_capacity(num_actuator);
    let mut blends = Vec::with_capacity(num_actuator);
    for idx in 0..num_actuator {
        actuators.push(read_actuator(&config, idx)?);
        blends.push(read_blend(&config, idx, num_actuator)?);
    }

    RigProfile::new(actuators, blends, read_gains(&config)?)
}

/// Read the number of the actuators.
///
/// # Arguments
/// * `config` - Configuration.
///
/// # Returns
/// Number of the actuators.
fn read_num_actuator(config: &Config) -> Result<usize, ProfileError> {
    let key = "rig.actuators";
    match get_optional_string(config, key)? {
        Some(value) => {
            let number = usize::from_str(&value).map_err(|_| ProfileError::InvalidValue {
                key: String::from(key),
                value: value.clone(),
            })?;

            if (number == 0) || (number > MAX_NUM_ACTUATOR) {
                return Err(ProfileError::ActuatorCount {
                    max: MAX_NUM_ACTUATOR,
                });
            }

            Ok(number)
        }
        None => Ok(NUM_DEFAULT_ACTUATOR),
    }
}

/// Read the value if the key exists.
///
/// # Arguments
/// * `config` - Configuration.
/// * `key` - Key of the value.
///
/// # Returns
/// The value. None if the key does not exist.
fn read_value(config: &Config, key: &str) -> Result<Option<f64>, ProfileError> {
    match get_optional_string(config, key)? {
        Some(value) => match f64::from_str(&value) {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(ProfileError::InvalidValue {
                key: String::from(key),
                value: value,
            }),
        },
        None => Ok(None),
    }
}

/// Read the actuator limits.
///
/// # Arguments
/// * `config` - Configuration.
/// * `index` - 0-based index of the actuator.
///
/// # Returns
/// Actuator limits. Missing keys keep the default values.
fn read_actuator(config: &Config, index: usize) -> Result<ActuatorLimits, ProfileError> {
    let section = format!("actuator{}", index + 1);
    let mut actuator = default_actuator(index);

    if let Some(name) = get_optional_string(config, &format!("{section}.name"))? {
        if !name.is_empty() {
            actuator.name = name;
        }
    }

    for key in [
        "min_height",
        "max_height",
        "home_height",
        "max_speed",
        "offset",
    ] {
        if let Some(value) = read_value(config, &format!("{section}.{key}"))? {
            match key {
                "min_height" => actuator.min_height = value,
                "max_height" => actuator.max_height = value,
                "home_height" => actuator.home_height = value,
                "max_speed" => actuator.max_speed = value,
                _ => actuator.mount_offset = value,
            }
        }
    }

    Ok(actuator)
}

/// Read the axis blend.
///
/// # Arguments
/// * `config` - Configuration.
/// * `index` - 0-based index of the actuator.
/// * `num_actuator` - Number of the actuators.
///
/// # Returns
/// Axis blend. Missing keys keep the default values.
fn read_blend(
    config: &Config,
    index: usize,
    num_actuator: usize,
) -> Result<AxisBlend, ProfileError> {
    let section = format!("blend{}", index + 1);
    let mut blend = default_blend(index, num_actuator);

    for axis in Axis::iter() {
        if let Some(value) = read_value(config, &format!("{section}.{}", axis.as_ref()))? {
            blend.set(axis, value);
        }
    }

    Ok(blend)
}

/// Read the gains of the angular axes.
///
/// # Arguments
/// * `config` - Configuration.
///
/// # Returns
/// Motion gains. Missing keys keep the default values.
fn read_gains(config: &Config) -> Result<MotionGains, ProfileError> {
    let mut gains = MotionGains::default();

    if let Some(value) = read_value(config, "gain.roll")? {
        gains.roll = value;
    }
    if let Some(value) = read_value(config, "gain.pitch")? {
        gains.pitch = value;
    }
    if let Some(value) = read_value(config, "gain.yaw")? {
        gains.yaw = value;
    }

    Ok(gains)
}
