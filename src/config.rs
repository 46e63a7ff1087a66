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

use config::{ConfigError, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    ALL_HOST, DEFAULT_FAILURE_WARNING_THRESHOLD, DEFAULT_IDLE_BACKOFF_MS,
    DEFAULT_POLL_TIMEOUT_MS, DEFAULT_SMOOTHING_HISTORY, PORT_ASSETTO_CORSA,
    PORT_ASSETTO_CORSA_COMPETIZIONE, PORT_RFACTOR2, PORT_SIMTOOLS,
};
use crate::utility::get_config;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct AppConfig {
    // Default simulator identifier.
    pub game: String,
    // Default serial port of the rig.
    pub serial_port: String,
    // Default baud rate of the rig.
    pub baud_rate: u32,
    // Default path of the rig profile.
    pub profile: String,
    // Bounded wait of the telemetry source in milliseconds.
    pub poll_timeout_ms: u64,
    // Sleep of the control loop when there is no telemetry in milliseconds.
    pub idle_backoff_ms: u64,
    // Smoothing factor in [0, 1] of the telemetry. 0 disables the smoothing.
    pub smoothing: f64,
    // Number of the frames kept for the smoothing.
    pub smoothing_history: usize,
    // Consecutive send failures before the link is reported as unhealthy.
    pub failure_warning_threshold: u64,
    // Host and UDP ports of the simulators.
    pub bind_host: String,
    pub port_assetto_corsa: u16,
    pub port_assetto_corsa_competizione: u16,
    pub port_rfactor2: u16,
    pub port_simtools: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: String::from("acc"),
            serial_port: String::from("/dev/ttyUSB0"),
            baud_rate: 115200,
            profile: String::from("config/rig_profile.ini"),

            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            idle_backoff_ms: DEFAULT_IDLE_BACKOFF_MS,

            smoothing: 0.0,
            smoothing_history: DEFAULT_SMOOTHING_HISTORY,

            failure_warning_threshold: DEFAULT_FAILURE_WARNING_THRESHOLD,

            bind_host: String::from(ALL_HOST),
            port_assetto_corsa: PORT_ASSETTO_CORSA,
            port_assetto_corsa_competizione: PORT_ASSETTO_CORSA_COMPETIZIONE,
            port_rfactor2: PORT_RFACTOR2,
            port_simtools: PORT_SIMTOOLS,
        }
    }
}

impl AppConfig {
    /// Read the application configuration from the YAML file. The missing
    /// keys keep the default values.
    ///
    /// # Arguments
    /// * `filepath` - Path to the configuration file.
    ///
    /// # Returns
    /// Application configuration.
    pub fn from_file(filepath: &Path) -> Result<Self, ConfigError> {
        get_config(filepath, FileFormat::Yaml)?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default() {
        let config = AppConfig::default();

        assert_eq!(config.game, "acc");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.poll_timeout_ms, 50);
        assert_eq!(config.idle_backoff_ms, 5);
        assert_eq!(config.smoothing, 0.0);
        assert_eq!(config.port_assetto_corsa_competizione, 9000);
    }

    #[test]
    fn test_from_file() {
        let config = AppConfig::from_file(Path::new("config/parameters_app.yaml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(b"game: rf2\nsmoothing: 0.5\nport_rfactor2: 6000\n")
            .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.game, "rf2");
        assert_eq!(config.smoothing, 0.5);
        assert_eq!(config.port_rfactor2, 6000);

        assert_eq!(config.poll_timeout_ms, 50);
        assert_eq!(config.serial_port, "/dev/ttyUSB0");
    }

    #[test]
    fn test_from_file_error() {
        assert!(AppConfig::from_file(Path::new("no_such_file.yaml")).is_err());

        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(b"poll_timeout_ms: soon\n").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
