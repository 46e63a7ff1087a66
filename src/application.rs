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

use log::{error, info, warn};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::path::Path;
use std::sync::{atomic::AtomicBool, Arc};
use std::time::Duration;

use crate::config::AppConfig;
use crate::constants::MOCK_RIG_CAPACITY;
use crate::control::control_loop::ControlLoop;
use crate::enums::RigCommand;
use crate::interface::actuator_link::ActuatorLink;
use crate::mock::mock_rig::MockRig;
use crate::profile::profile_loader::load_profile;
use crate::telemetry::telemetry_source::make_source;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Options of the process from the command line. None means the value in
/// the configuration file is used.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub game: Option<String>,
    pub serial_port: Option<String>,
    pub baud_rate: Option<u32>,
    pub profile: Option<String>,
    pub is_home: bool,
    pub is_self_test: bool,
    pub is_simulation_mode: bool,
    pub config_file: String,
}

/// Run the application.
///
/// # Arguments
/// * `options` - Options of the process.
///
/// # Returns
/// Exit code of the process.
pub fn run(options: &RunOptions) -> i32 {
    // Log the running mode
    let mode = if options.is_simulation_mode {
        "simulation mode"
    } else {
        "hardware mode"
    };
    info!("Run the motion hub in {mode}.");

    let config = get_final_config(options, get_app_config(Path::new(&options.config_file)));

    // Register the signals that stop the application
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGTERM, SIGINT].iter() {
        let _ = register(*signal, stop.clone());
    }

    let rig = if options.is_simulation_mode {
        Some(MockRig::new(MOCK_RIG_CAPACITY))
    } else {
        None
    };

    let mut control_loop = match start_control_loop(options, &config, &stop, rig.clone()) {
        Some(control_loop) => control_loop,
        None => return EXIT_FAILURE,
    };

    let statistics = control_loop.run();

    if let Some(rig) = rig {
        info!(
            "Simulated rig keeps the latest {} lines of {} sent.",
            rig.lines().len(),
            statistics.lines_sent
        );
    }

    info!("Motion hub should be stopped.");

    EXIT_SUCCESS
}

/// Get the application configuration.
///
/// # Arguments
/// * `filepath` - Path to the configuration file.
///
/// # Returns
/// Application configuration. The default one if the file can not be read.
pub fn get_app_config(filepath: &Path) -> AppConfig {
    match AppConfig::from_file(filepath) {
        Ok(config) => config,
        Err(error) => {
            warn!("Use the default configuration. Failed to read {filepath:?}: {error}.");

            AppConfig::default()
        }
    }
}

/// Get the final configuration. The command line options override the
/// values in the configuration file.
///
/// # Arguments
/// * `options` - Options of the process.
/// * `config` - Configuration from the file.
///
/// # Returns
/// Final configuration.
pub fn get_final_config(options: &RunOptions, config: AppConfig) -> AppConfig {
    let mut final_config = config;

    if let Some(game) = &options.game {
        final_config.game = game.clone();
    }
    if let Some(serial_port) = &options.serial_port {
        final_config.serial_port = serial_port.clone();
    }
    if let Some(baud_rate) = options.baud_rate {
        final_config.baud_rate = baud_rate;
    }
    if let Some(profile) = &options.profile {
        final_config.profile = profile.clone();
    }

    final_config
}

/// Run the startup sequence: load the profile, make the telemetry source,
/// open the actuator link, and send the requested startup commands.
///
/// # Arguments
/// * `options` - Options of the process.
/// * `config` - Final configuration.
/// * `stop` - An Arc instance that holds the AtomicBool instance to stop
/// the loop.
/// * `rig` - Simulated rig. If None, the serial port is opened.
///
/// # Returns
/// Control loop ready to run. None if the simulator is unknown or the link
/// can not be opened.
pub fn start_control_loop(
    options: &RunOptions,
    config: &AppConfig,
    stop: &Arc<AtomicBool>,
    rig: Option<MockRig>,
) -> Option<ControlLoop> {
    // A malformed profile is not fatal.
    let (profile, _) = load_profile(Path::new(&config.profile));

    // No command reaches the rig with an unknown simulator.
    let source = match make_source(&config.game, config) {
        Some(source) => source,
        None => {
            error!("Unknown simulator: {:?}.", config.game);
            return None;
        }
    };
    info!("Telemetry source: {}.", source.name());

    let mut link = ActuatorLink::new(
        "Actuator link",
        Duration::from_millis(config.poll_timeout_ms),
    );
    match rig {
        Some(rig) => link.attach(Box::new(rig)),
        None => {
            if !link.open(&config.serial_port, config.baud_rate) {
                return None;
            }
        }
    }

    // Fire and forget
    if options.is_home && !link.send_command(RigCommand::Home.as_ref()) {
        warn!("Failed to send the {} command.", RigCommand::Home.as_ref());
    }
    if options.is_self_test && !link.send_command(RigCommand::SelfTest.as_ref()) {
        warn!("Failed to send the {} command.", RigCommand::SelfTest.as_ref());
    }

    Some(ControlLoop::new(source, profile, link, config, stop))
}
