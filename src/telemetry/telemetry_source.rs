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

use std::str::FromStr;
use std::time::Duration;

use crate::config::AppConfig;
use crate::enums::Simulator;
use crate::telemetry::assetto_corsa::AssettoCorsa;
use crate::telemetry::assetto_corsa_competizione::AssettoCorsaCompetizione;
use crate::telemetry::rfactor2::Rfactor2;
use crate::telemetry::simtools::SimTools;
use crate::telemetry::telemetry_frame::TelemetryFrame;

pub trait TelemetrySource {
    /// Get the name of the source.
    ///
    /// # Returns
    /// Source name.
    fn name(&self) -> &str;

    /// Poll the most recent telemetry within the bounded wait of the source.
    /// This never blocks indefinitely and is retryable after any failure.
    ///
    /// # Returns
    /// Complete telemetry frame. None if there is no data in time, the
    /// payload can not be decoded, or the transport is not ready.
    fn poll(&mut self) -> Option<TelemetryFrame>;
}

/// Make the telemetry source.
///
/// # Arguments
/// * `id` - Case-insensitive simulator identifier such as "acc" or
/// "assetto_corsa_competizione".
/// * `config` - Application configuration.
///
/// # Returns
/// Telemetry source. None if the identifier is unknown.
pub fn make_source(id: &str, config: &AppConfig) -> Option<Box<dyn TelemetrySource + Send>> {
    let simulator = Simulator::from_str(id).ok()?;
    let host = config.bind_host.as_str();
    let timeout = Duration::from_millis(config.poll_timeout_ms);

    let source: Box<dyn TelemetrySource + Send> = match simulator {
        Simulator::AssettoCorsa => Box::new(AssettoCorsa::new(
            host,
            config.port_assetto_corsa,
            timeout,
        )),
        Simulator::AssettoCorsaCompetizione => Box::new(AssettoCorsaCompetizione::new(
            host,
            config.port_assetto_corsa_competizione,
            timeout,
        )),
        Simulator::Rfactor2 => Box::new(Rfactor2::new(host, config.port_rfactor2, timeout)),
        Simulator::SimTools => Box::new(SimTools::new(host, config.port_simtools, timeout)),
    };

    Some(source)
}
