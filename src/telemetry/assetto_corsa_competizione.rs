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

use log::debug;
use std::time::Duration;

use crate::enums::Simulator;
use crate::telemetry::payload::parse_ascii_values;
use crate::telemetry::telemetry_frame::TelemetryFrame;
use crate::telemetry::telemetry_source::TelemetrySource;
use crate::telemetry::udp_receiver::UdpReceiver;

/// Assetto Corsa Competizione telemetry bridged over UDP.
pub struct AssettoCorsaCompetizione {
    _receiver: UdpReceiver,
}

impl AssettoCorsaCompetizione {
    /// Create a new source.
    ///
    /// # Arguments
    /// * `host` - Host to bind.
    /// * `port` - UDP port to listen.
    /// * `timeout` - Bounded wait of the poll.
    ///
    /// # Returns
    /// A new source.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            _receiver: UdpReceiver::new(
                Simulator::AssettoCorsaCompetizione.display_name(),
                host,
                port,
                timeout,
            ),
        }
    }

    /// Decode the payload.
    ///
    /// # Notes
    /// The payload is ASCII: "surge sway heave roll pitch yaw", separated by
    /// whitespace.
    ///
    /// # Arguments
    /// * `payload` - Payload.
    ///
    /// # Returns
    /// Telemetry frame. None if the payload is malformed.
    pub fn decode(payload: &[u8]) -> Option<TelemetryFrame> {
        parse_ascii_values(payload, None).map(TelemetryFrame::from_values)
    }
}

impl TelemetrySource for AssettoCorsaCompetizione {
    fn name(&self) -> &str {
        Simulator::AssettoCorsaCompetizione.display_name()
    }

    fn poll(&mut self) -> Option<TelemetryFrame> {
        let payload = self._receiver.receive()?;

        let frame = Self::decode(payload);
        if frame.is_none() {
            debug!("{} drops a malformed payload.", self.name());
        }

        frame
    }
}
