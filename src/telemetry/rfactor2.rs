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
use crate::telemetry::payload::parse_int16_values;
use crate::telemetry::telemetry_frame::TelemetryFrame;
use crate::telemetry::telemetry_source::TelemetrySource;
use crate::telemetry::udp_receiver::UdpReceiver;

/// rFactor 2 telemetry from the internals plugin broadcast.
pub struct Rfactor2 {
    _receiver: UdpReceiver,
}

impl Rfactor2 {
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
            _receiver: UdpReceiver::new(Simulator::Rfactor2.display_name(), host, port, timeout),
        }
    }

    /// Decode the payload.
    ///
    /// # Notes
    /// Six little-endian i16 channels normalized by 32767 in the order of
    /// sway, pitch, yaw, surge, heave, and roll.
    ///
    /// # Arguments
    /// * `payload` - Payload.
    ///
    /// # Returns
    /// Telemetry frame. None if the payload is short.
    pub fn decode(payload: &[u8]) -> Option<TelemetryFrame> {
        let values = parse_int16_values(payload)?;

        Some(TelemetryFrame {
            sway: values[0],
            pitch: values[1],
            yaw: values[2],
            surge: values[3],
            heave: values[4],
            roll: values[5],
        })
    }
}

impl TelemetrySource for Rfactor2 {
    fn name(&self) -> &str {
        Simulator::Rfactor2.display_name()
    }

    fn poll(&mut self) -> Option<TelemetryFrame> {
        let payload = self._receiver.receive()?;

        let frame = Self::decode(payload);
        if frame.is_none() {
            debug!("{} drops a short payload.", self.name());
        }

        frame
    }
}
