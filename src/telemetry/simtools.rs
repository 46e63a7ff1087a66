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

/// SimTools game engine UDP output.
pub struct SimTools {
    _receiver: UdpReceiver,
}

impl SimTools {
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
            _receiver: UdpReceiver::new(Simulator::SimTools.display_name(), host, port, timeout),
        }
    }

    /// Decode the payload.
    ///
    /// # Notes
    /// The payload is ASCII: "surge,sway,heave,pitch,roll,yaw". Note the pitch
    /// is before the roll.
    ///
    /// # Arguments
    /// * `payload` - Payload.
    ///
    /// # Returns
    /// Telemetry frame. None if the payload is malformed.
    pub fn decode(payload: &[u8]) -> Option<TelemetryFrame> {
        let values = parse_ascii_values(payload, Some(','))?;

        Some(TelemetryFrame {
            surge: values[0],
            sway: values[1],
            heave: values[2],
            pitch: values[3],
            roll: values[4],
            yaw: values[5],
        })
    }
}

impl TelemetrySource for SimTools {
    fn name(&self) -> &str {
        Simulator::SimTools.display_name()
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

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::UdpSocket;
    use std::thread::sleep;

    use crate::constants::LOCAL_HOST;

    #[test]
    fn test_decode() {
        assert_eq!(
            SimTools::decode(b"0.1,0.2,0.3,0.4,0.5,0.6\n"),
            Some(TelemetryFrame {
                surge: 0.1,
                sway: 0.2,
                heave: 0.3,
                roll: 0.5,
                pitch: 0.4,
                yaw: 0.6,
            })
        );

        assert_eq!(SimTools::decode(b"0.1,0.2,0.3,0.4,0.5"), None);
        assert_eq!(SimTools::decode(b"0.1 0.2 0.3 0.4 0.5 0.6"), None);
    }

    #[test]
    fn test_poll() {
        let mut source = SimTools::new(LOCAL_HOST, 0, Duration::from_millis(50));

        assert_eq!(source.poll(), None);

        let port = source._receiver.local_port().unwrap();
        let client = UdpSocket::bind(format!("{LOCAL_HOST}:0")).unwrap();
        client
            .send_to(b"1,2,3,4,5,6", format!("{LOCAL_HOST}:{port}"))
            .unwrap();
        sleep(Duration::from_millis(20));

        let frame = source.poll().unwrap();
        assert_eq!(frame.pitch, 4.0);
        assert_eq!(frame.roll, 5.0);
    }
}
