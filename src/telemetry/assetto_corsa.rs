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

/// Assetto Corsa telemetry from the shared memory to UDP bridge.
pub struct AssettoCorsa {
    _receiver: UdpReceiver,
}

impl AssettoCorsa {
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
            _receiver: UdpReceiver::new(Simulator::AssettoCorsa.display_name(), host, port, timeout),
        }
    }

    /// Decode the payload.
    ///
    /// # Notes
    /// Six little-endian i16 channels normalized by 32767 in the order of
    /// heave, surge, sway, roll, pitch, and yaw.
    ///
    /// # Arguments
    /// * `payload` - Payload.
    ///
    /// # Returns
    /// Telemetry frame. None if the payload is short.
    pub fn decode(payload: &[u8]) -> Option<TelemetryFrame> {
        let values = parse_int16_values(payload)?;

        Some(TelemetryFrame {
            heave: values[0],
            surge: values[1],
            sway: values[2],
            roll: values[3],
            pitch: values[4],
            yaw: values[5],
        })
    }
}

impl TelemetrySource for AssettoCorsa {
    fn name(&self) -> &str {
        Simulator::AssettoCorsa.display_name()
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

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::net::UdpSocket;
    use std::thread::sleep;

    use crate::constants::LOCAL_HOST;

    const EPSILON: f64 = 1e-7;

    fn create_payload(values: [i16; 6]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode() {
        let frame =
            AssettoCorsa::decode(&create_payload([32767, -32767, 0, 16384, 0, 1])).unwrap();

        assert_eq!(frame.heave, 1.0);
        assert_eq!(frame.surge, -1.0);
        assert_eq!(frame.sway, 0.0);
        assert_relative_eq!(frame.roll, 16384.0 / 32767.0, epsilon = EPSILON);
        assert_eq!(frame.pitch, 0.0);
        assert_relative_eq!(frame.yaw, 1.0 / 32767.0, epsilon = EPSILON);

        assert_eq!(AssettoCorsa::decode(&[0; 6]), None);
    }

    #[test]
    fn test_poll() {
        let mut source = AssettoCorsa::new(LOCAL_HOST, 0, Duration::from_millis(50));

        assert_eq!(source.poll(), None);

        let port = source._receiver.local_port().unwrap();
        let client = UdpSocket::bind(format!("{LOCAL_HOST}:0")).unwrap();

        // Short payload
        client
            .send_to(&[1, 2, 3], format!("{LOCAL_HOST}:{port}"))
            .unwrap();
        sleep(Duration::from_millis(20));

        assert_eq!(source.poll(), None);

        client
            .send_to(
                &create_payload([32767, 0, 0, 0, 0, 0]),
                format!("{LOCAL_HOST}:{port}"),
            )
            .unwrap();
        sleep(Duration::from_millis(20));

        assert_eq!(source.poll().unwrap().heave, 1.0);
    }
}
