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

use log::{debug, error, info, trace, warn};
use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use crate::constants::{DEFAULT_BAUD_RATE, SUPPORTED_BAUD_RATES, TERMINATOR};
use crate::telemetry::telemetry_frame::ActuatorTargets;

/// Get the supported baud rate.
///
/// # Arguments
/// * `baud_rate` - Requested baud rate.
///
/// # Returns
/// The requested baud rate if it is supported. Otherwise, the default baud
/// rate.
pub fn supported_baud_rate(baud_rate: u32) -> u32 {
    if SUPPORTED_BAUD_RATES.contains(&baud_rate) {
        baud_rate
    } else {
        DEFAULT_BAUD_RATE
    }
}

/// Check the command token. The token should not collide with the target
/// line that begins with a decimal integer.
///
/// # Arguments
/// * `command` - Command token.
///
/// # Returns
/// True if the token begins with an uppercase letter and has the uppercase
/// letters, digits, and underscores only. Otherwise, false.
pub fn is_valid_command(command: &str) -> bool {
    let mut chars = command.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars
            .all(|item| item.is_ascii_uppercase() || item.is_ascii_digit() || (item == '_')),
        _ => false,
    }
}

/// Format the target line: "tick,h1,h2,...,hN\n". The heights are truncated
/// toward zero.
///
/// # Arguments
/// * `tick` - Tick of the frame.
/// * `targets` - Target heights in mm.
///
/// # Returns
/// Target line with the terminator.
pub fn format_targets(tick: u64, targets: &ActuatorTargets) -> String {
    let mut line = tick.to_string();
    for height in targets.heights() {
        let _ = write!(line, ",{}", height.trunc() as i64);
    }
    line.push_str(&String::from_utf8_lossy(TERMINATOR));

    line
}

pub struct ActuatorLink {
    _name: String,
    // Byte stream to the rig firmware. None if the link is closed.
    _stream: Option<Box<dyn Write + Send>>,
    // Timeout of the serial write.
    pub timeout: Duration,
}

impl ActuatorLink {
    /// Create a new closed link.
    ///
    /// # Arguments
    /// * `name` - Name of the link.
    /// * `timeout` - Timeout of the serial write.
    ///
    /// # Returns
    /// A new ActuatorLink instance.
    pub fn new(name: &str, timeout: Duration) -> Self {
        Self {
            _name: String::from(name),
            _stream: None,
            timeout: timeout,
        }
    }

    /// Open the serial port in the raw mode (8N1, no flow control). Any
    /// opened stream is closed first.
    ///
    /// # Arguments
    /// * `address` - Serial port such as "/dev/ttyUSB0".
    /// * `baud_rate` - Baud rate. The unsupported one falls back to 115200.
    ///
    /// # Returns
    /// True if the port is opened. Otherwise, false and the link stays
    /// closed.
    pub fn open(&mut self, address: &str, baud_rate: u32) -> bool {
        self.close();

        let rate = supported_baud_rate(baud_rate);
        if rate != baud_rate {
            warn!(
                "{} does not support the baud rate {baud_rate}. Use {rate}.",
                self._name
            );
        }

        match serialport::new(address, rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()
        {
            Ok(port) => {
                info!("{} is opened on {address} @ {rate} baud.", self._name);

                self._stream = Some(Box::new(port));

                true
            }
            Err(err) => {
                error!("{} fails to open {address}: {err}.", self._name);

                false
            }
        }
    }

    /// Attach an opened byte stream instead of the serial port. This is used
    /// by the simulation mode and the test.
    ///
    /// # Arguments
    /// * `stream` - Byte stream.
    pub fn attach(&mut self, stream: Box<dyn Write + Send>) {
        self.close();

        info!("{} is attached to a stream.", self._name);
        self._stream = Some(stream);
    }

    /// The link is opened or not.
    pub fn is_open(&self) -> bool {
        self._stream.is_some()
    }

    /// Send the target heights.
    ///
    /// # Arguments
    /// * `tick` - Tick of the frame.
    /// * `targets` - Target heights in mm.
    ///
    /// # Returns
    /// True if the whole line is written. False if the link is closed or the
    /// write is short or fails.
    pub fn send_targets(&mut self, tick: u64, targets: &ActuatorTargets) -> bool {
        if !self.is_open() {
            return false;
        }

        let line = format_targets(tick, targets);
        trace!("{} sends: {}", self._name, line.trim_end());

        self.write_payload(line.as_bytes())
    }

    /// Send the out-of-band command such as "HOME" and "SELFTEST".
    ///
    /// # Arguments
    /// * `command` - Command token.
    ///
    /// # Returns
    /// True if the whole line is written. False if the link is closed, the
    /// token is invalid, or the write is short or fails.
    pub fn send_command(&mut self, command: &str) -> bool {
        if !self.is_open() {
            return false;
        }

        if !is_valid_command(command) {
            warn!("{} rejects the invalid command: {command:?}.", self._name);
            return false;
        }

        let mut payload = command.as_bytes().to_vec();
        payload.extend_from_slice(TERMINATOR);

        info!("{} sends the command: {command}.", self._name);
        self.write_payload(&payload)
    }

    /// Write the payload in a single write.
    ///
    /// # Arguments
    /// * `payload` - Payload.
    ///
    /// # Returns
    /// True if the whole payload is written and flushed. Otherwise, false.
    fn write_payload(&mut self, payload: &[u8]) -> bool {
        let stream = match self._stream.as_mut() {
            Some(stream) => stream,
            None => return false,
        };

        match stream.write(payload) {
            Ok(length) if length == payload.len() => match stream.flush() {
                Ok(_) => true,
                Err(err) => {
                    debug!("{} fails to flush: {err}.", self._name);
                    false
                }
            },
            Ok(length) => {
                debug!(
                    "{} writes {length} of {} bytes only.",
                    self._name,
                    payload.len()
                );
                false
            }
            Err(err) => {
                debug!("{} fails to write: {err}.", self._name);
                false
            }
        }
    }

    /// Close the link. This is safe to call when the link is closed.
    pub fn close(&mut self) {
        if let Some(mut stream) = self._stream.take() {
            // Ignore the possible error.
            let _ = stream.flush();

            info!("{} is closed.", self._name);
        }
    }
}

impl Drop for ActuatorLink {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constants::MOCK_RIG_CAPACITY;
    use crate::mock::mock_rig::MockRig;

    fn create_link() -> (ActuatorLink, MockRig) {
        let rig = MockRig::new(MOCK_RIG_CAPACITY);

        let mut link = ActuatorLink::new("link", Duration::from_millis(10));
        link.attach(Box::new(rig.clone()));

        (link, rig)
    }

    #[test]
    fn test_supported_baud_rate() {
        for rate in SUPPORTED_BAUD_RATES {
            assert_eq!(supported_baud_rate(rate), rate);
        }

        assert_eq!(supported_baud_rate(0), 115200);
        assert_eq!(supported_baud_rate(250000), 115200);
    }

    #[test]
    fn test_is_valid_command() {
        assert!(is_valid_command("HOME"));
        assert!(is_valid_command("SELFTEST"));
        assert!(is_valid_command("PARK_2"));

        assert!(!is_valid_command(""));
        assert!(!is_valid_command("7HOME"));
        assert!(!is_valid_command("home"));
        assert!(!is_valid_command("HOME\n"));
        assert!(!is_valid_command("HO,ME"));
        assert!(!is_valid_command("_HOME"));
    }

    #[test]
    fn test_format_targets() {
        assert_eq!(
            format_targets(42, &ActuatorTargets::from(vec![120.9, 118.0, 95.5, 101.2])),
            "42,120,118,95,101\n"
        );
        assert_eq!(
            format_targets(0, &ActuatorTargets::from(vec![-0.7, -3.2])),
            "0,0,-3\n"
        );
        assert_eq!(format_targets(5, &ActuatorTargets::default()), "5\n");
    }

    #[test]
    fn test_send_targets() {
        let (mut link, rig) = create_link();

        assert!(link.is_open());
        assert!(link.send_targets(
            7,
            &ActuatorTargets::from(vec![120.0, 118.0, 95.0, 101.0])
        ));

        assert_eq!(rig.written(), b"7,120,118,95,101\n".to_vec());
    }

    #[test]
    fn test_send_command() {
        let (mut link, rig) = create_link();

        assert!(link.send_command("HOME"));
        assert_eq!(rig.written(), b"HOME\n".to_vec());

        // Invalid command is not written.
        assert!(!link.send_command("42"));
        assert_eq!(rig.written(), b"HOME\n".to_vec());
    }

    #[test]
    fn test_send_short_write() {
        let rig = MockRig::with_max_write(MOCK_RIG_CAPACITY, 4);
        let mut link = ActuatorLink::new("link", Duration::from_millis(10));
        link.attach(Box::new(rig.clone()));

        assert!(!link.send_targets(1, &ActuatorTargets::from(vec![100.0, 100.0])));
        assert!(!link.send_command("SELFTEST"));

        // Short enough
        assert!(link.send_command("AB"));
    }

    #[test]
    fn test_send_broken() {
        let (mut link, rig) = create_link();

        rig.set_broken(true);
        assert!(!link.send_targets(1, &ActuatorTargets::from(vec![1.0])));

        // The link keeps the stream and recovers.
        assert!(link.is_open());
        rig.set_broken(false);
        assert!(link.send_targets(2, &ActuatorTargets::from(vec![1.0])));
        assert_eq!(rig.lines(), vec!["2,1"]);
    }

    #[test]
    fn test_closed_link() {
        let mut link = ActuatorLink::new("link", Duration::from_millis(10));

        assert!(!link.is_open());
        for tick in 0..3 {
            assert!(!link.send_targets(tick, &ActuatorTargets::from(vec![1.0])));
            assert!(!link.send_command("HOME"));
            link.close();
        }
    }

    #[test]
    fn test_close() {
        let (mut link, rig) = create_link();

        link.close();
        link.close();

        assert!(!link.is_open());
        assert!(!link.send_targets(1, &ActuatorTargets::from(vec![1.0])));
        assert!(!link.send_command("HOME"));

        // No I/O after the close.
        assert!(rig.written().is_empty());
    }

    #[test]
    fn test_open_fail() {
        let mut link = ActuatorLink::new("link", Duration::from_millis(10));

        assert!(!link.open("/dev/no_such_serial_port", 115200));
        assert!(!link.is_open());
        assert!(!link.send_command("HOME"));
    }

    #[test]
    fn test_open_fail_closes_previous_stream() {
        let (mut link, _rig) = create_link();

        assert!(!link.open("/dev/no_such_serial_port", 9600));
        assert!(!link.is_open());
    }
}
