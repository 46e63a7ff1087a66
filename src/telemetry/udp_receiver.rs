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

use log::{debug, info, warn};
use std::io::{self, ErrorKind};
use std::net::UdpSocket;
use std::time::Duration;

use crate::constants::SIZE_UDP_BUFFER;

pub struct UdpReceiver {
    _name: String,
    _host: String,
    // Put 0 to let the OS choose the port number.
    _port: u16,
    // Bounded wait of each receive.
    _timeout: Duration,
    // Bound lazily so that the simulator can start later.
    _socket: Option<UdpSocket>,
    _buffer: Vec<u8>,
    // Report the bind failure only once until the socket is bound.
    _is_failure_reported: bool,
}

impl UdpReceiver {
    /// Create a new UDP receiver. The socket is not bound until the first
    /// receive.
    ///
    /// # Arguments
    /// * `name` - Name of the receiver.
    /// * `host` - Host to bind.
    /// * `port` - Port to bind.
    /// * `timeout` - Bounded wait of each receive. The minimum is 1 ms.
    ///
    /// # Returns
    /// A new UDP receiver.
    pub fn new(name: &str, host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            _name: String::from(name),
            _host: String::from(host),
            _port: port,
            _timeout: timeout.max(Duration::from_millis(1)),

            _socket: None,
            _buffer: vec![0; SIZE_UDP_BUFFER],

            _is_failure_reported: false,
        }
    }

    /// Bind the socket if it is not bound yet.
    ///
    /// # Returns
    /// True if the socket is bound. Otherwise, false.
    pub fn bind(&mut self) -> bool {
        if self._socket.is_some() {
            return true;
        }

        let address = format!("{}:{}", self._host, self._port);
        let socket = match UdpSocket::bind(&address) {
            Ok(socket) => socket,
            Err(error) => {
                if !self._is_failure_reported {
                    warn!("{} fails to bind {address}: {error}. Retry later.", self._name);
                    self._is_failure_reported = true;
                }
                return false;
            }
        };

        if let Err(error) = socket.set_read_timeout(Some(self._timeout)) {
            warn!("{} fails to set the read timeout: {error}.", self._name);
            return false;
        }

        info!("{} listens on {address}.", self._name);

        self._is_failure_reported = false;
        self._socket = Some(socket);

        true
    }

    /// Local port of the bound socket.
    ///
    /// # Returns
    /// Port number. None if the socket is not bound.
    pub fn local_port(&self) -> Option<u16> {
        let socket = self._socket.as_ref()?;
        socket.local_addr().ok().map(|address| address.port())
    }

    /// Receive the latest datagram within the bounded wait. The queued older
    /// datagrams are discarded.
    ///
    /// # Returns
    /// Payload of the datagram. None if there is no data, the socket can not
    /// be bound, or the datagram is empty.
    pub fn receive(&mut self) -> Option<&[u8]> {
        if !self.bind() {
            return None;
        }

        let socket = self._socket.as_ref()?;
        let mut length = match socket.recv(&mut self._buffer) {
            Ok(length) => length,
            Err(error) => {
                match error.kind() {
                    ErrorKind::WouldBlock | ErrorKind::TimedOut => {}
                    _ => {
                        debug!("{} fails to receive: {error}.", self._name);
                    }
                }
                return None;
            }
        };

        // Drain the queue to get the most recent sample.
        let mut result_blocking = Ok(());
        if socket.set_nonblocking(true).is_ok() {
            while let Ok(latest) = socket.recv(&mut self._buffer) {
                length = latest;
            }
            result_blocking = socket.set_nonblocking(false);
        }
        self.check_blocking_mode(result_blocking);

        if length == 0 {
            return None;
        }

        Some(&self._buffer[..length])
    }

    /// Check the result of restoring the blocking mode. A non-blocking socket
    /// loses the bounded wait, so it is dropped and bound again in the next
    /// receive.
    ///
    /// # Arguments
    /// * `result` - Result of restoring the blocking mode.
    fn check_blocking_mode(&mut self, result: io::Result<()>) {
        if let Err(error) = result {
            warn!(
                "{} fails to restore the blocking mode: {error}. Bind again later.",
                self._name
            );
            self._socket = None;
        }
    }
}
