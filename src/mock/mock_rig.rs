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

use std::collections::VecDeque;
use std::io::{Error, ErrorKind, Result, Write};
use std::sync::{Arc, Mutex};

/// In-memory rig that records the bytes written by the actuator link. The
/// clones share the same record, so the test can keep one clone and give
/// the other to the link.
#[derive(Clone)]
pub struct MockRig {
    _written: Arc<Mutex<VecDeque<u8>>>,
    // Keep the latest bytes only.
    _capacity: usize,
    // Maximum bytes accepted in a single write to simulate a short write.
    _max_write: Option<usize>,
    // Fail all the writes.
    _is_broken: Arc<Mutex<bool>>,
}

impl MockRig {
    /// Create a new mock rig.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of the recorded bytes.
    ///
    /// # Returns
    /// A new mock rig.
    pub fn new(capacity: usize) -> Self {
        Self {
            _written: Arc::new(Mutex::new(VecDeque::new())),
            _capacity: capacity,
            _max_write: None,
            _is_broken: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a new mock rig that accepts at most `max_write` bytes in each
    /// write.
    pub fn with_max_write(capacity: usize, max_write: usize) -> Self {
        let mut rig = Self::new(capacity);
        rig._max_write = Some(max_write);

        rig
    }

    /// Break or repair the connection.
    pub fn set_broken(&self, is_broken: bool) {
        if let Ok(mut state) = self._is_broken.lock() {
            *state = is_broken;
        }
    }

    /// Get the recorded bytes.
    pub fn written(&self) -> Vec<u8> {
        match self._written.lock() {
            Ok(written) => written.iter().copied().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Get the recorded complete lines without the terminator.
    pub fn lines(&self) -> Vec<String> {
        let written = String::from_utf8_lossy(&self.written()).to_string();

        let mut lines: Vec<String> = written.split('\n').map(String::from).collect();
        // The last item is incomplete or empty.
        lines.pop();

        lines
    }
}

impl Write for MockRig {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self._is_broken.lock().map(|state| *state).unwrap_or(true) {
            return Err(Error::new(ErrorKind::BrokenPipe, "mock rig is broken"));
        }

        let length = match self._max_write {
            Some(max_write) => buf.len().min(max_write),
            None => buf.len(),
        };

        let mut written = self
            ._written
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "mock rig is poisoned"))?;
        written.extend(&buf[..length]);
        while written.len() > self._capacity {
            written.pop_front();
        }

        Ok(length)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write() {
        let rig = MockRig::new(100);
        let mut writer = rig.clone();

        assert_eq!(writer.write(b"1,2\nHOME\n").unwrap(), 9);

        assert_eq!(rig.written(), b"1,2\nHOME\n".to_vec());
        assert_eq!(rig.lines(), vec!["1,2", "HOME"]);
    }

    #[test]
    fn test_write_capacity() {
        let rig = MockRig::new(4);
        let mut writer = rig.clone();

        writer.write_all(b"abcdef").unwrap();

        assert_eq!(rig.written(), b"cdef".to_vec());
    }

    #[test]
    fn test_write_short() {
        let rig = MockRig::with_max_write(100, 3);
        let mut writer = rig.clone();

        assert_eq!(writer.write(b"12345").unwrap(), 3);
        assert_eq!(rig.written(), b"123".to_vec());
        assert!(rig.lines().is_empty());
    }

    #[test]
    fn test_set_broken() {
        let rig = MockRig::new(100);
        let mut writer = rig.clone();

        rig.set_broken(true);
        assert!(writer.write(b"1\n").is_err());

        rig.set_broken(false);
        assert!(writer.write(b"1\n").is_ok());
    }
}
