use crate::constants::{NUM_AXIS, SCALE_INT16};

/// Parse the six ASCII values.
///
/// # Arguments
/// * `payload` - ASCII payload.
/// * `separator` - Separator of the values. Use None for the whitespace.
///
/// # Returns
/// Six finite values in the order of the payload. None if there are fewer
/// than six values or any of them is not a finite number.
pub fn parse_ascii_values(payload: &[u8], separator: Option<char>) -> Option<[f64; NUM_AXIS]> {
    let text = std::str::from_utf8(payload).ok()?;

    let tokens: Vec<&str> = match separator {
        Some(separator) => text.trim().split(separator).collect(),
        None => text.split_whitespace().collect(),
    };

    if tokens.len() < NUM_AXIS {
        return None;
    }

    let mut values = [0.0; NUM_AXIS];
    for (value, token) in values.iter_mut().zip(tokens.iter()) {
        let number: f64 = token.trim().parse().ok()?;
        if !number.is_finite() {
            return None;
        }

        *value = number;
    }

    Some(values)
}

/// Parse the six little-endian signed 16-bit channels normalized into
/// [-1, 1].
///
/// # Arguments
/// * `payload` - Binary payload. The bytes after the 12th are ignored.
///
/// # Returns
/// Six values in the order of the payload. None if the payload is short.
pub fn parse_int16_values(payload: &[u8]) -> Option<[f64; NUM_AXIS]> {
    if payload.len() < 2 * NUM_AXIS {
        return None;
    }

    let mut values = [0.0; NUM_AXIS];
    for (value, bytes) in values.iter_mut().zip(payload.chunks_exact(2)) {
        *value = (i16::from_le_bytes([bytes[0], bytes[1]]) as f64) / SCALE_INT16;
    }

    Some(values)
}
