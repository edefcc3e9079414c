//! Coordinate mapper: event fingerprint to world position.
//!
//! # Responsibility
//! - Place every event at a deterministic point in the shared world space.
//!
//! # Invariants
//! - The fingerprint is read as a 256-bit big-endian hex number. The top bit
//!   is dropped and the remaining 255 bits form three 85-bit axes
//!   (x high, y middle, z low).
//! - Each axis is divided by `WORLD_DOWNSCALE` (2^71), so the world spans
//!   `[0, 2^14]` per axis and relative order of source values is kept.
//! - An axis that touches an unparseable nibble maps to `0.0`; the other
//!   axes are unaffected. Mapping never fails.

use crate::model::event::Event;
use crate::model::visual::Position;

/// Hex digits in a full-width fingerprint.
pub const FINGERPRINT_NIBBLES: usize = 64;
/// Source bits per world axis.
pub const AXIS_BITS: usize = 85;
/// Divisor applied to every 85-bit axis value.
pub const WORLD_DOWNSCALE: u128 = 1 << 71;
/// Upper bound of every world axis after downscaling.
pub const WORLD_EXTENT: f64 = 16_384.0;

type Nibbles = [Option<u8>; FINGERPRINT_NIBBLES];

/// Maps an event to its world position.
pub fn map_to_position(event: &Event) -> Position {
    map_fingerprint(&event.fingerprint)
}

/// Maps a raw hex fingerprint to a world position.
///
/// Accepts an optional `0x` prefix and left-pads short input with zeros.
/// Input longer than 64 digits has no defined layout and maps to the origin.
pub fn map_fingerprint(fingerprint: &str) -> Position {
    let nibbles = decode_nibbles(fingerprint);
    Position::new(
        axis_value(&nibbles, 0),
        axis_value(&nibbles, 1),
        axis_value(&nibbles, 2),
    )
}

fn decode_nibbles(fingerprint: &str) -> Nibbles {
    let trimmed = fingerprint.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let count = digits.chars().count();
    if count > FINGERPRINT_NIBBLES {
        return [None; FINGERPRINT_NIBBLES];
    }

    let mut nibbles = [Some(0u8); FINGERPRINT_NIBBLES];
    let pad = FINGERPRINT_NIBBLES - count;
    for (offset, ch) in digits.chars().enumerate() {
        nibbles[pad + offset] = ch.to_digit(16).and_then(|digit| u8::try_from(digit).ok());
    }
    nibbles
}

fn axis_value(nibbles: &Nibbles, axis: usize) -> f64 {
    // bit 0 is the dropped top bit
    let first_bit = 1 + axis * AXIS_BITS;
    let mut value: u128 = 0;
    for bit in first_bit..first_bit + AXIS_BITS {
        let Some(nibble) = nibbles[bit / 4] else {
            return 0.0;
        };
        let shift = 3 - (bit % 4);
        value = (value << 1) | u128::from((nibble >> shift) & 1);
    }
    value as f64 / WORLD_DOWNSCALE as f64
}
