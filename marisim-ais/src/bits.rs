//! Bit-level packing, 6-bit text, and payload armoring.
//!
//! AIS messages are a contiguous MSB-first bit stream. [`BitWriter`] grows
//! as fields are appended; [`BitReader`] consumes an armored payload. The
//! armor table maps each 6-bit group to a printable ASCII character:
//! `value < 40 ? value + 48 : value + 56`.

use marisim_common::Error;

/// A growable MSB-first bit stream for message encoding.
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.bit_len
    }

    /// True when no bits have been written.
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Writes a single bit.
    pub fn write(&mut self, bit: bool) {
        let octet_index = self.bit_len / 8;
        let bit_index = self.bit_len % 8;
        if octet_index == self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[octet_index] |= 1 << (7 - bit_index);
        }
        self.bit_len += 1;
    }

    /// Writes the low `len` bits of `value`, MSB first.
    pub fn write_u32(&mut self, value: u32, len: usize) {
        debug_assert!(len <= 32);
        for i in (0..len).rev() {
            self.write((value >> i) & 1 != 0);
        }
    }

    /// Writes a signed value as `len`-bit two's complement.
    pub fn write_i32(&mut self, value: i32, len: usize) {
        debug_assert!(len <= 32);
        let mask = if len == 32 { u32::MAX } else { (1u32 << len) - 1 };
        self.write_u32((value as u32) & mask, len);
    }

    /// Writes text as `char_count` 6-bit characters.
    ///
    /// Characters are uppercased and mapped through the AIS 6-bit table
    /// (`@` = 0, `A`-`Z` = 1-26, ASCII 32-63 map to themselves); anything
    /// outside the table becomes `@`. Short strings are padded with `@`.
    pub fn write_text(&mut self, text: &str, char_count: usize) {
        let mut chars = text.chars();
        for _ in 0..char_count {
            let value = match chars.next() {
                Some(c) => char_to_sixbit(c.to_ascii_uppercase()),
                None => 0,
            };
            self.write_u32(value as u32, 6);
        }
    }

    /// Pads the stream with zero bits to a 6-bit boundary.
    ///
    /// Returns the number of fill bits added (0-5).
    pub fn pad_to_sixbit_boundary(&mut self) -> u8 {
        let remainder = self.bit_len % 6;
        if remainder == 0 {
            return 0;
        }
        let fill = 6 - remainder;
        self.write_u32(0, fill);
        fill as u8
    }

    /// Pads to a 6-bit boundary and armors the stream into a payload.
    ///
    /// Returns the printable payload and the fill-bit count.
    pub fn into_payload(mut self) -> (String, u8) {
        let fill_bits = self.pad_to_sixbit_boundary();
        let mut payload = String::with_capacity(self.bit_len / 6);
        for group in 0..self.bit_len / 6 {
            let mut value = 0u8;
            for bit in 0..6 {
                let index = group * 6 + bit;
                let byte = self.data[index / 8];
                value = (value << 1) | ((byte >> (7 - index % 8)) & 1);
            }
            payload.push(armor(value));
        }
        (payload, fill_bits)
    }
}

/// A bit-stream reader over a de-armored AIS payload.
#[derive(Debug)]
pub struct BitReader {
    bits: Vec<bool>,
    index: usize,
}

impl BitReader {
    /// De-armors a payload into a readable bit stream.
    ///
    /// `fill_bits` trailing pad bits are discarded. Fails with
    /// [`Error::InvalidArmorCharacter`] on any character outside the armor
    /// alphabet.
    pub fn from_payload(payload: &str, fill_bits: u8) -> Result<Self, Error> {
        let mut bits = Vec::with_capacity(payload.len() * 6);
        for c in payload.chars() {
            let value = de_armor(c)?;
            for bit in (0..6).rev() {
                bits.push((value >> bit) & 1 != 0);
            }
        }
        bits.truncate(bits.len().saturating_sub(fill_bits as usize));
        Ok(Self { bits, index: 0 })
    }

    /// Bits left to read.
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.index
    }

    /// Reads `len` bits as an unsigned value.
    pub fn read_u32(&mut self, len: usize) -> Result<u32, Error> {
        debug_assert!(len <= 32);
        if self.remaining() < len {
            return Err(Error::TruncatedPayload {
                needed: len,
                available: self.remaining(),
            });
        }
        let mut value = 0u32;
        for _ in 0..len {
            value = (value << 1) | u32::from(self.bits[self.index]);
            self.index += 1;
        }
        Ok(value)
    }

    /// Reads `len` bits as a two's-complement signed value.
    pub fn read_i32(&mut self, len: usize) -> Result<i32, Error> {
        let raw = self.read_u32(len)?;
        if len == 32 || raw & (1 << (len - 1)) == 0 {
            Ok(raw as i32)
        } else {
            Ok((raw as i32) - (1i32 << len))
        }
    }

    /// Reads `char_count` 6-bit characters as text.
    ///
    /// Trailing `@` padding and spaces are stripped.
    pub fn read_text(&mut self, char_count: usize) -> Result<String, Error> {
        let mut text = String::with_capacity(char_count);
        for _ in 0..char_count {
            let value = self.read_u32(6)? as u8;
            text.push(sixbit_to_char(value));
        }
        Ok(text.trim_end_matches(['@', ' ']).to_string())
    }
}

/// Armors a 6-bit value into its printable ASCII character.
fn armor(value: u8) -> char {
    debug_assert!(value < 64);
    if value < 40 {
        (value + 48) as char
    } else {
        (value + 56) as char
    }
}

/// De-armors a printable character back to its 6-bit value.
fn de_armor(c: char) -> Result<u8, Error> {
    match c as u32 {
        v @ 48..=87 => Ok((v - 48) as u8),
        v @ 96..=119 => Ok((v - 56) as u8),
        _ => Err(Error::InvalidArmorCharacter(c)),
    }
}

/// Maps a character to its 6-bit text value.
fn char_to_sixbit(c: char) -> u8 {
    match c as u32 {
        // '@' and 'A'-'Z'
        v @ 64..=95 => (v - 64) as u8,
        // space through '?'
        v @ 32..=63 => v as u8,
        _ => 0,
    }
}

/// Maps a 6-bit text value back to its character.
fn sixbit_to_char(value: u8) -> char {
    if value < 32 {
        (value + 64) as char
    } else {
        value as char
    }
}
