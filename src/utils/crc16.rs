//! CRC-16/CCITT-FALSE as used by the payment-code checksum field.
//!
//! Polynomial 0x1021, initial value 0xFFFF, MSB first, no reflection, no final XOR.

use crate::models::PixError;

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Checksum of `text` as four uppercase hex digits.
///
/// Only single-byte (ASCII) text is accepted so the result is the same one a
/// scanner computes over the raw code points.
pub fn checksum_hex(text: &str) -> Result<String, PixError> {
    if let Some((position, ch)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(PixError::InvalidCharacter { ch, position });
    }
    Ok(format!("{:04X}", crc16_ccitt(text.as_bytes())))
}
