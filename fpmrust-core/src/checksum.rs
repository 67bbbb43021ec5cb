//! Frame checksum
//!
//! The module protects every frame with a plain additive checksum:
//! 1. Start from the packet type byte
//! 2. Add both bytes of the big-endian length field
//! 3. Add the instruction (or confirmation) code and every parameter byte
//! 4. Keep the low 16 bits
//!
//! The start code and the address are not covered.

use tracing::trace;

/// Calculate the checksum of a frame
///
/// # Algorithm
///
/// ```text
/// sum = packet_type + len_hi + len_lo + code + Σ parameters   (mod 0x10000)
/// ```
///
/// # Examples
///
/// ```
/// use fpmrust_core::checksum;
///
/// // Verify-password command with the default password
/// let checksum = checksum::calculate(0x01, 0x0007, 0x13, &[0, 0, 0, 0]);
/// assert_eq!(checksum, 0x001B);
/// ```
pub fn calculate(packet_type: u8, length: u16, code: u8, parameters: &[u8]) -> u16 {
    let [len_hi, len_lo] = length.to_be_bytes();

    let checksum = [packet_type, len_hi, len_lo, code]
        .iter()
        .chain(parameters)
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)));

    trace!(
        packet_type = packet_type,
        length = length,
        code = code,
        parameters_len = parameters.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify checksum
pub fn verify(packet_type: u8, length: u16, code: u8, parameters: &[u8], expected: u16) -> bool {
    calculate(packet_type, length, code, parameters) == expected
}
