//! Ion 1.0 binary encoding.

mod reader;
mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;

use num_bigint::{BigInt, Sign};

/// Writes a VarUInt: 7 data bits per byte, MSB set on the last byte.
pub(crate) fn write_var_uint(out: &mut Vec<u8>, n: u64) {
    let mut groups = [0u8; 10];
    let mut len = 0;
    let mut rest = n;
    loop {
        groups[len] = (rest & 0x7f) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..len).rev() {
        let byte = groups[i];
        out.push(if i == 0 { byte | 0x80 } else { byte });
    }
}

/// Writes a VarInt: like VarUInt, but the first byte spends bit 6 on the sign.
pub(crate) fn write_var_int(out: &mut Vec<u8>, n: i64) {
    let negative = n < 0;
    let mut rest = n.unsigned_abs();
    let mut groups = Vec::with_capacity(10);
    loop {
        groups.push((rest & 0x7f) as u8);
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    // The most significant group only has 6 bits available.
    if groups.last().is_some_and(|g| g & 0x40 != 0) {
        groups.push(0);
    }
    let last = groups.len() - 1;
    for (i, group) in groups.iter().rev().enumerate() {
        let mut byte = *group;
        if i == 0 && negative {
            byte |= 0x40;
        }
        if i == last {
            byte |= 0x80;
        }
        out.push(byte);
    }
}

/// Big-endian magnitude bytes with leading zeros stripped (empty for zero).
pub(crate) fn uint_bytes(n: u64) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

/// Signed-magnitude fixed-length Int (as used by decimal coefficients).
///
/// Zero is encoded as no bytes.
pub(crate) fn signed_magnitude_bytes(n: &BigInt) -> Vec<u8> {
    let (sign, mut magnitude) = n.to_bytes_be();
    if sign == Sign::NoSign {
        return Vec::new();
    }
    if magnitude[0] & 0x80 != 0 {
        magnitude.insert(0, 0);
    }
    if sign == Sign::Minus {
        magnitude[0] |= 0x80;
    }
    magnitude
}

/// Writes a type descriptor with its length, spilling into a VarUInt when needed.
pub(crate) fn write_header(out: &mut Vec<u8>, overlay: u8, len: usize) {
    if len < crate::constants::LEN_VAR as usize {
        out.push(overlay | len as u8);
    } else {
        out.push(overlay | crate::constants::LEN_VAR);
        write_var_uint(out, len as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_uint(n: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_var_uint(&mut out, n);
        out
    }

    fn var_int(n: i64) -> Vec<u8> {
        let mut out = Vec::new();
        write_var_int(&mut out, n);
        out
    }

    #[test]
    fn var_uint_wire() {
        assert_eq!(var_uint(0), vec![0x80]);
        assert_eq!(var_uint(10), vec![0x8a]);
        assert_eq!(var_uint(127), vec![0xff]);
        assert_eq!(var_uint(128), vec![0x01, 0x80]);
        assert_eq!(var_uint(16_383), vec![0x7f, 0xff]);
        assert_eq!(var_uint(16_384), vec![0x01, 0x00, 0x80]);
    }

    #[test]
    fn var_int_wire() {
        assert_eq!(var_int(0), vec![0x80]);
        assert_eq!(var_int(-1), vec![0xc1]);
        assert_eq!(var_int(63), vec![0xbf]);
        assert_eq!(var_int(64), vec![0x00, 0xc0]);
        assert_eq!(var_int(-64), vec![0x40, 0xc0]);
        assert_eq!(var_int(-9), vec![0xc9]);
    }

    #[test]
    fn signed_magnitude_wire() {
        assert_eq!(signed_magnitude_bytes(&BigInt::from(0)), Vec::<u8>::new());
        assert_eq!(signed_magnitude_bytes(&BigInt::from(5)), vec![0x05]);
        assert_eq!(signed_magnitude_bytes(&BigInt::from(-5)), vec![0x85]);
        assert_eq!(signed_magnitude_bytes(&BigInt::from(128)), vec![0x00, 0x80]);
        assert_eq!(signed_magnitude_bytes(&BigInt::from(-128)), vec![0x80, 0x80]);
    }

    #[test]
    fn header_spills_long_lengths() {
        let mut out = Vec::new();
        write_header(&mut out, 0x80, 3);
        assert_eq!(out, vec![0x83]);
        let mut out = Vec::new();
        write_header(&mut out, 0x80, 20);
        assert_eq!(out, vec![0x8e, 0x94]);
    }
}
