//! Packing helpers, constant-time comparison, and checked round-up.
//!
//! Grounded on the teacher's `byteorder`-based field packing (`meta.rs`) and
//! on `original_source/src/util.h` (`secure_memcmp`, `roundup_uint32`) for
//! the exact semantics of the constant-time compare and the round-up
//! overflow/zero-modulus fatal conditions.

use crate::host::FatalHook;
use byteorder::{ByteOrder, LittleEndian};

pub fn write_u16_le(dst: &mut [u8], v: u16) {
    LittleEndian::write_u16(dst, v);
}

pub fn read_u16_le(src: &[u8]) -> u16 {
    LittleEndian::read_u16(src)
}

pub fn write_u32_le(dst: &mut [u8], v: u32) {
    LittleEndian::write_u32(dst, v);
}

pub fn read_u32_le(src: &[u8]) -> u32 {
    LittleEndian::read_u32(src)
}

pub fn write_u64_le(dst: &mut [u8], v: u64) {
    LittleEndian::write_u64(dst, v);
}

pub fn read_u64_le(src: &[u8]) -> u64 {
    LittleEndian::read_u64(src)
}

/// Constant-time (with respect to content, not length) comparison. Both
/// slices must have the same length; a length mismatch is itself treated as
/// "not equal" without leaking *which* differs via an early return.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Ceiling division: the smallest `q` such that `q * denom >= num`. Computed
/// in `u64` so a `num` near `u32::MAX` can't wrap the `num + denom - 1` step.
pub fn ceil_div_u32(num: u32, denom: u32) -> u32 {
    let num = num as u64;
    let denom = denom as u64;
    ((num + denom - 1) / denom) as u32
}

/// Round `num` up to the nearest multiple of `modulus`. A zero modulus or an
/// overflowing result are programmer errors, not recoverable conditions.
pub fn round_up_u64(num: u64, modulus: u64, fatal: &dyn FatalHook) -> u64 {
    if modulus == 0 {
        fatal.fatal("round_up_u64: zero modulus");
    }
    let remainder = num % modulus;
    if remainder == 0 {
        return num;
    }
    let extra = modulus - remainder;
    match num.checked_add(extra) {
        Some(result) if result >= num => result,
        _ => fatal.fatal("round_up_u64: overflow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AbortHook;

    #[test]
    fn round_up_exact_multiple_is_unchanged() {
        assert_eq!(round_up_u64(256, 256, &AbortHook), 256);
    }

    #[test]
    fn round_up_rounds_to_next_multiple() {
        assert_eq!(round_up_u64(110, 256, &AbortHook), 256);
        assert_eq!(round_up_u64(320, 256, &AbortHook), 512);
    }

    #[test]
    fn ct_eq_detects_equal_and_unequal() {
        assert!(ct_eq(b"abcd", b"abcd"));
        assert!(!ct_eq(b"abcd", b"abce"));
        assert!(!ct_eq(b"abc", b"abcd"));
    }
}
