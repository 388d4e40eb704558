//! Big-endian integer codec.
//!
//! Every multi-byte field in every message goes through these helpers, so
//! there is exactly one place where byte order is decided.

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};

/// Big-endian bytes of a `u16`.
pub fn bytes_of_u16(value: u16) -> [u8; 2] {
    let mut out = [0u8; 2];
    (&mut out[..]).put_u16(value);
    out
}

/// Big-endian bytes of a `u32`.
pub fn bytes_of_u32(value: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    (&mut out[..]).put_u32(value);
    out
}

/// Read a big-endian `u16` starting at `offset`.
pub fn u16_from(bytes: &[u8], offset: usize) -> Result<u16> {
    Ok(window(bytes, offset, 2)?.get_u16())
}

/// Read a big-endian `u32` starting at `offset`.
pub fn u32_from(bytes: &[u8], offset: usize) -> Result<u32> {
    Ok(window(bytes, offset, 4)?.get_u32())
}

/// Read the single byte at `offset`.
pub fn u8_from(bytes: &[u8], offset: usize) -> Result<u8> {
    Ok(window(bytes, offset, 1)?[0])
}

/// Borrow `len` bytes starting at `offset`, or fail with `TruncatedBuffer`.
pub fn window(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(WireError::TruncatedBuffer {
        needed: usize::MAX,
        available: bytes.len(),
    })?;
    bytes.get(offset..end).ok_or(WireError::TruncatedBuffer {
        needed: end,
        available: bytes.len(),
    })
}
