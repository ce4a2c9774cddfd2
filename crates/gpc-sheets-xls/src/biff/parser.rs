//! Low-level binary parsing helpers for BIFF8 records.
//!
//! All multi-byte integers in BIFF8 are little-endian.

use crate::error::{XlsError, XlsResult};

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> XlsResult<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            XlsError::Parse(format!(
                "unexpected end of data at offset {}, need {} bytes",
                *offset, len
            ))
        })?;
    let bytes = &data[*offset..end];
    *offset = end;
    Ok(bytes)
}

/// Read a `u8` from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u8(data: &[u8], offset: &mut usize) -> XlsResult<u8> {
    take(data, offset, 1).map(|b| b[0])
}

/// Read a `u16` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u16(data: &[u8], offset: &mut usize) -> XlsResult<u16> {
    take(data, offset, 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

/// Read a `u32` (little-endian) from a byte slice at `offset`, advancing `offset`.
#[inline]
pub fn read_u32(data: &[u8], offset: &mut usize) -> XlsResult<u32> {
    take(data, offset, 4).map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read 8 raw bytes (a FORMULA result field, or an `f64`).
#[inline]
pub fn read_bytes8(data: &[u8], offset: &mut usize) -> XlsResult<[u8; 8]> {
    let b = take(data, offset, 8)?;
    Ok([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Read an `f64` (IEEE 754 double, little-endian) from a byte slice.
#[inline]
pub fn read_f64(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    read_bytes8(data, offset).map(f64::from_le_bytes)
}

/// Read the `row(2) + col(2) + xf(2)` prefix shared by cell records.
///
/// The XF index is skipped; only `(row, col)` is returned.
#[inline]
pub fn read_cell_header(data: &[u8], offset: &mut usize) -> XlsResult<(u32, u16)> {
    let row = read_u16(data, offset)? as u32;
    let col = read_u16(data, offset)?;
    let _xf = read_u16(data, offset)?;
    Ok((row, col))
}

/// Decode an RK-encoded number.
///
/// RK encoding (4 bytes):
/// - Bit 0: if 1, the decoded number should be divided by 100
/// - Bit 1: if 1, value is an integer (bits 2..31 as signed 30-bit int)
///           if 0, value is an IEEE 754 double (bits 2..31 are the upper 30 bits,
///           lower 34 bits of the double are zero)
#[inline]
pub fn decode_rk(rk: u32) -> f64 {
    let div100 = (rk & 0x01) != 0;
    let is_integer = (rk & 0x02) != 0;

    let value = if is_integer {
        ((rk as i32) >> 2) as f64
    } else {
        let upper = (rk & 0xFFFF_FFFC) as u64;
        f64::from_bits(upper << 32)
    };

    if div100 {
        value / 100.0
    } else {
        value
    }
}

/// Read an RK value from 4 bytes at `offset`.
#[inline]
pub fn read_rk(data: &[u8], offset: &mut usize) -> XlsResult<f64> {
    let raw = read_u32(data, offset)?;
    Ok(decode_rk(raw))
}
