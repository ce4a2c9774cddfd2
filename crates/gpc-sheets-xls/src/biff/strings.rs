//! BIFF8 Unicode string decoding.
//!
//! BIFF8 strings have a complex encoding:
//! - Header: char_count (2 bytes) + flags (1 byte)
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = uncompressed UTF-16LE
//! - Flags bit 2 (`fExtSt`): extended string data follows (Asian phonetic)
//! - Flags bit 3 (`fRichSt`): rich text run array follows
//! - If fRichSt: 2-byte run count follows the flags
//! - If fExtSt: 4-byte extended data size follows
//! - Then the character data
//! - Then the rich text runs (4 bytes each) if fRichSt
//! - Then the extended data if fExtSt
//!
//! In SST records, strings can span CONTINUE records. The CONTINUE record
//! can change the encoding (compressed ↔ uncompressed) mid-string via a
//! new flags byte at the start of the continuation.

use super::parser::{read_u16, read_u32, read_u8};
use crate::error::{XlsError, XlsResult};

/// Read a BIFF8 "short" string (1-byte length prefix, used in BOUNDSHEET).
pub fn read_short_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    let char_count = read_u8(data, offset)? as u16;
    let flags = read_u8(data, offset)?;
    read_character_data(data, offset, char_count, flags, &[])
}

/// Read a BIFF8 Unicode string with a 2-byte length prefix (LABEL, STRING).
///
/// Continuation boundaries are not considered; use [`parse_sst`] for the
/// shared string table.
pub fn read_unicode_string(data: &[u8], offset: &mut usize) -> XlsResult<String> {
    read_string_with_boundaries(data, offset, &[])
}

fn read_string_with_boundaries(
    data: &[u8],
    offset: &mut usize,
    boundaries: &[usize],
) -> XlsResult<String> {
    let char_count = read_u16(data, offset)?;
    let flags = read_u8(data, offset)?;

    let is_rich = (flags & 0x08) != 0;
    let has_ext = (flags & 0x04) != 0;

    let run_count = if is_rich { read_u16(data, offset)? } else { 0 };
    let ext_size = if has_ext { read_u32(data, offset)? } else { 0 };

    let text = read_character_data(data, offset, char_count, flags, boundaries)?;

    // Skip rich text runs (4 bytes each: char_pos u16 + font_idx u16)
    *offset += run_count as usize * 4;
    // Skip extended string data
    *offset += ext_size as usize;

    Ok(text)
}

/// Read character data (no header) given char_count and flags byte.
///
/// When the characters run into a continuation boundary, the byte at the
/// boundary is a fresh flags byte selecting the encoding of the remainder.
fn read_character_data(
    data: &[u8],
    offset: &mut usize,
    char_count: u16,
    flags: u8,
    boundaries: &[usize],
) -> XlsResult<String> {
    let mut is_wide = (flags & 0x01) != 0;
    let mut remaining = char_count as usize;
    let mut units: Vec<u16> = Vec::with_capacity(remaining);

    // Header ended exactly on a boundary
    if remaining > 0 && boundaries.contains(offset) {
        is_wide = (read_u8(data, offset)? & 0x01) != 0;
    }

    loop {
        let segment_end = boundaries
            .iter()
            .copied()
            .find(|&b| b > *offset)
            .unwrap_or(data.len())
            .min(data.len());
        let width = if is_wide { 2 } else { 1 };
        let available = segment_end.saturating_sub(*offset) / width;
        let take = remaining.min(available);

        let bytes = &data[*offset..*offset + take * width];
        if is_wide {
            units.extend(
                bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
            );
        } else {
            // Compressed strings are Latin-1, which maps 1:1 onto UTF-16 units
            units.extend(bytes.iter().map(|&b| b as u16));
        }
        *offset += take * width;
        remaining -= take;

        if remaining == 0 {
            break;
        }
        if *offset != segment_end || segment_end >= data.len() {
            return Err(XlsError::Parse(format!(
                "string data too short: {} characters missing at offset {}",
                remaining, *offset
            )));
        }

        let continue_flags = read_u8(data, offset)?;
        is_wide = (continue_flags & 0x01) != 0;
    }

    String::from_utf16(&units).map_err(|e| XlsError::Parse(format!("invalid UTF-16 string: {e}")))
}

/// Parse the entire SST (Shared String Table) from a concatenated buffer
/// (SST body + all CONTINUE bodies already joined).
///
/// `boundaries` are the offsets where each CONTINUE body begins.
///
/// The SST body starts with:
/// - `total_strings` (4 bytes, u32), total string refs in workbook
/// - `unique_strings` (4 bytes, u32), number of unique strings in this table
/// - Then `unique_strings` Unicode string entries
pub fn parse_sst(data: &[u8], boundaries: &[usize]) -> XlsResult<Vec<String>> {
    let mut offset = 0;

    let _total_strings = read_u32(data, &mut offset)?;
    let unique_count = read_u32(data, &mut offset)? as usize;

    let mut strings = Vec::with_capacity(unique_count.min(data.len()));

    for i in 0..unique_count {
        match read_string_with_boundaries(data, &mut offset, boundaries) {
            Ok(s) => strings.push(s),
            Err(e) => {
                // Some XLS files have SST padding or truncation issues.
                log::warn!("SST parse error at string {i}/{unique_count}: {e}");
                break;
            }
        }
    }

    Ok(strings)
}
