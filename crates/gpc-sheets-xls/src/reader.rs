//! XLS (BIFF8) reader.
//!
//! Opens a Compound File Binary (CFB/OLE2) container, reads the `Workbook`
//! stream, parses BIFF8 records, and fills a [`Grid`] from the first
//! worksheet.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use gpc_sheets_core::{CellError, CellValue, Grid};

use crate::biff::parser::{read_bytes8, read_cell_header, read_f64, read_rk, read_u16, read_u32};
use crate::biff::records;
use crate::biff::strings::{parse_sst, read_short_string, read_unicode_string};
use crate::biff::{self, BiffRecord};
use crate::error::{XlsError, XlsResult};

/// XLS file reader.
pub struct XlsReader;

/// Metadata for a sheet parsed from the BOUNDSHEET record.
#[derive(Debug)]
struct SheetInfo {
    /// Absolute byte offset of the sheet's BOF in the Workbook stream.
    offset: u32,
    /// Sheet type: 0 = worksheet, 2 = chart, 6 = macro/VBA.
    sheet_type: u8,
    name: String,
}

/// The records between one substream's BOF and its EOF.
struct Substream<'a> {
    bof_offset: u64,
    records: Vec<&'a BiffRecord>,
}

impl XlsReader {
    /// Read the first worksheet of an XLS file from a filesystem path.
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsResult<Grid> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read(file)
    }

    /// Read the first worksheet from any `Read + Seek` source.
    pub fn read<R: Read + Seek>(reader: R) -> XlsResult<Grid> {
        let mut cfb = cfb::CompoundFile::open(reader)?;

        // Some older files use "Book" instead of "Workbook"
        let stream_path = if cfb.exists("/Workbook") {
            "/Workbook"
        } else if cfb.exists("/Book") {
            "/Book"
        } else {
            return Err(XlsError::InvalidFormat(
                "no Workbook or Book stream found in CFB".into(),
            ));
        };

        let mut stream_data = Vec::new();
        {
            let mut stream = cfb.open_stream(stream_path)?;
            stream.read_to_end(&mut stream_data)?;
        }

        let mut cursor = Cursor::new(&stream_data);
        let all_records = biff::read_all_records(&mut cursor)?;

        // Phase 1: workbook globals (SST and sheet directory)
        let mut sst: Vec<String> = Vec::new();
        let mut sheets: Vec<SheetInfo> = Vec::new();
        let mut in_globals = false;
        let mut globals_end_idx = None;

        for (idx, rec) in all_records.iter().enumerate() {
            match rec.record_type {
                records::BOF if !in_globals => {
                    let (version, dt) = biff::parse_bof(&rec.data)?;
                    if dt != records::BOF_WORKBOOK_GLOBALS {
                        return Err(XlsError::InvalidFormat(format!(
                            "stream does not start with workbook globals (substream type 0x{dt:04X})"
                        )));
                    }
                    if version != records::BIFF8_VERSION {
                        return Err(XlsError::UnsupportedVersion(format!(
                            "expected BIFF8 (0x0600), got 0x{version:04X}"
                        )));
                    }
                    in_globals = true;
                }
                records::EOF if in_globals => {
                    globals_end_idx = Some(idx);
                    break;
                }
                records::SST if in_globals => {
                    sst = parse_sst(&rec.data, &rec.continue_offsets)?;
                }
                records::BOUNDSHEET if in_globals => {
                    sheets.push(Self::parse_boundsheet(&rec.data)?);
                }
                _ => {}
            }
        }

        let globals_end_idx = globals_end_idx.ok_or_else(|| {
            XlsError::InvalidFormat("no complete workbook globals substream found".into())
        })?;
        log::debug!(
            "xls globals: {} shared strings, {} sheets",
            sst.len(),
            sheets.len()
        );

        // Phase 2: locate the first worksheet's substream
        let substreams = Self::split_substreams(&all_records[globals_end_idx + 1..]);

        let Some((position, info)) = sheets
            .iter()
            .enumerate()
            .find(|(_, info)| info.sheet_type == records::SHEET_TYPE_WORKSHEET)
        else {
            log::warn!("workbook contains no worksheets");
            return Ok(Grid::new());
        };

        // Prefer the BOF offset from BOUNDSHEET, fall back to directory order
        let substream = substreams
            .iter()
            .find(|s| s.bof_offset == info.offset as u64)
            .or_else(|| substreams.get(position));

        let mut grid = Grid::new();
        match substream {
            Some(substream) => {
                log::debug!("reading worksheet '{}'", info.name);
                Self::parse_sheet_records(&substream.records, &mut grid, &sst)?;
            }
            None => log::warn!("worksheet '{}' has no substream", info.name),
        }

        Ok(grid)
    }

    /// Parse a BOUNDSHEET record body.
    fn parse_boundsheet(data: &[u8]) -> XlsResult<SheetInfo> {
        let mut offset = 0;
        let abs_offset = read_u32(data, &mut offset)?;
        let _visibility = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let sheet_type = data.get(offset).copied().unwrap_or(0);
        offset += 1;
        let name = read_short_string(data, &mut offset)?;

        Ok(SheetInfo {
            offset: abs_offset,
            sheet_type,
            name,
        })
    }

    /// Split remaining records into per-sheet substreams (each BOF..EOF pair).
    fn split_substreams(records: &[BiffRecord]) -> Vec<Substream<'_>> {
        let mut groups = Vec::new();
        let mut current: Option<Substream<'_>> = None;
        let mut depth = 0usize;

        for rec in records {
            match rec.record_type {
                records::BOF => {
                    if depth == 0 {
                        current = Some(Substream {
                            bof_offset: rec.stream_offset,
                            records: Vec::new(),
                        });
                    }
                    depth += 1;
                }
                records::EOF => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        if let Some(group) = current.take() {
                            groups.push(group);
                        }
                    }
                }
                _ => {
                    // Embedded chart substreams are skipped
                    if depth == 1 {
                        if let Some(group) = current.as_mut() {
                            group.records.push(rec);
                        }
                    }
                }
            }
        }

        groups
    }

    /// Parse cell records from a sheet's record group.
    fn parse_sheet_records(records: &[&BiffRecord], grid: &mut Grid, sst: &[String]) -> XlsResult<()> {
        // A STRING record carries the cached text of the FORMULA before it
        let mut pending_formula_cell: Option<(u32, u16)> = None;

        for rec in records {
            let data = rec.data.as_slice();
            match rec.record_type {
                records::LABELSST => {
                    Self::parse_labelsst(data, grid, sst)?;
                    pending_formula_cell = None;
                }
                records::LABEL => {
                    Self::parse_label(data, grid)?;
                    pending_formula_cell = None;
                }
                records::NUMBER => {
                    Self::parse_number(data, grid)?;
                    pending_formula_cell = None;
                }
                records::RK => {
                    Self::parse_rk(data, grid)?;
                    pending_formula_cell = None;
                }
                records::MULRK => {
                    Self::parse_mulrk(data, grid)?;
                    pending_formula_cell = None;
                }
                records::BOOLERR => {
                    Self::parse_boolerr(data, grid)?;
                    pending_formula_cell = None;
                }
                records::FORMULA => {
                    pending_formula_cell = Self::parse_formula(data, grid)?;
                }
                records::STRING => {
                    if let Some((row, col)) = pending_formula_cell.take() {
                        let mut off = 0;
                        let text = read_unicode_string(data, &mut off)?;
                        grid.set_value_at(row, col, text)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    // ── Cell record parsers ──────────────────────────────────────────────

    /// LABELSST: row(2) + col(2) + xf(2) + sst_index(4)
    fn parse_labelsst(data: &[u8], grid: &mut Grid, sst: &[String]) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let sst_idx = read_u32(data, &mut off)? as usize;

        match sst.get(sst_idx) {
            Some(s) => grid.set_value_at(row, col, s.as_str())?,
            None => log::warn!("LABELSST at ({row}, {col}) references missing string {sst_idx}"),
        }
        Ok(())
    }

    /// LABEL: row(2) + col(2) + xf(2) + unicode_string
    fn parse_label(data: &[u8], grid: &mut Grid) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let text = read_unicode_string(data, &mut off)?;
        grid.set_value_at(row, col, text)?;
        Ok(())
    }

    /// NUMBER: row(2) + col(2) + xf(2) + f64(8)
    fn parse_number(data: &[u8], grid: &mut Grid) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let value = read_f64(data, &mut off)?;
        grid.set_value_at(row, col, value)?;
        Ok(())
    }

    /// RK: row(2) + col(2) + xf(2) + rk(4)
    fn parse_rk(data: &[u8], grid: &mut Grid) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let value = read_rk(data, &mut off)?;
        grid.set_value_at(row, col, value)?;
        Ok(())
    }

    /// MULRK: row(2) + first_col(2) + [xf(2) + rk(4)]* + last_col(2)
    fn parse_mulrk(data: &[u8], grid: &mut Grid) -> XlsResult<()> {
        if data.len() < 6 {
            return Err(XlsError::Parse("MULRK record too short".into()));
        }
        let mut off = 0;
        let row = read_u16(data, &mut off)? as u32;
        let first_col = read_u16(data, &mut off)?;

        // last_col is the last 2 bytes of the record
        let last_col = u16::from_le_bytes([data[data.len() - 2], data[data.len() - 1]]);
        let rk_data_end = data.len() - 2;

        let mut col = first_col;
        while off + 6 <= rk_data_end && col <= last_col {
            let _xf = read_u16(data, &mut off)?;
            let value = read_rk(data, &mut off)?;
            grid.set_value_at(row, col, value)?;
            col += 1;
        }

        Ok(())
    }

    /// BOOLERR: row(2) + col(2) + xf(2) + value(1) + is_error(1)
    fn parse_boolerr(data: &[u8], grid: &mut Grid) -> XlsResult<()> {
        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let val = data.get(off).copied().unwrap_or(0);
        let is_error = data.get(off + 1).copied().unwrap_or(0);

        let cell_value = if is_error != 0 {
            CellValue::Error(CellError::from_code(val))
        } else {
            CellValue::Boolean(val != 0)
        };

        grid.set_value_at(row, col, cell_value)?;
        Ok(())
    }

    /// FORMULA: row(2) + col(2) + xf(2) + result(8) + options(2) + reserved(4) + formula_data(...)
    ///
    /// Stores the cached result. Returns the (row, col) if the cached result
    /// is a string, meaning a STRING record should follow.
    fn parse_formula(data: &[u8], grid: &mut Grid) -> XlsResult<Option<(u32, u16)>> {
        if data.len() < 20 {
            return Err(XlsError::Parse("FORMULA record too short".into()));
        }

        let mut off = 0;
        let (row, col) = read_cell_header(data, &mut off)?;
        let result = read_bytes8(data, &mut off)?;

        // Bytes 6-7 == 0xFFFF mark a non-numeric result
        if result[6] != 0xFF || result[7] != 0xFF {
            grid.set_value_at(row, col, f64::from_le_bytes(result))?;
            return Ok(None);
        }

        match result[0] {
            0x00 => return Ok(Some((row, col))),
            0x01 => grid.set_value_at(row, col, CellValue::Boolean(result[2] != 0))?,
            0x02 => grid.set_value_at(row, col, CellValue::Error(CellError::from_code(result[2])))?,
            // Empty string result, left as an empty cell
            _ => {}
        }
        Ok(None)
    }
}
