//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use gpc_sheets_core::{CellAddress, CellError, CellValue, Grid, SharedString};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not a valid escape sequence, output what we consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                    result.push_str(&hex_chars);
                }
            }
        }
    }

    result
}

/// Parse a boolean XML attribute value ("1"/"true").
fn attr_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// A worksheet entry from `xl/workbook.xml`
#[derive(Debug)]
struct SheetEntry {
    name: String,
    r_id: String,
}

/// XLSX file reader
///
/// Produces the [`Grid`] of the first worksheet in workbook order.
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first worksheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Grid> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read the first worksheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Grid> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheets = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        // Chart sheets have no worksheet relationship and are skipped
        let first = sheets
            .iter()
            .find_map(|sheet| sheet_paths.get(&sheet.r_id).map(|path| (sheet, path)));

        match first {
            Some((sheet, path)) => {
                log::debug!("reading worksheet '{}' from {}", sheet.name, path);
                Self::read_worksheet(&mut archive, path, &shared_strings)
            }
            None => {
                log::warn!("workbook contains no worksheets");
                Ok(Grid::new())
            }
        }
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SharedString>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Whitespace inside <t> is significant for exact label matching
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(SharedString::new(""));
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(SharedString::new(decode_excel_escapes(&current_string)));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e
                        .unescape()
                        .map_err(|err| XlsxError::Parse(format!("shared string: {err}")))?;
                    current_string.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<SheetEntry>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            // r:id, whatever the relationships prefix is
                            key if attr.key.local_name().as_ref() == b"id" && key != b"id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push(SheetEntry { name, r_id });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths keyed by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().ok().map(|s| s.to_string());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Target" => target = value,
                            b"Type" => rel_type = value,
                            _ => {}
                        }
                    }

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            rels.insert(id, resolve_part(WORKBOOK_PART, &target));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part into a grid
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[SharedString],
    ) -> XlsxResult<Grid> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut grid = Grid::new();
        let mut buf = Vec::new();

        // Position used when <row>/<c> omit their `r` attribute
        let mut next_row: u32 = 0;
        let mut current_row: u32 = 0;
        let mut next_col: u16 = 0;

        // Current cell state
        let mut cell: Option<(CellAddress, Option<String>)> = None;
        let mut value = String::new();
        let mut has_value = false;
        let mut in_value = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(next_row);
                        next_row = current_row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let (addr, cell_type) = Self::cell_attrs(&e, current_row, next_col)?;
                        next_col = addr.col.saturating_add(1);
                        cell = Some((addr, cell_type));
                        value.clear();
                        has_value = false;
                    }
                    b"v" if cell.is_some() => {
                        in_value = true;
                        has_value = true;
                    }
                    b"t" if cell.is_some() => {
                        in_inline_text = true;
                        has_value = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        current_row = Self::row_index(&e).unwrap_or(next_row);
                        next_row = current_row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        // Valueless (styled) cell: only advances the column
                        let (addr, _) = Self::cell_attrs(&e, current_row, next_col)?;
                        next_col = addr.col.saturating_add(1);
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some((addr, cell_type)) = cell.take() {
                            if has_value {
                                let parsed =
                                    Self::parse_value(cell_type.as_deref(), &value, shared_strings)?;
                                grid.set_value_at(addr.row, addr.col, parsed)?;
                            }
                        }
                    }
                    b"v" => in_value = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    let text = e
                        .unescape()
                        .map_err(|err| XlsxError::Parse(format!("cell text in {path}: {err}")))?;
                    value.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "worksheet {} has {} cells, extent {:?}",
            path,
            grid.cell_count(),
            grid.dimensions()
        );
        Ok(grid)
    }

    /// Zero-based row index from a `<row r="...">` element
    fn row_index(e: &BytesStart) -> Option<u32> {
        e.attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == b"r")
            .and_then(|attr| attr.unescape_value().ok()?.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1))
    }

    /// Address and type of a `<c>` element
    fn cell_attrs(
        e: &BytesStart,
        current_row: u32,
        next_col: u16,
    ) -> XlsxResult<(CellAddress, Option<String>)> {
        let mut addr = CellAddress::new(current_row, next_col);
        let mut cell_type = None;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    let cell_ref = attr
                        .unescape_value()
                        .map_err(|err| XlsxError::Parse(err.to_string()))?;
                    addr = CellAddress::parse(&cell_ref).map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
                    })?;
                }
                b"t" => {
                    cell_type = attr.unescape_value().ok().map(|s| s.to_string());
                }
                _ => {}
            }
        }

        Ok((addr, cell_type))
    }

    /// Convert the raw `<v>` / inline text of a cell according to its type
    fn parse_value(
        cell_type: Option<&str>,
        value: &str,
        shared_strings: &[SharedString],
    ) -> XlsxResult<CellValue> {
        let cell_value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }

            Some("b") => CellValue::Boolean(attr_flag(value.trim())),

            Some("e") => CellError::parse(value.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // Inline or formula string - decode Excel escape sequences
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(value)),

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) if value.is_empty() => CellValue::Empty,
                Err(_) => CellValue::string(value),
            },

            // ISO dates and unknown types are kept as text
            Some(_) => CellValue::string(value),
        };

        Ok(cell_value)
    }
}

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Resolve a relationship target against the part that owns the relationship.
///
/// Targets are relative to the source part's folder unless they start with
/// `/`. `.` and `..` segments are normalized and a `#fragment` is dropped.
fn resolve_part(source_part: &str, target: &str) -> String {
    let target = target.split_once('#').map_or(target, |(path, _)| path);
    let (target, base_dir) = match target.strip_prefix('/') {
        Some(absolute) => (absolute, ""),
        None => (
            target,
            source_part.rsplit_once('/').map_or("", |(dir, _)| dir),
        ),
    };

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}
