//! Shared report fixtures
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use gpc_sheets::{CellAddress, CellValue, Grid};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Report" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// A sparse sheet described cell by cell
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, address: &str, value: impl Into<CellValue>) -> &mut Self {
        let addr = CellAddress::parse(address).unwrap();
        self.cells.insert((addr.row, addr.col), value.into());
        self
    }

    /// Write `values` down the column of `address`, starting at that cell.
    pub fn column(&mut self, address: &str, values: &[CellValue]) -> &mut Self {
        let addr = CellAddress::parse(address).unwrap();
        for (i, value) in values.iter().enumerate() {
            self.cells.insert((addr.row + i as u32, addr.col), value.clone());
        }
        self
    }

    pub fn grid(&self) -> Grid {
        let mut grid = Grid::new();
        for (&(row, col), value) in &self.cells {
            grid.set_value_at(row, col, value.clone()).unwrap();
        }
        grid
    }

    /// Package the sheet as a single-worksheet XLSX file using inline strings.
    pub fn xlsx(&self) -> Vec<u8> {
        let mut rows: BTreeMap<u32, String> = BTreeMap::new();
        for (&(row, col), value) in &self.cells {
            let r = CellAddress::new(row, col).to_string();
            let xml = match value {
                CellValue::Empty => continue,
                CellValue::Number(n) => format!(r#"<c r="{r}"><v>{n}</v></c>"#),
                CellValue::Boolean(b) => format!(r#"<c r="{r}" t="b"><v>{}</v></c>"#, u8::from(*b)),
                CellValue::String(s) => format!(
                    r#"<c r="{r}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    escape(s.as_str())
                ),
                CellValue::Error(e) => format!(r#"<c r="{r}" t="e"><v>{e}</v></c>"#),
            };
            rows.entry(row).or_default().push_str(&xml);
        }

        let sheet_data: String = rows
            .iter()
            .map(|(row, cells)| format!(r#"<row r="{}">{}</row>"#, row + 1, cells))
            .collect();
        let worksheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_data}</sheetData></worksheet>"#
        );

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, body) in [
                ("[Content_Types].xml", CONTENT_TYPES),
                ("xl/workbook.xml", WORKBOOK),
                ("xl/_rels/workbook.xml.rels", RELS),
                ("xl/worksheets/sheet1.xml", worksheet.as_str()),
            ] {
                zip.start_file(name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn numbers(values: &[f64]) -> Vec<CellValue> {
    values.iter().copied().map(CellValue::Number).collect()
}

/// A complete GPC report with both curves.
///
/// `shift` offsets the curve values so reports for different samples differ.
pub fn report(sample: Option<&str>, shift: f64) -> Sheet {
    let mut sheet = Sheet::new();

    // Request information, rows 5-8
    if let Some(sample) = sample {
        sheet.set("A5", "Sample name:").set("B5", sample);
    }
    sheet
        .set("H5", "Operator:")
        .set("I5", "lab")
        .set("A6", "Request no.:")
        .set("B6", 1042.0)
        .set("H6", "Date:")
        .set("A7", "Solvent:")
        .set("B7", "TCB")
        .set("I7", "150 C")
        .set("A8", "Column:")
        .set("H8", "Detector:")
        .set("I8", "IR5");

    // Results, A29:C36
    for (i, (parameter, data, unit)) in [
        ("Mn", 21000.0, Some("g/mol")),
        ("Mw", 95000.0, Some("g/mol")),
        ("Mz", 310000.0, Some("g/mol")),
        ("PDI", 4.5, None),
    ]
    .into_iter()
    .enumerate()
    {
        let row = 29 + i;
        sheet.set(&format!("A{row}"), parameter).set(&format!("B{row}"), data);
        if let Some(unit) = unit {
            sheet.set(&format!("C{row}"), unit);
        }
    }

    // Performance, E29:G31 and E38:G42
    sheet
        .set("E29", "Plate count")
        .set("F29", 12000.0)
        .set("E38", "Recovery")
        .set("F38", 98.5)
        .set("G38", "%")
        .set("E42", "Dead volume")
        .set("F42", 0.2)
        .set("G42", "mL");

    // Calibration, H29:J36
    sheet
        .set("H29", "Standard")
        .set("I29", "PS")
        .set("H36", "Slope")
        .set("I36", -0.43)
        .set("J36", "1/mL");

    // MWD in Y/Z, SCB in AA/AB
    let log_m = [2.5, 3.0, 3.5, 4.0, 4.5];
    let mmd: Vec<f64> = [0.05, 0.3, 0.6, 0.35, 0.1].iter().map(|v| v + shift).collect();
    let ch3: Vec<f64> = [12.0, 9.0, 6.5, 4.0].iter().map(|v| v + shift).collect();

    sheet.set("Y3", "LogM").column("Y4", &numbers(&log_m));
    sheet.set("Z3", "MMD").column("Z4", &numbers(&mmd));
    sheet.set("AA3", "LogM").column("AA4", &numbers(&log_m[..4]));
    sheet.set("AB3", "CH3 / 1000 TC").column("AB4", &numbers(&ch3));
    sheet
}
