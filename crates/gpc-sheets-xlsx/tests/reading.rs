//! Reading XLSX packages built in memory

use std::io::{Cursor, Write};

use gpc_sheets_core::{CellError, CellValue, ColumnScan};
use gpc_sheets_xlsx::{XlsxError, XlsxReader};
use pretty_assertions::assert_eq;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

fn workbook(sheets: &[(&str, &str)]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, rid))| {
            format!(r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#, name, i + 1, rid)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        entries
    )
}

fn worksheet(sheet_data: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        sheet_data
    )
}

fn package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

fn standard_package(shared_strings: &str, sheet1: &str) -> Vec<u8> {
    package(&[
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("xl/workbook.xml", workbook(&[("Report", "rId1")])),
        ("xl/_rels/workbook.xml.rels", RELS.to_string()),
        ("xl/sharedStrings.xml", shared_strings.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet(sheet1)),
    ])
}

#[test]
fn reads_cell_types_from_first_sheet() {
    let sst = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3"><si><t>Sample name:</t></si><si><r><t>PE</t></r><r><t xml:space="preserve"> 1234</t></r></si><si><t>LogM</t><rPh sb="0" eb="1"><t>ignored</t></rPh></si></sst>"#;
    let sheet = r#"<row r="5"><c r="A5" t="s"><v>0</v></c><c r="B5" t="s"><v>1</v></c><c r="H5" t="b"><v>1</v></c><c r="I5" t="e"><v>#DIV/0!</v></c></row><row r="9"><c r="Y9" t="s"><v>2</v></c><c r="Z9" t="str"><f>A1</f><v>MMD</v></c></row><row r="10"><c r="Y10"><v>2.5</v></c><c r="Z10" t="inlineStr"><is><t>n/a</t></is></c></row>"#;

    let grid = XlsxReader::read(Cursor::new(standard_package(sst, sheet))).unwrap();

    assert_eq!(grid.dimensions(), (10, 26));
    assert_eq!(grid.value("A5").unwrap(), &CellValue::string("Sample name:"));
    assert_eq!(grid.value("B5").unwrap(), &CellValue::string("PE 1234"));
    assert_eq!(grid.value("H5").unwrap(), &CellValue::Boolean(true));
    assert_eq!(grid.value("I5").unwrap(), &CellValue::Error(CellError::Div0));
    assert_eq!(grid.value("Y9").unwrap(), &CellValue::string("LogM"));
    assert_eq!(grid.value("Z9").unwrap(), &CellValue::string("MMD"));
    assert_eq!(grid.value("Y10").unwrap(), &CellValue::Number(2.5));
    assert_eq!(grid.value("Z10").unwrap(), &CellValue::string("n/a"));
    assert_eq!(grid.value("C5").unwrap(), &CellValue::Empty);

    assert_eq!(
        grid.scan_below(24, "LogM"),
        ColumnScan::Found(vec![CellValue::Number(2.5)])
    );
}

#[test]
fn cells_without_references_follow_document_order() {
    let sheet = r#"<row><c><v>1</v></c><c><v>2</v></c></row><row><c/><c><v>4</v></c></row>"#;
    let grid = XlsxReader::read(Cursor::new(standard_package(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#,
        sheet,
    )))
    .unwrap();

    assert_eq!(grid.value_at(0, 0).unwrap(), &CellValue::Number(1.0));
    assert_eq!(grid.value_at(0, 1).unwrap(), &CellValue::Number(2.0));
    assert_eq!(grid.value_at(1, 0).unwrap(), &CellValue::Empty);
    assert_eq!(grid.value_at(1, 1).unwrap(), &CellValue::Number(4.0));
}

#[test]
fn only_the_first_listed_sheet_is_read() {
    let bytes = package(&[
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        (
            "xl/workbook.xml",
            workbook(&[("Second", "rId2"), ("First", "rId1")]),
        ),
        ("xl/_rels/workbook.xml.rels", RELS.to_string()),
        (
            "xl/worksheets/sheet1.xml",
            worksheet(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#),
        ),
        (
            "xl/worksheets/sheet2.xml",
            worksheet(r#"<row r="1"><c r="A1"><v>2</v></c></row>"#),
        ),
    ]);

    let grid = XlsxReader::read(Cursor::new(bytes)).unwrap();
    assert_eq!(grid.value("A1").unwrap(), &CellValue::Number(2.0));
}

#[test]
fn read_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    std::fs::write(
        &path,
        standard_package(
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#,
            r#"<row r="3"><c r="B3"><v>42</v></c></row>"#,
        ),
    )
    .unwrap();

    let grid = XlsxReader::read_file(&path).unwrap();
    assert_eq!(grid.value("B3").unwrap(), &CellValue::Number(42.0));
}

#[test]
fn missing_content_types_is_invalid() {
    let bytes = package(&[("xl/workbook.xml", workbook(&[("Report", "rId1")]))]);
    let err = XlsxReader::read(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));
}

#[test]
fn not_a_zip_is_an_error() {
    let err = XlsxReader::read(Cursor::new(b"not a spreadsheet".to_vec())).unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)));
}
