//! Extraction of the six report datasets

mod common;

use common::{numbers, report, Sheet};
use gpc_sheets::{extract, CellError, CellValue, Dataset, Grid, Pair, Series, Session, Triple};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn request_parameters(grid: &Grid) -> Vec<CellValue> {
    extract(grid)
        .request_info
        .rows()
        .unwrap()
        .iter()
        .map(|pair| pair.parameter.clone())
        .collect()
}

#[test]
fn request_info_is_eight_pairs_in_row_order() {
    let record = extract(&report(Some("PE-1"), 0.0).grid());
    let rows = record.request_info.rows().unwrap();

    assert_eq!(rows.len(), 8);
    assert_eq!(
        rows[..3].to_vec(),
        vec![
            Pair {
                parameter: "Sample name:".into(),
                data: "PE-1".into(),
            },
            Pair {
                parameter: "Operator:".into(),
                data: "lab".into(),
            },
            Pair {
                parameter: "Request no.:".into(),
                data: 1042.0.into(),
            },
        ]
    );
    assert_eq!(
        rows[7],
        Pair {
            parameter: "Detector:".into(),
            data: "IR5".into(),
        }
    );
    // H6 has a label but no data
    assert_eq!(rows[3].data, CellValue::Empty);
}

#[test]
fn tables_read_fixed_cells() {
    let record = extract(&report(Some("PE-1"), 0.0).grid());

    let results = record.results.rows().unwrap();
    assert_eq!(results.len(), 8);
    assert_eq!(
        results[3],
        Triple {
            parameter: "PDI".into(),
            data: 4.5.into(),
            unit: "".into(),
        }
    );
    assert_eq!(
        results[7],
        Triple {
            parameter: CellValue::Empty,
            data: CellValue::Empty,
            unit: "".into(),
        }
    );

    let performance = record.performance.rows().unwrap();
    assert_eq!(performance.len(), 8);
    assert_eq!(performance[0].parameter, CellValue::from("Plate count"));
    assert_eq!(performance[3].unit, CellValue::from("%"));
    assert_eq!(performance[7].data, CellValue::Number(0.2));

    let calibration = record.calibration.rows().unwrap();
    assert_eq!(calibration.len(), 8);
    assert_eq!(calibration[0].data, CellValue::from("PS"));
    assert_eq!(calibration[7].unit, CellValue::from("1/mL"));
}

#[test]
fn curves_are_collected_below_markers() {
    let record = extract(&report(None, 0.0).grid());

    assert_eq!(record.mwd.log_m, Series::Values(numbers(&[2.5, 3.0, 3.5, 4.0, 4.5])));
    assert_eq!(record.mwd.mmd, Series::Values(numbers(&[0.05, 0.3, 0.6, 0.35, 0.1])));
    assert_eq!(record.scb.log_m, Series::Values(numbers(&[2.5, 3.0, 3.5, 4.0])));
    assert_eq!(
        record.scb.ch3_per_1000_tc,
        Series::Values(numbers(&[12.0, 9.0, 6.5, 4.0]))
    );
}

#[test]
fn missing_log_m_marker_is_not_found() {
    let mut sheet = report(None, 0.0);
    sheet.set("Y3", "log M");

    let record = extract(&sheet.grid());
    assert_eq!(record.mwd.log_m, Series::NotFound);
    assert_ne!(record.mwd.log_m, Series::Values(vec![]));
    // The SCB LogM column is independent
    assert!(record.scb.log_m.values().is_some());
}

#[test]
fn marker_with_nothing_below_is_empty_values() {
    let mut sheet = Sheet::new();
    sheet.set("AB50", "CH3 / 1000 TC");

    let record = extract(&sheet.grid());
    assert_eq!(record.scb.ch3_per_1000_tc, Series::Values(vec![]));
    assert_eq!(record.scb.log_m, Series::NotFound);
}

#[test]
fn mmd_without_numbers_is_no_numeric_values() {
    let mut sheet = report(None, 0.0);
    sheet.column(
        "Z4",
        &[
            "n.d.".into(),
            "n.d.".into(),
            "-".into(),
            "".into(),
            CellValue::Error(CellError::Na),
        ],
    );

    let record = extract(&sheet.grid());
    assert_eq!(record.mwd.mmd, Series::NoNumericValues);
    assert_eq!(record.mwd.mmd.to_string(), "No numeric values found");
}

#[test]
fn mmd_drops_text_but_log_m_keeps_it() {
    let mut sheet = report(None, 0.0);
    sheet.set("Y9", "end").set("Z9", "end");

    let record = extract(&sheet.grid());
    assert_eq!(record.mwd.mmd.values().unwrap().len(), 5);
    assert_eq!(record.mwd.log_m.values().unwrap().last(), Some(&CellValue::from("end")));
}

#[test]
fn error_cells_are_dropped_from_curves() {
    let mut sheet = report(None, 0.0);
    sheet
        .set("Y9", CellValue::Error(CellError::Na))
        .set("Z9", CellValue::Error(CellError::Na))
        .set("AB8", CellValue::Error(CellError::Div0));

    let mut session = Session::new();
    let record = session.load_bytes("errors.xlsx", &sheet.xlsx()).unwrap();

    assert_eq!(record.mwd.log_m, Series::Values(numbers(&[2.5, 3.0, 3.5, 4.0, 4.5])));
    assert_eq!(record.mwd.mmd.values().unwrap().len(), 5);
    assert_eq!(
        record.scb.ch3_per_1000_tc,
        Series::Values(numbers(&[12.0, 9.0, 6.5, 4.0]))
    );
}

#[test]
fn missing_value_text_is_dropped_from_curves() {
    let mut sheet = Sheet::new();
    sheet.column(
        "AA1",
        &["LogM".into(), 2.0.into(), "".into(), "n/a".into(), "#N/A".into(), "NA".into(), 3.0.into()],
    );
    sheet.column("AB1", &["CH3 / 1000 TC".into(), "NaN".into(), 7.5.into(), "null".into()]);

    let record = extract(&sheet.grid());
    assert_eq!(record.scb.log_m, Series::Values(numbers(&[2.0, 3.0])));
    assert_eq!(record.scb.ch3_per_1000_tc, Series::Values(numbers(&[7.5])));
}

#[test]
fn other_text_stays_in_curves() {
    let mut sheet = Sheet::new();
    sheet.column("AA1", &["LogM".into(), 2.0.into(), " n/a".into(), "N/a".into()]);

    let record = extract(&sheet.grid());
    assert_eq!(
        record.scb.log_m,
        Series::Values(vec![2.0.into(), " n/a".into(), "N/a".into()])
    );
}

#[test]
fn marker_match_is_exact() {
    let mut sheet = Sheet::new();
    sheet.set("Z1", "MMD ").set("Z2", 1.0);

    let record = extract(&sheet.grid());
    assert_eq!(record.mwd.mmd, Series::NotFound);
}

#[test]
fn short_sheet_makes_only_tables_unavailable() {
    let mut sheet = Sheet::new();
    sheet.set("A5", "Sample name:").set("B5", "tiny").set("I8", "x");
    sheet.set("Y1", "LogM").set("Y2", 3.0);

    let record = extract(&sheet.grid());
    assert!(record.request_info.is_available());
    assert!(matches!(record.results, Dataset::Unavailable(_)));
    assert!(matches!(record.calibration, Dataset::Unavailable(_)));
    assert_eq!(record.mwd.log_m, Series::Values(numbers(&[3.0])));
}

#[test]
fn empty_sheet_is_all_unavailable() {
    let record = extract(&Grid::new());
    assert!(!record.request_info.is_available());
    assert!(!record.performance.is_available());
    assert_eq!(record.scb.ch3_per_1000_tc, Series::NotFound);
}

#[test]
fn xlsx_report_end_to_end() {
    let sheet = report(Some("PE-1"), 0.0);
    let mut session = Session::new();
    let record = session.load_bytes("pe1.xlsx", &sheet.xlsx()).unwrap().clone();

    assert_eq!(record, extract(&sheet.grid()));
    assert_eq!(session.sample_name("pe1.xlsx").as_deref(), Some("PE-1"));
}

proptest! {
    #[test]
    fn request_info_shape_is_fixed(
        cells in proptest::collection::vec(
            (4u32..8, prop_oneof![Just(0u16), Just(1), Just(7), Just(8)], "[a-zA-Z :]{0,12}"),
            0..32,
        )
    ) {
        let mut grid = Grid::new();
        for (row, col, text) in &cells {
            grid.set_value_at(*row, *col, text.as_str()).unwrap();
        }
        // Pin the extent so every request cell is inside the grid
        grid.set_value_at(41, 27, 0.0).unwrap();

        let record = extract(&grid);
        let rows = record.request_info.rows().unwrap();
        prop_assert_eq!(rows.len(), 8);

        for (i, pair) in rows.iter().enumerate() {
            let row = 4 + (i / 2) as u32;
            let (param_col, data_col) = if i % 2 == 0 { (0, 1) } else { (7, 8) };
            prop_assert_eq!(&pair.parameter, grid.value_at(row, param_col).unwrap());
            prop_assert_eq!(&pair.data, grid.value_at(row, data_col).unwrap());
        }
        prop_assert_eq!(request_parameters(&grid).len(), 8);
    }
}
