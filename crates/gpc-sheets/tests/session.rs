//! Loading files into a session

mod common;

use common::report;
use gpc_sheets::{LoadError, ReadError, Series, Session};
use pretty_assertions::assert_eq;

#[test]
fn reupload_replaces_record() {
    let mut session = Session::new();
    session
        .load_bytes("run.xlsx", &report(Some("first"), 0.0).xlsx())
        .unwrap();
    session
        .load_bytes("other.xlsx", &report(Some("other"), 0.0).xlsx())
        .unwrap();

    let mut second = report(Some("second"), 1.0);
    second.set("Y3", "not LogM");
    session.load_bytes("run.xlsx", &second.xlsx()).unwrap();

    assert_eq!(session.len(), 2);
    assert_eq!(
        session.file_names().collect::<Vec<_>>(),
        vec!["run.xlsx", "other.xlsx"]
    );

    let record = session.get("run.xlsx").unwrap();
    assert_eq!(record.sample_name().as_deref(), Some("second"));
    assert_eq!(record.mwd.log_m, Series::NotFound);
    assert_eq!(
        record.mwd.mmd.values().unwrap()[0].as_number(),
        Some(0.05 + 1.0)
    );
}

#[test]
fn batch_skips_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.XLSX");
    let text = dir.path().join("notes.csv");
    let broken = dir.path().join("broken.xlsx");
    let missing = dir.path().join("missing.xls");

    std::fs::write(&good, report(Some("PE-1"), 0.0).xlsx()).unwrap();
    std::fs::write(&text, "a,b\n1,2\n").unwrap();
    std::fs::write(&broken, b"definitely not a zip").unwrap();

    let mut session = Session::new();
    let failures = session.load_batch([&text, &good, &broken, &missing]);

    assert_eq!(session.file_names().collect::<Vec<_>>(), vec!["good.XLSX"]);
    assert_eq!(
        failures.iter().map(LoadError::file).collect::<Vec<_>>(),
        vec!["notes.csv", "broken.xlsx", "missing.xls"]
    );
    assert!(matches!(failures[0], LoadError::UnsupportedFormat { .. }));
    assert!(matches!(
        failures[1],
        LoadError::Read {
            source: ReadError::Xlsx(_),
            ..
        }
    ));
    assert!(matches!(
        failures[2],
        LoadError::Read {
            source: ReadError::Xls(_),
            ..
        }
    ));
}

#[test]
fn failed_load_leaves_session_untouched() {
    let mut session = Session::new();
    session
        .load_bytes("run.xlsx", &report(Some("kept"), 0.0).xlsx())
        .unwrap();

    let err = session.load_bytes("run.xlsx", b"garbage").unwrap_err();
    assert_eq!(err.file(), "run.xlsx");
    assert_eq!(session.sample_name("run.xlsx").as_deref(), Some("kept"));
}

#[test]
fn sample_name_falls_back_to_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unnamed sample.xlsx");
    std::fs::write(&path, report(None, 0.0).xlsx()).unwrap();

    let mut session = Session::new();
    session.load_file(&path).unwrap();
    assert_eq!(
        session.sample_name("unnamed sample.xlsx").as_deref(),
        Some("unnamed sample.xlsx")
    );
}

#[test]
fn blank_sample_name_is_kept() {
    let mut sheet = report(None, 0.0);
    sheet.set("A5", "Sample name:");

    let mut session = Session::new();
    session.load_bytes("blank.xlsx", &sheet.xlsx()).unwrap();
    assert_eq!(session.sample_name("blank.xlsx").as_deref(), Some(""));
}

#[cfg(feature = "serde")]
#[test]
fn record_serializes_sentinels_as_text() {
    let mut sheet = report(Some("PE-1"), 0.0);
    sheet.set("AA3", "LogM?");

    let mut session = Session::new();
    let record = session.load_bytes("pe1.xlsx", &sheet.xlsx()).unwrap();
    let json = serde_json::to_value(record).unwrap();

    assert_eq!(json["scb"]["log_m"], serde_json::json!("Not found"));
    assert_eq!(json["mwd"]["log_m"][0], serde_json::json!(2.5));
    assert_eq!(
        json["request_info"]["rows"][0]["data"],
        serde_json::json!("PE-1")
    );
    assert_eq!(json["results"]["rows"][3]["unit"], serde_json::json!(""));
}
