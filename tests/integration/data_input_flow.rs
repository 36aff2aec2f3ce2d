use std::collections::BTreeMap;
use std::fs;

use ecotextile_insights_lib::db::DbPool;
use ecotextile_insights_lib::error::AppError;
use ecotextile_insights_lib::models::operational::MonthlyDataInput;
use ecotextile_insights_lib::models::record::{FieldValue, RawRecord};
use ecotextile_insights_lib::services::data_input_service::DataInputService;
use tempfile::tempdir;

fn fields(pairs: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(label, value)| (label.to_string(), value.clone()))
        .collect()
}

#[test]
fn submitted_months_are_listed_in_period_order() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let service = DataInputService::new(pool);

    service
        .submit_monthly_data(MonthlyDataInput {
            period: "2024-03".to_string(),
            subdomain: Some("garment manufacturing".to_string()),
            fields: fields(&[("Electricity usage", FieldValue::Number(12_000.0))]),
        })
        .expect("march");
    let january = service
        .submit_monthly_data(MonthlyDataInput {
            period: "2024-01".to_string(),
            subdomain: None,
            fields: fields(&[
                ("  Diesel usage  ", FieldValue::Text("800".to_string())),
                ("   ", FieldValue::Number(1.0)),
            ]),
        })
        .expect("january");

    assert_eq!(january.record, RawRecord::new().with("Diesel usage", "800"));

    let records = service.list_records(None, None).expect("list");
    assert_eq!(
        records.iter().map(|r| r.period.as_str()).collect::<Vec<_>>(),
        vec!["2024-01", "2024-03"]
    );
    assert_eq!(records[1].subdomain.as_deref(), Some("Garment Manufacturing"));

    let batch = service
        .load_batch(Some("2024-02"), Some("2024-12"))
        .expect("batch");
    assert_eq!(batch, vec![RawRecord::new().with("Electricity usage", 12_000.0)]);
}

#[test]
fn spreadsheet_import_stores_each_row() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let service = DataInputService::new(pool);

    let path = dir.path().join("april.csv");
    fs::write(
        &path,
        "Electricity usage,Water used,Shift\n15000,200000,A\n17000,220000,B\n",
    )
    .expect("write csv");

    let summary = service
        .import_spreadsheet(&path, "2024-04", Some("Dyeing & Processing"))
        .expect("import");

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.source_name, "april.csv");
    assert_eq!(summary.record_ids.len(), 2);

    let records = service
        .list_records(Some("2024-04"), Some("2024-04"))
        .expect("list");
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|record| record.source_name.as_deref() == Some("april.csv")));
}

#[test]
fn json_import_accepts_an_array_of_objects() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let service = DataInputService::new(pool);

    let path = dir.path().join("may.json");
    fs::write(
        &path,
        r#"[{"LPG usage": 400}, {"Transport distance": 3200, "Vehicle": "truck"}]"#,
    )
    .expect("write json");

    let summary = service
        .import_spreadsheet(&path, "2024-05", None)
        .expect("import");
    assert_eq!(summary.imported, 2);
}

#[test]
fn deleted_records_leave_the_batch() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let service = DataInputService::new(pool);

    let stored = service
        .submit_monthly_data(MonthlyDataInput {
            period: "2024-07".to_string(),
            subdomain: None,
            fields: fields(&[("Coal usage", FieldValue::Number(2.0))]),
        })
        .expect("submit");

    service.delete_record(&stored.id).expect("delete");
    assert!(service.load_batch(None, None).expect("batch").is_empty());
    assert!(matches!(
        service.delete_record(&stored.id),
        Err(AppError::NotFound)
    ));
}
