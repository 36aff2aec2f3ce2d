// Error handling and edge case tests

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use ecotextile_insights_lib::db::DbPool;
use ecotextile_insights_lib::error::AppError;
use ecotextile_insights_lib::ingest::read_batch;
use ecotextile_insights_lib::models::operational::MonthlyDataInput;
use ecotextile_insights_lib::models::report::{ReportExportFormat, ReportRequest, ReportSource};
use ecotextile_insights_lib::services::data_input_service::DataInputService;
use ecotextile_insights_lib::services::report_service::ReportService;
use ecotextile_insights_lib::services::settings_service::SettingsService;
use tempfile::tempdir;

fn setup_services() -> (ReportService, Arc<DataInputService>, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let settings = Arc::new(SettingsService::new(pool.clone()));
    let data_input = Arc::new(DataInputService::new(pool.clone()));
    let reports = ReportService::new(
        pool,
        settings,
        Arc::clone(&data_input),
        dir.path().join("reports"),
    )
    .expect("report service");
    (reports, data_input, dir)
}

#[test]
fn invalid_periods_are_rejected() {
    let (_reports, data_input, _dir) = setup_services();

    for period in ["2024-13", "24-05", "2024/05", ""] {
        let result = data_input.submit_monthly_data(MonthlyDataInput {
            period: period.to_string(),
            subdomain: None,
            fields: BTreeMap::new(),
        });
        assert!(
            matches!(result, Err(AppError::Validation { .. })),
            "{period:?} accepted"
        );
    }
}

#[test]
fn submissions_without_fields_are_rejected() {
    let (_reports, data_input, _dir) = setup_services();
    let result = data_input.submit_monthly_data(MonthlyDataInput {
        period: "2024-05".to_string(),
        subdomain: None,
        fields: BTreeMap::new(),
    });
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn reversed_ranges_are_rejected() {
    let (reports, data_input, _dir) = setup_services();
    assert!(matches!(
        data_input.list_records(Some("2024-06"), Some("2024-01")),
        Err(AppError::Validation { .. })
    ));

    let result = reports.generate(ReportRequest {
        source: ReportSource::Periods {
            from: "2024-06".to_string(),
            to: "2024-01".to_string(),
        },
        company_name: None,
    });
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn missing_and_unsupported_uploads_fail_cleanly() {
    let (reports, _data_input, dir) = setup_services();

    let missing = dir.path().join("absent.csv");
    assert!(matches!(
        read_batch(&missing),
        Err(AppError::Ingest { .. })
    ));

    let workbook = dir.path().join("data.xlsx");
    fs::write(&workbook, b"PK").expect("write workbook");
    let result = reports.generate(ReportRequest {
        source: ReportSource::Upload {
            path: workbook.to_string_lossy().into_owned(),
        },
        company_name: None,
    });
    match result {
        Err(AppError::Validation { details, .. }) => {
            assert_eq!(
                details,
                Some(serde_json::json!({ "accepted": ["csv", "json"] }))
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn malformed_csv_reports_the_file_name() {
    let (_reports, _data_input, dir) = setup_services();
    let path = dir.path().join("broken.csv");
    fs::write(&path, b"Electricity usage\n\xff\xfe\n").expect("write csv");

    match read_batch(&path) {
        Err(AppError::Ingest { source_name, message }) => {
            assert_eq!(source_name, "broken.csv");
            assert!(message.contains("malformed"));
        }
        other => panic!("expected ingest error, got {other:?}"),
    }
}

#[test]
fn empty_upload_is_an_ingest_error_for_import_but_sample_for_reports() {
    let (reports, data_input, dir) = setup_services();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "Electricity usage,Diesel usage\n").expect("write csv");

    assert!(matches!(
        data_input.import_spreadsheet(&path, "2024-05", None),
        Err(AppError::Ingest { .. })
    ));

    let stored = reports
        .generate(ReportRequest {
            source: ReportSource::Upload {
                path: path.to_string_lossy().into_owned(),
            },
            company_name: None,
        })
        .expect("sample report");
    assert!(stored.report.is_sample_data);
    assert_eq!(stored.title, "Sample Report");
}

#[test]
fn unknown_report_ids_are_not_found() {
    let (reports, _data_input, _dir) = setup_services();
    assert!(matches!(
        reports.get_report("missing"),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        reports.export_report("missing", ReportExportFormat::Html),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        reports.delete_report("missing"),
        Err(AppError::NotFound)
    ));
}
