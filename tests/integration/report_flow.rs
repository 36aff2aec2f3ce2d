use std::fs;
use std::sync::Arc;

use ecotextile_insights_lib::db::DbPool;
use ecotextile_insights_lib::models::company::CompanyProfileUpdate;
use ecotextile_insights_lib::models::operational::MonthlyDataInput;
use ecotextile_insights_lib::models::record::RawRecord;
use ecotextile_insights_lib::models::report::{
    ReportExportFormat, ReportRequest, ReportSource, ScoreBand,
};
use ecotextile_insights_lib::services::data_input_service::DataInputService;
use ecotextile_insights_lib::services::report_service::ReportService;
use ecotextile_insights_lib::services::settings_service::SettingsService;
use tempfile::{tempdir, TempDir};

struct Harness {
    _dir: TempDir,
    settings: Arc<SettingsService>,
    data_input: Arc<DataInputService>,
    reports: ReportService,
    upload_dir: std::path::PathBuf,
}

fn setup() -> Harness {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let settings = Arc::new(SettingsService::new(pool.clone()));
    let data_input = Arc::new(DataInputService::new(pool.clone()));
    let reports = ReportService::new(
        pool,
        Arc::clone(&settings),
        Arc::clone(&data_input),
        dir.path().join("reports"),
    )
    .expect("report service");
    let upload_dir = dir.path().join("uploads");
    fs::create_dir_all(&upload_dir).expect("upload dir");

    Harness {
        _dir: dir,
        settings,
        data_input,
        reports,
        upload_dir,
    }
}

fn monthly(period: &str, electricity: f64, diesel: f64) -> MonthlyDataInput {
    let record = RawRecord::new()
        .with("Electricity usage", electricity)
        .with("Diesel usage", diesel);
    MonthlyDataInput {
        period: period.to_string(),
        subdomain: Some("Weaving Mills".to_string()),
        fields: record.fields,
    }
}

#[test]
fn stored_period_report_uses_profile_name_and_month_title() {
    let h = setup();
    h.settings
        .update(CompanyProfileUpdate {
            company_name: Some("Surya Mills".to_string()),
            ..Default::default()
        })
        .expect("profile");
    h.data_input
        .submit_monthly_data(monthly("2024-05", 18_000.0, 1_200.0))
        .expect("submit");

    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Periods {
                from: "2024-05".to_string(),
                to: "2024-05".to_string(),
            },
            company_name: None,
        })
        .expect("generate");

    assert_eq!(stored.title, "Monthly Report - May 2024");
    assert_eq!(stored.report.company_name, "Surya Mills");
    assert_eq!(stored.report.total_monthly_kg, 17_976.0);
    assert_eq!(stored.report.sustainability_score, ScoreBand::Compliant);
}

#[test]
fn period_ranges_average_every_month_in_range() {
    let h = setup();
    h.data_input
        .submit_monthly_data(monthly("2024-01", 10_000.0, 1_000.0))
        .expect("january");
    h.data_input
        .submit_monthly_data(monthly("2024-03", 30_000.0, 2_000.0))
        .expect("march");
    h.data_input
        .submit_monthly_data(monthly("2024-06", 90_000.0, 9_000.0))
        .expect("june, outside the range");

    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Periods {
                from: "2024-01".to_string(),
                to: "2024-03".to_string(),
            },
            company_name: Some("Acme".to_string()),
        })
        .expect("generate");

    assert_eq!(stored.title, "Report - 2024-01 to 2024-03");
    assert_eq!(stored.report.breakdown[0].usage, "20,000 kWh");
    assert_eq!(stored.report.breakdown[1].usage, "1,500 litres");
}

#[test]
fn empty_period_range_falls_back_to_a_sample_report() {
    let h = setup();
    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Periods {
                from: "2023-01".to_string(),
                to: "2023-12".to_string(),
            },
            company_name: None,
        })
        .expect("generate");

    assert_eq!(stored.title, "Sample Report");
    assert!(stored.report.is_sample_data);
    assert_eq!(stored.report.company_name, "Your Company");
}

#[test]
fn uploaded_csv_produces_a_titled_report() {
    let h = setup();
    let path = h.upload_dir.join("june.csv");
    fs::write(
        &path,
        "Fabric waste,Recycled fabric waste\n100,100\n",
    )
    .expect("write csv");

    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Upload {
                path: path.to_string_lossy().into_owned(),
            },
            company_name: Some("Loop Textiles".to_string()),
        })
        .expect("generate");

    assert_eq!(stored.title, "Uploaded Report - june.csv");
    assert_eq!(stored.report.sustainability_score, ScoreBand::HighPerformer);
    assert!((stored.report.total_annual_emissions_tco2e - 0.36).abs() < 1e-12);
}

#[test]
fn history_lists_get_and_delete_reports() {
    let h = setup();
    let first = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Batch {
                records: vec![RawRecord::new().with("Electricity usage", 5_000.0)],
            },
            company_name: None,
        })
        .expect("first");
    let second = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Batch {
                records: vec![RawRecord::new().with("Coal usage", 12.0)],
            },
            company_name: None,
        })
        .expect("second");

    let listed = h.reports.list_reports(None).expect("list");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().any(|summary| summary.id == first.report.id));

    let fetched = h.reports.get_report(&second.report.id).expect("get");
    assert_eq!(fetched.report.recommendations, second.report.recommendations);
    assert_eq!(fetched.report.sustainability_score, ScoreBand::NeedsImprovement);

    h.reports.delete_report(&first.report.id).expect("delete");
    let listed = h.reports.list_reports(Some(10)).expect("list again");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.report.id);
}

#[test]
fn every_export_format_writes_a_named_file() {
    let h = setup();
    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Batch {
                records: vec![RawRecord::new()
                    .with("Electricity usage", 25_000.0)
                    .with("Recycled water", 40_000.0)],
            },
            company_name: Some("Surya Mills".to_string()),
        })
        .expect("generate");

    for (format, extension) in [
        (ReportExportFormat::Html, ".html"),
        (ReportExportFormat::Markdown, ".md"),
        (ReportExportFormat::Json, ".json"),
        (ReportExportFormat::Print, ".print.json"),
    ] {
        let export = h
            .reports
            .export_report(&stored.report.id, format)
            .expect("export");
        let file_name = std::path::Path::new(&export.file_path)
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name")
            .to_string();

        assert!(file_name.starts_with("sustainability-report-"));
        assert!(file_name.ends_with(extension), "{file_name} for {format:?}");
        assert_eq!(export.report_id, stored.report.id);

        let content = fs::read_to_string(&export.file_path).expect("read export");
        assert!(content.contains("Surya Mills"));
    }
}

#[test]
fn print_export_is_paginated_json() {
    let h = setup();
    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Batch {
                records: vec![RawRecord::new().with("Diesel usage", 2_000.0)],
            },
            company_name: None,
        })
        .expect("generate");

    let export = h
        .reports
        .export_report(&stored.report.id, ReportExportFormat::Print)
        .expect("export");
    let content = fs::read_to_string(&export.file_path).expect("read export");
    let document: serde_json::Value = serde_json::from_str(&content).expect("json");

    let pages = document["pages"].as_array().expect("pages");
    assert!(!pages.is_empty());
    assert_eq!(pages[0]["number"], 1);
    assert_eq!(pages[0]["blocks"][0]["block"]["kind"], "header");
}

#[test]
fn oversized_readings_still_round_trip_through_history() {
    let h = setup();
    let stored = h
        .reports
        .generate(ReportRequest {
            source: ReportSource::Batch {
                records: vec![RawRecord::new().with("Coal usage", 1e306)],
            },
            company_name: None,
        })
        .expect("generate");

    assert!(stored.report.total_monthly_kg.is_finite());
    assert!(stored.report.total_annual_emissions_tco2e.is_finite());

    let fetched = h.reports.get_report(&stored.report.id).expect("get");
    assert_eq!(fetched.report.total_monthly_kg, stored.report.total_monthly_kg);
    h.reports
        .export_report(&stored.report.id, ReportExportFormat::Json)
        .expect("export");
}
