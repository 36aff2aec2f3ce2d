use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ecotextile_insights_lib::commands::{logs_dir_in, AppState};
use ecotextile_insights_lib::models::report::{ReportExportFormat, ReportRequest, ReportSource};
use ecotextile_insights_lib::utils::logger::init_logging;
use ecotextile_insights_lib::AppResult;
use tracing::error;

const DATA_DIR: &str = "ecotextile-data";

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: ecotextile-insights <data.csv|data.json> [company name]");
        return ExitCode::from(2);
    };
    let company = args.collect::<Vec<_>>().join(" ");

    match run(Path::new(&input), &company) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "app::command", error = %err, "report generation failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, company: &str) -> AppResult<()> {
    let data_dir = PathBuf::from(DATA_DIR);
    init_logging(&logs_dir_in(&data_dir))?;
    let state = AppState::new(data_dir)?;

    let request = ReportRequest {
        source: ReportSource::Upload {
            path: input.to_string_lossy().into_owned(),
        },
        company_name: (!company.trim().is_empty()).then(|| company.to_string()),
    };

    let reports = state.reports();
    let stored = reports.generate(request)?;
    let export = reports.export_report(&stored.report.id, ReportExportFormat::Html)?;

    println!("{}", stored.title);
    println!(
        "{}: {:.2} tCO2e per year ({})",
        stored.report.company_name,
        stored.report.total_annual_emissions_tco2e,
        stored.report.sustainability_score
    );
    println!("report written to {}", export.file_path);
    Ok(())
}
