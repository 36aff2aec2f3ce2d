use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::db::repositories::report_repository::ReportRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::ingest::{read_batch, source_name};
use crate::models::record::RawRecord;
use crate::models::report::{
    ReportExportFormat, ReportExportResult, ReportRequest, ReportSource, ReportSummaryRecord,
    StoredReport,
};
use crate::services::data_input_service::{parse_period, period_label, DataInputService};
use crate::services::report_assembler::compute_report_with_rng;
use crate::services::report_renderer::{display_date, renderer_for};
use crate::services::settings_service::SettingsService;

const REPORT_PREFIX: &str = "sustainability-report";
const SAMPLE_REPORT_TITLE: &str = "Sample Report";
const MAX_LIST_LIMIT: usize = 500;

pub struct ReportService {
    db: DbPool,
    settings: Arc<SettingsService>,
    data_input: Arc<DataInputService>,
    reports_dir: PathBuf,
}

impl ReportService {
    pub fn new(
        db: DbPool,
        settings: Arc<SettingsService>,
        data_input: Arc<DataInputService>,
        reports_dir: PathBuf,
    ) -> AppResult<Self> {
        fs::create_dir_all(&reports_dir)?;
        Ok(Self {
            db,
            settings,
            data_input,
            reports_dir,
        })
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Computes, titles and stores a report for the requested input.
    pub fn generate(&self, request: ReportRequest) -> AppResult<StoredReport> {
        self.generate_with_rng(request, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        request: ReportRequest,
        rng: &mut R,
    ) -> AppResult<StoredReport> {
        let company_name = match request
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            Some(name) => name.to_string(),
            None => self.settings.company_name()?,
        };

        let (batch, title) = self.resolve_source(&request.source)?;
        let report = compute_report_with_rng(&batch, &company_name, rng);
        let title = if report.is_sample_data {
            SAMPLE_REPORT_TITLE.to_string()
        } else {
            title.unwrap_or_else(|| {
                format!("Sustainability Report - {}", display_date(&report.generated_at))
            })
        };

        let stored = StoredReport { title, report };
        self.db
            .with_connection(|conn| ReportRepository::insert(conn, &stored))?;

        info!(
            target: "app::report",
            id = %stored.report.id,
            title = %stored.title,
            rows = batch.len(),
            "report generated and stored"
        );
        Ok(stored)
    }

    pub fn list_reports(&self, limit: Option<usize>) -> AppResult<Vec<ReportSummaryRecord>> {
        if let Some(limit) = limit {
            if limit == 0 || limit > MAX_LIST_LIMIT {
                return Err(AppError::validation(format!(
                    "limit must be between 1 and {}",
                    MAX_LIST_LIMIT
                )));
            }
        }

        self.db
            .with_connection(|conn| ReportRepository::list(conn, limit.map(|l| l as i64)))
    }

    pub fn get_report(&self, id: &str) -> AppResult<StoredReport> {
        self.db
            .with_connection(|conn| ReportRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)
    }

    pub fn delete_report(&self, id: &str) -> AppResult<()> {
        let removed = self
            .db
            .with_connection(|conn| ReportRepository::delete(conn, id))?;
        if !removed {
            return Err(AppError::not_found());
        }
        info!(target: "app::report", id, "report deleted");
        Ok(())
    }

    /// Renders a stored report and writes it into the reports directory.
    pub fn export_report(
        &self,
        id: &str,
        format: ReportExportFormat,
    ) -> AppResult<ReportExportResult> {
        let stored = self.get_report(id)?;
        let renderer = renderer_for(format);
        let content = renderer.render(&stored.report)?;

        let path = self.next_export_path(renderer.format());
        fs::write(&path, content)?;

        info!(
            target: "app::report",
            id,
            format = renderer.format().file_extension(),
            path = %path.display(),
            "report exported"
        );

        Ok(ReportExportResult {
            report_id: stored.report.id,
            file_path: path.to_string_lossy().to_string(),
            format,
            generated_at: Utc::now().to_rfc3339(),
        })
    }

    fn resolve_source(&self, source: &ReportSource) -> AppResult<(Vec<RawRecord>, Option<String>)> {
        match source {
            ReportSource::Batch { records } => Ok((records.clone(), None)),
            ReportSource::Upload { path } => {
                let path = Path::new(path);
                let batch = read_batch(path)?;
                Ok((batch, Some(format!("Uploaded Report - {}", source_name(path)))))
            }
            ReportSource::Periods { from, to } => {
                let from_date = parse_period(from)?;
                let to_date = parse_period(to)?;
                let batch = self.data_input.load_batch(Some(from), Some(to))?;
                debug!(target: "app::report", %from, %to, rows = batch.len(), "loaded stored periods");

                let title = if from_date == to_date {
                    format!("Monthly Report - {}", period_label(from)?)
                } else {
                    format!(
                        "Report - {} to {}",
                        from_date.format("%Y-%m"),
                        to_date.format("%Y-%m")
                    )
                };
                Ok((batch, Some(title)))
            }
        }
    }

    fn next_export_path(&self, format: ReportExportFormat) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let extension = format.file_extension();
        let mut path = self
            .reports_dir
            .join(format!("{REPORT_PREFIX}-{}.{}", timestamp, extension));

        let mut counter = 2;
        while path.exists() {
            path = self
                .reports_dir
                .join(format!("{REPORT_PREFIX}-{}-{}.{}", timestamp, counter, extension));
            counter += 1;
        }
        path
    }
}
