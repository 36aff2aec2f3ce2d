use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::report::{EmissionReport, ReportSummaryRecord, ScoreBand, StoredReport};

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub total_annual_tco2e: f64,
    pub score_band: String,
    pub payload: String,
    pub generated_at: String,
}

impl ReportRow {
    /// Fails for reports with non-finite figures, which JSON cannot carry back.
    pub fn from_stored(stored: &StoredReport) -> AppResult<Self> {
        let report = &stored.report;
        let finite = report.total_monthly_kg.is_finite()
            && report.total_annual_emissions_tco2e.is_finite()
            && report
                .breakdown_lines
                .iter()
                .all(|line| line.usage_value.is_finite() && line.emission_kg.is_finite());
        if !finite {
            return Err(AppError::validation(format!(
                "report {} has emission figures outside the finite range",
                report.id
            )));
        }

        Ok(Self {
            id: report.id.clone(),
            title: stored.title.clone(),
            company_name: report.company_name.clone(),
            total_annual_tco2e: report.total_annual_emissions_tco2e,
            score_band: report.sustainability_score.as_str().to_string(),
            payload: serde_json::to_string(report)?,
            generated_at: report.generated_at.clone(),
        })
    }

    pub fn into_stored(self) -> AppResult<StoredReport> {
        let report: EmissionReport = serde_json::from_str(&self.payload).map_err(|err| {
            AppError::database(format!("corrupt payload for report {}: {err}", self.id))
        })?;
        Ok(StoredReport {
            title: self.title,
            report,
        })
    }

    pub fn into_summary(self) -> AppResult<ReportSummaryRecord> {
        let sustainability_score = ScoreBand::from_label(&self.score_band).ok_or_else(|| {
            AppError::database(format!(
                "unknown score band '{}' for report {}",
                self.score_band, self.id
            ))
        })?;
        Ok(ReportSummaryRecord {
            id: self.id,
            title: self.title,
            company_name: self.company_name,
            total_annual_emissions_tco2e: self.total_annual_tco2e,
            sustainability_score,
            generated_at: self.generated_at,
        })
    }
}

impl TryFrom<&Row<'_>> for ReportRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            company_name: row.get("company_name")?,
            total_annual_tco2e: row.get("total_annual_tco2e")?,
            score_band: row.get("score_band")?,
            payload: row.get("payload")?,
            generated_at: row.get("generated_at")?,
        })
    }
}

pub struct ReportRepository;

impl ReportRepository {
    pub fn insert(conn: &Connection, stored: &StoredReport) -> AppResult<()> {
        let row = ReportRow::from_stored(stored)?;
        conn.execute(
            r#"
                INSERT INTO sustainability_reports (
                    id, title, company_name, total_annual_tco2e, score_band, payload, generated_at
                ) VALUES (
                    :id, :title, :company_name, :total_annual_tco2e, :score_band, :payload, :generated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":title": &row.title,
                ":company_name": &row.company_name,
                ":total_annual_tco2e": &row.total_annual_tco2e,
                ":score_band": &row.score_band,
                ":payload": &row.payload,
                ":generated_at": &row.generated_at,
            },
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<StoredReport>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, title, company_name, total_annual_tco2e, score_band, payload, generated_at
                FROM sustainability_reports
                WHERE id = :id
            "#,
        )?;
        let row = stmt
            .query_row(named_params! {":id": id}, |row| ReportRow::try_from(row))
            .optional()?;
        row.map(ReportRow::into_stored).transpose()
    }

    /// Newest first.
    pub fn list(conn: &Connection, limit: Option<i64>) -> AppResult<Vec<ReportSummaryRecord>> {
        let limit_clause = limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default();
        let sql = format!(
            r#"
                SELECT id, title, company_name, total_annual_tco2e, score_band, payload, generated_at
                FROM sustainability_reports
                ORDER BY generated_at DESC, id DESC
                {}
            "#,
            limit_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| ReportRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ReportRow::into_summary).collect()
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<bool> {
        let affected = conn.execute(
            "DELETE FROM sustainability_reports WHERE id = :id",
            named_params! {":id": id},
        )?;
        Ok(affected > 0)
    }
}
