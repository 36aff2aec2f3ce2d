use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repositories::operational_record_repository::OperationalRecordRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::ingest::{read_batch, source_name};
use crate::models::operational::{ImportSummary, MonthlyDataInput, OperationalRecord};
use crate::models::record::RawRecord;
use crate::models::subdomain::find_subdomain;

/// Parses a `YYYY-MM` reporting period into the first day of that month.
pub fn parse_period(period: &str) -> AppResult<NaiveDate> {
    let trimmed = period.trim();
    let well_formed = trimmed.len() == 7 && trimmed.as_bytes()[4] == b'-';
    well_formed
        .then(|| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").ok())
        .flatten()
        .ok_or_else(|| {
            AppError::validation(format!(
                "invalid period '{}'; expected YYYY-MM",
                period.trim()
            ))
        })
}

/// `2024-05` becomes `May 2024`.
pub fn period_label(period: &str) -> AppResult<String> {
    Ok(parse_period(period)?.format("%B %Y").to_string())
}

pub struct DataInputService {
    db: DbPool,
}

impl DataInputService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn submit_monthly_data(&self, input: MonthlyDataInput) -> AppResult<OperationalRecord> {
        let period = normalized_period(&input.period)?;
        let subdomain = validated_subdomain(input.subdomain.as_deref())?;

        let record: RawRecord = input
            .fields
            .into_iter()
            .filter_map(|(label, value)| {
                let label = label.trim();
                (!label.is_empty()).then(|| (label.to_string(), value))
            })
            .collect();

        if record.is_empty() {
            return Err(AppError::validation(
                "monthly data must include at least one labelled field",
            ));
        }

        let stored = OperationalRecord {
            id: Uuid::new_v4().to_string(),
            period,
            subdomain,
            record,
            source_name: None,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db
            .with_connection(|conn| OperationalRecordRepository::insert(conn, &stored))?;

        info!(
            target: "app::data",
            id = %stored.id,
            period = %stored.period,
            fields = stored.record.fields.len(),
            "monthly data submitted"
        );
        Ok(stored)
    }

    /// Stores every row of an uploaded `.csv` or `.json` file under one period.
    pub fn import_spreadsheet(
        &self,
        path: &Path,
        period: &str,
        subdomain: Option<&str>,
    ) -> AppResult<ImportSummary> {
        let period = normalized_period(period)?;
        let subdomain = validated_subdomain(subdomain)?;
        let name = source_name(path);

        let batch = read_batch(path)?;
        if batch.is_empty() {
            return Err(AppError::ingest(name, "the file contains no data rows"));
        }

        let created_at = Utc::now().to_rfc3339();
        let records: Vec<OperationalRecord> = batch
            .into_iter()
            .map(|record| OperationalRecord {
                id: Uuid::new_v4().to_string(),
                period: period.clone(),
                subdomain: subdomain.clone(),
                record,
                source_name: Some(name.clone()),
                created_at: created_at.clone(),
            })
            .collect();

        self.db.with_transaction(|conn| {
            for record in &records {
                OperationalRecordRepository::insert(conn, record)?;
            }
            Ok(())
        })?;

        info!(
            target: "app::data",
            source = %name,
            period = %period,
            imported = records.len(),
            "spreadsheet imported"
        );

        Ok(ImportSummary {
            source_name: name,
            period,
            imported: records.len(),
            record_ids: records.into_iter().map(|record| record.id).collect(),
        })
    }

    pub fn list_records(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> AppResult<Vec<OperationalRecord>> {
        let from = from.map(normalized_period).transpose()?;
        let to = to.map(normalized_period).transpose()?;
        if let (Some(from), Some(to)) = (from.as_ref(), to.as_ref()) {
            if from > to {
                return Err(AppError::validation(format!(
                    "period range is reversed: {} is after {}",
                    from, to
                )));
            }
        }

        let records = self.db.with_connection(|conn| {
            OperationalRecordRepository::list_between(conn, from.as_deref(), to.as_deref())
        })?;
        debug!(target: "app::data", count = records.len(), "operational records listed");
        Ok(records)
    }

    /// Stored rows for the range, ready for report generation.
    pub fn load_batch(&self, from: Option<&str>, to: Option<&str>) -> AppResult<Vec<RawRecord>> {
        Ok(self
            .list_records(from, to)?
            .into_iter()
            .map(|record| record.record)
            .collect())
    }

    pub fn delete_record(&self, id: &str) -> AppResult<()> {
        let removed = self
            .db
            .with_connection(|conn| OperationalRecordRepository::delete(conn, id))?;
        if !removed {
            return Err(AppError::not_found());
        }
        info!(target: "app::data", id, "operational record deleted");
        Ok(())
    }
}

fn normalized_period(period: &str) -> AppResult<String> {
    Ok(parse_period(period)?.format("%Y-%m").to_string())
}

fn validated_subdomain(subdomain: Option<&str>) -> AppResult<Option<String>> {
    match subdomain.map(str::trim).filter(|name| !name.is_empty()) {
        None => Ok(None),
        Some(name) => find_subdomain(name)
            .map(|found| Some(found.name.to_string()))
            .ok_or_else(|| AppError::validation(format!("unknown factory subdomain '{}'", name))),
    }
}
