use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::operational::OperationalRecord;
use crate::models::record::RawRecord;

#[derive(Debug, Clone)]
pub struct OperationalRecordRow {
    pub id: String,
    pub period: String,
    pub subdomain: Option<String>,
    pub fields: String,
    pub source_name: Option<String>,
    pub created_at: String,
}

impl OperationalRecordRow {
    pub fn from_record(record: &OperationalRecord) -> AppResult<Self> {
        Ok(Self {
            id: record.id.clone(),
            period: record.period.clone(),
            subdomain: record.subdomain.clone(),
            fields: serde_json::to_string(&record.record)?,
            source_name: record.source_name.clone(),
            created_at: record.created_at.clone(),
        })
    }

    pub fn into_record(self) -> AppResult<OperationalRecord> {
        let record: RawRecord = serde_json::from_str(&self.fields).map_err(|err| {
            AppError::database(format!("corrupt fields for record {}: {err}", self.id))
        })?;
        Ok(OperationalRecord {
            id: self.id,
            period: self.period,
            subdomain: self.subdomain,
            record,
            source_name: self.source_name,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for OperationalRecordRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            period: row.get("period")?,
            subdomain: row.get("subdomain")?,
            fields: row.get("fields")?,
            source_name: row.get("source_name")?,
            created_at: row.get("created_at")?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, period, subdomain, fields, source_name, created_at FROM operational_records";

pub struct OperationalRecordRepository;

impl OperationalRecordRepository {
    pub fn insert(conn: &Connection, record: &OperationalRecord) -> AppResult<()> {
        let row = OperationalRecordRow::from_record(record)?;
        conn.execute(
            r#"
                INSERT INTO operational_records (
                    id, period, subdomain, fields, source_name, created_at
                ) VALUES (
                    :id, :period, :subdomain, :fields, :source_name, :created_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":period": &row.period,
                ":subdomain": &row.subdomain,
                ":fields": &row.fields,
                ":source_name": &row.source_name,
                ":created_at": &row.created_at,
            },
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<OperationalRecord>> {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?;
        let row = stmt
            .query_row(named_params! {":id": id}, |row| {
                OperationalRecordRow::try_from(row)
            })
            .optional()?;
        row.map(OperationalRecordRow::into_record).transpose()
    }

    /// Records with `from <= period <= to`, oldest period first. Open bounds are unbounded.
    pub fn list_between(
        conn: &Connection,
        from: Option<&str>,
        to: Option<&str>,
    ) -> AppResult<Vec<OperationalRecord>> {
        let mut stmt = conn.prepare(&format!(
            r#"{SELECT_COLUMNS}
                WHERE (:from IS NULL OR period >= :from)
                  AND (:to IS NULL OR period <= :to)
                ORDER BY period ASC, created_at ASC, id ASC"#
        ))?;

        let rows = stmt
            .query_map(named_params! {":from": from, ":to": to}, |row| {
                OperationalRecordRow::try_from(row)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(OperationalRecordRow::into_record)
            .collect()
    }

    /// Returns `true` when a row was removed.
    pub fn delete(conn: &Connection, id: &str) -> AppResult<bool> {
        let affected = conn.execute(
            "DELETE FROM operational_records WHERE id = :id",
            named_params! {":id": id},
        )?;
        Ok(affected > 0)
    }
}
