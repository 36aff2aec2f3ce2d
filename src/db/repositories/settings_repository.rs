use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct AppSettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for AppSettingRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct SettingsRepository;

impl SettingsRepository {
    pub fn get(conn: &Connection, key: &str) -> AppResult<Option<AppSettingRow>> {
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM app_settings WHERE key = ?1")?;

        let row = stmt
            .query_row([key], |row| AppSettingRow::try_from(row))
            .optional()?;

        Ok(row)
    }

    /// All settings whose key starts with `prefix`, e.g. `company.`.
    pub fn list_with_prefix(conn: &Connection, prefix: &str) -> AppResult<Vec<AppSettingRow>> {
        let mut stmt = conn.prepare(
            "SELECT key, value, updated_at FROM app_settings WHERE substr(key, 1, length(:prefix)) = :prefix ORDER BY key ASC",
        )?;

        let rows = stmt
            .query_map(named_params! {":prefix": prefix}, |row| {
                AppSettingRow::try_from(row)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn upsert(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO app_settings (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {":key": key, ":value": value},
        )?;

        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> AppResult<()> {
        conn.execute("DELETE FROM app_settings WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use tempfile::tempdir;

    #[test]
    fn prefix_listing_skips_other_namespaces() {
        let dir = tempdir().expect("tempdir");
        let pool = DbPool::new(dir.path().join("settings.sqlite")).expect("pool");

        pool.with_connection(|conn| {
            SettingsRepository::upsert(conn, "company.name", "Surya Mills")?;
            SettingsRepository::upsert(conn, "company.location", "Tiruppur")?;
            SettingsRepository::upsert(conn, "companyx", "ignored")?;
            SettingsRepository::upsert(conn, "company.name", "Surya Mills Ltd")?;

            let rows = SettingsRepository::list_with_prefix(conn, "company.")?;
            let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
            assert_eq!(keys, vec!["company.location", "company.name"]);
            assert_eq!(rows[1].value, "Surya Mills Ltd");

            SettingsRepository::delete(conn, "company.location")?;
            assert!(SettingsRepository::get(conn, "company.location")?.is_none());
            Ok(())
        })
        .expect("settings round trip");
    }
}
