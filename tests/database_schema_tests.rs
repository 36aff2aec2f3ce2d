use ecotextile_insights_lib::db::{migrations, DbPool};
use tempfile::tempdir;

fn column_names(conn: &rusqlite::Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .expect("table info");
    stmt.query_map([], |row| row.get::<_, String>(1))
        .expect("query columns")
        .collect::<Result<Vec<_>, _>>()
        .expect("collect columns")
}

#[test]
fn test_report_tables_creation() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("test.sqlite");
    let pool = DbPool::new(db_path).expect("db pool");

    pool.with_connection(|conn| {
        let records = column_names(conn, "operational_records");
        for column in ["id", "period", "subdomain", "fields", "source_name", "created_at"] {
            assert!(records.iter().any(|name| name == column), "missing {column}");
        }

        let reports = column_names(conn, "sustainability_reports");
        for column in ["id", "title", "company_name", "total_annual_tco2e", "score_band", "payload", "generated_at"] {
            assert!(reports.iter().any(|name| name == column), "missing {column}");
        }

        let settings = column_names(conn, "app_settings");
        assert_eq!(settings, vec!["key", "value", "updated_at"]);
        Ok(())
    })
    .expect("table structure verification");
}

#[test]
fn test_migrations_run_once() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("test.sqlite");
    let pool = DbPool::new(&db_path).expect("db pool");

    // Every connection re-runs the migration check.
    pool.get_connection().expect("second connection");
    let reopened = DbPool::new(&db_path).expect("reopen");

    reopened
        .with_connection(|conn| {
            let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
            assert_eq!(version, 3);

            let history = migrations::get_migration_history(conn)?;
            assert_eq!(history.len(), 3);
            assert_eq!(history[0].description, "Add monthly operational records");
            Ok(())
        })
        .expect("migration history");
}
