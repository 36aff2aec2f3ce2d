pub mod data;
pub mod reports;
pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::data_input_service::DataInputService;
use crate::services::report_service::ReportService;
use crate::services::settings_service::SettingsService;

const DATABASE_FILE: &str = "ecotextile.sqlite";
const REPORTS_DIR: &str = "reports";
const LOGS_DIR: &str = "logs";

/// Log directory inside an application data directory.
pub fn logs_dir_in(data_dir: &Path) -> PathBuf {
    data_dir.join(LOGS_DIR)
}

/// Shared services behind every command. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    data_dir: PathBuf,
    settings_service: Arc<SettingsService>,
    data_input_service: Arc<DataInputService>,
    report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(data_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(logs_dir_in(&data_dir))?;

        let db_pool = DbPool::new(data_dir.join(DATABASE_FILE))?;
        let settings_service = Arc::new(SettingsService::new(db_pool.clone()));
        let data_input_service = Arc::new(DataInputService::new(db_pool.clone()));
        let report_service = Arc::new(ReportService::new(
            db_pool.clone(),
            Arc::clone(&settings_service),
            Arc::clone(&data_input_service),
            data_dir.join(REPORTS_DIR),
        )?);

        info!(target: "app::command", data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            db_pool,
            data_dir,
            settings_service,
            data_input_service,
            report_service,
        })
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn data_input(&self) -> Arc<DataInputService> {
        Arc::clone(&self.data_input_service)
    }

    pub fn reports(&self) -> Arc<ReportService> {
        Arc::clone(&self.report_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn logs_dir(&self) -> PathBuf {
        logs_dir_in(&self.data_dir)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested record does not exist", None)
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::Ingest {
                source_name,
                message,
            } => {
                warn!(target: "app::command", %source_name, %message, "upload rejected in command");
                CommandError::new(
                    "INGEST_ERROR",
                    format!("could not read {}: {}", source_name, message),
                    Some(serde_json::json!({ "sourceName": source_name })),
                )
            }
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

/// Moves blocking service work (SQLite, file I/O) off the async executor.
pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("background task failed: {err}"), None))?
        .map_err(CommandError::from)
}
