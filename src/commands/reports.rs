use serde::Deserialize;

use crate::models::report::{
    ReportExportFormat, ReportExportResult, ReportRequest, ReportSummaryRecord, StoredReport,
};

use super::{run_blocking, AppState, CommandResult};

pub async fn reports_generate(
    state: &AppState,
    request: ReportRequest,
) -> CommandResult<StoredReport> {
    let app_state = state.clone();
    run_blocking(move || app_state.reports().generate(request)).await
}

pub async fn reports_list(
    state: &AppState,
    limit: Option<usize>,
) -> CommandResult<Vec<ReportSummaryRecord>> {
    let app_state = state.clone();
    run_blocking(move || app_state.reports().list_reports(limit)).await
}

pub async fn reports_get(state: &AppState, id: String) -> CommandResult<StoredReport> {
    let app_state = state.clone();
    run_blocking(move || app_state.reports().get_report(&id)).await
}

pub async fn reports_export(
    state: &AppState,
    params: ReportExportParams,
) -> CommandResult<ReportExportResult> {
    let app_state = state.clone();
    let format = params.format.unwrap_or_default();
    run_blocking(move || app_state.reports().export_report(&params.id, format)).await
}

pub async fn reports_delete(state: &AppState, id: String) -> CommandResult<()> {
    let app_state = state.clone();
    run_blocking(move || app_state.reports().delete_report(&id)).await
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExportParams {
    pub id: String,
    #[serde(default)]
    pub format: Option<ReportExportFormat>,
}
