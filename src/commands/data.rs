use std::path::PathBuf;

use serde::Deserialize;

use crate::models::operational::{ImportSummary, MonthlyDataInput, OperationalRecord};
use crate::models::subdomain::{Subdomain, SUBDOMAINS};

use super::{run_blocking, AppState, CommandResult};

pub async fn data_submit(
    state: &AppState,
    input: MonthlyDataInput,
) -> CommandResult<OperationalRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.data_input().submit_monthly_data(input)).await
}

pub async fn data_list(
    state: &AppState,
    params: Option<RecordQueryParams>,
) -> CommandResult<Vec<OperationalRecord>> {
    let app_state = state.clone();
    let params = params.unwrap_or_default();
    run_blocking(move || {
        app_state
            .data_input()
            .list_records(params.from.as_deref(), params.to.as_deref())
    })
    .await
}

pub async fn data_import(
    state: &AppState,
    payload: DataImportPayload,
) -> CommandResult<ImportSummary> {
    let app_state = state.clone();
    run_blocking(move || {
        app_state.data_input().import_spreadsheet(
            &payload.path,
            &payload.period,
            payload.subdomain.as_deref(),
        )
    })
    .await
}

pub async fn data_delete(state: &AppState, id: String) -> CommandResult<()> {
    let app_state = state.clone();
    run_blocking(move || app_state.data_input().delete_record(&id)).await
}

pub async fn subdomains_list() -> CommandResult<Vec<Subdomain>> {
    Ok(SUBDOMAINS.to_vec())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQueryParams {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataImportPayload {
    pub path: PathBuf,
    pub period: String,
    #[serde(default)]
    pub subdomain: Option<String>,
}
