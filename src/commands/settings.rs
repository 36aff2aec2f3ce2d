use crate::models::company::{CompanyProfile, CompanyProfileUpdate};

use super::{run_blocking, AppState, CommandResult};

pub async fn settings_get(state: &AppState) -> CommandResult<CompanyProfile> {
    let app_state = state.clone();
    run_blocking(move || app_state.settings().get()).await
}

pub async fn settings_update(
    state: &AppState,
    payload: CompanyProfileUpdate,
) -> CommandResult<CompanyProfile> {
    let app_state = state.clone();
    run_blocking(move || app_state.settings().update(payload)).await
}
