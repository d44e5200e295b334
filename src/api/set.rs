use crate::{
    server::state::AppState,
    sets::{self, SetParams, SetResponse},
    types::ApiResult,
};
use axum::extract::{Path, State};

pub async fn route(
    State(state): State<AppState>,
    Path(params): Path<SetParams>,
) -> ApiResult<SetResponse> {
    sets::load(params, &state.catalog).await
}
