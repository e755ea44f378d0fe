use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, TokenResponse},
    error::AppError,
    extractors::Payload,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/authenticate", post(authenticate))
}

#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .accounts()
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(TokenResponse {
        error: false,
        token,
    }))
}
