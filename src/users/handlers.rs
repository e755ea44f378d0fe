use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{access::require_admin, extractors::AuthUser},
    error::AppError,
    extractors::Payload,
    state::AppState,
    users::{
        dto::{PublicAccount, RegisterRequest, UpdateRequest},
        services::AccountChanges,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(register).get(list_users))
        .route(
            "/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.admin == Some(true) {
        warn!("ignoring admin flag on public registration");
    }

    let account = state
        .accounts()
        .register(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
            payload.name,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/user/{}", account.id))],
    ))
}

#[instrument(skip(state, caller))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<BTreeMap<Uuid, PublicAccount>>, AppError> {
    require_admin(&caller)?;
    let accounts = state.accounts().list().await?;
    let map = accounts
        .into_iter()
        .map(|a| (a.id, PublicAccount::from(a)))
        .collect();
    Ok(Json(map))
}

#[instrument(skip(state, caller))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicAccount>, AppError> {
    let account = state.accounts().get_by_id(&id, &caller).await?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateRequest>,
) -> Result<StatusCode, AppError> {
    state
        .accounts()
        .update(
            &id,
            &caller,
            AccountChanges {
                name: payload.name,
                password: payload.password,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.accounts().delete(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
