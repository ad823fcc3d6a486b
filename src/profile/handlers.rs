use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Redirect,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{EditFieldRequest, RegisterProfileRequest};
use super::services;
use crate::{auth::AuthUser, error::ServiceError, nutrition::ProfileData, state::AppState};

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).post(register_profile).patch(edit_profile),
        )
        .route("/profile/picture", get(get_picture).put(put_picture))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ProfileData>> {
    Ok(Json(services::get_profile(&state, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn register_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RegisterProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileData>)> {
    let profile = services::register(&state, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// PATCH /profile { field, value }
#[instrument(skip(state))]
pub async fn edit_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<EditFieldRequest>,
) -> ApiResult<Json<ProfileData>> {
    Ok(Json(services::edit_field(&state, user_id, body).await?))
}

/// PUT /profile/picture with the raw image as body.
#[instrument(skip(state, headers, body), fields(size = body.len()))]
pub async fn put_picture(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ProfileData>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ServiceError::BadRequest("missing Content-Type".into()))?;
    let profile = services::upload_picture(&state, user_id, body, content_type).await?;
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn get_picture(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Redirect> {
    let url = services::picture_url(&state, user_id).await?;
    Ok(Redirect::temporary(&url))
}
