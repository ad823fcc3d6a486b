use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CalculateRequest, CalculatedMetrics, MetricsQuery};
use super::services;
use crate::{auth::AuthUser, nutrition::HealthMetrics, state::AppState};

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(profile_metrics))
        .route("/metrics/calculate", post(calculate))
}

#[instrument(skip(state))]
pub async fn profile_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MetricsQuery>,
) -> ApiResult<Json<HealthMetrics>> {
    let metrics = services::profile_metrics(&state, user_id, q.activity.as_deref()).await?;
    Ok(Json(metrics))
}

/// POST /metrics/calculate { weight_kg, height_cm, age?, sex?, activity? }
#[instrument(skip_all)]
pub async fn calculate(
    _user: AuthUser,
    Json(body): Json<CalculateRequest>,
) -> ApiResult<Json<CalculatedMetrics>> {
    Ok(Json(services::calculate(&body)?))
}

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::auth::extractors::sign_for_tests;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt as _;
    use uuid::Uuid;

    #[tokio::test]
    async fn calculate_endpoint_returns_metrics() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/metrics/calculate")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"weight_kg": 95, "height_cm": 175, "age": 45, "sex": "female", "activity": "veryActive"})
                    .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["bmi"], 31.02);
        assert_eq!(v["bmi_category"], "Obesity");
        assert_eq!(v["activity_level"], "veryActive");
        assert_eq!(v["bmr"], 1657.75);
    }

    #[tokio::test]
    async fn profile_metrics_without_profile_is_404() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let req = Request::builder()
            .uri("/api/v1/metrics?activity=active")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
