use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateMealRequest, DateQuery, DayProgress, UpdateMealRequest, WeekQuery};
use super::services::{self, parse_optional_date, today_utc};
use crate::{
    auth::AuthUser,
    error::ServiceError,
    nutrition::{AnchorPolicy, MealRecord, WeekWindow},
    state::AppState,
};

type ApiResult<T> = Result<T, (StatusCode, String)>;

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/summary/day", get(day_summary))
        .route("/summary/week", get(week_summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", patch(update_meal).delete(delete_meal))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> ApiResult<Json<Vec<MealRecord>>> {
    let date = parse_optional_date(q.date.as_deref())?;
    let meals = services::list_meals(&state, user_id, date).await?;
    Ok(Json(meals))
}

/// POST /meals { name, calories, meal_type, date? }
#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateMealRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<MealRecord>)> {
    let record = services::add_meal(&state, user_id, body).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/meals/{}", record.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(record)))
}

/// PATCH /meals/:id { name?, calories? }
#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealRequest>,
) -> ApiResult<Json<MealRecord>> {
    let record = services::edit_meal(&state, user_id, id, body).await?;
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    services::remove_meal(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn day_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> ApiResult<Json<DayProgress>> {
    let date = parse_optional_date(q.date.as_deref())?.unwrap_or_else(today_utc);
    let progress = services::day_progress(&state, user_id, date).await?;
    Ok(Json(progress))
}

#[instrument(skip(state))]
pub async fn week_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WeekQuery>,
) -> ApiResult<Json<WeekWindow>> {
    let anchor = q
        .anchor
        .as_deref()
        .map(str::parse::<AnchorPolicy>)
        .transpose()
        .map_err(ServiceError::BadRequest)?;
    let today = parse_optional_date(q.date.as_deref())?.unwrap_or_else(today_utc);
    let week = services::week_window(&state, user_id, anchor, today).await?;
    Ok(Json(week))
}

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::auth::extractors::sign_for_tests;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt as _;
    use uuid::Uuid;

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"));
        match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn meal_lifecycle_through_the_api() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, created) = call(
            &app,
            request(
                "POST",
                "/api/v1/meals",
                &token,
                Some(json!({"name": "Som tam", "calories": 180, "meal_type": "Lunch", "date": "2025-04-13"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["meal_type"], "lunch");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = call(
            &app,
            request(
                "PATCH",
                &format!("/api/v1/meals/{id}"),
                &token,
                Some(json!({"calories": 220})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["calories"], 220.0);
        assert_eq!(updated["name"], "Som tam");

        let (status, day) = call(
            &app,
            request("GET", "/api/v1/summary/day?date=2025-04-13", &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(day["date"], "2025-04-13");
        assert_eq!(day["total_calories"], 220.0);
        assert_eq!(day["per_category_totals"]["lunch"], 220.0);
        assert_eq!(day["per_category_totals"]["breakfast"], 0.0);
        assert_eq!(day["remaining"], 2280.0);

        let (status, _) = call(
            &app,
            request("DELETE", &format!("/api/v1/meals/{id}"), &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, meals) = call(&app, request("GET", "/api/v1/meals", &token, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(meals, json!([]));
    }

    #[tokio::test]
    async fn week_summary_honours_anchor_query() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, week) = call(
            &app,
            request(
                "GET",
                "/api/v1/summary/week?anchor=iso_week&date=2025-04-09",
                &token,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(week["anchor"], "iso_week");
        let days = week["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["date"], "2025-04-07");
        assert_eq!(days[6]["date"], "2025-04-13");

        let (status, _) = call(
            &app,
            request("GET", "/api/v1/summary/week?anchor=monthly", &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn week_summary_at_calendar_edge_is_bad_request() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        for uri in [
            "/api/v1/summary/week?anchor=iso_week&date=9999-12-31",
            "/api/v1/summary/week?anchor=trailing7&date=-9999-01-01",
        ] {
            let (status, _) = call(&app, request("GET", uri, &token, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }

        let (status, week) = call(
            &app,
            request("GET", "/api/v1/summary/week?date=9999-12-31", &token, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(week["days"][6]["date"], "9999-12-31");
    }

    #[tokio::test]
    async fn invalid_meal_returns_message() {
        let state = AppState::fake();
        let token = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let response = app
            .oneshot(request(
                "POST",
                "/api/v1/meals",
                &token,
                Some(json!({"name": "  ", "calories": 100, "meal_type": "dinner"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Meal name cannot be empty.");
    }

    #[tokio::test]
    async fn users_cannot_touch_each_others_meals() {
        let state = AppState::fake();
        let alice = sign_for_tests(&state, Uuid::new_v4());
        let bob = sign_for_tests(&state, Uuid::new_v4());
        let app = build_app(state);

        let (_, created) = call(
            &app,
            request(
                "POST",
                "/api/v1/meals",
                &alice,
                Some(json!({"name": "Khao man gai", "calories": 600, "meal_type": "lunch"})),
            ),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            request("DELETE", &format!("/api/v1/meals/{id}"), &bob, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, bobs) = call(&app, request("GET", "/api/v1/meals", &bob, None)).await;
        assert_eq!(bobs, json!([]));
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = build_app(AppState::fake());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/meals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
