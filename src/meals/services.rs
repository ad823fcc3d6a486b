use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use super::dto::{CreateMealRequest, DayProgress, UpdateMealRequest};
use crate::{
    error::ServiceError,
    nutrition::{
        parse_date, summarize_day, summarize_week, AnchorPolicy, MealPatch, MealRecord, NewMeal,
        WeekWindow,
    },
    state::AppState,
};

/// Calendar date used for "today"; records carry UTC dates.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Parses an optional `YYYY-MM-DD` request value.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, ServiceError> {
    raw.map(|s| {
        parse_date(s).map_err(|_| ServiceError::BadRequest(format!("invalid date: {s}")))
    })
    .transpose()
}

pub async fn list_meals(
    st: &AppState,
    user_id: Uuid,
    date: Option<Date>,
) -> Result<Vec<MealRecord>, ServiceError> {
    let mut records = st.meals.fetch_meal_records(user_id).await?;
    if let Some(date) = date {
        records.retain(|r| r.date == date);
    }
    Ok(records)
}

pub async fn add_meal(
    st: &AppState,
    user_id: Uuid,
    req: CreateMealRequest,
) -> Result<MealRecord, ServiceError> {
    let date = parse_optional_date(req.date.as_deref())?.unwrap_or_else(today_utc);
    let meal = NewMeal::validate(&req.name, req.calories, &req.meal_type, date)?;
    let record = st.meals.create_meal_record(user_id, meal).await?;
    info!(%user_id, meal_id = %record.id, meal_type = %record.meal_type, "meal added");
    Ok(record)
}

pub async fn edit_meal(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateMealRequest,
) -> Result<MealRecord, ServiceError> {
    let patch = MealPatch::validate(req.name.as_deref(), req.calories)?;
    if patch.is_empty() {
        return Err(ServiceError::BadRequest(
            "nothing to update: provide name or calories".into(),
        ));
    }
    st.meals
        .update_meal_record(user_id, id, patch)
        .await?
        .ok_or(ServiceError::NotFound("meal"))
}

pub async fn remove_meal(st: &AppState, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    if !st.meals.delete_meal_record(user_id, id).await? {
        return Err(ServiceError::NotFound("meal"));
    }
    info!(%user_id, meal_id = %id, "meal deleted");
    Ok(())
}

pub async fn day_progress(
    st: &AppState,
    user_id: Uuid,
    date: Date,
) -> Result<DayProgress, ServiceError> {
    let records = st.meals.fetch_meal_records(user_id).await?;
    let summary = summarize_day(&records, date, st.config.nutrition.calorie_policy)?;
    Ok(DayProgress::new(summary, st.config.nutrition.daily_calorie_goal))
}

pub async fn week_window(
    st: &AppState,
    user_id: Uuid,
    anchor: Option<AnchorPolicy>,
    today: Date,
) -> Result<WeekWindow, ServiceError> {
    let records = st.meals.fetch_meal_records(user_id).await?;
    let anchor = anchor.unwrap_or(st.config.nutrition.week_anchor);
    Ok(summarize_week(
        &records,
        anchor,
        today,
        st.config.nutrition.calorie_policy,
    )?)
}
