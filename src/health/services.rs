use tracing::debug;
use uuid::Uuid;

use super::dto::{CalculateRequest, CalculatedMetrics};
use crate::{
    error::ServiceError,
    nutrition::{
        classify_bmi, compute_bmi, health_metrics, ActivityLevel, BodyInputs, Gender,
        HealthMetrics,
    },
    state::AppState,
};

fn activity_from(raw: Option<&str>) -> ActivityLevel {
    raw.map(ActivityLevel::from_name).unwrap_or_default()
}

/// Metrics of the caller's stored profile.
pub async fn profile_metrics(
    st: &AppState,
    user_id: Uuid,
    activity: Option<&str>,
) -> Result<HealthMetrics, ServiceError> {
    let profile = st
        .profiles
        .fetch_profile(user_id)
        .await?
        .ok_or(ServiceError::NotFound("profile"))?;
    let inputs = BodyInputs {
        weight_kg: Some(profile.weight),
        height_cm: Some(profile.height),
        age_years: Some(profile.age),
        sex: Some(profile.gender),
    };
    let metrics = health_metrics(inputs, activity_from(activity))?;
    debug!(%user_id, bmi = metrics.bmi, tdee = metrics.tdee, "profile metrics");
    Ok(metrics)
}

/// Metrics from values typed into the calculator rather than the profile.
pub fn calculate(req: &CalculateRequest) -> Result<CalculatedMetrics, ServiceError> {
    let activity = activity_from(req.activity.as_deref());
    let sex = req
        .sex
        .as_deref()
        .map(str::parse::<Gender>)
        .transpose()?;

    let bmi = compute_bmi(req.weight_kg, req.height_cm)?;
    let (bmr, tdee) = match req.age {
        Some(age) => {
            let inputs = BodyInputs {
                weight_kg: Some(req.weight_kg),
                height_cm: Some(req.height_cm),
                age_years: Some(age),
                sex,
            };
            let full = health_metrics(inputs, activity)?;
            (Some(full.bmr), Some(full.tdee))
        }
        None => (None, None),
    };

    Ok(CalculatedMetrics {
        bmi,
        bmi_category: classify_bmi(bmi),
        bmr,
        activity_level: activity,
        activity_multiplier: activity.multiplier(),
        tdee,
    })
}
