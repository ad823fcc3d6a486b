//! BMI, BMR (Mifflin–St Jeor) and TDEE.
//!
//! Every result is rounded to two decimals, the precision shown to users.

use serde::{Deserialize, Serialize};

use super::{error::MetricsError, profile::Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

/// Activity level used to scale BMR into TDEE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Unrecognized names fall back to `Sedentary`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "veryActive" | "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub tdee: f64,
}

/// Body measurements a metric calculation starts from. Any of them may be
/// missing, in which case the dependent metrics are not yet calculable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyInputs {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<f64>,
    pub sex: Option<Gender>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn positive(value: f64, what: &'static str) -> Result<f64, MetricsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::InvalidInput(what))
    }
}

fn non_negative(value: f64, what: &'static str) -> Result<f64, MetricsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::InvalidInput(what))
    }
}

pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, MetricsError> {
    let weight = positive(weight_kg, "weight must be a positive number of kg")?;
    let height_m = positive(height_cm, "height must be a positive number of cm")? / 100.0;
    Ok(round2(weight / (height_m * height_m)))
}

/// Bands are closed on their lower bound: 18.5 is Normal, 25 is Overweight,
/// 30 is Obesity. Values between the printed labels (24.95) belong to the
/// lower band.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obesity
    }
}

/// Mifflin–St Jeor. Any sex other than male uses the female constant.
pub fn compute_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    sex: Gender,
) -> Result<f64, MetricsError> {
    let weight = positive(weight_kg, "weight must be a positive number of kg")?;
    let height = positive(height_cm, "height must be a positive number of cm")?;
    let age = non_negative(age_years, "age must be a non-negative number of years")?;
    let constant = match sex {
        Gender::Male => 5.0,
        Gender::Female | Gender::Other => -161.0,
    };
    Ok(round2(10.0 * weight + 6.25 * height - 5.0 * age + constant))
}

pub fn compute_tdee(bmr: f64, activity: ActivityLevel) -> Result<f64, MetricsError> {
    let bmr = positive(bmr, "BMR must be calculated first")?;
    Ok(round2(bmr * activity.multiplier()))
}

/// All metrics in one pass. A missing sex uses the male constant, the
/// calculator's starting selection.
pub fn health_metrics(
    inputs: BodyInputs,
    activity: ActivityLevel,
) -> Result<HealthMetrics, MetricsError> {
    let weight = inputs
        .weight_kg
        .ok_or(MetricsError::InvalidInput("weight is missing"))?;
    let height = inputs
        .height_cm
        .ok_or(MetricsError::InvalidInput("height is missing"))?;
    let age = inputs
        .age_years
        .ok_or(MetricsError::InvalidInput("age is missing"))?;

    let bmi = compute_bmi(weight, height)?;
    let bmr = compute_bmr(weight, height, age, inputs.sex.unwrap_or(Gender::Male))?;
    let tdee = compute_tdee(bmr, activity)?;

    Ok(HealthMetrics {
        bmi,
        bmi_category: classify_bmi(bmi),
        bmr,
        activity_level: activity,
        activity_multiplier: activity.multiplier(),
        tdee,
    })
}
