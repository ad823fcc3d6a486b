use serde::{Deserialize, Serialize};

use crate::nutrition::{ActivityLevel, BmiCategory};

/// `?activity=sedentary|light|moderate|active|veryActive`
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub activity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub activity: Option<String>,
}

/// Calculator output. BMI needs only weight and height, so it is always
/// present; BMR and TDEE appear once an age is given.
#[derive(Debug, Serialize)]
pub struct CalculatedMetrics {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: Option<f64>,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub tdee: Option<f64>,
}
