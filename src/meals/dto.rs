use serde::{Deserialize, Serialize};

use crate::nutrition::DailySummary;

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    pub calories: f64,
    pub meal_type: String,
    pub date: Option<String>, // YYYY-MM-DD, defaults to today (UTC)
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub calories: Option<f64>,
}

/// `?date=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// `?anchor=trailing7|iso_week&date=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub anchor: Option<String>,
    pub date: Option<String>,
}

/// Day summary together with progress against the daily calorie goal.
#[derive(Debug, Serialize)]
pub struct DayProgress {
    #[serde(flatten)]
    pub summary: DailySummary,
    pub goal: f64,
    pub remaining: f64,
}

impl DayProgress {
    pub fn new(summary: DailySummary, goal: f64) -> Self {
        let remaining = (goal - summary.total_calories).max(0.0);
        Self {
            summary,
            goal,
            remaining,
        }
    }
}
