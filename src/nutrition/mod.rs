//! Nutrition metrics engine: daily/weekly calorie aggregation, health metrics
//! and profile field validation.
//!
//! Everything here is synchronous and pure. Records are fetched by the store
//! adapters and handed in; nothing in this module performs I/O.

pub mod aggregate;
pub mod error;
pub mod meal;
pub mod metrics;
pub mod profile;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub use aggregate::{
    summarize_day, summarize_week, week_dates, AnchorPolicy, CaloriePolicy, DailySummary,
    WeekWindow,
};
pub use error::{AggregationError, MetricsError, ValidationError};
pub use meal::{MealPatch, MealRecord, MealType, NewMeal};
pub use metrics::{
    classify_bmi, compute_bmi, compute_bmr, compute_tdee, health_metrics, ActivityLevel,
    BmiCategory, BodyInputs, HealthMetrics,
};
pub use profile::{
    validate_field, validate_registration, FieldValue, Gender, ProfileData, ProfileField,
    ProfileUpdate,
};

/// Parses a "YYYY-MM-DD" calendar date.
pub fn parse_date(raw: &str) -> Result<time::Date, time::error::Parse> {
    time::Date::parse(raw.trim(), &time::macros::format_description!("[year]-[month]-[day]"))
}
