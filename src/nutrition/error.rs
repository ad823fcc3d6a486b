use thiserror::Error;
use time::Date;
use uuid::Uuid;

/// A health metric could not be computed from the given inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// A user-supplied value was rejected. The message is meant to be shown as is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a number.")]
    NotANumber { field: &'static str },

    #[error("Please enter a {message}")]
    OutOfRange {
        field: &'static str,
        message: &'static str,
    },

    #[error("Gender must be one of: male, female, other.")]
    UnknownGender,

    #[error("Meal name cannot be empty.")]
    EmptyName,

    #[error("Calories must be a positive number.")]
    InvalidCalories,

    #[error("Unknown meal type: {0}")]
    UnknownMealType(String),

    #[error("Unknown profile field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("meal {id} has a missing or invalid calorie value")]
    InvalidCalories { id: Uuid },

    #[error("no full week around {today} fits the calendar")]
    WindowOutOfRange { today: Date },
}
