use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::{error::ValidationError, iso_date};

/// Meal category a record is logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ValidationError;

    /// Accepts category names in any case ("Breakfast", "lunch").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(ValidationError::UnknownMealType(s.to_string())),
        }
    }
}

/// A single logged food entry.
///
/// `calories` is optional because stored rows may predate validation; the
/// aggregator decides what a missing value means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub calories: Option<f64>,
    pub meal_type: MealType,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl MealRecord {
    /// Calorie value if present, finite and non-negative.
    pub fn valid_calories(&self) -> Option<f64> {
        self.calories.filter(|c| c.is_finite() && *c >= 0.0)
    }
}

/// Validated fields of a meal about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub name: String,
    pub calories: f64,
    pub meal_type: MealType,
    pub date: Date,
}

impl NewMeal {
    pub fn validate(
        name: &str,
        calories: f64,
        meal_type: &str,
        date: Date,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_meal_name(name)?,
            calories: validate_meal_calories(calories)?,
            meal_type: meal_type.parse()?,
            date,
        })
    }
}

/// Partial edit of an existing meal; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPatch {
    pub name: Option<String>,
    pub calories: Option<f64>,
}

impl MealPatch {
    pub fn validate(name: Option<&str>, calories: Option<f64>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.map(validate_meal_name).transpose()?,
            calories: calories.map(validate_meal_calories).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.calories.is_none()
    }
}

fn validate_meal_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_meal_calories(calories: f64) -> Result<f64, ValidationError> {
    if !calories.is_finite() || calories <= 0.0 {
        return Err(ValidationError::InvalidCalories);
    }
    Ok(calories)
}
