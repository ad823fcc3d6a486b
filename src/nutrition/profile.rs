use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError::UnknownGender),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub age: f64,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub profile_picture: Option<String>,
}

/// Profile fields a user may edit one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Name,
    Age,
    Gender,
    Weight,
    Height,
}

impl ProfileField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::Weight => "weight",
            ProfileField::Height => "height",
        }
    }

    /// Inclusive bounds and the message shown when a value falls outside them.
    fn range(self) -> Option<(f64, f64, &'static str)> {
        match self {
            ProfileField::Age => Some((0.0, 120.0, "valid age between 0 and 120")),
            ProfileField::Weight => Some((0.0, 500.0, "valid weight between 0 and 500 kg")),
            ProfileField::Height => Some((0.0, 300.0, "valid height between 0 and 300 cm")),
            ProfileField::Name | ProfileField::Gender => None,
        }
    }
}

impl FromStr for ProfileField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(ProfileField::Name),
            "age" => Ok(ProfileField::Age),
            "gender" => Ok(ProfileField::Gender),
            "weight" => Ok(ProfileField::Weight),
            "height" => Ok(ProfileField::Height),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// A single validated field value, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Gender(Gender),
}

/// One validated profile edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub field: ProfileField,
    pub value: FieldValue,
}

impl ProfileUpdate {
    pub fn apply_to(&self, profile: &mut ProfileData) {
        match (&self.value, self.field) {
            (FieldValue::Text(name), ProfileField::Name) => profile.name = name.clone(),
            (FieldValue::Gender(g), _) => profile.gender = *g,
            (FieldValue::Number(n), ProfileField::Age) => profile.age = *n,
            (FieldValue::Number(n), ProfileField::Weight) => profile.weight = *n,
            (FieldValue::Number(n), ProfileField::Height) => profile.height = *n,
            _ => {}
        }
    }
}

/// Validates one raw profile edit.
///
/// Numeric fields must parse to a finite number inside their bounds. Names are
/// trimmed and otherwise unchecked. Gender must be male, female or other; the
/// validator is the single owner of that rule.
pub fn validate_field(field: ProfileField, raw: &str) -> Result<ProfileUpdate, ValidationError> {
    let trimmed = raw.trim();
    let value = match field {
        ProfileField::Name => FieldValue::Text(trimmed.to_string()),
        ProfileField::Gender => FieldValue::Gender(trimmed.parse()?),
        ProfileField::Age | ProfileField::Weight | ProfileField::Height => {
            FieldValue::Number(parse_in_range(field, trimmed)?)
        }
    };
    Ok(ProfileUpdate { field, value })
}

fn parse_in_range(field: ProfileField, raw: &str) -> Result<f64, ValidationError> {
    let number = raw
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(ValidationError::NotANumber {
            field: field.as_str(),
        })?;
    check_range(field, number)
}

fn check_range(field: ProfileField, number: f64) -> Result<f64, ValidationError> {
    if let Some((min, max, message)) = field.range() {
        if !number.is_finite() || number < min || number > max {
            return Err(ValidationError::OutOfRange {
                field: field.as_str(),
                message,
            });
        }
    }
    Ok(number)
}

/// Validates every field of a profile created at registration.
pub fn validate_registration(
    name: &str,
    age: f64,
    gender: &str,
    weight: f64,
    height: f64,
) -> Result<ProfileData, ValidationError> {
    Ok(ProfileData {
        name: name.trim().to_string(),
        age: check_range(ProfileField::Age, age)?,
        gender: gender.parse()?,
        weight: check_range(ProfileField::Weight, weight)?,
        height: check_range(ProfileField::Height, height)?,
        profile_picture: None,
    })
}
