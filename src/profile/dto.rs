use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterProfileRequest {
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
}

/// PATCH /profile { field, value }. The value may arrive as a JSON string or number.
#[derive(Debug, Deserialize)]
pub struct EditFieldRequest {
    pub field: String,
    pub value: RawValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn to_raw(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}
