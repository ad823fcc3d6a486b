use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::nutrition::{AnchorPolicy, CaloriePolicy};

/// Verification settings for bearer tokens issued by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// S3-compatible bucket holding profile pictures.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    pub week_anchor: AnchorPolicy,
    pub calorie_policy: CaloriePolicy,
    pub daily_calorie_goal: f64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            week_anchor: AnchorPolicy::Trailing7,
            calorie_policy: CaloriePolicy::Coerce,
            daily_calorie_goal: 2500.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| var(key).ok_or_else(|| anyhow!("{key} is not set"));

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "healthfuel".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "healthfuel-users".into()),
        };
        let storage = StorageConfig {
            endpoint: required("MINIO_ENDPOINT")?,
            bucket: required("MINIO_BUCKET")?,
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            region: var("MINIO_REGION").unwrap_or_else(|| "us-east-1".into()),
        };

        let defaults = NutritionConfig::default();
        let nutrition = NutritionConfig {
            week_anchor: match var("WEEK_ANCHOR") {
                Some(v) => v.parse().map_err(|e: String| anyhow!(e))?,
                None => defaults.week_anchor,
            },
            calorie_policy: match var("CALORIE_POLICY") {
                Some(v) => v.parse().map_err(|e: String| anyhow!(e))?,
                None => defaults.calorie_policy,
            },
            daily_calorie_goal: match var("DAILY_CALORIE_GOAL") {
                Some(v) => v
                    .parse::<f64>()
                    .with_context(|| format!("DAILY_CALORIE_GOAL={v}"))?,
                None => defaults.daily_calorie_goal,
            },
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            nutrition,
        })
    }
}
