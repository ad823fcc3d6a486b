use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::ProfileRow;
use crate::nutrition::{FieldValue, ProfileData, ProfileUpdate};

const PROFILE_COLUMNS: &str = "user_id, name, age, gender, weight, height, profile_picture";

/// Profile source and sink, one profile per user.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> anyhow::Result<Option<ProfileData>>;

    /// `Ok(false)` when the user already has a profile.
    async fn create_profile(&self, user_id: Uuid, profile: ProfileData) -> anyhow::Result<bool>;

    /// Applies one validated field. `Ok(None)` when there is no profile.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<ProfileData>>;

    /// Points the profile at a new picture object. `Ok(None)` when there is no profile.
    async fn set_picture(&self, user_id: Uuid, key: &str) -> anyhow::Result<Option<ProfileData>>;
}

pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_profile(&self, user_id: Uuid) -> anyhow::Result<Option<ProfileData>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("fetch profile")?;
        row.map(ProfileData::try_from).transpose()
    }

    async fn create_profile(&self, user_id: Uuid, profile: ProfileData) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (user_id, name, age, gender, weight, height)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(profile.gender.to_string())
        .bind(profile.weight)
        .bind(profile.height)
        .execute(&self.db)
        .await
        .context("insert profile")?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<ProfileData>> {
        // Column names come from the closed `ProfileField` set.
        let sql = format!(
            "UPDATE profiles SET {} = $2, updated_at = now() WHERE user_id = $1 RETURNING {PROFILE_COLUMNS}",
            update.field.as_str()
        );
        let query = sqlx::query_as::<_, ProfileRow>(&sql).bind(user_id);
        let query = match &update.value {
            FieldValue::Text(text) => query.bind(text.clone()),
            FieldValue::Number(n) => query.bind(*n),
            FieldValue::Gender(g) => query.bind(g.to_string()),
        };
        let row = query
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("update profile {}", update.field.as_str()))?;
        row.map(ProfileData::try_from).transpose()
    }

    async fn set_picture(&self, user_id: Uuid, key: &str) -> anyhow::Result<Option<ProfileData>> {
        let sql = format!(
            "UPDATE profiles SET profile_picture = $2, updated_at = now() WHERE user_id = $1 RETURNING {PROFILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(key)
            .fetch_optional(&self.db)
            .await
            .context("update profile picture")?;
        row.map(ProfileData::try_from).transpose()
    }
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, ProfileData>>,
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, user_id: Uuid) -> anyhow::Result<Option<ProfileData>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn create_profile(&self, user_id: Uuid, profile: ProfileData) -> anyhow::Result<bool> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&user_id) {
            return Ok(false);
        }
        profiles.insert(user_id, profile);
        Ok(true)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<ProfileData>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(&user_id).map(|profile| {
            update.apply_to(profile);
            profile.clone()
        }))
    }

    async fn set_picture(&self, user_id: Uuid, key: &str) -> anyhow::Result<Option<ProfileData>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(&user_id).map(|profile| {
            profile.profile_picture = Some(key.to_string());
            profile.clone()
        }))
    }
}
