use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::MealRow;
use crate::nutrition::{MealPatch, MealRecord, NewMeal};

/// Record source and sink for meal entries. Every call is scoped to one user;
/// a record owned by somebody else behaves as if it did not exist.
#[async_trait]
pub trait MealStore: Send + Sync {
    async fn fetch_meal_records(&self, user_id: Uuid) -> anyhow::Result<Vec<MealRecord>>;

    async fn create_meal_record(&self, user_id: Uuid, meal: NewMeal)
        -> anyhow::Result<MealRecord>;

    /// `Ok(None)` when the record does not exist for this user.
    async fn update_meal_record(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: MealPatch,
    ) -> anyhow::Result<Option<MealRecord>>;

    /// `Ok(false)` when the record does not exist for this user.
    async fn delete_meal_record(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn fetch_meal_records(&self, user_id: Uuid) -> anyhow::Result<Vec<MealRecord>> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, name, calories, meal_type, date
            FROM meals
            WHERE user_id = $1
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("fetch meals")?;
        rows.into_iter().map(MealRecord::try_from).collect()
    }

    async fn create_meal_record(
        &self,
        user_id: Uuid,
        meal: NewMeal,
    ) -> anyhow::Result<MealRecord> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            INSERT INTO meals (id, user_id, name, calories, meal_type, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, calories, meal_type, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&meal.name)
        .bind(meal.calories)
        .bind(meal.meal_type.as_str())
        .bind(meal.date)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        row.try_into()
    }

    async fn update_meal_record(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: MealPatch,
    ) -> anyhow::Result<Option<MealRecord>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            UPDATE meals
               SET name = COALESCE($3, name),
                   calories = COALESCE($4, calories)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, calories, meal_type, date
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.name)
        .bind(patch.calories)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        row.map(MealRecord::try_from).transpose()
    }

    async fn delete_meal_record(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(result.rows_affected() > 0)
    }
}

/// Process-local store; records are kept in insertion order per user.
#[derive(Default)]
pub struct InMemoryMealStore {
    records: RwLock<HashMap<Uuid, Vec<MealRecord>>>,
}

impl InMemoryMealStore {
    /// Inserts a record as is, bypassing validation. Lets tests seed legacy data.
    pub async fn insert_raw(&self, record: MealRecord) {
        self.records
            .write()
            .await
            .entry(record.user_id)
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl MealStore for InMemoryMealStore {
    async fn fetch_meal_records(&self, user_id: Uuid) -> anyhow::Result<Vec<MealRecord>> {
        Ok(self
            .records
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_meal_record(
        &self,
        user_id: Uuid,
        meal: NewMeal,
    ) -> anyhow::Result<MealRecord> {
        let record = MealRecord {
            id: Uuid::new_v4(),
            user_id,
            name: meal.name,
            calories: Some(meal.calories),
            meal_type: meal.meal_type,
            date: meal.date,
        };
        self.insert_raw(record.clone()).await;
        Ok(record)
    }

    async fn update_meal_record(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: MealPatch,
    ) -> anyhow::Result<Option<MealRecord>> {
        let mut records = self.records.write().await;
        let Some(record) = records
            .get_mut(&user_id)
            .and_then(|list| list.iter_mut().find(|r| r.id == id))
        else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(calories) = patch.calories {
            record.calories = Some(calories);
        }
        Ok(Some(record.clone()))
    }

    async fn delete_meal_record(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut records = self.records.write().await;
        let Some(list) = records.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|r| r.id != id);
        Ok(list.len() != before)
    }
}
