use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

use crate::nutrition::{MealRecord, MealType};

/// Row of the `meals` table.
#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub calories: Option<f64>,
    pub meal_type: String,
    pub date: Date,
}

impl TryFrom<MealRow> for MealRecord {
    type Error = anyhow::Error;

    fn try_from(r: MealRow) -> Result<Self, Self::Error> {
        let meal_type: MealType = r
            .meal_type
            .parse()
            .map_err(|e| anyhow::anyhow!("meal {}: {}", r.id, e))?;
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            calories: r.calories,
            meal_type,
            date: r.date,
        })
    }
}
