use sqlx::FromRow;
use uuid::Uuid;

use crate::nutrition::ProfileData;

/// Row of the `profiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub profile_picture: Option<String>,
}

impl TryFrom<ProfileRow> for ProfileData {
    type Error = anyhow::Error;

    fn try_from(r: ProfileRow) -> Result<Self, Self::Error> {
        let gender = r
            .gender
            .parse()
            .map_err(|e| anyhow::anyhow!("profile {}: {}", r.user_id, e))?;
        Ok(Self {
            name: r.name,
            age: r.age,
            gender,
            weight: r.weight,
            height: r.height,
            profile_picture: r.profile_picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::Gender;

    #[test]
    fn row_converts_to_profile() {
        let row = ProfileRow {
            user_id: Uuid::new_v4(),
            name: "Nok".into(),
            age: 29.0,
            gender: "female".into(),
            weight: 55.5,
            height: 162.0,
            profile_picture: None,
        };
        let profile = ProfileData::try_from(row).unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.weight, 55.5);
    }

    #[test]
    fn corrupt_gender_is_an_error() {
        let row = ProfileRow {
            user_id: Uuid::new_v4(),
            name: "Nok".into(),
            age: 29.0,
            gender: "robot".into(),
            weight: 55.5,
            height: 162.0,
            profile_picture: None,
        };
        assert!(ProfileData::try_from(row).is_err());
    }
}
