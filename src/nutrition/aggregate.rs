use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use super::{
    error::AggregationError,
    iso_date,
    meal::{MealRecord, MealType},
};

/// Which seven calendar dates make up "this week".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Today and the six preceding days, oldest first.
    #[default]
    Trailing7,
    /// Monday through Sunday of the ISO week containing today.
    IsoWeek,
}

impl FromStr for AnchorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trailing7" | "trailing_7" => Ok(AnchorPolicy::Trailing7),
            "iso_week" | "isoweek" => Ok(AnchorPolicy::IsoWeek),
            other => Err(format!("unknown week anchor policy: {other}")),
        }
    }
}

impl fmt::Display for AnchorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorPolicy::Trailing7 => f.write_str("trailing7"),
            AnchorPolicy::IsoWeek => f.write_str("iso_week"),
        }
    }
}

/// What to do with a record whose calorie value is missing, negative or not finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaloriePolicy {
    /// Count it as 0 kcal.
    #[default]
    Coerce,
    /// Fail the summary.
    Strict,
}

impl FromStr for CaloriePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coerce" => Ok(CaloriePolicy::Coerce),
            "strict" => Ok(CaloriePolicy::Strict),
            other => Err(format!("unknown calorie policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub per_category_totals: BTreeMap<MealType, f64>,
    pub total_calories: f64,
    pub records: Vec<MealRecord>,
}

impl DailySummary {
    pub fn category_total(&self, meal_type: MealType) -> f64 {
        self.per_category_totals
            .get(&meal_type)
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekWindow {
    pub anchor: AnchorPolicy,
    pub days: Vec<DailySummary>,
}

/// Builds the summary of one calendar day out of an unordered record set.
///
/// Every category is present in `per_category_totals`, zero when nothing was
/// logged, and `total_calories` is their sum. Records keep their input order.
pub fn summarize_day(
    records: &[MealRecord],
    date: Date,
    policy: CaloriePolicy,
) -> Result<DailySummary, AggregationError> {
    let mut per_category_totals: BTreeMap<MealType, f64> =
        MealType::ALL.iter().map(|t| (*t, 0.0)).collect();
    let mut day_records = Vec::new();

    for record in records.iter().filter(|r| r.date == date) {
        let calories = match (record.valid_calories(), policy) {
            (Some(c), _) => c,
            (None, CaloriePolicy::Coerce) => 0.0,
            (None, CaloriePolicy::Strict) => {
                return Err(AggregationError::InvalidCalories { id: record.id })
            }
        };
        *per_category_totals.entry(record.meal_type).or_insert(0.0) += calories;
        day_records.push(record.clone());
    }

    let total_calories = per_category_totals.values().sum();
    Ok(DailySummary {
        date,
        per_category_totals,
        total_calories,
        records: day_records,
    })
}

/// The seven dates of the window selected by `policy`, oldest first.
///
/// Fails when part of the window falls outside the representable calendar.
pub fn week_dates(policy: AnchorPolicy, today: Date) -> Result<Vec<Date>, AggregationError> {
    let out_of_range = AggregationError::WindowOutOfRange { today };
    let back = match policy {
        AnchorPolicy::Trailing7 => 6,
        AnchorPolicy::IsoWeek => i64::from(today.weekday().number_days_from_monday()),
    };
    let start = today
        .checked_sub(Duration::days(back))
        .ok_or_else(|| out_of_range.clone())?;
    (0..7)
        .map(|offset| {
            start
                .checked_add(Duration::days(offset))
                .ok_or_else(|| out_of_range.clone())
        })
        .collect()
}

/// Summarizes each day of the window independently; no running totals.
pub fn summarize_week(
    records: &[MealRecord],
    anchor: AnchorPolicy,
    today: Date,
    policy: CaloriePolicy,
) -> Result<WeekWindow, AggregationError> {
    let days = week_dates(anchor, today)?
        .into_iter()
        .map(|date| summarize_day(records, date, policy))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WeekWindow { anchor, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Weekday};
    use uuid::Uuid;

    fn record(meal_type: MealType, calories: Option<f64>, date: Date) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: format!("{meal_type} item"),
            calories,
            meal_type,
            date,
        }
    }

    fn sample() -> Vec<MealRecord> {
        let today = date!(2025 - 04 - 13);
        vec![
            record(MealType::Breakfast, Some(350.0), today),
            record(MealType::Lunch, Some(600.0), today),
            record(MealType::Lunch, Some(150.0), today),
            record(MealType::Dinner, Some(800.0), today),
            record(MealType::Snack, Some(90.0), today),
            record(MealType::Dinner, Some(700.0), date!(2025 - 04 - 12)),
        ]
    }

    #[test]
    fn day_totals_per_category() {
        let summary =
            summarize_day(&sample(), date!(2025 - 04 - 13), CaloriePolicy::Coerce).unwrap();
        assert_eq!(summary.category_total(MealType::Breakfast), 350.0);
        assert_eq!(summary.category_total(MealType::Lunch), 750.0);
        assert_eq!(summary.category_total(MealType::Dinner), 800.0);
        assert_eq!(summary.category_total(MealType::Snack), 90.0);
        assert_eq!(summary.total_calories, 1990.0);
        assert_eq!(summary.records.len(), 5);
        assert!(summary.records.iter().all(|r| r.date == summary.date));
    }

    #[test]
    fn total_equals_sum_of_categories() {
        let records = sample();
        for date in [date!(2025 - 04 - 11), date!(2025 - 04 - 12), date!(2025 - 04 - 13)] {
            let s = summarize_day(&records, date, CaloriePolicy::Coerce).unwrap();
            let sum: f64 = s.per_category_totals.values().sum();
            assert_eq!(s.total_calories, sum);
        }
    }

    #[test]
    fn empty_day_is_all_zero() {
        let s = summarize_day(&[], date!(2025 - 04 - 13), CaloriePolicy::Strict).unwrap();
        assert_eq!(s.total_calories, 0.0);
        assert_eq!(s.per_category_totals.len(), 4);
        assert!(s.per_category_totals.values().all(|v| *v == 0.0));
        assert!(s.records.is_empty());
    }

    #[test]
    fn summarizing_twice_gives_identical_output() {
        let records = sample();
        let a = summarize_day(&records, date!(2025 - 04 - 13), CaloriePolicy::Coerce).unwrap();
        let b = summarize_day(&records, date!(2025 - 04 - 13), CaloriePolicy::Coerce).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn input_order_does_not_change_totals() {
        let mut records = sample();
        let forward =
            summarize_day(&records, date!(2025 - 04 - 13), CaloriePolicy::Coerce).unwrap();
        records.reverse();
        let backward =
            summarize_day(&records, date!(2025 - 04 - 13), CaloriePolicy::Coerce).unwrap();
        assert_eq!(forward.per_category_totals, backward.per_category_totals);
        assert_eq!(forward.total_calories, backward.total_calories);
    }

    #[test]
    fn coerce_counts_invalid_calories_as_zero() {
        let today = date!(2025 - 04 - 13);
        let records = vec![
            record(MealType::Breakfast, None, today),
            record(MealType::Lunch, Some(-40.0), today),
            record(MealType::Dinner, Some(f64::NAN), today),
            record(MealType::Dinner, Some(500.0), today),
        ];
        let s = summarize_day(&records, today, CaloriePolicy::Coerce).unwrap();
        assert_eq!(s.total_calories, 500.0);
        assert_eq!(s.records.len(), 4);
    }

    #[test]
    fn strict_rejects_invalid_calories() {
        let today = date!(2025 - 04 - 13);
        let bad = record(MealType::Lunch, None, today);
        let bad_id = bad.id;
        let records = vec![record(MealType::Breakfast, Some(200.0), today), bad];
        assert_eq!(
            summarize_day(&records, today, CaloriePolicy::Strict),
            Err(AggregationError::InvalidCalories { id: bad_id })
        );
        // Other days are unaffected by the bad record.
        assert!(summarize_day(&records, date!(2025 - 04 - 12), CaloriePolicy::Strict).is_ok());
    }

    #[test]
    fn trailing_window_ends_today() {
        let today = date!(2025 - 04 - 13);
        let dates = week_dates(AnchorPolicy::Trailing7, today).unwrap();
        assert_eq!(dates.first(), Some(&date!(2025 - 04 - 07)));
        assert_eq!(dates.last(), Some(&today));
    }

    #[test]
    fn iso_window_runs_monday_to_sunday() {
        // 2025-04-13 is a Sunday, 2025-04-09 a Wednesday.
        for today in [date!(2025 - 04 - 13), date!(2025 - 04 - 09), date!(2025 - 04 - 07)] {
            let dates = week_dates(AnchorPolicy::IsoWeek, today).unwrap();
            assert_eq!(dates[0], date!(2025 - 04 - 07));
            assert_eq!(dates[0].weekday(), Weekday::Monday);
            assert_eq!(dates[6].weekday(), Weekday::Sunday);
            assert!(dates.contains(&today));
        }
    }

    #[test]
    fn windows_are_seven_contiguous_days() {
        let mut today = date!(2024 - 12 - 25);
        for _ in 0..21 {
            for policy in [AnchorPolicy::Trailing7, AnchorPolicy::IsoWeek] {
                let dates = week_dates(policy, today).unwrap();
                assert_eq!(dates.len(), 7);
                for pair in dates.windows(2) {
                    assert_eq!(pair[1] - pair[0], Duration::days(1));
                }
            }
            today = today.next_day().unwrap();
        }
    }

    #[test]
    fn week_days_are_independent() {
        let week = summarize_week(
            &sample(),
            AnchorPolicy::Trailing7,
            date!(2025 - 04 - 13),
            CaloriePolicy::Coerce,
        )
        .unwrap();
        assert_eq!(week.days.len(), 7);
        let totals: Vec<f64> = week.days.iter().map(|d| d.total_calories).collect();
        assert_eq!(totals, vec![0.0, 0.0, 0.0, 0.0, 0.0, 700.0, 1990.0]);
    }

    #[test]
    fn iso_week_excludes_days_after_sunday() {
        let records = vec![record(MealType::Lunch, Some(400.0), date!(2025 - 04 - 14))];
        let week = summarize_week(
            &records,
            AnchorPolicy::IsoWeek,
            date!(2025 - 04 - 13),
            CaloriePolicy::Coerce,
        )
        .unwrap();
        assert!(week.days.iter().all(|d| d.total_calories == 0.0));
    }

    #[test]
    fn windows_at_calendar_edges_are_errors() {
        let last = Date::MAX;
        assert_eq!(
            week_dates(AnchorPolicy::IsoWeek, last),
            Err(AggregationError::WindowOutOfRange { today: last })
        );
        let first = Date::MIN;
        assert_eq!(
            week_dates(AnchorPolicy::Trailing7, first),
            Err(AggregationError::WindowOutOfRange { today: first })
        );
        assert!(summarize_week(&[], AnchorPolicy::IsoWeek, last, CaloriePolicy::Coerce).is_err());

        // The window still fits right next to either edge.
        let dates = week_dates(AnchorPolicy::Trailing7, last).unwrap();
        assert_eq!(dates.last(), Some(&last));
        let sunday = date!(2025 - 04 - 13);
        assert_eq!(week_dates(AnchorPolicy::IsoWeek, sunday).unwrap()[6], sunday);
    }

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!("trailing7".parse::<AnchorPolicy>(), Ok(AnchorPolicy::Trailing7));
        assert_eq!("ISO_WEEK".parse::<AnchorPolicy>(), Ok(AnchorPolicy::IsoWeek));
        assert!("monthly".parse::<AnchorPolicy>().is_err());
        assert_eq!("strict".parse::<CaloriePolicy>(), Ok(CaloriePolicy::Strict));
        assert!("lenient".parse::<CaloriePolicy>().is_err());
    }
}
