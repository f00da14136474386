use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::SqlitePool;

/// Number of consecutive days, ending `today`, on which at least one meal was
/// logged. A day without meals today means a streak of 0.
pub fn consecutive_days(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

/// The meal streak for `user_id`, counted in UTC calendar days.
pub async fn meal_streak(db: &SqlitePool, user_id: i64, today: NaiveDate) -> Result<u32, sqlx::Error> {
    let logged: Vec<DateTime<Utc>> = sqlx::query_scalar("SELECT created_at FROM meals WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(db)
        .await?;
    Ok(consecutive_days(logged.iter().map(|t| t.date_naive()), today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_no_meals_is_zero() {
        assert_eq!(consecutive_days([], day("2026-05-10")), 0);
    }

    #[test]
    fn test_counts_back_from_today() {
        let dates = [
            day("2026-05-10"),
            day("2026-05-10"),
            day("2026-05-09"),
            day("2026-05-08"),
            day("2026-05-06"),
        ];
        assert_eq!(consecutive_days(dates, day("2026-05-10")), 3);
    }

    #[test]
    fn test_missing_today_breaks_streak() {
        let dates = [day("2026-05-09"), day("2026-05-08")];
        assert_eq!(consecutive_days(dates, day("2026-05-10")), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let dates = [day("2026-03-01"), day("2026-02-28"), day("2026-02-27")];
        assert_eq!(consecutive_days(dates, day("2026-03-01")), 3);
    }
}
