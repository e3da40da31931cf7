/// Calendar conventions shared by the scheduling and analytics code.
///
/// All day-level logic runs in a fixed UTC reference timezone: two timestamps
/// on the same UTC calendar day normalize equal. Weekdays use the habit
/// system's Monday=0..Sunday=6 convention.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Strip the time-of-day from a timestamp, yielding its UTC calendar day
pub fn normalize_to_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Day of week in the Monday=0 .. Sunday=6 convention
pub fn day_of_week_mon_first(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Number of days in a (year, month), or None for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Short month label for chart axes, e.g. "Jan 2024"
pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first.format("%b %Y").to_string(),
        None => format!("{:02}/{}", month, year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_strips_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 15, 6, 30, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(normalize_to_day(morning), normalize_to_day(night));
        assert_eq!(
            normalize_to_day(morning),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_day_of_week_mon_first() {
        // 2024-06-03 is a Monday, 2024-06-09 a Sunday.
        assert_eq!(
            day_of_week_mon_first(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()),
            0
        );
        assert_eq!(
            day_of_week_mon_first(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()),
            2
        );
        assert_eq!(
            day_of_week_mon_first(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()),
            6
        );
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29)); // leap year
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2024, 1), "Jan 2024");
        assert_eq!(month_label(2023, 12), "Dec 2023");
    }
}
