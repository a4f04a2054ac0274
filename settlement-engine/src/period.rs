//! Date windows for settlement queries
//!
//! Both bounds are inclusive calendar dates. A missing bound leaves that side
//! open; a window whose start is after its end matches nothing.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// `[start, end]`
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// No date constraint
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Monday through Sunday of the week containing `date`
    pub fn week_containing(date: NaiveDate) -> Self {
        let weekday = date.weekday().num_days_from_monday() as i64;
        let start = date - Duration::days(weekday);
        Self::between(start, start + Duration::days(6))
    }

    /// Whole calendar month; `None` for an invalid month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self::between(start, next.pred_opt()?))
    }

    /// Whole calendar year
    pub fn year(year: i32) -> Option<Self> {
        Some(Self::between(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// Dashboard preset ranges, ending today
    ///
    /// `today` | `week` | `month` | `year` | `all` | `custom`. A `custom` range
    /// without any bound, or an unknown key, falls back to today.
    pub fn from_range_key(
        key: &str,
        today: NaiveDate,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
    ) -> Self {
        match key {
            "today" => Self::day(today),
            "week" => {
                let week = Self::week_containing(today);
                Self::new(week.start, Some(today))
            }
            "month" => Self::between(today.with_day(1).unwrap_or(today), today),
            "year" => Self::between(
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
            "all" => Self::unbounded(),
            "custom" if custom_start.is_some() || custom_end.is_some() => {
                Self::new(custom_start, custom_end)
            }
            _ => Self::day(today),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let period = Period::between(d(2024, 3, 1), d(2024, 3, 31));
        assert!(period.contains(d(2024, 3, 1)));
        assert!(period.contains(d(2024, 3, 31)));
        assert!(!period.contains(d(2024, 2, 29)));
        assert!(!period.contains(d(2024, 4, 1)));
    }

    #[test]
    fn test_open_bounds() {
        assert!(Period::unbounded().contains(d(1999, 1, 1)));
        let from = Period::new(Some(d(2024, 1, 1)), None);
        assert!(from.contains(d(2030, 1, 1)));
        assert!(!from.contains(d(2023, 12, 31)));
    }

    #[test]
    fn test_inverted_window_matches_nothing() {
        let period = Period::between(d(2024, 3, 31), d(2024, 3, 1));
        assert!(!period.contains(d(2024, 3, 15)));
    }

    #[test]
    fn test_month_boundaries() {
        let feb = Period::month(2024, 2).unwrap();
        assert_eq!(feb.end, Some(d(2024, 2, 29)));
        let dec = Period::month(2023, 12).unwrap();
        assert_eq!(dec.end, Some(d(2023, 12, 31)));
        assert!(Period::month(2024, 13).is_none());
    }

    #[test]
    fn test_week_containing() {
        // 2024-05-15 is a Wednesday
        let week = Period::week_containing(d(2024, 5, 15));
        assert_eq!(week, Period::between(d(2024, 5, 13), d(2024, 5, 19)));
    }

    #[test]
    fn test_range_keys() {
        let today = d(2024, 5, 15);
        assert_eq!(Period::from_range_key("today", today, None, None), Period::day(today));
        assert_eq!(
            Period::from_range_key("week", today, None, None),
            Period::between(d(2024, 5, 13), today)
        );
        assert_eq!(
            Period::from_range_key("month", today, None, None),
            Period::between(d(2024, 5, 1), today)
        );
        assert_eq!(
            Period::from_range_key("year", today, None, None),
            Period::between(d(2024, 1, 1), today)
        );
        assert!(Period::from_range_key("all", today, None, None).is_unbounded());
        assert_eq!(
            Period::from_range_key("custom", today, Some(d(2024, 1, 1)), None),
            Period::new(Some(d(2024, 1, 1)), None)
        );
        assert_eq!(Period::from_range_key("custom", today, None, None), Period::day(today));
        assert_eq!(Period::from_range_key("bogus", today, None, None), Period::day(today));
    }
}
