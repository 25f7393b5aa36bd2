//! Week selection and the term calendar

use chrono::{Duration, NaiveDate};

use crate::error::ScheduleError;
use crate::types::{is_term_week, Day, TERM_WEEKS};

/// Currently selected week of the term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekNavigator {
    current: u8,
}

impl Default for WeekNavigator {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl WeekNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    /// Jump to `week`; anything outside 1-18 is rejected and the selection
    /// is left alone
    pub fn select(&mut self, week: u8) -> Result<u8, ScheduleError> {
        if !is_term_week(week) {
            return Err(ScheduleError::WeekOutOfRange(week));
        }
        self.current = week;
        Ok(week)
    }

    /// Step forward, stopping at the last week
    pub fn next(&mut self) -> u8 {
        self.current = (self.current + 1).min(TERM_WEEKS);
        self.current
    }

    /// Step back, stopping at week 1
    pub fn previous(&mut self) -> u8 {
        self.current = self.current.saturating_sub(1).max(1);
        self.current
    }
}

/// Maps (day, week) to calendar dates from the first Monday of term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermCalendar {
    start: NaiveDate,
}

impl TermCalendar {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Date on which `day` of `week` falls
    pub fn date_for(&self, day: Day, week: u8) -> NaiveDate {
        let offset = (i64::from(week.max(1)) - 1) * 7 + i64::from(day.offset());
        self.start + Duration::days(offset)
    }

    /// Short column label, e.g. "Mar 2"
    pub fn label(&self, day: Day, week: u8) -> String {
        self.date_for(day, week).format("%b %-d").to_string()
    }
}

impl Default for TermCalendar {
    fn default() -> Self {
        Self::new(crate::config::default_term_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_bounds() {
        let mut nav = WeekNavigator::new();
        assert_eq!(nav.current(), 1);
        assert_eq!(nav.select(18).unwrap(), 18);
        assert!(matches!(nav.select(0), Err(ScheduleError::WeekOutOfRange(0))));
        assert!(nav.select(19).is_err());
        assert_eq!(nav.current(), 18);
    }

    #[test]
    fn test_step_clamps() {
        let mut nav = WeekNavigator::new();
        assert_eq!(nav.previous(), 1);
        nav.select(17).unwrap();
        assert_eq!(nav.next(), 18);
        assert_eq!(nav.next(), 18);
    }

    #[test]
    fn test_calendar_dates() {
        let calendar = TermCalendar::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(calendar.label(Day::Monday, 1), "Mar 2");
        assert_eq!(calendar.label(Day::Friday, 1), "Mar 6");
        assert_eq!(calendar.label(Day::Wednesday, 5), "Apr 1");
        assert_eq!(
            calendar.date_for(Day::Friday, 18),
            NaiveDate::from_ymd_opt(2026, 7, 3).unwrap()
        );
    }
}
