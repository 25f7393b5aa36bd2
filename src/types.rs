//! Shared types used across modules
//!
//! The schedule vocabulary: days, periods, weeks and the course record
//! itself. Everything else in the crate is built on these.

use serde::{Deserialize, Serialize};

/// Number of teaching weeks in a term
pub const TERM_WEEKS: u8 = 18;

/// Hours a single block counts for in the weekly load estimate
pub const BLOCK_HOURS: f64 = 1.5;

/// Weekdays shown on the grid, in column order
pub const DAYS: [Day; 5] = [
    Day::Monday,
    Day::Tuesday,
    Day::Wednesday,
    Day::Thursday,
    Day::Friday,
];

/// Periods shown on the grid, in row order
pub const TIME_SLOTS: [TimeSlot; 4] = [
    TimeSlot::First,
    TimeSlot::Second,
    TimeSlot::Third,
    TimeSlot::Fourth,
];

/// A teaching day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// Offset from Monday, used for calendar dates
    pub fn offset(&self) -> u32 {
        match self {
            Day::Monday => 0,
            Day::Tuesday => 1,
            Day::Wednesday => 2,
            Day::Thursday => 3,
            Day::Friday => 4,
        }
    }

    /// Three-letter column label
    pub fn short(&self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
        }
    }

    /// Parse a day name, case-insensitively; accepts three-letter forms
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(Day::Monday),
            "tuesday" | "tue" | "tues" => Some(Day::Tuesday),
            "wednesday" | "wed" => Some(Day::Wednesday),
            "thursday" | "thu" | "thurs" => Some(Day::Thursday),
            "friday" | "fri" => Some(Day::Friday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the four daily periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "1st Period")]
    First,
    #[serde(rename = "2nd Period")]
    Second,
    #[serde(rename = "3rd Period")]
    Third,
    #[serde(rename = "4th Period")]
    Fourth,
}

impl TimeSlot {
    /// Wall-clock range of the period
    pub fn time_range(&self) -> &'static str {
        match self {
            TimeSlot::First => "08:30 - 10:05",
            TimeSlot::Second => "10:25 - 12:00",
            TimeSlot::Third => "14:00 - 15:35",
            TimeSlot::Fourth => "15:55 - 17:30",
        }
    }

    /// Start and end hour, as shown in the row header
    pub fn hours(&self) -> (&'static str, &'static str) {
        match self {
            TimeSlot::First => ("08", "10"),
            TimeSlot::Second => ("10", "12"),
            TimeSlot::Third => ("14", "15"),
            TimeSlot::Fourth => ("15", "17"),
        }
    }

    /// Parse "1st Period", "1st", "1" and similar
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let s = s.strip_suffix("period").unwrap_or(&s).trim();
        match s {
            "1" | "1st" | "first" => Some(TimeSlot::First),
            "2" | "2nd" | "second" => Some(TimeSlot::Second),
            "3" | "3rd" | "third" => Some(TimeSlot::Third),
            "4" | "4th" | "fourth" => Some(TimeSlot::Fourth),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::First => "1st Period",
            TimeSlot::Second => "2nd Period",
            TimeSlot::Third => "3rd Period",
            TimeSlot::Fourth => "4th Period",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scheduled class block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub instructor: String,
    pub room: String,
    pub day: Day,
    pub time_slot: TimeSlot,
    /// Display gradient, e.g. "from-purple-400 to-blue-500"
    pub color: String,
    /// Weeks of the term (1-18) in which the block meets
    pub weeks: Vec<u8>,
}

impl Course {
    /// Whether the block meets in the given week
    pub fn is_active_in(&self, week: u8) -> bool {
        self.weeks.contains(&week)
    }

    /// Whether the block sits in the given grid cell for the given week
    pub fn occupies(&self, day: Day, slot: TimeSlot, week: u8) -> bool {
        self.day == day && self.time_slot == slot && self.is_active_in(week)
    }
}

/// Every week of the term, 1..=18
pub fn all_weeks() -> Vec<u8> {
    (1..=TERM_WEEKS).collect()
}

/// Whether `week` is a valid term week
pub fn is_term_week(week: u8) -> bool {
    (1..=TERM_WEEKS).contains(&week)
}

/// Parse a week list such as "1-9,12,14-18"
pub fn parse_weeks(list: &str) -> Option<Vec<u8>> {
    let mut weeks = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u8 = start.trim().parse().ok()?;
                let end: u8 = end.trim().parse().ok()?;
                if start > end || !is_term_week(start) || !is_term_week(end) {
                    return None;
                }
                weeks.extend(start..=end);
            }
            None => {
                let week: u8 = part.parse().ok()?;
                if !is_term_week(week) {
                    return None;
                }
                weeks.push(week);
            }
        }
    }
    weeks.sort_unstable();
    weeks.dedup();
    if weeks.is_empty() {
        None
    } else {
        Some(weeks)
    }
}

/// Compact form of a week list, inverse of [`parse_weeks`]
pub fn format_weeks(weeks: &[u8]) -> String {
    let mut sorted = weeks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut iter = sorted.into_iter().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }
    parts.join(",")
}
