//! Add and edit forms
//!
//! A [`CourseDraft`] is the add form: it carries defaults for everything
//! but name and instructor, and only becomes a [`Course`] once those two are
//! filled in. A [`CoursePatch`] is the edit form.

use chrono::Utc;

use crate::error::ScheduleError;
use crate::schedule::registry::CourseRegistry;
use crate::types::{all_weeks, is_term_week, Course, Day, TimeSlot};

/// Gradient given to courses added without an explicit colour
pub const DEFAULT_COLOR: &str = "from-blue-400 to-indigo-600";

/// Pending course from the add form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub name: String,
    pub instructor: String,
    pub room: String,
    pub day: Day,
    pub time_slot: TimeSlot,
    pub color: String,
    pub weeks: Vec<u8>,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            instructor: String::new(),
            room: String::new(),
            day: Day::Monday,
            time_slot: TimeSlot::First,
            color: DEFAULT_COLOR.to_string(),
            weeks: all_weeks(),
        }
    }
}

impl CourseDraft {
    pub fn new(name: impl Into<String>, instructor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructor: instructor.into(),
            ..Default::default()
        }
    }

    /// Check required fields and the week list. Any selection of term weeks
    /// is accepted, including none.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::MissingField("name"));
        }
        if self.instructor.trim().is_empty() {
            return Err(ScheduleError::MissingField("instructor"));
        }
        if !self.weeks.iter().all(|&w| is_term_week(w)) {
            return Err(ScheduleError::InvalidWeeks);
        }
        Ok(())
    }

    /// Validate and stamp with `id`
    pub fn into_course(self, id: String) -> Result<Course, ScheduleError> {
        self.validate()?;
        Ok(Course {
            id,
            name: self.name,
            instructor: self.instructor,
            room: self.room,
            day: self.day,
            time_slot: self.time_slot,
            color: self.color,
            weeks: self.weeks,
        })
    }
}

/// Field-wise edit of an existing course; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub instructor: Option<String>,
    pub room: Option<String>,
    pub day: Option<Day>,
    pub time_slot: Option<TimeSlot>,
    pub color: Option<String>,
    pub weeks: Option<Vec<u8>>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        *self == CoursePatch::default()
    }

    /// Apply onto a copy of `course`
    pub fn apply(self, course: &Course) -> Result<Course, ScheduleError> {
        let mut updated = course.clone();
        if let Some(name) = self.name {
            updated.name = name;
        }
        if let Some(instructor) = self.instructor {
            updated.instructor = instructor;
        }
        if let Some(room) = self.room {
            updated.room = room;
        }
        if let Some(day) = self.day {
            updated.day = day;
        }
        if let Some(slot) = self.time_slot {
            updated.time_slot = slot;
        }
        if let Some(color) = self.color {
            updated.color = color;
        }
        if let Some(weeks) = self.weeks {
            if !weeks.iter().all(|&w| is_term_week(w)) {
                return Err(ScheduleError::InvalidWeeks);
            }
            updated.weeks = weeks;
        }
        Ok(updated)
    }
}

/// Timestamp-derived id (milliseconds since the epoch), bumped past any id
/// already in `registry`
pub fn generate_id(registry: &CourseRegistry) -> String {
    let mut stamp = Utc::now().timestamp_millis();
    while registry.contains(&stamp.to_string()) {
        stamp += 1;
    }
    stamp.to_string()
}
