//! Course registry - the authoritative in-memory course list
//!
//! Owns the courses and the mutation hooks. Every mutating call builds the
//! new list, fires the hooks once with it, and only commits it when every
//! hook succeeded. Calls that turn out to be no-ops (unknown id on
//! update/remove) still fire.

use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::hooks::{MutationEvent, MutationHooks, MutationKind};
use crate::types::{Course, Day, TimeSlot, BLOCK_HOURS, DAYS, TERM_WEEKS, TIME_SLOTS};

/// A grid cell holding more than one active course in a week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotConflict {
    pub day: Day,
    pub slot: TimeSlot,
    pub week: u8,
    /// Ids in registry order; the first one is what the grid shows
    pub course_ids: Vec<String>,
}

/// Derived per-week figures shown under the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekStats {
    pub week: u8,
    /// Courses whose weeks include this one
    pub blocks: usize,
    /// `blocks` times the per-block duration
    pub load_hours: f64,
}

impl WeekStats {
    /// Load rounded to whole hours (half up), as displayed
    pub fn load_display(&self) -> String {
        format!("{}h", self.load_hours.round() as u64)
    }
}

/// In-memory course collection with mutation hooks
#[derive(Debug, Default)]
pub struct CourseRegistry {
    courses: Vec<Course>,
    hooks: MutationHooks,
}

impl CourseRegistry {
    /// Create a registry holding `courses`, with no hooks
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            hooks: MutationHooks::new(),
        }
    }

    pub fn hooks_mut(&mut self) -> &mut MutationHooks {
        &mut self.hooks
    }

    /// Append a course. The caller supplies a fresh id; duplicates are not
    /// checked.
    pub fn add(&mut self, course: Course) -> Result<(), ScheduleError> {
        info!("Adding course {} ({})", course.id, course.name);
        self.warn_double_booked(&course);

        let mut proposed = self.courses.clone();
        proposed.push(course);
        self.commit(MutationKind::Added, proposed)
    }

    /// Replace the course with `id`. The stored id is kept even if
    /// `course.id` differs. Returns whether a course matched; an unknown id
    /// is not an error.
    pub fn update(&mut self, id: &str, mut course: Course) -> Result<bool, ScheduleError> {
        course.id = id.to_string();

        let mut proposed = self.courses.clone();
        let matched = match proposed.iter().position(|c| c.id == id) {
            Some(index) => {
                info!("Updating course {} ({})", id, course.name);
                self.warn_double_booked(&course);
                proposed[index] = course;
                true
            }
            None => {
                debug!("Update of unknown course {} ignored", id);
                false
            }
        };

        self.commit(MutationKind::Updated, proposed)?;
        Ok(matched)
    }

    /// Remove the course with `id`, returning it. An unknown id is not an
    /// error.
    pub fn remove(&mut self, id: &str) -> Result<Option<Course>, ScheduleError> {
        let mut proposed = self.courses.clone();
        let removed = match proposed.iter().position(|c| c.id == id) {
            Some(index) => {
                let course = proposed.remove(index);
                info!("Removing course {} ({})", id, course.name);
                Some(course)
            }
            None => {
                debug!("Removal of unknown course {} ignored", id);
                None
            }
        };

        self.commit(MutationKind::Removed, proposed)?;
        Ok(removed)
    }

    /// Discard every course and install `courses` in their place
    pub fn replace_all(&mut self, courses: Vec<Course>) -> Result<(), ScheduleError> {
        info!("Replacing schedule: {} -> {} courses", self.courses.len(), courses.len());

        let conflicts = (1..=TERM_WEEKS)
            .map(|w| conflicts_in(&courses, w).len())
            .sum::<usize>();
        if conflicts > 0 {
            warn!("New schedule has {} double-booked slot-weeks; first entry wins", conflicts);
        }

        self.commit(MutationKind::Replaced, courses)
    }

    /// The course shown in a grid cell for `week`.
    ///
    /// Scans in registry order and returns the first course on `day` in
    /// `slot` whose weeks include `week`. When a cell is double-booked the
    /// earliest-inserted course wins; this is the tie-break rule, not an
    /// error.
    pub fn find_for_slot(&self, day: Day, slot: TimeSlot, week: u8) -> Option<&Course> {
        self.courses.iter().find(|c| c.occupies(day, slot, week))
    }

    /// Courses meeting in `week`, in registry order
    pub fn active_in(&self, week: u8) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(move |c| c.is_active_in(week))
    }

    /// Every double-booked cell in `week`, in grid order (period, then day)
    pub fn conflicts(&self, week: u8) -> Vec<SlotConflict> {
        conflicts_in(&self.courses, week)
    }

    /// Block count and estimated load for `week`
    pub fn week_stats(&self, week: u8) -> WeekStats {
        let blocks = self.active_in(week).count();
        WeekStats {
            week,
            blocks,
            load_hours: blocks as f64 * BLOCK_HOURS,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Fire the hooks for `proposed` and install it if none failed
    fn commit(&mut self, kind: MutationKind, proposed: Vec<Course>) -> Result<(), ScheduleError> {
        if let Err(e) = self.hooks.fire(&MutationEvent::new(kind, &proposed)) {
            warn!("Discarding {} change: a mutation hook failed", kind);
            return Err(ScheduleError::Hook(e));
        }
        self.courses = proposed;
        Ok(())
    }

    fn warn_double_booked(&self, course: &Course) {
        let clashes: Vec<u8> = course
            .weeks
            .iter()
            .copied()
            .filter(|&w| {
                self.courses
                    .iter()
                    .any(|c| c.id != course.id && c.occupies(course.day, course.time_slot, w))
            })
            .collect();

        if !clashes.is_empty() {
            warn!(
                "{} on {} {} overlaps another course in weeks {}",
                course.name,
                course.day,
                course.time_slot,
                crate::types::format_weeks(&clashes)
            );
        }
    }
}

fn conflicts_in(courses: &[Course], week: u8) -> Vec<SlotConflict> {
    let mut conflicts = Vec::new();
    for slot in TIME_SLOTS {
        for day in DAYS {
            let course_ids: Vec<String> = courses
                .iter()
                .filter(|c| c.occupies(day, slot, week))
                .map(|c| c.id.clone())
                .collect();
            if course_ids.len() > 1 {
                conflicts.push(SlotConflict {
                    day,
                    slot,
                    week,
                    course_ids,
                });
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookFn;
    use crate::schedule::seed::seed_courses;
    use crate::types::all_weeks;
    use std::sync::{Arc, Mutex};

    fn course(id: &str, day: Day, slot: TimeSlot, weeks: Vec<u8>) -> Course {
        Course {
            id: id.to_string(),
            name: format!("Course {}", id),
            instructor: "Dr. Test".to_string(),
            room: "101".to_string(),
            day,
            time_slot: slot,
            color: "from-blue-400 to-indigo-600".to_string(),
            weeks,
        }
    }

    fn counting_registry(courses: Vec<Course>) -> (CourseRegistry, Arc<Mutex<Vec<MutationKind>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let handler: HookFn = Arc::new(move |event: &MutationEvent<'_>| {
            s.lock().unwrap().push(event.kind);
            Ok(())
        });
        let mut registry = CourseRegistry::new(courses);
        registry.hooks_mut().register("count", handler);
        (registry, seen)
    }

    #[test]
    fn test_seed_slot_lookup() {
        let registry = CourseRegistry::new(seed_courses());

        let found = registry.find_for_slot(Day::Monday, TimeSlot::First, 5).unwrap();
        assert_eq!(found.name, "Advanced UX Design");

        assert!(registry.find_for_slot(Day::Monday, TimeSlot::First, 0).is_none());
        assert!(registry.find_for_slot(Day::Monday, TimeSlot::Second, 5).is_none());
    }

    #[test]
    fn test_week_gating() {
        let registry = CourseRegistry::new(seed_courses());
        // Neural Networks runs weeks 1-9 only
        assert!(registry.find_for_slot(Day::Tuesday, TimeSlot::Third, 9).is_some());
        assert!(registry.find_for_slot(Day::Tuesday, TimeSlot::Third, 10).is_none());
        // Cyber Security runs weeks 10-18 only
        assert!(registry.find_for_slot(Day::Thursday, TimeSlot::Fourth, 9).is_none());
        assert!(registry.find_for_slot(Day::Thursday, TimeSlot::Fourth, 10).is_some());
    }

    #[test]
    fn test_first_inserted_wins_double_booking() {
        let mut registry = CourseRegistry::new(Vec::new());
        registry.add(course("a", Day::Friday, TimeSlot::Second, vec![1, 2, 3])).unwrap();
        registry.add(course("b", Day::Friday, TimeSlot::Second, vec![2, 3, 4])).unwrap();

        assert_eq!(registry.find_for_slot(Day::Friday, TimeSlot::Second, 2).unwrap().id, "a");
        assert_eq!(registry.find_for_slot(Day::Friday, TimeSlot::Second, 4).unwrap().id, "b");

        let conflicts = registry.conflicts(3);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].course_ids, vec!["a".to_string(), "b".to_string()]);
        assert!(registry.conflicts(1).is_empty());
    }

    #[test]
    fn test_replace_all_empty_clears_every_slot() {
        let (mut registry, seen) = counting_registry(seed_courses());
        registry.replace_all(Vec::new()).unwrap();

        for week in 0..=TERM_WEEKS + 1 {
            for day in DAYS {
                for slot in TIME_SLOTS {
                    assert!(registry.find_for_slot(day, slot, week).is_none());
                }
            }
        }
        assert_eq!(*seen.lock().unwrap(), vec![MutationKind::Replaced]);
    }

    #[test]
    fn test_update_replaces_in_place_and_keeps_id() {
        let (mut registry, seen) = counting_registry(seed_courses());
        let mut edited = registry.get("3").unwrap().clone();
        edited.id = "ignored".to_string();
        edited.name = "Distributed Systems II".to_string();

        assert!(registry.update("3", edited).unwrap());
        assert_eq!(registry.courses()[2].id, "3");
        assert_eq!(registry.courses()[2].name, "Distributed Systems II");
        assert!(!registry.contains("ignored"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_id_is_a_noop_but_still_notifies() {
        let (mut registry, seen) = counting_registry(seed_courses());
        let before = registry.courses().to_vec();

        assert!(registry.remove("does-not-exist").unwrap().is_none());
        assert!(!registry.update("nope", course("x", Day::Monday, TimeSlot::First, all_weeks())).unwrap());

        assert_eq!(registry.courses(), before.as_slice());
        assert_eq!(*seen.lock().unwrap(), vec![MutationKind::Removed, MutationKind::Updated]);
    }

    #[test]
    fn test_remove_returns_course() {
        let mut registry = CourseRegistry::new(seed_courses());
        let removed = registry.remove("2").unwrap().unwrap();
        assert_eq!(removed.name, "Neural Networks");
        assert_eq!(registry.len(), 4);
        assert!(registry.find_for_slot(Day::Tuesday, TimeSlot::Third, 1).is_none());
    }

    #[test]
    fn test_week_stats() {
        let registry = CourseRegistry::new(seed_courses());
        let week1 = registry.week_stats(1);
        assert_eq!(week1.blocks, 4);
        assert_eq!(week1.load_display(), "6h");

        let week12 = registry.week_stats(12);
        assert_eq!(week12.blocks, 3);
        assert_eq!(week12.load_hours, 4.5);
        assert_eq!(week12.load_display(), "5h");
    }

    #[test]
    fn test_hook_failure_rolls_back_every_mutation() {
        let mut registry = CourseRegistry::new(seed_courses());
        let failing: HookFn = Arc::new(|_: &MutationEvent<'_>| anyhow::bail!("read-only store"));
        registry.hooks_mut().register("persist", failing);
        let before = registry.courses().to_vec();

        let err = registry
            .add(course("a", Day::Monday, TimeSlot::Second, vec![1]))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Hook(_)));

        let mut edited = registry.get("1").unwrap().clone();
        edited.name = "Renamed".to_string();
        assert!(registry.update("1", edited).is_err());
        assert!(registry.remove("2").is_err());
        assert!(registry.replace_all(Vec::new()).is_err());

        assert_eq!(registry.courses(), before.as_slice());
    }

    #[test]
    fn test_hooks_see_the_proposed_list() {
        let mut registry = CourseRegistry::new(seed_courses());
        let seen = Arc::new(Mutex::new(0));
        let s = seen.clone();
        let handler: HookFn = Arc::new(move |event: &MutationEvent<'_>| {
            *s.lock().unwrap() = event.courses.len();
            Ok(())
        });
        registry.hooks_mut().register("count", handler);

        registry.remove("5").unwrap();
        assert_eq!(*seen.lock().unwrap(), 4);
        assert_eq!(registry.len(), 4);
    }
}
