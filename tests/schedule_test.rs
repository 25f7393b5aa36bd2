//! Integration tests for the planner against real storage:
//! - Persistence round trips through the file store
//! - Seed fallback for missing and corrupted state
//! - Week-gated grid lookups and statistics
//! - Suggestion sync with a stub suggester

use async_trait::async_trait;
use course_flow::schedule::seed_courses;
use course_flow::storage::{SCHEDULE_KEY, THEME_KEY};
use course_flow::{
    Course, CourseDraft, CoursePatch, CourseSuggester, Day, FileStore, KeyValueStore, Planner,
    ScheduleError, ScheduleStore, SuggestError, SuggestionState, SyncOutcome, TermCalendar, Theme,
    TimeSlot,
};
use std::sync::Arc;

fn open(dir: &std::path::Path) -> Planner {
    let backend = Arc::new(FileStore::new(dir).unwrap());
    Planner::open(ScheduleStore::new(backend), TermCalendar::default())
}

/// Suggester returning a fixed answer
struct FixedSuggester(Result<Vec<Course>, String>);

#[async_trait]
impl CourseSuggester for FixedSuggester {
    async fn suggest(&self, _goal: &str) -> Result<Vec<Course>, SuggestError> {
        match &self.0 {
            Ok(courses) => Ok(courses.clone()),
            Err(msg) => Err(SuggestError::Malformed(msg.clone())),
        }
    }
}

// =====================================================================
// PERSISTENCE
// =====================================================================

#[test]
fn test_first_run_shows_seed_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let planner = open(dir.path());

    assert_eq!(planner.registry().courses(), seed_courses().as_slice());
    assert_eq!(planner.theme(), Theme::Light);
    assert!(!dir.path().join(format!("{}.json", SCHEDULE_KEY)).exists());
}

#[test]
fn test_changes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut planner = open(dir.path());
        let mut draft = CourseDraft::new("Cognitive Psychology", "Dr. Smith");
        draft.day = Day::Friday;
        draft.time_slot = TimeSlot::Fourth;
        draft.weeks = vec![1, 2, 3];
        planner.add_course(draft).unwrap();
        planner.remove_course("2").unwrap();
        planner.toggle_theme().unwrap();
    }

    let planner = open(dir.path());
    assert_eq!(planner.registry().len(), 5);
    assert!(!planner.registry().contains("2"));
    assert_eq!(planner.theme(), Theme::Dark);

    let added = planner
        .registry()
        .courses()
        .iter()
        .find(|c| c.name == "Cognitive Psychology")
        .unwrap();
    assert_eq!(added.weeks, vec![1, 2, 3]);
    assert_eq!(added.color, "from-blue-400 to-indigo-600");
}

#[test]
fn test_stored_format_is_camel_case_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());
    planner.edit_course("1", CoursePatch { room: Some("Hall B".into()), ..Default::default() }).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", SCHEDULE_KEY))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["timeSlot"], "1st Period");
    assert_eq!(value[0]["room"], "Hall B");
    assert_eq!(value[0]["day"], "Monday");
}

#[test]
fn test_corrupted_state_falls_back_to_seed() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store.save(SCHEDULE_KEY, "{not json").unwrap();
    store.save(THEME_KEY, "\"purple\"").unwrap();

    let planner = open(dir.path());
    assert_eq!(planner.registry().len(), 5);
    assert_eq!(planner.theme(), Theme::Light);
}

#[test]
fn test_empty_stored_list_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path()).unwrap().save(SCHEDULE_KEY, "[]").unwrap();

    let planner = open(dir.path());
    assert!(planner.registry().is_empty());
    assert_eq!(planner.stats().blocks, 0);
    assert_eq!(planner.stats().load_display(), "0h");
}

// =====================================================================
// GRID AND STATISTICS
// =====================================================================

#[test]
fn test_seed_schedule_by_week() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());

    planner.select_week(5).unwrap();
    let course = planner.course_at(Day::Monday, TimeSlot::First).unwrap();
    assert_eq!(course.name, "Advanced UX Design");
    assert!(planner.course_at(Day::Monday, TimeSlot::Second).is_none());
    assert_eq!(planner.course_at(Day::Tuesday, TimeSlot::Third).unwrap().name, "Neural Networks");

    planner.select_week(12).unwrap();
    assert!(planner.course_at(Day::Tuesday, TimeSlot::Third).is_none());
    assert_eq!(planner.stats().blocks, 3);
    assert_eq!(planner.stats().load_hours, 4.5);
}

#[test]
fn test_week_navigation_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());

    assert_eq!(planner.previous_week(), 1);
    planner.select_week(18).unwrap();
    assert_eq!(planner.next_week(), 18);
    assert!(matches!(planner.select_week(0), Err(ScheduleError::WeekOutOfRange(0))));
}

// =====================================================================
// SUGGESTION SYNC
// =====================================================================

#[test]
fn test_sync_replaces_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());

    let mut draft = CourseDraft::new("Structural Analysis", "Dr. Gaudi");
    draft.day = Day::Wednesday;
    let course = draft.into_course("ai-1".into()).unwrap();
    let suggester = FixedSuggester(Ok(vec![course]));

    let outcome = tokio_test::block_on(planner.sync(&suggester, "architect")).unwrap();
    assert_eq!(outcome, SyncOutcome::Replaced(1));

    let reopened = open(dir.path());
    assert_eq!(reopened.registry().len(), 1);
    assert_eq!(reopened.course_at(Day::Wednesday, TimeSlot::First).unwrap().id, "ai-1");
}

#[test]
fn test_failed_sync_keeps_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());
    let suggester = FixedSuggester(Err("no courses".into()));

    let err = tokio_test::block_on(planner.sync(&suggester, "architect")).unwrap_err();
    assert_eq!(err.user_notice(), "Sync failed.");
    assert_eq!(planner.registry().len(), 5);
    assert!(matches!(planner.suggestion_state(), SuggestionState::Failed { .. }));

    // The next attempt is allowed
    assert!(planner.begin_sync("architect").unwrap().is_some());
}
