//! Planner - the application state behind every front end
//!
//! Hydrates the registry from the store, wires persistence in as a mutation
//! hook, and turns user intents (add, edit, remove, change week, toggle
//! theme, sync from a goal) into registry operations.

use tracing::{debug, info, warn};

use crate::error::{ScheduleError, SuggestError};
use crate::schedule::{
    generate_id, seed_courses, CourseDraft, CoursePatch, CourseRegistry, TermCalendar,
    WeekNavigator, WeekStats,
};
use crate::storage::ScheduleStore;
use crate::suggest::{CourseSuggester, RequestTicket, SuggestionLifecycle, SuggestionState};
use crate::theme::Theme;
use crate::types::{Course, Day, TimeSlot};

/// Name the persistence hook is registered under
pub const PERSIST_HOOK: &str = "persist";

/// What a sync request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Blank goal; nothing was sent
    Skipped,
    /// The schedule was replaced with this many courses
    Replaced(usize),
    /// The request was cancelled before its answer was applied
    Discarded,
}

pub struct Planner {
    registry: CourseRegistry,
    week: WeekNavigator,
    calendar: TermCalendar,
    theme: Theme,
    store: ScheduleStore,
    suggestion: SuggestionLifecycle,
}

impl Planner {
    /// Load state from `store` and persist every later change back to it
    pub fn open(store: ScheduleStore, calendar: TermCalendar) -> Self {
        let courses = store.load_courses();
        let theme = Theme::from_dark_flag(store.load_dark_mode());
        info!("Opened schedule with {} courses ({} theme)", courses.len(), theme);

        let mut registry = CourseRegistry::new(courses);
        registry
            .hooks_mut()
            .register(PERSIST_HOOK, store.persist_hook());

        Self {
            registry,
            week: WeekNavigator::new(),
            calendar,
            theme,
            store,
            suggestion: SuggestionLifecycle::new(),
        }
    }

    pub fn registry(&self) -> &CourseRegistry {
        &self.registry
    }

    pub fn calendar(&self) -> &TermCalendar {
        &self.calendar
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn current_week(&self) -> u8 {
        self.week.current()
    }

    pub fn select_week(&mut self, week: u8) -> Result<u8, ScheduleError> {
        self.week.select(week)
    }

    pub fn next_week(&mut self) -> u8 {
        self.week.next()
    }

    pub fn previous_week(&mut self) -> u8 {
        self.week.previous()
    }

    /// Course shown in a cell of the current week's grid
    pub fn course_at(&self, day: Day, slot: TimeSlot) -> Option<&Course> {
        self.registry.find_for_slot(day, slot, self.week.current())
    }

    /// Footer figures for the current week
    pub fn stats(&self) -> WeekStats {
        self.registry.week_stats(self.week.current())
    }

    /// Submit the add form. Nothing is stored unless name and instructor are
    /// filled in.
    pub fn add_course(&mut self, draft: CourseDraft) -> Result<Course, ScheduleError> {
        draft.validate()?;
        let course = draft.into_course(generate_id(&self.registry))?;
        self.registry.add(course.clone())?;
        Ok(course)
    }

    /// Apply an edit to an existing course
    pub fn edit_course(&mut self, id: &str, patch: CoursePatch) -> Result<Course, ScheduleError> {
        let current = self
            .registry
            .get(id)
            .ok_or_else(|| ScheduleError::UnknownCourse(id.to_string()))?;
        let updated = patch.apply(current)?;
        self.registry.update(id, updated.clone())?;
        Ok(updated)
    }

    pub fn remove_course(&mut self, id: &str) -> Result<Option<Course>, ScheduleError> {
        self.registry.remove(id)
    }

    /// Put the seed list back
    pub fn reset_to_seed(&mut self) -> Result<(), ScheduleError> {
        self.registry.replace_all(seed_courses())
    }

    /// Switch theme. The flag is saved first; on a failed save the current
    /// theme is kept.
    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, ScheduleError> {
        self.store.save_dark_mode(theme.is_dark())?;
        self.theme = theme;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, ScheduleError> {
        self.set_theme(self.theme.toggled())
    }

    pub fn suggestion_state(&self) -> &SuggestionState {
        self.suggestion.state()
    }

    /// Start a sync. `None` means the goal was blank and nothing should be
    /// sent.
    pub fn begin_sync(&mut self, goal: &str) -> Result<Option<RequestTicket>, SuggestError> {
        if goal.trim().is_empty() {
            return Ok(None);
        }
        self.suggestion.begin(goal.trim()).map(Some)
    }

    /// Deliver a sync result. On success the schedule is replaced wholesale;
    /// on any failure, including a failed save of the new schedule, it is
    /// untouched.
    pub fn finish_sync(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Course>, SuggestError>,
    ) -> Result<SyncOutcome, SuggestError> {
        if !self.suggestion.is_current(ticket) {
            debug!("Discarding result of a cancelled sync");
            return Ok(SyncOutcome::Discarded);
        }

        let applied = result.and_then(|courses| {
            let count = courses.len();
            self.registry.replace_all(courses)?;
            Ok(count)
        });

        match applied {
            Ok(count) => {
                self.suggestion.resolve(ticket, count);
                Ok(SyncOutcome::Replaced(count))
            }
            Err(e) => {
                self.suggestion.fail(ticket, &e);
                Err(e)
            }
        }
    }

    /// Abandon an outstanding sync
    pub fn cancel_sync(&mut self) -> bool {
        self.suggestion.cancel()
    }

    /// Ask `suggester` for a schedule serving `goal` and install it
    pub async fn sync<S>(&mut self, suggester: &S, goal: &str) -> Result<SyncOutcome, SuggestError>
    where
        S: CourseSuggester + ?Sized,
    {
        let Some(ticket) = self.begin_sync(goal)? else {
            warn!("Ignoring sync with a blank goal");
            return Ok(SyncOutcome::Skipped);
        };
        let result = suggester.suggest(goal.trim()).await;
        self.finish_sync(ticket, result)
    }
}
