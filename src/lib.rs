//! Course Flow - weekly course timetable library
//!
//! A term planner with:
//! - A course registry with week-gated slot lookup and load statistics
//! - Local persistence through a pluggable key-value store
//! - AI-assisted schedule suggestions via OpenRouter
//! - Light/dark text rendering of the weekly grid
//!
//! # Example
//!
//! ```ignore
//! use course_flow::{Planner, ScheduleStore, MemoryStore, TermCalendar};
//! use std::sync::Arc;
//!
//! let store = ScheduleStore::new(Arc::new(MemoryStore::new()));
//! let mut planner = Planner::open(store, TermCalendar::default());
//! planner.select_week(10)?;
//! println!("{} blocks this week", planner.stats().blocks);
//! ```

// Core modules
pub mod types;
pub mod error;
pub mod hooks;
pub mod schedule;
pub mod storage;
pub mod config;
pub mod security;
pub mod suggest;

// Front end
pub mod theme;
pub mod view;
pub mod app;
pub mod cli;

// Re-export commonly used types for convenience
pub use types::{Course, Day, TimeSlot, BLOCK_HOURS, TERM_WEEKS};

pub use error::{ScheduleError, StorageError, SuggestError};

pub use schedule::{
    CourseDraft,
    CoursePatch,
    CourseRegistry,
    TermCalendar,
    WeekNavigator,
    WeekStats,
};

pub use storage::{
    FileStore,
    KeyValueStore,
    MemoryStore,
    ScheduleStore,
};

pub use suggest::{
    CourseSuggester,
    OpenRouterSuggester,
    SuggestionState,
};

pub use config::Config;

pub use security::{
    set_api_key,
    get_api_key,
    delete_api_key,
};

pub use app::{Planner, SyncOutcome};
pub use theme::Theme;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Weekly Course Timetable Library", NAME, VERSION)
}
