//! Schedule core: the course registry, slot resolution and week selection

pub mod draft;
pub mod registry;
pub mod seed;
pub mod week;

pub use draft::{generate_id, CourseDraft, CoursePatch, DEFAULT_COLOR};
pub use registry::{CourseRegistry, SlotConflict, WeekStats};
pub use seed::seed_courses;
pub use week::{TermCalendar, WeekNavigator};
