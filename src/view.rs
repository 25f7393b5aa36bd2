//! Text rendering of the timetable
//!
//! Everything here is a pure projection of the registry and the selected
//! week into strings; the CLI prints them. Colour is optional so output
//! stays readable when piped.

use crossterm::style::{Color, Stylize};

use crate::schedule::{CourseRegistry, SlotConflict, TermCalendar, WeekStats};
use crate::theme::Theme;
use crate::types::{format_weeks, Course, TimeSlot, DAYS, TERM_WEEKS, TIME_SLOTS};

const ROW_HEADER_WIDTH: usize = 7;
const CELL_WIDTH: usize = 18;
const EMPTY_CELL: &str = "·";

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                text: Color::Black,
                muted: Color::DarkGrey,
                accent: Color::DarkBlue,
            },
            Theme::Dark => Palette {
                text: Color::White,
                muted: Color::Grey,
                accent: Color::Cyan,
            },
        }
    }
}

/// Renders schedule views as text
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    theme: Theme,
    styled: bool,
}

impl Renderer {
    pub fn new(theme: Theme, styled: bool) -> Self {
        Self { theme, styled }
    }

    /// No escape codes at all
    pub fn plain() -> Self {
        Self::new(Theme::Light, false)
    }

    fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.styled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Color) -> String {
        if self.styled {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// The row of 18 week buttons, current one bracketed
    pub fn week_selector(&self, current: u8) -> String {
        let palette = self.palette();
        (1..=TERM_WEEKS)
            .map(|w| {
                if w == current {
                    self.bold(&format!("[{:>2}]", w), palette.accent)
                } else {
                    self.paint(&format!(" {:>2} ", w), palette.muted)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// The 5 x 4 grid for `week`
    pub fn grid(&self, registry: &CourseRegistry, week: u8, calendar: &TermCalendar) -> String {
        let palette = self.palette();
        let mut out = String::new();

        // Column headers: date above short day name
        out.push_str(&" ".repeat(ROW_HEADER_WIDTH + 1));
        for day in DAYS {
            out.push_str(&self.paint(&pad(&calendar.label(day, week), CELL_WIDTH), palette.muted));
            out.push(' ');
        }
        out.push('\n');
        out.push_str(&" ".repeat(ROW_HEADER_WIDTH + 1));
        for day in DAYS {
            let label = day.short().to_uppercase();
            out.push_str(&self.bold(&pad(&label, CELL_WIDTH), palette.text));
            out.push(' ');
        }
        out.push('\n');
        out.push_str(&rule('─', ROW_HEADER_WIDTH, CELL_WIDTH, '┼'));

        for slot in TIME_SLOTS {
            let (start, end) = slot.hours();
            let mut name_line = self.paint(&pad(&format!("{}-{}", start, end), ROW_HEADER_WIDTH), palette.muted);
            let mut room_line = " ".repeat(ROW_HEADER_WIDTH);
            name_line.push('│');
            room_line.push('│');

            for day in DAYS {
                match registry.find_for_slot(day, slot, week) {
                    Some(course) => {
                        let dot = self.paint("●", gradient_color(&course.color));
                        name_line.push_str(&dot);
                        name_line.push(' ');
                        name_line.push_str(&self.bold(&pad(&fit(&course.name, CELL_WIDTH - 2), CELL_WIDTH - 2), palette.text));
                        room_line.push_str("  ");
                        room_line.push_str(&self.paint(&pad(&fit(&course.room, CELL_WIDTH - 2), CELL_WIDTH - 2), palette.muted));
                    }
                    None => {
                        name_line.push_str(&self.paint(&pad(EMPTY_CELL, CELL_WIDTH), palette.muted));
                        room_line.push_str(&" ".repeat(CELL_WIDTH));
                    }
                }
                name_line.push(' ');
                room_line.push(' ');
            }

            out.push_str(name_line.trim_end());
            out.push('\n');
            out.push_str(room_line.trim_end());
            out.push('\n');

            // Lunch break
            if slot == TimeSlot::Second {
                out.push_str(&rule('┄', ROW_HEADER_WIDTH, CELL_WIDTH, '┼'));
            }
        }

        out
    }

    /// Footer figures
    pub fn stats(&self, stats: &WeekStats) -> String {
        let palette = self.palette();
        format!(
            "{} {}    {} {}",
            self.paint("BLOCKS", palette.muted),
            self.bold(&stats.blocks.to_string(), palette.text),
            self.paint("LOAD", palette.muted),
            self.bold(&stats.load_display(), palette.text),
        )
    }

    /// Detail panel for one course
    pub fn course_detail(&self, course: &Course) -> String {
        let palette = self.palette();
        let field = |label: &str, value: &str| {
            format!("  {:<11}{}\n", self.paint(label, palette.muted), value)
        };

        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n",
            self.paint("●", gradient_color(&course.color)),
            self.bold(&course.name, palette.text)
        ));
        out.push_str(&field("Instructor", &course.instructor));
        out.push_str(&field("Location", &course.room));
        out.push_str(&field("Day", course.day.as_str()));
        out.push_str(&field(
            "Schedule",
            &format!("{} ({})", course.time_slot.time_range(), course.time_slot),
        ));
        out.push_str(&field("Weeks", &format_weeks(&course.weeks)));
        out.push_str(&field("Id", &course.id));
        out
    }

    /// One line per course
    pub fn course_list<'a>(&self, courses: impl IntoIterator<Item = &'a Course>) -> String {
        let palette = self.palette();
        let mut out = String::new();
        for course in courses {
            out.push_str(&format!(
                "{} {:<14} {:<10} {:<11} {:<28} {:<18} weeks {}\n",
                self.paint("●", gradient_color(&course.color)),
                course.id,
                course.day.as_str(),
                course.time_slot.as_str(),
                fit(&course.name, 28),
                fit(&course.instructor, 18),
                self.paint(&format_weeks(&course.weeks), palette.muted),
            ));
        }
        out
    }

    /// Double-booking report
    pub fn conflicts(&self, registry: &CourseRegistry, conflicts: &[SlotConflict]) -> String {
        let palette = self.palette();
        let mut out = String::new();
        for conflict in conflicts {
            let names: Vec<String> = conflict
                .course_ids
                .iter()
                .map(|id| {
                    let name = registry.get(id).map(|c| c.name.as_str()).unwrap_or("?");
                    format!("{} ({})", name, id)
                })
                .collect();
            out.push_str(&format!(
                "{} {} week {}: {}\n",
                self.bold(conflict.day.as_str(), palette.text),
                conflict.slot,
                conflict.week,
                names.join(", then "),
            ));
        }
        out
    }
}

/// Terminal colour for a gradient such as "from-purple-400 to-blue-500",
/// taken from its first stop
pub fn gradient_color(gradient: &str) -> Color {
    let hue = gradient
        .split_whitespace()
        .find_map(|part| part.strip_prefix("from-"))
        .and_then(|stop| stop.split('-').next())
        .unwrap_or("");

    match hue {
        "purple" | "violet" | "fuchsia" => Color::Magenta,
        "pink" | "rose" | "red" => Color::Red,
        "cyan" | "sky" | "teal" => Color::Cyan,
        "amber" | "orange" | "yellow" => Color::Yellow,
        "emerald" | "green" | "lime" => Color::Green,
        "blue" | "indigo" => Color::Blue,
        _ => Color::Grey,
    }
}

fn rule(ch: char, header: usize, cell: usize, joint: char) -> String {
    let mut line = ch.to_string().repeat(header);
    line.push(joint);
    for i in 0..DAYS.len() {
        line.push_str(&ch.to_string().repeat(cell));
        if i + 1 < DAYS.len() {
            line.push(ch);
        }
    }
    line.push('\n');
    line
}

/// Truncate to `width` chars, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Left-align in `width` chars
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
