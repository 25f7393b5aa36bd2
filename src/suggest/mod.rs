//! Schedule suggestions from a generative model
//!
//! The model is asked, as an academic advisor, for a week of courses that
//! serve a free-text goal. Its answer replaces the whole schedule; any
//! failure leaves the schedule alone.

pub mod client;
pub mod lifecycle;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::error::SuggestError;
use crate::types::{is_term_week, Course, DAYS, TIME_SLOTS};

pub use client::OpenRouterSuggester;
pub use lifecycle::{RequestTicket, SuggestionLifecycle, SuggestionState};

/// Anything that can turn a goal into a list of courses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseSuggester: Send + Sync {
    async fn suggest(&self, goal: &str) -> Result<Vec<Course>, SuggestError>;
}

/// User prompt for `goal`
pub fn build_prompt(goal: &str, count: usize) -> String {
    format!(
        "Act as a university academic advisor. Goal: \"{}\". Suggest {} courses (Monday-Friday, 4 periods/day). Return JSON.",
        goal.trim(),
        count
    )
}

/// JSON schema the response must follow.
///
/// Strict structured-output modes need an object at the top level, so the
/// course array sits under `courses` next to a short `reasoning`.
pub fn response_schema() -> Value {
    let days: Vec<&str> = DAYS.iter().map(|d| d.as_str()).collect();
    let slots: Vec<&str> = TIME_SLOTS.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "reasoning": { "type": "string" },
            "courses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "instructor": { "type": "string" },
                        "room": { "type": "string" },
                        "day": { "type": "string", "enum": days },
                        "timeSlot": { "type": "string", "enum": slots },
                        "color": { "type": "string" },
                        "weeks": { "type": "array", "items": { "type": "integer" } }
                    },
                    "required": ["id", "name", "instructor", "room", "day", "timeSlot", "color", "weeks"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["reasoning", "courses"],
        "additionalProperties": false
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    Bare(Vec<Course>),
    Wrapped {
        #[serde(default)]
        reasoning: Option<String>,
        courses: Vec<Course>,
    },
}

/// Parse model output into courses.
///
/// Accepts a bare array or `{ "reasoning", "courses" }`, optionally inside
/// a Markdown code fence. Every course must carry all fields with a valid
/// day and period, and weeks within the term. Repeated or blank ids are
/// replaced so ids stay unique.
pub fn parse_suggestion(content: &str) -> Result<Vec<Course>, SuggestError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(SuggestError::Malformed("empty response".to_string()));
    }

    let mut courses = match serde_json::from_str::<SuggestionPayload>(body) {
        Ok(SuggestionPayload::Bare(courses)) => courses,
        Ok(SuggestionPayload::Wrapped { reasoning, courses }) => {
            if let Some(reasoning) = reasoning {
                debug!("Suggestion reasoning: {}", reasoning);
            }
            courses
        }
        Err(_) => {
            // Re-parse as a plain list to get a precise error for the log
            serde_json::from_str::<Vec<Course>>(body)?
        }
    };

    if courses.is_empty() {
        return Err(SuggestError::Malformed("no courses suggested".to_string()));
    }

    let mut seen = HashSet::new();
    for (index, course) in courses.iter_mut().enumerate() {
        if course.weeks.is_empty() {
            return Err(SuggestError::Malformed(format!("'{}' has no weeks", course.name)));
        }
        if let Some(bad) = course.weeks.iter().find(|&&w| !is_term_week(w)) {
            return Err(SuggestError::Malformed(format!(
                "'{}' has week {} outside the term",
                course.name, bad
            )));
        }
        if course.id.trim().is_empty() || !seen.insert(course.id.clone()) {
            let mut fresh = format!("ai-{}", index + 1);
            while seen.contains(&fresh) {
                fresh.push('x');
            }
            debug!("Re-stamping suggested course '{}' id {:?} -> {}", course.name, course.id, fresh);
            course.id = fresh.clone();
            seen.insert(fresh);
        }
    }

    Ok(courses)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Day, TimeSlot};

    const ONE_COURSE: &str = r#"[{
        "id": "c1", "name": "Linear Algebra", "instructor": "Dr. Noether",
        "room": "M201", "day": "Monday", "timeSlot": "2nd Period",
        "color": "from-cyan-400 to-blue-600", "weeks": [1, 2, 3]
    }]"#;

    #[test]
    fn test_prompt_carries_goal_and_constraints() {
        let prompt = build_prompt("  become a data scientist ", 8);
        assert!(prompt.contains("Goal: \"become a data scientist\""));
        assert!(prompt.contains("Suggest 8 courses (Monday-Friday, 4 periods/day)"));
    }

    #[test]
    fn test_schema_enumerates_days_and_periods() {
        let schema = response_schema();
        let item = &schema["properties"]["courses"]["items"];
        assert_eq!(item["properties"]["day"]["enum"].as_array().unwrap().len(), 5);
        assert_eq!(item["properties"]["timeSlot"]["enum"][0], "1st Period");
        assert_eq!(item["required"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_parse_bare_array() {
        let courses = parse_suggestion(ONE_COURSE).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].day, Day::Monday);
        assert_eq!(courses[0].time_slot, TimeSlot::Second);
    }

    #[test]
    fn test_parse_wrapped_and_fenced() {
        let content = format!(
            "```json\n{{\"reasoning\": \"math first\", \"courses\": {}}}\n```",
            ONE_COURSE
        );
        let courses = parse_suggestion(&content).unwrap();
        assert_eq!(courses[0].name, "Linear Algebra");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(matches!(parse_suggestion(""), Err(SuggestError::Malformed(_))));
        assert!(matches!(parse_suggestion("[]"), Err(SuggestError::Malformed(_))));
        assert!(matches!(parse_suggestion("not json"), Err(SuggestError::Parse(_))));

        let saturday = ONE_COURSE.replace("Monday", "Saturday");
        assert!(matches!(parse_suggestion(&saturday), Err(SuggestError::Parse(_))));

        let missing_room = ONE_COURSE.replace("\"room\": \"M201\",", "");
        assert!(parse_suggestion(&missing_room).is_err());

        let week_zero = ONE_COURSE.replace("[1, 2, 3]", "[0, 1]");
        assert!(matches!(parse_suggestion(&week_zero), Err(SuggestError::Malformed(_))));
    }

    #[test]
    fn test_parse_restamps_duplicate_ids() {
        let two = format!(
            "[{}, {}]",
            ONE_COURSE.trim().trim_start_matches('[').trim_end_matches(']'),
            ONE_COURSE.trim().trim_start_matches('[').trim_end_matches(']')
        );
        let courses = parse_suggestion(&two).unwrap();
        assert_eq!(courses[0].id, "c1");
        assert_eq!(courses[1].id, "ai-2");
    }
}
