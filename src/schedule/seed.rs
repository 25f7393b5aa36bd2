//! Seed list used when nothing has been stored yet

use crate::types::{all_weeks, Course, Day, TimeSlot};

fn early_weeks() -> Vec<u8> {
    (1..=9).collect()
}

fn late_weeks() -> Vec<u8> {
    (10..=18).collect()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    instructor: &str,
    room: &str,
    day: Day,
    time_slot: TimeSlot,
    color: &str,
    weeks: Vec<u8>,
) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        instructor: instructor.to_string(),
        room: room.to_string(),
        day,
        time_slot,
        color: color.to_string(),
        weeks,
    }
}

/// The five example courses
pub fn seed_courses() -> Vec<Course> {
    vec![
        seed(
            "1",
            "Advanced UX Design",
            "Dr. Sarah Chen",
            "Lab 402",
            Day::Monday,
            TimeSlot::First,
            "from-purple-400 to-blue-500",
            all_weeks(),
        ),
        seed(
            "2",
            "Neural Networks",
            "Prof. James Watt",
            "Hall A",
            Day::Tuesday,
            TimeSlot::Third,
            "from-pink-400 to-rose-500",
            early_weeks(),
        ),
        seed(
            "3",
            "Distributed Systems",
            "Elena Rodriguez",
            "Room 101",
            Day::Wednesday,
            TimeSlot::Second,
            "from-cyan-400 to-blue-600",
            all_weeks(),
        ),
        seed(
            "4",
            "Cyber Security",
            "Mark Thompson",
            "Secure Lab",
            Day::Thursday,
            TimeSlot::Fourth,
            "from-amber-400 to-orange-500",
            late_weeks(),
        ),
        seed(
            "5",
            "Quantum Computing",
            "Dr. Alan Turing",
            "Physics 01",
            Day::Friday,
            TimeSlot::Third,
            "from-emerald-400 to-teal-600",
            early_weeks(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let courses = seed_courses();
        let ids: HashSet<_> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), courses.len());
    }

    #[test]
    fn test_seed_weeks_in_term() {
        for course in seed_courses() {
            assert!(course.weeks.iter().all(|&w| crate::types::is_term_week(w)));
        }
    }
}
