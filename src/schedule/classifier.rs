//! Tags derived from the free-text `lesson_description` of a lesson.
//!
//! The timetable encodes lesson kind and employment tier as short markers
//! inside the description, e.g. `Програмування (Лаб) мз-25-1`. Markers are
//! matched case-insensitively and in a fixed order, first hit wins.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Lecture,
    Laboratory,
    Practical,
    Credit,
    ExamConsultation,
    Exam,
    /// No known marker in the description.
    #[default]
    Unspecified,
}

/// Employment tier the lesson is paid under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourType {
    #[default]
    FullTime,
    PartTime,
    Hourly,
}

/// Checked top to bottom. `(Лаб)` must stay above `(Л)`, `(КЕкз)` above `(Екз)`.
const LESSON_TYPE_MARKERS: [(&str, LessonType); 6] = [
    ("(Лаб)", LessonType::Laboratory),
    ("(Пр)", LessonType::Practical),
    ("(Зал)", LessonType::Credit),
    ("(КЕкз)", LessonType::ExamConsultation),
    ("(Екз)", LessonType::Exam),
    ("(Л)", LessonType::Lecture),
];

/// `з-` is a suffix of `мз-`, so hourly goes first.
const HOUR_TYPE_MARKERS: [(&str, HourType); 2] =
    [("мз-", HourType::Hourly), ("з-", HourType::PartTime)];

pub const HALF_LESSON_MARKER: &str = "півпара";
pub const SUBSTITUTION_MARKER: &str = "Увага! Заміна";
pub const CANCELLATION_MARKER: &str = "Увага! Заняття відмінено!";

pub const FULL_LESSON_HOURS: u8 = 2;
pub const HALF_LESSON_HOURS: u8 = 1;
pub const SUBSTITUTION_HOURS: u8 = 0;

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn first_marker<T: Copy>(description: &str, markers: &[(&str, T)]) -> Option<T> {
    if description.trim().is_empty() {
        return None;
    }
    let description = description.to_lowercase();
    markers
        .iter()
        .find(|(marker, _)| description.contains(&marker.to_lowercase()))
        .map(|(_, tag)| *tag)
}

fn has_marker(description: &str, marker: &str) -> bool {
    !description.trim().is_empty() && contains_ignore_case(description, marker)
}

pub fn lesson_type(description: &str) -> LessonType {
    first_marker(description, &LESSON_TYPE_MARKERS).unwrap_or_default()
}

pub fn hour_type(description: &str) -> HourType {
    first_marker(description, &HOUR_TYPE_MARKERS).unwrap_or_default()
}

pub fn is_half_lesson(description: &str) -> bool {
    has_marker(description, HALF_LESSON_MARKER)
}

pub fn is_substitution(description: &str) -> bool {
    has_marker(description, SUBSTITUTION_MARKER)
}

pub fn is_cancelled(description: &str) -> bool {
    has_marker(description, CANCELLATION_MARKER)
}

/// Credited hours. A substitution is worth nothing even when it is also a half lesson.
pub fn lesson_hours(description: &str) -> u8 {
    if is_substitution(description) {
        SUBSTITUTION_HOURS
    } else if is_half_lesson(description) {
        HALF_LESSON_HOURS
    } else {
        FULL_LESSON_HOURS
    }
}

/// All tags for one description, computed in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub lesson_type: LessonType,
    pub hour_type: HourType,
    pub half_lesson: bool,
    pub substitution: bool,
    pub lesson_hours: u8,
}

pub fn classify(description: &str) -> Classification {
    Classification {
        lesson_type: lesson_type(description),
        hour_type: hour_type(description),
        half_lesson: is_half_lesson(description),
        substitution: is_substitution(description),
        lesson_hours: lesson_hours(description),
    }
}
