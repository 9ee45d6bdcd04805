//! Module with lesson models compatible with timetable_export.cgi's JSON export
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::schedule::classifier::{self, Classification, HourType, LessonType};

/// Top level of every `req_format=json` answer.
#[derive(Deserialize, Debug, Serialize, PartialEq)]
pub struct ScheduleResponse {
    pub psrozklad_export: ScheduleExport,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Default)]
pub struct ScheduleExport {
    pub roz_items: Option<Vec<LessonResponse>>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: Option<String>,
    pub error: Option<ErrorInfo>,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Clone)]
pub struct ErrorInfo {
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub errorcode: Option<String>,
}

/// Codes come both quoted (`"2"`) and bare (`2`).
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(code)) => Some(code),
        Some(other) => Some(other.to_string()),
    })
}

/// One `roz_items` entry as the API sends it. Any field may be missing or null.
#[derive(Deserialize, Debug, Serialize, PartialEq, Clone, Default)]
pub struct LessonResponse {
    pub object: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    pub lesson_number: Option<String>,
    pub lesson_name: Option<String>,
    pub lesson_time: Option<String>,
    pub lesson_description: Option<String>,
}

/// A lesson with every field present. Derived tags are computed from
/// `lesson_description` on demand and never stored.
#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct Lesson {
    pub object: String,
    pub date: String,
    pub comment: String,
    pub lesson_number: String,
    pub lesson_name: String,
    pub lesson_time: String,
    pub lesson_description: String,
}

impl Lesson {
    pub fn lesson_type(&self) -> LessonType {
        classifier::lesson_type(&self.lesson_description)
    }

    pub fn hour_type(&self) -> HourType {
        classifier::hour_type(&self.lesson_description)
    }

    pub fn half_lesson(&self) -> bool {
        classifier::is_half_lesson(&self.lesson_description)
    }

    pub fn substitution(&self) -> bool {
        classifier::is_substitution(&self.lesson_description)
    }

    pub fn cancelled(&self) -> bool {
        classifier::is_cancelled(&self.lesson_description)
    }

    pub fn lesson_hours(&self) -> u8 {
        classifier::lesson_hours(&self.lesson_description)
    }

    pub fn classification(&self) -> Classification {
        classifier::classify(&self.lesson_description)
    }
}

impl From<LessonResponse> for Lesson {
    fn from(response: LessonResponse) -> Self {
        Self {
            object: response.object.unwrap_or_default(),
            date: response.date.unwrap_or_default(),
            comment: response.comment.unwrap_or_default(),
            lesson_number: response.lesson_number.unwrap_or_default(),
            lesson_name: response.lesson_name.unwrap_or_default(),
            lesson_time: response.lesson_time.unwrap_or_default(),
            lesson_description: response.lesson_description.unwrap_or_default(),
        }
    }
}

/// What the teacher-schedule endpoint returns per lesson: the raw fields plus the tags.
#[derive(Serialize, Debug, PartialEq)]
pub struct ClassifiedLesson {
    #[serde(flatten)]
    pub lesson: Lesson,
    #[serde(flatten)]
    pub classification: Classification,
}

impl From<Lesson> for ClassifiedLesson {
    fn from(lesson: Lesson) -> Self {
        let classification = lesson.classification();
        Self {
            lesson,
            classification,
        }
    }
}
