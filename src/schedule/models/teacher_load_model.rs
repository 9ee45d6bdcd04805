//! Shapes returned by the teacher endpoints
use serde::{Deserialize, Serialize};

use crate::schedule::classifier::{HourType, LessonType};

use super::lesson_model::ClassifiedLesson;

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct LessonItem {
    pub description: String,
    pub hours: u8,
}

/// Lessons of one employment tier, split by lesson kind.
/// All six lists are always present, possibly empty.
#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct HourTypeSchedule {
    pub lectures: Vec<LessonItem>,
    pub practice: Vec<LessonItem>,
    pub labs: Vec<LessonItem>,
    pub credits: Vec<LessonItem>,
    pub exam_consultations: Vec<LessonItem>,
    pub exams: Vec<LessonItem>,
}

impl HourTypeSchedule {
    /// `Unspecified` lessons are counted as lectures.
    pub fn category_mut(&mut self, lesson_type: LessonType) -> &mut Vec<LessonItem> {
        match lesson_type {
            LessonType::Lecture | LessonType::Unspecified => &mut self.lectures,
            LessonType::Practical => &mut self.practice,
            LessonType::Laboratory => &mut self.labs,
            LessonType::Credit => &mut self.credits,
            LessonType::ExamConsultation => &mut self.exam_consultations,
            LessonType::Exam => &mut self.exams,
        }
    }

    pub fn total_hours(&self) -> u32 {
        [
            &self.lectures,
            &self.practice,
            &self.labs,
            &self.credits,
            &self.exam_consultations,
            &self.exams,
        ]
        .into_iter()
        .flatten()
        .map(|item| u32::from(item.hours))
        .sum()
    }
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct TeacherLoadSummary {
    pub full_time: HourTypeSchedule,
    pub part_time: HourTypeSchedule,
    pub hourly: HourTypeSchedule,
}

impl TeacherLoadSummary {
    pub fn tier_mut(&mut self, hour_type: HourType) -> &mut HourTypeSchedule {
        match hour_type {
            HourType::FullTime => &mut self.full_time,
            HourType::PartTime => &mut self.part_time,
            HourType::Hourly => &mut self.hourly,
        }
    }
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct TeacherLoadResponse {
    pub teacher_id: i64,
    pub month_id: u32,
    #[serde(flatten)]
    pub summary: TeacherLoadSummary,
}

#[derive(Serialize, Debug)]
pub struct TeacherScheduleResponse {
    pub teacher_id: i64,
    pub month_id: u32,
    pub lessons_count: usize,
    pub lessons: Vec<ClassifiedLesson>,
}
