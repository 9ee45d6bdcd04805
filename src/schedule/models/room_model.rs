//! Room list and room schedule models
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lesson_model::Lesson;

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct RoomListResponse {
    pub psrozklad_export: RoomListExport,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct RoomListExport {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A building with its rooms.
#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Block {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<RoomObject>,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct RoomObject {
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
}

/// Lessons sharing the same `date`.
#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct DayLessons {
    pub date: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct RoomScheduleResponse {
    pub room_id: String,
    pub days: Vec<DayLessons>,
    pub export_url: String,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
pub struct PeriodOption {
    pub value: String,
    pub label: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}
