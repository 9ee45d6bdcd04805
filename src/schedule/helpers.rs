use log::{error, info};
use serde_json::Value;

use super::{
    date_range::DateRange,
    error::ScheduleError,
    models::{
        lesson_model::{Lesson, ScheduleResponse},
        room_model::{Block, DayLessons, RoomListResponse},
    },
    schedule_getter::ScheduleGetter,
};

pub const ROOM_LIST_QUERY: &str =
    "req_type=obj_list&req_mode=room&show_ID=yes&req_format=json&coding_mode=UTF8&bs=ok";

const UNKNOWN_API_ERROR: &str = "Невідома помилка";

fn rozklad_query(mode: &str, id: &str, range: &DateRange, format: &str) -> String {
    format!(
        "req_type=rozklad&req_mode={}&OBJ_ID={}&OBJ_name=&dep_name=&ros_text=united&begin_date={}&end_date={}&req_format={}&coding_mode=UTF8&bs=ok",
        mode,
        id,
        range.begin_date(),
        range.end_date(),
        format
    )
}

pub fn teacher_schedule_query(teacher_id: i64, range: &DateRange) -> String {
    rozklad_query("teacher", &teacher_id.to_string(), range, "json")
}

pub fn room_schedule_query(room_id: &str, range: &DateRange) -> String {
    rozklad_query("room", room_id, range, "json")
}

/// Link to the same room schedule as an iCal file, handed straight to the browser.
pub fn room_export_url(base_url: &str, room_id: &str, range: &DateRange) -> String {
    format!(
        "{}?{}",
        base_url,
        rozklad_query("room", room_id, range, "iCal")
    )
}

/* an `error` object the typed model could not read still has to surface */
fn loose_api_error(body: &str) -> Option<ScheduleError> {
    let value: Value = serde_json::from_str(body).ok()?;
    let api_error = value.get("psrozklad_export")?.get("error")?;
    if api_error.is_null() {
        return None;
    }
    let message = match api_error.get("error_message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => UNKNOWN_API_ERROR.to_owned(),
        Some(other) => other.to_string(),
    };
    let code = match api_error.get("errorcode") {
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    Some(ScheduleError::Upstream { message, code })
}

/// Decodes a `rozklad` answer into domain lessons.
///
/// An API-reported error is returned as [`ScheduleError::Upstream`], even when
/// the rest of the envelope is malformed. A body that is not the expected JSON
/// is logged and treated as "no lessons".
pub fn parse_schedule_response(body: &str) -> Result<Vec<Lesson>, ScheduleError> {
    let response: ScheduleResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            if let Some(api_error) = loose_api_error(body) {
                return Err(api_error);
            }
            error!("Error deserializing schedule response: {}", e);
            return Ok(Vec::new());
        }
    };

    let export = response.psrozklad_export;
    if let Some(api_error) = export.error {
        return Err(ScheduleError::Upstream {
            message: api_error
                .error_message
                .unwrap_or_else(|| UNKNOWN_API_ERROR.to_owned()),
            code: api_error.errorcode,
        });
    }

    Ok(export
        .roz_items
        .unwrap_or_default()
        .into_iter()
        .map(Lesson::from)
        .collect())
}

/// Blocks without a single room are useless for the room picker and are dropped.
pub fn parse_room_list(body: &str) -> Result<Vec<Block>, ScheduleError> {
    let response: RoomListResponse = serde_json::from_str(body)?;
    Ok(response
        .psrozklad_export
        .blocks
        .into_iter()
        .filter(|block| !block.objects.is_empty())
        .collect())
}

/* group lessons by their date, days in order of first appearance */
pub fn group_by_date(lessons: Vec<Lesson>) -> Vec<DayLessons> {
    let mut days: Vec<DayLessons> = Vec::new();
    for lesson in lessons {
        match days.iter_mut().find(|day| day.date == lesson.date) {
            Some(day) => day.lessons.push(lesson),
            None => days.push(DayLessons {
                date: lesson.date.clone(),
                lessons: vec![lesson],
            }),
        }
    }
    days
}

pub async fn get_teacher_lessons<SG: ScheduleGetter>(
    schedule_getter: &SG,
    teacher_id: i64,
    range: &DateRange,
) -> Result<Vec<Lesson>, ScheduleError> {
    info!(
        "Getting lessons for teacher {} from {} to {}",
        teacher_id,
        range.begin_date(),
        range.end_date()
    );
    let body = schedule_getter
        .fetch(teacher_schedule_query(teacher_id, range))
        .await?;
    let lessons = parse_schedule_response(&body)?;
    info!("Collected {} lessons for teacher {}", lessons.len(), teacher_id);
    Ok(lessons)
}

pub async fn get_room_lessons<SG: ScheduleGetter>(
    schedule_getter: &SG,
    room_id: &str,
    range: &DateRange,
) -> Result<Vec<Lesson>, ScheduleError> {
    info!(
        "Getting lessons for room {} from {} to {}",
        room_id,
        range.begin_date(),
        range.end_date()
    );
    let body = schedule_getter
        .fetch(room_schedule_query(room_id, range))
        .await?;
    parse_schedule_response(&body)
}

pub async fn get_blocks<SG: ScheduleGetter>(
    schedule_getter: &SG,
) -> Result<Vec<Block>, ScheduleError> {
    let body = schedule_getter.fetch(ROOM_LIST_QUERY.to_owned()).await?;
    let blocks = parse_room_list(&body)?;
    info!("Found {} blocks with rooms", blocks.len());
    Ok(blocks)
}

#[cfg(test)]
#[path = "tests/helpers_tests.rs"]
mod tests;
