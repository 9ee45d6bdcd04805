use log::debug;

use super::models::{
    lesson_model::Lesson,
    teacher_load_model::{LessonItem, TeacherLoadSummary},
};

/* "{description} {date} {time}", the way the load sheet lists a lesson */
pub fn format_lesson_item(lesson: &Lesson) -> LessonItem {
    LessonItem {
        description: format!(
            "{} {} {}",
            lesson.lesson_description, lesson.date, lesson.lesson_time
        ),
        hours: lesson.lesson_hours(),
    }
}

/// Groups one teacher's lessons by employment tier, then by lesson kind.
/// Cancelled lessons are dropped, everything else keeps its input order.
pub fn summarize_teacher_load(lessons: &[Lesson]) -> TeacherLoadSummary {
    let mut summary = TeacherLoadSummary::default();

    for lesson in lessons {
        if lesson.cancelled() {
            debug!(
                "Skipping cancelled lesson {} {}",
                lesson.date, lesson.lesson_time
            );
            continue;
        }
        summary
            .tier_mut(lesson.hour_type())
            .category_mut(lesson.lesson_type())
            .push(format_lesson_item(lesson));
    }

    debug!(
        "Teacher load: {} full-time, {} part-time, {} hourly hours",
        summary.full_time.total_hours(),
        summary.part_time.total_hours(),
        summary.hourly.total_hours()
    );
    summary
}
