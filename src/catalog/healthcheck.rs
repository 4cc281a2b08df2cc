use serde::{Deserialize, Serialize};

use super::Course;
use crate::lesson::{text::reachable_terms, Lesson, Step};

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseHealthCheck {
    pub course_title: String,
    pub total_lessons: usize,
    pub total_steps: usize,
    pub total_quizzes: usize,
    pub reachable_terms_count: usize,
    pub unreachable_terms_count: usize,
    pub lessons: Vec<LessonHealthCheck>,
    pub failed_lessons: Vec<LessonFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonHealthCheck {
    pub lesson_number: Option<u32>,
    pub lesson_slug: String,
    pub lesson_title: String,
    pub steps: usize,
    pub content_slides: usize,
    pub quizzes: usize,
    pub reachable_terms: Vec<String>,
    /// vocabulary the renderer never marks in its slide's body, so a learner
    /// can never collect it
    pub unreachable_terms: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonFailure {
    pub lesson_number: u32,
    pub file: String,
    pub error: String,
}

impl CourseHealthCheck {
    pub fn is_healthy(&self) -> bool {
        self.failed_lessons.is_empty() && self.unreachable_terms_count == 0
    }
}

pub fn check_lesson(lesson: &Lesson) -> LessonHealthCheck {
    let mut reached = Vec::new();
    let mut unreached = Vec::new();
    let mut content_slides = 0;

    for step in lesson.steps() {
        let Step::Content(content) = step else {
            continue;
        };
        content_slides += 1;

        let flags = reachable_terms(&content.body, &content.vocab);
        for (item, reachable) in content.vocab.iter().zip(flags) {
            if reachable {
                reached.push(item.term.clone());
            } else {
                unreached.push(item.term.clone());
            }
        }
    }

    LessonHealthCheck {
        lesson_number: None,
        lesson_slug: lesson.slug().to_string(),
        lesson_title: lesson.title().to_string(),
        steps: lesson.len(),
        content_slides,
        quizzes: lesson.quiz_count(),
        reachable_terms: reached,
        unreachable_terms: unreached,
    }
}

/// Loads every lesson of the course and lints it. A lesson that fails to load
/// is recorded, not fatal.
pub fn check_course(course: &Course) -> CourseHealthCheck {
    let mut lessons = Vec::new();
    let mut failed_lessons = Vec::new();

    for entry in &course.lessons {
        match course.load_lesson(entry.number) {
            Ok(lesson) => {
                let mut check = check_lesson(&lesson);
                check.lesson_number = Some(entry.number);
                lessons.push(check);
            }
            Err(e) => {
                tracing::warn!(lesson = entry.number, "lesson failed to load: {:#}", e);
                failed_lessons.push(LessonFailure {
                    lesson_number: entry.number,
                    file: entry.file.clone(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    CourseHealthCheck {
        course_title: course.title.clone(),
        total_lessons: course.lessons.len(),
        total_steps: lessons.iter().map(|l| l.steps).sum(),
        total_quizzes: lessons.iter().map(|l| l.quizzes).sum(),
        reachable_terms_count: lessons.iter().map(|l| l.reachable_terms.len()).sum(),
        unreachable_terms_count: lessons.iter().map(|l| l.unreachable_terms.len()).sum(),
        lessons,
        failed_lessons,
    }
}
