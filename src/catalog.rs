mod course;
mod healthcheck;

pub use course::{load_course, Course, LessonEntry, COURSE_FILE};
pub use healthcheck::{
    check_course, check_lesson, CourseHealthCheck, LessonFailure, LessonHealthCheck,
};
