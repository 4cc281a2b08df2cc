mod builder;
mod error;
mod load;
mod step;
pub mod text;

pub use builder::{validate_steps, Lesson, LessonBuilder};
pub use error::LessonError;
pub use load::{load_lesson, parse_lesson};
pub use step::{option_label, ContentStep, QuizStep, Step, StepKind, Theme, VideoRef, VocabItem};
