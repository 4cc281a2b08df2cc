use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LessonError {
    #[error("lesson '{lesson}' has no steps")]
    Empty { lesson: String },

    #[error("a lesson needs at least one step")]
    NoSteps,

    #[error("quiz at step {step} has {count} option(s), at least 2 are required")]
    TooFewOptions { step: usize, count: usize },

    #[error("quiz at step {step} marks option {answer} as correct but only has {count} options")]
    AnswerOutOfRange {
        step: usize,
        answer: usize,
        count: usize,
    },
}
