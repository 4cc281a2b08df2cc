//! Lesson step engine for gamified IELTS essay-writing courses.
//!
//! A lesson is an ordered list of [`lesson::Step`]s. A [`session::LessonSession`]
//! walks it with a [`engine::LessonStepEngine`], judges quizzes with a
//! [`quiz::QuizEvaluator`] and reveals each slide through a
//! [`reveal::RevealSequencer`]. Rendering is left to the caller.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod lesson;
pub mod quiz;
pub mod reveal;
pub mod session;
