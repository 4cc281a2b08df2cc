use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lesson::{ContentStep, QuizStep, Step};

/// How far a slide has been revealed. Variants are ordered, so "is this part
/// visible" is `stage >= part`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Hidden,
    Header,
    Label,
    Video,
    Line(usize),
    Options,
    Footer,
    /// sentinel for static slides: everything is visible
    Revealed,
}

impl Stage {
    pub fn shows(self, part: Stage) -> bool {
        self >= part
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCue {
    pub stage: Stage,
    /// measured from the moment the slide was mounted
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTimings {
    pub header_ms: u64,
    pub label_gap_ms: u64,
    pub body_gap_ms: u64,
    pub video_gap_ms: u64,
    pub line_gap_ms: u64,
    pub quiz_card_ms: u64,
    pub quiz_options_ms: u64,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            header_ms: 100,
            label_gap_ms: 300,
            body_gap_ms: 200,
            video_gap_ms: 300,
            line_gap_ms: 300,
            quiz_card_ms: 200,
            quiz_options_ms: 400,
        }
    }
}

pub fn compute_reveal_schedule(step: &Step, timings: &RevealTimings) -> Vec<RevealCue> {
    match step {
        Step::Content(content) => content_schedule(content, timings),
        Step::Quiz(quiz) => quiz_schedule(quiz, timings),
    }
}

fn content_schedule(content: &ContentStep, timings: &RevealTimings) -> Vec<RevealCue> {
    let mut cues = Vec::with_capacity(content.body.len() + 4);
    let mut at = timings.header_ms;
    let mut push = |stage: Stage, at: u64| {
        cues.push(RevealCue {
            stage,
            delay: Duration::from_millis(at),
        })
    };

    push(Stage::Header, at);
    at += timings.label_gap_ms;
    push(Stage::Label, at);
    at += timings.body_gap_ms;

    if content.video.is_some() {
        push(Stage::Video, at);
        at += timings.video_gap_ms;
    }

    for line in 0..content.body.len() {
        push(Stage::Line(line), at);
        at += timings.line_gap_ms;
    }

    push(Stage::Footer, at);
    cues
}

fn quiz_schedule(_quiz: &QuizStep, timings: &RevealTimings) -> Vec<RevealCue> {
    vec![
        RevealCue {
            stage: Stage::Header,
            delay: Duration::from_millis(timings.quiz_card_ms),
        },
        RevealCue {
            stage: Stage::Options,
            delay: Duration::from_millis(timings.quiz_options_ms),
        },
    ]
}
