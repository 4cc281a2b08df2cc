use serde::{Deserialize, Serialize};

use crate::{
    lesson::{LessonError, Step},
    quiz::QuizResultSink,
};

/// XP awarded by the engine. Kept as plain configuration rather than a tuned
/// economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// for every forward step
    pub participation: u32,
    /// for a correct answer with no streak
    pub quiz_base: u32,
    /// added per level of the current streak
    pub combo: u32,
    /// for the first encounter of a vocabulary term on a slide
    pub vocabulary: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            participation: 5,
            quiz_base: 50,
            combo: 10,
            vocabulary: 15,
        }
    }
}

impl RewardConfig {
    pub fn quiz_reward(&self, streak: u32) -> u32 {
        self.quiz_base
            .saturating_add(streak.saturating_mul(self.combo))
    }
}

/// Plays the completion chime.
pub trait AudioCue {
    fn play_victory(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play_victory(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LessonState {
    pub current_index: usize,
    pub xp: u32,
    pub streak: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Completed,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based
    pub step: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    pub xp: u32,
    pub streak: u32,
    pub steps: usize,
}

pub struct LessonStepEngine<S = Step> {
    steps: Vec<S>,
    state: LessonState,
    rewards: RewardConfig,
    audio: Box<dyn AudioCue>,
    just_completed: bool,
}

impl<S> LessonStepEngine<S> {
    pub fn new(steps: Vec<S>, rewards: RewardConfig) -> Result<Self, LessonError> {
        if steps.is_empty() {
            return Err(LessonError::NoSteps);
        }

        Ok(Self {
            steps,
            state: LessonState::default(),
            rewards,
            audio: Box::new(Silent),
            just_completed: false,
        })
    }

    pub fn with_audio(mut self, audio: impl AudioCue + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_step(&self) -> &S {
        &self.steps[self.state.current_index]
    }

    pub fn state(&self) -> &LessonState {
        &self.state
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    pub fn xp(&self) -> u32 {
        self.state.xp
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    pub fn phase(&self) -> Phase {
        if self.state.completed {
            Phase::Completed
        } else {
            Phase::InProgress(self.state.current_index)
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_index + 1 == self.steps.len()
    }

    pub fn can_retreat(&self) -> bool {
        !self.state.completed && self.state.current_index > 0
    }

    pub fn progress(&self) -> Progress {
        let step = self.state.current_index + 1;
        let total = self.steps.len();
        Progress {
            step,
            total,
            percent: ((step as f64 / total as f64) * 100.0).round() as u32,
        }
    }

    pub fn advance(&mut self) -> Transition {
        if self.state.completed {
            return Transition::Ignored;
        }

        if self.is_last_step() {
            self.state.completed = true;
            self.just_completed = true;
            self.audio.play_victory();
            tracing::info!(
                xp = self.state.xp,
                streak = self.state.streak,
                "lesson completed"
            );
            return Transition::Completed;
        }

        let from = self.state.current_index;
        self.state.current_index += 1;
        self.award(self.rewards.participation);
        tracing::debug!(from, to = from + 1, xp = self.state.xp, "advanced");

        Transition::Moved { from, to: from + 1 }
    }

    pub fn retreat(&mut self) -> Transition {
        if !self.can_retreat() {
            return Transition::Ignored;
        }

        let from = self.state.current_index;
        self.state.current_index -= 1;
        tracing::debug!(from, to = from - 1, "retreated");

        Transition::Moved { from, to: from - 1 }
    }

    /// Returns the XP awarded.
    pub fn report_quiz_result(&mut self, correct: bool) -> u32 {
        if self.state.completed {
            return 0;
        }

        if !correct {
            tracing::debug!(lost_streak = self.state.streak, "wrong answer");
            self.state.streak = 0;
            return 0;
        }

        let reward = self.rewards.quiz_reward(self.state.streak);
        self.award(reward);
        self.state.streak += 1;
        tracing::debug!(reward, streak = self.state.streak, "correct answer");

        reward
    }

    /// Flat bonus; callers de-duplicate repeated encounters of one term.
    pub fn report_vocabulary_encounter(&mut self) -> u32 {
        if self.state.completed {
            return 0;
        }

        let reward = self.rewards.vocabulary;
        self.award(reward);
        reward
    }

    /// True once, right after the lesson completes.
    pub fn take_just_completed(&mut self) -> bool {
        std::mem::take(&mut self.just_completed)
    }

    pub fn summary(&self) -> Option<CompletionSummary> {
        self.state.completed.then(|| CompletionSummary {
            xp: self.state.xp,
            streak: self.state.streak,
            steps: self.steps.len(),
        })
    }

    fn award(&mut self, xp: u32) {
        self.state.xp = self.state.xp.saturating_add(xp);
    }
}

impl<S> QuizResultSink for LessonStepEngine<S> {
    fn report_quiz_result(&mut self, correct: bool) {
        LessonStepEngine::report_quiz_result(self, correct);
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for LessonStepEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonStepEngine")
            .field("steps", &self.steps.len())
            .field("state", &self.state)
            .field("rewards", &self.rewards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn engine(len: usize) -> LessonStepEngine<usize> {
        LessonStepEngine::new((0..len).collect(), RewardConfig::default()).expect("non-empty")
    }

    #[test]
    fn advancing_through_every_step_then_completing() {
        for len in 1..6 {
            let mut engine = engine(len);
            for _ in 0..len - 1 {
                assert!(matches!(engine.advance(), Transition::Moved { .. }));
            }
            assert_eq!(engine.current_index(), len - 1);
            assert!(!engine.is_completed());

            assert_eq!(engine.advance(), Transition::Completed);
            assert!(engine.is_completed());

            let before = *engine.state();
            assert_eq!(engine.advance(), Transition::Ignored);
            assert_eq!(*engine.state(), before);
        }
    }

    #[test]
    fn retreat_at_first_step_changes_nothing() {
        let mut engine = engine(3);
        let before = *engine.state();
        assert_eq!(engine.retreat(), Transition::Ignored);
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn retreat_never_awards_xp() {
        let mut engine = engine(3);
        engine.advance();
        engine.advance();
        assert_eq!(engine.xp(), 10);
        assert_eq!(engine.retreat(), Transition::Moved { from: 2, to: 1 });
        assert_eq!(engine.xp(), 10);
    }

    #[test]
    fn streak_raises_each_correct_reward() {
        let mut engine = engine(1);
        let awarded: Vec<u32> = (0..3).map(|_| engine.report_quiz_result(true)).collect();
        assert_eq!(awarded, vec![50, 60, 70]);
        assert_eq!(engine.xp(), 180);
        assert_eq!(engine.streak(), 3);

        assert_eq!(engine.report_quiz_result(false), 0);
        assert_eq!(engine.streak(), 0);
        assert_eq!(engine.xp(), 180);

        assert_eq!(engine.report_quiz_result(true), 50);
    }

    #[test]
    fn streak_sum_matches_closed_form() {
        let rewards = RewardConfig {
            quiz_base: 20,
            combo: 7,
            ..RewardConfig::default()
        };
        for k in 0..10u32 {
            let mut engine = LessonStepEngine::new(vec![()], rewards).expect("non-empty");
            for _ in 0..k {
                engine.report_quiz_result(true);
            }
            let expected: u32 = (0..k).map(|i| 20 + i * 7).sum();
            assert_eq!(engine.xp(), expected);
        }
    }

    #[test]
    fn progress_is_rounded_percentage() {
        let mut engine = engine(3);
        assert_eq!(
            engine.progress(),
            Progress {
                step: 1,
                total: 3,
                percent: 33
            }
        );
        engine.advance();
        assert_eq!(engine.progress().percent, 67);
    }

    struct CountingCue(Rc<Cell<u32>>);

    impl AudioCue for CountingCue {
        fn play_victory(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn completion_plays_the_chime_once() {
        let plays = Rc::new(Cell::new(0));
        let mut engine = engine(2).with_audio(CountingCue(Rc::clone(&plays)));

        engine.advance();
        assert!(!engine.take_just_completed());
        engine.advance();
        engine.advance();

        assert_eq!(plays.get(), 1);
        assert!(engine.take_just_completed());
        assert!(!engine.take_just_completed());
        assert_eq!(
            engine.summary(),
            Some(CompletionSummary {
                xp: 5,
                streak: 0,
                steps: 2
            })
        );
    }

    #[test]
    fn completed_lesson_ignores_further_reports() {
        let mut engine = engine(1);
        engine.advance();
        assert_eq!(engine.report_quiz_result(true), 0);
        assert_eq!(engine.report_vocabulary_encounter(), 0);
        assert_eq!(engine.retreat(), Transition::Ignored);
        assert_eq!(engine.xp(), 0);
    }

    #[test]
    fn empty_engine_is_rejected() {
        assert_eq!(
            LessonStepEngine::<Step>::new(Vec::new(), RewardConfig::default()).unwrap_err(),
            LessonError::NoSteps
        );
    }
}
