use std::collections::HashSet;

use serde::Serialize;

use crate::{
    engine::{AudioCue, CompletionSummary, LessonStepEngine, RewardConfig, Transition},
    lesson::{Lesson, LessonError, Step},
    quiz::{QuizEvaluator, Selection},
    reveal::{RevealSequencer, RevealTimings, Scheduler, Stage},
};

/// Terms already collected on the slide currently shown.
#[derive(Debug, Default, Clone)]
pub struct VocabularyScope {
    seen: HashSet<String>,
}

impl VocabularyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards the vocabulary bonus the first time `term` is encountered in
    /// this scope. Returns the XP awarded.
    pub fn encounter<S>(&mut self, term: &str, engine: &mut LessonStepEngine<S>) -> u32 {
        if !self.seen.insert(term.to_string()) {
            return 0;
        }
        engine.report_vocabulary_encounter()
    }

    pub fn collected(&self) -> usize {
        self.seen.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(term)
    }
}

/// What the completion screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionBadge {
    pub title: String,
    pub xp: u32,
    pub streak: u32,
    pub steps: usize,
}

impl CompletionBadge {
    fn new(title: &str, summary: CompletionSummary) -> Self {
        Self {
            title: title.to_string(),
            xp: summary.xp,
            streak: summary.streak,
            steps: summary.steps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    pub rewards: RewardConfig,
    pub timings: RevealTimings,
    pub animated: bool,
}

// Everything scoped to one mount of one step. Dropping it cancels the reveal.
struct SlideView<Sch: Scheduler> {
    reveal: RevealSequencer<Sch>,
    quiz: Option<QuizEvaluator>,
    vocab: VocabularyScope,
}

impl<Sch: Scheduler + Clone> SlideView<Sch> {
    fn mount(step: &Step, scheduler: &Sch, settings: &SessionSettings) -> Self {
        Self {
            reveal: RevealSequencer::mount(
                scheduler.clone(),
                step,
                settings.animated,
                &settings.timings,
            ),
            quiz: step.as_quiz().map(QuizEvaluator::new),
            vocab: VocabularyScope::new(),
        }
    }
}

/// One learner working through one lesson.
pub struct LessonSession<Sch: Scheduler + Clone> {
    title: String,
    slug: String,
    engine: LessonStepEngine<Step>,
    scheduler: Sch,
    settings: SessionSettings,
    view: SlideView<Sch>,
}

impl<Sch: Scheduler + Clone> LessonSession<Sch> {
    pub fn new(
        lesson: Lesson,
        scheduler: Sch,
        settings: SessionSettings,
    ) -> Result<Self, LessonError> {
        let title = lesson.title().to_string();
        let slug = lesson.slug().to_string();

        let engine = LessonStepEngine::new(lesson.into_steps(), settings.rewards)?;
        let view = SlideView::mount(engine.current_step(), &scheduler, &settings);

        tracing::info!(slug = slug.as_str(), steps = engine.steps().len(), "session started");

        Ok(Self {
            title,
            slug,
            engine,
            scheduler,
            settings,
            view,
        })
    }

    pub fn with_audio(mut self, audio: impl AudioCue + 'static) -> Self {
        self.engine = self.engine.with_audio(audio);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn engine(&self) -> &LessonStepEngine<Step> {
        &self.engine
    }

    pub fn current_step(&self) -> &Step {
        self.engine.current_step()
    }

    pub fn stage(&self) -> Stage {
        self.view.reveal.stage()
    }

    pub fn reveal(&self) -> &RevealSequencer<Sch> {
        &self.view.reveal
    }

    pub fn quiz(&self) -> Option<&QuizEvaluator> {
        self.view.quiz.as_ref()
    }

    pub fn vocabulary(&self) -> &VocabularyScope {
        &self.view.vocab
    }

    pub fn advance(&mut self) -> Transition {
        let transition = self.engine.advance();
        self.remount_on_move(transition);
        transition
    }

    pub fn retreat(&mut self) -> Transition {
        let transition = self.engine.retreat();
        self.remount_on_move(transition);
        transition
    }

    pub fn select_option(&mut self, index: usize) -> Selection {
        if self.engine.is_completed() {
            return Selection::Ignored;
        }
        match self.view.quiz.as_mut() {
            Some(quiz) => quiz.select(index, &mut self.engine),
            None => Selection::Ignored,
        }
    }

    /// Collects a vocabulary term of the current content slide. Unknown terms,
    /// quiz slides and repeats on the same mount award nothing.
    pub fn encounter_term(&mut self, term: &str) -> u32 {
        let Some(item) = self
            .engine
            .current_step()
            .as_content()
            .and_then(|content| content.vocab_item(term))
        else {
            tracing::debug!(term, "not a vocabulary term of this slide");
            return 0;
        };
        // de-duplicate on the authored spelling, not on what was clicked
        let term = item.term.clone();
        self.view.vocab.encounter(&term, &mut self.engine)
    }

    /// Replays the reveal of the current slide from the start.
    pub fn replay(&mut self) {
        self.view.reveal.replay();
    }

    pub fn take_just_completed(&mut self) -> bool {
        self.engine.take_just_completed()
    }

    pub fn summary(&self) -> Option<CompletionBadge> {
        self.engine
            .summary()
            .map(|summary| CompletionBadge::new(&self.title, summary))
    }

    fn remount_on_move(&mut self, transition: Transition) {
        if let Transition::Moved { .. } = transition {
            // the old view is dropped here, which cancels its pending timers
            self.view = SlideView::mount(self.engine.current_step(), &self.scheduler, &self.settings);
        }
    }
}
