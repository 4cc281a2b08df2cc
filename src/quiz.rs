//! Single-selection judging for one mounted quiz slide.

use crate::lesson::QuizStep;

/// Receives the outcome of a quiz exactly once per answered question.
pub trait QuizResultSink {
    fn report_quiz_result(&mut self, correct: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Unanswered,
    Answered { selected: usize },
}

/// How an option is presented once the quiz has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// not answered yet, every option is selectable
    Idle,
    /// the right answer, whatever was picked
    Correct,
    /// the user's pick, when it was wrong
    WrongSelected,
    /// everything else, de-emphasized
    Unselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Accepted { correct: bool },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Insight,
}

impl Verdict {
    pub fn heading(&self) -> &'static str {
        match self {
            Verdict::Correct => "Correct",
            Verdict::Insight => "Insight",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizEvaluator {
    quiz: QuizStep,
    phase: QuizPhase,
}

impl QuizEvaluator {
    pub fn new(quiz: &QuizStep) -> Self {
        Self {
            quiz: quiz.clone(),
            phase: QuizPhase::Unanswered,
        }
    }

    pub fn quiz(&self) -> &QuizStep {
        &self.quiz
    }

    pub fn option_count(&self) -> usize {
        self.quiz.options.len()
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.phase, QuizPhase::Answered { .. })
    }

    pub fn selected(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::Answered { selected } => Some(selected),
            QuizPhase::Unanswered => None,
        }
    }

    /// Records the first in-range selection and reports it to `sink`. Any
    /// later selection, and any selection outside the options, is ignored.
    pub fn select(&mut self, index: usize, sink: &mut impl QuizResultSink) -> Selection {
        if self.is_answered() {
            tracing::debug!(index, "quiz already answered, selection ignored");
            return Selection::Ignored;
        }
        if index >= self.option_count() {
            tracing::debug!(
                index,
                options = self.option_count(),
                "selection outside options ignored"
            );
            return Selection::Ignored;
        }

        self.phase = QuizPhase::Answered { selected: index };
        let correct = self.quiz.is_correct(index);
        sink.report_quiz_result(correct);

        Selection::Accepted { correct }
    }

    pub fn mark(&self, index: usize) -> OptionMark {
        let QuizPhase::Answered { selected } = self.phase else {
            return OptionMark::Idle;
        };

        if self.quiz.is_correct(index) {
            OptionMark::Correct
        } else if index == selected {
            OptionMark::WrongSelected
        } else {
            OptionMark::Unselected
        }
    }

    pub fn marks(&self) -> Vec<OptionMark> {
        (0..self.option_count()).map(|i| self.mark(i)).collect()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.selected().map(|selected| {
            if self.quiz.is_correct(selected) {
                Verdict::Correct
            } else {
                Verdict::Insight
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<bool>);

    impl QuizResultSink for Recorder {
        fn report_quiz_result(&mut self, correct: bool) {
            self.0.push(correct);
        }
    }

    fn quiz(answer: usize) -> QuizStep {
        QuizStep::new("q", ["a", "b", "c"], answer, "because")
    }

    #[test]
    fn first_selection_is_reported_once() {
        let mut evaluator = QuizEvaluator::new(&quiz(1));
        let mut sink = Recorder::default();

        assert_eq!(
            evaluator.select(1, &mut sink),
            Selection::Accepted { correct: true }
        );
        assert_eq!(evaluator.select(0, &mut sink), Selection::Ignored);
        assert_eq!(evaluator.select(1, &mut sink), Selection::Ignored);

        assert_eq!(sink.0, vec![true]);
        assert_eq!(evaluator.selected(), Some(1));
        assert_eq!(evaluator.verdict(), Some(Verdict::Correct));
    }

    #[test]
    fn marks_before_answering_are_idle() {
        let evaluator = QuizEvaluator::new(&quiz(0));
        assert_eq!(evaluator.marks(), vec![OptionMark::Idle; 3]);
        assert_eq!(evaluator.verdict(), None);
    }

    #[test]
    fn wrong_pick_partitions_options_three_ways() {
        let mut evaluator = QuizEvaluator::new(&quiz(0));
        let mut sink = Recorder::default();
        evaluator.select(2, &mut sink);

        assert_eq!(
            evaluator.marks(),
            vec![
                OptionMark::Correct,
                OptionMark::Unselected,
                OptionMark::WrongSelected
            ]
        );
        assert_eq!(evaluator.verdict(), Some(Verdict::Insight));
        assert_eq!(sink.0, vec![false]);
    }

    #[test]
    fn right_pick_has_no_wrong_marking() {
        let mut evaluator = QuizEvaluator::new(&quiz(1));
        evaluator.select(1, &mut Recorder::default());
        assert!(!evaluator.marks().contains(&OptionMark::WrongSelected));
        assert_eq!(evaluator.mark(1), OptionMark::Correct);
    }

    #[test]
    fn out_of_range_selection_leaves_quiz_open() {
        let mut evaluator = QuizEvaluator::new(&quiz(1));
        let mut sink = Recorder::default();
        assert_eq!(evaluator.select(3, &mut sink), Selection::Ignored);
        assert!(!evaluator.is_answered());
        assert!(sink.0.is_empty());
    }

    #[test]
    fn unvalidated_answer_index_means_nothing_is_correct() {
        let mut evaluator = QuizEvaluator::new(&quiz(9));
        let mut sink = Recorder::default();
        evaluator.select(0, &mut sink);
        assert_eq!(sink.0, vec![false]);
        assert!(!evaluator.marks().contains(&OptionMark::Correct));
    }

    #[test]
    fn verdicts_agree_with_the_quiz_step() {
        for answer in [0, 1, 2, 9] {
            let step = quiz(answer);
            for pick in 0..3 {
                let mut evaluator = QuizEvaluator::new(&step);
                let mut sink = Recorder::default();
                evaluator.select(pick, &mut sink);

                assert_eq!(sink.0, vec![step.is_correct(pick)]);
                assert_eq!(
                    evaluator.verdict() == Some(Verdict::Correct),
                    step.is_correct(pick)
                );
            }
        }
        assert_eq!(QuizEvaluator::new(&quiz(1)).option_count(), 3);
    }
}
