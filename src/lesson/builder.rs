use super::{ContentStep, LessonError, QuizStep, Step};

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    /// lesson title, e.g. "Lesson 9: Tech & Connection"
    title: String,

    /// lesson slug, must be unique within the course
    slug: String,

    steps: Vec<Step>,
}

impl Lesson {
    pub fn new(
        title: impl Into<String>,
        slug: Option<String>,
        steps: Vec<Step>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        validate_steps(&title, &steps)?;
        let slug = slug.unwrap_or_else(|| slugify(&title));
        Ok(Self { title, slug, steps })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn quiz_count(&self) -> usize {
        self.steps.iter().filter(|s| s.as_quiz().is_some()).count()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

pub fn validate_steps(title: &str, steps: &[Step]) -> Result<(), LessonError> {
    if steps.is_empty() {
        return Err(LessonError::Empty {
            lesson: title.to_string(),
        });
    }

    steps.iter().enumerate().try_for_each(|(index, step)| match step {
        Step::Quiz(quiz) => quiz.validate(index),
        Step::Content(_) => Ok(()),
    })
}

fn slugify(title: &str) -> String {
    let mut slugger = github_slugger::Slugger::default();
    slugger.slug(title)
}

/// Assembles a lesson one slide at a time: each content card is followed by
/// the quizzes that check it.
#[derive(Debug, Clone)]
pub struct LessonBuilder {
    title: String,
    slug: Option<String>,
    steps: Vec<Step>,
}

impl LessonBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            steps: Vec::new(),
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn slide(
        mut self,
        content: ContentStep,
        quizzes: impl IntoIterator<Item = QuizStep>,
    ) -> Self {
        self.steps.push(Step::Content(content));
        self.steps.extend(quizzes.into_iter().map(Step::Quiz));
        self
    }

    pub fn content(mut self, content: ContentStep) -> Self {
        self.steps.push(Step::Content(content));
        self
    }

    pub fn quiz(mut self, quiz: QuizStep) -> Self {
        self.steps.push(Step::Quiz(quiz));
        self
    }

    pub fn build(self) -> Result<Lesson, LessonError> {
        Lesson::new(self.title, self.slug, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::StepKind;

    fn intro() -> ContentStep {
        ContentStep::new("Introduction", "Context", ["The digital revolution..."])
    }

    #[test]
    fn slide_places_quizzes_after_their_content() {
        let lesson = LessonBuilder::new("Lesson 9 Connection")
            .slide(
                intro(),
                [
                    QuizStep::new("q1", ["a", "b"], 1, "e1"),
                    QuizStep::new("q2", ["a", "b", "c"], 0, "e2"),
                ],
            )
            .content(intro())
            .build()
            .expect("valid lesson");

        let kinds: Vec<StepKind> = lesson.steps().iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Content,
                StepKind::Quiz,
                StepKind::Quiz,
                StepKind::Content
            ]
        );
        assert_eq!(lesson.quiz_count(), 2);
        assert_eq!(lesson.slug(), "lesson-9-connection");
    }

    #[test]
    fn explicit_slug_wins() {
        let lesson = LessonBuilder::new("Anything")
            .slug("lesson-9")
            .content(intro())
            .build()
            .expect("valid lesson");
        assert_eq!(lesson.slug(), "lesson-9");
    }

    #[test]
    fn empty_lesson_is_rejected() {
        let err = LessonBuilder::new("Nothing").build().unwrap_err();
        assert_eq!(
            err,
            LessonError::Empty {
                lesson: "Nothing".to_string()
            }
        );
    }

    #[test]
    fn invalid_quiz_names_its_step() {
        let err = LessonBuilder::new("Broken")
            .slide(intro(), [QuizStep::new("q", ["only"], 0, "e")])
            .build()
            .unwrap_err();
        assert_eq!(err, LessonError::TooFewOptions { step: 1, count: 1 });
    }
}
