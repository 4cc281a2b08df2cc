use serde::{Deserialize, Serialize};

use super::LessonError;

/// Accent colour family of a content slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Indigo,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Theme::Red,
            "blue" => Theme::Blue,
            "green" => Theme::Green,
            "yellow" => Theme::Yellow,
            "purple" => Theme::Purple,
            _ => Theme::Indigo,
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Theme::from_name(&name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    pub term: String,
    pub ru: String,
    pub uz: String,
}

impl VocabItem {
    pub fn new(term: impl Into<String>, ru: impl Into<String>, uz: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ru: ru.into(),
            uz: uz.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoRef(String);

impl VideoRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    /// The `v=` parameter of a YouTube watch URL.
    pub fn youtube_id(&self) -> Option<&str> {
        self.0
            .split("v=")
            .nth(1)
            .and_then(|s| s.split('&').next())
            .filter(|id| !id.is_empty())
    }
}

// authored bodies are either one paragraph or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum BodyRepr {
    One(String),
    Many(Vec<String>),
}

impl From<BodyRepr> for Vec<String> {
    fn from(body: BodyRepr) -> Self {
        match body {
            BodyRepr::One(line) => vec![line],
            BodyRepr::Many(lines) => lines,
        }
    }
}

fn deserialize_body<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    BodyRepr::deserialize(deserializer).map(Vec::from)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStep {
    pub section_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_subtitle: Option<String>,

    /// short tag shown under the headline, e.g. "Context"
    pub label: String,

    /// paragraphs, revealed one at a time
    #[serde(deserialize_with = "deserialize_body")]
    pub body: Vec<String>,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vocab: Vec<VocabItem>,

    /// decorative asset id, passed through to the renderer untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRef>,
}

impl ContentStep {
    pub fn new(
        section_title: impl Into<String>,
        label: impl Into<String>,
        body: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            section_title: section_title.into(),
            section_subtitle: None,
            label: label.into(),
            body: body.into_iter().map(Into::into).collect(),
            theme: Theme::default(),
            vocab: Vec::new(),
            visual: None,
            video: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.section_subtitle = Some(subtitle.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_vocab(mut self, vocab: impl IntoIterator<Item = VocabItem>) -> Self {
        self.vocab.extend(vocab);
        self
    }

    pub fn with_visual(mut self, visual: impl Into<String>) -> Self {
        self.visual = Some(visual.into());
        self
    }

    pub fn with_video(mut self, video: VideoRef) -> Self {
        self.video = Some(video);
        self
    }

    /// Headline of the card: the subtitle when present, the label otherwise.
    pub fn headline(&self) -> &str {
        self.section_subtitle.as_deref().unwrap_or(&self.label)
    }

    /// Looks a term up ignoring case, the way body text is matched.
    pub fn vocab_item(&self, term: &str) -> Option<&VocabItem> {
        let term = term.to_lowercase();
        self.vocab.iter().find(|v| v.term.to_lowercase() == term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStep {
    pub question: String,
    pub options: Vec<String>,
    /// index into `options`
    pub answer: usize,
    pub explanation: String,
}

impl QuizStep {
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer,
            explanation: explanation.into(),
        }
    }

    /// An answer index outside `options` never matches, so such a quiz has no
    /// correct option rather than failing at play time.
    pub fn is_correct(&self, index: usize) -> bool {
        index < self.options.len() && index == self.answer
    }

    pub fn validate(&self, step: usize) -> Result<(), LessonError> {
        let count = self.options.len();
        if count < 2 {
            return Err(LessonError::TooFewOptions { step, count });
        }
        if self.answer >= count {
            return Err(LessonError::AnswerOutOfRange {
                step,
                answer: self.answer,
                count,
            });
        }
        Ok(())
    }
}

/// Positional option label: A, B, C, ... then 27, 28, ... past Z.
pub fn option_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Content,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Content(ContentStep),
    Quiz(QuizStep),
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Content(_) => StepKind::Content,
            Step::Quiz(_) => StepKind::Quiz,
        }
    }

    pub fn as_content(&self) -> Option<&ContentStep> {
        match self {
            Step::Content(content) => Some(content),
            Step::Quiz(_) => None,
        }
    }

    pub fn as_quiz(&self) -> Option<&QuizStep> {
        match self {
            Step::Quiz(quiz) => Some(quiz),
            Step::Content(_) => None,
        }
    }
}

impl From<ContentStep> for Step {
    fn from(content: ContentStep) -> Self {
        Step::Content(content)
    }
}

impl From<QuizStep> for Step {
    fn from(quiz: QuizStep) -> Self {
        Step::Quiz(quiz)
    }
}
