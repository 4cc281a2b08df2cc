use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use super::{ContentStep, Lesson, LessonBuilder, QuizStep};

#[derive(Deserialize, Debug)]
struct LessonDocument {
    title: String,
    #[serde(default)]
    slug: Option<String>,
    slides: Vec<SlideDocument>,
}

#[derive(Deserialize, Debug)]
struct SlideDocument {
    content: ContentStep,
    #[serde(default)]
    quizzes: Vec<QuizStep>,
}

pub fn parse_lesson(source: &str) -> anyhow::Result<Lesson> {
    let document: LessonDocument =
        serde_yaml_ng::from_str(source).context("lesson is not a valid lesson document")?;

    let title = document.title.clone();
    let mut builder = LessonBuilder::new(document.title);
    if let Some(slug) = document.slug {
        builder = builder.slug(slug);
    }

    let builder = document
        .slides
        .into_iter()
        .fold(builder, |builder, slide| {
            builder.slide(slide.content, slide.quizzes)
        });

    builder
        .build()
        .context(format!("lesson '{}' failed validation", title))
}

pub fn load_lesson(path: &Path) -> anyhow::Result<Lesson> {
    let source = fs::read_to_string(path)
        .context(format!("failed to read lesson file {}", path.display()))?;

    let lesson =
        parse_lesson(&source).context(format!("failed to load lesson {}", path.display()))?;

    tracing::debug!(
        slug = lesson.slug(),
        steps = lesson.len(),
        quizzes = lesson.quiz_count(),
        "loaded lesson"
    );

    Ok(lesson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::{Step, Theme};

    const LESSON: &str = r#"
title: "Lesson 9: Tech & Connection"
slug: lesson-9
slides:
  - content:
      section_title: Introduction
      section_subtitle: The Paradox
      label: Context
      body: "The digital revolution has created a **paradox** of connectivity."
      theme: indigo
      vocab:
        - { term: paradox, ru: парадокс, uz: paradoks }
    quizzes:
      - question: "What is the 'paradox' mentioned?"
        options: ["Computers are fast but slow", "Connected but lonely", "Phones are expensive"]
        answer: 1
        explanation: A paradox is a contradiction.
  - content:
      section_title: Body Paragraph 1
      label: Maintaining Ties
      body:
        - "Proponents argue that technology **obliterates** boundaries."
        - "**Key Concept:** Global Reach."
      theme: teal
"#;

    #[test]
    fn parses_slides_into_steps() {
        let lesson = parse_lesson(LESSON).expect("lesson parses");
        assert_eq!(lesson.slug(), "lesson-9");
        assert_eq!(lesson.len(), 3);

        let Step::Content(first) = &lesson.steps()[0] else {
            panic!("first step should be content");
        };
        assert_eq!(first.body.len(), 1);
        assert_eq!(first.vocab[0].uz, "paradoks");

        let quiz = lesson.steps()[1].as_quiz().expect("second step is a quiz");
        assert_eq!(quiz.answer, 1);

        let second = lesson.steps()[2].as_content().expect("third step is content");
        assert_eq!(second.body.len(), 2);
        assert_eq!(second.theme, Theme::Indigo);
    }

    #[test]
    fn rejects_answer_outside_options() {
        let source = r#"
title: Broken
slides:
  - content: { section_title: A, label: B, body: C }
    quizzes:
      - { question: Q, options: [x, y], answer: 2, explanation: E }
"#;
        let err = parse_lesson(source).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("lesson 'Broken' failed validation"));
        assert!(message.contains("step 1"));
    }

    #[test]
    fn rejects_documents_without_slides() {
        assert!(parse_lesson("title: Lonely\n").is_err());
    }
}
