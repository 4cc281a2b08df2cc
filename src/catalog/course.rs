use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::lesson::{load_lesson, Lesson};

pub const COURSE_FILE: &str = "course.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonEntry {
    pub number: u32,
    pub title: String,
    /// one-line topic shown under the title, e.g. "Coffee Chains Essay"
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// lesson document, relative to the course directory
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub description: String,
    pub lessons: Vec<LessonEntry>,
    #[serde(skip)]
    dir: PathBuf,
}

impl Course {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry(&self, number: u32) -> Option<&LessonEntry> {
        self.lessons.iter().find(|entry| entry.number == number)
    }

    pub fn lesson_path(&self, entry: &LessonEntry) -> PathBuf {
        self.dir.join(&entry.file)
    }

    pub fn load_lesson(&self, number: u32) -> anyhow::Result<Lesson> {
        let entry = self
            .entry(number)
            .context(format!("course '{}' has no lesson {}", self.title, number))?;
        load_lesson(&self.lesson_path(entry))
            .context(format!("lesson {} ('{}') could not be loaded", number, entry.title))
    }
}

/// Reads `course.yaml` from `dir`. Lessons are listed by number.
pub fn load_course(dir: &Path) -> anyhow::Result<Course> {
    let path = dir.join(COURSE_FILE);
    let source = fs::read_to_string(&path)
        .context(format!("failed to read course file {}", path.display()))?;

    let mut course: Course = serde_yaml_ng::from_str(&source)
        .context(format!("{} is not a valid course document", path.display()))?;

    course.lessons.sort_by_key(|entry| entry.number);
    course.dir = dir.to_path_buf();

    tracing::debug!(
        title = course.title.as_str(),
        lessons = course.lessons.len(),
        "loaded course"
    );

    Ok(course)
}
