pub mod loader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("failed to read lesson file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse lessons from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("embedded lesson asset {name} is not valid UTF-8")]
    InvalidAsset { name: String },
    #[error("no topic at lesson {lesson}, topic {topic}")]
    OutOfRange { lesson: usize, topic: usize },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub challenge: String,
    #[serde(default, rename = "challengeType", alias = "validator")]
    pub validator_id: String,
    /// Supplementary text shown alongside the challenge prompt.
    #[serde(default)]
    pub exhibit: String,
    #[serde(skip)]
    completed: bool,
}

impl Topic {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            ..Self::default()
        }
    }

    pub fn with_challenge(mut self, challenge: &str, validator_id: &str) -> Self {
        self.challenge = challenge.to_string();
        self.validator_id = validator_id.to_string();
        self
    }

    pub fn with_exhibit(mut self, exhibit: &str) -> Self {
        self.exhibit = exhibit.to_string();
        self
    }

    pub fn has_challenge(&self) -> bool {
        !self.challenge.trim().is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Lesson {
    pub fn new(title: &str, topics: Vec<Topic>) -> Self {
        Self {
            title: title.to_string(),
            topics,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurriculumPosition {
    pub lesson: usize,
    pub topic: usize,
}

impl CurriculumPosition {
    pub const fn new(lesson: usize, topic: usize) -> Self {
        Self { lesson, topic }
    }
}

/// Ordered lessons for one session. Only the per-topic `completed` flags
/// change after load.
#[derive(Clone, Debug, Default)]
pub struct Curriculum {
    lessons: Vec<Lesson>,
}

impl Curriculum {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        Self { lessons }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn topic_count(&self, lesson: usize) -> Result<usize, CurriculumError> {
        self.lessons
            .get(lesson)
            .map(|l| l.topics.len())
            .ok_or(CurriculumError::OutOfRange { lesson, topic: 0 })
    }

    pub fn total_topics(&self) -> usize {
        self.lessons.iter().map(|l| l.topics.len()).sum()
    }

    /// True when there is nothing to navigate to, even if lessons exist.
    pub fn is_empty(&self) -> bool {
        self.total_topics() == 0
    }

    pub fn lesson(&self, lesson: usize) -> Result<&Lesson, CurriculumError> {
        self.lessons
            .get(lesson)
            .ok_or(CurriculumError::OutOfRange { lesson, topic: 0 })
    }

    pub fn topic(&self, lesson: usize, topic: usize) -> Result<&Topic, CurriculumError> {
        self.lessons
            .get(lesson)
            .and_then(|l| l.topics.get(topic))
            .ok_or(CurriculumError::OutOfRange { lesson, topic })
    }

    pub fn topic_at(&self, pos: CurriculumPosition) -> Result<&Topic, CurriculumError> {
        self.topic(pos.lesson, pos.topic)
    }

    pub fn mark_completed(&mut self, pos: CurriculumPosition) -> Result<(), CurriculumError> {
        let topic = self
            .lessons
            .get_mut(pos.lesson)
            .and_then(|l| l.topics.get_mut(pos.topic))
            .ok_or(CurriculumError::OutOfRange {
                lesson: pos.lesson,
                topic: pos.topic,
            })?;
        topic.completed = true;
        Ok(())
    }

    pub fn first_position(&self) -> Option<CurriculumPosition> {
        self.lessons
            .iter()
            .position(|l| !l.topics.is_empty())
            .map(|lesson| CurriculumPosition::new(lesson, 0))
    }

    pub fn last_position(&self) -> Option<CurriculumPosition> {
        self.lessons
            .iter()
            .rposition(|l| !l.topics.is_empty())
            .map(|lesson| CurriculumPosition::new(lesson, self.lessons[lesson].topics.len() - 1))
    }

    /// Next topic in lesson-then-topic order, skipping lessons without topics.
    pub fn next_position(&self, pos: CurriculumPosition) -> Option<CurriculumPosition> {
        let current = self.lessons.get(pos.lesson)?;
        if pos.topic + 1 < current.topics.len() {
            return Some(CurriculumPosition::new(pos.lesson, pos.topic + 1));
        }
        self.lessons
            .iter()
            .enumerate()
            .skip(pos.lesson + 1)
            .find(|(_, l)| !l.topics.is_empty())
            .map(|(lesson, _)| CurriculumPosition::new(lesson, 0))
    }

    pub fn previous_position(&self, pos: CurriculumPosition) -> Option<CurriculumPosition> {
        if pos.topic > 0 {
            return Some(CurriculumPosition::new(pos.lesson, pos.topic - 1));
        }
        self.lessons[..pos.lesson.min(self.lessons.len())]
            .iter()
            .rposition(|l| !l.topics.is_empty())
            .map(|lesson| CurriculumPosition::new(lesson, self.lessons[lesson].topics.len() - 1))
    }

    /// Zero-based index of `pos` across all topics.
    pub fn ordinal(&self, pos: CurriculumPosition) -> usize {
        let before: usize = self.lessons[..pos.lesson.min(self.lessons.len())]
            .iter()
            .map(|l| l.topics.len())
            .sum();
        before + pos.topic
    }

    pub fn topics(&self) -> impl Iterator<Item = (CurriculumPosition, &Topic)> {
        self.lessons.iter().enumerate().flat_map(|(li, lesson)| {
            lesson
                .topics
                .iter()
                .enumerate()
                .map(move |(ti, topic)| (CurriculumPosition::new(li, ti), topic))
        })
    }
}
