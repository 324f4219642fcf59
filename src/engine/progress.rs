use serde::{Deserialize, Serialize};

use crate::curriculum::{Curriculum, CurriculumPosition};

const ANIMATION_STEP: f64 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// Only topics explicitly marked completed count.
    CompletedOnly,
    /// Topics before the current position count, and so does the current one
    /// once it has no pending challenge.
    #[default]
    SeenOrCompleted,
}

impl ProgressPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressPolicy::CompletedOnly => "completed_only",
            ProgressPolicy::SeenOrCompleted => "seen_or_completed",
        }
    }
}

/// Completion fraction in `[0, 1]`. An empty curriculum is `0`.
pub fn compute(
    curriculum: &Curriculum,
    position: Option<CurriculumPosition>,
    policy: ProgressPolicy,
) -> f64 {
    let total = curriculum.total_topics();
    if total == 0 {
        return 0.0;
    }

    let counted = curriculum
        .topics()
        .filter(|(pos, topic)| match policy {
            ProgressPolicy::CompletedOnly => topic.is_completed(),
            ProgressPolicy::SeenOrCompleted => match position {
                Some(current) if *pos < current => true,
                Some(current) if *pos == current => {
                    !topic.has_challenge() || topic.is_completed()
                }
                _ => false,
            },
        })
        .count();

    (counted as f64 / total as f64).clamp(0.0, 1.0)
}

/// Eases the displayed progress toward the computed target, one step per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressAnimator {
    displayed: f64,
    target: f64,
}

impl ProgressAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn is_settled(&self) -> bool {
        self.displayed == self.target
    }

    /// Rises by a fixed step without overshooting; drops straight to a
    /// lower target.
    pub fn tick(&mut self) {
        if self.displayed < self.target {
            self.displayed = (self.displayed + ANIMATION_STEP).min(self.target);
        } else if self.displayed > self.target {
            self.displayed = self.target;
        }
    }

    pub fn snap(&mut self) {
        self.displayed = self.target;
    }
}
