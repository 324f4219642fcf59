use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::curriculum::{Curriculum, CurriculumPosition, Topic};
use crate::engine::progress::{self, ProgressPolicy};
use crate::engine::validator::ValidatorRegistry;
use crate::session::input::{EditOp, TextBuffer};

pub const MSG_NO_CONTENT: &str = "No lessons or topics available.";
pub const MSG_CORRECT: &str = "Correct! Press \u{2192} to continue.";
pub const MSG_TRY_AGAIN: &str = "Try again.";
pub const MSG_END: &str = "You have reached the end of the curriculum.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Viewing,
    Challenging,
    Completed,
}

/// What happens when advancing past the final topic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EndPolicy {
    /// Enter the terminal `Completed` phase.
    #[default]
    Complete,
    /// Stay on the final topic.
    Clamp,
    /// Legacy behaviour: jump back to the first topic.
    Wrap,
}

impl EndPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            EndPolicy::Complete => "complete",
            EndPolicy::Clamp => "clamp",
            EndPolicy::Wrap => "wrap",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Start,
    Advance,
    Retreat,
    SubmitAnswer,
    ScrollUp(u16),
    ScrollDown(u16),
    Edit(EditOp),
    Resize(u16, u16),
    Quit,
}

impl Intent {
    /// Name for logs. Never includes typed text.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Advance => "advance",
            Intent::Retreat => "retreat",
            Intent::SubmitAnswer => "submit-answer",
            Intent::ScrollUp(_) => "scroll-up",
            Intent::ScrollDown(_) => "scroll-down",
            Intent::Edit(_) => "edit",
            Intent::Resize(..) => "resize",
            Intent::Quit => "quit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    NoContent,
    Started,
    Moved {
        from: CurriculumPosition,
        to: CurriculumPosition,
    },
    EnteredChallenge,
    Accepted,
    Rejected,
    EndReached,
    Finished,
    Edited,
    Scrolled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigatorOptions {
    pub progress_policy: ProgressPolicy,
    pub end_policy: EndPolicy,
    pub clear_input_on_failure: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            progress_policy: ProgressPolicy::default(),
            end_policy: EndPolicy::default(),
            clear_input_on_failure: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub phase: Phase,
    /// `None` exactly when the curriculum has no topics or the session has not started.
    pub position: Option<CurriculumPosition>,
    pub message: Option<String>,
    pub progress: f64,
    pub input: TextBuffer,
    pub scroll: u16,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: Phase::Intro,
            position: None,
            message: None,
            progress: 0.0,
            input: TextBuffer::default(),
            scroll: 0,
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Clone, Copy, Debug)]
pub struct SessionSnapshot<'a> {
    pub phase: Phase,
    pub position: Option<CurriculumPosition>,
    pub lesson_title: Option<&'a str>,
    pub topic: Option<&'a Topic>,
    pub message: Option<&'a str>,
    pub progress: f64,
    pub input: &'a TextBuffer,
    pub scroll: u16,
    pub ordinal: Option<usize>,
    pub total_topics: usize,
}

pub struct NavigationMachine {
    curriculum: Curriculum,
    registry: ValidatorRegistry,
    options: NavigatorOptions,
    state: SessionState,
    /// Last scroll offset that still shows content, in rendered rows.
    /// Set by the presentation layer; `None` leaves scrolling unclamped.
    scroll_limit: Option<u16>,
}

impl NavigationMachine {
    pub fn new(curriculum: Curriculum, registry: ValidatorRegistry, options: NavigatorOptions) -> Self {
        if options.end_policy == EndPolicy::Wrap {
            warn!("end policy 'wrap' restarts the curriculum after the last topic; this is legacy behaviour");
        }
        let mut machine = Self {
            curriculum,
            registry,
            options,
            state: SessionState::new(),
            scroll_limit: None,
        };
        machine.recompute_progress();
        machine
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn options(&self) -> NavigatorOptions {
        self.options
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.current().map(|(_, topic)| topic)
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let position = self.state.position;
        SessionSnapshot {
            phase: self.state.phase,
            position,
            lesson_title: position
                .and_then(|p| self.curriculum.lesson(p.lesson).ok())
                .map(|l| l.title.as_str()),
            topic: self.current_topic(),
            message: self.state.message.as_deref(),
            progress: self.state.progress,
            input: &self.state.input,
            scroll: self.state.scroll,
            ordinal: position.map(|p| self.curriculum.ordinal(p)),
            total_topics: self.curriculum.total_topics(),
        }
    }

    pub fn scroll_limit(&self) -> Option<u16> {
        self.scroll_limit
    }

    /// Clamps the current and future scroll offsets for this topic.
    pub fn set_scroll_limit(&mut self, limit: u16) {
        self.scroll_limit = Some(limit);
        self.state.scroll = self.state.scroll.min(limit);
    }

    pub fn apply(&mut self, intent: Intent) -> Transition {
        let transition = match intent {
            Intent::Start => self.start(),
            Intent::Advance => self.advance(),
            Intent::Retreat => self.retreat(),
            Intent::SubmitAnswer => self.submit(),
            Intent::ScrollUp(lines) => self.scroll(|s| s.saturating_sub(lines)),
            Intent::ScrollDown(lines) => self.scroll(|s| s.saturating_add(lines)),
            Intent::Edit(op) => self.edit(op),
            Intent::Resize(..) | Intent::Quit => Transition::Ignored,
        };
        debug!(
            intent = intent.name(),
            ?transition,
            phase = ?self.state.phase,
            progress = self.state.progress,
            "intent applied"
        );
        transition
    }

    fn current(&self) -> Option<(CurriculumPosition, &Topic)> {
        let pos = self.state.position?;
        match self.curriculum.topic_at(pos) {
            Ok(topic) => Some((pos, topic)),
            Err(err) => {
                error!(%err, "session position outside curriculum");
                None
            }
        }
    }

    fn no_content(&mut self) -> Transition {
        self.state.message = Some(MSG_NO_CONTENT.to_string());
        Transition::NoContent
    }

    fn start(&mut self) -> Transition {
        if self.state.phase != Phase::Intro {
            return Transition::Ignored;
        }
        match self.curriculum.first_position() {
            Some(first) => {
                self.go_to(first);
                Transition::Started
            }
            None => self.no_content(),
        }
    }

    fn advance(&mut self) -> Transition {
        let phase = self.state.phase;
        if !matches!(phase, Phase::Viewing | Phase::Challenging) {
            return Transition::Ignored;
        }
        let Some((pos, topic)) = self.current() else {
            return self.no_content();
        };
        let pending = topic.has_challenge() && !topic.is_completed();

        match phase {
            Phase::Viewing if pending => {
                self.state.phase = Phase::Challenging;
                self.state.input.clear();
                self.state.message = None;
                Transition::EnteredChallenge
            }
            Phase::Challenging if pending => Transition::Ignored,
            _ => self.move_forward(pos),
        }
    }

    fn move_forward(&mut self, from: CurriculumPosition) -> Transition {
        if let Some(to) = self.curriculum.next_position(from) {
            self.go_to(to);
            return Transition::Moved { from, to };
        }
        match self.options.end_policy {
            EndPolicy::Complete => {
                self.state.phase = Phase::Completed;
                self.state.input.clear();
                self.state.message = None;
                self.state.scroll = 0;
                self.recompute_progress();
                info!(progress = self.state.progress, "curriculum completed");
                Transition::Finished
            }
            EndPolicy::Clamp => {
                self.go_to(from);
                self.state.message = Some(MSG_END.to_string());
                Transition::EndReached
            }
            EndPolicy::Wrap => match self.curriculum.first_position() {
                Some(to) => {
                    self.go_to(to);
                    Transition::Moved { from, to }
                }
                None => self.no_content(),
            },
        }
    }

    fn retreat(&mut self) -> Transition {
        if !matches!(self.state.phase, Phase::Viewing | Phase::Challenging) {
            return Transition::Ignored;
        }
        let Some(from) = self.state.position else {
            return self.no_content();
        };
        let to = self.curriculum.previous_position(from).unwrap_or(from);
        self.go_to(to);
        Transition::Moved { from, to }
    }

    fn submit(&mut self) -> Transition {
        if self.state.phase != Phase::Challenging {
            return Transition::Ignored;
        }
        let Some((pos, topic)) = self.current() else {
            return self.no_content();
        };
        let passed = self
            .registry
            .validate(&topic.validator_id, self.state.input.value());

        if passed {
            if let Err(err) = self.curriculum.mark_completed(pos) {
                error!(%err, "failed to mark topic completed");
            }
            self.state.message = Some(MSG_CORRECT.to_string());
            self.recompute_progress();
            info!(lesson = pos.lesson, topic = pos.topic, "challenge passed");
            Transition::Accepted
        } else {
            self.state.message = Some(MSG_TRY_AGAIN.to_string());
            if self.options.clear_input_on_failure {
                self.state.input.clear();
            }
            Transition::Rejected
        }
    }

    fn edit(&mut self, op: EditOp) -> Transition {
        if self.state.phase != Phase::Challenging {
            return Transition::Ignored;
        }
        self.state.input.apply(op);
        Transition::Edited
    }

    fn scroll(&mut self, f: impl FnOnce(u16) -> u16) -> Transition {
        if self.state.phase != Phase::Viewing {
            return Transition::Ignored;
        }
        let next = f(self.state.scroll);
        self.state.scroll = match self.scroll_limit {
            Some(limit) => next.min(limit),
            None => next,
        };
        Transition::Scrolled
    }

    fn go_to(&mut self, to: CurriculumPosition) {
        self.state.position = Some(to);
        self.state.phase = Phase::Viewing;
        self.state.input.clear();
        self.state.message = None;
        self.state.scroll = 0;
        self.scroll_limit = None;
        self.recompute_progress();
    }

    fn recompute_progress(&mut self) {
        self.state.progress = progress::compute(
            &self.curriculum,
            self.state.position,
            self.options.progress_policy,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::Lesson;

    const STRONG: &str = "Str0ng!Passw0rd#2024";

    fn sample() -> Curriculum {
        Curriculum::new(vec![
            Lesson::new(
                "Passwords",
                vec![
                    Topic::new("Strong", "line one\nline two\nline three")
                        .with_challenge("Type a strong password", "passwordStrength"),
                    Topic::new("Managers", "Use one."),
                ],
            ),
            Lesson::new("Wrap-up", vec![Topic::new("Done", "Bye.")]),
        ])
    }

    fn machine_with(curriculum: Curriculum, options: NavigatorOptions) -> NavigationMachine {
        NavigationMachine::new(curriculum, ValidatorRegistry::builtin(), options)
    }

    fn machine() -> NavigationMachine {
        machine_with(sample(), NavigatorOptions::default())
    }

    fn type_text(m: &mut NavigationMachine, text: &str) {
        for ch in text.chars() {
            m.apply(Intent::Edit(EditOp::Insert(ch)));
        }
    }

    fn pos(lesson: usize, topic: usize) -> Option<CurriculumPosition> {
        Some(CurriculumPosition::new(lesson, topic))
    }

    #[test]
    fn test_starts_in_intro() {
        let m = machine();
        assert_eq!(m.phase(), Phase::Intro);
        assert_eq!(m.state().position, None);
        assert_eq!(m.state().progress, 0.0);
    }

    #[test]
    fn test_start_moves_to_first_topic() {
        let mut m = machine();
        assert_eq!(m.apply(Intent::Start), Transition::Started);
        assert_eq!(m.phase(), Phase::Viewing);
        assert_eq!(m.state().position, pos(0, 0));
        assert_eq!(m.apply(Intent::Start), Transition::Ignored);
    }

    #[test]
    fn test_advance_on_pending_challenge_enters_challenge() {
        let mut m = machine();
        m.apply(Intent::Start);
        assert_eq!(m.apply(Intent::Advance), Transition::EnteredChallenge);
        assert_eq!(m.phase(), Phase::Challenging);
        assert_eq!(m.state().position, pos(0, 0));
        assert!(m.state().input.is_empty());
        assert_eq!(m.state().message, None);
    }

    #[test]
    fn test_advance_in_challenge_before_passing_is_ignored() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        assert_eq!(m.apply(Intent::Advance), Transition::Ignored);
        assert_eq!(m.phase(), Phase::Challenging);
    }

    #[test]
    fn test_correct_answer_marks_completed_without_advancing() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Accepted);
        assert_eq!(m.phase(), Phase::Challenging);
        assert_eq!(m.state().position, pos(0, 0));
        assert_eq!(m.state().message.as_deref(), Some(MSG_CORRECT));
        assert!(m.current_topic().unwrap().is_completed());
        assert!((m.state().progress - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_answer_shows_try_again_and_clears_input() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, "short1!");
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Rejected);
        assert_eq!(m.state().message.as_deref(), Some(MSG_TRY_AGAIN));
        assert_eq!(m.state().position, pos(0, 0));
        assert_eq!(m.phase(), Phase::Challenging);
        assert!(m.state().input.is_empty());
        assert!(!m.current_topic().unwrap().is_completed());
    }

    #[test]
    fn test_wrong_answer_keeps_input_when_configured() {
        let options = NavigatorOptions {
            clear_input_on_failure: false,
            ..NavigatorOptions::default()
        };
        let mut m = machine_with(sample(), options);
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, "weak");
        m.apply(Intent::SubmitAnswer);
        assert_eq!(m.state().input.value(), "weak");
    }

    #[test]
    fn test_default_reject_never_passes() {
        for validator in ["", "notRegistered", "default"] {
            let curriculum = Curriculum::new(vec![Lesson::new(
                "L",
                vec![Topic::new("unconfigured", "").with_challenge("anything?", validator)],
            )]);
            let mut m = machine_with(curriculum, NavigatorOptions::default());
            m.apply(Intent::Start);
            assert_eq!(m.apply(Intent::Advance), Transition::EnteredChallenge);
            for answer in ["", "b", "yes", STRONG] {
                type_text(&mut m, answer);
                assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Rejected, "{validator:?}");
                assert_eq!(m.state().message.as_deref(), Some(MSG_TRY_AGAIN));
            }
            assert!(!m.current_topic().unwrap().is_completed());
            assert_eq!(m.apply(Intent::Advance), Transition::Ignored);
            assert_eq!(m.state().progress, 0.0);
        }
    }

    #[test]
    fn test_advance_after_pass_moves_to_next_topic() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        let t = m.apply(Intent::Advance);
        assert_eq!(
            t,
            Transition::Moved {
                from: CurriculumPosition::new(0, 0),
                to: CurriculumPosition::new(0, 1)
            }
        );
        assert_eq!(m.phase(), Phase::Viewing);
        assert_eq!(m.state().message, None);
        assert!(m.state().input.is_empty());
    }

    #[test]
    fn test_advance_past_last_topic_completes_and_is_idempotent() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Advance);
        m.apply(Intent::Advance);
        assert_eq!(m.state().position, pos(1, 0));
        assert_eq!(m.state().progress, 1.0);

        assert_eq!(m.apply(Intent::Advance), Transition::Finished);
        assert_eq!(m.phase(), Phase::Completed);
        assert_eq!(m.state().progress, 1.0);
        for _ in 0..3 {
            assert_eq!(m.apply(Intent::Advance), Transition::Ignored);
            assert_eq!(m.phase(), Phase::Completed);
        }
        assert_eq!(m.apply(Intent::Retreat), Transition::Ignored);
        assert_eq!(m.phase(), Phase::Completed);
    }

    fn at_last_topic(options: NavigatorOptions) -> NavigationMachine {
        let curriculum = Curriculum::new(vec![Lesson::new(
            "L",
            vec![Topic::new("a", ""), Topic::new("b", "")],
        )]);
        let mut m = machine_with(curriculum, options);
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        m
    }

    #[test]
    fn test_clamp_policy_stays_on_final_topic() {
        let mut m = at_last_topic(NavigatorOptions {
            end_policy: EndPolicy::Clamp,
            ..NavigatorOptions::default()
        });
        assert_eq!(m.apply(Intent::Advance), Transition::EndReached);
        assert_eq!(m.phase(), Phase::Viewing);
        assert_eq!(m.state().position, pos(0, 1));
        assert_eq!(m.state().message.as_deref(), Some(MSG_END));
    }

    #[test]
    fn test_wrap_policy_returns_to_first_topic() {
        let mut m = at_last_topic(NavigatorOptions {
            end_policy: EndPolicy::Wrap,
            ..NavigatorOptions::default()
        });
        m.apply(Intent::Advance);
        assert_eq!(m.phase(), Phase::Viewing);
        assert_eq!(m.state().position, pos(0, 0));
    }

    #[test]
    fn test_retreat_crosses_lessons_and_clamps_at_start() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Advance);
        m.apply(Intent::Advance);
        assert_eq!(m.state().position, pos(1, 0));

        m.apply(Intent::Retreat);
        assert_eq!(m.state().position, pos(0, 1));
        m.apply(Intent::Retreat);
        assert_eq!(m.state().position, pos(0, 0));
        m.apply(Intent::Retreat);
        assert_eq!(m.state().position, pos(0, 0));
        assert_eq!(m.phase(), Phase::Viewing);
    }

    #[test]
    fn test_retreat_from_challenge_abandons_without_penalty() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Retreat);
        assert_eq!(m.phase(), Phase::Viewing);
        assert_eq!(m.state().position, pos(0, 0));
        assert!(m.current_topic().unwrap().is_completed());
    }

    #[test]
    fn test_resubmitting_completed_challenge_is_idempotent() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);

        m.apply(Intent::Edit(EditOp::Clear));
        type_text(&mut m, STRONG);
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Accepted);
        assert!(m.current_topic().unwrap().is_completed());

        m.apply(Intent::Edit(EditOp::Clear));
        type_text(&mut m, "nope");
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Rejected);
        assert!(m.current_topic().unwrap().is_completed());
    }

    #[test]
    fn test_completed_topic_is_skipped_through_on_revisit() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Advance);
        m.apply(Intent::Retreat);
        assert_eq!(m.state().position, pos(0, 0));
        assert_eq!(m.apply(Intent::Advance), Transition::Moved {
            from: CurriculumPosition::new(0, 0),
            to: CurriculumPosition::new(0, 1),
        });
    }

    #[test]
    fn test_retreat_then_advance_restores_challenge_free_position() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Advance);
        m.apply(Intent::Advance);
        let before = (m.phase(), m.state().position, m.state().progress);
        m.apply(Intent::Retreat);
        m.apply(Intent::Advance);
        assert_eq!((m.phase(), m.state().position, m.state().progress), before);
    }

    #[test]
    fn test_submit_outside_challenge_is_ignored() {
        let mut m = machine();
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Ignored);
        m.apply(Intent::Start);
        assert_eq!(m.apply(Intent::SubmitAnswer), Transition::Ignored);
        assert!(!m.curriculum().topic(0, 0).unwrap().is_completed());
    }

    #[test]
    fn test_edits_only_apply_while_challenging() {
        let mut m = machine();
        m.apply(Intent::Start);
        assert_eq!(m.apply(Intent::Edit(EditOp::Insert('x'))), Transition::Ignored);
        m.apply(Intent::Advance);
        assert_eq!(m.apply(Intent::Edit(EditOp::Insert('x'))), Transition::Edited);
        assert_eq!(m.state().input.value(), "x");
    }

    #[test]
    fn test_scroll_only_in_viewing() {
        let mut m = machine();
        assert_eq!(m.apply(Intent::ScrollDown(1)), Transition::Ignored);
        m.apply(Intent::Start);
        assert_eq!(m.apply(Intent::ScrollDown(1)), Transition::Scrolled);
        assert_eq!(m.state().scroll, 1);
        m.apply(Intent::ScrollUp(5));
        assert_eq!(m.state().scroll, 0);
        m.apply(Intent::Advance);
        assert_eq!(m.apply(Intent::ScrollUp(1)), Transition::Ignored);
    }

    #[test]
    fn test_scroll_limit_counts_rendered_rows() {
        let mut m = machine();
        m.apply(Intent::Start);
        // Three source lines can wrap to many more rows than that.
        m.set_scroll_limit(9);
        m.apply(Intent::ScrollDown(100));
        assert_eq!(m.state().scroll, 9);
        m.set_scroll_limit(4);
        assert_eq!(m.state().scroll, 4);
        m.apply(Intent::ScrollUp(1));
        assert_eq!(m.state().scroll, 3);
    }

    #[test]
    fn test_scroll_limit_resets_on_move() {
        let curriculum = Curriculum::new(vec![Lesson::new(
            "L",
            vec![Topic::new("a", "1"), Topic::new("b", "1")],
        )]);
        let mut m = machine_with(curriculum, NavigatorOptions::default());
        m.apply(Intent::Start);
        m.set_scroll_limit(0);
        m.apply(Intent::ScrollDown(3));
        assert_eq!(m.state().scroll, 0);
        m.apply(Intent::Advance);
        assert_eq!(m.scroll_limit(), None);
    }

    #[test]
    fn test_moving_resets_scroll() {
        let curriculum = Curriculum::new(vec![Lesson::new(
            "L",
            vec![Topic::new("a", "1\n2\n3"), Topic::new("b", "1\n2\n3")],
        )]);
        let mut m = machine_with(curriculum, NavigatorOptions::default());
        m.apply(Intent::Start);
        m.apply(Intent::ScrollDown(2));
        m.apply(Intent::Advance);
        assert_eq!(m.state().scroll, 0);
    }

    #[test]
    fn test_empty_curriculum_never_indexes() {
        let mut m = machine_with(Curriculum::empty(), NavigatorOptions::default());
        assert_eq!(m.apply(Intent::Start), Transition::NoContent);
        assert_eq!(m.phase(), Phase::Intro);
        assert_eq!(m.state().message.as_deref(), Some(MSG_NO_CONTENT));
        for intent in [
            Intent::Advance,
            Intent::Retreat,
            Intent::SubmitAnswer,
            Intent::ScrollDown(1),
            Intent::Edit(EditOp::Insert('a')),
        ] {
            m.apply(intent);
            assert_eq!(m.phase(), Phase::Intro);
            assert_eq!(m.state().position, None);
        }
        assert_eq!(m.state().progress, 0.0);
        let snap = m.snapshot();
        assert!(snap.topic.is_none());
        assert_eq!(snap.total_topics, 0);
    }

    #[test]
    fn test_lessons_without_topics_are_skipped() {
        let curriculum = Curriculum::new(vec![
            Lesson::new("Empty", vec![]),
            Lesson::new("Real", vec![Topic::new("only", "")]),
            Lesson::new("Empty again", vec![]),
        ]);
        let mut m = machine_with(curriculum, NavigatorOptions::default());
        m.apply(Intent::Start);
        assert_eq!(m.state().position, pos(1, 0));
        assert_eq!(m.apply(Intent::Advance), Transition::Finished);
    }

    #[test]
    fn test_completed_only_policy_through_machine() {
        let options = NavigatorOptions {
            progress_policy: ProgressPolicy::CompletedOnly,
            ..NavigatorOptions::default()
        };
        let mut m = machine_with(sample(), options);
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        type_text(&mut m, STRONG);
        m.apply(Intent::SubmitAnswer);
        m.apply(Intent::Advance);
        m.apply(Intent::Advance);
        m.apply(Intent::Advance);
        assert_eq!(m.phase(), Phase::Completed);
        assert!((m.state().progress - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut m = machine();
        m.apply(Intent::Start);
        m.apply(Intent::Advance);
        let snap = m.snapshot();
        assert_eq!(snap.phase, Phase::Challenging);
        assert_eq!(snap.lesson_title, Some("Passwords"));
        assert_eq!(snap.topic.map(|t| t.title.as_str()), Some("Strong"));
        assert_eq!(snap.ordinal, Some(0));
        assert_eq!(snap.total_topics, 3);
    }

    #[test]
    fn test_intent_names_do_not_leak_text() {
        assert_eq!(Intent::Edit(EditOp::Insert('p')).name(), "edit");
    }
}
