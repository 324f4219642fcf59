use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tracing::debug;

use crate::config::Config;
use crate::curriculum::Curriculum;
use crate::engine::{ProgressAnimator, ValidatorRegistry};
use crate::event::BackgroundEvent;
use crate::session::{Flow, Intent, NavigationMachine, Phase, SessionController};
use crate::telemetry::SummaryCache;
use crate::ui::components::topic_view::TopicView;
use crate::ui::layout::AppLayout;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeaconStatus {
    Off,
    Sending,
    Delivered,
    Failed,
}

pub struct App {
    pub controller: SessionController,
    pub theme: &'static Theme,
    pub config: Config,
    pub progress: ProgressAnimator,
    pub summary: SummaryCache,
    pub beacon: BeaconStatus,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        curriculum: Curriculum,
        registry: ValidatorRegistry,
        theme: &'static Theme,
    ) -> Self {
        let machine = NavigationMachine::new(curriculum, registry, config.navigator_options());
        let beacon = if config.beacon_enabled {
            BeaconStatus::Sending
        } else {
            BeaconStatus::Off
        };
        Self {
            controller: SessionController::new(machine),
            theme,
            summary: SummaryCache::new(config.summary_url.clone()),
            config,
            progress: ProgressAnimator::new(),
            beacon,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.machine().phase()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.controller.handle_key(key) == Flow::Quit {
            self.should_quit = true;
        }
        self.sync_progress_target();
        self.sync_scroll_limit();
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.controller.handle_intent(Intent::Resize(width, height));
        self.sync_scroll_limit();
    }

    pub fn handle_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Beacon(outcome) => {
                self.beacon = if outcome.is_ok() {
                    BeaconStatus::Delivered
                } else {
                    BeaconStatus::Failed
                };
            }
            BackgroundEvent::Summary(result) => self.summary.resolve(result),
        }
    }

    /// Advances the progress bar animation by one frame.
    pub fn on_tick(&mut self) {
        self.sync_progress_target();
        self.progress.tick();
    }

    /// The summary url to fetch, once, after the session completes.
    pub fn take_summary_request(&mut self) -> Option<String> {
        if self.phase() != Phase::Completed {
            return None;
        }
        let url = self.summary.begin();
        if let Some(url) = &url {
            debug!(%url, "requesting completion summary");
        }
        url
    }

    /// Bounds content scrolling by the wrapped row count of the current topic
    /// in the last known viewport.
    fn sync_scroll_limit(&mut self) {
        let (width, height) = self.controller.viewport();
        if width == 0 || height == 0 {
            return;
        }
        let snapshot = self.controller.machine().snapshot();
        if snapshot.phase != Phase::Viewing {
            return;
        }
        let Some(topic) = snapshot.topic else {
            return;
        };
        let main = AppLayout::new(Rect::new(0, 0, width, height)).main;
        let lesson_title = snapshot.lesson_title.unwrap_or_default();
        let limit = TopicView::new(topic, lesson_title, 0, self.theme).max_scroll(main);
        self.controller.set_scroll_limit(limit);
    }

    fn sync_progress_target(&mut self) {
        let target = self.controller.machine().state().progress;
        self.progress.set_target(target);
    }
}
