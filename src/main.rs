// Re-declares the module tree of lib.rs. Some items are only reached from
// tests and the beacon server, so suppress dead_code warnings here too.
#![allow(dead_code)]

mod app;
mod config;
mod curriculum;
mod engine;
mod event;
mod session;
mod telemetry;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, BeaconStatus};
use config::Config;
use curriculum::loader::{self, CurriculumSource};
use engine::{ProgressPolicy, ValidatorRegistry};
use event::{AppEvent, BackgroundEvent, EventHandler};
use session::{EndPolicy, Phase};
use ui::components::challenge_view::ChallengeView;
use ui::components::progress_bar::ProgressBar;
use ui::components::splash::{CompletionScreen, IntroScreen};
use ui::components::topic_view::TopicView;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "shellhacked",
    version,
    about = "Terminal quiz on passwords, phishing and privacy"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_name = "DIR", help = "Load lessons from a directory of YAML files")]
    lessons: Option<PathBuf>,

    #[arg(long, value_enum, help = "How progress is counted")]
    progress_policy: Option<ProgressPolicy>,

    #[arg(long, value_enum, help = "What happens after the last topic")]
    end_policy: Option<EndPolicy>,

    #[arg(long, help = "Send the device beacon on startup")]
    beacon: bool,

    #[arg(long, value_name = "URL", help = "Beacon endpoint")]
    beacon_url: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(dir) = self.lessons {
            config.lessons_dir = Some(dir);
        }
        if let Some(policy) = self.progress_policy {
            config.progress_policy = policy;
        }
        if let Some(policy) = self.end_policy {
            config.end_policy = policy;
        }
        if self.beacon {
            config.beacon_enabled = true;
        }
        if let Some(url) = self.beacon_url {
            config.beacon_url = url;
        }
        config.validate();
    }
}

fn init_logging() -> Result<PathBuf> {
    let path = Config::log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env("SHELLHACKED_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("Logging disabled: {err:#}");
    }

    let mut config = Config::load()?;
    cli.apply(&mut config);
    info!(
        theme = %config.theme,
        progress_policy = config.progress_policy.as_str(),
        end_policy = config.end_policy.as_str(),
        beacon = config.beacon_enabled,
        "starting"
    );

    let curriculum = loader::load(&CurriculumSource::from_dir(config.lessons_dir.clone()))?;
    let registry = ValidatorRegistry::builtin();
    loader::warn_unresolved(&curriculum, &registry);

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "theme not found, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, curriculum, registry, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.handle_resize(size.width, size.height);

    let events = EventHandler::new(Duration::from_millis(app.config.tick_rate_ms));
    if app.config.beacon_enabled {
        let tx = events.sender();
        telemetry::beacon::spawn(app.config.beacon_url.clone(), move |outcome| {
            let _ = tx.send(AppEvent::Background(BackgroundEvent::Beacon(outcome)));
        });
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!("exiting");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(w, h) => app.handle_resize(w, h),
            AppEvent::Background(event) => app.handle_background(event),
        }

        if let Some(url) = app.take_summary_request() {
            let tx = events.sender();
            telemetry::summary::spawn_fetch(url, move |result| {
                let _ = tx.send(AppEvent::Background(BackgroundEvent::Summary(result)));
            });
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.phase() {
        Phase::Intro => render_intro(frame, app),
        Phase::Viewing | Phase::Challenging => render_session(frame, app),
        Phase::Completed => render_completed(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let snapshot = app.controller.machine().snapshot();

    let mut spans = vec![Span::styled(
        " ShellHacked ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(title) = snapshot.lesson_title {
        spans.push(Span::styled(
            format!(" {title} "),
            Style::default().fg(colors.fg()).bg(colors.header_bg()),
        ));
    }
    let beacon = match app.beacon {
        BeaconStatus::Off => None,
        BeaconStatus::Sending => Some(("● beacon…", colors.warning())),
        BeaconStatus::Delivered => Some(("● beacon sent", colors.success())),
        BeaconStatus::Failed => Some(("● beacon failed", colors.error())),
    };
    if let Some((text, color)) = beacon {
        spans.push(Span::styled(
            format!(" {text} "),
            Style::default().fg(color).bg(colors.header_bg()),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let hints: &[&str] = match app.phase() {
        Phase::Intro => &["Enter start", "q quit"],
        Phase::Viewing => &["← → navigate", "↑↓ scroll", "q quit"],
        Phase::Challenging => &["Enter submit", "Alt+← → move cursor", "← back", "Ctrl+C quit"],
        Phase::Completed => &["Enter exit"],
    };
    let lines = pack_hint_lines(hints, area.width as usize);
    let text = lines.first().cloned().unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(app.theme.colors.text_dim()),
    )));
    frame.render_widget(footer, area);
}

fn render_intro(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let snapshot = app.controller.machine().snapshot();

    render_header(frame, app, layout.header);
    let screen = IntroScreen {
        total_topics: snapshot.total_topics,
        notice: snapshot.message,
        theme: app.theme,
    };
    frame.render_widget(screen, centered_rect(70, 60, layout.main));
    render_footer(frame, app, layout.footer);
}

fn render_session(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let snapshot = app.controller.machine().snapshot();

    render_header(frame, app, layout.header);

    if let Some(topic) = snapshot.topic {
        if snapshot.phase == Phase::Challenging {
            let view = ChallengeView::new(topic, snapshot.input, snapshot.message, app.theme);
            frame.render_widget(view, layout.main);
        } else {
            let lesson_title = snapshot.lesson_title.unwrap_or_default();
            let view = TopicView::new(topic, lesson_title, snapshot.scroll, app.theme);
            frame.render_widget(view, layout.main);
            if let Some(msg) = snapshot.message {
                let row = ratatui::layout::Rect::new(
                    layout.main.x + 2,
                    layout.main.bottom().saturating_sub(2),
                    layout.main.width.saturating_sub(4),
                    1,
                );
                let note = Paragraph::new(Span::styled(
                    msg,
                    Style::default().fg(app.theme.colors.warning()),
                ));
                frame.render_widget(note, row);
            }
        }
    }

    if let Some(progress_area) = layout.progress {
        let mut bar = ProgressBar::new(app.progress.displayed(), app.theme);
        if let Some(ordinal) = snapshot.ordinal {
            bar = bar.with_position(ordinal, snapshot.total_topics);
        }
        frame.render_widget(bar, progress_area);
    }

    render_footer(frame, app, layout.footer);
}

fn render_completed(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header);
    let screen = CompletionScreen {
        progress: app.controller.machine().state().progress,
        summary: app.summary.state(),
        theme: app.theme,
    };
    frame.render_widget(screen, centered_rect(80, 70, layout.main));
    render_footer(frame, app, layout.footer);
}
