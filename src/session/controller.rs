use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::input::EditOp;
use crate::session::navigation::{Intent, NavigationMachine, Phase, Transition};

const PAGE_LINES: u16 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Translates terminal keys into intents for the current phase.
pub fn map_key(phase: Phase, key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    match phase {
        Phase::Intro => match key.code {
            KeyCode::Enter | KeyCode::Right => Some(Intent::Start),
            KeyCode::Esc | KeyCode::Char('q') => Some(Intent::Quit),
            _ => None,
        },
        Phase::Viewing => match key.code {
            KeyCode::Enter | KeyCode::Right => Some(Intent::Advance),
            KeyCode::Left => Some(Intent::Retreat),
            KeyCode::Up => Some(Intent::ScrollUp(1)),
            KeyCode::Down => Some(Intent::ScrollDown(1)),
            KeyCode::PageUp => Some(Intent::ScrollUp(PAGE_LINES)),
            KeyCode::PageDown => Some(Intent::ScrollDown(PAGE_LINES)),
            KeyCode::Esc | KeyCode::Char('q') => Some(Intent::Quit),
            _ => None,
        },
        Phase::Challenging => match key.code {
            KeyCode::Enter => Some(Intent::SubmitAnswer),
            KeyCode::Left if alt => Some(Intent::Edit(EditOp::CursorLeft)),
            KeyCode::Right if alt => Some(Intent::Edit(EditOp::CursorRight)),
            KeyCode::Char('b') if ctrl => Some(Intent::Edit(EditOp::CursorLeft)),
            KeyCode::Char('f') if ctrl => Some(Intent::Edit(EditOp::CursorRight)),
            KeyCode::Right => Some(Intent::Advance),
            KeyCode::Left | KeyCode::Esc => Some(Intent::Retreat),
            KeyCode::Backspace => Some(Intent::Edit(EditOp::Backspace)),
            KeyCode::Delete => Some(Intent::Edit(EditOp::Delete)),
            KeyCode::Home => Some(Intent::Edit(EditOp::Home)),
            KeyCode::End => Some(Intent::Edit(EditOp::End)),
            KeyCode::Char('u') if ctrl => Some(Intent::Edit(EditOp::Clear)),
            KeyCode::Char('w') if ctrl => Some(Intent::Edit(EditOp::DeleteWordBack)),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(ch) => Some(Intent::Edit(EditOp::Insert(ch))),
            _ => None,
        },
        Phase::Completed => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => Some(Intent::Quit),
            _ => None,
        },
    }
}

/// Owns the navigation machine and feeds it terminal input.
pub struct SessionController {
    machine: NavigationMachine,
    viewport: (u16, u16),
    last_transition: Transition,
}

impl SessionController {
    pub fn new(machine: NavigationMachine) -> Self {
        Self {
            machine,
            viewport: (0, 0),
            last_transition: Transition::Ignored,
        }
    }

    pub fn machine(&self) -> &NavigationMachine {
        &self.machine
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn last_transition(&self) -> Transition {
        self.last_transition
    }

    pub fn set_scroll_limit(&mut self, limit: u16) {
        self.machine.set_scroll_limit(limit);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match map_key(self.machine.phase(), key) {
            Some(intent) => self.handle_intent(intent),
            None => Flow::Continue,
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::Quit => Flow::Quit,
            Intent::Resize(width, height) => {
                self.viewport = (width, height);
                Flow::Continue
            }
            intent => {
                self.last_transition = self.machine.apply(intent);
                Flow::Continue
            }
        }
    }
}
