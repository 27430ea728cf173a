use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::Duration;

use crate::app::App;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Mouse event
    Mouse(MouseEvent),
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Mouse(m) => return Ok(Event::Mouse(m)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Parse a binding such as `q`, `ctrl-t`, `alt-enter` or `pagedown`.
pub fn parse_binding(binding: &str) -> Option<(KeyModifiers, KeyCode)> {
    let binding = binding.trim();
    let (mods, key) = match binding.rsplit_once('-') {
        Some((mods, key)) if !key.is_empty() && !mods.is_empty() => (mods, key),
        _ => ("", binding),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.split('-').filter(|p| !p.is_empty()) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let code = match key.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((modifiers, code))
}

/// Whether `key` triggers `binding`. Shift is only checked when the binding asks for it,
/// since shifted characters already arrive as their own char.
pub fn key_matches(binding: &str, key: &KeyEvent) -> bool {
    let Some((modifiers, code)) = parse_binding(binding) else {
        return false;
    };
    let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
    if key.modifiers & relevant != modifiers & relevant {
        return false;
    }
    if modifiers.contains(KeyModifiers::SHIFT) && !key.modifiers.contains(KeyModifiers::SHIFT) {
        return false;
    }
    match (code, key.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) if modifiers.contains(KeyModifiers::CONTROL) => {
            a.eq_ignore_ascii_case(&b)
        }
        (a, b) => a == b,
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Help screen takes precedence
    if app.help_open {
        match key.code {
            KeyCode::Esc => app.close_help(),
            _ if key_matches(&app.config.keymap.help, &key) => app.close_help(),
            _ => {}
        }
        return;
    }

    if app.confirming_delete() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return;
    }

    if app.search_open {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => app.close_search(),
            KeyCode::Backspace => app.backspace_search_query(),
            KeyCode::Char(c) => {
                // Allow AltGr combinations (CONTROL+ALT) for special characters
                if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                    app.update_search_query(c);
                }
            }
            _ => {}
        }
        return;
    }

    // --- Global key handlers ---
    let keymap = app.config.keymap.clone();
    if key_matches(&keymap.quit, &key) {
        app.quit();
    } else if key_matches(&keymap.help, &key) {
        app.open_help();
    } else if key_matches(&keymap.search, &key) {
        app.open_search();
    } else if key_matches(&keymap.cycle_sort, &key) {
        app.cycle_sort();
    } else if key_matches(&keymap.cycle_category, &key) {
        app.cycle_category();
    } else if key_matches(&keymap.clear_filters, &key) {
        app.clear_filters();
    } else if key_matches(&keymap.cursor_up, &key) {
        app.move_cursor_up();
    } else if key_matches(&keymap.cursor_down, &key) {
        app.move_cursor_down();
    } else if key_matches(&keymap.next_page, &key) {
        app.next_page();
    } else if key_matches(&keymap.prev_page, &key) {
        app.prev_page();
    } else if key_matches(&keymap.open_note, &key) {
        app.open_selected();
    } else if key_matches(&keymap.like, &key) {
        app.like_selected();
    } else if key_matches(&keymap.delete, &key) {
        app.initiate_delete();
    }
}

/// Handle mouse events for the application
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.move_cursor_up(),
        MouseEventKind::ScrollDown => app.move_cursor_down(),
        _ => {}
    }
}
