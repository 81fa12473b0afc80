//! Input events consumed by the view loop.
//!
//! Decoupled from the terminal backend so the loop can be driven from
//! tests without a terminal attached.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A discrete user input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Key(Key),
    Resize,
}

/// Key presses the view understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    Esc,
    Home,
    End,
    F(u8),
    /// Ctrl-d / Ctrl-u
    HalfPageDown,
    HalfPageUp,
    /// Ctrl-f / Ctrl-b
    PageDown,
    PageUp,
    CtrlC,
}

/// Map a terminal event to a view event. Events the view has no use for
/// map to `None`.
pub fn map_event(event: CrosstermEvent) -> Option<UiEvent> {
    match event {
        CrosstermEvent::Key(key) => map_key(key).map(UiEvent::Key),
        CrosstermEvent::Resize(_, _) => Some(UiEvent::Resize),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<Key> {
    // Key releases arrive on some platforms; only presses count.
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Key::CtrlC),
            KeyCode::Char('d') => Some(Key::HalfPageDown),
            KeyCode::Char('u') => Some(Key::HalfPageUp),
            KeyCode::Char('f') => Some(Key::PageDown),
            KeyCode::Char('b') => Some(Key::PageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::F(n) => Some(Key::F(n)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_plain_chars_map_through() {
        let event = map_event(press(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(event, Some(UiEvent::Key(Key::Char('q'))));
    }

    #[test]
    fn test_control_chords() {
        assert_eq!(
            map_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UiEvent::Key(Key::CtrlC))
        );
        assert_eq!(
            map_event(press(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(UiEvent::Key(Key::HalfPageDown))
        );
        assert_eq!(
            map_event(press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_releases_are_dropped() {
        let event = CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(event), None);
    }

    #[test]
    fn test_resize_maps_through() {
        assert_eq!(map_event(CrosstermEvent::Resize(80, 24)), Some(UiEvent::Resize));
    }
}
