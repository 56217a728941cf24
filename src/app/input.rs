//! Input handling: maps key events to logical actions for the active mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::Mode;
use crate::config::{Action, Bindings};

/// Resolve a key event against the current mode.
///
/// * Normal: binding table lookup; unbound keys yield `None`.
/// * Help: every key press closes the help screen.
/// * ConfirmDelete: `y` confirms, anything else cancels.
///
/// Ctrl+C quits from every mode.
pub fn dispatch(bindings: &Bindings, mode: &Mode, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(key) {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Normal => bindings.match_key(key),
        Mode::Help => Some(Action::Dismiss),
        Mode::ConfirmDelete { .. } => {
            let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            if plain && key.code == KeyCode::Char('y') {
                Some(Action::ConfirmDelete)
            } else {
                Some(Action::Cancel)
            }
        }
    }
}

fn is_interrupt(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    fn confirm_mode() -> Mode {
        Mode::ConfirmDelete {
            item_id: "1".into(),
            title: "t".into(),
        }
    }

    #[test]
    fn normal_mode_honours_aliases() {
        let b = Bindings::default();
        let cases = [
            (KeyCode::Char('q'), Action::Quit),
            (KeyCode::Esc, Action::Quit),
            (KeyCode::Char('?'), Action::ToggleHelp),
            (KeyCode::Char('j'), Action::MoveDown),
            (KeyCode::Down, Action::MoveDown),
            (KeyCode::Char('k'), Action::MoveUp),
            (KeyCode::Up, Action::MoveUp),
            (KeyCode::Char('h'), Action::PrevPage),
            (KeyCode::Left, Action::PrevPage),
            (KeyCode::PageUp, Action::PrevPage),
            (KeyCode::Char('l'), Action::NextPage),
            (KeyCode::Right, Action::NextPage),
            (KeyCode::PageDown, Action::NextPage),
            (KeyCode::Char('r'), Action::Refresh),
            (KeyCode::F(5), Action::Refresh),
            (KeyCode::Char('a'), Action::Archive),
            (KeyCode::Char('e'), Action::Archive),
            (KeyCode::Char('d'), Action::Delete),
            (KeyCode::Char('x'), Action::Delete),
            (KeyCode::Char('c'), Action::Copy),
            (KeyCode::Char('o'), Action::Open),
            (KeyCode::Enter, Action::Open),
            (KeyCode::Char('m'), Action::Mail),
        ];
        for (code, action) in cases {
            assert_eq!(dispatch(&b, &Mode::Normal, key(code)), Some(action), "{code:?}");
        }
        assert_eq!(dispatch(&b, &Mode::Normal, key(KeyCode::Char('z'))), None);
        assert_eq!(dispatch(&b, &Mode::Normal, key(KeyCode::Char('J'))), None);
    }

    #[test]
    fn help_mode_turns_every_key_into_dismiss() {
        let b = Bindings::default();
        for code in [KeyCode::Char('q'), KeyCode::Char('j'), KeyCode::Char('?'), KeyCode::Esc] {
            assert_eq!(dispatch(&b, &Mode::Help, key(code)), Some(Action::Dismiss));
        }
    }

    #[test]
    fn only_y_confirms_a_delete() {
        let b = Bindings::default();
        let mode = confirm_mode();
        assert_eq!(dispatch(&b, &mode, key(KeyCode::Char('y'))), Some(Action::ConfirmDelete));
        for code in [KeyCode::Char('Y'), KeyCode::Char('n'), KeyCode::Char('d'), KeyCode::Enter] {
            assert_eq!(dispatch(&b, &mode, key(code)), Some(Action::Cancel), "{code:?}");
        }
        assert_eq!(dispatch(&b, &mode, ctrl('y')), Some(Action::Cancel));
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let b = Bindings::default();
        for mode in [Mode::Normal, Mode::Help, confirm_mode()] {
            assert_eq!(dispatch(&b, &mode, ctrl('c')), Some(Action::Quit));
        }
    }

    #[test]
    fn key_releases_are_ignored() {
        let b = Bindings::default();
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            ..key(KeyCode::Char('j'))
        };
        assert_eq!(dispatch(&b, &Mode::Normal, release), None);
        assert_eq!(dispatch(&b, &Mode::Help, release), None);
    }
}
