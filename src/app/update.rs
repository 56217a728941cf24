//! Pure update function for the screen state machine.
//!
//! `update()` takes the current state and an action and returns the next
//! state plus an [`Effect`] describing any collaborator call the controller
//! should make.  No I/O happens here.

use super::state::{Mode, ScreenState};
use crate::config::Action;
use crate::core::item::Item;
use crate::core::layout::LayoutMetrics;

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Refresh,
    /// Archive the item, then refresh.
    Archive { item_id: String },
    /// Delete the item, then refresh.
    Delete { item_id: String },
    Copy { url: String },
    Open { url: String },
    Mail { subject: String, body: String },
    Quit,
}

pub fn update(
    state: ScreenState,
    action: Action,
    metrics: &LayoutMetrics,
    items: &[Item],
) -> (ScreenState, Option<Effect>) {
    if action == Action::Quit {
        return (state, Some(Effect::Quit));
    }

    match state.mode.clone() {
        Mode::Help => (state.with_mode(Mode::Normal), None),
        Mode::ConfirmDelete { item_id, .. } => {
            let state = state.with_mode(Mode::Normal);
            match action {
                Action::ConfirmDelete => (state, Some(Effect::Delete { item_id })),
                _ => (state, None),
            }
        }
        Mode::Normal => update_normal(state, action, metrics, items),
    }
}

fn update_normal(
    state: ScreenState,
    action: Action,
    metrics: &LayoutMetrics,
    items: &[Item],
) -> (ScreenState, Option<Effect>) {
    let n = items.len();
    let selected = state.selected_index(metrics, n).and_then(|i| items.get(i));

    match action {
        Action::MoveDown => (state.move_down(metrics, n), None),
        Action::MoveUp => (state.move_up(), None),
        Action::PrevPage => (state.prev_page(), None),
        Action::NextPage => (state.next_page(metrics), None),
        Action::ToggleHelp => (state.with_mode(Mode::Help), None),
        Action::Refresh => (state, Some(Effect::Refresh)),
        Action::Archive => {
            let effect = selected.map(|item| Effect::Archive {
                item_id: item.id.clone(),
            });
            (state, effect)
        }
        Action::Delete => match selected {
            Some(item) => {
                let mode = Mode::ConfirmDelete {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                };
                (state.with_mode(mode), None)
            }
            None => (state, None),
        },
        Action::Copy => {
            let effect = selected.map(|item| Effect::Copy { url: item.url.clone() });
            (state, effect)
        }
        Action::Open => {
            let effect = selected.map(|item| Effect::Open { url: item.url.clone() });
            (state, effect)
        }
        Action::Mail => {
            let effect = selected.map(|item| Effect::Mail {
                subject: item.title.clone(),
                body: item.url.clone(),
            });
            (state, effect)
        }
        // Modal actions mean nothing outside their mode.
        Action::Dismiss | Action::ConfirmDelete | Action::Cancel | Action::Quit => (state, None),
    }
}
