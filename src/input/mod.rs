use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::AppState;

/// Actions that can result from key input.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    Generate,
    Export,
    Quit,
}

/// Process a key event and return the resulting action.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> InputAction {
    match (key.modifiers, key.code) {
        // Ctrl+C / Esc → quit
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => InputAction::Quit,
        // Ctrl+S → save current image
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => InputAction::Export,

        // Enter → press the Generate button, which is disabled while loading
        (_, KeyCode::Enter) => {
            if state.loading {
                InputAction::None
            } else {
                InputAction::Generate
            }
        }

        (_, KeyCode::Backspace) => {
            if state.cursor_pos > 0 {
                let cursor = state.cursor_pos;
                let edited = remove_char_at(&state.prompt, cursor - 1);
                state.cursor_pos -= 1;
                state.set_prompt(edited);
            }
            InputAction::None
        }

        (_, KeyCode::Delete) => {
            if state.cursor_pos < state.prompt.chars().count() {
                let edited = remove_char_at(&state.prompt, state.cursor_pos);
                state.set_prompt(edited);
            }
            InputAction::None
        }

        (_, KeyCode::Left) => {
            state.cursor_pos = state.cursor_pos.saturating_sub(1);
            InputAction::None
        }

        (_, KeyCode::Right) => {
            if state.cursor_pos < state.prompt.chars().count() {
                state.cursor_pos += 1;
            }
            InputAction::None
        }

        // Home / Ctrl+A
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            state.cursor_pos = 0;
            InputAction::None
        }

        // End / Ctrl+E
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            state.cursor_pos = state.prompt.chars().count();
            InputAction::None
        }

        (_, KeyCode::Up) => {
            state.history_up();
            InputAction::None
        }

        (_, KeyCode::Down) => {
            state.history_down();
            InputAction::None
        }

        // Ctrl+U → clear prompt
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            state.cursor_pos = 0;
            state.set_prompt(String::new());
            InputAction::None
        }

        // Ctrl+W → delete word backwards
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            if state.cursor_pos > 0 {
                let before: String = state.prompt.chars().take(state.cursor_pos).collect();
                let new_end = before
                    .trim_end()
                    .rfind(' ')
                    .map(|i| before[..=i].chars().count())
                    .unwrap_or(0);
                let after: String = state.prompt.chars().skip(state.cursor_pos).collect();
                let kept: String = state.prompt.chars().take(new_end).collect();
                state.cursor_pos = new_end;
                state.set_prompt(format!("{}{}", kept, after));
            }
            InputAction::None
        }

        // Regular character (Shift is fine, other chords are ignored)
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let byte_idx = byte_index(&state.prompt, state.cursor_pos);
            let mut edited = state.prompt.clone();
            edited.insert(byte_idx, c);
            state.set_prompt(edited);
            state.cursor_pos += 1;
            InputAction::None
        }

        _ => InputAction::None,
    }
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn remove_char_at(text: &str, char_pos: usize) -> String {
    let start = byte_index(text, char_pos);
    let end = byte_index(text, char_pos + 1);
    let mut edited = text.to_string();
    edited.replace_range(start..end, "");
    edited
}
