use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected(),
        // Chevron folding works regardless of the click behavior.
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),

        KeyCode::Char('r') => app.reset_collapse_state(),
        KeyCode::Char('w') => app.toggle_watcher(),
        _ => {}
    }
}

/// Handle a mouse event: wheel scrolls the selection, left click selects
/// and activates the row under the cursor.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = app.row_at(mouse.column, mouse.row) {
                app.selected_index = index;
                app.activate_selected();
            }
        }
        _ => {}
    }
}
