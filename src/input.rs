//! Terminal input to game commands
//!
//! Mouse positions are reported in terminal cells. The pointer is taken to be
//! the center of the cell under the mouse, in the same coordinate space the
//! board is laid out in.

use crate::pointer::Point;
use crate::ui::PlayLayout;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

/// What the player asked for during play
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayInput {
    Grab { slot: usize, pointer: Point },
    Move(Point),
    Release(Point),
    /// Drop the dragged shape back into the dock
    Cancel,
    /// Leave the session
    Back,
    /// Anything else; dismisses the game-over screen
    Other,
}

/// Center of the terminal cell under the mouse
pub fn mouse_point(mouse: &MouseEvent) -> Point {
    Point::new(mouse.column as f32 + 0.5, mouse.row as f32 + 0.5)
}

/// Translate a mouse event against the current layout
pub fn translate_mouse(mouse: MouseEvent, layout: &PlayLayout) -> Option<PlayInput> {
    let pointer = mouse_point(&mouse);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let slot = layout.dock_slot_at(mouse.column, mouse.row);
            Some(match slot {
                Some(slot) => PlayInput::Grab { slot, pointer },
                None => PlayInput::Other,
            })
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => Some(PlayInput::Move(pointer)),
        MouseEventKind::Up(MouseButton::Left) => Some(PlayInput::Release(pointer)),
        MouseEventKind::Down(MouseButton::Right) => Some(PlayInput::Cancel),
        _ => None,
    }
}

/// Translate a key press
pub fn translate_key(key: KeyEvent) -> PlayInput {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => PlayInput::Back,
        KeyCode::Backspace => PlayInput::Cancel,
        _ => PlayInput::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::play_layout;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_press_on_dock_grabs_slot() {
        let layout = play_layout(Rect::new(0, 0, 80, 30));
        let slot = layout.dock[2];
        let event = mouse(MouseEventKind::Down(MouseButton::Left), slot.x + 1, slot.y + 1);
        assert_eq!(
            translate_mouse(event, &layout),
            Some(PlayInput::Grab {
                slot: 2,
                pointer: Point::new(slot.x as f32 + 1.5, slot.y as f32 + 1.5)
            })
        );
    }

    #[test]
    fn test_press_elsewhere_is_not_a_grab() {
        let layout = play_layout(Rect::new(0, 0, 80, 30));
        let event = mouse(MouseEventKind::Down(MouseButton::Left), 0, 0);
        assert_eq!(translate_mouse(event, &layout), Some(PlayInput::Other));
    }

    #[test]
    fn test_drag_and_release() {
        let layout = play_layout(Rect::new(0, 0, 80, 30));
        let moved = translate_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 4), &layout);
        assert_eq!(moved, Some(PlayInput::Move(Point::new(10.5, 4.5))));
        let released = translate_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, 4), &layout);
        assert_eq!(released, Some(PlayInput::Release(Point::new(10.5, 4.5))));
        assert_eq!(translate_mouse(mouse(MouseEventKind::ScrollUp, 1, 1), &layout), None);
    }

    #[test]
    fn test_keys() {
        assert_eq!(translate_key(KeyEvent::from(KeyCode::Esc)), PlayInput::Back);
        assert_eq!(translate_key(KeyEvent::from(KeyCode::Backspace)), PlayInput::Cancel);
        assert_eq!(translate_key(KeyEvent::from(KeyCode::Enter)), PlayInput::Other);
    }
}
