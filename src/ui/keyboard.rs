//! Keyboard focus movement across the card grid

use crate::consts::{DECK_SIZE, MEDIUM_VIEWPORT, NARROW_VIEWPORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Focus entering the board starts the clock
    Begin,
    Move(Direction),
    /// Open the focused card, or restart from the result panel
    Activate,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Tab" => Some(KeyAction::Begin),
            "ArrowUp" => Some(KeyAction::Move(Direction::Up)),
            "ArrowDown" => Some(KeyAction::Move(Direction::Down)),
            "ArrowLeft" => Some(KeyAction::Move(Direction::Left)),
            "ArrowRight" => Some(KeyAction::Move(Direction::Right)),
            "Enter" => Some(KeyAction::Activate),
            _ => None,
        }
    }
}

/// Cards per row for a viewport width (matches the stylesheet breakpoints)
pub fn columns_for_width(width: f64) -> usize {
    if width < NARROW_VIEWPORT {
        2
    } else if width < MEDIUM_VIEWPORT {
        3
    } else {
        4
    }
}

/// Card index focus moves to. Stays put at the grid edges.
pub fn navigate(current: usize, direction: Direction, columns: usize) -> usize {
    let last = DECK_SIZE - 1;
    match direction {
        Direction::Up => current.checked_sub(columns).unwrap_or(current),
        Direction::Down if current + columns <= last => current + columns,
        Direction::Down => current,
        Direction::Left if current % columns == 0 => current,
        Direction::Left => current - 1,
        Direction::Right if current % columns == columns - 1 || current == last => current,
        Direction::Right => current + 1,
    }
}
