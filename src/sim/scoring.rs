//! Star rating derived from the move count

use crate::consts::{THREE_STAR_MAX_MOVES, TWO_STAR_MAX_MOVES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StarRating {
    One = 1,
    Two = 2,
    Three = 3,
}

impl StarRating {
    pub fn from_moves(moves: u32) -> Self {
        if moves <= THREE_STAR_MAX_MOVES {
            StarRating::Three
        } else if moves <= TWO_STAR_MAX_MOVES {
            StarRating::Two
        } else {
            StarRating::One
        }
    }

    pub fn count(self) -> u8 {
        self as u8
    }
}
