use std::fmt::{self, Display, Formatter};

use crate::color::Color;

/// How a game ends once the side to move has no legal move left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    Checkmate { winner: Color },
    Stalemate,
}
impl EndState {
    /// Outcome for `stuck`, the side to move without any legal move.
    pub fn for_stuck_player(stuck: Color, in_check: bool) -> Self {
        if in_check {
            EndState::Checkmate { winner: !stuck }
        } else {
            EndState::Stalemate
        }
    }
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Checkmate { winner } => write!(f, "checkmate, {winner} wins")?,
            EndState::Stalemate => write!(f, "stalemate, draw")?,
        }
        Ok(())
    }
}
