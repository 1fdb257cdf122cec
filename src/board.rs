use tracing::trace;

use crate::{
    attack::is_attacked,
    castling::{CastlingRights, CastlingSide, king_origin},
    color::Color,
    coord::Coord,
    grid::{Grid, locate_king},
    piece::PieceKind,
    record::MoveRecord,
};

/// Everything that makes up a position plus the moves that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) grid: Grid,
    pub(crate) current_player: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) history: Vec<MoveRecord>,
    // en passant target carried over from an imported position; only
    // consulted while the history is empty
    pub(crate) imported_en_passant: Option<Coord>,
    pub(crate) half_move: u16,
    pub(crate) full_move: u16,
}
impl Board {
    pub fn starting_position() -> Self {
        Board {
            grid: Grid::starting_position(),
            current_player: Color::White,
            castling_rights: CastlingRights::all(),
            history: Vec::new(),
            imported_en_passant: None,
            half_move: 0,
            full_move: 1,
        }
    }
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn current_player(&self) -> Color {
        self.current_player
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }
    pub fn half_move(&self) -> u16 {
        self.half_move
    }
    pub fn full_move(&self) -> u16 {
        self.full_move
    }
    /// The square a pawn may capture onto en passant, decided by the
    /// immediately preceding move alone.
    pub fn en_passant_target(&self) -> Option<Coord> {
        match self.history.last() {
            Some(record) => record.en_passant_target(),
            None => self.imported_en_passant,
        }
    }
    /// Locates the king of `color`.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king. Every reachable position holds exactly
    /// one king per side, so a missing one is a broken invariant.
    pub fn king(&self, color: Color) -> Coord {
        locate_king(&self.grid, color)
            .unwrap_or_else(|| panic!("the board has no {color} king:\n{:?}", self.grid))
    }
    pub fn is_check(&self, color: Color) -> bool {
        is_attacked(&self.grid, self.king(color), color)
    }
    /// Drops the castling rights whose king or rook has left its home square.
    pub(crate) fn sanitize_castling_rights(&mut self) {
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if !self.grid.has(king_origin(color), color, PieceKind::King)
                    || !self
                        .grid
                        .has(side.rook_origin(color), color, PieceKind::Rook)
                {
                    self.castling_rights.remove(color, side);
                }
            }
        }
    }
    pub(crate) fn commit(&mut self, record: MoveRecord) {
        record.apply(&mut self.grid);

        let color = record.moved.color();
        if record.moved.piece() == PieceKind::King {
            self.castling_rights.clear(color);
        }
        self.castling_rights.remove_for_corner(record.origin);
        self.castling_rights.remove_for_corner(record.destination);

        if record.moved.piece() == PieceKind::Pawn || record.is_capture() {
            self.half_move = 0;
        } else {
            self.half_move = self.half_move.saturating_add(1);
        }
        if color == Color::Black {
            self.full_move = self.full_move.saturating_add(1);
        }
        self.current_player = !self.current_player;
        self.history.push(record);
        trace!(%record, "committed");
    }
    pub(crate) fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        record.revert(&mut self.grid);
        self.castling_rights = record.castling_rights;
        self.half_move = record.half_move;
        if record.moved.color() == Color::Black {
            self.full_move = self.full_move.saturating_sub(1);
        }
        self.current_player = record.moved.color();
        trace!(%record, "undone");
        Some(record)
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}
