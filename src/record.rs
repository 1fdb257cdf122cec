use std::fmt::{self, Display, Formatter};

use crate::{
    castling::{CastlingRights, CastlingSide},
    coord::{Coord, Vector},
    grid::Grid,
    lan::Lan,
    piece::{ColoredPieceKind, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoubleStep,
    EnPassant { captured_at: Coord },
    Castle(CastlingSide),
    Promotion(PieceKind),
}

/// One applied move, with everything needed to take it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub origin: Coord,
    pub destination: Coord,
    /// Content of the origin square before the move.
    pub moved: ColoredPieceKind,
    /// Content of the destination square before the move.
    pub captured: Option<ColoredPieceKind>,
    pub kind: MoveKind,
    /// Castling rights in force before the move.
    pub castling_rights: CastlingRights,
    pub half_move: u16,
}
impl MoveRecord {
    /// The square a pawn passed over if this was a double step.
    pub fn en_passant_target(self) -> Option<Coord> {
        if self.kind == MoveKind::DoubleStep {
            self.origin
                .move_by(Vector::pawn_single_move(self.moved.color()))
        } else {
            None
        }
    }
    pub fn is_capture(self) -> bool {
        self.captured.is_some() || matches!(self.kind, MoveKind::EnPassant { .. })
    }
    pub fn apply(self, grid: &mut Grid) {
        grid[self.origin] = None;
        grid[self.destination] = Some(self.moved);
        match self.kind {
            MoveKind::Normal | MoveKind::DoubleStep => (),
            MoveKind::EnPassant { captured_at } => grid[captured_at] = None,
            MoveKind::Castle(side) => {
                let color = self.moved.color();
                grid[side.rook_destination(color)] = grid[side.rook_origin(color)].take();
            }
            MoveKind::Promotion(piece) => {
                grid[self.destination] = Some(ColoredPieceKind::new(self.moved.color(), piece));
            }
        }
    }
    pub fn revert(self, grid: &mut Grid) {
        grid[self.origin] = Some(self.moved);
        grid[self.destination] = self.captured;
        match self.kind {
            MoveKind::Normal | MoveKind::DoubleStep | MoveKind::Promotion(_) => (),
            MoveKind::EnPassant { captured_at } => {
                grid[captured_at] = Some(ColoredPieceKind::new(
                    !self.moved.color(),
                    PieceKind::Pawn,
                ));
            }
            MoveKind::Castle(side) => {
                let color = self.moved.color();
                grid[side.rook_origin(color)] = grid[side.rook_destination(color)].take();
            }
        }
    }
    pub fn applied_to(self, grid: &Grid) -> Grid {
        let mut new = *grid;
        self.apply(&mut new);
        new
    }
    pub fn as_lan(self) -> Lan {
        Lan {
            origin: self.origin,
            destination: self.destination,
            promotion: match self.kind {
                MoveKind::Promotion(piece) => Some(piece),
                _ => None,
            },
        }
    }
}
impl Display for MoveRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.moved, self.as_lan())?;
        if let Some(captured) = self.captured {
            write!(f, " takes {captured}")?;
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{
        castling::{CastlingRights, CastlingSide},
        color::Color,
        coord,
        grid::Grid,
        piece::{ColoredPieceKind, PieceKind},
        record::{MoveKind, MoveRecord},
    };

    fn record(origin: &str, destination: &str, grid: &Grid, kind: MoveKind) -> MoveRecord {
        let origin = origin.parse().unwrap();
        let destination = destination.parse().unwrap();
        MoveRecord {
            origin,
            destination,
            moved: grid[origin].unwrap(),
            captured: grid[destination],
            kind,
            castling_rights: CastlingRights::all(),
            half_move: 0,
        }
    }
    #[test]
    fn castling_moves_and_restores_the_rook() {
        let mut grid = Grid::starting_position();
        grid[coord!("f1")] = None;
        grid[coord!("g1")] = None;
        let before = grid;
        let castle = record("e1", "g1", &grid, MoveKind::Castle(CastlingSide::Kingside));
        castle.apply(&mut grid);
        assert!(grid.has(coord!("g1"), Color::White, PieceKind::King));
        assert!(grid.has(coord!("f1"), Color::White, PieceKind::Rook));
        assert_eq!(grid[coord!("h1")], None);
        castle.revert(&mut grid);
        assert_eq!(grid, before);
    }
    #[test]
    fn en_passant_restores_the_pawn_beside_the_destination() {
        let mut grid = Grid::empty();
        grid[coord!("e5")] = Some(ColoredPieceKind::new(Color::White, PieceKind::Pawn));
        grid[coord!("d5")] = Some(ColoredPieceKind::new(Color::Black, PieceKind::Pawn));
        let before = grid;
        let capture = record(
            "e5",
            "d6",
            &grid,
            MoveKind::EnPassant {
                captured_at: coord!("d5"),
            },
        );
        capture.apply(&mut grid);
        assert_eq!(grid[coord!("d5")], None);
        assert!(grid.has(coord!("d6"), Color::White, PieceKind::Pawn));
        capture.revert(&mut grid);
        assert_eq!(grid, before);
    }
    #[test]
    fn double_step_exposes_the_passed_square() {
        let grid = Grid::starting_position();
        let step = record("c7", "c5", &grid, MoveKind::DoubleStep);
        assert_eq!(step.en_passant_target(), Some(coord!("c6")));
        let single = record("c7", "c6", &grid, MoveKind::Normal);
        assert_eq!(single.en_passant_target(), None);
    }
}
