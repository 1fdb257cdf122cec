use std::ops::{Index, IndexMut};

use crate::{
    board_display::IndexableBoard,
    color::Color,
    coord::Coord,
    piece::{ColoredPieceKind, PieceKind, encode},
};

/// The 64 squares, indexed `[x][y]` with `y = 0` on white's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(pub [[Option<ColoredPieceKind>; 8]; 8]);

impl Grid {
    pub fn empty() -> Self {
        Grid::default()
    }
    pub fn starting_position() -> Self {
        let mut grid = Grid::empty();
        for (x, piece) in (0..).zip(PieceKind::STARTING_CONFIGURATION) {
            grid[Coord::new(x, 0)] = Some(ColoredPieceKind::new(Color::White, piece));
            grid[Coord::new(x, 1)] = Some(ColoredPieceKind::new(Color::White, PieceKind::Pawn));
            grid[Coord::new(x, 6)] = Some(ColoredPieceKind::new(Color::Black, PieceKind::Pawn));
            grid[Coord::new(x, 7)] = Some(ColoredPieceKind::new(Color::Black, piece));
        }
        grid
    }
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, ColoredPieceKind)> + '_ {
        Coord::all().filter_map(|position| self[position].map(|piece| (position, piece)))
    }
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coord, ColoredPieceKind)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }
    pub fn count(&self, color: Color, piece: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, item)| item.is(color, piece))
            .count()
    }
    pub fn has(&self, position: Coord, color: Color, piece: PieceKind) -> bool {
        self[position].is_some_and(|item| item.is(color, piece))
    }
    /// Every square's codec byte, indexed `[x][y]`.
    pub fn encoded(&self) -> [[u8; 8]; 8] {
        self.0.map(|file| file.map(encode))
    }
}
/// Finds the king of `color` by scanning the squares.
pub fn locate_king(grid: &Grid, color: Color) -> Option<Coord> {
    grid.pieces()
        .find(|(_, piece)| piece.is(color, PieceKind::King))
        .map(|(position, _)| position)
}
impl Index<Coord> for Grid {
    type Output = Option<ColoredPieceKind>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.0[index.x() as usize][index.y() as usize]
    }
}
impl IndexMut<Coord> for Grid {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        &mut self.0[index.x() as usize][index.y() as usize]
    }
}
impl IndexableBoard for Grid {
    fn index(&self, position: Coord) -> Option<ColoredPieceKind> {
        self[position]
    }
}
