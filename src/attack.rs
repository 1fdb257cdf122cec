//! Attack detection, looking outward from the attacked square.

use crate::{
    color::Color,
    coord::{Coord, Vector},
    grid::Grid,
    piece::PieceKind,
};

fn square_contains(grid: &Grid, position: Coord, color: Color, pieces: &[PieceKind]) -> bool {
    grid[position].is_some_and(|piece| piece.color() == color && pieces.contains(&piece.piece()))
}
fn any_step_contains(
    grid: &Grid,
    position: Coord,
    moves: &[Vector],
    color: Color,
    pieces: &[PieceKind],
) -> bool {
    moves
        .iter()
        .filter_map(|movement| position.move_by(*movement))
        .any(|position| square_contains(grid, position, color, pieces))
}
// the first occupied square of each ray decides it
fn any_line_contains(
    grid: &Grid,
    position: Coord,
    directions: &[Vector],
    color: Color,
    pieces: &[PieceKind],
) -> bool {
    directions.iter().any(|direction| {
        position
            .line(*direction)
            .find_map(|position| grid[position])
            .is_some_and(|piece| piece.color() == color && pieces.contains(&piece.piece()))
    })
}
/// Whether a piece of `color` standing on `position` would be attacked by the
/// other side.
pub fn is_attacked(grid: &Grid, position: Coord, color: Color) -> bool {
    let attacker = !color;
    any_line_contains(
        grid,
        position,
        &Vector::ROOK_DIRECTIONS,
        attacker,
        &[PieceKind::Rook, PieceKind::Queen],
    ) || any_line_contains(
        grid,
        position,
        &Vector::BISHOP_DIRECTIONS,
        attacker,
        &[PieceKind::Bishop, PieceKind::Queen],
    ) || any_step_contains(
        grid,
        position,
        &Vector::KNIGHT_MOVES,
        attacker,
        &[PieceKind::Knight],
    )
        // enemy pawns sit one step ahead in the defender's own direction
        || any_step_contains(
            grid,
            position,
            &Vector::pawn_attacks(color),
            attacker,
            &[PieceKind::Pawn],
        )
        || any_step_contains(
            grid,
            position,
            &Vector::KING_MOVES,
            attacker,
            &[PieceKind::King],
        )
}
#[cfg(test)]
mod test {
    use crate::{
        attack::is_attacked,
        color::Color,
        coord,
        grid::Grid,
        piece::{ColoredPieceKind, PieceKind},
    };

    fn place(grid: &mut Grid, square: &str, color: Color, piece: PieceKind) {
        grid[square.parse().unwrap()] = Some(ColoredPieceKind::new(color, piece));
    }
    #[test]
    fn rook_attack_is_blocked_by_first_piece() {
        let mut grid = Grid::empty();
        place(&mut grid, "e8", Color::Black, PieceKind::Rook);
        assert!(is_attacked(&grid, coord!("e1"), Color::White));
        place(&mut grid, "e4", Color::Black, PieceKind::Knight);
        assert!(!is_attacked(&grid, coord!("e1"), Color::White));
    }
    #[test]
    fn bishop_does_not_attack_orthogonally() {
        let mut grid = Grid::empty();
        place(&mut grid, "e8", Color::Black, PieceKind::Bishop);
        assert!(!is_attacked(&grid, coord!("e1"), Color::White));
        assert!(is_attacked(&grid, coord!("a4"), Color::White));
    }
    #[test]
    fn own_pieces_never_attack() {
        let mut grid = Grid::empty();
        place(&mut grid, "d2", Color::White, PieceKind::Queen);
        assert!(!is_attacked(&grid, coord!("e1"), Color::White));
        assert!(is_attacked(&grid, coord!("e1"), Color::Black));
    }
    #[test]
    fn pawns_attack_diagonally_forward_only() {
        let mut grid = Grid::empty();
        place(&mut grid, "d5", Color::Black, PieceKind::Pawn);
        assert!(is_attacked(&grid, coord!("e4"), Color::White));
        assert!(is_attacked(&grid, coord!("c4"), Color::White));
        assert!(!is_attacked(&grid, coord!("d4"), Color::White));
        assert!(!is_attacked(&grid, coord!("e6"), Color::White));

        place(&mut grid, "g2", Color::White, PieceKind::Pawn);
        assert!(is_attacked(&grid, coord!("h3"), Color::Black));
        assert!(!is_attacked(&grid, coord!("h1"), Color::Black));
    }
    #[test]
    fn knights_jump() {
        let mut grid = Grid::starting_position();
        place(&mut grid, "f3", Color::Black, PieceKind::Knight);
        assert!(is_attacked(&grid, coord!("e1"), Color::White));
        assert!(is_attacked(&grid, coord!("g1"), Color::White));
        assert!(!is_attacked(&grid, coord!("f1"), Color::White));
    }
    #[test]
    fn kings_guard_adjacent_squares() {
        let mut grid = Grid::empty();
        place(&mut grid, "e5", Color::Black, PieceKind::King);
        assert!(is_attacked(&grid, coord!("e4"), Color::White));
        assert!(is_attacked(&grid, coord!("f4"), Color::White));
        assert!(!is_attacked(&grid, coord!("e3"), Color::White));
    }
}
