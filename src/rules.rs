//! Per-piece movement rules and the self-check gate every move goes through.

use thiserror::Error;

use crate::{
    attack::is_attacked,
    board::Board,
    castling::{CastlingSide, king_origin},
    color::Color,
    coord::{Coord, Vector, pawn_home_rank, pawn_promotion_rank},
    grid::{Grid, locate_king},
    piece::{ColoredPieceKind, PieceKind},
    record::{MoveKind, MoveRecord},
};

/// Why a move was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Illegal {
    #[error("no piece on {0}")]
    Empty(Coord),
    #[error("it is {0}'s turn")]
    NotYourTurn(Color),
    #[error("a {0} cannot move that way")]
    Shape(PieceKind),
    #[error("the path is blocked")]
    Blocked,
    #[error("the destination holds a piece of the same color")]
    OwnPiece,
    #[error("kings cannot be captured")]
    KingCapture,
    #[error("no en passant capture is available")]
    NoEnPassant,
    #[error("cannot promote to a {0}")]
    InvalidPromotion(PieceKind),
    #[error("the castling right is gone")]
    NoCastlingRight,
    #[error("cannot castle out of, through, or into check")]
    CastlingThroughCheck,
    #[error("the move leaves the king in check")]
    SelfCheck,
}

fn record(
    board: &Board,
    moved: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
    kind: MoveKind,
) -> MoveRecord {
    MoveRecord {
        origin,
        destination,
        moved,
        captured: board.grid[destination],
        kind,
        castling_rights: board.castling_rights,
        half_move: board.half_move,
    }
}
fn destination_open(grid: &Grid, destination: Coord, color: Color) -> Result<(), Illegal> {
    match grid[destination] {
        None => Ok(()),
        Some(piece) if piece.color() == color => Err(Illegal::OwnPiece),
        Some(piece) if piece.piece() == PieceKind::King => Err(Illegal::KingCapture),
        Some(_) => Ok(()),
    }
}
fn pawn_move(
    board: &Board,
    piece: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
    promotion: Option<PieceKind>,
) -> Result<MoveRecord, Illegal> {
    let grid = &board.grid;
    let color = piece.color();
    let difference = destination - origin;
    let kind = if difference == Vector::pawn_single_move(color) {
        if grid[destination].is_some() {
            return Err(Illegal::Blocked);
        }
        MoveKind::Normal
    } else if difference == Vector::pawn_double_move(color) {
        if origin.y() != pawn_home_rank(color) {
            return Err(Illegal::Shape(PieceKind::Pawn));
        }
        let passed = origin
            .move_by(Vector::pawn_single_move(color))
            .ok_or(Illegal::Shape(PieceKind::Pawn))?;
        if grid[passed].is_some() || grid[destination].is_some() {
            return Err(Illegal::Blocked);
        }
        MoveKind::DoubleStep
    } else if difference.is_pawn_attack(color) {
        if grid[destination].is_some() {
            destination_open(grid, destination, color)?;
            MoveKind::Normal
        } else {
            // the captured pawn sits beside the mover, not on the destination
            let captured_at = Coord::new(destination.x(), origin.y());
            if board.en_passant_target() != Some(destination)
                || !grid.has(captured_at, !color, PieceKind::Pawn)
            {
                return Err(Illegal::NoEnPassant);
            }
            MoveKind::EnPassant { captured_at }
        }
    } else {
        return Err(Illegal::Shape(PieceKind::Pawn));
    };
    let kind = if destination.y() == pawn_promotion_rank(color) {
        let choice = promotion.unwrap_or(PieceKind::Queen);
        if !choice.is_promotion_choice() {
            return Err(Illegal::InvalidPromotion(choice));
        }
        MoveKind::Promotion(choice)
    } else {
        kind
    };
    Ok(record(board, piece, origin, destination, kind))
}
fn knight_move(
    board: &Board,
    piece: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
) -> Result<MoveRecord, Illegal> {
    if !(destination - origin).is_knight_move() {
        return Err(Illegal::Shape(PieceKind::Knight));
    }
    destination_open(&board.grid, destination, piece.color())?;
    Ok(record(board, piece, origin, destination, MoveKind::Normal))
}
fn sliding_move(
    board: &Board,
    piece: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
    directions: &[Vector],
) -> Result<MoveRecord, Illegal> {
    let Some(mut between) = origin.is_aligned(destination, directions) else {
        return Err(Illegal::Shape(piece.piece()));
    };
    if between.any(|position| board.grid[position].is_some()) {
        return Err(Illegal::Blocked);
    }
    destination_open(&board.grid, destination, piece.color())?;
    Ok(record(board, piece, origin, destination, MoveKind::Normal))
}
fn king_move(
    board: &Board,
    piece: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
) -> Result<MoveRecord, Illegal> {
    let difference = destination - origin;
    if difference.y == 0 && difference.x.unsigned_abs() == 2 {
        castling(board, piece, origin, destination)
    } else if difference.is_king_move() {
        destination_open(&board.grid, destination, piece.color())?;
        Ok(record(board, piece, origin, destination, MoveKind::Normal))
    } else {
        Err(Illegal::Shape(PieceKind::King))
    }
}
fn castling(
    board: &Board,
    piece: ColoredPieceKind,
    origin: Coord,
    destination: Coord,
) -> Result<MoveRecord, Illegal> {
    let grid = &board.grid;
    let color = piece.color();
    let side = CastlingSide::from_king_destination(origin.x(), destination.x());
    if origin != king_origin(color) || destination != side.king_destination(color) {
        return Err(Illegal::Shape(PieceKind::King));
    }
    let rook_origin = side.rook_origin(color);
    if !board.castling_rights.get(color, side) || !grid.has(rook_origin, color, PieceKind::Rook)
    {
        return Err(Illegal::NoCastlingRight);
    }
    let step = (destination - origin).as_unit();
    if origin
        .line_exclusive_exclusive(rook_origin, step)
        .any(|position| grid[position].is_some())
    {
        return Err(Illegal::Blocked);
    }
    if is_attacked(grid, origin, color) {
        return Err(Illegal::CastlingThroughCheck);
    }
    // walk the king one square at a time on a scratch copy
    let mut scratch = *grid;
    let mut position = origin;
    while position != destination {
        let next = position
            .move_by(step)
            .ok_or(Illegal::Shape(PieceKind::King))?;
        scratch[next] = scratch[position].take();
        position = next;
        if is_attacked(&scratch, position, color) {
            return Err(Illegal::CastlingThroughCheck);
        }
    }
    Ok(record(board, piece, origin, destination, MoveKind::Castle(side)))
}
/// Checks the movement rules of the piece on `origin`, ignoring whether its
/// own king ends up in check.
pub fn pseudo_legal(
    board: &Board,
    origin: Coord,
    destination: Coord,
    promotion: Option<PieceKind>,
) -> Result<MoveRecord, Illegal> {
    let piece = board.grid[origin].ok_or(Illegal::Empty(origin))?;
    if origin == destination {
        return Err(Illegal::Shape(piece.piece()));
    }
    match piece.piece() {
        PieceKind::Pawn => pawn_move(board, piece, origin, destination, promotion),
        PieceKind::Knight => knight_move(board, piece, origin, destination),
        PieceKind::Bishop => {
            sliding_move(board, piece, origin, destination, &Vector::BISHOP_DIRECTIONS)
        }
        PieceKind::Rook => sliding_move(board, piece, origin, destination, &Vector::ROOK_DIRECTIONS),
        PieceKind::Queen => {
            sliding_move(board, piece, origin, destination, &Vector::QUEEN_DIRECTIONS)
        }
        PieceKind::King => king_move(board, piece, origin, destination),
    }
}
/// Applies `record` to a copy of the grid and reports whether the mover's
/// king survives it.
pub fn passes_self_check(board: &Board, record: MoveRecord) -> bool {
    let color = record.moved.color();
    let grid = record.applied_to(&board.grid);
    let king = locate_king(&grid, color)
        .unwrap_or_else(|| panic!("the board has no {color} king:\n{grid:?}"));
    !is_attacked(&grid, king, color)
}
/// A fully legal move for whoever owns the piece on `origin`, turn order
/// aside.
pub fn validate(
    board: &Board,
    origin: Coord,
    destination: Coord,
    promotion: Option<PieceKind>,
) -> Result<MoveRecord, Illegal> {
    let record = pseudo_legal(board, origin, destination, promotion)?;
    if passes_self_check(board, record) {
        Ok(record)
    } else {
        Err(Illegal::SelfCheck)
    }
}
fn line_destinations<'a>(
    grid: &'a Grid,
    origin: Coord,
    directions: &'static [Vector],
) -> impl Iterator<Item = Coord> + 'a {
    directions.iter().flat_map(move |direction| {
        let mut resume = true;
        origin.line(*direction).take_while(move |position| {
            let take = resume;
            resume = grid[*position].is_none();
            take
        })
    })
}
fn step_destinations(origin: Coord, moves: &'static [Vector]) -> impl Iterator<Item = Coord> {
    moves
        .iter()
        .filter_map(move |movement| origin.move_by(*movement))
}
/// Squares worth trying for the piece on `origin`; a superset of its legal
/// destinations.
pub fn candidate_destinations<'a>(
    grid: &'a Grid,
    origin: Coord,
    piece: ColoredPieceKind,
) -> Box<dyn Iterator<Item = Coord> + 'a> {
    static CASTLING_MOVES: [Vector; 2] = [Vector { x: -2, y: 0 }, Vector { x: 2, y: 0 }];
    match piece.piece() {
        PieceKind::Pawn => {
            let color = piece.color();
            Box::new(
                [
                    Vector::pawn_single_move(color),
                    Vector::pawn_double_move(color),
                ]
                .into_iter()
                .chain(Vector::pawn_attacks(color))
                .filter_map(move |movement| origin.move_by(movement)),
            )
        }
        PieceKind::Knight => Box::new(step_destinations(origin, &Vector::KNIGHT_MOVES)),
        PieceKind::Bishop => Box::new(line_destinations(grid, origin, &Vector::BISHOP_DIRECTIONS)),
        PieceKind::Rook => Box::new(line_destinations(grid, origin, &Vector::ROOK_DIRECTIONS)),
        PieceKind::Queen => Box::new(line_destinations(grid, origin, &Vector::QUEEN_DIRECTIONS)),
        PieceKind::King => Box::new(
            step_destinations(origin, &Vector::KING_MOVES)
                .chain(step_destinations(origin, &CASTLING_MOVES)),
        ),
    }
}
/// Every legal move of `color`, each promotion choice counted separately.
pub fn legal_moves(board: &Board, color: Color) -> impl Iterator<Item = MoveRecord> + '_ {
    static PROMOTION_CHOICES: [Option<PieceKind>; 4] = [
        Some(PieceKind::Queen),
        Some(PieceKind::Rook),
        Some(PieceKind::Bishop),
        Some(PieceKind::Knight),
    ];
    static NON_PROMOTION_CHOICES: [Option<PieceKind>; 1] = [None];
    board
        .grid
        .pieces_of(color)
        .flat_map(move |(origin, piece)| {
            candidate_destinations(&board.grid, origin, piece).flat_map(move |destination| {
                let choices: &[_] = if piece.piece() == PieceKind::Pawn
                    && destination.y() == pawn_promotion_rank(color)
                {
                    &PROMOTION_CHOICES
                } else {
                    &NON_PROMOTION_CHOICES
                };
                choices
                    .iter()
                    .filter_map(move |promotion| validate(board, origin, destination, *promotion).ok())
            })
        })
}
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    legal_moves(board, color).next().is_some()
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        color::Color,
        coord,
        fen::Fen,
        piece::PieceKind,
        record::MoveKind,
        rules::{Illegal, legal_moves, validate},
    };

    fn board(fen: &str) -> Board {
        let Fen(board) = fen.parse().unwrap();
        board
    }
    fn check(board: &Board, lan: &str) -> Result<MoveKind, Illegal> {
        let lan: crate::lan::Lan = lan.parse().unwrap();
        validate(board, lan.origin, lan.destination, lan.promotion).map(|record| record.kind)
    }
    #[test]
    fn starting_position_has_twenty_moves() {
        let board = Board::starting_position();
        assert_eq!(legal_moves(&board, Color::White).count(), 20);
        assert_eq!(legal_moves(&board, Color::Black).count(), 20);
    }
    #[test]
    fn pawn_steps() {
        let board = Board::starting_position();
        assert_eq!(check(&board, "e2e4"), Ok(MoveKind::DoubleStep));
        assert_eq!(check(&board, "e2e3"), Ok(MoveKind::Normal));
        assert_eq!(check(&board, "e2e5"), Err(Illegal::Shape(PieceKind::Pawn)));
        assert_eq!(check(&board, "e2d3"), Err(Illegal::NoEnPassant));
        assert_eq!(check(&board, "e7e6"), Ok(MoveKind::Normal));
        assert_eq!(check(&board, "e7e8"), Err(Illegal::Shape(PieceKind::Pawn)));
    }
    #[test]
    fn pawns_never_move_backward() {
        let board = board("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(check(&board, "e4e3"), Err(Illegal::Shape(PieceKind::Pawn)));
        assert_eq!(check(&board, "e4e5"), Ok(MoveKind::Normal));
    }
    #[test]
    fn double_step_needs_both_squares_empty() {
        let board = board("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert_eq!(check(&board, "e2e4"), Err(Illegal::Blocked));
        assert_eq!(check(&board, "e2e3"), Err(Illegal::Blocked));
        let board = self::board("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(check(&board, "e2e4"), Err(Illegal::Blocked));
        assert_eq!(check(&board, "e2e3"), Ok(MoveKind::Normal));
    }
    #[test]
    fn en_passant_from_imported_target() {
        let board = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(
            check(&board, "e5d6"),
            Ok(MoveKind::EnPassant {
                captured_at: coord!("d5")
            })
        );
        let board = self::board("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert_eq!(check(&board, "e5d6"), Err(Illegal::NoEnPassant));
    }
    #[test]
    fn en_passant_exposing_the_king_is_illegal() {
        // both pawns leave the fifth rank, opening it to the rook
        let board = board("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 1");
        assert_eq!(check(&board, "e5d6"), Err(Illegal::SelfCheck));
    }
    #[test]
    fn promotion_defaults_to_queen_and_rejects_king() {
        let board = board("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(
            check(&board, "e7e8"),
            Ok(MoveKind::Promotion(PieceKind::Queen))
        );
        assert_eq!(
            check(&board, "e7e8n"),
            Ok(MoveKind::Promotion(PieceKind::Knight))
        );
        assert_eq!(
            check(&board, "e7e8k"),
            Err(Illegal::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(
            check(&board, "e7e8p"),
            Err(Illegal::InvalidPromotion(PieceKind::Pawn))
        );
        assert_eq!(legal_moves(&board, Color::White).count(), 4 + 5);
    }
    #[test]
    fn sliders_stop_at_blockers() {
        let board = board("4k3/8/8/8/8/2p5/8/B3K2R w - - 0 1");
        assert_eq!(check(&board, "a1c3"), Ok(MoveKind::Normal));
        assert_eq!(check(&board, "a1d4"), Err(Illegal::Blocked));
        assert_eq!(check(&board, "a1a2"), Err(Illegal::Shape(PieceKind::Bishop)));
        assert_eq!(check(&board, "h1h8"), Ok(MoveKind::Normal));
        assert_eq!(check(&board, "h1e1"), Err(Illegal::OwnPiece));
        assert_eq!(check(&board, "h1f1"), Ok(MoveKind::Normal));
        assert_eq!(check(&board, "h1g2"), Err(Illegal::Shape(PieceKind::Rook)));
    }
    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let board = board("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert_eq!(check(&board, "e2c3"), Err(Illegal::SelfCheck));
        assert!(
            legal_moves(&board, Color::White).all(|record| record.origin != coord!("e2"))
        );
    }
    #[test]
    fn kings_cannot_touch() {
        let board = board("8/8/8/4k3/8/4K3/8/8 w - - 0 1");
        assert_eq!(check(&board, "e3e4"), Err(Illegal::SelfCheck));
        assert_eq!(check(&board, "e3e2"), Ok(MoveKind::Normal));
    }
    fn perft(board: &mut Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves: Vec<_> = legal_moves(board, board.current_player()).collect();
        let mut nodes = 0;
        for record in moves {
            let before = board.clone();
            board.commit(record);
            nodes += perft(board, depth - 1);
            board.undo();
            assert_eq!(*board, before, "taking back {record}");
        }
        nodes
    }
    #[test]
    fn move_tree_counts_and_undo() {
        for (fen, depth, nodes) in [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3, 8902),
            (
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                2,
                2039,
            ),
            (
                "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
                2,
                264,
            ),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3, 2812),
        ] {
            let mut board = board(fen);
            assert_eq!(perft(&mut board, depth), nodes, "{fen}");
        }
    }
    #[test]
    fn kings_cannot_be_captured() {
        let board = board("8/8/8/8/8/8/3k4/3QK3 w - - 0 1");
        assert_eq!(check(&board, "d1d2"), Err(Illegal::KingCapture));
    }
}
