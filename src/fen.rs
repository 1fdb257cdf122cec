use std::{
    fmt::{self, Display, Formatter},
    iter::Peekable,
    num::ParseIntError,
    str::FromStr,
};

use thiserror::Error;

use crate::{
    board::Board,
    castling::{CastlingRights, InvalidCastlingCharacter},
    color::{Color, ParseColorError},
    coord::{Coord, ParseCoordError},
    grid::Grid,
    piece::{ColoredPieceKind, InvalidFenPiece, PieceKind},
};

/// A position in Forsyth-Edwards notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fen(pub Board);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFenError {
    #[error("expected 2 to 6 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks")]
    RankCount,
    #[error("not enough squares on a rank")]
    NotEnoughSquaresOnRank,
    #[error("exceeding squares on a rank")]
    ExceedingSquaresOnRank,
    #[error(transparent)]
    InvalidPiece(#[from] InvalidFenPiece),
    #[error(transparent)]
    InvalidSideToMove(#[from] ParseColorError),
    #[error(transparent)]
    InvalidCastling(#[from] InvalidCastlingCharacter),
    #[error(transparent)]
    InvalidEnPassantTarget(#[from] ParseCoordError),
    #[error("{0} cannot be an en passant target")]
    ImpossibleEnPassantTarget(Coord),
    #[error(transparent)]
    InvalidClock(#[from] ParseIntError),
    #[error("expected exactly one {0} king, found {1}")]
    KingCount(Color, usize),
}
fn parse_placement(placement: &str) -> Result<Grid, ParseFenError> {
    let mut grid = Grid::empty();
    let mut ranks = 0;
    for (rank, y) in placement.split('/').zip((0..8).rev()) {
        ranks += 1;
        let mut x: u8 = 0;
        for c in rank.chars() {
            if let '1'..='8' = c {
                x += c as u8 - b'0';
            } else {
                let piece = ColoredPieceKind::from_fen(c)?;
                let position =
                    Coord::new_checked(x, y).ok_or(ParseFenError::ExceedingSquaresOnRank)?;
                grid[position] = Some(piece);
                x += 1;
            }
            if x > 8 {
                return Err(ParseFenError::ExceedingSquaresOnRank);
            }
        }
        if x < 8 {
            return Err(ParseFenError::NotEnoughSquaresOnRank);
        }
    }
    if ranks != 8 || placement.split('/').count() != 8 {
        return Err(ParseFenError::RankCount);
    }
    for color in Color::ALL {
        let kings = grid.count(color, PieceKind::King);
        if kings != 1 {
            return Err(ParseFenError::KingCount(color, kings));
        }
    }
    Ok(grid)
}
impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split_whitespace().collect();
        let [placement, side, rest @ ..] = fields.as_slice() else {
            return Err(ParseFenError::FieldCount(fields.len()));
        };
        if rest.len() > 4 {
            return Err(ParseFenError::FieldCount(fields.len()));
        }
        let grid = parse_placement(placement)?;
        let current_player: Color = side.parse()?;
        let castling_rights = match rest.first() {
            Some(field) => field.parse()?,
            None => CastlingRights::all(),
        };
        let imported_en_passant = match rest.get(1) {
            None | Some(&"-") => None,
            Some(field) => {
                let target: Coord = field.parse()?;
                // the target sits behind a pawn that just double-stepped
                let expected = match current_player {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if target.y() != expected {
                    return Err(ParseFenError::ImpossibleEnPassantTarget(target));
                }
                Some(target)
            }
        };
        let half_move = rest.get(2).map_or(Ok(0), |field| field.parse::<u16>())?;
        let full_move = rest.get(3).map_or(Ok(1), |field| field.parse::<u16>())?;

        let mut board = Board {
            grid,
            current_player,
            castling_rights,
            history: Vec::new(),
            imported_en_passant,
            half_move,
            full_move,
        };
        board.sanitize_castling_rights();
        Ok(Fen(board))
    }
}
struct EmptyRun<I: Iterator<Item = Option<ColoredPieceKind>>>(Peekable<I>);

impl<I> Iterator for EmptyRun<I>
where
    I: Iterator<Item = Option<ColoredPieceKind>>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.next()? {
            Some(piece) => Some(piece.fen()),
            None => {
                let mut count = 1;
                while self.0.next_if(Option::is_none).is_some() {
                    count += 1;
                }
                char::from_digit(count, 10)
            }
        }
    }
}
impl Display for Fen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let board = &self.0;
        for y in (0..8).rev() {
            let rank = (0..8).map(|x| board.grid[Coord::new(x, y)]);
            for c in EmptyRun(rank.peekable()) {
                write!(f, "{c}")?;
            }
            if y != 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {}", board.current_player.lowercase())?;
        write!(f, " {}", board.castling_rights)?;
        if let Some(position) = board.en_passant_target() {
            write!(f, " {position}")?;
        } else {
            write!(f, " -")?;
        }
        write!(f, " {} {}", board.half_move, board.full_move)?;
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        castling::CastlingRights,
        color::Color,
        coord,
        fen::{Fen, ParseFenError},
        piece::PieceKind,
    };

    const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn starting_position_both_ways() {
        let Fen(board) = STARTING.parse().unwrap();
        assert_eq!(board, Board::starting_position());
        assert_eq!(Fen(Board::starting_position()).to_string(), STARTING);
    }
    #[test]
    fn ranks_map_top_down() {
        let Fen(board) = "4k3/8/8/8/8/8/8/R3K3 b Q - 3 20".parse().unwrap();
        assert!(board.grid().has(coord!("a1"), Color::White, PieceKind::Rook));
        assert!(board.grid().has(coord!("e8"), Color::Black, PieceKind::King));
        assert_eq!(board.current_player(), Color::Black);
        assert_eq!(board.half_move(), 3);
        assert_eq!(board.full_move(), 20);
        assert_eq!(
            Fen(board).to_string(),
            "4k3/8/8/8/8/8/8/R3K3 b Q - 3 20"
        );
    }
    #[test]
    fn missing_castling_field_derives_from_home_squares() {
        let Fen(board) = "r3k3/8/8/8/8/8/8/4K2R w".parse().unwrap();
        assert_eq!(board.castling_rights().to_string(), "Kq");
    }
    #[test]
    fn castling_rights_without_their_pieces_are_dropped() {
        let Fen(board) = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ1BNK w KQkq"
            .parse()
            .unwrap();
        assert_eq!(board.castling_rights().to_string(), "kq");
        let Fen(board) = "4k3/8/8/8/8/8/8/4K3 w -".parse().unwrap();
        assert_eq!(board.castling_rights(), CastlingRights::none());
    }
    #[test]
    fn en_passant_target_is_kept() {
        let Fen(board) = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2".parse().unwrap();
        assert_eq!(board.en_passant_target(), Some(coord!("d6")));
        assert!(board.history().is_empty());
        assert_eq!(
            "4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 2".parse::<Fen>(),
            Err(ParseFenError::ImpossibleEnPassantTarget(coord!("d3")))
        );
    }
    #[test]
    fn malformed_input() {
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K3".parse::<Fen>(),
            Err(ParseFenError::FieldCount(1))
        );
        assert_eq!(
            "4k3/8/8/8/8/8/4K3 w".parse::<Fen>(),
            Err(ParseFenError::RankCount)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K2 w".parse::<Fen>(),
            Err(ParseFenError::NotEnoughSquaresOnRank)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K4 w".parse::<Fen>(),
            Err(ParseFenError::ExceedingSquaresOnRank)
        );
        assert!("4k3/8/8/8/8/8/8/4X3 w".parse::<Fen>().is_err());
        assert!("4k3/8/8/8/8/8/8/4K3 x".parse::<Fen>().is_err());
        assert!("4k3/8/8/8/8/8/8/4K3 w KX".parse::<Fen>().is_err());
        assert!("4k3/8/8/8/8/8/8/4K3 w - - a 1".parse::<Fen>().is_err());
    }
    #[test]
    fn exactly_one_king_each() {
        assert_eq!(
            "8/8/8/8/8/8/8/4K3 w".parse::<Fen>(),
            Err(ParseFenError::KingCount(Color::Black, 0))
        );
        assert_eq!(
            "kk6/8/8/8/8/8/8/4K3 w".parse::<Fen>(),
            Err(ParseFenError::KingCount(Color::Black, 2))
        );
    }
}
