//! Differential check of the move rules against the `chess` crate.

use chess::MoveGen;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{info, trace};

use crate::{coord::Coord, game::Game, lan::Lan, piece::PieceKind};

/// Games longer than this are abandoned so the walk keeps visiting openings.
const MAX_GAME_LENGTH: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuzzError {
    #[error("{lan} is accepted but the reference rejects it in {fen}")]
    Extra { lan: Lan, fen: String },
    #[error("{lan} is rejected but the reference accepts it in {fen}")]
    Missing { lan: Lan, fen: String },
    #[error("{lan} is listed as legal but could not be played in {fen}")]
    Unplayable { lan: Lan, fen: String },
    #[error("taking back {lan} did not restore {fen}")]
    Undo { lan: Lan, fen: String },
    #[error("after {lan} from {fen}, found {ours} but the reference has {theirs}")]
    Diverged {
        lan: Lan,
        fen: String,
        ours: String,
        theirs: String,
    },
    #[error("the reference refused {fen}: {reason}")]
    Reference { fen: String, reason: String },
}

impl From<chess::Piece> for PieceKind {
    fn from(value: chess::Piece) -> Self {
        match value {
            chess::Piece::Pawn => PieceKind::Pawn,
            chess::Piece::Knight => PieceKind::Knight,
            chess::Piece::Bishop => PieceKind::Bishop,
            chess::Piece::Rook => PieceKind::Rook,
            chess::Piece::Queen => PieceKind::Queen,
            chess::Piece::King => PieceKind::King,
        }
    }
}
impl From<chess::Square> for Coord {
    fn from(value: chess::Square) -> Self {
        Coord::new(
            value.get_file().to_index().try_into().unwrap(),
            value.get_rank().to_index().try_into().unwrap(),
        )
    }
}
impl From<chess::ChessMove> for Lan {
    fn from(value: chess::ChessMove) -> Self {
        Lan {
            origin: value.get_source().into(),
            destination: value.get_dest().into(),
            promotion: value.get_promotion().map(Into::into),
        }
    }
}
fn placement(fen: &str) -> &str {
    fen.split(' ').next().unwrap_or_default()
}
/// Plays `plies` random moves, checking after each one that the legal move
/// set matches the reference generator, that taking the move back restores
/// the exact position, and that both sides agree on the resulting placement.
pub fn fuzz(seed: u64, plies: u32) -> Result<(), FuzzError> {
    let game = Game::new();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game_length = 0;
    info!(seed, plies, "fuzzing");
    for ply in 0..plies {
        let fen = game.fen();
        let reference: chess::Board = fen.parse().map_err(|err| FuzzError::Reference {
            fen: fen.clone(),
            reason: format!("{err:?}"),
        })?;
        let ours: FxHashSet<Lan> = game.legal_moves(game.turn()).into_iter().collect();
        let theirs: FxHashSet<Lan> = MoveGen::new_legal(&reference).map(Into::into).collect();
        if let Some(lan) = ours.difference(&theirs).next() {
            return Err(FuzzError::Extra { lan: *lan, fen });
        }
        if let Some(lan) = theirs.difference(&ours).next() {
            return Err(FuzzError::Missing { lan: *lan, fen });
        }
        if ours.is_empty() || game_length >= MAX_GAME_LENGTH {
            trace!(ply, game_length, "starting over");
            game.reset();
            game_length = 0;
            continue;
        }
        let moves: Box<[_]> = ours.into_iter().collect();
        let lan = moves[rng.random_range(0..moves.len())];

        let before = game.snapshot();
        if !game.play(lan) {
            return Err(FuzzError::Unplayable { lan, fen });
        }
        if !game.undo_last_move() || game.snapshot() != before {
            return Err(FuzzError::Undo { lan, fen });
        }
        if !game.play(lan) {
            return Err(FuzzError::Unplayable { lan, fen });
        }

        let Some(chess_move) =
            MoveGen::new_legal(&reference).find(|movement| Lan::from(*movement) == lan)
        else {
            return Err(FuzzError::Missing { lan, fen });
        };
        let ours = game.fen();
        let theirs = reference.make_move_new(chess_move).to_string();
        if placement(&ours) != placement(&theirs) {
            return Err(FuzzError::Diverged {
                lan,
                fen,
                ours,
                theirs,
            });
        }
        game_length += 1;
        if ply % 10_000 == 0 && ply != 0 {
            info!(ply, "fuzzing");
        }
    }
    Ok(())
}
#[cfg(test)]
mod test {
    use crate::{coord, fuzz::fuzz, lan::Lan, piece::PieceKind};

    #[test]
    fn square_conversion() {
        let square = chess::Square::make_square(chess::Rank::Second, chess::File::E);
        assert_eq!(crate::coord::Coord::from(square), coord!("e2"));
        let promotion = chess::ChessMove::new(
            chess::Square::make_square(chess::Rank::Seventh, chess::File::A),
            chess::Square::make_square(chess::Rank::Eighth, chess::File::A),
            Some(chess::Piece::Knight),
        );
        assert_eq!(
            Lan::from(promotion),
            Lan {
                origin: coord!("a7"),
                destination: coord!("a8"),
                promotion: Some(PieceKind::Knight),
            }
        );
    }
    #[test]
    fn agrees_with_reference() {
        for seed in [1, 2, 3] {
            assert_eq!(fuzz(seed, 400), Ok(()));
        }
    }
}
