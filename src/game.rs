use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    board::Board,
    castling::CastlingRights,
    color::Color,
    coord::Coord,
    end_state::EndState,
    fen::{Fen, ParseFenError},
    lan::Lan,
    piece::PieceKind,
    record::MoveRecord,
    rules::{self, Illegal},
};

/// A single game of chess.
///
/// All operations take `&self`. Each one locks the board once, so a `Game`
/// can be shared between threads while every query still sees a consistent
/// position.
#[derive(Debug, Default)]
pub struct Game {
    board: Mutex<Board>,
}
impl Game {
    pub fn new() -> Self {
        Game::default()
    }
    pub fn from_board(board: Board) -> Self {
        Game {
            board: Mutex::new(board),
        }
    }
    pub fn from_fen(fen: &str) -> Result<Self, ParseFenError> {
        let Fen(board) = fen.parse()?;
        Ok(Game::from_board(board))
    }
    /// Plays a move given as raw coordinates, `y = 0` being white's back
    /// rank. Returns whether the move was legal and applied.
    ///
    /// `promotion` only matters when a pawn reaches its last rank, where
    /// `None` means a queen.
    pub fn move_piece(
        &self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        promotion: Option<PieceKind>,
    ) -> bool {
        let (Some(origin), Some(destination)) =
            (Coord::from_xy(from_x, from_y), Coord::from_xy(to_x, to_y))
        else {
            debug!(from_x, from_y, to_x, to_y, "rejected move off the board");
            return false;
        };
        self.play(Lan {
            origin,
            destination,
            promotion,
        })
    }
    pub fn play(&self, lan: Lan) -> bool {
        let mut board = self.board.lock();
        match try_play(&mut board, lan) {
            Ok(_) => true,
            Err(reason) => {
                debug!(%lan, %reason, "rejected move");
                false
            }
        }
    }
    pub fn is_check(&self, color: Color) -> bool {
        self.board.lock().is_check(color)
    }
    /// Whether `color` is in check with no legal move, regardless of whose
    /// turn it is.
    pub fn is_mate(&self, color: Color) -> bool {
        let board = self.board.lock();
        board.is_check(color) && !rules::has_legal_move(&board, color)
    }
    pub fn is_stalemate(&self, color: Color) -> bool {
        let board = self.board.lock();
        !board.is_check(color) && !rules::has_legal_move(&board, color)
    }
    /// The result of the game if the side to move is out of moves.
    pub fn status(&self) -> Option<EndState> {
        let board = self.board.lock();
        let player = board.current_player();
        (!rules::has_legal_move(&board, player))
            .then(|| EndState::for_stuck_player(player, board.is_check(player)))
    }
    pub fn undo_last_move(&self) -> bool {
        if let Some(record) = self.board.lock().undo() {
            debug!(%record, "took back");
            true
        } else {
            warn!("nothing to undo");
            false
        }
    }
    /// Replaces the whole position. On error the current game is left
    /// untouched.
    pub fn load_from_fen(&self, fen: &str) -> Result<(), ParseFenError> {
        let Fen(board) = fen.parse()?;
        self.load(board);
        Ok(())
    }
    pub fn load(&self, board: Board) {
        info!(fen = %Fen(board.clone()), "loaded position");
        *self.board.lock() = board;
    }
    pub fn reset(&self) {
        *self.board.lock() = Board::starting_position();
        info!("reset to the starting position");
    }
    /// Every square as its codec byte, indexed `[x][y]`.
    pub fn squares(&self) -> [[u8; 8]; 8] {
        self.board.lock().grid().encoded()
    }
    pub fn turn(&self) -> Color {
        self.board.lock().current_player()
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.board.lock().castling_rights()
    }
    pub fn history(&self) -> Vec<MoveRecord> {
        self.board.lock().history().to_vec()
    }
    pub fn fen(&self) -> String {
        Fen(self.board.lock().clone()).to_string()
    }
    pub fn legal_moves(&self, color: Color) -> Vec<Lan> {
        let board = self.board.lock();
        rules::legal_moves(&board, color)
            .map(MoveRecord::as_lan)
            .collect()
    }
    /// A copy of the current position.
    pub fn snapshot(&self) -> Board {
        self.board.lock().clone()
    }
}
fn try_play(board: &mut Board, lan: Lan) -> Result<MoveRecord, Illegal> {
    let piece = board.grid()[lan.origin].ok_or(Illegal::Empty(lan.origin))?;
    if piece.color() != board.current_player() {
        return Err(Illegal::NotYourTurn(board.current_player()));
    }
    let record = rules::validate(board, lan.origin, lan.destination, lan.promotion)?;
    board.commit(record);
    Ok(record)
}
