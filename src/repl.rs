use std::{
    fmt::{self, Display, Formatter, Write as _},
    io::{self, BufRead, Write},
    num::ParseIntError,
    str::FromStr,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    board_display::BoardDisplay,
    color::Color,
    coord::Coord,
    fen::{Fen, ParseFenError},
    game::Game,
    lan::{Lan, ParseLanError},
    piece::{InvalidFenPiece, PieceKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ParseInputError {
    #[error(transparent)]
    Fen(#[from] ParseFenError),
    #[error(transparent)]
    Move(#[from] ParseLanError),
    #[error(transparent)]
    Int(#[from] ParseIntError),
    #[error(transparent)]
    Promotion(#[from] InvalidFenPiece),
    #[error("expected `<from x> <from y> <to x> <to y> [promotion]`")]
    Numeric,
}
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Help,
    Flip,
    Reset,
    Undo,
    Quit,
    Import(Fen),
    ExportFen,
    Coord(Coord),
    Move(Lan),
    Numeric {
        from: (i32, i32),
        to: (i32, i32),
        promotion: Option<PieceKind>,
    },
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Reset => write!(f, "reset")?,
            Input::Undo => write!(f, "undo")?,
            Input::Quit => write!(f, "quit")?,
            Input::Import(fen) => write!(f, "import {fen}")?,
            Input::ExportFen => write!(f, "fen")?,
            Input::Coord(position) => write!(f, "{position}")?,
            Input::Move(lan) => write!(f, "{lan}")?,
            Input::Numeric {
                from: (from_x, from_y),
                to: (to_x, to_y),
                promotion,
            } => {
                write!(f, "{from_x} {from_y} {to_x} {to_y}")?;
                if let Some(promotion) = promotion {
                    write!(f, " {}", promotion.lowercase())?;
                }
            }
        }
        Ok(())
    }
}
fn strip_prefix_token<'a>(src: &'a str, search: &str) -> Option<&'a str> {
    src.strip_prefix(search)
        .filter(|src| src.chars().next().is_none_or(<char>::is_whitespace))
        .map(<str>::trim_start)
}
fn parse_numeric(s: &str) -> Result<Input, ParseInputError> {
    let mut tokens = s.split_whitespace();
    let mut number = || -> Result<i32, ParseInputError> {
        Ok(tokens.next().ok_or(ParseInputError::Numeric)?.parse()?)
    };
    let from = (number()?, number()?);
    let to = (number()?, number()?);
    let promotion = match tokens.next() {
        Some(token) => {
            let mut chars = token.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(ParseInputError::Numeric);
            };
            Some(PieceKind::from_fen(c)?)
        }
        None => None,
    };
    if tokens.next().is_some() {
        return Err(ParseInputError::Numeric);
    }
    Ok(Input::Numeric {
        from,
        to,
        promotion,
    })
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "reset" => Ok(Input::Reset),
            "undo" => Ok(Input::Undo),
            "quit" | "exit" => Ok(Input::Quit),
            "fen" => Ok(Input::ExportFen),
            s => {
                if let Some(s) = strip_prefix_token(s, "import") {
                    Ok(Input::Import(s.parse()?))
                } else if s.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
                    parse_numeric(s)
                } else if let Ok(position) = s.parse() {
                    Ok(Input::Coord(position))
                } else {
                    Ok(Input::Move(s.parse()?))
                }
            }
        }
    }
}
fn status(game: &Game) -> String {
    let mut info = String::new();
    if let Some(end_state) = game.status() {
        writeln!(&mut info, "{end_state}").unwrap();
    } else {
        let player = game.turn();
        writeln!(&mut info, "{player} plays").unwrap();
        if game.is_check(player) {
            writeln!(&mut info, "{player} is in check").unwrap();
        }
    }
    info
}
/// Runs the console game on `game` until `quit` or the end of `input`.
pub fn repl(
    game: &Game,
    mut view: Color,
    colored: bool,
    input: impl BufRead,
    mut output: impl Write,
    mut error: impl Write,
) -> io::Result<()> {
    let mut lines = input.lines();
    let mut info = String::new();
    let mut highlighted = Vec::new();
    let mut update = true;
    let mut first_time = true;
    loop {
        if update {
            info = status(game);
        }
        if first_time {
            writeln!(&mut info, "type `help` for instructions").unwrap();
            first_time = false;
        }
        update = false;
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: *game.snapshot().grid(),
                view,
                highlighted: &highlighted,
                info: &info,
                colored,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let text = text?;
            let input: Input = match text.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    writeln!(error, "for available command, enter `help`")?;
                    continue;
                }
            };
            debug!(%input, "console input");
            match input {
                Input::Help => {
                    writeln!(output, "flip           - flip the board")?;
                    writeln!(output, "reset          - reset to starting position")?;
                    writeln!(output, "undo           - take back the last move")?;
                    writeln!(output, "quit           - quit the game")?;
                    writeln!(output, "import <fen>   - import a position")?;
                    writeln!(output, "fen            - export the position as fen")?;
                    writeln!(output, "e2             - view legal moves from a square")?;
                    writeln!(output, "e2e4           - play the move")?;
                    writeln!(output, "e7e8q          - move and promote")?;
                    writeln!(output, "e1g1           - perform castling")?;
                    writeln!(output, "4 1 4 3 [q]    - play by file and rank indices")?;
                    continue;
                }
                Input::Flip => {
                    view = !view;
                }
                Input::Reset => {
                    game.reset();
                    update = true;
                    highlighted.clear();
                }
                Input::Undo => {
                    if !game.undo_last_move() {
                        writeln!(error, "Error: there is no move to take back")?;
                        continue;
                    }
                    update = true;
                    highlighted.clear();
                }
                Input::Quit => return Ok(()),
                Input::Import(Fen(board)) => {
                    game.load(board);
                    update = true;
                    highlighted.clear();
                }
                Input::ExportFen => {
                    writeln!(output, "{}", game.fen())?;
                    continue;
                }
                Input::Coord(position) => {
                    let Some(piece) = game.snapshot().grid()[position] else {
                        writeln!(error, "Error: No piece found on {position}")?;
                        continue;
                    };
                    if piece.color() != game.turn() {
                        writeln!(error, "Error: It is {}'s turn", game.turn())?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.extend(
                        game.legal_moves(piece.color())
                            .into_iter()
                            .filter(|lan| lan.origin == position)
                            .map(|lan| lan.destination),
                    );
                }
                Input::Move(lan) => {
                    if !game.play(lan) {
                        writeln!(error, "Error: {lan} is an illegal move")?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.push(lan.origin);
                    highlighted.push(lan.destination);
                    update = true;
                }
                Input::Numeric {
                    from: (from_x, from_y),
                    to: (to_x, to_y),
                    promotion,
                } => {
                    if !game.move_piece(from_x, from_y, to_x, to_y, promotion) {
                        writeln!(error, "Error: {input} is an illegal move")?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.extend(
                        Coord::from_xy(from_x, from_y)
                            .into_iter()
                            .chain(Coord::from_xy(to_x, to_y)),
                    );
                    update = true;
                }
            }
            break;
        }
    }
}
#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        coord,
        game::Game,
        piece::PieceKind,
        repl::{Input, ParseInputError, repl},
    };

    fn run(game: &Game, script: &str) -> (String, String) {
        let mut output = Vec::new();
        let mut error = Vec::new();
        repl(
            game,
            Color::White,
            false,
            script.as_bytes(),
            &mut output,
            &mut error,
        )
        .unwrap();
        (
            String::from_utf8(output).unwrap(),
            String::from_utf8(error).unwrap(),
        )
    }
    #[test]
    fn parse_commands() {
        assert_eq!("undo".parse(), Ok(Input::Undo));
        assert_eq!("e2".parse(), Ok(Input::Coord(coord!("e2"))));
        assert_eq!(
            "e2e4".parse(),
            Ok(Input::Move("e2e4".parse().unwrap()))
        );
        assert_eq!(
            "6 6 6 7 n".parse(),
            Ok(Input::Numeric {
                from: (6, 6),
                to: (6, 7),
                promotion: Some(PieceKind::Knight),
            })
        );
        assert_eq!(
            "4 1 4".parse::<Input>(),
            Err(ParseInputError::Numeric)
        );
        assert!("import 8/8 w".parse::<Input>().is_err());
        assert!("importe2e4".parse::<Input>().is_err());
    }
    #[test]
    fn plays_and_exports() {
        let game = Game::new();
        let (output, error) = run(&game, "e2e4\n4 6 4 4\nundo\nfen\nquit\ne7e5\n");
        assert!(error.is_empty(), "{error}");
        assert!(output.contains("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"));
        assert!(output.contains("black plays"));
        assert_eq!(game.history().len(), 1);
    }
    #[test]
    fn reports_mistakes_without_touching_the_game() {
        let game = Game::new();
        let (_, error) = run(&game, "e2e5\ne7\nd4\nundo\nxyz\n");
        assert!(error.contains("e2e5 is an illegal move"));
        assert!(error.contains("It is white's turn"));
        assert!(error.contains("No piece found on d4"));
        assert!(error.contains("no move to take back"));
        assert!(error.contains("for available command"));
        assert!(game.history().is_empty());
    }
    #[test]
    fn import_and_detect_mate() {
        let game = Game::new();
        let (output, _) = run(
            &game,
            "import rnbqkbnr/2pppppp/8/7Q/2B5/8/PPPPPPPP/RNB1K1NR w KQkq - 0 1\nh5f7\n",
        );
        assert!(output.contains("checkmate, white wins"));
        assert!(game.is_mate(Color::Black));
    }
}
