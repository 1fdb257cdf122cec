use std::fmt::{self, Display, Formatter};

use crate::{color::Color, coord::Coord, piece::ColoredPieceKind};

const LIGHT: &str = "\x1b[30;107m";
const DARK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const RESET: &str = "\x1b[0m";

pub trait IndexableBoard {
    fn index(&self, position: Coord) -> Option<ColoredPieceKind>;
}
/// Renders a board for the terminal with rank 8 on top from white's view.
///
/// Lines of `info` are printed to the right of the board, one per rank.
pub struct BoardDisplay<'a, 'b, T> {
    pub board: T,
    pub view: Color,
    pub highlighted: &'a [Coord],
    pub info: &'b str,
    pub colored: bool,
}
impl<T> BoardDisplay<'_, '_, T> {
    fn square_style(&self, position: Coord) -> &'static str {
        if !self.colored {
            ""
        } else if self.highlighted.contains(&position) {
            HIGHLIGHTED
        } else {
            match position.color() {
                Color::White => LIGHT,
                Color::Black => DARK,
            }
        }
    }
}
impl<T> Display for BoardDisplay<'_, '_, T>
where
    T: IndexableBoard,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let reset = if self.colored { RESET } else { "" };
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let y = match self.view {
                Color::White => 7 - row,
                Color::Black => row,
            };
            for column in 0..8 {
                let x = match self.view {
                    Color::White => column,
                    Color::Black => 7 - column,
                };
                let position = Coord::new(x, y);
                let style = self.square_style(position);
                let symbol = match self.board.index(position) {
                    Some(piece) if self.colored => piece.figurine(),
                    Some(piece) => piece.fen(),
                    None if self.colored => ' ',
                    None if self.highlighted.contains(&position) => '*',
                    None => '.',
                };
                write!(f, "{style}{symbol} {reset}")?;
            }
            write!(f, "{}", y + 1)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
