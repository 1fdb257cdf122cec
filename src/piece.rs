use std::{
    fmt::{self, Display, Formatter},
    num::NonZero,
};

use thiserror::Error;

use crate::{color::Color, error::InvalidByte};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    // the square codec relies on `PieceKind` being non-zero
    Pawn = 1,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTION_CHOICES.contains(&self)
    }
    pub fn uppercase(self) -> char {
        self.lowercase().to_ascii_uppercase()
    }
    pub fn lowercase(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
    pub fn from_fen(c: char) -> Result<Self, InvalidFenPiece> {
        let piece = match c {
            'p' | 'P' => PieceKind::Pawn,
            'n' | 'N' => PieceKind::Knight,
            'b' | 'B' => PieceKind::Bishop,
            'r' | 'R' => PieceKind::Rook,
            'q' | 'Q' => PieceKind::Queen,
            'k' | 'K' => PieceKind::King,
            c => return Err(InvalidFenPiece(c)),
        };
        Ok(piece)
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
impl TryFrom<u8> for PieceKind {
    type Error = InvalidByte;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let piece = match value {
            0 | 7.. => return Err(InvalidByte),
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            6 => PieceKind::King,
        };
        Ok(piece)
    }
}
impl From<PieceKind> for u8 {
    fn from(value: PieceKind) -> Self {
        value as u8
    }
}

/// An occupied square, packed into one byte.
///
/// Bit structure: `0000CPPP`, where `C` is the color (0 for white) and `PPP`
/// is the piece kind. Zero is never a valid piece so an empty square encodes
/// as `0` and `Option<ColoredPieceKind>` stays one byte wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColoredPieceKind(NonZero<u8>);
impl ColoredPieceKind {
    pub fn new(color: Color, piece: PieceKind) -> Self {
        let color: u8 = color.into();
        let piece: u8 = piece.into();
        let data = (color << 3) | piece;
        ColoredPieceKind(NonZero::new(data).unwrap())
    }
    pub fn color(self) -> Color {
        if (self.0.get() >> 3) & 0b_1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
    pub fn piece(self) -> PieceKind {
        match self.0.get() & 0b_111 {
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            6 => PieceKind::King,
            _ => unreachable!(),
        }
    }
    pub fn is(self, color: Color, piece: PieceKind) -> bool {
        self.color() == color && self.piece() == piece
    }
    pub fn fen(self) -> char {
        match self.color() {
            Color::White => self.piece().uppercase(),
            Color::Black => self.piece().lowercase(),
        }
    }
    pub fn from_fen(c: char) -> Result<Self, InvalidFenPiece> {
        let piece = PieceKind::from_fen(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(ColoredPieceKind::new(color, piece))
    }
    pub fn figurine(self) -> char {
        match (self.color(), self.piece()) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for ColoredPieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color(), self.piece())?;
        Ok(())
    }
}
impl TryFrom<u8> for ColoredPieceKind {
    type Error = InvalidByte;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >> 4 != 0 {
            return Err(InvalidByte);
        }
        PieceKind::try_from(value & 0b_111)?;
        NonZero::new(value).map(ColoredPieceKind).ok_or(InvalidByte)
    }
}
impl From<ColoredPieceKind> for u8 {
    fn from(value: ColoredPieceKind) -> Self {
        value.0.get()
    }
}
/// Encodes a square's occupant, `0` being an empty square.
pub fn encode(square: Option<ColoredPieceKind>) -> u8 {
    square.map_or(0, u8::from)
}
pub fn decode(code: u8) -> Result<Option<ColoredPieceKind>, InvalidByte> {
    if code == 0 {
        Ok(None)
    } else {
        code.try_into().map(Some)
    }
}
pub fn piece_kind(code: u8) -> Option<PieceKind> {
    decode(code).ok().flatten().map(ColoredPieceKind::piece)
}
pub fn piece_color(code: u8) -> Option<Color> {
    decode(code).ok().flatten().map(ColoredPieceKind::color)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error(
    "found `{0}`, expected one of `p`, `n`, `b`, `r`, `k`, `q`, or uppercase forms of these letters"
)]
pub struct InvalidFenPiece(pub char);
