use std::{
    fmt::{self, Display, Formatter},
    num::NonZero,
    ops::{Mul, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseCoordError {
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidX(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidY(char),
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// Parses a square name such as `"e4"`, panicking on malformed input.
#[macro_export]
macro_rules! coord {
    ($name:literal) => {
        $name.parse::<$crate::coord::Coord>().unwrap()
    };
}

// Bit structure: 10XXXYYY
// first two bits is always `10` for `NonZero` size optimizations
// y = 0 is white's back rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord(NonZero<u8>);

impl Coord {
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 8);
        debug_assert!(y < 8);
        let byte = 0b1000_0000 | (x << 3) | y;
        Coord(NonZero::new(byte).unwrap())
    }
    pub fn new_checked(x: u8, y: u8) -> Option<Self> {
        if x >= 8 || y >= 8 {
            None
        } else {
            Some(Self::new(x, y))
        }
    }
    /// Accepts any integer pair, rejecting anything off the board.
    pub fn from_xy(x: i32, y: i32) -> Option<Self> {
        Self::new_checked(x.try_into().ok()?, y.try_into().ok()?)
    }
    pub fn from_chars(x: char, y: char) -> Result<Self, ParseCoordError> {
        let x = match x {
            'a'..='h' => x as u8 - b'a',
            _ => return Err(ParseCoordError::InvalidX(x)),
        };
        let y = match y {
            '1'..='8' => y as u8 - b'1',
            _ => return Err(ParseCoordError::InvalidY(y)),
        };
        Ok(Coord::new(x, y))
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|x| (0..8).map(move |y| Coord::new(x, y)))
    }
    pub fn x(self) -> u8 {
        (self.0.get() >> 3) & 0b_111
    }
    pub fn y(self) -> u8 {
        self.0.get() & 0b_111
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Self::new_checked(
            self.x().checked_add_signed(movement.x)?,
            self.y().checked_add_signed(movement.y)?,
        )
    }
    pub fn line(self, direction: Vector) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        debug_assert_eq!(direction, direction.as_unit());
        (1..).map_while(move |difference| self.move_by(direction * difference))
    }
    pub fn line_exclusive_exclusive(
        self,
        end: Coord,
        direction: Vector,
    ) -> impl Iterator<Item = Self> {
        self.line(direction)
            .take_while(move |position| *position != end)
    }
    /// Squares strictly between `self` and `other` when both lie on one of
    /// `directions`.
    pub fn is_aligned(
        self,
        other: Self,
        directions: &[Vector],
    ) -> Option<impl Iterator<Item = Self>> {
        let difference = other - self;
        directions.iter().copied().find_map(|direction| {
            direction
                .is_aligned(difference)
                .then(|| self.line_exclusive_exclusive(other, direction))
        })
    }
    pub fn color(self) -> Color {
        if (self.x() + self.y()) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }
}
pub fn home_rank(color: Color) -> u8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}
pub fn pawn_home_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}
pub fn pawn_promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let x = (self.x() + b'a') as char;
        let y = self.y() + 1;
        write!(f, "{x}{y}")?;
        Ok(())
    }
}
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(x) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(0));
        };
        let Some(y) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParseCoordError::Unexpected(c));
        }
        Coord::from_chars(x, y)
    }
}
impl Sub<Self> for Coord {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: <i8>::try_from(self.x()).unwrap() - <i8>::try_from(rhs.x()).unwrap(),
            y: <i8>::try_from(self.y()).unwrap() - <i8>::try_from(rhs.y()).unwrap(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i8,
    pub y: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { x: 0, y: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { x: -1, y: -2 },
        Vector { x: 1, y: -2 },
        Vector { x: -1, y: 2 },
        Vector { x: 1, y: 2 },
        Vector { x: -2, y: -1 },
        Vector { x: 2, y: -1 },
        Vector { x: -2, y: 1 },
        Vector { x: 2, y: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { x: -1, y: -1 },
        Vector { x: 0, y: -1 },
        Vector { x: 1, y: -1 },
        Vector { x: -1, y: 0 },
        Vector { x: 1, y: 0 },
        Vector { x: -1, y: 1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: 0 },
        Vector { x: 1, y: 0 },
        Vector { x: 0, y: -1 },
        Vector { x: 0, y: 1 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: -1 },
        Vector { x: 1, y: -1 },
        Vector { x: -1, y: 1 },
        Vector { x: 1, y: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = Vector::KING_MOVES;

    pub fn pawn_single_move(color: Color) -> Self {
        Vector {
            x: 0,
            y: pawn_direction(color),
        }
    }
    pub fn pawn_double_move(color: Color) -> Self {
        Vector::pawn_single_move(color) * 2
    }
    pub fn pawn_attacks(color: Color) -> [Self; 2] {
        [-1, 1].map(|x| Vector {
            x,
            y: pawn_direction(color),
        })
    }
    pub fn is_aligned(self, other: Self) -> bool {
        self.as_unit() == other.as_unit() && self.x * other.y == other.x * self.y
    }
    pub fn is_king_move(self) -> bool {
        (-1..=1).contains(&self.x) && (-1..=1).contains(&self.y) && !(self.x == 0 && self.y == 0)
    }
    pub fn is_knight_move(self) -> bool {
        let x = self.x.unsigned_abs();
        let y = self.y.unsigned_abs();
        (x == 1 && y == 2) || (x == 2 && y == 1)
    }
    pub fn is_pawn_attack(self, color: Color) -> bool {
        self.x.unsigned_abs() == 1 && self.y == pawn_direction(color)
    }
    pub fn as_unit(self) -> Self {
        Vector {
            x: self.x.signum(),
            y: self.y.signum(),
        }
    }
}
/// Rank delta of a single pawn step for `color`.
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
