use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    color::Color,
    coord::{Coord, home_rank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("found `{0}`, expected one of `K`, `Q`, `k`, `q`, or `-`")]
pub struct InvalidCastlingCharacter(pub char);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}
impl CastlingSide {
    pub const ALL: [Self; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// The side a king heading towards `destination_x` from the e-file castles to.
    pub fn from_king_destination(king_x: u8, destination_x: u8) -> Self {
        if destination_x > king_x {
            CastlingSide::Kingside
        } else {
            CastlingSide::Queenside
        }
    }
    pub fn rook_origin(self, color: Color) -> Coord {
        let x = match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 0,
        };
        Coord::new(x, home_rank(color))
    }
    pub fn rook_destination(self, color: Color) -> Coord {
        let x = match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        };
        Coord::new(x, home_rank(color))
    }
    pub fn king_destination(self, color: Color) -> Coord {
        let x = match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        };
        Coord::new(x, home_rank(color))
    }
    fn bit(self, color: Color) -> u8 {
        let shift = match (color, self) {
            (Color::White, CastlingSide::Kingside) => 0,
            (Color::White, CastlingSide::Queenside) => 1,
            (Color::Black, CastlingSide::Kingside) => 2,
            (Color::Black, CastlingSide::Queenside) => 3,
        };
        0b_1 << shift
    }
}
pub fn king_origin(color: Color) -> Coord {
    Coord::new(4, home_rank(color))
}

/// The four castling flags. Play only ever clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub fn none() -> Self {
        CastlingRights(0)
    }
    pub fn all() -> Self {
        CastlingRights(0b_1111)
    }
    pub fn get(self, color: Color, side: CastlingSide) -> bool {
        self.0 & side.bit(color) != 0
    }
    pub fn add(&mut self, color: Color, side: CastlingSide) {
        self.0 |= side.bit(color);
    }
    pub fn remove(&mut self, color: Color, side: CastlingSide) {
        self.0 &= !side.bit(color);
    }
    pub fn clear(&mut self, color: Color) {
        for side in CastlingSide::ALL {
            self.remove(color, side);
        }
    }
    /// Revokes the right tied to a rook's home corner once anything leaves or
    /// lands on that corner.
    pub fn remove_for_corner(&mut self, position: Coord) {
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if side.rook_origin(color) == position {
                    self.remove(color, side);
                }
            }
        }
    }
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (color, side, c) in [
            (Color::White, CastlingSide::Kingside, 'K'),
            (Color::White, CastlingSide::Queenside, 'Q'),
            (Color::Black, CastlingSide::Kingside, 'k'),
            (Color::Black, CastlingSide::Queenside, 'q'),
        ] {
            if self.get(color, side) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
impl FromStr for CastlingRights {
    type Err = InvalidCastlingCharacter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut castling_rights = CastlingRights::none();
        for c in s.chars() {
            match c {
                'K' => castling_rights.add(Color::White, CastlingSide::Kingside),
                'Q' => castling_rights.add(Color::White, CastlingSide::Queenside),
                'k' => castling_rights.add(Color::Black, CastlingSide::Kingside),
                'q' => castling_rights.add(Color::Black, CastlingSide::Queenside),
                '-' => (),
                c => return Err(InvalidCastlingCharacter(c)),
            }
        }
        Ok(castling_rights)
    }
}
#[cfg(test)]
mod test {
    use crate::{
        castling::{CastlingRights, CastlingSide},
        color::Color,
        coord,
    };

    #[test]
    fn fen_field_roundtrip() {
        let rights: CastlingRights = "Kq".parse().unwrap();
        assert!(rights.get(Color::White, CastlingSide::Kingside));
        assert!(!rights.get(Color::White, CastlingSide::Queenside));
        assert!(rights.get(Color::Black, CastlingSide::Queenside));
        assert_eq!(rights.to_string(), "Kq");
        assert_eq!(CastlingRights::none().to_string(), "-");
        assert!("KX".parse::<CastlingRights>().is_err());
    }
    #[test]
    fn corner_revokes_only_its_own_right() {
        let mut rights = CastlingRights::all();
        rights.remove_for_corner(coord!("h8"));
        assert_eq!(rights.to_string(), "KQq");
        rights.remove_for_corner(coord!("e4"));
        assert_eq!(rights.to_string(), "KQq");
    }
    #[test]
    fn castling_squares() {
        assert_eq!(CastlingSide::Kingside.king_destination(Color::White), coord!("g1"));
        assert_eq!(CastlingSide::Queenside.rook_destination(Color::Black), coord!("d8"));
        assert_eq!(CastlingSide::Queenside.rook_origin(Color::White), coord!("a1"));
    }
}
