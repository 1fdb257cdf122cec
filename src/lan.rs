use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    coord::{Coord, ParseCoordError},
    piece::{InvalidFenPiece, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseLanError {
    #[error("provided string contains invalid character")]
    InvalidChar,
    #[error(transparent)]
    ParseCoordError(#[from] ParseCoordError),
    #[error(transparent)]
    InvalidFenPiece(#[from] InvalidFenPiece),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// A move in long algebraic notation such as `e2e4` or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lan {
    pub origin: Coord,
    pub destination: Coord,
    pub promotion: Option<PieceKind>,
}
impl Display for Lan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}
impl FromStr for Lan {
    type Err = ParseLanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let origin = s.get(0..2).ok_or(ParseLanError::InvalidChar)?.parse()?;
        let destination = s.get(2..4).ok_or(ParseLanError::InvalidChar)?.parse()?;
        let mut rest = s.get(4..).ok_or(ParseLanError::InvalidChar)?.chars().fuse();
        let promotion = rest.next().map(PieceKind::from_fen).transpose()?;

        if let Some(c) = rest.next() {
            return Err(ParseLanError::Unexpected(c));
        }
        Ok(Lan {
            origin,
            destination,
            promotion,
        })
    }
}
#[cfg(test)]
mod test {
    use crate::{coord, lan::Lan, piece::PieceKind};

    #[test]
    fn parse_promotion() {
        let lan: Lan = "e7e8q".parse().unwrap();
        assert_eq!(lan.origin, coord!("e7"));
        assert_eq!(lan.destination, coord!("e8"));
        assert_eq!(lan.promotion, Some(PieceKind::Queen));
        assert_eq!(lan.to_string(), "e7e8q");
    }
    #[test]
    fn reject_garbage() {
        assert!("e2".parse::<Lan>().is_err());
        assert!("e2e9".parse::<Lan>().is_err());
        assert!("e2e4qq".parse::<Lan>().is_err());
        assert!("e7e8x".parse::<Lan>().is_err());
    }
}
