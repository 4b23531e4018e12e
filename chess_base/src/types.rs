use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SideParseError {
    #[error("unexpected side char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KindParseError {
    #[error("unknown piece kind {0:?}")]
    Unknown(String),
}

/// Board square
///
/// `file` grows from left to right, `rank` grows from the Black side towards the White side,
/// so `(0, 0)` is `a8` and `(7, 7)` is `h1`. A square may lie outside of the board: this
/// happens naturally when translating near the edge, and must be checked with
/// [`Square::is_valid()`] before the square is used to index the board.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    pub const fn new(file: i8, rank: i8) -> Square {
        Square { file, rank }
    }

    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square index must be between 0 and 63");
        Square {
            file: (val & 7) as i8,
            rank: (val >> 3) as i8,
        }
    }

    pub const fn file(&self) -> i8 {
        self.file
    }

    pub const fn rank(&self) -> i8 {
        self.rank
    }

    pub const fn is_valid(&self) -> bool {
        self.file >= 0 && self.file < 8 && self.rank >= 0 && self.rank < 8
    }

    /// Returns the index of the square in a row-major 64-element array
    ///
    /// # Panics
    ///
    /// Panics if the square is outside of the board.
    pub const fn index(&self) -> usize {
        assert!(self.is_valid(), "square is outside of the board");
        ((self.rank as usize) << 3) | self.file as usize
    }

    /// Returns the square shifted by `(delta_file, delta_rank)`
    ///
    /// The result is not bounds-checked.
    pub const fn translate(self, delta_file: i8, delta_rank: i8) -> Square {
        Square {
            file: self.file.wrapping_add(delta_file),
            rank: self.rank.wrapping_add(delta_rank),
        }
    }

    pub const fn try_shift(self, delta_file: i8, delta_rank: i8) -> Option<Square> {
        let res = self.translate(delta_file, delta_rank);
        if res.is_valid() {
            Some(res)
        } else {
            None
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.is_valid() {
            return write!(f, "Square({})", self);
        }
        write!(f, "Square(?{}, {})", self.file, self.rank)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if !self.is_valid() {
            return write!(f, "({}, {})", self.file, self.rank);
        }
        write!(
            f,
            "{}{}",
            (b'a' + self.file as u8) as char,
            (b'8' - self.rank as u8) as char
        )
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(SquareParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let file = match bytes[0] {
            b @ b'a'..=b'h' => (b - b'a') as i8,
            b => return Err(SquareParseError::UnexpectedFileChar(b as char)),
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => (b'8' - b) as i8,
            b => return Err(SquareParseError::UnexpectedRankChar(b as char)),
        };
        Ok(Square::new(file, rank))
    }
}

/// Side of the board
///
/// White moves first and starts on the higher ranks, Black starts on ranks 0 and 1.
/// Projectiles in the arena carry the side of the piece that fired them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub const fn inv(&self) -> Side {
        match *self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'w' => Some(Side::White),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        [Side::White, Side::Black].into_iter()
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(SideParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Side::from_char(ch).ok_or(SideParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Bishop = 1,
    Knight = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::Pawn,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Upper-case letter of the piece, as used in the board diagrams
    pub fn as_char(&self) -> char {
        b"PBNRQK"[self.index()] as char
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            PieceKind::Pawn => "pawn",
            PieceKind::Bishop => "bishop",
            PieceKind::Knight => "knight",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PieceKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KindParseError::Unknown(s.to_string()))
    }
}
