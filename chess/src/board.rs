//! Board and related things

use crate::arena::DuelResult;
use crate::bitboard::Bitboard;
use crate::geometry;
use crate::piece::Piece;
use crate::stats::{DefaultStats, StatProvider};
use crate::types::{PieceKind, Side, Square};

use std::array;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;
use thiserror::Error;

/// Error parsing the board diagram (i.e. the first part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum DiagramParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(i8),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(i8),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error making a move on the board
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Square lies outside of the board
    #[error("square {0} is out of bounds")]
    OutOfBounds(Square),
    /// There is no piece to move
    #[error("no piece on {0}")]
    NoPiece(Square),
    /// Target square is occupied by a piece of the same side
    #[error("square {0} is occupied by a friendly piece")]
    FriendlyTarget(Square),
    /// Pieces are lent to a duel which was not settled yet
    #[error("a duel is in progress")]
    DuelPending,
    /// The duel being settled was not started on this board
    #[error("no duel between {0} and {1} is pending")]
    UnexpectedDuel(Square, Square),
}

/// Error promoting a piece
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PromoteError {
    #[error("no piece on {0}")]
    Empty(Square),
    #[error("piece on {0} is not a pawn")]
    NotAPawn(Square),
    #[error("pawn on {0} has not reached the last rank")]
    NotOnPromotionRank(Square),
    #[error("cannot promote to {0}")]
    BadKind(PieceKind),
}

/// Pieces lent by the board to a duel
///
/// The attacker comes from `from` and the defender stands on `to`. Both squares stay empty
/// until the duel is settled with [`Board::settle()`].
#[derive(Debug, Clone, PartialEq)]
pub struct Engagement {
    pub from: Square,
    pub to: Square,
    pub attacker: Piece,
    pub defender: Piece,
}

/// Result of [`Board::make_move()`]
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The piece moved to an empty square
    ///
    /// `promotion` contains the target square if a pawn reached the last rank and must be
    /// promoted with [`Board::promote()`].
    Relocated { promotion: Option<Square> },
    /// The target square is occupied by an enemy, so the pieces must fight
    Attack(Engagement),
}

/// Result of [`Board::settle()`]
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Side of the surviving piece
    pub winner: Side,
    /// Square the survivor now occupies
    pub square: Square,
    /// The defeated piece, removed from the board
    pub loser: Piece,
    /// Whether the defeated piece was a king
    pub king_fallen: bool,
    /// Set if an attacking pawn won and landed on the last rank
    pub promotion: Option<Square>,
}

/// Chess board
///
/// Each occupied square holds exactly one piece, and the position stored in the piece always
/// equals the square it occupies. The board also caches the squares of both kings.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Option<Piece>; 64],
    kings: [Option<Square>; 2],
    pending: Option<(Square, Square)>,
}

impl Board {
    /// Returns an empty board
    pub fn empty() -> Board {
        Board {
            cells: array::from_fn(|_| None),
            kings: [None; 2],
            pending: None,
        }
    }

    /// Returns a board with the initial position
    ///
    /// Black occupies ranks 0 and 1, White occupies ranks 6 and 7. Kings stand on file 3 and
    /// queens on file 4.
    pub fn initial(stats: &impl StatProvider) -> Board {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::King,
            PieceKind::Queen,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut res = Board::empty();
        for side in Side::iter() {
            let back = geometry::back_rank(side);
            let pawns = geometry::pawn_start_rank(side);
            for (file, kind) in (0..8).zip(BACK) {
                res.place(Piece::new(side, kind, Square::new(file, back), stats));
                res.place(Piece::new(side, PieceKind::Pawn, Square::new(file, pawns), stats));
            }
        }
        res
    }

    /// Parses a board diagram in FEN notation, like `"8/8/3k4/8/8/8/3K4/8"`
    ///
    /// The first rank of the diagram is rank 0. Pieces get their stats from `stats`.
    pub fn from_diagram(s: &str, stats: &impl StatProvider) -> Result<Board, DiagramParseError> {
        type Error = DiagramParseError;

        let mut file = 0_i8;
        let mut rank = 0_i8;
        let mut res = Board::empty();
        for b in s.bytes() {
            match b {
                b'1'..=b'8' => {
                    let add = (b - b'0') as i8;
                    if file + add > 8 {
                        return Err(Error::RankOverflow(rank));
                    }
                    file += add;
                }
                b'/' => {
                    if file < 8 {
                        return Err(Error::RankUnderflow(rank));
                    }
                    rank += 1;
                    file = 0;
                    if rank >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(Error::RankOverflow(rank));
                    }
                    let kind =
                        PieceKind::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                    let side = if b.is_ascii_uppercase() {
                        Side::White
                    } else {
                        Side::Black
                    };
                    res.place(Piece::new(side, kind, Square::new(file, rank), stats));
                    file += 1;
                }
            }
        }

        if file < 8 {
            return Err(Error::RankUnderflow(rank));
        }
        if rank < 7 {
            return Err(Error::Underflow);
        }
        Ok(res)
    }

    #[inline]
    pub fn is_in_bounds(&self, sq: Square) -> bool {
        sq.is_valid()
    }

    /// Returns the piece on `sq`, or `None` if the square is empty or outside of the board
    #[inline]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        if !sq.is_valid() {
            return None;
        }
        self.cells[sq.index()].as_ref()
    }

    /// Returns the side of the piece on `sq`, if any
    #[inline]
    pub fn side_at(&self, sq: Square) -> Option<Side> {
        self.get(sq).map(Piece::side)
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Returns the square of the king of side `s`
    ///
    /// Returns `None` if the king was defeated. While the king fights in a duel, this still
    /// returns the square it was lent from.
    #[inline]
    pub fn king(&self, s: Side) -> Option<Square> {
        self.kings[s.index()]
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    /// Returns the set of squares occupied by side `s`
    pub fn occupied(&self, s: Side) -> Bitboard {
        self.pieces()
            .filter(|p| p.side() == s)
            .map(Piece::position)
            .collect()
    }

    /// Returns the set of all occupied squares
    pub fn all(&self) -> Bitboard {
        self.pieces().map(Piece::position).collect()
    }

    #[inline]
    pub fn is_duel_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Puts `piece` on the square stored in it and returns the piece that was there before
    pub fn put(&mut self, piece: Piece) -> Result<Option<Piece>, MoveError> {
        let sq = piece.position();
        if !sq.is_valid() {
            return Err(MoveError::OutOfBounds(sq));
        }
        let prev = self.take(sq);
        self.place(piece);
        Ok(prev)
    }

    /// Removes the piece from `sq`
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        if !sq.is_valid() {
            return None;
        }
        let piece = self.cells[sq.index()].take()?;
        if piece.kind() == PieceKind::King && self.kings[piece.side().index()] == Some(sq) {
            self.kings[piece.side().index()] = None;
        }
        Some(piece)
    }

    fn place(&mut self, piece: Piece) {
        let sq = piece.position();
        if piece.kind() == PieceKind::King {
            self.kings[piece.side().index()] = Some(sq);
        }
        self.cells[sq.index()] = Some(piece);
    }

    fn promotion_square(piece: &Piece) -> Option<Square> {
        let sq = piece.position();
        (piece.kind() == PieceKind::Pawn && sq.rank() == geometry::promotion_rank(piece.side()))
            .then_some(sq)
    }

    /// Moves the piece from `from` to `to`
    ///
    /// The move is not checked against the movement rules of the piece; use
    /// [`movegen::valid_moves()`](crate::movegen::valid_moves) for that. If `to` holds an
    /// enemy piece, both pieces are taken off the board and returned as an [`Engagement`]. The
    /// board then refuses all the moves until the duel is passed to [`Board::settle()`].
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.pending.is_some() {
            return Err(MoveError::DuelPending);
        }
        for sq in [from, to] {
            if !sq.is_valid() {
                return Err(MoveError::OutOfBounds(sq));
            }
        }
        let side = self.side_at(from).ok_or(MoveError::NoPiece(from))?;
        match self.side_at(to) {
            Some(s) if s == side => Err(MoveError::FriendlyTarget(to)),
            Some(_) => {
                let attacker = self.cells[from.index()].take().ok_or(MoveError::NoPiece(from))?;
                let defender = self.cells[to.index()].take().ok_or(MoveError::NoPiece(to))?;
                self.pending = Some((from, to));
                debug!("{} on {} attacks {} on {}", attacker.name(), from, defender.name(), to);
                Ok(MoveOutcome::Attack(Engagement {
                    from,
                    to,
                    attacker,
                    defender,
                }))
            }
            None => {
                let mut piece = self.take(from).ok_or(MoveError::NoPiece(from))?;
                piece.set_position(to);
                let promotion = Self::promotion_square(&piece);
                debug!("{} moves from {} to {}", piece.name(), from, to);
                self.place(piece);
                Ok(MoveOutcome::Relocated { promotion })
            }
        }
    }

    /// Takes back the pieces lent to a finished duel
    ///
    /// The survivor ends up on the attacked square: the attacker moves there if it won,
    /// otherwise the defender returns there. The attacker's original square stays empty.
    pub fn settle(&mut self, result: DuelResult) -> Result<Settlement, MoveError> {
        let DuelResult {
            from,
            to,
            attacker,
            defender,
            outcome,
        } = result;
        if self.pending != Some((from, to)) {
            return Err(MoveError::UnexpectedDuel(from, to));
        }
        self.pending = None;

        let (mut winner, loser) = if outcome.attacker_won {
            (attacker, defender)
        } else {
            (defender, attacker)
        };
        let king_fallen = loser.kind() == PieceKind::King;
        if king_fallen {
            self.kings[loser.side().index()] = None;
        }
        winner.set_position(to);
        let promotion = if outcome.attacker_won {
            Self::promotion_square(&winner)
        } else {
            None
        };
        let settlement = Settlement {
            winner: winner.side(),
            square: to,
            loser,
            king_fallen,
            promotion,
        };
        self.place(winner);
        Ok(settlement)
    }

    /// Promotes the pawn on `sq` to `kind`, reloading its stats from `stats`
    pub fn promote(
        &mut self,
        sq: Square,
        kind: PieceKind,
        stats: &impl StatProvider,
    ) -> Result<(), PromoteError> {
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            return Err(PromoteError::BadKind(kind));
        }
        let piece = self.get(sq).ok_or(PromoteError::Empty(sq))?;
        if piece.kind() != PieceKind::Pawn {
            return Err(PromoteError::NotAPawn(sq));
        }
        if Self::promotion_square(piece).is_none() {
            return Err(PromoteError::NotOnPromotionRank(sq));
        }
        if let Some(piece) = self.cells[sq.index()].as_mut() {
            piece.set_kind(kind, stats);
            debug!("pawn on {} promoted to {}", sq, kind);
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl FromStr for Board {
    type Err = DiagramParseError;

    /// Parses a diagram, taking the stats from [`DefaultStats`]
    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Board::from_diagram(s, &DefaultStats)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in 0..8 {
            if rank != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in 0..8 {
                let Some(piece) = self.get(Square::new(file, rank)) else {
                    empty += 1;
                    continue;
                };
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}
