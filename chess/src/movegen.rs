//! Move generation
//!
//! The generator lists the squares a piece may move to. Moves onto enemy pieces are included,
//! as they start a duel instead of a plain capture. Leaving the own king under attack is not
//! checked.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::piece::Piece;
use crate::types::{PieceKind, Side, Square};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Maximum number of targets a single piece can have
///
/// A queen in the center of an empty board reaches 27 squares.
pub const MAX_TARGETS: usize = 32;

/// Targets of a single piece
///
/// The capacity is [`MAX_TARGETS`], so a `MoveList` can't collect the moves of several pieces.
/// Use a `Vec<Square>` or a [`Bitboard`] as the sink for that.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Square, MAX_TARGETS>);

impl Deref for MoveList {
    type Target = ArrayVec<Square, MAX_TARGETS>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Square;
    type IntoIter = slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Square;
    type IntoIter = arrayvec::IntoIter<Square, MAX_TARGETS>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Sink for generated target squares
///
/// The generator only appends to the sink and never clears it.
pub trait SquarePush {
    fn push(&mut self, sq: Square);
}

impl<const N: usize> SquarePush for ArrayVec<Square, N> {
    fn push(&mut self, sq: Square) {
        self.push(sq);
    }
}

impl SquarePush for MoveList {
    fn push(&mut self, sq: Square) {
        self.0.push(sq);
    }
}

impl SquarePush for Vec<Square> {
    fn push(&mut self, sq: Square) {
        self.push(sq);
    }
}

impl SquarePush for Bitboard {
    fn push(&mut self, sq: Square) {
        self.set(sq);
    }
}

struct MoveGenImpl<'a, P> {
    board: &'a Board,
    side: Side,
    dst: &'a mut P,
}

impl<'a, P: SquarePush> MoveGenImpl<'a, P> {
    fn new(board: &'a Board, side: Side, dst: &'a mut P) -> Self {
        MoveGenImpl { board, side, dst }
    }

    fn is_enemy(&self, sq: Square) -> bool {
        self.board.side_at(sq) == Some(self.side.inv())
    }

    fn is_friendly(&self, sq: Square) -> bool {
        self.board.side_at(sq) == Some(self.side)
    }

    fn gen_pawn(&mut self, src: Square) {
        let fwd = geometry::pawn_forward(self.side);
        if let Some(dst) = src.try_shift(0, fwd) {
            if self.board.is_empty(dst) {
                self.dst.push(dst);
            }
        }
        // Only the destination of the double step must be empty; the square in between is not
        // looked at
        if src.rank() == geometry::pawn_start_rank(self.side) {
            if let Some(dst) = src.try_shift(0, 2 * fwd) {
                if self.board.is_empty(dst) {
                    self.dst.push(dst);
                }
            }
        }
        for delta_file in [-1, 1] {
            if let Some(dst) = src.try_shift(delta_file, fwd) {
                if self.is_enemy(dst) {
                    self.dst.push(dst);
                }
            }
        }
    }

    fn gen_leaper(&mut self, src: Square, offsets: &[(i8, i8)]) {
        for &(delta_file, delta_rank) in offsets {
            if let Some(dst) = src.try_shift(delta_file, delta_rank) {
                if !self.is_friendly(dst) {
                    self.dst.push(dst);
                }
            }
        }
    }

    fn gen_slider(&mut self, src: Square, dirs: &[(i8, i8)]) {
        for &(delta_file, delta_rank) in dirs {
            let mut cur = src;
            while let Some(dst) = cur.try_shift(delta_file, delta_rank) {
                match self.board.side_at(dst) {
                    None => self.dst.push(dst),
                    Some(s) => {
                        if s != self.side {
                            self.dst.push(dst);
                        }
                        break;
                    }
                }
                cur = dst;
            }
        }
    }

    fn gen(&mut self, kind: PieceKind, src: Square) {
        match kind {
            PieceKind::Pawn => self.gen_pawn(src),
            PieceKind::Knight => self.gen_leaper(src, &geometry::KNIGHT_OFFSETS),
            PieceKind::King => self.gen_leaper(src, &geometry::KING_OFFSETS),
            PieceKind::Bishop => self.gen_slider(src, &geometry::DIAG_DIRS),
            PieceKind::Rook => self.gen_slider(src, &geometry::LINE_DIRS),
            PieceKind::Queen => self.gen_slider(src, &geometry::ALL_DIRS),
        }
    }
}

/// Appends to `dst` all the squares `piece` standing on `from` may move to
///
/// `piece` doesn't have to stand on the board, only its kind and side are taken into account.
/// If `from` is outside of the board, nothing is generated.
///
/// # Panics
///
/// Panics if `dst` is a fixed-capacity list without room for this piece's targets, for example
/// a [`MoveList`] that already holds the moves of another piece.
pub fn gen_moves<P: SquarePush>(b: &Board, piece: &Piece, from: Square, dst: &mut P) {
    if !from.is_valid() {
        return;
    }
    MoveGenImpl::new(b, piece.side(), dst).gen(piece.kind(), from);
}

/// Returns all the squares the piece standing on `from` may move to
///
/// Returns an empty list if `from` is empty.
pub fn valid_moves(b: &Board, from: Square) -> MoveList {
    let mut res = MoveList::new();
    if let Some(piece) = b.get(from) {
        gen_moves(b, piece, from, &mut res);
    }
    res
}

/// Same as [`valid_moves()`], but returns the targets as a square set
pub fn target_set(b: &Board, from: Square) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    if let Some(piece) = b.get(from) {
        gen_moves(b, piece, from, &mut res);
    }
    res
}
