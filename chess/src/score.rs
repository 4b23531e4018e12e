use crate::piece::Piece;
use crate::types::{PieceKind, Side};

/// Per-game statistics
///
/// Counts the moves made and the enemy pieces each side has defeated, by kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    moves: u32,
    captures: [[u32; PieceKind::COUNT]; 2],
}

impl ScoreBoard {
    pub fn new() -> ScoreBoard {
        ScoreBoard::default()
    }

    /// Counts a move; attacks count as moves too
    pub fn record_move(&mut self) {
        self.moves += 1;
    }

    /// Records that `winner` has defeated `loser` in a duel
    pub fn record_capture(&mut self, loser: &Piece, winner: Side) {
        self.captures[winner.index()][loser.kind().index()] += 1;
    }

    #[inline]
    pub fn move_count(&self) -> u32 {
        self.moves
    }

    /// Returns how many pieces of kind `kind` were defeated by side `s`
    #[inline]
    pub fn captured(&self, s: Side, kind: PieceKind) -> u32 {
        self.captures[s.index()][kind.index()]
    }

    /// Returns the pieces defeated by side `s`, by kind
    pub fn captures(&self, s: Side) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        PieceKind::iter()
            .map(move |k| (k, self.captured(s, k)))
            .filter(|&(_, n)| n != 0)
    }

    pub fn total_captures(&self, s: Side) -> u32 {
        self.captures[s.index()].iter().sum()
    }

    pub fn reset(&mut self) {
        *self = ScoreBoard::default();
    }
}
