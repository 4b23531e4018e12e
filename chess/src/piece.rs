//! Pieces and their combat stats

use crate::arena::{Point, Projectile};
use crate::stats::{StatProvider, Stats};
use crate::types::{PieceKind, Side, Square};

use std::fmt;

/// Piece on the board
///
/// Kind and side identify the piece; hit points and attack rate are read from a
/// [`StatProvider`] on creation and on promotion. During a duel the hit points are lowered
/// by each hit, and the piece is defeated as soon as they drop to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    side: Side,
    position: Square,
    hp: i32,
    attack_rate: f32,
}

impl Piece {
    pub fn new(side: Side, kind: PieceKind, position: Square, stats: &impl StatProvider) -> Piece {
        Piece::with_stats(side, kind, position, stats.stats(kind))
    }

    pub fn with_stats(side: Side, kind: PieceKind, position: Square, stats: Stats) -> Piece {
        Piece {
            kind,
            side,
            position,
            hp: stats.hp,
            attack_rate: stats.attack_rate,
        }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn position(&self) -> Square {
        self.position
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Number of shots per second
    #[inline]
    pub fn attack_rate(&self) -> f32 {
        self.attack_rate
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Seconds between two consecutive shots
    ///
    /// Returns `None` if the piece never shoots.
    pub fn reload_time(&self) -> Option<f32> {
        if self.attack_rate > 0.0 && self.attack_rate.is_finite() {
            Some(1.0 / self.attack_rate)
        } else {
            None
        }
    }

    /// Fires a projectile from `origin` towards `target`
    ///
    /// The projectile belongs to the side of the piece.
    pub fn shoot(&self, origin: Point, target: Point, speed: f32) -> Projectile {
        Projectile::new(self.side, origin, target, speed)
    }

    /// Replaces the combat stats, e. g. after the stat table was edited
    pub fn set_stats(&mut self, stats: Stats) {
        self.hp = stats.hp;
        self.attack_rate = stats.attack_rate;
    }

    /// Changes the kind of the piece in place and reloads its stats for the new kind
    pub fn set_kind(&mut self, kind: PieceKind, stats: &impl StatProvider) {
        self.kind = kind;
        self.set_stats(stats.stats(kind));
    }

    pub(crate) fn set_position(&mut self, position: Square) {
        self.position = position;
    }

    pub(crate) fn take_hit(&mut self) {
        self.hp -= 1;
    }

    /// Returns the letter of the piece, upper-case for White and lower-case for Black
    pub fn as_char(&self) -> char {
        let c = self.kind.as_char();
        match self.side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    /// Returns the name of the piece, like `"white-knight"`
    pub fn name(&self) -> String {
        format!("{}-{}", self.side.name(), self.kind.name())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DefaultStats, StatTable};

    #[test]
    fn test_stats() {
        let sq = Square::new(1, 7);
        let knight = Piece::new(Side::White, PieceKind::Knight, sq, &DefaultStats);
        assert_eq!(knight.hp(), 10);
        assert_eq!(knight.attack_rate(), 1.5);
        assert_eq!(knight.position(), sq);
        assert_eq!(knight.name(), "white-knight");
        assert_eq!(knight.to_string(), "N");

        let mut table = StatTable::new();
        table.set_hp(PieceKind::Knight, 2).unwrap();
        let knight = Piece::new(Side::Black, PieceKind::Knight, sq, &table);
        assert_eq!(knight.hp(), 2);
        assert_eq!(knight.to_string(), "n");
    }

    #[test]
    fn test_promote() {
        let sq = Square::new(4, 0);
        let mut pawn = Piece::new(Side::White, PieceKind::Pawn, sq, &DefaultStats);
        pawn.set_kind(PieceKind::Queen, &DefaultStats);
        assert_eq!(pawn.kind(), PieceKind::Queen);
        assert_eq!(pawn.side(), Side::White);
        assert_eq!(pawn.position(), sq);
        assert_eq!(pawn.hp(), 15);
        assert_eq!(pawn.attack_rate(), 3.0);
    }

    #[test]
    fn test_damage() {
        let mut pawn = Piece::new(Side::Black, PieceKind::Pawn, Square::new(0, 1), &DefaultStats);
        assert!(!pawn.is_defeated());
        assert_eq!(pawn.reload_time(), Some(1.0));
        pawn.take_hit();
        assert!(pawn.is_defeated());

        pawn.set_stats(Stats { hp: 3, attack_rate: 0.0 });
        assert!(!pawn.is_defeated());
        assert_eq!(pawn.reload_time(), None);
    }

    #[test]
    fn test_shoot() {
        let bishop = Piece::new(Side::Black, PieceKind::Bishop, Square::new(2, 0), &DefaultStats);
        let p = bishop.shoot(Point::new(1.0, 1.0), Point::new(1.0, 3.0), 5.0);
        assert_eq!(p.owner(), Side::Black);
        assert_eq!(p.position(), Point::new(1.0, 1.0));
        assert_eq!(p.velocity(), Point::new(0.0, 5.0));
    }
}
