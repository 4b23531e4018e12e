//! Combat stats of the pieces

use crate::types::PieceKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid stat value
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatsError {
    /// Hit points must be positive
    #[error("hit points of {kind} must be positive, got {hp}")]
    BadHitPoints { kind: PieceKind, hp: i32 },
    /// Attack rate must be positive and finite
    #[error("attack rate of {kind} must be positive, got {rate}")]
    BadAttackRate { kind: PieceKind, rate: f32 },
}

/// Combat stats of a single piece kind
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Hit points the piece enters the duel with
    pub hp: i32,
    /// Number of shots per second
    pub attack_rate: f32,
}

impl Stats {
    /// Returns the baseline stats for `kind`
    pub const fn baseline(kind: PieceKind) -> Stats {
        let (hp, attack_rate) = match kind {
            PieceKind::Pawn => (1, 1.0),
            PieceKind::Knight => (10, 1.5),
            PieceKind::Bishop => (3, 2.5),
            PieceKind::Rook => (10, 2.0),
            PieceKind::Queen => (15, 3.0),
            PieceKind::King => (20, 1.0),
        };
        Stats { hp, attack_rate }
    }

    fn validate(&self, kind: PieceKind) -> Result<(), StatsError> {
        if self.hp <= 0 {
            return Err(StatsError::BadHitPoints { kind, hp: self.hp });
        }
        if !(self.attack_rate.is_finite() && self.attack_rate > 0.0) {
            return Err(StatsError::BadAttackRate {
                kind,
                rate: self.attack_rate,
            });
        }
        Ok(())
    }
}

/// Source of piece stats
///
/// Pieces read their stats once, when they are created or promoted.
pub trait StatProvider {
    fn hit_points(&self, kind: PieceKind) -> i32;
    fn attack_rate(&self, kind: PieceKind) -> f32;

    fn stats(&self, kind: PieceKind) -> Stats {
        Stats {
            hp: self.hit_points(kind),
            attack_rate: self.attack_rate(kind),
        }
    }
}

/// Provider which always returns [`Stats::baseline()`]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DefaultStats;

impl StatProvider for DefaultStats {
    fn hit_points(&self, kind: PieceKind) -> i32 {
        Stats::baseline(kind).hp
    }

    fn attack_rate(&self, kind: PieceKind) -> f32 {
        Stats::baseline(kind).attack_rate
    }
}

/// Editable table of stats, one entry per piece kind
///
/// In TOML, the table is keyed by the lowercase kind name. Kinds or fields missing from
/// the input keep their baseline values:
///
/// ```toml
/// [pawn]
/// hp = 1
/// attack_rate = 1.0
///
/// [queen]
/// hp = 12
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct StatTable([Stats; PieceKind::COUNT]);

impl StatTable {
    pub fn new() -> StatTable {
        StatTable(PieceKind::ALL.map(Stats::baseline))
    }

    #[inline]
    pub fn get(&self, kind: PieceKind) -> Stats {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: PieceKind, stats: Stats) -> Result<(), StatsError> {
        stats.validate(kind)?;
        self.0[kind.index()] = stats;
        Ok(())
    }

    pub fn set_hp(&mut self, kind: PieceKind, hp: i32) -> Result<(), StatsError> {
        self.set(kind, Stats { hp, ..self.get(kind) })
    }

    pub fn set_attack_rate(&mut self, kind: PieceKind, attack_rate: f32) -> Result<(), StatsError> {
        self.set(
            kind,
            Stats {
                attack_rate,
                ..self.get(kind)
            },
        )
    }
}

impl Default for StatTable {
    fn default() -> StatTable {
        StatTable::new()
    }
}

impl StatProvider for StatTable {
    fn hit_points(&self, kind: PieceKind) -> i32 {
        self.get(kind).hp
    }

    fn attack_rate(&self, kind: PieceKind) -> f32 {
        self.get(kind).attack_rate
    }
}

#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attack_rate: Option<f32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTable {
    pawn: RawStats,
    bishop: RawStats,
    knight: RawStats,
    rook: RawStats,
    queen: RawStats,
    king: RawStats,
}

impl RawTable {
    fn entry(&self, kind: PieceKind) -> RawStats {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Bishop => self.bishop,
            PieceKind::Knight => self.knight,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }

    fn entry_mut(&mut self, kind: PieceKind) -> &mut RawStats {
        match kind {
            PieceKind::Pawn => &mut self.pawn,
            PieceKind::Bishop => &mut self.bishop,
            PieceKind::Knight => &mut self.knight,
            PieceKind::Rook => &mut self.rook,
            PieceKind::Queen => &mut self.queen,
            PieceKind::King => &mut self.king,
        }
    }
}

impl TryFrom<RawTable> for StatTable {
    type Error = StatsError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let mut table = StatTable::new();
        for kind in PieceKind::iter() {
            let base = Stats::baseline(kind);
            let entry = raw.entry(kind);
            table.set(
                kind,
                Stats {
                    hp: entry.hp.unwrap_or(base.hp),
                    attack_rate: entry.attack_rate.unwrap_or(base.attack_rate),
                },
            )?;
        }
        Ok(table)
    }
}

impl From<StatTable> for RawTable {
    fn from(table: StatTable) -> Self {
        let mut raw = RawTable::default();
        for kind in PieceKind::iter() {
            let stats = table.get(kind);
            *raw.entry_mut(kind) = RawStats {
                hp: Some(stats.hp),
                attack_rate: Some(stats.attack_rate),
            };
        }
        raw
    }
}
