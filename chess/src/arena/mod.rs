//! Real-time duels that replace captures
//!
//! When a piece moves onto an enemy piece, the board lends both pieces to a [`Duel`]. The
//! duel is stepped by the caller with [`Duel::advance()`] once per frame. Each fighter fires
//! [`Projectile`]s at its opponent at the rate given by its stats, and the first fighter to
//! drop to zero hit points loses.

mod duel;
mod point;
mod projectile;

pub use duel::{CombatStatus, Direction, Duel, DuelOutcome, DuelPhase, DuelResult, Fighter};
pub use point::Point;
pub use projectile::Projectile;

use serde::{Deserialize, Serialize};

/// Arena geometry and timing
///
/// All the distances are in fighter-size units.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConfig {
    /// Arena width; projectiles beyond `0..=width` are retired
    pub width: f32,
    /// Arena height; projectiles beyond `0..=height` are retired
    pub height: f32,
    /// Projectile speed, in units per second
    pub projectile_speed: f32,
    /// Side of the projectile hit box
    pub projectile_size: f32,
    /// Side of the fighter hit box
    pub fighter_size: f32,
    /// Delay before the fighters start shooting, in seconds
    pub countdown: f32,
    /// Distance covered by a single [`Duel::nudge()`]
    pub step: f32,
    /// Smallest `x` a fighter may be nudged from
    pub min_x: f32,
    /// Smallest `y` a fighter may be nudged from
    pub min_y: f32,
    /// Fighters are not nudged right once `x` reaches `width - right_margin`
    pub right_margin: f32,
    /// Fighters are not nudged up once `y` reaches `height - top_margin`
    pub top_margin: f32,
}

impl ArenaConfig {
    #[inline]
    pub fn bounds(&self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.width - self.right_margin
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.height - self.top_margin
    }

    /// Initial position of the attacking piece
    pub fn attacker_spawn(&self) -> Point {
        Point::new(self.width / 2.0, self.height * 0.8)
    }

    /// Initial position of the defending piece
    pub fn defender_spawn(&self) -> Point {
        Point::new(self.width / 2.0, self.height * 0.2)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            width: 16.0,
            height: 12.0,
            projectile_speed: 5.0,
            projectile_size: 0.2,
            fighter_size: 1.0,
            countdown: 3.0,
            step: 0.07,
            min_x: 0.3,
            min_y: 0.2,
            right_margin: 1.15,
            top_margin: 1.3,
        }
    }
}
