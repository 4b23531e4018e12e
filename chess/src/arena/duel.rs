use super::point::Point;
use super::projectile::Projectile;
use super::ArenaConfig;
use crate::board::Engagement;
use crate::piece::Piece;
use crate::types::{PieceKind, Side, Square};

use log::info;

/// Piece fighting in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    piece: Piece,
    position: Point,
    cooldown: f32,
}

impl Fighter {
    fn new(piece: Piece, position: Point) -> Fighter {
        Fighter {
            piece,
            position,
            cooldown: 0.0,
        }
    }

    #[inline]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.piece.side()
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Time elapsed since the last shot
    #[inline]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Fires a projectile at `target`
    pub fn shoot(&self, target: Point, speed: f32) -> Projectile {
        self.piece.shoot(self.position, target, speed)
    }

    fn is_ready(&self) -> bool {
        !self.piece.is_defeated()
            && self
                .piece
                .reload_time()
                .map_or(false, |reload| self.cooldown >= reload)
    }

    fn is_hit_by(&self, p: &Projectile, config: &ArenaConfig) -> bool {
        p.hits(
            self.side(),
            self.position,
            config.fighter_size,
            config.projectile_size,
        )
    }
}

/// Direction to nudge a fighter
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DuelPhase {
    /// Nobody shoots yet; contains the remaining time
    Countdown(f32),
    Active,
    Concluded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DuelOutcome {
    /// Side of the surviving piece
    pub winner: Side,
    /// Whether the piece that initiated the move survived
    pub attacker_won: bool,
    /// Whether the defeated piece is a king
    pub king_fallen: bool,
}

/// Status reported by [`Duel::advance()`]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CombatStatus {
    Countdown { remaining: f32 },
    Active,
    Concluded(DuelOutcome),
}

impl CombatStatus {
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, CombatStatus::Concluded(_))
    }
}

/// Concluded duel, ready to be passed to [`Board::settle()`](crate::Board::settle)
#[derive(Debug, Clone, PartialEq)]
pub struct DuelResult {
    pub from: Square,
    pub to: Square,
    pub attacker: Piece,
    pub defender: Piece,
    pub outcome: DuelOutcome,
}

/// Duel between two pieces
///
/// The duel starts with a countdown. After that, every call to [`Duel::advance()`] does the
/// following, in order:
///
/// 1. increases the cooldowns of both fighters by `dt`;
/// 2. lets every fighter whose cooldown reached its reload time shoot at the current position
///    of the opponent, attacker first, and resets its cooldown;
/// 3. moves all the projectiles;
/// 4. applies the hits, removing the projectiles that hit (a projectile hitting both
///    fighters hurts only the attacker);
/// 5. removes the projectiles that left the arena.
///
/// A projectile is never checked for hits before it has moved at least once. The duel ends
/// as soon as one of the fighters is defeated; the projectiles left after that are not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Duel {
    from: Square,
    to: Square,
    attacker: Fighter,
    defender: Fighter,
    projectiles: Vec<Projectile>,
    phase: DuelPhase,
    config: ArenaConfig,
}

impl Duel {
    /// Creates a duel with the fighters at their spawn points
    pub fn new(e: Engagement, config: ArenaConfig) -> Duel {
        let (a, d) = (config.attacker_spawn(), config.defender_spawn());
        Duel::with_positions(e, a, d, config)
    }

    /// Creates a duel with the fighters at the given positions
    pub fn with_positions(
        e: Engagement,
        attacker_pos: Point,
        defender_pos: Point,
        config: ArenaConfig,
    ) -> Duel {
        let phase = if config.countdown > 0.0 {
            DuelPhase::Countdown(config.countdown)
        } else {
            DuelPhase::Active
        };
        let mut duel = Duel {
            from: e.from,
            to: e.to,
            attacker: Fighter::new(e.attacker, attacker_pos),
            defender: Fighter::new(e.defender, defender_pos),
            projectiles: Vec::new(),
            phase,
            config,
        };
        // A piece may already be out of hit points when it enters the arena
        if duel.is_over() {
            duel.conclude();
        }
        duel
    }

    fn conclude(&mut self) {
        self.phase = DuelPhase::Concluded;
        if let Some(outcome) = self.outcome() {
            info!(
                "duel on {} won by {}",
                self.to,
                self.fighter(outcome.winner).piece.name()
            );
        }
    }

    /// Skips the countdown
    pub fn start(&mut self) {
        if let DuelPhase::Countdown(_) = self.phase {
            self.phase = DuelPhase::Active;
            info!(
                "duel started: {} vs {}",
                self.attacker.piece.name(),
                self.defender.piece.name()
            );
        }
    }

    #[inline]
    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[inline]
    pub fn attacker(&self) -> &Fighter {
        &self.attacker
    }

    #[inline]
    pub fn defender(&self) -> &Fighter {
        &self.defender
    }

    /// Returns the fighter of side `s`
    pub fn fighter(&self, s: Side) -> &Fighter {
        if self.attacker.side() == s {
            &self.attacker
        } else {
            &self.defender
        }
    }

    fn fighter_mut(&mut self, s: Side) -> &mut Fighter {
        if self.attacker.side() == s {
            &mut self.attacker
        } else {
            &mut self.defender
        }
    }

    #[inline]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.attacker.piece.is_defeated() || self.defender.piece.is_defeated()
    }

    #[inline]
    pub fn attacker_won(&self) -> bool {
        self.defender.piece.is_defeated()
    }

    pub fn outcome(&self) -> Option<DuelOutcome> {
        if !self.is_over() {
            return None;
        }
        let attacker_won = self.attacker_won();
        let (winner, loser) = if attacker_won {
            (&self.attacker, &self.defender)
        } else {
            (&self.defender, &self.attacker)
        };
        Some(DuelOutcome {
            winner: winner.side(),
            attacker_won,
            king_fallen: loser.piece.kind() == PieceKind::King,
        })
    }

    pub fn status(&self) -> CombatStatus {
        match self.phase {
            DuelPhase::Countdown(remaining) => CombatStatus::Countdown { remaining },
            DuelPhase::Active => CombatStatus::Active,
            DuelPhase::Concluded => match self.outcome() {
                Some(outcome) => CombatStatus::Concluded(outcome),
                None => CombatStatus::Active,
            },
        }
    }

    /// Advances the duel by `dt` seconds
    ///
    /// If the countdown runs out during this call, the fighters already act in it with the
    /// full `dt`. Calls on a concluded duel change nothing.
    pub fn advance(&mut self, dt: f32) -> CombatStatus {
        if self.phase != DuelPhase::Concluded && self.is_over() {
            self.conclude();
        }
        match self.phase {
            DuelPhase::Concluded => return self.status(),
            DuelPhase::Countdown(remaining) => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = DuelPhase::Countdown(remaining);
                    return self.status();
                }
                self.start();
            }
            DuelPhase::Active => {}
        }
        self.step(dt);
        self.status()
    }

    fn step(&mut self, dt: f32) {
        let Duel {
            attacker,
            defender,
            projectiles,
            config,
            ..
        } = &mut *self;

        attacker.cooldown += dt;
        defender.cooldown += dt;

        if attacker.is_ready() {
            projectiles.push(attacker.shoot(defender.position, config.projectile_speed));
            attacker.cooldown = 0.0;
        }
        if defender.is_ready() {
            projectiles.push(defender.shoot(attacker.position, config.projectile_speed));
            defender.cooldown = 0.0;
        }

        for p in projectiles.iter_mut() {
            p.advance(dt);
        }

        let mut over = false;
        projectiles.retain(|p| {
            if over {
                return true;
            }
            let victim = if attacker.is_hit_by(p, config) {
                &mut *attacker
            } else if defender.is_hit_by(p, config) {
                &mut *defender
            } else {
                return true;
            };
            victim.piece.take_hit();
            over = victim.piece.is_defeated();
            false
        });

        let bounds = config.bounds();
        projectiles.retain(|p| !p.is_out_of_bounds(bounds));

        if over {
            self.conclude();
        }
    }

    /// Moves the fighter of side `s` by one step in direction `dir`
    ///
    /// Fighters only move while the duel is active, and never past the arena margins.
    /// Returns `true` if the fighter moved.
    pub fn nudge(&mut self, s: Side, dir: Direction) -> bool {
        if self.phase != DuelPhase::Active {
            return false;
        }
        let c = self.config;
        let pos = &mut self.fighter_mut(s).position;
        let allowed = match dir {
            Direction::Up => pos.y < c.max_y(),
            Direction::Down => pos.y > c.min_y,
            Direction::Left => pos.x > c.min_x,
            Direction::Right => pos.x < c.max_x(),
        };
        if !allowed {
            return false;
        }
        match dir {
            Direction::Up => pos.y += c.step,
            Direction::Down => pos.y -= c.step,
            Direction::Left => pos.x -= c.step,
            Direction::Right => pos.x += c.step,
        }
        true
    }

    /// Returns the pieces back with the outcome of the duel
    ///
    /// Fails if the duel is not concluded yet, giving the duel back.
    pub fn finish(self) -> Result<DuelResult, Duel> {
        let Some(outcome) = self.outcome() else {
            return Err(self);
        };
        let Duel {
            from,
            to,
            attacker,
            defender,
            ..
        } = self;
        Ok(DuelResult {
            from,
            to,
            attacker: attacker.piece,
            defender: defender.piece,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn piece(side: Side, kind: PieceKind, sq: Square, hp: i32, attack_rate: f32) -> Piece {
        Piece::with_stats(side, kind, sq, Stats { hp, attack_rate })
    }

    fn engagement(hp: (i32, i32), rate: (f32, f32)) -> Engagement {
        let from = Square::new(0, 6);
        let to = Square::new(1, 5);
        Engagement {
            from,
            to,
            attacker: piece(Side::White, PieceKind::Rook, from, hp.0, rate.0),
            defender: piece(Side::Black, PieceKind::King, to, hp.1, rate.1),
        }
    }

    fn no_countdown() -> ArenaConfig {
        ArenaConfig {
            countdown: 0.0,
            ..ArenaConfig::default()
        }
    }

    fn run(duel: &mut Duel, dt: f32, max_steps: usize) -> Vec<CombatStatus> {
        let mut res = Vec::new();
        for _ in 0..max_steps {
            let status = duel.advance(dt);
            res.push(status);
            if status.is_over() {
                break;
            }
        }
        res
    }

    #[test]
    fn test_countdown() {
        let mut duel = Duel::new(engagement((5, 5), (1.0, 1.0)), ArenaConfig::default());
        assert_eq!(duel.advance(1.0), CombatStatus::Countdown { remaining: 2.0 });
        assert_eq!(duel.advance(1.0), CombatStatus::Countdown { remaining: 1.0 });
        assert!(duel.projectiles().is_empty());
        assert!(!duel.nudge(Side::White, Direction::Left));
        // The countdown expires, and the fighters already shoot in the same call
        assert_eq!(duel.advance(1.0), CombatStatus::Active);
        assert_eq!(duel.projectiles().len(), 2);
    }

    #[test]
    fn test_both_fire() {
        let e = engagement((5, 5), (1.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(1.0, 1.0), Point::new(2.0, 2.0), no_countdown());
        assert_eq!(duel.advance(0.5), CombatStatus::Active);
        assert!(duel.projectiles().is_empty());
        duel.advance(0.5);
        assert_eq!(duel.attacker().cooldown(), 0.0);
        assert_eq!(duel.defender().cooldown(), 0.0);
        let owners: Vec<_> = duel.projectiles().iter().map(Projectile::owner).collect();
        assert_eq!(owners, vec![Side::White, Side::Black]);
    }

    #[test]
    fn test_single_hit() {
        // Projectile speed is 5, so after 1 second the fighters have to be 5 units apart
        let e = engagement((1, 1), (1.0, 0.25));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        assert_eq!(duel.advance(0.5), CombatStatus::Active);
        assert_eq!(duel.advance(0.5), CombatStatus::Active);
        assert_eq!(duel.projectiles().len(), 1);
        let status = duel.advance(0.5);
        assert_eq!(
            status,
            CombatStatus::Concluded(DuelOutcome {
                winner: Side::White,
                attacker_won: true,
                king_fallen: true,
            })
        );
        assert!(duel.projectiles().is_empty());
        assert_eq!(duel.defender().piece().hp(), 0);
        assert_eq!(duel.attacker().piece().hp(), 1);

        // Concluded duels stay concluded
        assert_eq!(duel.advance(10.0), status);
        assert!(duel.projectiles().is_empty());
    }

    #[test]
    fn test_simultaneous_arrival() {
        // Equal cadence on a straight line: both projectiles arrive in the same step, and the
        // attacker's one was fired first
        let e = engagement((1, 1), (1.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        let statuses = run(&mut duel, 0.25, 100);
        assert_eq!(statuses.len(), 7);
        assert_eq!(
            statuses[6],
            CombatStatus::Concluded(DuelOutcome {
                winner: Side::White,
                attacker_won: true,
                king_fallen: true,
            })
        );
        // The defender's projectile is left unprocessed
        assert_eq!(duel.attacker().piece().hp(), 1);

        // A faster defender connects first
        let e = engagement((1, 1), (1.0, 2.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        let statuses = run(&mut duel, 0.25, 100);
        assert_eq!(statuses.len(), 5);
        assert_eq!(
            statuses[4],
            CombatStatus::Concluded(DuelOutcome {
                winner: Side::Black,
                attacker_won: false,
                king_fallen: false,
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let make = || {
            let e = engagement((3, 3), (2.5, 2.5));
            Duel::new(e, ArenaConfig::default())
        };
        let dts = [0.016, 0.017, 0.033, 0.016, 0.05];
        let trace = |mut duel: Duel| {
            let mut res = Vec::new();
            for i in 0..10_000 {
                let status = duel.advance(dts[i % dts.len()]);
                res.push(status);
                if status.is_over() {
                    break;
                }
            }
            res
        };
        let first = trace(make());
        assert!(first.last().map_or(false, CombatStatus::is_over));
        assert_eq!(first, trace(make()));
    }

    #[test]
    fn test_zero_rate_never_fires() {
        let e = engagement((1, 1), (0.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        let statuses = run(&mut duel, 0.1, 1000);
        assert_eq!(
            statuses.last(),
            Some(&CombatStatus::Concluded(DuelOutcome {
                winner: Side::Black,
                attacker_won: false,
                king_fallen: false,
            }))
        );
    }

    #[test]
    fn test_coincident_fighters() {
        let e = engagement((2, 2), (1.0, 1.0));
        let pos = Point::new(5.0, 5.0);
        let mut duel = Duel::with_positions(e, pos, pos, no_countdown());
        duel.advance(1.0);
        // Both projectiles have no direction, stay in place and hit the opponent at once
        assert!(duel.projectiles().is_empty());
        assert_eq!(duel.attacker().piece().hp(), 1);
        assert_eq!(duel.defender().piece().hp(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let config = ArenaConfig {
            projectile_speed: 20.0,
            ..no_countdown()
        };
        let e = engagement((1, 1), (1.0, 0.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 11.0), Point::new(8.0, 1.0), config);
        for _ in 0..4 {
            duel.advance(0.25);
        }
        assert_eq!(duel.projectiles().len(), 1);
        assert_eq!(duel.projectiles()[0].position(), Point::new(8.0, 6.0));

        // The defender steps aside, and the projectile flies out of the arena
        for _ in 0..20 {
            assert!(duel.nudge(Side::Black, Direction::Right));
        }
        duel.advance(0.25);
        assert_eq!(duel.projectiles().len(), 1);
        duel.advance(0.25);
        assert!(duel.projectiles().is_empty());
        assert!(!duel.is_over());
        assert_eq!(duel.status(), CombatStatus::Active);
    }

    #[test]
    fn test_nudge() {
        let config = no_countdown();
        let e = engagement((1, 1), (1.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 6.0), Point::new(0.3, 0.2), config);
        assert!(!duel.nudge(Side::Black, Direction::Left));
        assert!(!duel.nudge(Side::Black, Direction::Down));
        assert!(duel.nudge(Side::Black, Direction::Up));
        assert!(duel.nudge(Side::White, Direction::Right));
        assert_eq!(duel.fighter(Side::White).position().x, 8.0 + config.step);
        assert_eq!(duel.fighter(Side::Black).position().y, 0.2 + config.step);

        let mut moved = 0;
        while duel.nudge(Side::White, Direction::Up) {
            moved += 1;
        }
        assert!(moved > 0);
        assert!(duel.fighter(Side::White).position().y >= config.max_y());
        assert!(duel.fighter(Side::White).position().y < config.max_y() + config.step);
    }

    #[test]
    fn test_finish() {
        let e = engagement((1, 1), (1.0, 0.25));
        let duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        let mut duel = duel.finish().unwrap_err();
        run(&mut duel, 0.5, 100);
        let res = duel.finish().unwrap();
        assert!(res.outcome.attacker_won);
        assert!(res.defender.is_defeated());
        assert_eq!(res.from, Square::new(0, 6));
        assert_eq!(res.to, Square::new(1, 5));
    }

    #[test]
    fn test_defeated_on_entry() {
        let expected = CombatStatus::Concluded(DuelOutcome {
            winner: Side::White,
            attacker_won: true,
            king_fallen: true,
        });

        let e = engagement((1, 0), (0.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 9.0), Point::new(8.0, 4.0), no_countdown());
        assert_eq!(duel.phase(), DuelPhase::Concluded);
        assert_eq!(duel.status(), expected);
        // The defeated defender never shoots, even though its cooldown would allow it
        assert_eq!(duel.advance(1.0), expected);
        assert!(duel.projectiles().is_empty());
        assert_eq!(duel.attacker().piece().hp(), 1);
        assert!(!duel.nudge(Side::Black, Direction::Left));

        // The countdown is skipped as well
        let mut duel = Duel::new(engagement((1, 0), (0.0, 1.0)), ArenaConfig::default());
        assert_eq!(duel.status(), expected);
        assert_eq!(duel.advance(0.5), expected);
        let res = duel.finish().unwrap();
        assert!(res.outcome.attacker_won);
        assert_eq!(res.attacker.hp(), 1);
    }

    #[test]
    fn test_first_volley_then_hit() {
        // 7 units apart: after one second both projectiles are still in flight
        let e = engagement((1, 1), (1.0, 1.0));
        let mut duel = Duel::with_positions(e, Point::new(8.0, 10.0), Point::new(8.0, 3.0), no_countdown());
        assert_eq!(duel.advance(1.0), CombatStatus::Active);
        let positions: Vec<_> = duel.projectiles().iter().map(Projectile::position).collect();
        assert_eq!(positions, vec![Point::new(8.0, 5.0), Point::new(8.0, 8.0)]);

        assert_eq!(duel.advance(0.25), CombatStatus::Active);
        assert_eq!(duel.projectiles().len(), 2);
        assert_eq!(
            duel.advance(0.25),
            CombatStatus::Concluded(DuelOutcome {
                winner: Side::White,
                attacker_won: true,
                king_fallen: true,
            })
        );
        let defeated = [duel.attacker(), duel.defender()]
            .into_iter()
            .filter(|f| f.piece().is_defeated())
            .count();
        assert_eq!(defeated, 1);
        assert_eq!(duel.attacker().piece().hp(), 1);
    }

    #[test]
    fn test_random_duels() {
        let mut rng = StdRng::seed_from_u64(42);
        for iter in 0..60 {
            let hp = (rng.gen_range(1..=5), rng.gen_range(1..=5));
            // Every fifth duel has a defender that never shoots
            let rate = if iter % 5 == 0 {
                (rng.gen_range(0.5..3.0), 0.0)
            } else {
                (rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0))
            };
            let pos_a = Point::new(rng.gen_range(1.0..15.0), rng.gen_range(1.0..11.0));
            let pos_d = Point::new(rng.gen_range(1.0..15.0), rng.gen_range(1.0..11.0));
            let dts: Vec<f32> = (0..64).map(|_| rng.gen_range(0.005..0.05)).collect();

            let make = || Duel::with_positions(engagement(hp, rate), pos_a, pos_d, no_countdown());
            let mut duel = make();
            let mut trace = Vec::new();
            for i in 0..20_000 {
                let before = duel.clone();
                let status = duel.advance(dts[i % dts.len()]);
                trace.push(status);
                for side in [Side::White, Side::Black] {
                    let lost = before.fighter(side).piece().hp() - duel.fighter(side).piece().hp();
                    let enemy_shots = |d: &Duel| {
                        d.projectiles().iter().filter(|p| p.owner() != side).count() as i32
                    };
                    // A fighter is hurt only by enemy projectiles, each of them hitting once,
                    // and the enemy fires at most once per step
                    assert!(lost >= 0);
                    assert!(lost <= enemy_shots(&before) + 1 - enemy_shots(&duel));
                }
                if status.is_over() {
                    break;
                }
            }
            assert!(trace.last().map_or(false, CombatStatus::is_over), "duel {} never ended", iter);
            if rate.1 == 0.0 {
                assert_eq!(duel.attacker().piece().hp(), hp.0);
                assert!(duel.attacker_won());
            }

            let mut replay = make();
            let replayed: Vec<_> = (0..trace.len())
                .map(|i| replay.advance(dts[i % dts.len()]))
                .collect();
            assert_eq!(trace, replayed);
            assert_eq!(duel, replay);
        }
    }
}
