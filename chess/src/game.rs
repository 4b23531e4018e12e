//! Game controller
//!
//! [`Game`] keeps the board together with everything around it: the side to move, the
//! selected piece, the running duel, the pending promotion and the score. It is driven by
//! square clicks and by frame updates.

use crate::arena::{CombatStatus, Direction, Duel};
use crate::board::{Board, MoveError, MoveOutcome, PromoteError};
use crate::config::Config;
use crate::movegen::{self, MoveList};
use crate::score::ScoreBoard;
use crate::types::{PieceKind, Side, Square};

use std::mem;

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("square {0} is out of bounds")]
    OutOfBounds(Square),
    #[error("no promotion is pending")]
    NoPromotion,
    #[error("bad move: {0}")]
    Move(#[from] MoveError),
    #[error("bad promotion: {0}")]
    Promote(#[from] PromoteError),
}

/// Result of [`Game::click()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEvent {
    /// Nothing happened
    Ignored,
    /// A piece of the side to move was selected; its targets are in [`Game::targets()`]
    Selected(Square),
    /// The selection was cleared
    Deselected,
    /// The selected piece moved to an empty square
    Moved {
        from: Square,
        to: Square,
        promotion: Option<Square>,
    },
    /// The selected piece attacked an enemy piece and a duel has started
    DuelStarted { from: Square, to: Square },
}

/// Final result of the game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub winner: Side,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Side,
    config: Config,
    score: ScoreBoard,
    selected: Option<Square>,
    targets: MoveList,
    duel: Option<Duel>,
    promotion: Option<Square>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a new game from the initial position
    pub fn new(config: Config) -> Game {
        let board = Board::initial(&config.stats);
        Game::with_board(board, Side::White, config)
    }

    /// Starts a game from an arbitrary position
    pub fn with_board(board: Board, turn: Side, config: Config) -> Game {
        Game {
            board,
            turn,
            config,
            score: ScoreBoard::new(),
            selected: None,
            targets: MoveList::new(),
            duel: None,
            promotion: None,
            outcome: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move
    #[inline]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Targets of the selected piece
    #[inline]
    pub fn targets(&self) -> &[Square] {
        &self.targets
    }

    #[inline]
    pub fn duel(&self) -> Option<&Duel> {
        self.duel.as_ref()
    }

    /// Square of the pawn waiting to be promoted
    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.promotion
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Handles a click on square `sq`
    ///
    /// A click on one of the targets of the selected piece makes the move and passes the turn.
    /// Any other click clears the selection and then selects the clicked piece if it belongs
    /// to the side to move. Clicks are ignored while a duel or a promotion is pending, and
    /// after the game is over.
    pub fn click(&mut self, sq: Square) -> Result<ClickEvent, GameError> {
        if self.is_over() || self.duel.is_some() || self.promotion.is_some() {
            return Ok(ClickEvent::Ignored);
        }
        if !sq.is_valid() {
            return Err(GameError::OutOfBounds(sq));
        }

        let selected = self.selected.take();
        let targets = mem::take(&mut self.targets);
        if let Some(from) = selected {
            if targets.contains(&sq) {
                return self.do_move(from, sq);
            }
        }

        match self.board.get(sq) {
            Some(piece) if piece.side() == self.turn => {
                self.selected = Some(sq);
                self.targets = movegen::valid_moves(&self.board, sq);
                Ok(ClickEvent::Selected(sq))
            }
            _ => Ok(match selected {
                Some(_) => ClickEvent::Deselected,
                None => ClickEvent::Ignored,
            }),
        }
    }

    fn do_move(&mut self, from: Square, to: Square) -> Result<ClickEvent, GameError> {
        let outcome = self.board.make_move(from, to)?;
        self.score.record_move();
        self.turn = self.turn.inv();
        match outcome {
            MoveOutcome::Relocated { promotion } => {
                if let Some(sq) = promotion {
                    debug!("pawn on {} awaits promotion", sq);
                }
                self.promotion = promotion;
                Ok(ClickEvent::Moved {
                    from,
                    to,
                    promotion,
                })
            }
            MoveOutcome::Attack(e) => {
                self.duel = Some(Duel::new(e, self.config.arena));
                Ok(ClickEvent::DuelStarted { from, to })
            }
        }
    }

    /// Advances the running duel by `dt` seconds
    ///
    /// Returns `None` if there is no duel. Once the duel is concluded, the survivor is put
    /// back onto the board and the capture is recorded. If a king has fallen, the game is over.
    pub fn advance(&mut self, dt: f32) -> Result<Option<CombatStatus>, GameError> {
        let Some(duel) = self.duel.as_mut() else {
            return Ok(None);
        };
        let status = duel.advance(dt);
        if !status.is_over() {
            return Ok(Some(status));
        }
        let Some(duel) = self.duel.take() else {
            return Ok(Some(status));
        };
        let result = match duel.finish() {
            Ok(result) => result,
            Err(duel) => {
                self.duel = Some(duel);
                return Ok(Some(status));
            }
        };

        let settlement = self.board.settle(result)?;
        self.score.record_capture(&settlement.loser, settlement.winner);
        self.promotion = settlement.promotion;
        if settlement.king_fallen {
            info!("{} king has fallen, {} wins", settlement.loser.side(), settlement.winner);
            self.outcome = Some(Outcome {
                winner: settlement.winner,
            });
        }
        Ok(Some(status))
    }

    /// Moves the fighter of side `s` in the running duel
    ///
    /// Returns `true` if the fighter moved.
    pub fn nudge(&mut self, s: Side, dir: Direction) -> bool {
        self.duel.as_mut().map_or(false, |d| d.nudge(s, dir))
    }

    /// Promotes the pawn waiting for promotion
    pub fn promote(&mut self, kind: PieceKind) -> Result<(), GameError> {
        let sq = self.promotion.ok_or(GameError::NoPromotion)?;
        self.board.promote(sq, kind, &self.config.stats)?;
        self.promotion = None;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaConfig;
    use crate::stats::StatTable;

    fn fast_config(stats: StatTable) -> Config {
        Config {
            stats,
            arena: ArenaConfig {
                countdown: 0.0,
                ..ArenaConfig::default()
            },
        }
    }

    fn game(diagram: &str, turn: Side, stats: StatTable) -> Game {
        let board = Board::from_diagram(diagram, &stats).unwrap();
        Game::with_board(board, turn, fast_config(stats))
    }

    fn run_duel(g: &mut Game) -> CombatStatus {
        for _ in 0..1000 {
            let status = g.advance(0.1).unwrap().unwrap();
            if status.is_over() {
                return status;
            }
        }
        panic!("duel is too long");
    }

    #[test]
    fn test_select() {
        let mut g = Game::default();
        assert_eq!(g.turn(), Side::White);

        // Enemy pieces and empty squares cannot be selected
        assert_eq!(g.click(Square::new(0, 1)).unwrap(), ClickEvent::Ignored);
        assert_eq!(g.click(Square::new(0, 4)).unwrap(), ClickEvent::Ignored);

        assert_eq!(
            g.click(Square::new(0, 6)).unwrap(),
            ClickEvent::Selected(Square::new(0, 6))
        );
        assert_eq!(g.selected(), Some(Square::new(0, 6)));
        assert_eq!(g.targets().len(), 2);

        // Clicking another own piece moves the selection
        assert_eq!(
            g.click(Square::new(1, 7)).unwrap(),
            ClickEvent::Selected(Square::new(1, 7))
        );
        assert_eq!(g.click(Square::new(4, 4)).unwrap(), ClickEvent::Deselected);
        assert_eq!(g.selected(), None);
        assert!(g.targets().is_empty());

        assert_eq!(
            g.click(Square::new(8, 0)),
            Err(GameError::OutOfBounds(Square::new(8, 0)))
        );
    }

    #[test]
    fn test_move() {
        let mut g = Game::default();
        g.click(Square::new(4, 6)).unwrap();
        assert_eq!(
            g.click(Square::new(4, 4)).unwrap(),
            ClickEvent::Moved {
                from: Square::new(4, 6),
                to: Square::new(4, 4),
                promotion: None,
            }
        );
        assert_eq!(g.turn(), Side::Black);
        assert_eq!(g.score().move_count(), 1);
        assert!(g.board().is_empty(Square::new(4, 6)));

        // White pieces cannot be selected on Black's turn
        assert_eq!(g.click(Square::new(4, 4)).unwrap(), ClickEvent::Ignored);
        g.click(Square::new(1, 0)).unwrap();
        assert_eq!(g.targets().len(), 2);
    }

    #[test]
    fn test_duel() {
        let mut g = game("8/8/p7/8/8/8/8/R7", Side::White, StatTable::new());
        assert_eq!(g.advance(0.1).unwrap(), None);

        g.click(Square::new(0, 7)).unwrap();
        assert_eq!(
            g.click(Square::new(0, 2)).unwrap(),
            ClickEvent::DuelStarted {
                from: Square::new(0, 7),
                to: Square::new(0, 2),
            }
        );
        assert_eq!(g.turn(), Side::Black);
        assert!(g.duel().is_some());
        assert!(g.board().is_empty(Square::new(0, 2)));
        assert_eq!(g.click(Square::new(0, 2)).unwrap(), ClickEvent::Ignored);

        // The rook has more hit points and shoots faster
        let CombatStatus::Concluded(outcome) = run_duel(&mut g) else {
            unreachable!();
        };
        assert!(outcome.attacker_won);
        assert!(g.duel().is_none());
        assert!(g.board().is_empty(Square::new(0, 7)));
        let rook = g.board().get(Square::new(0, 2)).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert_eq!(rook.position(), Square::new(0, 2));
        assert_eq!(g.score().captured(Side::White, PieceKind::Pawn), 1);
        assert_eq!(g.outcome(), None);
        assert!(!g.nudge(Side::White, Direction::Up));
    }

    #[test]
    fn test_king_falls() {
        let mut stats = StatTable::new();
        stats.set_hp(PieceKind::King, 1).unwrap();
        let mut g = game("3k4/8/8/8/8/8/8/3R3K", Side::White, stats);
        g.click(Square::new(3, 7)).unwrap();
        g.click(Square::new(3, 0)).unwrap();
        assert!(g.nudge(Side::Black, Direction::Left));
        let status = run_duel(&mut g);
        assert!(matches!(status, CombatStatus::Concluded(o) if o.king_fallen));
        assert_eq!(g.outcome(), Some(Outcome { winner: Side::White }));
        assert_eq!(g.board().king(Side::Black), None);
        assert_eq!(g.board().king(Side::White), Some(Square::new(7, 7)));
        assert_eq!(g.click(Square::new(3, 0)).unwrap(), ClickEvent::Ignored);
    }

    #[test]
    fn test_promotion() {
        let mut g = game("8/P7/8/8/8/8/8/k6K", Side::White, StatTable::new());
        assert_eq!(g.promote(PieceKind::Queen), Err(GameError::NoPromotion));
        g.click(Square::new(0, 1)).unwrap();
        assert_eq!(
            g.click(Square::new(0, 0)).unwrap(),
            ClickEvent::Moved {
                from: Square::new(0, 1),
                to: Square::new(0, 0),
                promotion: Some(Square::new(0, 0)),
            }
        );
        assert_eq!(g.pending_promotion(), Some(Square::new(0, 0)));
        assert_eq!(g.click(Square::new(0, 7)).unwrap(), ClickEvent::Ignored);

        assert_eq!(
            g.promote(PieceKind::King),
            Err(GameError::Promote(PromoteError::BadKind(PieceKind::King)))
        );
        g.promote(PieceKind::Queen).unwrap();
        assert_eq!(g.pending_promotion(), None);
        let queen = g.board().get(Square::new(0, 0)).unwrap();
        assert_eq!(queen.kind(), PieceKind::Queen);
        assert_eq!(queen.hp(), 15);

        assert_eq!(
            g.click(Square::new(0, 7)).unwrap(),
            ClickEvent::Selected(Square::new(0, 7))
        );
    }
}
