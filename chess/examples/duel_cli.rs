// Plays a short scripted game headless and prints what happens
//
// Usage: duel_cli [CONFIG.toml]

use duelchess::{arena::CombatStatus, config::Config, ClickEvent, Game, PieceKind, Side, Square};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::{env, error::Error};

const FRAME: f32 = 1.0 / 60.0;

const SCRIPT: [((i8, i8), (i8, i8)); 5] = [
    ((4, 6), (4, 4)),
    ((3, 1), (3, 3)),
    ((4, 4), (3, 3)),
    ((2, 0), (6, 4)),
    ((3, 6), (3, 4)),
];

fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let config = match env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut game = Game::new(config);

    for ((from_file, from_rank), (to_file, to_rank)) in SCRIPT {
        let from = Square::new(from_file, from_rank);
        let to = Square::new(to_file, to_rank);
        println!("{}", game.board());
        game.click(from)?;
        match game.click(to)? {
            ClickEvent::Moved { promotion, .. } => {
                println!("{} -> {}", from, to);
                if promotion.is_some() {
                    game.promote(PieceKind::Queen)?;
                }
            }
            ClickEvent::DuelStarted { .. } => {
                println!("{} attacks {}", from, to);
                play_duel(&mut game)?;
            }
            ev => {
                println!("cannot play {} -> {}: {:?}", from, to, ev);
                break;
            }
        }
        if let Some(outcome) = game.outcome() {
            println!("{} wins", outcome.winner);
            break;
        }
    }

    println!("{}", game.board());
    println!("moves: {}", game.score().move_count());
    for side in [Side::White, Side::Black] {
        let captures: Vec<_> = game
            .score()
            .captures(side)
            .map(|(kind, n)| format!("{} x{}", kind, n))
            .collect();
        println!("{} captured: [{}]", side, captures.join(", "));
    }
    Ok(())
}

fn play_duel(game: &mut Game) -> Result<(), Box<dyn Error>> {
    let mut frames = 0_u32;
    while let Some(status) = game.advance(FRAME)? {
        frames += 1;
        if let CombatStatus::Concluded(outcome) = status {
            println!(
                "duel over after {:.2}s, {} won",
                frames as f32 * FRAME,
                outcome.winner
            );
            break;
        }
    }
    Ok(())
}
