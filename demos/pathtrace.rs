//! Generates a level, replays every enemy's search as ASCII frames, then
//! lets the enemies march on the base while the player stands still.
//!
//! Run: cargo run --bin pathtrace -- --seed 7 --level 3 --frames

use std::thread;
use std::time::Duration;

use basedef_core::{Color, Point};
use basedef_game::{AlgorithmChoice, Direction, GameConfig, GameSession, Phase};
use basedef_paths::{Algorithm, path_cost};
use basedef_ui::{PlaybackConfig, SessionId};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Astar,
    Dijkstra,
    Random,
}

impl From<AlgorithmArg> for AlgorithmChoice {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Astar => AlgorithmChoice::Fixed(Algorithm::AStar),
            AlgorithmArg::Dijkstra => AlgorithmChoice::Fixed(Algorithm::Dijkstra),
            AlgorithmArg::Random => AlgorithmChoice::Random,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pathtrace", about = "Replay base defense enemy searches")]
struct Args {
    /// Seed for level generation.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Level number; also the number of enemies.
    #[arg(long, default_value_t = 2)]
    level: usize,
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Astar)]
    algorithm: AlgorithmArg,
    /// Print every search frame instead of only the final paths.
    #[arg(long)]
    frames: bool,
    /// Milliseconds between printed frames.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Enemy turns to simulate after the replay.
    #[arg(long, default_value_t = 30)]
    turns: usize,
    #[arg(short, long)]
    verbose: bool,
}

/// Route `log` records from the libraries through a `tracing` subscriber.
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let fallback = default_filter(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = GameConfig {
        algorithm: args.algorithm.into(),
        playback: PlaybackConfig {
            interval: Duration::from_millis(args.delay_ms),
            ..PlaybackConfig::default()
        },
        ..GameConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut session = match GameSession::new(cfg, args.level, &mut rng) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Level {} on a {}x{} board\n",
        session.level(),
        session.board().width(),
        session.board().height()
    );
    print!("{}", session.board().render());

    replay_searches(&mut session, &args);
    print_summary(&session);
    march(&mut session, args.turns);
}

fn replay_searches(session: &mut GameSession, args: &Args) {
    let delay = Duration::from_millis(args.delay_ms);
    while let Phase::ShowingPaths { index } = session.phase() {
        if let Err(e) = session.update(delay) {
            eprintln!("Error: {e}");
            return;
        }
        if args.frames && session.phase() == (Phase::ShowingPaths { index }) {
            println!("\nenemy #{index}, {} frames left", session.playback().queued());
            print!("{}", render_layer(session, SessionId(index)));
            thread::sleep(delay);
        }
    }
    for i in 0..session.overlay().layers().len() {
        println!("\nfinal path of enemy #{i}");
        print!("{}", render_layer(session, SessionId(i)));
    }
}

/// Board glyphs with one overlay layer drawn underneath.
fn render_layer(session: &GameSession, layer: SessionId) -> String {
    let board = session.board();
    let mut out = String::new();
    for y in (0..board.height()).rev() {
        for x in 0..board.width() {
            let p = Point::new(x, y);
            let glyph = match (board.occupant(p), session.overlay().cell(layer, p)) {
                (Some(o), _) => o.glyph(),
                (None, Some(c)) if c.visible && c.on_final_path => '+',
                (None, Some(c)) if c.visible => match c.color {
                    Color::RED => 'x',
                    Color::GREY => 'o',
                    Color::GREEN => '*',
                    _ => '?',
                },
                _ => '.',
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_summary(session: &GameSession) {
    println!();
    for enemy in session.enemies() {
        let path: Vec<Point> = enemy.path().collect();
        if path.is_empty() {
            println!("{} at {}: no path to the base", enemy.id(), enemy.pos());
        } else {
            println!(
                "{} at {}: {} path, {} steps, cost {}",
                enemy.id(),
                enemy.pos(),
                enemy.algorithm(),
                path.len(),
                path_cost(enemy.pos(), &path)
            );
        }
    }
}

fn march(session: &mut GameSession, turns: usize) {
    for turn in 1..=turns {
        if session.phase() != Phase::PlayerTurn {
            break;
        }
        // The player waits in the corner; walking off the board is a no-op.
        let waited = session
            .player_move(Direction::Right)
            .and_then(|_| session.update(Duration::ZERO));
        if let Err(e) = waited {
            eprintln!("Error: {e}");
            return;
        }
        println!("turn {turn}: base hp {}", session.base_hp());
    }
    match session.phase() {
        Phase::GameOver => println!("\nAfter {} days, you got overrun.", session.level()),
        _ => println!("\nThe base holds with {} hp.", session.base_hp()),
    }
    print!("{}", session.board().render());
}
