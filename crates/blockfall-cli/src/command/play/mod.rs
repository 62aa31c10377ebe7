use blockfall_engine::{GameSession, PieceSeed};
use ratatui_runtime::Runtime;
use serde::Serialize;

use self::app::PlayApp;

mod app;
mod keymap;

const DEFAULT_FPS: u16 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for a reproducible piece sequence (32 hexadecimal digits)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Ticks and frames per second
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u16).range(1..))]
    fps: u16,
    /// Hide the landing position of the falling piece
    #[clap(long)]
    no_ghost: bool,
    /// Print the final statistics as JSON on exit
    #[clap(long)]
    summary: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            fps: DEFAULT_FPS,
            no_ghost: false,
            summary: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        fps,
        no_ghost,
        summary,
    } = arg;

    let mut app = PlayApp::new(*seed, f64::from(*fps), !no_ghost);
    Runtime::new().run(&mut app)?;

    // The terminal has been restored, so stdout is ours again.
    if *summary {
        let summary = SessionSummary::new(app.session());
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Final statistics of the last session played.
#[derive(Debug, Serialize)]
struct SessionSummary {
    seed: PieceSeed,
    score: usize,
    level: usize,
    cleared_lines: usize,
    completed_pieces: usize,
    play_time_secs: f64,
    game_over: bool,
}

impl SessionSummary {
    fn new(session: &GameSession) -> Self {
        let stats = session.stats();
        Self {
            seed: session.seed(),
            score: stats.score(),
            level: stats.level(),
            cleared_lines: stats.cleared_lines(),
            completed_pieces: stats.completed_pieces(),
            play_time_secs: session.play_time().as_secs_f64(),
            game_over: session.is_game_over(),
        }
    }
}
