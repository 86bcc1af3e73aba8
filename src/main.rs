//! Metal Snake entry point
//!
//! Sets up logging, settings, audio and high scores, then runs the game loop
//! headless with the autopilot until it quits from the menu.

use std::fs::{self, OpenOptions};

use anyhow::Context;
use env_logger::{Builder, Env, Target};

use metal_snake::audio::{SilentBackend, SoundBank, SoundManager};
use metal_snake::platform::{Autopilot, FrameClock};
use metal_snake::renderer::LogRenderer;
use metal_snake::{Game, HighScores, Settings, persistence};

/// Rounds still running after this many seconds are abandoned by the autopilot
const AUTOPILOT_ROUND_SECS: u64 = 120;

/// Log to the per-user log file when it can be opened, else to stderr
fn init_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    let mut fallback_reason = None;
    match persistence::log_path() {
        Some(path) => {
            let file = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
            match file {
                Ok(file) => {
                    builder.target(Target::Pipe(Box::new(file)));
                }
                Err(e) => fallback_reason = Some(format!("{}: {e}", path.display())),
            }
        }
        None => fallback_reason = Some("no log directory".to_string()),
    }

    builder.init();
    if let Some(reason) = fallback_reason {
        log::warn!("Logging to stderr ({reason})");
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("Metal Snake starting...");

    let settings = Settings::load();

    let bank = SoundBank::synthesize().context("failed to synthesize sound effects")?;
    #[cfg(feature = "wav-export")]
    {
        if let Some(dir) = std::env::var_os("METAL_SNAKE_EXPORT_WAV") {
            bank.export_wav(std::path::Path::new(&dir))
                .context("failed to export sound effects")?;
        }
    }

    let mut sound = SoundManager::new(SilentBackend::new(), bank, settings.audio.clone());
    if let Some(music) = &settings.audio.music_path {
        sound.load_music(music);
    }

    let scores_path = persistence::highscores_path();
    let highscores = match &scores_path {
        Some(path) => HighScores::load_from(path, settings.game.max_scores),
        None => {
            log::warn!("No data directory available, high scores will not be saved");
            HighScores::new(settings.game.max_scores)
        }
    };

    let frame_rate = settings.game.frame_rate.max(1);
    let mut input = Autopilot::new(
        settings.autopilot_rounds,
        u64::from(frame_rate) * AUTOPILOT_ROUND_SECS,
    );
    let mut renderer = LogRenderer::new();
    let mut clock = FrameClock::new(frame_rate);

    let mut game = Game::new(&settings, sound, highscores, scores_path);
    game.run(&mut input, &mut renderer, &mut clock);

    for mode in game.highscores().modes() {
        if let Some(best) = game.highscores().entries(mode).first() {
            log::info!("Best {mode}: {} with {}", best.name, best.score);
        }
    }
    log::info!(
        "Metal Snake exiting after {} rounds",
        input.rounds_played()
    );
    Ok(())
}
