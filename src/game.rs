//! Screen state machine
//!
//! Menu -> Play -> GameOver -> (Menu | Highscores) -> Menu. The game owns the
//! round, the leaderboard and the sound manager, turns input intents into
//! transitions and runs the per-frame update while a round is in play.

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioBackend, SoundEffect, SoundManager};
use crate::consts::DEFAULT_PLAYER_NAME;
use crate::highscores::HighScores;
use crate::platform::{FrameClock, InputEvent, InputSource};
use crate::renderer::{FrameView, Renderer};
use crate::settings::{GameConfig, Settings};
use crate::sim::{GameEvent, GameState, advance_frame};

/// Leaderboard a round counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Classic,
    Obstacles,
}

impl GameMode {
    pub fn from_obstacles(obstacles_enabled: bool) -> Self {
        if obstacles_enabled {
            GameMode::Obstacles
        } else {
            GameMode::Classic
        }
    }

    /// Key used in the high-score file
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Obstacles => "obstacles",
        }
    }
}

/// Result of a finished round, frozen until the player submits or discards it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingScore {
    pub score: u64,
    pub mode: GameMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Play,
    /// Name entry for the round that just ended
    GameOver { pending: PendingScore, name: String },
    Highscores,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Play => "play",
            Screen::GameOver { .. } => "game_over",
            Screen::Highscores => "highscores",
        }
    }
}

pub struct Game<B: AudioBackend> {
    config: GameConfig,
    screen: Screen,
    /// Menu toggle, applied to the next round
    obstacles_enabled: bool,
    state: GameState,
    highscores: HighScores,
    /// Where submissions are persisted; None keeps scores in memory
    scores_path: Option<PathBuf>,
    sound: SoundManager<B>,
    /// Draws one seed per round
    rng: Pcg32,
    frame_count: u64,
    events: Vec<GameEvent>,
    quit: bool,
}

impl<B: AudioBackend> Game<B> {
    pub fn new(
        settings: &Settings,
        sound: SoundManager<B>,
        highscores: HighScores,
        scores_path: Option<PathBuf>,
    ) -> Self {
        let config = settings.game.clone().sanitized();
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Game seed {seed}");
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(config.clone(), settings.obstacles_enabled, rng.random());

        Self {
            config,
            screen: Screen::Menu,
            obstacles_enabled: settings.obstacles_enabled,
            state,
            highscores,
            scores_path,
            sound,
            rng,
            frame_count: 0,
            events: Vec::new(),
            quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn obstacles_enabled(&self) -> bool {
        self.obstacles_enabled
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn sound(&self) -> &SoundManager<B> {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut SoundManager<B> {
        &mut self.sound
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn set_screen(&mut self, screen: Screen) {
        log::debug!("Screen {} -> {}", self.screen.name(), screen.name());
        self.screen = screen;
    }

    // === Input ===

    pub fn handle_input(&mut self, event: InputEvent) {
        match self.screen {
            Screen::Menu => self.handle_menu(event),
            Screen::Play => self.handle_play(event),
            Screen::GameOver { .. } => self.handle_game_over(event),
            Screen::Highscores => {
                if event == InputEvent::Back {
                    self.set_screen(Screen::Menu);
                }
            }
        }
    }

    fn handle_menu(&mut self, event: InputEvent) {
        match event {
            InputEvent::Confirm => self.start_round(),
            InputEvent::ShowHighscores => self.set_screen(Screen::Highscores),
            InputEvent::ToggleObstacles => {
                self.obstacles_enabled = !self.obstacles_enabled;
                log::info!(
                    "Obstacles toggled to {}",
                    if self.obstacles_enabled { "ON" } else { "OFF" }
                );
            }
            InputEvent::Back | InputEvent::Quit => {
                log::info!("Quit requested");
                self.quit = true;
            }
            _ => {}
        }
    }

    fn handle_play(&mut self, event: InputEvent) {
        match event {
            InputEvent::Direction(dir) => self.state.world.snake.set_direction(dir),
            InputEvent::Back => {
                log::info!("Round abandoned at score {}", self.state.score());
                self.set_screen(Screen::Menu);
            }
            _ => {}
        }
    }

    fn handle_game_over(&mut self, event: InputEvent) {
        let max_len = self.config.max_name_len;
        let Screen::GameOver { pending, name } = &mut self.screen else {
            return;
        };

        match event {
            InputEvent::Char(c) if !c.is_control() => {
                if name.chars().count() < max_len {
                    name.push(c);
                }
            }
            InputEvent::Backspace => {
                name.pop();
            }
            InputEvent::Confirm | InputEvent::ShowHighscores => {
                let pending = *pending;
                let name = std::mem::take(name);
                self.submit_score(pending, &name);
                if event == InputEvent::Confirm {
                    self.set_screen(Screen::Menu);
                } else {
                    self.set_screen(Screen::Highscores);
                }
            }
            InputEvent::Back => {
                log::info!("Score of {} discarded", pending.score);
                self.set_screen(Screen::Menu);
            }
            _ => {}
        }
    }

    fn submit_score(&mut self, pending: PendingScore, name: &str) {
        let name = match name.trim() {
            "" => DEFAULT_PLAYER_NAME,
            trimmed => trimmed,
        };
        let rank = self
            .highscores
            .add_score(name, pending.score, pending.mode.as_str());
        log::info!(
            "High score added: {name} - {} in {} mode (rank {rank:?})",
            pending.score,
            pending.mode.as_str()
        );

        if let Some(path) = &self.scores_path {
            if let Err(e) = self.highscores.save_to(path) {
                log::error!("Failed to save high scores: {e}");
            }
        }
    }

    // === Rounds ===

    fn start_round(&mut self) {
        let seed = self.rng.random();
        self.state.reset(self.obstacles_enabled, seed);
        self.sound.resume_music();
        self.set_screen(Screen::Play);
    }

    fn end_round(&mut self) {
        let pending = PendingScore {
            score: self.state.score(),
            mode: self.state.mode(),
        };
        log::info!(
            "Game Over! Score: {}, Mode: {}",
            pending.score,
            pending.mode.as_str()
        );
        if let Some(rank) = self
            .highscores
            .potential_rank(pending.mode.as_str(), pending.score)
        {
            log::info!("Score qualifies for rank {rank}");
        }

        self.sound.play(SoundEffect::GameOver);
        self.sound.pause_music();
        self.set_screen(Screen::GameOver {
            pending,
            name: String::new(),
        });
    }

    // === Frame ===

    /// Advance one frame. The round only runs while on the play screen.
    pub fn update(&mut self) {
        self.frame_count += 1;
        if self.screen != Screen::Play {
            return;
        }

        let mut events = std::mem::take(&mut self.events);
        events.clear();
        let alive = advance_frame(&mut self.state, self.frame_count, &mut events);
        for &event in &events {
            self.on_event(event);
        }
        self.events = events;

        if !alive {
            self.end_round();
        }
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::SnakeMoved => {
                self.sound.play(SoundEffect::Movement);
            }
            GameEvent::FoodEaten { .. } => {
                self.sound.play(SoundEffect::Food);
            }
            GameEvent::PowerUpCollected { kind, .. } => {
                log::info!("{} collected", kind.profile().label);
                self.sound.play(SoundEffect::PowerUp);
            }
            GameEvent::PowerUpSpawned { kind, cell } => {
                log::debug!("{} spawned at {cell:?}", kind.profile().label);
            }
            GameEvent::PowerUpVanished { kind, .. } => {
                log::debug!("{} vanished", kind.profile().label);
            }
            GameEvent::EffectExpired { kind } => {
                log::info!("{} wore off", kind.profile().label);
            }
            GameEvent::SnakeDied { .. } => {}
        }
    }

    pub fn view(&self) -> FrameView<'_> {
        let world = &self.state.world;
        FrameView {
            frame: self.frame_count,
            frame_rate: self.config.frame_rate,
            screen: &self.screen,
            obstacles_enabled: self.obstacles_enabled,
            grid: world.grid,
            snake: &world.snake,
            food: world.food,
            obstacles: &world.obstacles,
            powerups: self.state.powerups.board(),
            active_effects: self.state.powerups.active(),
            multiplier: world.multiplier,
            particles: self.state.particles.particles(),
            score: world.score,
            highscores: &self.highscores,
        }
    }

    /// Poll input, update and draw one frame. Returns false once quitting.
    pub fn step(&mut self, input: &mut impl InputSource, renderer: &mut impl Renderer) -> bool {
        let intents = input.poll(&self.view());
        for intent in intents {
            self.handle_input(intent);
            if self.quit {
                return false;
            }
        }

        self.update();
        renderer.draw(&self.view());
        true
    }

    /// Run until the player quits from the menu
    pub fn run(
        &mut self,
        input: &mut impl InputSource,
        renderer: &mut impl Renderer,
        clock: &mut FrameClock,
    ) {
        log::info!("Game loop started at {} fps", self.config.frame_rate);
        self.sound.start_music();
        while self.step(input, renderer) {
            clock.wait();
        }
        self.sound.pause_music();
        log::info!("Game loop stopped after {} frames", self.frame_count);
    }
}
