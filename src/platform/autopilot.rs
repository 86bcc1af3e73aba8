//! Headless player
//!
//! Drives the game through its intents: starts rounds (alternating the
//! obstacle mode), steers greedily toward food, enters a name on game over
//! and quits after a fixed number of rounds.

use super::input::{InputEvent, InputSource};
use crate::game::Screen;
use crate::renderer::FrameView;
use crate::sim::grid::{Cell, Direction};

const AUTOPILOT_NAME: &str = "Autopilot";

#[derive(Debug, Clone)]
pub struct Autopilot {
    rounds: u32,
    played: u32,
    /// Frames spent in the current round
    round_frames: u64,
    /// A round still running after this many frames is abandoned
    max_round_frames: u64,
    in_round: bool,
}

impl Autopilot {
    pub fn new(rounds: u32, max_round_frames: u64) -> Self {
        Self {
            rounds,
            played: 0,
            round_frames: 0,
            max_round_frames,
            in_round: false,
        }
    }

    pub fn rounds_played(&self) -> u32 {
        self.played
    }

    fn finish_round(&mut self) {
        if self.in_round {
            self.in_round = false;
            self.played += 1;
            log::info!("Autopilot finished round {}/{}", self.played, self.rounds);
        }
    }

    fn menu(&mut self, view: &FrameView<'_>) -> Vec<InputEvent> {
        if self.played >= self.rounds {
            return vec![InputEvent::Quit];
        }
        let mut events = Vec::new();
        let want_obstacles = self.played % 2 == 1;
        if view.obstacles_enabled != want_obstacles {
            events.push(InputEvent::ToggleObstacles);
        }
        events.push(InputEvent::Confirm);
        self.in_round = true;
        self.round_frames = 0;
        events
    }

    fn play(&mut self, view: &FrameView<'_>) -> Vec<InputEvent> {
        self.round_frames += 1;
        if self.round_frames > self.max_round_frames {
            log::info!("Autopilot abandoning a round after {} frames", self.round_frames);
            self.finish_round();
            return vec![InputEvent::Back];
        }

        match steer(view) {
            Some(dir) if dir != view.snake.direction() => vec![InputEvent::Direction(dir)],
            _ => Vec::new(),
        }
    }

    fn game_over(&mut self, name: &str) -> Vec<InputEvent> {
        self.finish_round();
        if name.is_empty() {
            let mut events: Vec<_> = AUTOPILOT_NAME.chars().map(InputEvent::Char).collect();
            events.push(InputEvent::ShowHighscores);
            events
        } else {
            vec![InputEvent::Confirm]
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, view: &FrameView<'_>) -> Vec<InputEvent> {
        match view.screen {
            Screen::Menu => self.menu(view),
            Screen::Play => self.play(view),
            Screen::GameOver { name, .. } => self.game_over(name),
            Screen::Highscores => vec![InputEvent::Back],
        }
    }
}

/// Safe direction that gets closest to the food, if any
fn steer(view: &FrameView<'_>) -> Option<Direction> {
    let snake = view.snake;
    let head = snake.head();
    let target = view.food.unwrap_or(head);

    Direction::ALL
        .into_iter()
        .filter(|&d| d != snake.direction().opposite())
        .filter_map(|d| {
            let mut next = head.step(d);
            if snake.invincible {
                next = view.grid.wrap(next);
            }
            is_safe(view, next).then_some((d, next.manhattan(target)))
        })
        .min_by_key(|&(_, dist)| dist)
        .map(|(d, _)| d)
}

fn is_safe(view: &FrameView<'_>, cell: Cell) -> bool {
    if view.snake.invincible {
        return true;
    }
    view.grid.contains(cell) && !view.snake.contains(cell) && !view.obstacles.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::manager::tests::manager;
    use crate::game::Game;
    use crate::settings::Settings;

    fn game() -> Game<crate::audio::manager::tests::RecordingBackend> {
        let settings = Settings {
            seed: Some(11),
            ..Default::default()
        };
        Game::new(&settings, manager(), crate::HighScores::new(5), None)
    }

    #[test]
    fn test_starts_round_from_menu() {
        let game = game();
        let mut pilot = Autopilot::new(2, 10_000);
        let events = pilot.poll(&game.view());
        assert_eq!(events, vec![InputEvent::Confirm]);
    }

    #[test]
    fn test_second_round_toggles_obstacles() {
        let game = game();
        let mut pilot = Autopilot::new(2, 10_000);
        pilot.played = 1;
        let events = pilot.poll(&game.view());
        assert_eq!(
            events,
            vec![InputEvent::ToggleObstacles, InputEvent::Confirm]
        );
    }

    #[test]
    fn test_quits_after_rounds() {
        let game = game();
        let mut pilot = Autopilot::new(0, 10_000);
        assert_eq!(pilot.poll(&game.view()), vec![InputEvent::Quit]);
    }

    #[test]
    fn test_steers_toward_food() {
        let mut game = game();
        game.handle_input(InputEvent::Confirm);
        game.state_mut().world.food = Some(Cell::new(5, 12));
        let mut pilot = Autopilot::new(1, 10_000);
        pilot.in_round = true;
        // Head at (5,5) facing right; food straight below
        assert_eq!(
            pilot.poll(&game.view()),
            vec![InputEvent::Direction(Direction::Down)]
        );
    }

    #[test]
    fn test_avoids_walls() {
        let mut game = game();
        game.handle_input(InputEvent::Confirm);
        let state = game.state_mut();
        state.world.snake = crate::sim::Snake::from_cells(
            [Cell::new(29, 0), Cell::new(28, 0), Cell::new(27, 0)],
            Direction::Right,
        )
        .unwrap();
        state.world.food = Some(Cell::new(29, 19));
        state.world.obstacles.clear();
        let mut pilot = Autopilot::new(1, 10_000);
        pilot.in_round = true;
        assert_eq!(
            pilot.poll(&game.view()),
            vec![InputEvent::Direction(Direction::Down)]
        );
    }
}
