//! Fixed-rate frame update
//!
//! The loop runs at the frame rate; the snake moves on a sub-rate derived
//! from the current game speed. Power-up timers and particles are counted in
//! frames and advance every frame.

use super::state::{GameEvent, GameState};
use crate::palette;

/// Frames between two snake moves at the given speed.
///
/// Speed changes mid-round, so callers recompute this every frame.
pub fn tick_period(frame_rate: u32, game_speed: u32) -> u64 {
    u64::from((frame_rate / game_speed.max(1)).max(1))
}

/// Whether frame number `frame` is a snake-move frame for this state
pub fn is_tick_frame(state: &GameState, frame: u64) -> bool {
    frame % tick_period(state.config.frame_rate, state.world.game_speed) == 0
}

/// Move the snake one cell and resolve food. Returns false on death.
pub fn tick(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let world = &mut state.world;
    state.time_ticks += 1;

    if !world.snake.step(world.food, &world.obstacles, world.grid) {
        state.alive = false;
        log::info!("Game over! Score: {}", world.score);
        events.push(GameEvent::SnakeDied { score: world.score });
        return false;
    }
    events.push(GameEvent::SnakeMoved);

    let head = world.snake.head();
    if world.food == Some(head) {
        let bonus = if world.obstacles_enabled {
            1 + state.config.obstacle_bonus
        } else {
            1
        };
        let points = bonus * u64::from(world.multiplier);
        world.score += points;
        state.particles.emit(
            &mut world.rng,
            head.center(),
            state.config.particle_count,
            palette::ORANGE,
        );
        world.respawn_food();
        log::debug!("Food collected! New score: {}", world.score);
        events.push(GameEvent::FoodEaten { cell: head, points });
    }

    true
}

/// Advance the round by one frame. Returns false once the snake is dead.
pub fn advance_frame(state: &mut GameState, frame: u64, events: &mut Vec<GameEvent>) -> bool {
    if !state.alive {
        return false;
    }

    if is_tick_frame(state, frame) && !tick(state, events) {
        return false;
    }

    state.powerups.update(
        &mut state.world,
        &mut state.particles,
        &state.config,
        events,
    );
    state.particles.update();
    true
}
