//! The snake entity: movement, direction buffering and collision

use std::collections::{HashSet, VecDeque};

use super::grid::{Cell, Direction, GridSize};
use crate::consts::SNAKE_START;

/// The player's snake
#[derive(Debug, Clone)]
pub struct Snake {
    /// Body cells, head first
    body: VecDeque<Cell>,
    /// Direction committed on the last move
    direction: Direction,
    /// Direction to commit on the next move
    next_direction: Direction,
    /// Walls wrap and collisions are ignored while set
    pub invincible: bool,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new(
            SNAKE_START.iter().map(|&c| Cell::from(c)).collect(),
            Direction::Right,
        )
    }
}

impl Snake {
    fn new(body: VecDeque<Cell>, direction: Direction) -> Self {
        Self {
            body,
            direction,
            next_direction: direction,
            invincible: false,
        }
    }

    /// Build a snake from explicit cells (head first) facing `direction`.
    ///
    /// Returns None for an empty body; every other constructor starts with
    /// cells and `step` never shrinks below the head, so a snake is never
    /// empty.
    pub fn from_cells(
        cells: impl IntoIterator<Item = Cell>,
        direction: Direction,
    ) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self::new(body, direction))
    }

    /// Queue a turn for the next move.
    ///
    /// Reversals are checked against the committed direction, so two quick
    /// turns inside one tick cannot fold the snake back onto itself.
    pub fn set_direction(&mut self, dir: Direction) {
        if dir != self.direction.opposite() {
            self.next_direction = dir;
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Advance one cell. Returns false if the move kills the snake.
    ///
    /// The bounds check runs before the body is touched, so a death at the
    /// wall leaves the body as it was.
    pub fn step(&mut self, food: Option<Cell>, obstacles: &HashSet<Cell>, grid: GridSize) -> bool {
        self.direction = self.next_direction;
        let mut head = self.head().step(self.direction);

        if self.invincible {
            head = grid.wrap(head);
        } else if !grid.contains(head) {
            return false;
        }

        self.body.push_front(head);

        let hit_self = self.body.iter().skip(1).any(|&c| c == head);
        if (hit_self || obstacles.contains(&head)) && !self.invincible {
            return false;
        }

        if food != Some(head) {
            self.body.pop_back();
        }

        true
    }
}
