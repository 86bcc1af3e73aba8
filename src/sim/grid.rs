//! Grid cells, directions and random free-cell selection

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

/// A single grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `dir` (unbounded)
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Center of the cell in grid units, used as a particle origin
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// Manhattan distance to another cell
    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Movement direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The 180 degree reversal of this direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step as (dx, dy)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Playfield dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub cols: i32,
    pub rows: i32,
}

impl GridSize {
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Wrap a cell onto the torus (used while invincible)
    #[inline]
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(cell.x.rem_euclid(self.cols), cell.y.rem_euclid(self.rows))
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Cell::new(x, y)))
    }
}

/// Pick a uniformly random cell for which `blocked` returns false.
///
/// Returns `None` when every cell is blocked.
pub fn random_free_cell<R, F>(rng: &mut R, grid: GridSize, blocked: F) -> Option<Cell>
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    let free: Vec<Cell> = grid.cells().filter(|c| !blocked(*c)).collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_wrap() {
        let grid = GridSize::new(30, 20);
        assert_eq!(grid.wrap(Cell::new(30, 5)), Cell::new(0, 5));
        assert_eq!(grid.wrap(Cell::new(-1, 5)), Cell::new(29, 5));
        assert_eq!(grid.wrap(Cell::new(4, -1)), Cell::new(4, 19));
        assert_eq!(grid.wrap(Cell::new(4, 20)), Cell::new(4, 0));
    }

    #[test]
    fn test_random_free_cell_respects_blocked() {
        let grid = GridSize::new(4, 3);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let cell = random_free_cell(&mut rng, grid, |c| c.x < 3).unwrap();
            assert_eq!(cell.x, 3);
            assert!(grid.contains(cell));
        }
    }

    #[test]
    fn test_random_free_cell_full_board() {
        let grid = GridSize::new(3, 3);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_free_cell(&mut rng, grid, |_| true), None);
    }
}
