use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A single grid cell: 0-indexed column (`x`) and row (`y`).
///
/// Coordinates are signed so that a prospective head which has stepped off
/// the grid is representable before the bounds check rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell shifted by delta
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighboring cell in a direction
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Whether `other` is one of this cell's four grid neighbors.
    pub fn is_adjacent(&self, other: Cell) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// The snake: an ordered list of cells, head at index 0, plus its current
/// direction of travel. The body never contains duplicate cells and is never
/// empty; the configuration layer enforces both before a snake is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
}

impl Snake {
    /// Build a snake from a head-first cell list.
    pub fn new(body: Vec<Cell>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// All body cells, head first.
    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Adopt a new direction. A 180-degree turn reverses the body in place,
    /// so the former tail leads and the snake backs out the way it came;
    /// equal or 90-degree turns leave the body untouched.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if self.direction.is_opposite(new_direction) {
            self.body.reverse();
        }
        self.direction = new_direction;
    }

    /// The cell the head would enter on the next tick. Pure: no mutation.
    pub fn next_head(&self) -> Cell {
        self.head().step(self.direction)
    }

    /// Whether `candidate` lands on the body. The current head is excluded
    /// from the check: it vacates its cell on the same tick.
    pub fn would_hit_self(&self, candidate: Cell) -> bool {
        self.body[1..].contains(&candidate)
    }

    /// Slide forward: `new_head` is prepended and the tail dropped, so the
    /// whole body shifts one cell and the length is preserved.
    pub fn advance(&mut self, new_head: Cell) {
        self.body.insert(0, new_head);
        self.body.pop();
    }

    /// Grow: `new_head` is prepended and the tail kept, length +1.
    pub fn eat(&mut self, new_head: Cell) {
        self.body.insert(0, new_head);
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Whether the session is still accepting updates.
///
/// Transitions once from `Running` to `Ended` and never back; a new session
/// gets a fresh state instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Terminal. `message` is what the banner shows.
    Ended { message: String },
}

impl GameStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, GameStatus::Running)
    }
}

/// Complete game state for one session. Recreated, not repaired, on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Present while running; `None` only once the snake covers the grid.
    pub food: Option<Cell>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Option<Cell>, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            status: GameStatus::Running,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.grid_width as i32
            && cell.y >= 0
            && cell.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, cell: Cell) -> bool {
        self.snake.cells().contains(&cell)
    }
}
