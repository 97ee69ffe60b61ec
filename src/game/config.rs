use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::Cell;

/// Configuration for one game session. Validated once at session start,
/// before the first frame is scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial body cells, head first.
    pub initial_snake: Vec<Cell>,
    /// Initial direction of travel.
    pub initial_direction: Direction,
    /// Snake color: a name, `#rrggbb` value or ANSI index.
    pub snake_color: String,
    /// Food color, same formats as `snake_color`.
    pub food_color: String,
    /// Gutter between cell glyphs, as a ratio of the cell size.
    pub cell_spacing: f32,
    /// Simulation tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Fixed seed for food placement; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(20, 20)
    }
}

impl GameConfig {
    /// Configuration for a `width` x `height` grid with a snake of up to
    /// three cells heading right from the grid center.
    pub fn new(width: usize, height: usize) -> Self {
        let head = Cell::new((width / 2) as i32, (height / 2) as i32);
        // Walk backward from the head; clamp so tiny grids stay in bounds.
        let length = (head.x + 1).min(3);
        let initial_snake = (0..length).map(|i| head.offset(-i, 0)).collect();

        Self {
            grid_width: width,
            grid_height: height,
            initial_snake,
            initial_direction: Direction::Right,
            snake_color: "green".to_string(),
            food_color: "red".to_string(),
            cell_spacing: 1.0,
            tick_interval_ms: 125,
            rng_seed: None,
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Reject malformed configurations before a session is built.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid dimensions must be positive, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            !self.initial_snake.is_empty(),
            "initial snake must have at least one cell"
        );
        ensure!(
            self.initial_snake.len() < self.grid_width * self.grid_height,
            "initial snake covers the whole {}x{} grid, no cell left for food",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.tick_interval_ms > 0,
            "tick interval must be positive"
        );
        ensure!(
            (0.0..=4.0).contains(&self.cell_spacing),
            "cell spacing must be between 0 and 4, got {}",
            self.cell_spacing
        );

        for (i, &cell) in self.initial_snake.iter().enumerate() {
            ensure!(
                cell.x >= 0
                    && cell.x < self.grid_width as i32
                    && cell.y >= 0
                    && cell.y < self.grid_height as i32,
                "initial snake cell ({}, {}) is outside the {}x{} grid",
                cell.x,
                cell.y,
                self.grid_width,
                self.grid_height
            );
            ensure!(
                !self.initial_snake[..i].contains(&cell),
                "initial snake occupies cell ({}, {}) twice",
                cell.x,
                cell.y
            );
            if i > 0 {
                let prev = self.initial_snake[i - 1];
                ensure!(
                    cell.is_adjacent(prev),
                    "initial snake cells ({}, {}) and ({}, {}) are not adjacent",
                    prev.x,
                    prev.y,
                    cell.x,
                    cell.y
                );
            }
        }

        Ok(())
    }
}
