use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::config::GameConfig;
use super::direction::Direction;
use super::state::{Cell, CollisionType, GameState, GameStatus, Snake};

/// Banner text for the collision end state.
pub const GAME_OVER_MESSAGE: &str = "Game Over!";
/// Banner text when the snake has covered the whole grid.
pub const WIN_MESSAGE: &str = "You Win!";

/// What happened during a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// The game engine that handles all game rules: direction intents,
/// collision checks, growth and food placement.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration. The RNG is
    /// seeded from `config.rng_seed` when set, so food placement can be made
    /// deterministic.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh state from the configured snake and a newly placed food
    /// cell. The previous state, if any, is simply dropped.
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            self.config.initial_snake.clone(),
            self.config.initial_direction,
        );
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Run one paced tick: steer, check the prospective head against the
    /// walls and the body, then eat or slide. Does nothing once the state is
    /// `Ended`.
    pub fn step(&mut self, state: &mut GameState, intent: Option<Direction>) -> StepOutcome {
        let mut outcome = StepOutcome {
            ate_food: false,
            collision: None,
        };

        if !state.status.is_running() {
            return outcome;
        }

        if let Some(direction) = intent {
            state.snake.set_direction(direction);
        }

        let candidate = state.snake.next_head();

        if let Some(collision) = self.check_collision(state, candidate) {
            state.status = GameStatus::Ended {
                message: GAME_OVER_MESSAGE.to_string(),
            };
            outcome.collision = Some(collision);
            // No further mutation on a fatal tick.
            return outcome;
        }

        if state.food == Some(candidate) {
            state.snake.eat(candidate);
            state.score += 1;
            outcome.ate_food = true;

            // Re-place from the post-eat occupancy; an empty free set means
            // the snake covers the grid and the player has won.
            state.food = self.place_food(&state.snake);
            if state.food.is_none() {
                state.status = GameStatus::Ended {
                    message: WIN_MESSAGE.to_string(),
                };
            }
        } else {
            state.snake.advance(candidate);
        }

        state.steps += 1;
        outcome
    }

    /// Check if the prospective head position causes a collision
    fn check_collision(&self, state: &GameState, candidate: Cell) -> Option<CollisionType> {
        if !state.is_in_bounds(candidate) {
            return Some(CollisionType::Wall);
        }

        if state.snake.would_hit_self(candidate) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Choose a food cell uniformly from every grid cell the snake does not
    /// occupy. `None` when no free cell remains.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Cell> {
        let free: Vec<Cell> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Cell::new(x, y)))
            .filter(|cell| !snake.cells().contains(cell))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
