use std::io::{stderr, Stderr};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use super::clock::FrameClock;
use super::metrics::SessionMetrics;
use crate::game::{Direction, GameConfig, GameEngine, GameState, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// How often the display loop calls in. The frame clock decides which of
/// these callbacks become simulation ticks.
const REFRESH_INTERVAL: Duration = Duration::from_millis(33);

/// One interactive game session: exclusive owner of the engine, the live
/// state, the frame clock and the single buffered direction intent.
pub struct GameSession {
    engine: GameEngine,
    state: GameState,
    clock: FrameClock,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    pending_direction: Option<Direction>,
    should_quit: bool,
}

impl GameSession {
    /// Validate the configuration and build a runnable session. Fails before
    /// any frame is scheduled if the config or its colors are malformed.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("invalid game configuration")?;
        let renderer = Renderer::new(&config)?;
        let clock = FrameClock::new(Duration::from_millis(config.tick_interval_ms));
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            clock,
            metrics: SessionMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            pending_direction: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            grid_width = self.state.grid_width,
            grid_height = self.state.grid_height,
            seed = self.engine.config().rng_seed,
            "session started"
        );

        // Run the event loop with cleanup
        let result = self.run_event_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut refresh_timer = tokio::time::interval(REFRESH_INTERVAL);
        let started_at = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Display callback; update and draw only on a due frame
                _ = refresh_timer.tick() => {
                    if self.clock.frame_due(started_at.elapsed()) {
                        self.tick();
                        self.metrics.update();
                        terminal.draw(|frame| {
                            self.renderer.render(frame, &self.state, &self.metrics);
                        }).context("Failed to draw frame")?;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(games_played = self.metrics.games_played(), "session stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else { return };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                // Last write wins: presses within one frame interval are not
                // queued, only the most recent intent reaches the next tick.
                self.pending_direction = Some(direction);
            }
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Ignored => {}
        }
    }

    /// One paced update. On an `Ended` state this is a no-op; the banner
    /// keeps being drawn but nothing mutates.
    fn tick(&mut self) {
        if !self.state.status.is_running() {
            return;
        }

        let intent = self.pending_direction.take();
        let outcome = self.engine.step(&mut self.state, intent);

        if outcome.ate_food {
            debug!(score = self.state.score, "food eaten");
        }

        // Reaching an ended status here means the transition happened on
        // this very tick.
        if let GameStatus::Ended { message } = &self.state.status {
            info!(
                message = %message,
                collision = ?outcome.collision,
                score = self.state.score,
                "game ended"
            );
            self.metrics.on_game_over();
        }
    }

    /// Discard and rebuild the game state. The engine, its RNG stream and
    /// the terminal session carry over.
    fn restart(&mut self) {
        self.state = self.engine.reset();
        self.pending_direction = None;
        self.clock.reset();
        self.metrics.on_game_start();
        info!(games_played = self.metrics.games_played(), "session restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn test_config() -> GameConfig {
        let mut config = GameConfig::small();
        config.rng_seed = Some(7);
        config
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_session_initialization() {
        let session = GameSession::new(test_config()).unwrap();
        assert!(session.state.status.is_running());
        assert_eq!(session.state.score, 0);
        assert!(session.pending_direction.is_none());
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = test_config();
        config.initial_snake.clear();
        assert!(GameSession::new(config).is_err());

        let mut config = test_config();
        config.snake_color = "no-such-color".to_string();
        assert!(GameSession::new(config).is_err());
    }

    #[test]
    fn test_intent_buffer_keeps_last_press_only() {
        let mut session = GameSession::new(test_config()).unwrap();

        session.handle_event(key(KeyCode::Up));
        session.handle_event(key(KeyCode::Down));
        assert_eq!(session.pending_direction, Some(Direction::Down));

        // Unbound keys leave the buffered intent alone.
        session.handle_event(key(KeyCode::Char('x')));
        assert_eq!(session.pending_direction, Some(Direction::Down));
    }

    #[test]
    fn test_tick_consumes_the_buffered_intent() {
        let mut session = GameSession::new(test_config()).unwrap();
        session.state.food = Some(Cell::new(0, 0));

        session.handle_event(key(KeyCode::Up));
        session.tick();

        assert!(session.pending_direction.is_none());
        assert_eq!(session.state.snake.direction(), Direction::Up);
        assert_eq!(session.state.steps, 1);
    }

    #[test]
    fn test_restart_rebuilds_state() {
        let mut session = GameSession::new(test_config()).unwrap();
        session.state.score = 10;
        session.state.status = GameStatus::Ended {
            message: "Game Over!".to_string(),
        };
        session.pending_direction = Some(Direction::Up);

        session.restart();

        assert!(session.state.status.is_running());
        assert_eq!(session.state.score, 0);
        assert!(session.pending_direction.is_none());
    }

    #[test]
    fn test_tick_is_inert_once_ended() {
        let mut session = GameSession::new(test_config()).unwrap();
        session.state.status = GameStatus::Ended {
            message: "Game Over!".to_string(),
        };
        let before = session.state.clone();

        session.handle_event(key(KeyCode::Left));
        session.tick();

        assert_eq!(session.state, before);
    }

    #[test]
    fn test_quit_key_stops_the_session() {
        let mut session = GameSession::new(test_config()).unwrap();
        session.handle_event(key(KeyCode::Char('q')));
        assert!(session.should_quit);
    }
}
