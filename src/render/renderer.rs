use anyhow::{Context, Result};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{Cell, GameConfig, GameState, GameStatus};
use crate::session::SessionMetrics;

/// Parse a color name, `#rrggbb` value or ANSI index into a terminal color.
pub fn parse_color(value: &str) -> Result<Color> {
    value
        .trim()
        .parse::<Color>()
        .with_context(|| format!("unrecognized color {value:?}"))
}

/// Draws the game. Colors come from the configuration and are parsed once,
/// at construction, so a bad color string fails before the first frame.
pub struct Renderer {
    snake_color: Color,
    food_color: Color,
    gutter: String,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let snake_color = parse_color(&config.snake_color)?;
        let food_color = parse_color(&config.food_color)?;
        // Character-cell analogue of a pixel spacing ratio: pad each cell
        // glyph with gutter columns.
        let gutter = " ".repeat(config.cell_spacing.round().max(0.0) as usize);

        Ok(Self {
            snake_color,
            food_color,
            gutter,
        })
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        // Center the game area horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        // A terminal state shows only the banner; the grid is not drawn.
        match &state.status {
            GameStatus::Running => frame.render_widget(self.render_grid(state), game_area),
            GameStatus::Ended { message } => {
                frame.render_widget(self.render_banner(message, state), game_area)
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let cell = Cell::new(x as i32, y as i32);

                let span = if cell == head {
                    Span::styled(
                        format!("■{}", self.gutter),
                        Style::default()
                            .fg(self.snake_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(cell) {
                    Span::styled(
                        format!("□{}", self.gutter),
                        Style::default().fg(self.snake_color),
                    )
                } else if state.food == Some(cell) {
                    Span::styled(
                        format!("●{}", self.gutter),
                        Style::default()
                            .fg(self.food_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(
                        format!("·{}", self.gutter),
                        Style::default().fg(Color::DarkGray),
                    )
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title(" snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &SessionMetrics) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_banner(&self, message: &str, state: &GameState) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as Heading, Snake};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_state() -> GameState {
        let snake = Snake::new(
            vec![Cell::new(2, 1), Cell::new(1, 1), Cell::new(0, 1)],
            Heading::Right,
        );
        GameState::new(snake, Some(Cell::new(3, 3)), 5, 5)
    }

    fn drawn_text(renderer: &Renderer, state: &GameState) -> String {
        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        let metrics = SessionMetrics::new();

        terminal
            .draw(|frame| renderer.render(frame, state, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_parse_color() {
        assert!(parse_color("green").is_ok());
        assert!(parse_color("#00ff00").is_ok());
        assert!(parse_color("  red ").is_ok());
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn test_running_state_draws_grid_and_food() {
        let renderer = Renderer::new(&GameConfig::small()).unwrap();
        let text = drawn_text(&renderer, &sample_state());

        assert!(text.contains('■'));
        assert!(text.contains('□'));
        assert!(text.contains('●'));
        assert!(!text.contains("Game Over!"));
    }

    #[test]
    fn test_ended_state_draws_only_banner() {
        let renderer = Renderer::new(&GameConfig::small()).unwrap();
        let mut state = sample_state();
        state.status = GameStatus::Ended {
            message: "Game Over!".to_string(),
        };

        let text = drawn_text(&renderer, &state);

        assert!(text.contains("Game Over!"));
        assert!(text.contains("Final Score: 0"));
        assert!(!text.contains('■'));
        assert!(!text.contains('●'));
    }

    #[test]
    fn test_bad_color_is_rejected_at_construction() {
        let mut config = GameConfig::small();
        config.snake_color = "chartreuse-ish".to_string();
        assert!(Renderer::new(&config).is_err());
    }
}
