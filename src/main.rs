use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use snake_tui::game::GameConfig;
use snake_tui::session::GameSession;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake-tui")]
#[command(version, about = "Terminal snake on a bounded grid")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value = "20")]
    height: usize,

    /// Simulation tick interval in milliseconds
    #[arg(long, default_value = "125")]
    tick_ms: u64,

    /// Snake color: a name, #rrggbb value or ANSI index
    #[arg(long, default_value = "green")]
    snake_color: String,

    /// Food color, same formats as --snake-color
    #[arg(long, default_value = "red")]
    food_color: String,

    /// Gutter between cell glyphs, as a ratio of the cell size
    #[arg(long, default_value = "1.0")]
    spacing: f32,

    /// Fixed seed for food placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Append logs to this file; without it the session logs nothing,
    /// since the terminal itself is busy drawing the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = GameConfig::new(cli.width, cli.height);
    config.tick_interval_ms = cli.tick_ms;
    config.snake_color = cli.snake_color;
    config.food_color = cli.food_color;
    config.cell_spacing = cli.spacing;
    config.rng_seed = cli.seed;

    let mut session = GameSession::new(config)?;
    session.run().await
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
