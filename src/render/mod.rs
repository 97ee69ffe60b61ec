//! TUI rendering of the grid, the HUD and the end-of-game banner.

pub mod renderer;

pub use renderer::{parse_color, Renderer};
