//! Keyboard handling: mapping key events to session intents.

pub mod handler;

pub use handler::{InputHandler, KeyAction};
