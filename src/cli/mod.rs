//! Command-line surface: argument definitions, handlers, and rendering.

pub mod app;
pub mod commands;
pub mod render;

pub use app::{Cli, Commands};
