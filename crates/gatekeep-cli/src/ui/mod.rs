//! Terminal view layer: command handling and page rendering.

pub mod input;
pub mod render;
