//! Command implementations

pub mod preview;
pub mod render;
