//! CLI command implementations

pub mod effects;
pub mod export;
pub mod patterns;
pub mod project;
pub mod render;
