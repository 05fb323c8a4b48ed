//! Terminal UI for filesearch
//!
//! A brutalist-meets-retro-futuristic aesthetic with:
//! - Geometric box-drawing characters
//! - Neon accents for matched spans
//! - Width-aware line truncation

pub mod search_display;
pub mod theme;
