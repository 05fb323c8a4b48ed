//! Color theme and styling for the terminal UI
//!
//! Aesthetic: Brutalist + Retro-Futuristic
//! - Sharp geometric forms
//! - Neon accents on dark backgrounds
//! - Monospace typography emphasis

use colored::{Color, ColoredString, Colorize};

/// Terminal color palette - Cyberpunk Brutalist
pub struct Theme;

impl Theme {
    // Primary colors - electric neon
    pub const NEON_CYAN: Color = Color::TrueColor {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const NEON_MAGENTA: Color = Color::TrueColor {
        r: 255,
        g: 0,
        b: 255,
    };

    // Match emphasis
    pub const MATCH_HIT: Color = Color::TrueColor {
        r: 0,
        g: 255,
        b: 136,
    }; // Mint green
    pub const MATCH_MISS: Color = Color::TrueColor {
        r: 255,
        g: 99,
        b: 71,
    }; // Tomato

    // UI elements
    pub const BORDER: Color = Color::TrueColor {
        r: 88,
        g: 88,
        b: 88,
    };
    pub const BORDER_ACCENT: Color = Color::TrueColor {
        r: 0,
        g: 200,
        b: 255,
    };
    pub const DIM: Color = Color::TrueColor {
        r: 100,
        g: 100,
        b: 100,
    };
    pub const SUBTLE: Color = Color::TrueColor {
        r: 140,
        g: 140,
        b: 140,
    };

    /// Style a gutter line number; matched lines get the accent
    pub fn gutter(line_number: usize, is_match: bool) -> ColoredString {
        let text = format!("{:>5}", line_number);
        if is_match {
            text.color(Self::MATCH_HIT).bold()
        } else {
            text.color(Self::SUBTLE)
        }
    }
}

/// Box drawing characters for UI frames
pub struct BoxChars;

impl BoxChars {
    // Heavy box drawing
    pub const H_LINE: &'static str = "━";
    pub const V_LINE: &'static str = "┃";
    pub const TL_CORNER: &'static str = "┏";
    pub const TR_CORNER: &'static str = "┓";
    pub const BL_CORNER: &'static str = "┗";
    pub const BR_CORNER: &'static str = "┛";
    pub const T_RIGHT: &'static str = "┣";
    pub const T_LEFT: &'static str = "┫";

    // Light box drawing
    pub const L_H_LINE: &'static str = "─";
    pub const L_V_LINE: &'static str = "│";

    // Arrows and symbols
    pub const ARROW_RIGHT: &'static str = "▶";
    pub const DIAMOND: &'static str = "◆";
    pub const BULLET: &'static str = "●";
    pub const CHECK: &'static str = "✓";
    pub const CROSS_MARK: &'static str = "✗";
}
