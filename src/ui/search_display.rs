//! Search results display
//!
//! Aesthetic: Cyberpunk Terminal + Brutalist Typography
//! - Geometric frames with neon accents
//! - Line-number gutters with match markers
//! - Highlighted match spans inside context lines

use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;

use super::theme::{BoxChars, Theme};
use crate::core::search::{ContextLine, SearchResult};

/// Display a search report with beautiful formatting
pub fn display_result(result: &SearchResult) {
    let term_width = terminal_width();

    print_header(&result.keyword, result.total_matches, term_width);

    if result.matches.is_empty() {
        print_empty_state();
    } else {
        print_file_line(&result.file_path, term_width);
        print_context(result, term_width);
    }

    print_footer(result.total_matches, term_width);
}

/// Print the search header with the keyword and match count
fn print_header(keyword: &str, count: usize, width: usize) {
    println!();

    // Top border with accent
    let border = BoxChars::H_LINE.repeat(width.saturating_sub(2));
    println!(
        "{}{}{}",
        BoxChars::TL_CORNER.color(Theme::BORDER_ACCENT),
        border.color(Theme::BORDER),
        BoxChars::TR_CORNER.color(Theme::BORDER_ACCENT)
    );

    // Title line
    let title = format!(" {} FSEARCH ", BoxChars::DIAMOND);
    let query_display = format!("\"{}\"", truncate_str(keyword, 40));
    let count_display = format!("{} matches", count);

    let padding = width.saturating_sub(title.len() + query_display.len() + count_display.len() + 6);

    println!(
        "{} {}{}{}{} {}",
        BoxChars::V_LINE.color(Theme::BORDER_ACCENT),
        title.color(Theme::NEON_CYAN).bold(),
        query_display.color(Theme::NEON_MAGENTA),
        " ".repeat(padding),
        count_display.color(Theme::SUBTLE),
        BoxChars::V_LINE.color(Theme::BORDER_ACCENT)
    );

    // Separator
    println!(
        "{}{}{}",
        BoxChars::T_RIGHT.color(Theme::BORDER_ACCENT),
        BoxChars::H_LINE
            .repeat(width.saturating_sub(2))
            .color(Theme::BORDER),
        BoxChars::T_LEFT.color(Theme::BORDER_ACCENT)
    );
}

/// Print the resolved file path
fn print_file_line(file_path: &str, width: usize) {
    let display_path = shorten_path(file_path, width.saturating_sub(8));
    println!(
        "{} {} {}",
        BoxChars::V_LINE.color(Theme::BORDER),
        BoxChars::ARROW_RIGHT.color(Theme::BORDER_ACCENT),
        display_path.color(Theme::NEON_CYAN).bold()
    );
}

/// Print the context window, one gutter-prefixed line at a time
fn print_context(result: &SearchResult, width: usize) {
    // Match spans per line, for highlighting hits inside the text
    let mut spans: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    for m in &result.matches {
        spans
            .entry(m.line_number)
            .or_default()
            .push((m.match_index, m.match_length));
    }

    let runs = context_runs(&result.context);
    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            // Gap between non-adjacent context windows
            println!(
                "{} {}",
                BoxChars::V_LINE.color(Theme::BORDER),
                BoxChars::L_H_LINE
                    .repeat(width.saturating_sub(4))
                    .color(Theme::DIM)
            );
        }

        for line in *run {
            print_context_line(line, spans.get(&line.line_number), width);
        }
    }
}

fn print_context_line(line: &ContextLine, spans: Option<&Vec<(usize, usize)>>, width: usize) {
    let marker = if line.is_match {
        BoxChars::ARROW_RIGHT.color(Theme::MATCH_HIT)
    } else {
        " ".normal()
    };

    let text = truncate_str(&line.line, width.saturating_sub(12));
    let rendered = if line.is_match {
        highlight_spans(&text, spans.map(|v| v.as_slice()).unwrap_or(&[]))
    } else {
        text.color(Theme::SUBTLE).to_string()
    };

    println!(
        "{} {} {} {} {}",
        BoxChars::V_LINE.color(Theme::BORDER),
        marker,
        Theme::gutter(line.line_number, line.is_match),
        BoxChars::L_V_LINE.color(Theme::DIM),
        rendered
    );
}

/// Colorize matched spans inside a line. Offsets are counted in characters,
/// so the slicing walks chars rather than bytes.
fn highlight_spans(line: &str, spans: &[(usize, usize)]) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut cursor = 0;

    for &(start, len) in spans {
        let start = start.min(chars.len());
        let end = (start + len).min(chars.len());

        if start > cursor {
            let before: String = chars[cursor..start].iter().collect();
            out.push_str(&before);
        }
        if end > start {
            let hit: String = chars[start..end].iter().collect();
            out.push_str(&hit.color(Theme::MATCH_HIT).bold().to_string());
        }
        cursor = cursor.max(end);
    }

    if cursor < chars.len() {
        let rest: String = chars[cursor..].iter().collect();
        out.push_str(&rest);
    }

    out
}

/// Group context lines into runs of consecutive line numbers
fn context_runs(context: &[ContextLine]) -> Vec<&[ContextLine]> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..context.len() {
        if context[i].line_number != context[i - 1].line_number + 1 {
            runs.push(&context[start..i]);
            start = i;
        }
    }
    if start < context.len() {
        runs.push(&context[start..]);
    }

    runs
}

/// Print empty state when no results
fn print_empty_state() {
    println!(
        "{} {} {}",
        BoxChars::V_LINE.color(Theme::BORDER),
        BoxChars::CROSS_MARK.color(Theme::MATCH_MISS),
        "No matches found".color(Theme::MATCH_MISS).italic()
    );
}

/// Print the footer
fn print_footer(count: usize, width: usize) {
    // Bottom border
    let border = BoxChars::H_LINE.repeat(width.saturating_sub(2));
    println!(
        "{}{}{}",
        BoxChars::BL_CORNER.color(Theme::BORDER_ACCENT),
        border.color(Theme::BORDER),
        BoxChars::BR_CORNER.color(Theme::BORDER_ACCENT)
    );

    // Stats line
    let stats = format!(
        " {} {} matches {} fsearch v{} ",
        BoxChars::CHECK,
        count,
        BoxChars::BULLET,
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", stats.color(Theme::SUBTLE));
    println!();
}

/// Get terminal width, default to 80
fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
        .max(60)
}

/// Truncate to a display width, appending an ellipsis when cut
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Shorten path for display
fn shorten_path(path: &str, max_len: usize) -> String {
    let p = Path::new(path);

    // Get filename and parent
    let filename = p.file_name().and_then(|f| f.to_str()).unwrap_or(path);

    let parent = p
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|f| f.to_str())
        .unwrap_or("");

    if parent.is_empty() {
        filename.to_string()
    } else {
        let short = format!("{}/{}", parent, filename);
        if short.len() > max_len {
            format!(".../{}", filename)
        } else {
            short
        }
    }
}
