//! Single-file keyword search with line context
//!
//! The engine behind both the CLI and the MCP `search_file` tool: a single
//! pass over the file's lines with find-all matching, then a unioned
//! context window around every matched line.

use std::collections::{BTreeSet, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

/// Metacharacters that flip a keyword from literal to regex matching.
const REGEX_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Options accepted by [`search`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Match case exactly instead of the default case-insensitive mode.
    pub case_sensitive: bool,
    /// Lines of context to include before and after each matching line.
    pub context_lines: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            context_lines: 2,
        }
    }
}

/// One occurrence of the pattern within a line. A line matched twice
/// produces two entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// 1-based line number.
    pub line_number: usize,
    /// Full raw text of the matching line.
    pub line: String,
    /// 0-based column of the match start, counted in characters.
    pub match_index: usize,
    /// Length of the matched span in characters.
    pub match_length: usize,
}

/// A line included in the context window around the matches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextLine {
    pub line_number: usize,
    pub line: String,
    pub is_match: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Resolved absolute path of the searched file.
    pub file_path: String,
    /// The keyword exactly as given by the caller.
    pub keyword: String,
    pub total_matches: usize,
    /// File order: top to bottom, left to right within a line.
    pub matches: Vec<SearchMatch>,
    /// Union of per-match context windows, ascending, deduplicated.
    pub context: Vec<ContextLine>,
}

/// Search a single file for a keyword or pattern.
///
/// The keyword is compiled as a regex when it contains any regex
/// metacharacter and as an escaped literal otherwise. This is a heuristic,
/// not a toggle: a literal keyword that happens to contain a metacharacter
/// (say `3.14`) is silently treated as a regex.
pub fn search(
    file_path: &str,
    keyword: &str,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    let resolved = resolve_path(file_path)?;

    if !resolved.exists() {
        return Err(SearchError::NotFound(resolved));
    }
    if !resolved.is_file() {
        return Err(SearchError::NotAFile(resolved));
    }

    let regex = compile_keyword(keyword, options.case_sensitive)?;
    let content = fs::read_to_string(&resolved)?;
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    let mut match_lines: HashSet<usize> = HashSet::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        for m in regex.find_iter(line) {
            matches.push(SearchMatch {
                line_number,
                line: line.to_string(),
                // find_iter yields byte offsets; the report carries
                // character columns.
                match_index: line[..m.start()].chars().count(),
                match_length: m.as_str().chars().count(),
            });
            match_lines.insert(line_number);
        }
    }

    let context = build_context(&lines, &matches, &match_lines, options.context_lines);

    Ok(SearchResult {
        file_path: resolved.to_string_lossy().into_owned(),
        keyword: keyword.to_string(),
        total_matches: matches.len(),
        matches,
        context,
    })
}

/// Absolute paths are used as-is; relative paths resolve against the
/// process working directory. Results and errors always carry the resolved
/// form, never the raw input.
fn resolve_path(file_path: &str) -> Result<PathBuf, SearchError> {
    let path = Path::new(file_path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

fn compile_keyword(keyword: &str, case_sensitive: bool) -> Result<Regex, SearchError> {
    let pattern = if is_regex_pattern(keyword) {
        keyword.to_string()
    } else {
        regex::escape(keyword)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|_| SearchError::InvalidPattern(keyword.to_string()))
}

/// A keyword containing any regex metacharacter is treated as a regex.
fn is_regex_pattern(keyword: &str) -> bool {
    keyword.chars().any(|c| REGEX_METACHARACTERS.contains(&c))
}

fn build_context(
    lines: &[&str],
    matches: &[SearchMatch],
    match_lines: &HashSet<usize>,
    context_lines: usize,
) -> Vec<ContextLine> {
    let total = lines.len();
    let mut wanted: BTreeSet<usize> = BTreeSet::new();

    for m in matches {
        let start = m.line_number.saturating_sub(context_lines).max(1);
        let end = m.line_number.saturating_add(context_lines).min(total);
        wanted.extend(start..=end);
    }

    wanted
        .into_iter()
        .map(|line_number| ContextLine {
            line_number,
            line: lines[line_number - 1].to_string(),
            is_match: match_lines.contains(&line_number),
        })
        .collect()
}
