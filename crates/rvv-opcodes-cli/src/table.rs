use anyhow::{Context, Result};
use std::path::Path;

/// A selected row of the opcode table, comment stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    /// 1-based line number in the source file.
    pub number: usize,
    pub text: String,
}

/// Keeps rows that start with `prefix` in column 0, skipping blanks and `#` comments.
/// Indented rows are not selected.
pub fn select_lines(src: &str, prefix: &str) -> Vec<TableLine> {
    src.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            if !raw.starts_with(prefix) {
                return None;
            }
            let text = raw.split_once('#').map_or(raw, |(head, _)| head).trim();
            if text.is_empty() {
                return None;
            }
            Some(TableLine { number: i + 1, text: text.to_string() })
        })
        .collect()
}

pub fn load_table(path: &Path, prefix: &str) -> Result<Vec<TableLine>> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading opcode table {}", path.display()))?;
    let lines = select_lines(&src, prefix);
    tracing::debug!(path = %path.display(), rows = lines.len(), "table loaded");
    Ok(lines)
}
