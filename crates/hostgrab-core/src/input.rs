//! Reading the URL list.

use anyhow::{Context, Result};
use std::path::Path;

/// Read a newline-delimited URL list. Lines are returned as-is: blank lines
/// are kept (they fail at fetch time). `\n`, `\r\n` and a lone `\r` all end a line.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read URL list {}", path.display()))?;
    Ok(split_lines(&data))
}

/// Split on `\n`, `\r\n` or `\r`. A trailing terminator does not add an empty line.
pub fn split_lines(data: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(i) => {
                lines.push(rest[..i].to_string());
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}
