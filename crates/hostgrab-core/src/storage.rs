//! Output directory and per-host output files.
//!
//! Each successful fetch is written to `<output_dir>/<hostname>` (no
//! extension). The body goes to an anonymous `.tmp*` file in the same
//! directory first and is persisted over the final name, so an output file is
//! never seen half-written and a re-run replaces the previous content
//! entirely. Two URLs on the same host share a file; whichever is written
//! last wins.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create the output directory (and parents) if absent. Idempotent.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))
}

/// Hostname of a parsed URL as used for the output filename.
///
/// Domains come back lowercased by the URL parser; IPv6 literals lose their
/// brackets. `None` for URLs without a host.
pub fn host_file_name(url: &url::Url) -> Option<String> {
    match url.host()? {
        url::Host::Domain(d) if d.is_empty() => None,
        url::Host::Domain(d) => Some(d.to_string()),
        url::Host::Ipv4(addr) => Some(addr.to_string()),
        url::Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Final path of the output file for `host`.
pub fn output_path(dir: &Path, host: &str) -> PathBuf {
    dir.join(host)
}

/// Write `body` as text to the output file for `host`, replacing any previous file.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD. Returns the final path.
/// The temp file is removed on every error path when the handle drops.
pub fn write_body(dir: &Path, host: &str, body: &[u8]) -> Result<PathBuf> {
    let final_path = output_path(dir, host);
    let text = String::from_utf8_lossy(body);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    tmp.persist(&final_path)
        .map_err(|e| anyhow::Error::new(e.error))
        .with_context(|| format!("persist {}", final_path.display()))?;
    Ok(final_path)
}
