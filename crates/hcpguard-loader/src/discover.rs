use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use hcpguard_domain::Format;
use hcpguard_types::TargetPath;
use std::path::PathBuf;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Whether a path has an extension one of the format parsers claims.
pub fn is_config_path(path: &Utf8Path) -> bool {
    path.extension().and_then(Format::from_extension).is_some()
}

/// Discover config files under `root`.
///
/// Behavior:
/// - A file path is returned as-is (whatever its extension).
/// - A directory is walked recursively; hidden directories are skipped, files with a recognized
///   extension are kept, and paths matching any `exclude` glob (relative to `root`) are dropped.
/// - Results are sorted by path string.
pub fn discover_configs(root: &Utf8Path, exclude: &[String]) -> anyhow::Result<Vec<TargetPath>> {
    if root.is_file() {
        return Ok(vec![TargetPath::from(root)]);
    }
    if !root.is_dir() {
        bail!("no such file or directory: {root}");
    }

    let exclude_set = build_globset(exclude).context("compile exclude globset")?;

    let mut out: Vec<TargetPath> = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if !is_config_path(&abs) {
            continue;
        }

        let rel = abs
            .strip_prefix(root)
            .unwrap_or(&abs)
            .as_str()
            .replace('\\', "/");
        if exclude_set.is_match(&rel) {
            debug!(path = %rel, "excluded by glob");
            continue;
        }

        out.push(TargetPath::from(abs));
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("invalid glob '{p}'"))?);
    }
    Ok(b.build()?)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
