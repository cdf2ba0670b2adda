//! Source file discovery.

use std::path::PathBuf;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::ProjectConfig;
use crate::error::Result;

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// The files to load: the explicit `files` list, or every TypeScript file
/// under the root directory outside build output and dependencies.
pub fn discover_sources(config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    if let Some(files) = &config.files {
        return Ok(files.iter().map(|file| config.project_dir.join(file)).collect());
    }

    let root = config.root_dir.as_ref().unwrap_or(&config.project_dir);
    let skip_dirs = [&config.out_dir, &config.docs_out];

    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(is_skipped_dir(entry, &config.exclude)
                    || skip_dirs.iter().any(|dir| entry.path() == dir.as_path()))
        });
    for entry in walker {
        let entry = entry.map_err(|e| {
            std::io::Error::other(format!("cannot walk {}: {e}", root.display()))
        })?;
        if entry.file_type().is_file() && is_source(&entry) {
            sources.push(entry.into_path());
        }
    }
    debug!(count = sources.len(), root = %root.display(), "discovered sources");
    Ok(sources)
}

fn is_skipped_dir(entry: &DirEntry, exclude: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.') || exclude.iter().any(|e| e.trim_end_matches('/') == name)
}

fn is_source(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
