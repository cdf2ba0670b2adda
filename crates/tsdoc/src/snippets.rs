//! Example snippets attached to classes.
//!
//! Layout: `<examples>/<ClassName>/<snippet>.<lang>`. Class directories are
//! read concurrently; the index is keyed by class name and every list is
//! sorted, so task completion order never shows in the output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{DocsError, Result};
use crate::model::Example;

pub const DEFAULT_SNIPPET_CONCURRENCY: usize = 8;

#[derive(Debug, Default, Clone)]
pub struct SnippetIndex {
    by_class: FxHashMap<String, Vec<Example>>,
}

impl SnippetIndex {
    /// Load snippets for the given class names. Directories for other names are not read.
    pub async fn load(
        dir: &Path,
        classes: &FxHashSet<String>,
        max_parallel: usize,
    ) -> Result<Self> {
        let class_dirs = list_class_dirs(dir, classes).await?;

        let mut join_set = JoinSet::new();
        let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
        for (index, (class, path)) in class_dirs.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = permit.acquire().await.map_err(|error| DocsError::Other {
                    message: format!("snippet loader stopped: {error}"),
                })?;
                let examples = read_examples(&path).await?;
                Ok::<_, DocsError>((index, class, examples))
            });
        }

        let mut loaded = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            let entry = joined.map_err(|error| DocsError::Other {
                message: format!("snippet task failed: {error}"),
            })??;
            loaded.push(entry);
        }
        loaded.sort_by_key(|(index, _, _)| *index);

        let by_class = loaded
            .into_iter()
            .map(|(_, class, examples)| (class, examples))
            .collect();
        Ok(Self { by_class })
    }

    pub fn examples_for(&self, class: &str) -> &[Example] {
        self.by_class
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

/// Immediate subdirectories named like a class (no dot, not hidden), in name order.
async fn list_class_dirs(dir: &Path, classes: &FxHashSet<String>) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|error| DocsError::io(dir, error))?;

    let mut class_dirs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|error| DocsError::io(dir, error))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name.contains('.') || !classes.contains(&name) {
            continue;
        }
        let file_type = entry
            .file_type()
            .await
            .map_err(|error| DocsError::io(entry.path(), error))?;
        if file_type.is_dir() {
            class_dirs.push((name, entry.path()));
        }
    }
    class_dirs.sort();
    debug!(dir = %dir.display(), classes = class_dirs.len(), "found snippet directories");
    Ok(class_dirs)
}

async fn read_examples(dir: &Path) -> Result<Vec<Example>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|error| DocsError::io(dir, error))?;

    let mut examples = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|error| DocsError::io(dir, error))?
    {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') || !file_name.contains('.') {
            continue;
        }
        let path = entry.path();
        if !entry
            .file_type()
            .await
            .map_err(|error| DocsError::io(&path, error))?
            .is_file()
        {
            continue;
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| DocsError::io(&path, error))?;
        let (name, lang) = split_extension(&file_name);
        examples.push(Example {
            name: name.to_string(),
            content,
            lang: lang.to_string(),
        });
    }
    examples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(examples)
}

/// `build.sh` -> (`build`, `sh`)
fn split_extension(file_name: &str) -> (&str, &str) {
    file_name
        .rsplit_once('.')
        .unwrap_or((file_name, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_the_last_dot_segment() {
        assert_eq!(split_extension("build.sh"), ("build", "sh"));
        assert_eq!(split_extension("config.test.ts"), ("config.test", "ts"));
    }
}
