//! TypeScript front end for `tsdoc`.
//!
//! Parses each source with OXC, lowers the declarations the documentation
//! engine walks into [`tsdoc::Program`], and binds every type annotation to
//! a checked type. Binding is name based: imports are followed through
//! relative specifiers and anything unknown is treated as a runtime global.
//!
//! ```rust,ignore
//! use tsdoc_oxc::{LoadOptions, load_files};
//!
//! let program = load_files(&files, &LoadOptions::default())?;
//! ```

#![deny(clippy::all)]

mod binder;
pub mod error;
mod lower;
pub mod parser;
mod scope;

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use tracing::{debug, info};
use tsdoc::program::{Declaration, DeclarationKind, ModifierFlags, SourceUnit};
use tsdoc::{Program, ProgramBuilder};

use crate::binder::Binder;
use crate::lower::Lowerer;
use crate::scope::{SymbolTables, UnitTable};

pub use error::{FrontendError, Result};

/// One source file's text.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: String,
    pub text: String,
}

impl SourceText {
    pub fn new(path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Overrides the computed common source directory.
    pub root_dir: Option<PathBuf>,
}

/// Read `paths` from disk and build the program.
pub fn load_files(paths: &[PathBuf], options: &LoadOptions) -> Result<Program> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(path).map_err(|error| FrontendError::Io {
            path: path.clone(),
            error,
        })?;
        sources.push(SourceText::new(path, text));
    }
    build_program(sources, options)
}

/// Parse, lower and bind in-memory sources.
pub fn build_program(sources: Vec<SourceText>, options: &LoadOptions) -> Result<Program> {
    let common_dir = match &options.root_dir {
        Some(root) => normalize_path(root),
        None => common_source_dir(
            sources
                .iter()
                .map(|s| s.path.as_str())
                .filter(|path| !is_declaration_file(path)),
        ),
    };

    let mut builder = ProgramBuilder::new(common_dir);
    let mut tables = SymbolTables::default();
    for (index, source) in sources.iter().enumerate() {
        tables.units.push(UnitTable {
            file_name: source.path.clone(),
            ..UnitTable::default()
        });
        tables.unit_by_file.insert(source.path.clone(), index);
    }

    let mut pending = Vec::new();
    let mut units = Vec::with_capacity(sources.len());
    for (index, source) in sources.iter().enumerate() {
        let allocator = Allocator::default();
        let parsed = parser::parse(&allocator, &source.path, &source.text)?;

        let id = builder.unit_id();
        let unit_scope = builder.add_declaration(Declaration::new(
            DeclarationKind::SourceUnit(id),
            None,
            ModifierFlags::empty(),
        ));
        let declaration_file = is_declaration_file(&source.path);
        let statements = Lowerer::new(
            &mut builder,
            &mut tables,
            &mut pending,
            parsed.source_text,
            index,
            unit_scope,
            declaration_file,
        )
        .lower_program(&parsed.program);
        debug!(file = %source.path, statements = statements.len(), "lowered unit");

        units.push(SourceUnit {
            id,
            file_name: source.path.clone(),
            is_declaration_file: declaration_file,
            is_empty: source.text.is_empty(),
            statements,
        });
    }

    Binder::new(&mut builder, &tables).bind_all(pending);
    for unit in units {
        builder.add_unit(unit);
    }
    info!(units = sources.len(), "program loaded");
    Ok(builder.build())
}

pub fn is_declaration_file(path: &str) -> bool {
    [".d.ts", ".d.mts", ".d.cts"]
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

fn normalize_path(path: &Path) -> String {
    use path_clean::PathClean;
    path.clean().to_string_lossy().replace('\\', "/")
}

/// Longest directory shared by every path.
fn common_source_dir<'a>(paths: impl Iterator<Item = &'a str>) -> String {
    let mut common: Option<Vec<&str>> = None;
    for path in paths {
        let mut dirs: Vec<&str> = path.split('/').collect();
        dirs.pop();
        common = Some(match common {
            None => dirs,
            Some(prefix) => prefix
                .into_iter()
                .zip(dirs)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    match common {
        Some(parts) if parts.len() > 1 => parts.join("/"),
        Some(_) => "/".to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_dir_is_the_longest_shared_directory() {
        let paths = ["/p/src/a.ts", "/p/src/lib/b.ts", "/p/src/lib/deep/c.ts"];
        assert_eq!(common_source_dir(paths.into_iter()), "/p/src");
        assert_eq!(common_source_dir(["/p/src/a.ts"].into_iter()), "/p/src");
        assert_eq!(common_source_dir(["/a/x.ts", "/b/y.ts"].into_iter()), "/");
        assert_eq!(common_source_dir(std::iter::empty()), "");
    }

    #[test]
    fn declaration_files_are_detected() {
        assert!(is_declaration_file("/p/src/types.d.ts"));
        assert!(!is_declaration_file("/p/src/types.ts"));
    }
}
