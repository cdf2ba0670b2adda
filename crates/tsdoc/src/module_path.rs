//! Module identifiers for source units.
//!
//! A module identifier is a pure function of the unit's path and the package
//! configuration: `package[/outDir]/relative/name`, collapsing to the bare
//! package name for the root index file and for the entry-point unit.

use std::path::Path;

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::program::SourceUnit;

/// Package-level inputs for naming modules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNaming {
    /// Package name from the project metadata.
    pub package_name: Option<String>,
    /// Compiler output directory relative to the project directory (`out`, `dist/lib`).
    pub relative_out_dir: String,
    /// Declared entry-point file (`main` of the package metadata), relative to the project directory.
    pub main_file: Option<String>,
}

impl ModuleNaming {
    pub fn new(package_name: impl Into<String>, relative_out_dir: impl Into<String>) -> Self {
        Self {
            package_name: Some(package_name.into()),
            relative_out_dir: relative_out_dir.into(),
            main_file: None,
        }
    }

    pub fn with_main_file(mut self, main_file: impl Into<String>) -> Self {
        self.main_file = Some(main_file.into());
        self
    }
}

/// Identifier and entry-point flag of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: String,
    pub file_name_without_ext: String,
    pub is_main: bool,
}

/// Well-known runtime declaration file that gets a fixed identifier.
const NODE_DECLARATIONS_SUFFIX: &str = "node.d.ts";
const NODE_MODULE_ID: &str = "node";

#[derive(Debug, Clone, Copy)]
pub struct ModulePathResolver<'a> {
    naming: &'a ModuleNaming,
    common_source_dir: &'a str,
}

impl<'a> ModulePathResolver<'a> {
    pub fn new(naming: &'a ModuleNaming, common_source_dir: &'a str) -> Self {
        Self {
            naming,
            common_source_dir,
        }
    }

    /// Identifier of the main module (the bare package name).
    pub fn main_module_id(&self) -> String {
        self.naming
            .package_name
            .clone()
            .unwrap_or_else(|| self.naming.relative_out_dir.clone())
    }

    pub fn resolve(&self, unit: &SourceUnit) -> ModuleInfo {
        if unit.is_declaration_file && unit.file_name.ends_with(NODE_DECLARATIONS_SUFFIX) {
            return ModuleInfo {
                id: NODE_MODULE_ID.to_string(),
                file_name_without_ext: String::new(),
                is_main: false,
            };
        }

        let file_name_without_ext = unit.file_name_without_ext().replace('\\', "/");
        let name = relative_path(self.common_source_dir, &file_name_without_ext);
        let is_index = name == "index";

        let mut segments: Vec<&str> = Vec::with_capacity(3);
        match &self.naming.package_name {
            Some(package_name) => {
                segments.push(package_name);
                if !is_index {
                    segments.push(&self.naming.relative_out_dir);
                }
            }
            None => segments.push(&self.naming.relative_out_dir),
        }
        if !is_index {
            segments.push(&name);
        }
        let mut id = segments
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        let is_main = self.is_main(&name, &file_name_without_ext);
        if is_main {
            if let Some(package_name) = &self.naming.package_name {
                id = package_name.clone();
            }
        }

        ModuleInfo {
            id,
            file_name_without_ext,
            is_main,
        }
    }

    /// `name` is the unit's path below the common source dir, which is also
    /// its emitted path below the output dir.
    fn is_main(&self, name: &str, file_name_without_ext: &str) -> bool {
        match &self.naming.main_file {
            None => file_name_without_ext.ends_with("/main"),
            Some(main_file) => {
                let expected = relative_path(&self.naming.relative_out_dir, main_file);
                format!("{name}.js") == expected
            }
        }
    }
}

/// Suffixes tried, in order, for a relative module specifier.
pub const SPECIFIER_SUFFIXES: &[&str] = &[
    "",
    ".ts",
    ".tsx",
    ".d.ts",
    "/index.ts",
    "/index.tsx",
    "/index.d.ts",
];

/// File names a relative specifier (`./util`, `../lib/index.js`) written in
/// `importer` may refer to, most specific first. Empty for bare specifiers.
///
/// A `.js`/`.jsx` suffix names the emitted file, so the TypeScript source is
/// looked up under the stripped stem as well.
pub fn specifier_candidates(importer: &str, specifier: &str) -> Vec<String> {
    if !specifier.starts_with('.') {
        return Vec::new();
    }
    let Some(dir) = Path::new(importer).parent() else {
        return Vec::new();
    };
    let base = dir.join(specifier).clean().to_string_lossy().replace('\\', "/");
    let stems = [
        Some(base.as_str()),
        base.strip_suffix(".js"),
        base.strip_suffix(".jsx"),
    ];
    stems
        .into_iter()
        .flatten()
        .flat_map(|stem| SPECIFIER_SUFFIXES.iter().map(move |suffix| format!("{stem}{suffix}")))
        .collect()
}

/// POSIX-style relative path from directory `from` to `to`.
pub(crate) fn relative_path(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<&str> = from.split('/').filter(|part| !part.is_empty() && *part != ".").collect();
    let to_parts: Vec<&str> = to.split('/').filter(|part| !part.is_empty() && *part != ".").collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", from_parts.len() - common).collect();
    parts.extend(&to_parts[common..]);
    parts.join("/")
}

fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    Path::new(&path.replace('\\', "/"))
        .clean()
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::UnitId;

    fn unit(file_name: &str) -> SourceUnit {
        SourceUnit {
            id: UnitId::from_raw(0),
            file_name: file_name.to_string(),
            is_declaration_file: file_name.ends_with(".d.ts"),
            is_empty: false,
            statements: Vec::new(),
        }
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative_path("/p/src", "/p/src/util/a"), "util/a");
        assert_eq!(relative_path("/p/src", "/p/lib/a"), "../lib/a");
        assert_eq!(relative_path("out", "out/main.js"), "main.js");
        assert_eq!(relative_path("out", "./out/lib/index.js"), "lib/index.js");
    }

    #[test]
    fn specifier_candidates_cover_extensions_and_index_files() {
        let candidates = specifier_candidates("/p/src/main.ts", "./widgets");
        assert_eq!(candidates[0], "/p/src/widgets");
        assert!(candidates.contains(&"/p/src/widgets/index.tsx".to_string()));
        assert!(candidates.contains(&"/p/src/widgets/index.d.ts".to_string()));

        let candidates = specifier_candidates("/p/src/lib/a.ts", "../view.jsx");
        assert!(candidates.contains(&"/p/src/view.tsx".to_string()));
        assert!(specifier_candidates("/p/src/main.ts", "lodash").is_empty());
    }

    #[test]
    fn index_file_is_the_package_itself() {
        let naming = ModuleNaming::new("pkg", "out");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        assert_eq!(resolver.resolve(&unit("/p/src/index.ts")).id, "pkg");
    }

    #[test]
    fn other_files_get_out_dir_and_relative_name() {
        let naming = ModuleNaming::new("pkg", "out");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        let info = resolver.resolve(&unit("/p/src/util/fs.ts"));
        assert_eq!(info.id, "pkg/out/util/fs");
        assert_eq!(info.file_name_without_ext, "/p/src/util/fs");
        assert!(!info.is_main);
    }

    #[test]
    fn without_package_name_the_out_dir_leads() {
        let naming = ModuleNaming {
            package_name: None,
            relative_out_dir: "out".into(),
            main_file: None,
        };
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        assert_eq!(resolver.resolve(&unit("/p/src/a.ts")).id, "out/a");
    }

    #[test]
    fn conventional_main_collapses_to_package_name() {
        let naming = ModuleNaming::new("pkg", "out");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        let info = resolver.resolve(&unit("/p/src/main.ts"));
        assert!(info.is_main);
        assert_eq!(info.id, "pkg");
    }

    #[test]
    fn configured_main_file_wins_over_convention() {
        let naming = ModuleNaming::new("pkg", "out").with_main_file("out/builder.js");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        assert!(resolver.resolve(&unit("/p/src/builder.ts")).is_main);
        assert!(!resolver.resolve(&unit("/p/src/main.ts")).is_main);
        assert!(!resolver.resolve(&unit("/p/src/subbuilder.ts")).is_main);
    }

    #[test]
    fn configured_main_matches_the_emitted_path_only() {
        let naming = ModuleNaming::new("pkg", "out").with_main_file("out/index.js");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        assert!(resolver.resolve(&unit("/p/src/index.ts")).is_main);

        let nested = resolver.resolve(&unit("/p/src/lib/index.ts"));
        assert!(!nested.is_main);
        assert_eq!(nested.id, "pkg/out/lib/index");

        let naming = ModuleNaming::new("pkg", "out").with_main_file("out/lib/index.js");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        assert!(resolver.resolve(&unit("/p/src/lib/index.ts")).is_main);
        assert!(!resolver.resolve(&unit("/p/src/index.ts")).is_main);
    }

    #[test]
    fn node_declarations_are_special_cased() {
        let naming = ModuleNaming::new("pkg", "out");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        let info = resolver.resolve(&unit("/p/node_modules/@types/node/node.d.ts"));
        assert_eq!(info.id, "node");
        assert!(!info.is_main);
    }

    #[test]
    fn resolution_is_deterministic() {
        let naming = ModuleNaming::new("pkg", "out");
        let resolver = ModulePathResolver::new(&naming, "/p/src");
        let unit = unit("/p/src/a/b.ts");
        assert_eq!(resolver.resolve(&unit), resolver.resolve(&unit));
    }
}
