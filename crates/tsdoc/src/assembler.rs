//! Output assembly: per-module sorting, reference mapping, snippets and rendering.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DocsError, Result};
use crate::extractor::compare_names;
use crate::flatten::{Flattened, PathRewriteTable};
use crate::model::{MemberDescriptor, Named, SourceUnitModel, TypeRef};
use crate::snippets::{DEFAULT_SNIPPET_CONCURRENCY, SnippetIndex};

const MODULE_PREFIX: &str = "module:";
const EXTERNAL_PREFIX: &str = "external:";

/// Rewrites `module:` references for one output module.
///
/// A rewrite table hit wins. Otherwise, while rendering the main module with an
/// external alias target configured, references into other modules become
/// `external:<Name>` and are remembered so the output can declare them.
#[derive(Debug)]
pub struct ModulePathMapper<'a> {
    rewrites: &'a PathRewriteTable,
    main_module: &'a str,
    current_module: &'a str,
    external_target: Option<&'a str>,
    externals: IndexMap<String, String>,
}

impl<'a> ModulePathMapper<'a> {
    pub fn new(
        rewrites: &'a PathRewriteTable,
        main_module: &'a str,
        current_module: &'a str,
        external_target: Option<&'a str>,
    ) -> Self {
        Self {
            rewrites,
            main_module,
            current_module,
            external_target,
            externals: IndexMap::new(),
        }
    }

    pub fn current_module(&self) -> &str {
        self.current_module
    }

    pub fn is_main(&self) -> bool {
        self.current_module == self.main_module
    }

    pub fn map(&mut self, old: &str) -> String {
        let Some(path) = old.strip_prefix(MODULE_PREFIX) else {
            return old.to_string();
        };
        if let Some(new) = self.rewrites.get(old) {
            return new.to_string();
        }
        if self.is_main() && self.external_target.is_some() {
            if let Some((module_id, name)) = path.rsplit_once('.') {
                if module_id != self.main_module {
                    self.externals
                        .insert(name.to_string(), module_id.to_string());
                    return format!("{EXTERNAL_PREFIX}{name}");
                }
            }
        }
        old.to_string()
    }

    pub fn map_type(&mut self, reference: &TypeRef) -> TypeRef {
        reference.map_names(&mut |name| self.map(name))
    }

    fn map_types(&mut self, references: &[TypeRef]) -> Vec<TypeRef> {
        references.iter().map(|reference| self.map_type(reference)).collect()
    }

    /// Copy of `model` with every type reference mapped.
    pub fn map_model(&mut self, model: &SourceUnitModel) -> SourceUnitModel {
        let mut mapped = model.clone();
        for class in &mut mapped.classes {
            class.parents = self.map_types(&class.parents);
            for property in &mut class.properties {
                property.types = self.map_types(&property.types);
            }
        }
        for member in &mut mapped.members {
            if let MemberDescriptor::Variable(variable) = member {
                variable.types = self.map_types(&variable.types);
            }
        }
        mapped
    }

    /// Aliases recorded so far, in first-reference order.
    pub fn external_aliases(&self) -> Vec<ExternalAlias> {
        let Some(target) = self.external_target else {
            return Vec::new();
        };
        self.externals
            .iter()
            .map(|(name, module_id)| ExternalAlias {
                name: name.clone(),
                module_id: module_id.clone(),
                see: format!("{target}#module_{module_id}.{name}"),
            })
            .collect()
    }
}

/// Declaration of a symbol referenced from the main module but documented elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAlias {
    pub name: String,
    pub module_id: String,
    pub see: String,
}

/// What a renderer receives for one module. Collections are already sorted
/// and classes carry their examples.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub module_id: &'a str,
    pub is_main: bool,
    pub model: &'a SourceUnitModel,
}

/// Turns one module's model into file contents.
pub trait Renderer: Send + Sync {
    /// Extension of the produced files, without the dot.
    fn file_extension(&self) -> &str;

    fn render(&self, input: &RenderInput<'_>, mapper: &mut ModulePathMapper<'_>) -> Result<String>;
}

/// One rendered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub module_id: String,
    pub file_name: String,
    pub contents: String,
    pub externals: Vec<ExternalAlias>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Base URL for `external:` aliases from the main module.
    pub external_if_not_main: Option<String>,
    /// Root of the per-class example snippet tree.
    pub examples_dir: Option<PathBuf>,
    pub snippet_concurrency: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            external_if_not_main: None,
            examples_dir: None,
            snippet_concurrency: DEFAULT_SNIPPET_CONCURRENCY,
        }
    }
}

/// `pkg/out/util` -> `pkg-out-util.json`
pub fn output_file_name(module_id: &str, extension: &str) -> String {
    format!("{}.{extension}", module_id.replace('/', "-"))
}

/// Render every non-empty module.
pub async fn assemble<R: Renderer + ?Sized>(
    flattened: &Flattened,
    renderer: &R,
    options: &AssembleOptions,
) -> Result<Vec<OutputUnit>> {
    let snippets = match &options.examples_dir {
        Some(dir) => {
            let classes: FxHashSet<String> = flattened
                .models
                .values()
                .flat_map(|model| model.classes.iter().map(|class| class.name.clone()))
                .collect();
            SnippetIndex::load(dir, &classes, options.snippet_concurrency).await?
        }
        None => SnippetIndex::default(),
    };

    let mut units = Vec::with_capacity(flattened.models.len());
    for (module_id, model) in &flattened.models {
        if model.is_empty() {
            debug!(module = %module_id, "nothing to document, skipping module");
            continue;
        }

        let mut prepared = sorted_model(model);
        for class in &mut prepared.classes {
            class.examples = snippets.examples_for(&class.name).to_vec();
        }

        let mut mapper = ModulePathMapper::new(
            &flattened.rewrites,
            &flattened.main_module,
            module_id,
            options.external_if_not_main.as_deref(),
        );
        let input = RenderInput {
            module_id,
            is_main: mapper.is_main(),
            model: &prepared,
        };
        let contents = renderer.render(&input, &mut mapper)?;
        units.push(OutputUnit {
            module_id: module_id.clone(),
            file_name: output_file_name(module_id, renderer.file_extension()),
            contents,
            externals: mapper.external_aliases(),
        });
    }

    info!(units = units.len(), "assembled output units");
    Ok(units)
}

/// Copy of `model` with members, classes and functions in case-insensitive name order.
pub fn sorted_model(model: &SourceUnitModel) -> SourceUnitModel {
    let mut sorted = model.clone();
    sort_by_name(&mut sorted.members);
    sort_by_name(&mut sorted.classes);
    sort_by_name(&mut sorted.functions);
    sorted
}

fn sort_by_name<T: Named>(items: &mut [T]) {
    items.sort_by(|a, b| compare_names(a.name(), b.name()));
}

/// Replace the contents of `out_dir` with the given units.
pub async fn write_units(out_dir: &Path, units: &[OutputUnit]) -> Result<()> {
    match tokio::fs::remove_dir_all(out_dir).await {
        Ok(()) => {}
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => return Err(DocsError::io(out_dir, error)),
    }
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|error| DocsError::io(out_dir, error))?;

    for unit in units {
        let path = out_dir.join(&unit.file_name);
        tokio::fs::write(&path, &unit.contents)
            .await
            .map_err(|error| DocsError::io(&path, error))?;
        debug!(path = %path.display(), "wrote output unit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_module_references_pass_through() {
        let rewrites = PathRewriteTable::default();
        let mut mapper = ModulePathMapper::new(&rewrites, "pkg", "pkg", Some("https://x"));
        assert_eq!(mapper.map("string"), "string");
        assert_eq!(mapper.map("Promise"), "Promise");
        assert!(mapper.external_aliases().is_empty());
    }

    #[test]
    fn rewrite_table_wins_over_externals() {
        let mut rewrites = PathRewriteTable::default();
        rewrites.insert("module:pkg/out/a.X", "module:pkg.X");
        let mut mapper = ModulePathMapper::new(&rewrites, "pkg", "pkg", Some("https://x"));
        assert_eq!(mapper.map("module:pkg/out/a.X"), "module:pkg.X");
        assert!(mapper.external_aliases().is_empty());
    }

    #[test]
    fn main_module_aliases_foreign_references() {
        let rewrites = PathRewriteTable::default();
        let mut mapper = ModulePathMapper::new(&rewrites, "pkg", "pkg", Some("https://docs"));
        let mapped = mapper.map_type(&TypeRef::generic(
            "Array",
            vec![TypeRef::name("module:pkg/out/util.Options")],
        ));
        assert_eq!(
            mapped,
            TypeRef::generic("Array", vec![TypeRef::name("external:Options")])
        );
        assert_eq!(mapper.map("module:pkg.Local"), "module:pkg.Local");
        assert_eq!(
            mapper.external_aliases(),
            vec![ExternalAlias {
                name: "Options".into(),
                module_id: "pkg/out/util".into(),
                see: "https://docs#module_pkg/out/util.Options".into(),
            }]
        );
    }

    #[test]
    fn other_modules_are_never_aliased() {
        let rewrites = PathRewriteTable::default();
        let mut mapper = ModulePathMapper::new(&rewrites, "pkg", "pkg/out/a", Some("https://docs"));
        assert_eq!(mapper.map("module:pkg/out/b.Y"), "module:pkg/out/b.Y");
        assert!(mapper.external_aliases().is_empty());
    }

    #[test]
    fn file_names_flatten_separators() {
        assert_eq!(output_file_name("pkg/out/util", "json"), "pkg-out-util.json");
        assert_eq!(output_file_name("pkg", "json"), "pkg.json");
    }
}
