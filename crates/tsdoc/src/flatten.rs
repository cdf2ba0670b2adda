//! Relocates symbols re-exported by the main module into the main module's model.

use indexmap::IndexMap;
use tracing::debug;

use crate::extractor::{Extraction, ReexportMap};
use crate::model::{Named, SourceUnitModel};

/// Old qualified path (`module:origin.Name`) to its post-flattening location.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathRewriteTable {
    entries: IndexMap<String, String>,
}

impl PathRewriteTable {
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.entries.insert(old.into(), new.into());
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }
}

/// Models after relocation, ready for assembly.
#[derive(Debug, Default)]
pub struct Flattened {
    pub models: IndexMap<String, SourceUnitModel>,
    pub rewrites: PathRewriteTable,
    pub main_module: String,
}

impl Extraction {
    /// Consume the re-export mapping and relocate the named symbols.
    pub fn flatten(self) -> Flattened {
        let Extraction {
            mut models,
            reexports,
            main_module,
        } = self;
        let rewrites = flatten_models(&mut models, &reexports, &main_module);
        Flattened {
            models,
            rewrites,
            main_module,
        }
    }
}

/// Move every re-exported name from its origin module into `main_module`.
///
/// Each name is looked up in classes, then functions, then members; the first
/// hit moves. Relocated classes get their module path rewritten and a rewrite
/// table entry. Names found nowhere are ignored.
pub fn flatten_models(
    models: &mut IndexMap<String, SourceUnitModel>,
    reexports: &ReexportMap,
    main_module: &str,
) -> PathRewriteTable {
    let mut rewrites = PathRewriteTable::default();
    let main_path = format!("module:{main_module}");

    for (origin, names) in reexports {
        if origin == main_module {
            continue;
        }
        let Some(origin_model) = models.get_mut(origin) else {
            debug!(origin = %origin, "re-exported module produced no model");
            continue;
        };

        let mut moved = SourceUnitModel::default();
        for name in names {
            if let Some(mut class) = take_named(&mut origin_model.classes, name) {
                class.module_path.clone_from(&main_path);
                rewrites.insert(format!("module:{origin}.{name}"), format!("{main_path}.{name}"));
                moved.classes.push(class);
            } else if let Some(function) = take_named(&mut origin_model.functions, name) {
                moved.functions.push(function);
            } else if let Some(member) = take_named(&mut origin_model.members, name) {
                moved.members.push(member);
            } else {
                continue;
            }
            debug!(origin = %origin, name = %name, "relocated into main module");
        }

        if !moved.is_empty() {
            models
                .entry(main_module.to_string())
                .or_default()
                .extend(moved);
        }
    }

    rewrites
}

fn take_named<T: Named>(items: &mut Vec<T>, name: &str) -> Option<T> {
    let index = items.iter().position(|item| item.name() == name)?;
    Some(items.remove(index))
}
