//! Property-based tests for method ordering and re-export flattening.

use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::BTreeSet;
use tsdoc::extractor::{method_order, trim_accessor_prefix};
use tsdoc::flatten::flatten_models;
use tsdoc::{ClassDescriptor, MethodDescriptor, ReexportMap, SourceUnitModel};

fn method_strategy() -> impl Strategy<Value = MethodDescriptor> {
    ("(get|set)?[A-Za-z][a-z]{0,6}", any::<bool>()).prop_map(|(name, is_protected)| {
        MethodDescriptor {
            is_protected,
            ..MethodDescriptor::new(name)
        }
    })
}

fn class(module: &str, name: &str) -> ClassDescriptor {
    ClassDescriptor {
        module_path: format!("module:{module}"),
        name: name.to_string(),
        methods: Vec::new(),
        properties: Vec::new(),
        parents: Vec::new(),
        is_interface: false,
        examples: Vec::new(),
    }
}

/// Modules `m0..mN` holding uniquely named classes and functions.
fn models_strategy() -> impl Strategy<Value = IndexMap<String, SourceUnitModel>> {
    prop::collection::vec(
        (
            prop::collection::btree_set("[A-Z][a-z]{1,5}", 0..5),
            prop::collection::btree_set("[a-z]{2,6}", 0..5),
        ),
        1..5,
    )
    .prop_map(|modules| {
        modules
            .into_iter()
            .enumerate()
            .map(|(index, (classes, functions))| {
                let id = format!("pkg/out/m{index}");
                let model = SourceUnitModel {
                    classes: classes.iter().map(|name| class(&id, name)).collect(),
                    functions: functions.into_iter().map(MethodDescriptor::new).collect(),
                    members: Vec::new(),
                };
                (id, model)
            })
            .collect()
    })
}

fn names(model: &SourceUnitModel) -> BTreeSet<String> {
    model
        .classes
        .iter()
        .map(|c| c.name.clone())
        .chain(model.functions.iter().map(|f| f.name.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Protected methods come last and each tier is ordered by the trimmed, lowercased name.
    #[test]
    fn prop_method_order_is_tiered_and_accessor_aware(
        mut methods in prop::collection::vec(method_strategy(), 0..12)
    ) {
        methods.sort_by(method_order);
        for pair in methods.windows(2) {
            prop_assert!(pair[0].is_protected <= pair[1].is_protected);
            if pair[0].is_protected == pair[1].is_protected {
                let a = trim_accessor_prefix(&pair[0].name).to_lowercase();
                let b = trim_accessor_prefix(&pair[1].name).to_lowercase();
                prop_assert!(a <= b, "{a} sorted before {b}");
            }
        }
    }

    /// Flattening with an empty mapping is the identity.
    #[test]
    fn prop_empty_mapping_is_identity(models in models_strategy()) {
        let mut flattened = models.clone();
        let rewrites = flatten_models(&mut flattened, &ReexportMap::new(), "pkg");
        prop_assert!(rewrites.is_empty());
        prop_assert_eq!(flattened, models);
    }

    /// Every re-exported name ends up in main and nowhere else; nothing is lost.
    #[test]
    fn prop_relocated_names_leave_their_origin(
        models in models_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut reexports = ReexportMap::new();
        let mut expected = BTreeSet::new();
        for pick in picks {
            let (origin, model) = models.get_index(pick.index(models.len())).unwrap();
            let candidates: Vec<String> = names(model).into_iter().collect();
            if candidates.is_empty() {
                continue;
            }
            let name = candidates[pick.index(candidates.len())].clone();
            if expected.insert((origin.clone(), name.clone())) {
                reexports.entry(origin.clone()).or_default().push(name);
            }
        }

        let before: usize = models.values().map(|m| names(m).len()).sum();
        let mut flattened = models.clone();
        let rewrites = flatten_models(&mut flattened, &reexports, "pkg");

        let main = flattened.get("pkg").cloned().unwrap_or_default();
        for (origin, name) in &expected {
            prop_assert!(!names(&flattened[origin]).contains(name));
            prop_assert!(names(&main).contains(name));
            if name.starts_with(char::is_uppercase) {
                let old = format!("module:{origin}.{name}");
                let new = format!("module:pkg.{name}");
                prop_assert_eq!(rewrites.get(&old), Some(new.as_str()));
                let moved = main.classes.iter().find(|c| &c.name == name).unwrap();
                prop_assert_eq!(moved.module_path.as_str(), "module:pkg");
            }
        }

        let main_count = main.classes.len() + main.functions.len();
        let after: usize = flattened
            .iter()
            .filter(|(id, _)| id.as_str() != "pkg")
            .map(|(_, m)| names(m).len())
            .sum::<usize>()
            + main_count;
        prop_assert_eq!(before, after);
    }
}
