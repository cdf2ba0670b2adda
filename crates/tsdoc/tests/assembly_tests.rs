#![cfg(feature = "json")]

use std::fs;

use indexmap::IndexMap;
use tempfile::TempDir;
use tsdoc::{
    AssembleOptions, ClassDescriptor, Flattened, JsonRenderer, MethodDescriptor,
    PathRewriteTable, PropertyDescriptor, SourceUnitModel, TypeRef, assemble, write_units,
};

fn class(module: &str, name: &str, types: Vec<TypeRef>) -> ClassDescriptor {
    ClassDescriptor {
        module_path: format!("module:{module}"),
        name: name.to_string(),
        methods: Vec::new(),
        properties: vec![PropertyDescriptor {
            name: "value".into(),
            types,
            is_optional: false,
            default_value: None,
        }],
        parents: Vec::new(),
        is_interface: false,
        examples: Vec::new(),
    }
}

fn flattened() -> Flattened {
    let mut rewrites = PathRewriteTable::default();
    rewrites.insert("module:pkg/out/sub.Moved", "module:pkg.Moved");

    let mut models = IndexMap::new();
    models.insert(
        "pkg".to_string(),
        SourceUnitModel {
            classes: vec![
                class("pkg", "zeta", vec![TypeRef::name("module:pkg/out/sub.Moved")]),
                class(
                    "pkg",
                    "Alpha",
                    vec![TypeRef::generic("Array", vec![TypeRef::name("module:pkg/out/util.Options")])],
                ),
            ],
            functions: vec![MethodDescriptor::new("start"), MethodDescriptor::new("Build")],
            members: Vec::new(),
        },
    );
    models.insert(
        "pkg/out/util".to_string(),
        SourceUnitModel {
            classes: vec![class("pkg/out/util", "Options", vec![TypeRef::name("module:pkg/out/other.Thing")])],
            ..SourceUnitModel::default()
        },
    );
    models.insert("pkg/out/empty".to_string(), SourceUnitModel::default());

    Flattened {
        models,
        rewrites,
        main_module: "pkg".to_string(),
    }
}

fn json(contents: &str) -> serde_json::Value {
    serde_json::from_str(contents).expect("valid json")
}

#[tokio::test]
async fn empty_modules_produce_no_output() {
    let units = assemble(&flattened(), &JsonRenderer, &AssembleOptions::default())
        .await
        .unwrap();

    let ids: Vec<_> = units.iter().map(|u| u.module_id.as_str()).collect();
    assert_eq!(ids, ["pkg", "pkg/out/util"]);
    assert_eq!(units[1].file_name, "pkg-out-util.json");
}

#[tokio::test]
async fn collections_are_sorted_and_references_rewritten() {
    let units = assemble(&flattened(), &JsonRenderer, &AssembleOptions::default())
        .await
        .unwrap();
    let main = json(&units[0].contents);

    assert_eq!(main["module"], "pkg");
    assert_eq!(main["isMain"], true);
    let classes = main["documentation"]["classes"].as_array().unwrap();
    assert_eq!(classes[0]["name"], "Alpha");
    assert_eq!(classes[1]["name"], "zeta");
    assert_eq!(classes[1]["properties"][0]["types"][0], "module:pkg.Moved");
    // Without an alias target foreign references stay qualified.
    assert_eq!(
        classes[0]["properties"][0]["types"][0]["subTypes"][0],
        "module:pkg/out/util.Options"
    );
    let functions = main["documentation"]["functions"].as_array().unwrap();
    assert_eq!(functions[0]["name"], "Build");
    assert_eq!(functions[1]["name"], "start");
    assert!(units[0].externals.is_empty());
}

#[tokio::test]
async fn main_module_aliases_external_references() {
    let options = AssembleOptions {
        external_if_not_main: Some("https://example.com/api".into()),
        ..AssembleOptions::default()
    };
    let units = assemble(&flattened(), &JsonRenderer, &options).await.unwrap();

    let main = json(&units[0].contents);
    let classes = main["documentation"]["classes"].as_array().unwrap();
    assert_eq!(classes[0]["properties"][0]["types"][0]["subTypes"][0], "external:Options");
    assert_eq!(classes[1]["properties"][0]["types"][0], "module:pkg.Moved");

    assert_eq!(units[0].externals.len(), 1);
    assert_eq!(units[0].externals[0].name, "Options");
    assert_eq!(
        units[0].externals[0].see,
        "https://example.com/api#module_pkg/out/util.Options"
    );
    assert_eq!(main["externals"][0]["moduleId"], "pkg/out/util");

    // Non-main modules keep their references.
    let util = json(&units[1].contents);
    assert_eq!(
        util["documentation"]["classes"][0]["properties"][0]["types"][0],
        "module:pkg/out/other.Thing"
    );
    assert!(units[1].externals.is_empty());
}

#[tokio::test]
async fn class_snippets_are_attached_in_name_order() {
    let examples = TempDir::new().unwrap();
    let options_dir = examples.path().join("Options");
    fs::create_dir(&options_dir).unwrap();
    fs::write(options_dir.join("b-usage.ts"), "new Options()").unwrap();
    fs::write(options_dir.join("a-config.json"), "{}").unwrap();
    fs::write(options_dir.join(".hidden.ts"), "ignored").unwrap();
    fs::write(options_dir.join("README"), "ignored").unwrap();
    fs::create_dir(examples.path().join("Unknown")).unwrap();
    fs::create_dir(examples.path().join("with.dot")).unwrap();

    let options = AssembleOptions {
        examples_dir: Some(examples.path().to_path_buf()),
        snippet_concurrency: 2,
        ..AssembleOptions::default()
    };
    let units = assemble(&flattened(), &JsonRenderer, &options).await.unwrap();
    let util = json(&units[1].contents);
    let snippets = util["documentation"]["classes"][0]["examples"].as_array().unwrap();

    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0]["name"], "a-config");
    assert_eq!(snippets[0]["lang"], "json");
    assert_eq!(snippets[1]["name"], "b-usage");
    assert_eq!(snippets[1]["content"], "new Options()");

    let main = json(&units[0].contents);
    assert!(main["documentation"]["classes"][0].get("examples").is_none());
}

#[tokio::test]
async fn write_units_replaces_the_output_directory() {
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("stale.json"), "{}").unwrap();

    let units = assemble(&flattened(), &JsonRenderer, &AssembleOptions::default())
        .await
        .unwrap();
    write_units(out.path(), &units).await.unwrap();

    let mut files: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, ["pkg-out-util.json", "pkg.json"]);
}
