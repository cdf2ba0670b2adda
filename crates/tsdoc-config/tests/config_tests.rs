//! Configuration loading and source discovery against on-disk projects.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tsdoc_config::{ConfigError, Overrides, PLACEHOLDER_PACKAGE_NAME, ProjectConfig, discover_sources};

fn write(root: &Path, file: &str, contents: &str) {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn project(tsconfig: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tsconfig.json", tsconfig);
    write(dir.path(), "package.json", r#"{ "name": "@acme/widgets", "main": "lib/index.js" }"#);
    dir
}

#[test]
fn reads_package_and_tsconfig() {
    let dir = project(
        r#"{
            // comments are allowed
            "compilerOptions": { "outDir": "lib", "rootDir": "src", },
            "jsdoc": { "out": "docs", "externalIfNotMain": "https://x.dev/api", "examples": "snippets" },
        }"#,
    );
    let config = ProjectConfig::load(dir.path(), &Overrides::default()).unwrap();

    assert_eq!(config.package_name, "@acme/widgets");
    assert_eq!(config.main_file.as_deref(), Some("lib/index.js"));
    assert_eq!(config.relative_out_dir(), "lib");
    assert_eq!(config.root_dir, Some(dir.path().join("src")));
    assert_eq!(config.docs_out, dir.path().join("docs"));
    assert_eq!(config.examples, Some(dir.path().join("snippets")));
    assert_eq!(config.external_if_not_main.as_deref(), Some("https://x.dev/api"));

    let naming = config.naming();
    assert_eq!(naming.package_name.as_deref(), Some("@acme/widgets"));
    assert_eq!(naming.relative_out_dir, "lib");
    assert_eq!(naming.main_file.as_deref(), Some("lib/index.js"));
}

#[test]
fn jsdoc_section_may_be_a_plain_string() {
    let dir = project(r#"{ "compilerOptions": { "outDir": "out" }, "jsdoc": "api-docs" }"#);
    let config = ProjectConfig::load(dir.path(), &Overrides::default()).unwrap();
    assert_eq!(config.docs_out, dir.path().join("api-docs"));
    assert!(config.external_if_not_main.is_none());
}

#[test]
fn missing_package_json_uses_placeholder() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tsconfig.json", r#"{ "compilerOptions": { "outDir": "out" }, "jsdoc": "docs" }"#);
    let config = ProjectConfig::load(dir.path(), &Overrides::default()).unwrap();
    assert_eq!(config.package_name, PLACEHOLDER_PACKAGE_NAME);
    assert!(config.main_file.is_none());
}

#[test]
fn required_settings_are_reported() {
    let empty = TempDir::new().unwrap();
    assert!(matches!(
        ProjectConfig::load(empty.path(), &Overrides::default()),
        Err(ConfigError::NotFound(_))
    ));

    let no_out_dir = project(r#"{ "compilerOptions": {}, "jsdoc": "docs" }"#);
    assert!(matches!(
        ProjectConfig::load(no_out_dir.path(), &Overrides::default()),
        Err(ConfigError::MissingOutDir { .. })
    ));

    let no_docs = project(r#"{ "compilerOptions": { "outDir": "out" } }"#);
    let err = ProjectConfig::load(no_docs.path(), &Overrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingDocsOut { .. }));
    assert!(err.to_string().contains("\"jsdoc\""));

    let broken = project("{ not json");
    assert!(matches!(
        ProjectConfig::load(broken.path(), &Overrides::default()),
        Err(ConfigError::InvalidJson { .. })
    ));
}

#[test]
fn discovery_skips_output_dependencies_and_hidden_dirs() {
    let dir = project(
        r#"{ "compilerOptions": { "outDir": "lib" }, "jsdoc": "docs", "exclude": ["fixtures"] }"#,
    );
    let root = dir.path();
    write(root, "src/index.ts", "");
    write(root, "src/widget.tsx", "");
    write(root, "src/types.d.ts", "");
    write(root, "src/readme.md", "");
    write(root, "lib/index.d.ts", "");
    write(root, "docs/stale.ts", "");
    write(root, "node_modules/dep/index.ts", "");
    write(root, ".cache/x.ts", "");
    write(root, "fixtures/a.ts", "");

    let config = ProjectConfig::load(root, &Overrides::default()).unwrap();
    let found: Vec<String> = discover_sources(&config)
        .unwrap()
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(found, ["src/index.ts", "src/types.d.ts", "src/widget.tsx"]);
}

#[test]
fn explicit_files_list_wins() {
    let dir = project(r#"{ "compilerOptions": { "outDir": "lib" }, "jsdoc": "docs", "files": ["src/a.ts"] }"#);
    let config = ProjectConfig::load(dir.path(), &Overrides::default()).unwrap();
    assert_eq!(discover_sources(&config).unwrap(), [dir.path().join("src/a.ts")]);
}
