//! Project configuration loading.
//!
//! Priority for the documentation settings:
//! CLI overrides > `TSDOC_*` environment variables > `tsconfig.json` `jsdoc` section > defaults.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tsdoc::ModuleNaming;

use crate::error::{ConfigError, Result};
use crate::jsonc;

/// Package name used when `package.json` is missing or unreadable.
pub const PLACEHOLDER_PACKAGE_NAME: &str = "packageJsonNotDefined";

const TSCONFIG: &str = "tsconfig.json";
const PACKAGE_JSON: &str = "package.json";

/// Documentation settings after layering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_if_not_main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<PathBuf>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub out: Option<PathBuf>,
    pub external_if_not_main: Option<String>,
    pub examples: Option<PathBuf>,
    /// Entry-point file, replacing `package.json` `main`.
    pub main: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    out_dir: Option<PathBuf>,
    root_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsdocObject {
    out: Option<PathBuf>,
    external_if_not_main: Option<String>,
    examples: Option<PathBuf>,
}

/// `"jsdoc": "docs"` or `"jsdoc": { "out": "docs", ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsdocSection {
    Out(PathBuf),
    Settings(JsdocObject),
}

impl From<JsdocSection> for DocsSettings {
    fn from(section: JsdocSection) -> Self {
        match section {
            JsdocSection::Out(out) => Self {
                out: Some(out),
                ..Self::default()
            },
            JsdocSection::Settings(settings) => Self {
                out: settings.out,
                external_if_not_main: settings.external_if_not_main,
                examples: settings.examples,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    #[serde(default)]
    compiler_options: CompilerOptions,
    files: Option<Vec<PathBuf>>,
    exclude: Option<Vec<String>>,
    jsdoc: Option<JsdocSection>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    name: Option<String>,
    main: Option<String>,
}

/// Fully resolved project configuration. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub project_dir: PathBuf,
    pub package_name: String,
    /// Entry point as written in `package.json` (relative to the project).
    pub main_file: Option<String>,
    /// Compiler output directory.
    pub out_dir: PathBuf,
    pub root_dir: Option<PathBuf>,
    /// Explicit `files` list.
    pub files: Option<Vec<PathBuf>>,
    pub exclude: Vec<String>,
    /// Documentation output directory.
    pub docs_out: PathBuf,
    pub external_if_not_main: Option<String>,
    pub examples: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn load(project_dir: impl AsRef<Path>, overrides: &Overrides) -> Result<Self> {
        let project_dir = project_dir.as_ref().to_path_buf().clean();
        let tsconfig_path = project_dir.join(TSCONFIG);
        if !tsconfig_path.is_file() {
            return Err(ConfigError::NotFound(tsconfig_path));
        }

        let tsconfig = read_tsconfig(&tsconfig_path)?;
        let out_dir = tsconfig
            .compiler_options
            .out_dir
            .ok_or_else(|| ConfigError::MissingOutDir {
                path: tsconfig_path.clone(),
            })?;

        let file_settings: DocsSettings = tsconfig.jsdoc.map(Into::into).unwrap_or_default();
        let docs = layer_settings(file_settings, overrides)?;
        let docs_out = docs.out.ok_or_else(|| ConfigError::MissingDocsOut {
            path: tsconfig_path.clone(),
        })?;

        let package = read_package_json(&project_dir.join(PACKAGE_JSON));
        let package_name = package
            .name
            .unwrap_or_else(|| PLACEHOLDER_PACKAGE_NAME.to_string());
        let main_file = overrides.main.clone().or(package.main);

        let config = Self {
            out_dir: project_dir.join(out_dir).clean(),
            root_dir: tsconfig
                .compiler_options
                .root_dir
                .map(|dir| project_dir.join(dir).clean()),
            files: tsconfig.files,
            exclude: tsconfig.exclude.unwrap_or_default(),
            docs_out: project_dir.join(docs_out).clean(),
            external_if_not_main: docs.external_if_not_main,
            examples: docs.examples.map(|dir| project_dir.join(dir).clean()),
            package_name,
            main_file,
            project_dir,
        };
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Compiler output directory relative to the project, with forward slashes.
    pub fn relative_out_dir(&self) -> String {
        match self.out_dir.strip_prefix(&self.project_dir) {
            Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
            Err(_) => self.out_dir.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Naming inputs for module identifiers.
    pub fn naming(&self) -> ModuleNaming {
        let naming = ModuleNaming::new(self.package_name.clone(), self.relative_out_dir());
        match &self.main_file {
            Some(main) => naming.with_main_file(main.clone()),
            None => naming,
        }
    }
}

/// Merge tsconfig settings, the environment and CLI overrides.
fn layer_settings(file_settings: DocsSettings, overrides: &Overrides) -> Result<DocsSettings> {
    let cli = DocsSettings {
        out: overrides.out.clone(),
        external_if_not_main: overrides.external_if_not_main.clone(),
        examples: overrides.examples.clone(),
    };
    Figment::new()
        .merge(Serialized::defaults(DocsSettings::default()))
        .merge(Serialized::defaults(file_settings))
        .merge(Env::prefixed("TSDOC_").only(&["out", "external_if_not_main", "examples"]))
        .merge(Serialized::defaults(cli))
        .extract()
        .map_err(|e| ConfigError::InvalidValue(e.to_string()))
}

fn read_tsconfig(path: &Path) -> Result<TsConfig> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&jsonc::strip(&content)).map_err(|e| ConfigError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Missing or malformed package metadata is not fatal.
fn read_package_json(path: &Path) -> PackageJson {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            warn!(path = %path.display(), %error, "cannot read package.json, using placeholder name");
            return PackageJson::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(package) => package,
        Err(error) => {
            warn!(path = %path.display(), %error, "invalid package.json, using placeholder name");
            PackageJson::default()
        }
    }
}
