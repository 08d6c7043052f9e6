//! Governed configuration block and the per-run context.
//!
//! The block lives in the manifest under a configurable key (default
//! `"npm-defaults"`) and names the project's kind plus optional
//! template exclusions and per-surface ignore switches. Resolution
//! always yields a configuration: an absent block is replaced by the
//! library default so every later kind-dependent lookup has something
//! to work with.

use crate::core::diff;
use crate::core::error::KindredError;
use crate::core::kinds::{Kind, Registry};
use crate::core::manifest::Manifest;
use crate::core::report::{Report, Surface, Violation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Manifest key the configuration block lives under by default.
pub const DEFAULT_CONFIGURATION_KEY: &str = "npm-defaults";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreOptions {
    #[serde(default, skip_serializing_if = "is_false")]
    pub files: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dependencies: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dev_dependencies: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub script: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub package_definition: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Project-relative paths never reconciled against templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<IgnoreOptions>,
}

/// The governed block: `{ "type": ..., "template"?: ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateOptions>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            kind: Kind::Library,
            template: None,
        }
    }
}

impl Configuration {
    pub fn ignore(&self) -> IgnoreOptions {
        self.template
            .as_ref()
            .and_then(|t| t.ignore.clone())
            .unwrap_or_default()
    }

    pub fn excludes(&self, relative: &str) -> bool {
        self.template
            .as_ref()
            .is_some_and(|t| t.exclude.iter().any(|entry| entry == relative))
    }
}

/// Resolve the configuration block, injecting the library default when
/// the block is absent.
///
/// Default-injection happens in every mode: later reconciliation steps
/// need a resolved kind even in report-only runs. Persistence stays
/// gated on fix mode at the run boundary, so a report-only run never
/// writes the injected block to disk.
pub fn resolve(
    manifest: &mut Manifest,
    key: &str,
    report: &mut Report,
) -> Result<Configuration, KindredError> {
    let before = manifest
        .get(key)
        .cloned()
        .unwrap_or(Value::Object(Map::new()));

    if manifest.get(key).is_none() {
        manifest.set(key, serde_json::to_value(Configuration::default())?);
    }

    let block = manifest.get(key).cloned().unwrap_or(Value::Null);
    let configuration = match serde_json::from_value::<Configuration>(block) {
        Ok(configuration) => configuration,
        Err(err) => {
            // The block exists but names no valid kind; fall back so a
            // kind always resolves, and let fix mode rewrite it.
            let fallback = Configuration::default();
            manifest.set(key, serde_json::to_value(&fallback)?);
            report.record(Violation::new(
                Surface::Configuration,
                format!("package.json > {}", key),
                format!("invalid configuration ({})", err),
            ));
            return Ok(fallback);
        }
    };

    let after = manifest.get(key).cloned().unwrap_or(Value::Null);
    if serde_json::to_string(&before)? != serde_json::to_string(&after)? {
        report.record(Violation::new(
            Surface::Configuration,
            format!("package.json > {}", key),
            format!(
                "missing or outdated configuration:\n{}",
                diff::diff_values(&before, &after)
            ),
        ));
    }
    Ok(configuration)
}

/// Everything one reconciliation run needs, passed explicitly into
/// every step.
pub struct Context {
    pub project_root: PathBuf,
    pub registry: Registry,
    pub configuration_key: String,
    pub fix: bool,
}

impl Context {
    pub fn new(
        explicit_root: Option<PathBuf>,
        configuration_key: String,
        fix: bool,
    ) -> Result<Self, KindredError> {
        let project_root = std::env::current_dir()?;
        let registry = Registry::new(Registry::resolve_root(explicit_root)?);
        Ok(Context {
            project_root,
            registry,
            configuration_key,
            fix,
        })
    }
}
