//! Static kind registry: which scripts, dependencies, links, and
//! template roots govern each package kind.
//!
//! Kinds form a small inheritance graph through `links`: a kind first
//! receives every linked kind's governed entries (in link order), then
//! layers its own entries on top. The tables are defined once at
//! startup and never change; a kind absent from a table reads as
//! empty, never as an error.

use crate::core::error::KindredError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of package archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Shared base every other kind links to. Has no template surface
    /// of its own to reconcile against.
    Common,
    Library,
    Cli,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Common => "common",
            Kind::Library => "library",
            Kind::Cli => "cli",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = KindredError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Kind::Common),
            "library" => Ok(Kind::Library),
            "cli" => Ok(Kind::Cli),
            other => Err(KindredError::NotFound(format!(
                "unknown package kind '{}' (expected common, library, or cli)",
                other
            ))),
        }
    }
}

const COMMON_SCRIPTS: &[(&str, &str)] = &[
    ("build", "yarn ttsc -p tsconfig.dist.json"),
    ("check:types", "yarn ttsc -p tsconfig.json"),
    ("check:project", "yarn kindred lint"),
    (
        "test",
        "concurrently \"yarn check:types\" \"yarn jest test --maxWorkers=1\"",
    ),
    ("fix", "yarn lint --fix"),
    (
        "lint",
        "eslint \"{src,test,typing}/**/*.{ts,js}\" --ignore-pattern **/node_modules/*",
    ),
    (
        "format",
        "prettier \"{src/*,test/*,typing/*,templates/*,}*/*.{ts,js,json}\" --write",
    ),
    ("package", "rm -rf dist && yarn build"),
    ("release", "yarn semantic-release"),
    ("release:dry", "yarn release --dry-run"),
];

// Entries here override the linked common table for the same key.
const CLI_SCRIPTS: &[(&str, &str)] = &[
    ("check:types", "yarn ttsc -p tsconfig.lint.json"),
    ("prepack", "yarn oclif-dev manifest && yarn oclif-dev readme"),
    ("postpack", "rm -f oclif.manifest.json"),
];

const COMMON_DEPENDENCIES: &[(&str, &str)] = &[("tslib", "^1.10.0")];

const LIBRARY_LINKS: &[Kind] = &[Kind::Common];
const CLI_LINKS: &[Kind] = &[Kind::Common];

/// Immutable lookup table over the per-kind rules, bound to the root
/// directory the canonical template trees live under.
pub struct Registry {
    root: PathBuf,
}

impl Registry {
    pub fn new(root: PathBuf) -> Self {
        Registry { root }
    }

    /// Canonical template root: an explicit `--root` wins, then the
    /// `KINDRED_ROOT` environment variable, then the directory of the
    /// running executable.
    pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf, KindredError> {
        if let Some(dir) = explicit {
            return Ok(dir);
        }
        if let Ok(dir) = std::env::var("KINDRED_ROOT") {
            return Ok(PathBuf::from(dir));
        }
        let exe = std::env::current_exe()?;
        Ok(exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn scripts_for(&self, kind: Kind) -> &'static [(&'static str, &'static str)] {
        match kind {
            Kind::Common => COMMON_SCRIPTS,
            Kind::Library => &[],
            Kind::Cli => CLI_SCRIPTS,
        }
    }

    pub fn dependencies_for(&self, kind: Kind) -> &'static [(&'static str, &'static str)] {
        match kind {
            Kind::Common => COMMON_DEPENDENCIES,
            Kind::Library | Kind::Cli => &[],
        }
    }

    pub fn links_for(&self, kind: Kind) -> &'static [Kind] {
        match kind {
            Kind::Common => &[],
            Kind::Library => LIBRARY_LINKS,
            Kind::Cli => CLI_LINKS,
        }
    }

    /// `<root>/templates/<kind>/`; every file below it maps 1:1 by
    /// relative path into the target project.
    pub fn template_root_for(&self, kind: Kind) -> PathBuf {
        self.root.join("templates").join(kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_manifest_identifiers() {
        assert_eq!("library".parse::<Kind>().unwrap(), Kind::Library);
        assert_eq!("cli".parse::<Kind>().unwrap(), Kind::Cli);
        assert_eq!("common".parse::<Kind>().unwrap(), Kind::Common);
        assert!("oclif".parse::<Kind>().is_err());
    }

    #[test]
    fn kind_serializes_as_lowercase_identifier() {
        let value = serde_json::to_value(Kind::Library).unwrap();
        assert_eq!(value, serde_json::json!("library"));
    }

    #[test]
    fn absent_table_entries_read_as_empty() {
        let registry = Registry::new(PathBuf::from("/canon"));
        assert!(registry.scripts_for(Kind::Library).is_empty());
        assert!(registry.dependencies_for(Kind::Cli).is_empty());
        assert!(registry.links_for(Kind::Common).is_empty());
    }

    #[test]
    fn cli_overrides_the_common_type_check() {
        let registry = Registry::new(PathBuf::from("/canon"));
        let common = registry
            .scripts_for(Kind::Common)
            .iter()
            .find(|(key, _)| *key == "check:types")
            .unwrap();
        let cli = registry
            .scripts_for(Kind::Cli)
            .iter()
            .find(|(key, _)| *key == "check:types")
            .unwrap();
        assert_ne!(common.1, cli.1);
    }

    #[test]
    fn template_roots_nest_under_the_kind_name() {
        let registry = Registry::new(PathBuf::from("/canon"));
        assert_eq!(
            registry.template_root_for(Kind::Cli),
            PathBuf::from("/canon/templates/cli")
        );
    }
}
