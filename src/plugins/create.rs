//! Package scaffolding: seed a manifest for a kind, then let one
//! fix-mode reconciliation pull in the canonical scripts,
//! dependencies, and template files.

use crate::core::config::{Configuration, Context, DEFAULT_CONFIGURATION_KEY};
use crate::core::error::KindredError;
use crate::core::kinds::Kind;
use crate::core::manifest::{Manifest, MANIFEST_FILE};
use crate::plugins::lint;
use clap::Args;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CreateCli {
    /// Package kind to create: common, library, or cli.
    pub kind: String,
    /// Package name (defaults to the directory name).
    #[clap(long)]
    pub name: Option<String>,
    /// Root directory holding the canonical `templates/<kind>/` trees.
    #[clap(long)]
    pub root: Option<PathBuf>,
    /// Manifest key the configuration block lives under.
    #[clap(long, default_value = DEFAULT_CONFIGURATION_KEY)]
    pub config_key: String,
}

pub fn run_create_cli(cli: CreateCli) -> Result<(), KindredError> {
    let kind: Kind = cli.kind.parse()?;
    let ctx = Context::new(cli.root, cli.config_key, true)?;

    let manifest_path = ctx.project_root.join(MANIFEST_FILE);
    if manifest_path.exists() {
        return Err(KindredError::ValidationError(format!(
            "Refusing to overwrite existing {}",
            manifest_path.display()
        )));
    }

    let name = match cli.name {
        Some(name) => name,
        None => ctx
            .project_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("package")
            .to_string(),
    };

    let configuration = Configuration {
        kind,
        template: None,
    };
    let mut seed = Map::new();
    seed.insert("name".to_string(), Value::String(name.clone()));
    seed.insert("version".to_string(), Value::String("0.1.0".to_string()));
    seed.insert(
        ctx.configuration_key.clone(),
        serde_json::to_value(&configuration)?,
    );
    fs::write(
        &manifest_path,
        format!("{}\n", serde_json::to_string_pretty(&Value::Object(seed))?),
    )?;

    let mut manifest = Manifest::load(&ctx.project_root)?;
    let report = lint::reconcile(&ctx, &mut manifest)?;
    lint::finish(&ctx, &report)?;

    use colored::Colorize;
    println!(
        "{} Created {} package '{}' in {}",
        "✓".bright_green(),
        kind,
        name,
        ctx.project_root.display()
    );
    Ok(())
}
