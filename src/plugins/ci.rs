//! CI surface: verify the project, then run the package pipeline.
//!
//! The in-process reconciliation runs first in report-only mode, so a
//! drifted project fails before any package command is spawned. The
//! pipeline itself is plain `yarn <script>` invocations with inherited
//! stdio; kindred only surfaces the exit codes.

use crate::core::config::{Context, DEFAULT_CONFIGURATION_KEY};
use crate::core::error::KindredError;
use crate::core::manifest::Manifest;
use crate::plugins::lint;
use clap::Args;
use std::path::PathBuf;
use std::process::Command;

/// Pipeline steps, in order. `install` runs first so the later steps
/// have their tooling present.
const PIPELINE: &[&str] = &["install", "lint", "build", "test"];

#[derive(Args, Debug)]
pub struct CiCli {
    /// Root directory holding the canonical `templates/<kind>/` trees.
    #[clap(long)]
    pub root: Option<PathBuf>,
    /// Manifest key the configuration block lives under.
    #[clap(long, default_value = DEFAULT_CONFIGURATION_KEY)]
    pub config_key: String,
}

pub fn run_ci_cli(cli: CiCli) -> Result<(), KindredError> {
    let ctx = Context::new(cli.root, cli.config_key, false)?;
    let mut manifest = Manifest::load(&ctx.project_root)?;
    let report = lint::reconcile(&ctx, &mut manifest)?;
    lint::finish(&ctx, &report)?;

    for step in PIPELINE {
        run_package_script(&ctx, step)?;
    }
    Ok(())
}

/// Run one `yarn <script>` with inherited stdio, surfacing the exit
/// code to the caller.
fn run_package_script(ctx: &Context, script: &str) -> Result<(), KindredError> {
    println!("Running: yarn {}", script);
    let status = Command::new("yarn")
        .arg(script)
        .current_dir(&ctx.project_root)
        .status()?;
    println!("Exited with code {}", status.code().unwrap_or(-1));
    if !status.success() {
        return Err(KindredError::CommandError(format!(
            "yarn {} failed",
            script
        )));
    }
    Ok(())
}
