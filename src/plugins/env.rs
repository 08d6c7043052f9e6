//! Environment provisioning: global tooling governed projects expect.
//!
//! Version matching is a literal pass-through comparison against what
//! `npm -g ls` reports; there is no range resolution here.

use crate::core::error::KindredError;
use clap::Args;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::process::Command;

/// Global tooling and the versions governed projects are built
/// against.
const GLOBAL_DEPENDENCIES: &[(&str, &str)] = &[("yarn", "1.22.22"), ("typescript", "3.9.10")];

#[derive(Args, Debug)]
pub struct EnvCli {
    /// Install the global environment.
    #[clap(long)]
    pub install: bool,
    /// Reinstall every package even when a matching version is
    /// already present.
    #[clap(long)]
    pub update: bool,
}

pub fn run_env_cli(cli: EnvCli) -> Result<(), KindredError> {
    if !cli.install {
        println!("Nothing to do (pass --install to provision the environment)");
        return Ok(());
    }
    install_globals(cli.update)
}

pub fn install_globals(update: bool) -> Result<(), KindredError> {
    // --update pretends nothing is installed.
    let installed = if update {
        HashMap::new()
    } else {
        installed_versions()
    };

    let wanted = missing_specs(&installed);
    if wanted.is_empty() {
        println!("Global environment is up to date");
        return Ok(());
    }

    println!("Installing: {}", wanted.join(" "));
    let status = Command::new("npm")
        .arg("install")
        .arg("-g")
        .args(&wanted)
        .status()?;
    if !status.success() {
        return Err(KindredError::CommandError(
            "npm install -g failed".to_string(),
        ));
    }
    Ok(())
}

/// Versions already installed globally, from `npm -g -j ls`. npm may
/// exit non-zero over unrelated peer-dependency complaints while still
/// printing usable JSON, so the output is parsed either way.
fn installed_versions() -> HashMap<String, String> {
    let output = match Command::new("npm").args(["-g", "-j", "ls"]).output() {
        Ok(output) => output,
        Err(_) => return HashMap::new(),
    };
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: Value = match serde_json::from_str(&stdout) {
        Ok(parsed) => parsed,
        Err(_) => return HashMap::new(),
    };

    let mut versions = HashMap::new();
    if let Some(dependencies) = parsed.get("dependencies").and_then(Value::as_object) {
        for (name, entry) in dependencies {
            if let Some(version) = entry.get("version").and_then(Value::as_str) {
                versions.insert(name.clone(), version.to_string());
            }
        }
    }
    versions
}

/// `name@version` specs from the global table that are not already
/// present at their pinned version.
fn missing_specs(installed: &HashMap<String, String>) -> Vec<String> {
    let spec_pattern = Regex::new(r"^(@?[^@]+)(?:@(.+))?$").expect("valid spec regex");
    GLOBAL_DEPENDENCIES
        .iter()
        .map(|(name, version)| format!("{}@{}", name, version))
        .filter(|spec| {
            let Some(caps) = spec_pattern.captures(spec) else {
                return true;
            };
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let required = caps.get(2).map(|m| m.as_str());
            match (required, installed.get(name)) {
                (Some(required), Some(present)) => {
                    present.as_str() != required.trim_start_matches(['^', '~', '='])
                }
                _ => true,
            }
        })
        .collect()
}
