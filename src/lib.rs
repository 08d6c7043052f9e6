//! kindred: template-driven conventions for families of npm packages.
//!
//! A project declares its kind (`common`, `library`, `cli`) in a
//! configuration block inside `package.json`. kindred verifies that
//! the manifest's scripts and dependencies match the canonical tables
//! for that kind (and the kinds it links to), and that the governed
//! template files on disk match their canonical sources.
//!
//! # Commands
//!
//! - `kindred lint` reports drift and exits non-zero; `kindred lint
//!   --fix` repairs the manifest and template files in place.
//! - `kindred ci` verifies, then runs the package
//!   install/lint/build/test pipeline.
//! - `kindred env --install` provisions global tooling.
//! - `kindred create <kind>` scaffolds a new package and reconciles it
//!   into canonical shape.
//!
//! # Behavior contract
//!
//! - Report-only runs never write to disk; they must be re-run with
//!   `--fix` to converge.
//! - Fix-mode runs are self-healing and idempotent: a second fixed run
//!   (or a report-only run immediately after) finds zero violations.
//! - Entries the canonical tables do not govern survive untouched.

pub mod core;
pub mod plugins;

use crate::core::error::KindredError;
use crate::plugins::{ci, create, env, lint};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    name = "kindred",
    version = env!("CARGO_PKG_VERSION"),
    about = "Keeps package manifests and template files aligned with their declared kind"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the project against its kind's conventions
    Lint(lint::LintCli),
    /// Verify the project, then run the package install/lint/build/test pipeline
    Ci(ci::CiCli),
    /// Provision global tooling for the environment
    Env(env::EnvCli),
    /// Create a new package of the given kind in the current directory
    Create(create::CreateCli),
}

pub fn run() -> Result<(), KindredError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Lint(args) => lint::run_lint_cli(args),
        Command::Ci(args) => ci::run_ci_cli(args),
        Command::Env(args) => env::run_env_cli(args),
        Command::Create(args) => create::run_create_cli(args),
    }
}
