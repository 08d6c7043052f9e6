//! Project convention lint: reconciles the manifest's configuration
//! block, scripts, and dependencies against the registry's canonical
//! tables, and governed template files against their canonical
//! sources.
//!
//! Report-only runs never touch disk. Fix mode applies the merged
//! manifest fields (persisted once, at the run boundary) and rewrites
//! non-matching template files in place.

use crate::core::config::{self, Configuration, Context, DEFAULT_CONFIGURATION_KEY};
use crate::core::diff;
use crate::core::error::KindredError;
use crate::core::files;
use crate::core::kinds::Kind;
use crate::core::manifest::Manifest;
use crate::core::report::{Report, Surface, Violation};
use clap::Args;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct LintCli {
    /// Rewrite the manifest and template files to match the canonical
    /// definitions instead of failing on differences.
    #[clap(long)]
    pub fix: bool,
    /// Root directory holding the canonical `templates/<kind>/` trees
    /// (defaults to $KINDRED_ROOT, then the executable's directory).
    #[clap(long)]
    pub root: Option<PathBuf>,
    /// Manifest key the configuration block lives under.
    #[clap(long, default_value = DEFAULT_CONFIGURATION_KEY)]
    pub config_key: String,
}

pub fn run_lint_cli(cli: LintCli) -> Result<(), KindredError> {
    let ctx = Context::new(cli.root, cli.config_key, cli.fix)?;
    let mut manifest = Manifest::load(&ctx.project_root)?;
    let report = reconcile(&ctx, &mut manifest)?;
    finish(&ctx, &report)
}

/// One full reconciliation pass over every governed surface.
///
/// Ordering: the configuration must resolve before any kind-dependent
/// lookup; the manifest-internal fields come next and are persisted in
/// a single write before the filesystem-touching template step.
pub fn reconcile(ctx: &Context, manifest: &mut Manifest) -> Result<Report, KindredError> {
    let mut report = Report::new();

    let configuration = config::resolve(manifest, &ctx.configuration_key, &mut report)?;

    reconcile_field(ctx, manifest, &configuration, GovernedField::Scripts, &mut report);
    reconcile_field(
        ctx,
        manifest,
        &configuration,
        GovernedField::Dependencies,
        &mut report,
    );

    if ctx.fix && manifest.persist_if_changed()? {
        println!("fixed entries in {}", manifest.path().display());
    }

    reconcile_templates(ctx, &configuration, &mut report)?;

    Ok(report)
}

/// Terminal outcome for a finished report: fix mode always succeeds,
/// report-only fails when anything was flagged.
pub fn finish(ctx: &Context, report: &Report) -> Result<(), KindredError> {
    if report.is_clean() || ctx.fix {
        return Ok(());
    }
    eprintln!("{} finding(s): {}", report.count(), report.summary(4));
    Err(KindredError::FoundErrors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GovernedField {
    Scripts,
    Dependencies,
}

impl GovernedField {
    fn key(self) -> &'static str {
        match self {
            GovernedField::Scripts => "scripts",
            GovernedField::Dependencies => "dependencies",
        }
    }

    fn surface(self) -> Surface {
        match self {
            GovernedField::Scripts => Surface::Scripts,
            GovernedField::Dependencies => Surface::Dependencies,
        }
    }

    fn describes(self) -> &'static str {
        match self {
            GovernedField::Scripts => "script entries",
            GovernedField::Dependencies => "dependency entries",
        }
    }
}

fn canonical_table(
    ctx: &Context,
    kind: Kind,
    field: GovernedField,
) -> &'static [(&'static str, &'static str)] {
    match field {
        GovernedField::Scripts => ctx.registry.scripts_for(kind),
        GovernedField::Dependencies => ctx.registry.dependencies_for(kind),
    }
}

fn surface_ignored(configuration: &Configuration, field: GovernedField) -> bool {
    let ignore = configuration.ignore();
    match field {
        GovernedField::Scripts => ignore.script,
        GovernedField::Dependencies => ignore.dependencies,
    }
}

/// Merged expected map: the manifest's current entries, then each
/// linked kind's table in link order, then the kind's own table.
/// Later entries win; entries absent from every canonical table
/// survive untouched.
fn expected_field(ctx: &Context, current: &Value, kind: Kind, field: GovernedField) -> Value {
    let mut merged = current.as_object().cloned().unwrap_or_default();
    for linked in ctx.registry.links_for(kind) {
        for (key, value) in canonical_table(ctx, *linked, field) {
            merged.insert((*key).to_string(), Value::String((*value).to_string()));
        }
    }
    for (key, value) in canonical_table(ctx, kind, field) {
        merged.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    Value::Object(merged)
}

fn reconcile_field(
    ctx: &Context,
    manifest: &mut Manifest,
    configuration: &Configuration,
    field: GovernedField,
    report: &mut Report,
) {
    if surface_ignored(configuration, field) {
        return;
    }

    let current = Value::Object(manifest.map_field(field.key()));
    let expected = expected_field(ctx, &current, configuration.kind, field);
    if expected == current {
        return;
    }

    report.record(Violation::new(
        field.surface(),
        format!("package.json > {}", field.key()),
        format!(
            "missing or outdated {} found:\n{}",
            field.describes(),
            diff::diff_values(&current, &expected)
        ),
    ));
    if ctx.fix {
        manifest.set(field.key(), expected);
    }
}

/// A canonical source that has claimed a project-relative path.
struct PendingTemplate {
    relative: String,
    source: PathBuf,
}

/// Walk the kind's own template root, then each linked kind's root in
/// link order; the first kind to claim a relative path wins.
fn reconcile_templates(
    ctx: &Context,
    configuration: &Configuration,
    report: &mut Report,
) -> Result<(), KindredError> {
    if configuration.ignore().files || configuration.kind == Kind::Common {
        return Ok(());
    }

    let mut worklist: Vec<Kind> = vec![configuration.kind];
    worklist.extend(ctx.registry.links_for(configuration.kind).iter().copied());

    let mut pending: Vec<PendingTemplate> = Vec::new();
    for kind in worklist {
        let template_root = ctx.registry.template_root_for(kind);
        for source in files::all_files(&template_root)? {
            let relative = relative_path(&template_root, &source);
            if configuration.excludes(&relative) {
                continue;
            }
            if pending.iter().any(|entry| entry.relative == relative) {
                continue;
            }
            pending.push(PendingTemplate { relative, source });
        }
    }

    for entry in pending {
        reconcile_file(ctx, &entry.source, &entry.relative, report)?;
    }
    Ok(())
}

fn relative_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn reconcile_file(
    ctx: &Context,
    source: &Path,
    relative: &str,
    report: &mut Report,
) -> Result<(), KindredError> {
    let target = ctx.project_root.join(relative);
    let canonical = fs::read_to_string(source)?;
    let current = if target.exists() {
        Some(fs::read_to_string(&target)?)
    } else {
        None
    };

    let detail = match &current {
        Some(content) if *content == canonical => return Ok(()),
        Some(content) => diff::diff_lines(content, &canonical),
        None => "file not found".to_string(),
    };
    report.record(Violation::new(Surface::Template, relative, detail));

    if ctx.fix {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &canonical)?;
        println!("Writing {} ({})", relative, content_digest(&canonical));
    }
    Ok(())
}

/// Short content hash for write logs.
fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kinds::Registry;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn test_context(project_root: &Path, canon_root: &Path, fix: bool) -> Context {
        Context {
            project_root: project_root.to_path_buf(),
            registry: Registry::new(canon_root.to_path_buf()),
            configuration_key: DEFAULT_CONFIGURATION_KEY.to_string(),
            fix,
        }
    }

    fn write_template(canon_root: &Path, kind: &str, relative: &str, content: &str) {
        let path = canon_root.join("templates").join(kind).join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn own_kind_entries_override_linked_entries() {
        let tmp = tempdir().unwrap();
        let ctx = test_context(tmp.path(), tmp.path(), false);

        let merged = expected_field(&ctx, &json!({}), Kind::Cli, GovernedField::Scripts);
        assert_eq!(merged["check:types"], "yarn ttsc -p tsconfig.lint.json");
        // Entries the cli table does not override come from common.
        assert_eq!(merged["build"], "yarn ttsc -p tsconfig.dist.json");
    }

    #[test]
    fn custom_entries_survive_the_merge() {
        let tmp = tempdir().unwrap();
        let ctx = test_context(tmp.path(), tmp.path(), false);

        let merged = expected_field(
            &ctx,
            &json!({"foo": "custom"}),
            Kind::Library,
            GovernedField::Scripts,
        );
        assert_eq!(merged["foo"], "custom");
    }

    #[test]
    fn linked_dependencies_reach_the_merged_map() {
        let tmp = tempdir().unwrap();
        let ctx = test_context(tmp.path(), tmp.path(), false);

        let merged = expected_field(&ctx, &json!({}), Kind::Library, GovernedField::Dependencies);
        assert_eq!(merged["tslib"], "^1.10.0");
    }

    #[test]
    fn first_kind_to_claim_a_template_path_wins() {
        let project = tempdir().unwrap();
        let canon = tempdir().unwrap();
        write_template(canon.path(), "library", "README.md", "from library\n");
        write_template(canon.path(), "common", "README.md", "from common\n");
        write_template(canon.path(), "common", "tsconfig.json", "{}\n");

        let ctx = test_context(project.path(), canon.path(), true);
        let configuration = Configuration {
            kind: Kind::Library,
            template: None,
        };
        let mut report = Report::new();
        reconcile_templates(&ctx, &configuration, &mut report).unwrap();

        assert_eq!(
            fs::read_to_string(project.path().join("README.md")).unwrap(),
            "from library\n"
        );
        assert_eq!(
            fs::read_to_string(project.path().join("tsconfig.json")).unwrap(),
            "{}\n"
        );
    }

    #[test]
    fn excluded_paths_are_never_reconciled() {
        let project = tempdir().unwrap();
        let canon = tempdir().unwrap();
        write_template(canon.path(), "library", "README.md", "canonical\n");

        let ctx = test_context(project.path(), canon.path(), false);
        let configuration: Configuration = serde_json::from_value(json!({
            "type": "library",
            "template": {"exclude": ["README.md"]}
        }))
        .unwrap();
        let mut report = Report::new();
        reconcile_templates(&ctx, &configuration, &mut report).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn common_kind_has_no_template_surface() {
        let project = tempdir().unwrap();
        let canon = tempdir().unwrap();
        write_template(canon.path(), "common", "README.md", "canonical\n");

        let ctx = test_context(project.path(), canon.path(), false);
        let configuration = Configuration {
            kind: Kind::Common,
            template: None,
        };
        let mut report = Report::new();
        reconcile_templates(&ctx, &configuration, &mut report).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn report_mode_flags_a_stale_field_without_mutating_the_manifest() {
        let project = tempdir().unwrap();
        fs::write(
            project.path().join("package.json"),
            "{\"npm-defaults\":{\"type\":\"library\"},\"scripts\":{\"build\":\"old\"}}",
        )
        .unwrap();
        let canon = tempdir().unwrap();
        let ctx = test_context(project.path(), canon.path(), false);
        let mut manifest = Manifest::load(project.path()).unwrap();

        let report = reconcile(&ctx, &mut manifest).unwrap();
        assert!(!report.is_clean());
        assert_eq!(
            manifest.map_field("scripts")["build"],
            "old",
            "report-only reconciliation must not rewrite the field"
        );
    }
}
