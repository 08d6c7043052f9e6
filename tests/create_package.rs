use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run_kindred(dir: &Path, args: &[&str]) -> std::process::Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_kindred"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run kindred")
}

#[test]
fn create_seeds_the_manifest_and_reconciles_it() {
    let project = tempdir().expect("tempdir");
    let canon = tempdir().expect("tempdir");
    let template = canon.path().join("templates/library");
    fs::create_dir_all(&template).unwrap();
    fs::write(template.join("README.md"), "# New package\n").unwrap();
    let root = canon.path().to_str().unwrap().to_string();

    let out = run_kindred(
        project.path(),
        &["create", "library", "--name", "demo", "--root", &root],
    );
    assert!(
        out.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(project.path().join("package.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["name"], "demo");
    assert_eq!(manifest["version"], "0.1.0");
    assert_eq!(manifest["npm-defaults"]["type"], "library");
    assert_eq!(
        manifest["scripts"]["build"],
        "yarn ttsc -p tsconfig.dist.json"
    );
    assert_eq!(manifest["dependencies"]["tslib"], "^1.10.0");
    assert_eq!(
        fs::read_to_string(project.path().join("README.md")).unwrap(),
        "# New package\n"
    );

    let check = run_kindred(project.path(), &["lint", "--root", &root]);
    assert!(
        check.status.success(),
        "a freshly created package should lint clean: {}",
        String::from_utf8_lossy(&check.stderr)
    );
}

#[test]
fn create_refuses_to_overwrite_an_existing_manifest() {
    let project = tempdir().expect("tempdir");
    let canon = tempdir().expect("tempdir");
    fs::write(project.path().join("package.json"), "{\"name\":\"keep\"}").unwrap();

    let out = run_kindred(
        project.path(),
        &["create", "library", "--root", canon.path().to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Refusing to overwrite"));
    assert_eq!(
        fs::read_to_string(project.path().join("package.json")).unwrap(),
        "{\"name\":\"keep\"}"
    );
}

#[test]
fn create_rejects_unknown_kinds() {
    let project = tempdir().expect("tempdir");
    let canon = tempdir().expect("tempdir");

    let out = run_kindred(
        project.path(),
        &["create", "widget", "--root", canon.path().to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown package kind"));
    assert!(!project.path().join("package.json").exists());
}
