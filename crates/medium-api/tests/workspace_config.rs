//! Repository configuration checks: workspace versioning and the CI
//! workflow that runs this test suite.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn workflow() -> serde_yaml::Value {
    let text =
        std::fs::read_to_string(workspace_root().join(".github/workflows/tests.yml")).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

#[test]
fn all_crates_use_workspace_version() {
    for krate in ["crates/medium-api", "crates/medium-cli"] {
        let manifest = std::fs::read_to_string(workspace_root().join(krate).join("Cargo.toml"))
            .unwrap();
        let doc: toml::Value = manifest.parse().unwrap();
        let uses_workspace = doc["package"]["version"]
            .as_table()
            .and_then(|t| t.get("workspace"))
            .and_then(|v| v.as_bool());
        assert_eq!(
            uses_workspace,
            Some(true),
            "{krate} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let root = std::fs::read_to_string(workspace_root().join("Cargo.toml")).unwrap();
    let doc: toml::Value = root.parse().unwrap();
    assert_eq!(
        doc["workspace"]["package"]["version"].as_str().unwrap(),
        env!("CARGO_PKG_VERSION")
    );
    assert!(medium_api::USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
}

#[test]
fn workflow_matrix_is_two_os_by_four_toolchains() {
    let wf = workflow();
    let matrix = &wf["jobs"]["test"]["strategy"]["matrix"];
    let os = matrix["os"].as_sequence().unwrap();
    let toolchains = matrix["toolchain"].as_sequence().unwrap();

    assert_eq!(os.len(), 2);
    assert!(os.iter().any(|v| v.as_str().unwrap().starts_with("ubuntu")));
    assert!(os.iter().any(|v| v.as_str().unwrap().starts_with("windows")));
    assert_eq!(toolchains.len(), 4);
    assert_eq!(os.len() * toolchains.len(), 8);
}

#[test]
fn pinned_toolchain_matches_rust_version() {
    let root = std::fs::read_to_string(workspace_root().join("Cargo.toml")).unwrap();
    let doc: toml::Value = root.parse().unwrap();
    let msrv = doc["workspace"]["package"]["rust-version"].as_str().unwrap();

    let wf = workflow();
    let pinned: Vec<&str> = wf["jobs"]["test"]["strategy"]["matrix"]["toolchain"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|t| t.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(pinned, [msrv]);

    for krate in ["crates/medium-api", "crates/medium-cli"] {
        let manifest = std::fs::read_to_string(workspace_root().join(krate).join("Cargo.toml"))
            .unwrap();
        let doc: toml::Value = manifest.parse().unwrap();
        assert_eq!(
            doc["package"]["rust-version"]["workspace"].as_bool(),
            Some(true),
            "{krate} should use rust-version.workspace = true"
        );
    }
}

#[test]
fn workflow_triggers_on_source_paths_and_daily_schedule() {
    let wf = workflow();
    let on = &wf["on"];

    let paths: Vec<&str> = on["push"]["paths"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(paths.contains(&"src/**"));
    assert!(paths.contains(&"tests/**"));

    let cron = on["schedule"][0]["cron"].as_str().unwrap();
    assert_eq!(cron, "30 2 * * *");
}

#[test]
fn api_key_secret_only_reaches_test_step() {
    let wf = workflow();
    let steps = wf["jobs"]["test"]["steps"].as_sequence().unwrap();

    let with_key: Vec<&serde_yaml::Value> = steps
        .iter()
        .filter(|s| s.get("env").and_then(|e| e.get("RAPIDAPI_KEY")).is_some())
        .collect();

    assert_eq!(with_key.len(), 1);
    assert!(with_key[0]["run"].as_str().unwrap().contains("cargo test"));
    assert!(wf.get("env").is_none());
    assert!(wf["jobs"]["test"].get("env").is_none());
}
