//! End-to-end tests driving the discovery, tree-assembly, invocation, and
//! verify machinery against real (scripted) asset executables.

#![cfg(unix)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use distgo::asset::{AssetRegistry, AssetType};
use distgo::config::{ProductDisterConfigs, ProductOutputInfos};
use distgo::invoke::{invoke, TaskInvocation};
use distgo::tree::TaskCommandTree;
use distgo::verify;

fn fake_asset(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// An asset that reports a type and, optionally, a task catalog.
fn catalog_asset(dir: &Path, name: &str, asset_type: &str, catalog_json: Option<&str>) -> PathBuf {
    let catalog_case = match catalog_json {
        Some(json) => format!("task-infos) cat <<'EOF'\n{}\nEOF\n;;", json),
        None => "task-infos) exit 1 ;;".to_string(),
    };
    let body = format!(
        r#"case "$1" in
asset-type) echo '"{asset_type}"' ;;
{catalog_case}
*) exit 1 ;;
esac"#,
    );
    fake_asset(dir, name, &body)
}

fn lint_catalog(asset_name: &str) -> String {
    format!(
        r#"{{
  "asset-name": "{asset_name}",
  "task-infos": {{
    "lint": {{
      "name": "lint",
      "description": "Lint product sources",
      "command": ["lint"],
      "registerAsTopLevelDistgoTaskCommand": true,
      "verifyOptions": {{
        "applyTrueArgs": ["--apply"],
        "applyFalseArgs": ["--verify"]
      }}
    }}
  }}
}}"#,
    )
}

#[test]
fn load_records_types_and_tolerates_catalog_opt_out() {
    let dir = tempfile::tempdir().unwrap();
    let dister = catalog_asset(dir.path(), "dister-asset", "dister", Some(&lint_catalog("fmt")));
    let quiet = catalog_asset(dir.path(), "quiet-publisher", "publisher", None);

    let registry = AssetRegistry::load(&[quiet.clone(), dister.clone()]).unwrap();

    assert_eq!(registry.paths_for_type(AssetType::Dister), vec![&dister]);
    assert_eq!(registry.paths_for_type(AssetType::Publisher), vec![&quiet]);

    // The opted-out asset is recorded under its type but contributes no
    // subcommands.
    let cataloged = registry.assets_with_catalogs();
    assert_eq!(cataloged.len(), 1);
    assert_eq!(cataloged[0].catalog.as_ref().unwrap().asset_name, "fmt");

    let tree = TaskCommandTree::build(&registry, &[]).unwrap();
    assert_eq!(tree.alias_names(), vec!["lint"]);
}

#[test]
fn load_fails_entirely_on_unknown_asset_type() {
    let dir = tempfile::tempdir().unwrap();
    let good = catalog_asset(dir.path(), "good", "dister", None);
    let bad = fake_asset(dir.path(), "bad", r#"echo '"mangler"'"#);

    let err = AssetRegistry::load(&[good, bad]).unwrap_err();
    assert_eq!(err.code, distgo::ErrorCode::AssetTypeInvalid);
    assert!(err.details["assetPath"].as_str().unwrap().ends_with("bad"));
}

#[test]
fn load_fails_on_malformed_catalog_with_zero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let asset = catalog_asset(dir.path(), "garbled", "dister", Some("this is not json"));

    let err = AssetRegistry::load(&[asset]).unwrap_err();
    assert_eq!(err.code, distgo::ErrorCode::CatalogMalformed);
}

#[test]
fn alias_and_qualified_command_invoke_the_asset_with_both_flags() {
    let dir = tempfile::tempdir().unwrap();
    let argv_log = dir.path().join("argv.log");

    let catalog = lint_catalog("fmt");
    let body = format!(
        r#"case "$1" in
asset-type) echo '"dister"' ;;
task-infos) cat <<'EOF'
{catalog}
EOF
;;
lint) shift; echo "lint $@" >> {log} ;;
*) exit 1 ;;
esac"#,
        log = argv_log.display(),
    );
    let asset = fake_asset(dir.path(), "fmt-asset", &body);

    let registry = AssetRegistry::load(&[asset.clone()]).unwrap();
    let tree = TaskCommandTree::build(&registry, &["verify".to_string()]).unwrap();

    let root = clap::Command::new("distgo").subcommand(clap::Command::new("verify"));
    for argv in [
        vec!["distgo", "lint"],
        vec!["distgo", "dister", "fmt", "lint"],
    ] {
        let matches = tree.attach(root.clone()).get_matches_from(argv);
        let (task_command, forwarded) = tree.resolve(&matches).unwrap();
        assert_eq!(task_command.asset_path, asset);

        invoke(&TaskInvocation {
            asset_path: &task_command.asset_path,
            command: &task_command.task.command,
            dister_configs: &ProductDisterConfigs::new(),
            output_infos: &ProductOutputInfos::new(),
            forwarded_args: &forwarded,
        })
        .unwrap();
    }

    let log = std::fs::read_to_string(&argv_log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!(line.starts_with("lint --config="));
        assert!(line.contains("--output-info="));
    }
}

#[test]
fn verify_attempts_every_task_and_filters_configs_per_asset() {
    let dir = tempfile::tempdir().unwrap();

    // Each asset copies the config file it was handed, so the test can
    // check the per-asset filtering, and "broken" fails its verify run.
    let mut assets = Vec::new();
    for (file_name, asset_name, fails) in [
        ("alpha", "alpha", false),
        ("broken", "broken", true),
        ("omega", "omega", false),
    ] {
        let catalog = lint_catalog(asset_name);
        let fail_line = if fails {
            "echo 'verify failed for broken' >&2; exit 1"
        } else {
            "exit 0"
        };
        let body = format!(
            r#"case "$1" in
asset-type) echo '"dister"' ;;
task-infos) cat <<'EOF'
{catalog}
EOF
;;
lint)
  shift
  for arg in "$@"; do
    case "$arg" in
      --config=*) cp "${{arg#--config=}}" {copy} ;;
    esac
  done
  {fail_line}
  ;;
*) exit 1 ;;
esac"#,
            copy = dir.path().join(format!("{}-config.yml", asset_name)).display(),
        );
        assets.push(fake_asset(dir.path(), file_name, &body));
    }

    let registry = AssetRegistry::load(&assets).unwrap();
    let tasks = verify::verify_tasks(&registry);
    assert_eq!(tasks.len(), 3);

    // alpha owns one dist, omega owns one, broken owns none.
    let mut configs = ProductDisterConfigs::new();
    let mut dists = BTreeMap::new();
    for owner in ["alpha", "omega"] {
        dists.insert(
            format!("{}-dist", owner),
            distgo::config::DisterRecord {
                dister_name: owner.to_string(),
                config: serde_yml::Value::Null,
            },
        );
    }
    configs.insert("my-app".to_string(), dists);

    let mut stderr = Vec::new();
    let err = verify::run(
        &tasks,
        false,
        || Ok((configs, ProductOutputInfos::new())),
        &mut stderr,
    )
    .unwrap_err();

    // Exactly one aggregate failure; the aggregator itself printed nothing
    // because the asset already self-reported on the shared stderr.
    assert!(err.is_silent());
    assert!(stderr.is_empty());

    for asset_name in ["alpha", "broken", "omega"] {
        let copied = std::fs::read(dir.path().join(format!("{}-config.yml", asset_name))).unwrap();
        let seen = distgo::config::dister_configs_from_bytes(&copied).unwrap();
        if asset_name == "broken" {
            assert!(seen.is_empty(), "broken owns no dists");
        } else {
            assert_eq!(seen["my-app"].len(), 1);
            assert!(seen["my-app"].contains_key(&format!("{}-dist", asset_name)));
        }
    }
}
