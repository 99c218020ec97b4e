use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn slipway(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slipway").unwrap();
    cmd.current_dir(dir.path()).env("SLIPWAY_ROOT", dir.path());
    cmd
}

fn releases_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        std::fs::create_dir(dir.path().join(name)).unwrap();
    }
    dir
}

const THREE: &[&str] = &["20230101_000000", "20230102_000000", "20230103_000000"];

// ---------------------------------------------------------------------------
// slipway init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();
    slipway(&dir).arg("init").assert().success();

    let config = dir.path().join("slipway.yaml");
    assert!(config.exists());
    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("project:"));
    assert!(content.contains("retain_releases: 10"));
}

#[test]
fn init_never_overwrites() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("slipway.yaml"), "project: keepme\n").unwrap();
    slipway(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    let content = std::fs::read_to_string(dir.path().join("slipway.yaml")).unwrap();
    assert_eq!(content, "project: keepme\n");
}

// ---------------------------------------------------------------------------
// slipway config validate
// ---------------------------------------------------------------------------

#[test]
fn config_validate_warns_on_fresh_config() {
    let dir = TempDir::new().unwrap();
    slipway(&dir).arg("init").assert().success();
    slipway(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"));
}

#[test]
fn config_validate_json() {
    let dir = TempDir::new().unwrap();
    slipway(&dir).arg("init").assert().success();
    let out = slipway(&dir)
        .args(["config", "validate", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(value["warnings"].is_array());
}

#[test]
fn config_validate_without_config_fails() {
    let dir = TempDir::new().unwrap();
    slipway(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slipway init"));
}

// ---------------------------------------------------------------------------
// slipway releases (against a local --dir)
// ---------------------------------------------------------------------------

#[test]
fn releases_list_shows_names_in_order() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    let out = slipway(&root)
        .args(["releases", "list", "--dir"])
        .arg(deploys.path())
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, THREE.to_vec());
}

#[test]
fn releases_list_marks_live() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    std::os::unix::fs::symlink("20230102_000000", deploys.path().join("live")).unwrap();
    slipway(&root)
        .args(["releases", "list", "--dir"])
        .arg(deploys.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("20230102_000000 (live)"));
}

#[test]
fn releases_list_json() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    let out = slipway(&root)
        .args(["releases", "list", "--json", "--dir"])
        .arg(deploys.path())
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["releases"].as_array().unwrap().len(), 3);
    assert!(value["live"].is_null());
}

#[test]
fn releases_roll_creates_live_link() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    slipway(&root)
        .args(["releases", "roll", "--dir"])
        .arg(deploys.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("20230103_000000"));

    let live = std::fs::read_link(deploys.path().join("live")).unwrap();
    assert_eq!(live.to_string_lossy(), "20230103_000000");
}

#[test]
fn releases_roll_on_empty_dir_fails() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(&[]);
    slipway(&root)
        .args(["releases", "roll", "--dir"])
        .arg(deploys.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no release directories"));
}

#[test]
fn releases_prune_keeps_newest() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    slipway(&root)
        .args(["releases", "prune", "--keep", "2", "--dir"])
        .arg(deploys.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 release(s)."));

    assert!(!deploys.path().join("20230101_000000").exists());
    assert!(deploys.path().join("20230102_000000").exists());
    assert!(deploys.path().join("20230103_000000").exists());
}

#[test]
fn releases_prune_dry_run_removes_nothing() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(THREE);
    slipway(&root)
        .args(["releases", "prune", "--keep", "1", "--dry-run", "--dir"])
        .arg(deploys.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("would remove 20230101_000000"));

    for name in THREE {
        assert!(deploys.path().join(name).exists());
    }
}

#[test]
fn releases_prune_respects_pattern() {
    let root = TempDir::new().unwrap();
    let deploys = releases_dir(&["20230101_000000", "20230102_000000", "shared"]);
    slipway(&root)
        .args(["releases", "prune", "--keep", "1", "--pattern", "2023", "--dir"])
        .arg(deploys.path())
        .assert()
        .success();
    assert!(deploys.path().join("shared").exists());
    assert!(!deploys.path().join("20230101_000000").exists());
}

// ---------------------------------------------------------------------------
// remote tasks without configuration
// ---------------------------------------------------------------------------

#[test]
fn deploy_without_host_fails() {
    let dir = TempDir::new().unwrap();
    slipway(&dir).arg("init").assert().success();
    slipway(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("host"));
}

#[test]
fn deploy_without_config_fails() {
    let dir = TempDir::new().unwrap();
    slipway(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("slipway.yaml"));
}
