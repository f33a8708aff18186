use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "reserve";
const DATA_DIR_ENV: &str = "RESERVE_MANAGER_DATA_DIR";

fn reserve(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env(DATA_DIR_ENV, dir.path());
    cmd.env_remove("RESERVE_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    reserve(&dir).arg("init").assert().success();
    dir
}

#[test]
fn init_prints_starter_plan() {
    let dir = TempDir::new().unwrap();
    reserve(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialized reserve plan").and(contains("Tier 6")));

    assert!(dir.path().join("data").join("plan.json").exists());
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = initialized();
    reserve(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("--force"));

    reserve(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn status_before_init_fails() {
    let dir = TempDir::new().unwrap();
    reserve(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("reserve init"));
}

#[test]
fn allocate_preview_leaves_balances_alone() {
    let dir = initialized();
    reserve(&dir)
        .args(["allocate", "5000"])
        .assert()
        .success()
        .stdout(contains("Allocating $5,000.00").and(contains("Preview only")));

    reserve(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("$5,000.00").not());
}

#[test]
fn allocate_apply_fills_preferred_account_first() {
    let dir = initialized();
    reserve(&dir)
        .args(["allocate", "5000", "--apply", "-m", "Bonus"])
        .assert()
        .success()
        .stdout(contains("Applied 1 move(s).").and(contains("Savings (Discover)")));

    reserve(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("$5,000.00"));

    reserve(&dir)
        .args(["history", "--tier", "Tier 1"])
        .assert()
        .success()
        .stdout(contains("Bonus"));
}

#[test]
fn allocate_rejects_bad_amount() {
    let dir = initialized();
    reserve(&dir).args(["allocate", "lots"]).assert().failure();
}

#[test]
fn tier_and_account_edits() {
    let dir = initialized();
    reserve(&dir)
        .args(["tier", "add", "Vacation", "-p", "Trips", "-t", "5000"])
        .assert()
        .success()
        .stdout(contains("Added tier").and(contains("$5,000.00")));

    reserve(&dir)
        .args(["account", "set", "Vacation", "HYSA", "-b", "1200", "-a", "4.5"])
        .assert()
        .success()
        .stdout(contains("Created account 'HYSA' in 'Vacation'"));

    reserve(&dir)
        .args(["tier", "show", "Vacation"])
        .assert()
        .success()
        .stdout(contains("HYSA").and(contains("$1,200.00")));

    reserve(&dir)
        .args(["tier", "remove", "Nope"])
        .assert()
        .failure()
        .stderr(contains("Nope"));
}

#[test]
fn recurring_rule_is_processed_once_per_period() {
    let dir = initialized();
    reserve(&dir)
        .args([
            "recurring", "add", "Paycheck", "Tier 1", "Checking", "500", "--start", "2025-01-01",
        ])
        .assert()
        .success()
        .stdout(contains("Added recurring contribution"));

    reserve(&dir)
        .args(["recurring", "process", "--date", "2025-01-15"])
        .assert()
        .success()
        .stdout(contains("Processed 1 contribution(s)."));

    reserve(&dir)
        .args(["recurring", "process", "--date", "2025-01-20"])
        .assert()
        .success()
        .stdout(contains("No recurring contributions due."));
}

#[test]
fn import_creates_missing_tiers() {
    let dir = initialized();
    let csv = dir.path().join("balances.csv");
    fs::write(&csv, "Tier,Account,Balance\nTier 1,Checking,2500\nBrokerage,Index Fund,10000\n").unwrap();
    let file = csv.to_string_lossy().to_string();

    reserve(&dir)
        .args(["import", file.as_str(), "--dry-run"])
        .assert()
        .success()
        .stdout(contains("Dry run"));

    reserve(&dir)
        .args(["import", file.as_str()])
        .assert()
        .success()
        .stdout(contains("Import Complete!").and(contains("Tiers created:    Brokerage")));
}

#[test]
fn import_with_bad_rows_imports_nothing() {
    let dir = initialized();
    let csv = dir.path().join("bad.csv");
    fs::write(&csv, "Tier,Account,Balance\nTier 1,Checking,lots\n").unwrap();

    let file = csv.to_string_lossy().to_string();

    reserve(&dir)
        .args(["import", file.as_str()])
        .assert()
        .failure()
        .stderr(contains("nothing was imported"));
}

#[test]
fn backup_create_and_list() {
    let dir = initialized();
    reserve(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    reserve(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("backup-").and(contains("Total:")));
}

#[test]
fn backup_restore_requires_force() {
    let dir = initialized();
    reserve(&dir).args(["backup", "create"]).assert().success();

    reserve(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(contains("--force"));
}

#[test]
fn config_updates_settings() {
    let dir = initialized();
    reserve(&dir)
        .args(["config", "--currency", "€", "--months", "6"])
        .assert()
        .success()
        .stdout(contains("Settings saved.").and(contains("Forecast months:      6")));

    reserve(&dir)
        .arg("forecast")
        .assert()
        .success()
        .stdout(contains("6 month(s)"));
}

#[test]
fn forecast_long_horizon_does_not_crash() {
    let dir = initialized();
    reserve(&dir)
        .args(["account", "set", "Tier 4", "Crypto", "-b", "10000"])
        .assert()
        .success();

    reserve(&dir)
        .args(["forecast", "--months", "1000"])
        .assert()
        .success()
        .stdout(contains("1000 month(s)"));
}

#[test]
fn allocate_rejects_oversized_amount() {
    let dir = initialized();
    reserve(&dir)
        .args(["allocate", "99999999999999999", "--apply"])
        .assert()
        .failure()
        .stderr(contains("Amount"));

    reserve(&dir)
        .args(["allocate", "1.999"])
        .assert()
        .failure();
}

#[test]
fn project_rejects_excessive_horizon() {
    let dir = initialized();
    reserve(&dir)
        .args(["project", "--months", "4000000000"])
        .assert()
        .failure()
        .stderr(contains("too long"));

    reserve(&dir)
        .args(["project", "--months", "1200"])
        .assert()
        .success();
}
