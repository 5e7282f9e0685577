use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn roomsplit(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("roomsplit").unwrap();
    cmd.env("ROOMSPLIT_DATA_DIR", data_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn household() -> TempDir {
    let dir = TempDir::new().unwrap();
    roomsplit(dir.path()).arg("init").assert().success();
    for name in ["Alice", "Bob", "Charlie"] {
        roomsplit(dir.path())
            .args(["person", "add", name])
            .assert()
            .success();
    }
    dir
}

#[test]
fn init_creates_data_files() {
    let dir = TempDir::new().unwrap();

    roomsplit(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("people.json").exists());
    assert!(dir.path().join("data").join("expenses.json").exists());
}

#[test]
fn config_shows_audit_log_path() {
    let dir = TempDir::new().unwrap();

    roomsplit(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("audit.log"))
        .stdout(predicate::str::contains("General"));
}

#[test]
fn duplicate_person_is_rejected() {
    let dir = household();

    roomsplit(dir.path())
        .args(["person", "add", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn settle_reports_who_owes_whom() {
    let dir = household();

    roomsplit(dir.path())
        .args([
            "expense", "add", "90", "--payer", "Alice", "--split", "all", "--category",
            "Utilities", "--date", "2025-01-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded expense"));

    roomsplit(dir.path())
        .args(["report", "settle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Person Owing"))
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("Charlie"))
        .stdout(predicate::str::contains("$30.00"));

    let csv = dir.path().join("settle.csv");
    roomsplit(dir.path())
        .args(["report", "settle", "--output"])
        .arg(&csv)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&csv).unwrap();
    assert!(contents.starts_with("Person Owing,Owes To,Amount\n"));
    assert!(contents.contains("Bob,Alice,30.00"));
    assert!(contents.contains("Charlie,Alice,30.00"));
}

#[test]
fn unknown_payer_fails() {
    let dir = household();

    roomsplit(dir.path())
        .args(["expense", "add", "10", "--payer", "Mallory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn person_on_an_expense_cannot_be_removed() {
    let dir = household();

    roomsplit(dir.path())
        .args(["expense", "add", "20", "--payer", "Bob", "--split", "Bob,Charlie"])
        .assert()
        .success();

    roomsplit(dir.path())
        .args(["person", "remove", "Charlie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still referenced"));
}

#[test]
fn csv_import_reports_bad_rows() {
    let dir = household();
    let file = dir.path().join("expenses.csv");
    std::fs::write(
        &file,
        "date,category,amount,payer,participants\n\
         2025-02-01,Groceries,60,Alice,all\n\
         2025-02-02,Snacks,abc,Bob,Bob;Charlie\n\
         2025-02-03,Internet,30,Charlie,Alice;Charlie\n",
    )
    .unwrap();

    roomsplit(dir.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:    2"))
        .stdout(predicate::str::contains("Line 3"));

    roomsplit(dir.path())
        .args(["report", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Household Expenses: $90.00"));
}

#[test]
fn seed_is_repeatable() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [&first, &second] {
        roomsplit(dir.path())
            .args(["seed", "--seed", "7", "--expenses", "12", "--start", "2025-01-01"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Expenses created: 12"));
    }

    let summary = |dir: &TempDir| {
        let output = roomsplit(dir.path())
            .args(["report", "summary"])
            .output()
            .unwrap();
        String::from_utf8(output.stdout).unwrap()
    };
    let line = |text: String| {
        text.lines()
            .find(|l| l.starts_with("Total Household Expenses"))
            .map(str::to_string)
    };

    assert!(line(summary(&first)).is_some());
    assert_eq!(line(summary(&first)), line(summary(&second)));
}

#[test]
fn export_json_contains_transfers() {
    let dir = household();
    roomsplit(dir.path())
        .args(["expense", "add", "40", "--payer", "Charlie", "--split", "Alice,Charlie"])
        .assert()
        .success();

    let out = dir.path().join("export.json");
    roomsplit(dir.path())
        .args(["export", "all"])
        .arg(&out)
        .args(["--format", "json", "--pretty"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["people"].as_array().unwrap().len(), 3);
    assert_eq!(json["transfers"].as_array().unwrap().len(), 1);
    assert_eq!(json["transfers"][0]["amount"], 2000);
}
