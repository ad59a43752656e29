use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn ccparse(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ccparse").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn write_default_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn issuers_lists_builtin_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_default_config(dir.path());

    ccparse(&config)
        .arg("issuers")
        .assert()
        .success()
        .stdout(predicate::str::contains("HDFC Bank"))
        .stdout(predicate::str::contains("Canara Bank"));
}

#[test]
fn parse_folder_writes_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_default_config(dir.path());
    let input = dir.path().join("statements");
    fs::create_dir(&input).unwrap();

    fs::write(
        input.join("a_hdfc.txt"),
        "HDFC Bank\nStatement Period: 01 Jan 2024 to 31 Jan 2024\n\
         Payment Due Date: 15 Feb 2024\nTotal Amount Due: Rs. 5,000.00\nXXXX 4321",
    )
    .unwrap();
    fs::write(input.join("b_unknown.txt"), "Statement for the month\nTotal Due: 1,234").unwrap();
    fs::write(input.join("ignored.md"), "HDFC Bank").unwrap();

    let csv_path = dir.path().join("out").join("records.csv");
    let json_path = dir.path().join("out").join("records.json");

    ccparse(&config)
        .arg("parse")
        .arg(&input)
        .arg("--no-ocr")
        .arg("--out-csv")
        .arg(&csv_path)
        .arg("--out-json")
        .arg(&json_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 2 statement(s)"))
        .stdout(predicate::str::contains("b_unknown.txt: could not detect issuer"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "issuer": "HDFC Bank",
                "last_4_digits": "4321",
                "billing_cycle_start": "01 Jan 2024",
                "billing_cycle_end": "31 Jan 2024",
                "payment_due_date": "15 Feb 2024",
                "total_outstanding_balance": "5000.00"
            },
            {
                "issuer": null,
                "last_4_digits": null,
                "billing_cycle_start": null,
                "billing_cycle_end": null,
                "payment_due_date": null,
                "total_outstanding_balance": "1234.00"
            }
        ])
    );

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("HDFC Bank,4321,01 Jan 2024,31 Jan 2024,15 Feb 2024,5000.00"));
}

#[test]
fn parse_prints_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_default_config(dir.path());
    let statement = dir.path().join("sbi.txt");
    fs::write(
        &statement,
        "SBI Card Monthly Statement Card Number: XXXX 9012 Statement Date: 05/03/2024 to 04/04/2024 \
         Due Date: 24/04/2024 Total Due: INR 8,900.00",
    )
    .unwrap();

    ccparse(&config)
        .arg("parse")
        .arg(&statement)
        .arg("--no-ocr")
        .arg("--print")
        .arg("--out-csv")
        .arg(dir.path().join("o.csv"))
        .arg("--out-json")
        .arg(dir.path().join("o.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("=== sbi.txt ==="))
        .stdout(predicate::str::contains("24/04/2024 (2024-04-24)"));
}

#[test]
fn malformed_registry_fails_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let issuers = dir.path().join("issuers.json");
    fs::write(
        &issuers,
        r#"[{"name": "Broken Bank", "last_4_digits": "(\\d{4}", "billing_cycle": "(a) (b)",
            "payment_due_date": "(x)", "total_outstanding_balance": "(y)"}]"#,
    )
    .unwrap();
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        serde_json::json!({ "registry": { "issuers_file": issuers } }).to_string(),
    )
    .unwrap();

    let statement = dir.path().join("s.txt");
    fs::write(&statement, "Broken Bank").unwrap();
    let json_path = dir.path().join("o.json");

    ccparse(&config)
        .arg("parse")
        .arg(&statement)
        .arg("--out-json")
        .arg(&json_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid issuer definitions"));

    assert!(!json_path.exists());
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_default_config(dir.path());

    ccparse(&config)
        .arg("parse")
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found or unsupported"));
}

#[test]
fn strict_mode_aborts_on_unreadable_statement() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_default_config(dir.path());
    let input = dir.path().join("statements");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("broken.pdf"), "not a pdf").unwrap();

    let out_csv = dir.path().join("o.csv");
    let out_json = dir.path().join("o.json");

    ccparse(&config)
        .arg("parse")
        .arg(&input)
        .arg("--no-ocr")
        .arg("--out-csv")
        .arg(&out_csv)
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .success()
        .stdout(predicate::str::contains("broken.pdf"));

    ccparse(&config)
        .arg("parse")
        .arg(&input)
        .arg("--no-ocr")
        .arg("--strict")
        .arg("--out-csv")
        .arg(&out_csv)
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn config_get_reads_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"ocr": {"language": "hin"}}"#).unwrap();

    ccparse(&config)
        .args(["config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hin\""));
}
