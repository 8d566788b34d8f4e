use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

struct Run {
    stdout: String,
    stderr: String,
    success: bool,
}

fn run(fixture: &str, store: &Path, orders: Option<&str>) -> Run {
    run_with_env(fixture, store, orders, &[])
}

fn run_with_env(fixture: &str, store: &Path, orders: Option<&str>, vars: &[(&str, &str)]) -> Run {
    let path = format!("tests/fixtures/{fixture}");
    let mut command = Command::new(env!("CARGO_BIN_EXE_driver-ledger"));
    command
        .arg(&path)
        .env("DRIVER_LEDGER_STORE", store)
        .env("LOG_LEVEL", "warn")
        .env_remove("DRIVER_LEDGER_ORDERS")
        .env_remove("COMMAND_BUFFER");
    if let Some(orders) = orders {
        command.env("DRIVER_LEDGER_ORDERS", format!("tests/fixtures/{orders}"));
    }
    command.envs(vars.iter().copied());

    let output = command.output().expect("failed to run binary");
    Run {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    }
}

#[test]
fn shift_books_orders_and_withdrawals() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    let out = run("shift.csv", &store, None);

    assert!(out.success);
    assert!(out.stderr.is_empty());

    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Order #2 berhasil diterima! Menuju lokasi pickup...",
            "Order #1 dengan talangan berhasil diterima!",
            "Order #3 dengan talangan ditolak",
            "Saldo tidak mencukupi! Minimal penarikan Rp 50.000",
            "Penarikan Rp 100.000 berhasil!",
            "earnings,balance,online",
            "207000,739900,true",
        ]
    );

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({ "earnings": 207000, "balance": 739900, "isOnline": true })
    );
}

#[test]
fn state_survives_between_runs() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");

    assert!(run("shift.csv", &store, None).success);
    let out = run("go_offline.csv", &store, None);

    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines[0], "Status Offline - Tidak akan menerima order baru");
    assert_eq!(
        lines[1],
        "Status Offline - Aktifkan status online untuk menerima order"
    );
    assert_eq!(lines[3], "207000,739900,false");
}

#[test]
fn insufficient_balance_blocks_float_advance() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    fs::copy("tests/fixtures/low_balance.json", &store).unwrap();

    let out = run("float_only.csv", &store, None);

    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert!(lines[0].starts_with("Saldo Tidak Cukup untuk talangan order #1"));
    assert_eq!(lines[1], "Saldo tidak mencukupi! Saldo tersedia Rp 40.000");
    assert_eq!(lines[3], "150000,40000,true");
}

#[test]
fn errors_warn_but_do_not_block() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    let out = run("with_errors.csv", &store, None);

    assert!(out.success);
    assert!(out.stderr.contains("unrecognized command"));
    assert!(out.stderr.contains("missing amount"));
    assert!(out.stderr.contains("unrecognized decision"));

    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Order #2 berhasil diterima! Menuju lokasi pickup...",
            "Order #7 tidak tersedia",
            "earnings,balance,online",
            "182000,872400,true",
        ]
    );
}

#[test]
fn order_feed_replaces_sample_catalog() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    let out = run("feed_shift.csv", &store, Some("orders.csv"));

    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines[0], "Order #21 berhasil diterima! Menuju lokasi pickup...");
    assert_eq!(lines[1], "Order #22 dengan talangan berhasil diterima!");
    assert_eq!(lines[2], "Order #2 tidak tersedia");
    // 150000 + 18000 + 21000; 850000 + 12600 + 14700 - 40000
    assert_eq!(lines[4], "189000,837300,true");
}

#[test]
fn missing_command_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = run("does_not_exist.csv", &dir.path().join("ledger.json"), None);

    assert!(!out.success);
    assert!(out.stderr.contains("does_not_exist.csv"));
}

#[test]
fn zero_command_buffer_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    let out = run_with_env("shift.csv", &store, None, &[("COMMAND_BUFFER", "0")]);

    assert!(!out.success);
    assert!(out.stderr.contains("COMMAND_BUFFER"));
    assert!(!out.stderr.contains("panicked"));
    assert!(!store.exists());
}

#[test]
fn non_numeric_command_buffer_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("ledger.json");
    let out = run_with_env("shift.csv", &store, None, &[("COMMAND_BUFFER", "abc")]);

    assert!(!out.success);
    assert!(out.stderr.contains("COMMAND_BUFFER"));
    assert!(!out.stderr.contains("panicked"));
}
