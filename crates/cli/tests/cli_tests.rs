use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const EXPECTED_SUMMARY: &str = "\
Order ID: 1 | Customer: John Doe | Total Before Discount: $1100.00 | Total After Discount: $990.00
Order ID: 2 | Customer: Jane Smith | Total Before Discount: €289.00 | Total After Discount: €289.00
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self { dir: tempfile::tempdir().expect("create temp dir") };
        fixture.write(
            "orders.json",
            &json!([
                {
                    "order_id": 1,
                    "customer": "John Doe",
                    "items": [
                        {"name": "Laptop", "price": 1000, "quantity": 1},
                        {"name": "Mouse", "price": 50, "quantity": 2}
                    ],
                    "discount_code": "SUMMER10",
                    "currency": "USD"
                },
                {
                    "order_id": 2,
                    "customer": "Jane Smith",
                    "items": [{"name": "Monitor", "price": 200, "quantity": 2}],
                    "currency": "EUR"
                }
            ])
            .to_string(),
        );
        fixture.write("discounts.json", r#"{"SUMMER10": 10, "WELCOME5": 5}"#);
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) {
        fs::write(self.path(name), contents).expect("write fixture");
    }

    fn run(&self, orders: &str, extra: &[&str]) -> assert_cmd::assert::Assert {
        Command::cargo_bin("invoice_summary")
            .expect("binary built")
            .arg(self.path(orders))
            .arg(self.path("discounts.json"))
            .arg(self.path("out.txt"))
            .args(extra)
            .assert()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

#[test]
fn writes_summary_for_valid_batch() {
    let fixture = Fixture::new();
    fixture.run("orders.json", &[]).success();
    assert_eq!(read(&fixture.path("out.txt")), EXPECTED_SUMMARY);
}

#[test]
fn sequential_mode_writes_same_summary() {
    let fixture = Fixture::new();
    fixture.run("orders.json", &["--sequential"]).success();
    assert_eq!(read(&fixture.path("out.txt")), EXPECTED_SUMMARY);
}

#[test]
fn invalid_records_are_skipped_with_warning() {
    let fixture = Fixture::new();
    fixture.write(
        "mixed.json",
        &json!([
            {"customer": "John Doe", "items": [{"name": "Laptop", "price": 1000, "quantity": 1}]},
            {"order_id": 5, "customer": "Eve", "items": [{"name": "Cable", "price": 10, "quantity": 3}]}
        ])
        .to_string(),
    );
    fixture
        .run("mixed.json", &["--workers", "2"])
        .success()
        .stderr(predicate::str::contains("skipping invalid order"));
    assert_eq!(
        read(&fixture.path("out.txt")),
        "Order ID: 5 | Customer: Eve | Total Before Discount: $30.00 | Total After Discount: $30.00\n"
    );
}

#[test]
fn oversized_order_does_not_abort_batch() {
    let fixture = Fixture::new();
    fixture.write(
        "oversized.json",
        &json!([
            {"order_id": 1, "customer": "Big", "items": [{"name": "Bullion", "price": 1e20, "quantity": 1_000_000_000}]},
            {"order_id": 2, "customer": "Small", "items": [{"name": "Pin", "price": 1, "quantity": 1}]}
        ])
        .to_string(),
    );
    fixture.run("oversized.json", &[]).success();
    assert_eq!(
        read(&fixture.path("out.txt")),
        "Order ID: 2 | Customer: Small | Total Before Discount: $1.00 | Total After Discount: $1.00\n"
    );
}

#[test]
fn metrics_flag_prints_counters() {
    let fixture = Fixture::new();
    fixture
        .run("orders.json", &["--metrics"])
        .success()
        .stdout(predicate::str::contains("\"orders_built\":2"));
}

#[test]
fn missing_source_fails_without_output() {
    let fixture = Fixture::new();
    fixture
        .run("absent.json", &[])
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
    assert!(!fixture.path("out.txt").exists());
}

#[test]
fn malformed_source_fails_without_output() {
    let fixture = Fixture::new();
    fixture.write("broken.json", "[{\"order_id\": 1,");
    fixture
        .run("broken.json", &[])
        .failure()
        .stderr(predicate::str::contains("invalid JSON format"));
    assert!(!fixture.path("out.txt").exists());
}

#[test]
fn wrong_arity_prints_usage() {
    Command::cargo_bin("invoice_summary")
        .expect("binary built")
        .arg("orders.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    let fixture = Fixture::new();
    fixture.run("orders.json", &["extra.txt"]).failure();
    assert!(!fixture.path("out.txt").exists());
}
