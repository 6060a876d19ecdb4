mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::tea_payment;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::process::Command;

#[test]
fn test_transform_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = tempfile::NamedTempFile::new()?;
    let body = json!({ "data": [tea_payment(), { "billInvoice": "no-date" }] });
    write!(input, "{}", body)?;

    let mut cmd = Command::new(cargo_bin!("integra-bridge"));
    cmd.arg("transform")
        .arg(input.path())
        .arg("--utc-offset")
        .arg("+05:30");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Transactions\""))
        .stdout(predicate::str::contains("\"RCPT_DT\": \"20240115\""))
        .stdout(predicate::str::contains("\"RCPT_TM\": \"150000\""))
        .stdout(predicate::str::contains("\"ITEM_TAX\": \"18.000000\""))
        .stderr(predicate::str::contains(
            "Exported 1 transactions, skipped 1 records",
        ));

    Ok(())
}

#[test]
fn test_transform_rejects_non_report_body() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = tempfile::NamedTempFile::new()?;
    write!(input, "{}", json!({ "message": "Invalid token" }))?;

    let mut cmd = Command::new(cargo_bin!("integra-bridge"));
    cmd.arg("transform").arg(input.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing 'data' array"));

    Ok(())
}

#[test]
fn test_serve_requires_credentials() {
    let mut cmd = Command::new(cargo_bin!("integra-bridge"));
    cmd.arg("serve")
        .env_remove("INTEGRA_BUSINESS_ID")
        .env_remove("INTEGRA_ACCESS_TOKEN");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--business-id"));
}
