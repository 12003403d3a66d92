use httpmock::prelude::*;
use std::process::{Command, Output};

const MONITOR_ENV: [&str; 9] = [
    "UBER_TOKEN",
    "CUSTOMER_ID",
    "UBER_BASE_URL",
    "EMAIL_FROM",
    "EMAIL_PASSWORD",
    "EMAIL_TO",
    "MONITOR_CONFIG",
    "REPORT_DIR",
    "RUST_LOG",
];

fn monitor_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_delivery-monitor"));
    for var in MONITOR_ENV {
        command.env_remove(var);
    }
    command
}

fn run(command: &mut Command) -> (Output, String, String) {
    let output = command.output().expect("failed to run delivery-monitor");
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    (output, stdout, stderr)
}

#[test]
fn test_missing_token_exits_with_code_one() {
    let server = MockServer::start();
    let any_request = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(serde_json::json!({"data": []}));
    });

    let (output, _stdout, stderr) = run(monitor_command()
        .env("CUSTOMER_ID", "org-1")
        .env("UBER_BASE_URL", server.url("/v1")));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("UBER_TOKEN"));
    any_request.assert_hits(0);
}

#[test]
fn test_console_fallback_when_mail_is_not_configured() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/customers/org-1/deliveries")
            .query_param("start_dt", "2026-10-17T00:00:00Z")
            .header("Authorization", "Bearer cli-token");
        then.status(200).json_body(serde_json::json!({
            "data": [
                {"id": "d1", "status": "delivered", "external_store_id": "store-a"},
                {"id": "d2", "status": "delivered", "external_store_id": "store-a"},
                {"id": "d3", "status": "delivered", "external_store_id": "store-a"}
            ]
        }));
    });

    let (output, stdout, _stderr) = run(monitor_command()
        .args(["--date", "2026-10-17"])
        .env("UBER_TOKEN", "cli-token")
        .env("CUSTOMER_ID", "org-1")
        .env("UBER_BASE_URL", server.url("/v1")));

    list.assert();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("[ALERT - NO EMAIL CONFIG] 🚨 Uber Direct Overuse Alert"));
    assert!(stdout.contains("store-a (3x)"));
}

#[test]
fn test_no_data_exits_cleanly() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/org-1/deliveries");
        then.status(200).json_body(serde_json::json!({"data": []}));
    });

    let (output, stdout, _stderr) = run(monitor_command()
        .args(["--date", "2026-10-17"])
        .env("UBER_TOKEN", "cli-token")
        .env("CUSTOMER_ID", "org-1")
        .env("UBER_BASE_URL", server.url("/v1")));

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("No incidents"));
    assert!(!stdout.contains("[ALERT"));
}

#[test]
fn test_api_failure_still_exits_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/org-1/deliveries");
        then.status(401).body("unauthorized");
    });

    let (output, _stdout, _stderr) = run(monitor_command()
        .args(["--date", "2026-10-17"])
        .env("UBER_TOKEN", "expired-token")
        .env("CUSTOMER_ID", "org-1")
        .env("UBER_BASE_URL", server.url("/v1")));

    assert_eq!(output.status.code(), Some(0));
}
