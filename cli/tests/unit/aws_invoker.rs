//! Unit tests for the AWS CLI invoker with a mocked command runner.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lambdaphp_cli::application::ports::FunctionInvoker;
use lambdaphp_cli::domain::{AwsSettings, InvocationError, InvocationRequest};
use lambdaphp_cli::infra::invoker::AwsCliInvoker;
use serde_json::json;

use crate::helpers::{MockAwsCli, err_output, ok_output};

fn request() -> InvocationRequest {
    InvocationRequest::new(
        "app-dev-console",
        &["migrate".to_string(), "--force".to_string()],
        AwsSettings {
            region: "eu-central-1".to_string(),
            profile: "staging".to_string(),
        },
    )
    .expect("valid request")
}

fn metadata(logs: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "StatusCode": 200,
        "LogResult": BASE64.encode(logs),
        "ExecutedVersion": "$LATEST",
    }))
    .expect("serialize")
}

#[tokio::test]
async fn test_invoke_reads_payload_from_outfile() {
    let runner = MockAwsCli::new(
        br#"{"output":"Migrated.","exitCode":0}"#,
        ok_output(&metadata("START RequestId: abc\n")),
    );
    let invoker = AwsCliInvoker::with_runner(runner);

    let response = invoker.invoke(&request()).await.expect("invocation succeeds");

    assert_eq!(response.payload, json!({"output": "Migrated.", "exitCode": 0}));
    assert_eq!(response.logs, "START RequestId: abc\n");
}

#[tokio::test]
async fn test_invoke_passes_function_region_and_profile() {
    let runner = MockAwsCli::new(b"{}", ok_output(&metadata("")));
    let calls = Arc::clone(&runner.calls);
    let invoker = AwsCliInvoker::with_runner(runner);

    invoker.invoke(&request()).await.expect("invocation succeeds");

    let calls = calls.lock().expect("lock");
    assert_eq!(calls.len(), 1);
    let joined = calls[0].join(" ");
    assert!(joined.starts_with("aws lambda invoke --function-name app-dev-console"));
    assert!(joined.contains("--region eu-central-1"));
    assert!(joined.contains("--profile staging"));
    assert!(joined.contains("--log-type Tail"));
}

#[tokio::test]
async fn test_cli_failure_is_transport_error_with_stderr() {
    let runner = MockAwsCli::new(
        b"",
        err_output(255, b"Could not connect to the endpoint URL\n"),
    );
    let invoker = AwsCliInvoker::with_runner(runner);

    let err = invoker.invoke(&request()).await.expect_err("should fail");

    assert_eq!(
        err,
        InvocationError::Transport {
            message: "Could not connect to the endpoint URL".to_string()
        }
    );
    assert_eq!(err.logs(), "");
}

#[tokio::test]
async fn test_function_error_carries_remote_logs() {
    let meta = serde_json::to_vec(&json!({
        "StatusCode": 200,
        "FunctionError": "Unhandled",
        "LogResult": BASE64.encode("PHP Fatal error\n"),
    }))
    .expect("serialize");
    let runner = MockAwsCli::new(
        br#"{"errorType":"Error","errorMessage":"Class not found"}"#,
        ok_output(&meta),
    );
    let invoker = AwsCliInvoker::with_runner(runner);

    let err = invoker.invoke(&request()).await.expect_err("function error");

    assert_eq!(err.logs(), "PHP Fatal error\n");
    assert_eq!(err.to_string(), "Class not found");
}
