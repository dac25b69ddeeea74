//! End-to-end pipeline behavior against the devkit stub server.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use zabmon_core::error::MonitorError;
use zabmon_core::model::{format_clock_in, UNKNOWN_HOST};
use zabmon_core::pipeline;
use zabmon_core::prefs::MemoryPrefs;
use zabmon_core::rpc::RpcClient;
use zabmon_core::scheduler;
use zabmon_devkit::builders;
use zabmon_devkit::{MockZabbixServer, ResponseScript, ScriptedResponse};

fn client_for(server: &MockZabbixServer) -> RpcClient {
    RpcClient::new(server.endpoint(), "test-token", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_empty_config_fails_before_any_network() {
    // no stub exists at all; a network attempt would fail differently
    let err = scheduler::run_cycle(&MemoryPrefs::new()).await.unwrap_err();
    assert!(matches!(err, MonitorError::Config(_)));
}

#[tokio::test]
async fn test_fetch_enriched_joins_host_names() {
    let server = MockZabbixServer::start(
        ResponseScript::new()
            .on(
                "problem.get",
                ScriptedResponse::Result(json!([builders::problem(
                    "1",
                    "10",
                    "1700000000",
                    "3",
                    "CPU high"
                )])),
            )
            .on(
                "trigger.get",
                ScriptedResponse::Result(json!([builders::trigger("10", &["db1"])])),
            ),
    )
    .await
    .unwrap();

    let client = client_for(&server);
    let problems = pipeline::fetch_enriched(&client).await.unwrap();

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].host_name, "db1");
    assert_eq!(problems[0].name, "CPU high");
    assert_eq!(format_clock_in(&problems[0].clock, &Utc), "14.11 22:13:20");

    let calls = server.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, "problem.get");
    assert_eq!(calls[0].auth.as_deref(), Some("test-token"));
    assert_eq!(calls[0].params["sortfield"], json!(["eventid"]));
    assert_eq!(calls[0].params["sortorder"], "DESC");
    assert_eq!(calls[0].params["suppressed"], false);
    assert_eq!(calls[0].params["recent"], true);

    assert_eq!(calls[1].method, "trigger.get");
    assert_eq!(calls[1].params["triggerids"], json!(["10"]));
    assert_eq!(calls[1].params["selectHosts"], json!(["name"]));
    assert_eq!(calls[1].params["output"], json!(["triggerid"]));
    assert_eq!(calls[1].params["filter"]["status"], 0);
}

#[tokio::test]
async fn test_resolver_failure_degrades_to_sentinel() {
    let server = MockZabbixServer::start(
        ResponseScript::new()
            .on(
                "problem.get",
                ScriptedResponse::Result(json!([builders::problem(
                    "1",
                    "10",
                    "1700000000",
                    "4",
                    "Disk full"
                )])),
            )
            .on("trigger.get", ScriptedResponse::Drop),
    )
    .await
    .unwrap();

    let client = client_for(&server);
    let problems = pipeline::fetch_enriched(&client).await.unwrap();

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].host_name, UNKNOWN_HOST);
}

#[tokio::test]
async fn test_resolver_api_error_also_degrades() {
    let server = MockZabbixServer::start(
        ResponseScript::new()
            .on(
                "problem.get",
                ScriptedResponse::Result(json!([builders::problem(
                    "1",
                    "10",
                    "1700000000",
                    "2",
                    "Service restarted"
                )])),
            )
            .on(
                "trigger.get",
                ScriptedResponse::ApiError {
                    code: -32500,
                    message: "Application error.".to_string(),
                },
            ),
    )
    .await
    .unwrap();

    let client = client_for(&server);
    let problems = pipeline::fetch_enriched(&client).await.unwrap();
    assert_eq!(problems[0].host_name, UNKNOWN_HOST);
}

#[tokio::test]
async fn test_empty_problem_set_skips_host_resolution() {
    let server = MockZabbixServer::start(
        ResponseScript::new().on("problem.get", ScriptedResponse::Result(json!([]))),
    )
    .await
    .unwrap();

    let client = client_for(&server);
    let problems = pipeline::fetch_enriched(&client).await.unwrap();

    assert!(problems.is_empty());
    // exactly one round trip: trigger.get must never be issued
    assert_eq!(server.calls().len(), 1);
    assert_eq!(server.calls_for("trigger.get").len(), 0);
}

#[tokio::test]
async fn test_problem_fetch_api_error_is_fatal() {
    let server = MockZabbixServer::start(ResponseScript::new().on(
        "problem.get",
        ScriptedResponse::ApiError {
            code: -32602,
            message: "Not authorised.".to_string(),
        },
    ))
    .await
    .unwrap();

    let client = client_for(&server);
    let err = pipeline::fetch_enriched(&client).await.unwrap_err();
    match err {
        MonitorError::Api { code, message } => {
            assert_eq!(code, -32602);
            assert_eq!(message, "Not authorised.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_problem_fetch_shape_mismatch_is_decode_error() {
    let server = MockZabbixServer::start(ResponseScript::new().on(
        "problem.get",
        // an object where a problem array is expected
        ScriptedResponse::Result(json!({ "unexpected": true })),
    ))
    .await
    .unwrap();

    let client = client_for(&server);
    let err = pipeline::fetch_enriched(&client).await.unwrap_err();
    assert!(matches!(err, MonitorError::Decode(_)));
}

#[tokio::test]
async fn test_problem_fetch_transport_error_is_fatal() {
    let server = MockZabbixServer::start(
        ResponseScript::new().on("problem.get", ScriptedResponse::Drop),
    )
    .await
    .unwrap();

    let client = client_for(&server);
    let err = pipeline::fetch_enriched(&client).await.unwrap_err();
    assert!(matches!(err, MonitorError::Transport(_)));
    assert_eq!(err.category_message(), "Server unreachable");
}
