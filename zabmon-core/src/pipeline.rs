//! Fetch, resolve and join: one refresh cycle worth of data movement.
//!
//! `fetch_enriched` is the operation the scheduler runs. Host resolution
//! failures degrade the cycle (problems keep the sentinel host name)
//! instead of discarding it; only the initial problem fetch is fatal.

use std::collections::HashMap;

use serde_json::json;
use tracing::warn;

use crate::error::MonitorError;
use crate::model::{Problem, Trigger, UNKNOWN_HOST};
use crate::rpc::RpcClient;

/// Fetches active problems: unsuppressed, recent, newest event first.
pub async fn fetch_problems(client: &RpcClient) -> Result<Vec<Problem>, MonitorError> {
    let params = json!({
        "output": ["eventid", "name", "clock", "severity", "objectid"],
        "sortfield": ["eventid"],
        "sortorder": "DESC",
        "suppressed": false,
        "recent": true,
    });
    client.call("problem.get", params).await
}

/// Resolves trigger ids to host names via `trigger.get`, enabled triggers only.
pub async fn resolve_hosts(
    client: &RpcClient,
    trigger_ids: &[String],
) -> Result<HashMap<String, String>, MonitorError> {
    let params = json!({
        "triggerids": trigger_ids,
        "selectHosts": ["name"],
        "output": ["triggerid"],
        "filter": { "status": 0 },
    });
    let triggers: Vec<Trigger> = client.call("trigger.get", params).await?;
    Ok(host_map(triggers))
}

/// First host wins when a trigger spans several; hostless triggers
/// contribute no entry.
fn host_map(triggers: Vec<Trigger>) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(triggers.len());
    for trigger in triggers {
        if let Some(host) = trigger.hosts.into_iter().next() {
            map.insert(trigger.trigger_id, host.name);
        }
    }
    map
}

/// Left-joins problems to host names by object id. Pure and
/// order-preserving; unmatched problems get the sentinel.
pub fn join_hosts(mut problems: Vec<Problem>, hosts: &HashMap<String, String>) -> Vec<Problem> {
    for problem in &mut problems {
        problem.host_name = hosts
            .get(&problem.object_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_HOST.to_string());
    }
    problems
}

/// Full fetch-resolve-join sequence for one refresh cycle.
///
/// Zero problems short-circuits before `trigger.get`. A resolver failure
/// is logged and the problems are joined against an empty map, so the
/// user still sees data rather than an error.
pub async fn fetch_enriched(client: &RpcClient) -> Result<Vec<Problem>, MonitorError> {
    let problems = fetch_problems(client).await?;
    if problems.is_empty() {
        return Ok(problems);
    }

    let trigger_ids: Vec<String> = problems.iter().map(|p| p.object_id.clone()).collect();
    let hosts = match resolve_hosts(client, &trigger_ids).await {
        Ok(map) => map,
        Err(e) => {
            warn!("host resolution failed, keeping unenriched problems: {e}");
            HashMap::new()
        }
    };
    Ok(join_hosts(problems, &hosts))
}
