/*!
Builders de payloads Zabbix pour les tests (équivalent des réponses
`problem.get` / `trigger.get` du serveur réel).
*/

use serde_json::{json, Value};

/// One `problem.get` row with the fields the pipeline requests.
pub fn problem(event_id: &str, object_id: &str, clock: &str, severity: &str, name: &str) -> Value {
    json!({
        "eventid": event_id,
        "objectid": object_id,
        "clock": clock,
        "severity": severity,
        "name": name,
    })
}

/// One `trigger.get` row with its expanded host list.
pub fn trigger(trigger_id: &str, host_names: &[&str]) -> Value {
    let hosts: Vec<Value> = host_names.iter().map(|name| json!({ "name": name })).collect();
    json!({
        "triggerid": trigger_id,
        "hosts": hosts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_builder_shape() {
        let value = problem("1", "10", "1700000000", "3", "CPU high");
        assert_eq!(value["eventid"], "1");
        assert_eq!(value["objectid"], "10");
        assert_eq!(value["severity"], "3");
    }

    #[test]
    fn test_trigger_builder_shape() {
        let value = trigger("10", &["db1", "db2"]);
        assert_eq!(value["triggerid"], "10");
        assert_eq!(value["hosts"][0]["name"], "db1");
        assert_eq!(value["hosts"].as_array().unwrap().len(), 2);

        let hostless = trigger("11", &[]);
        assert!(hostless["hosts"].as_array().unwrap().is_empty());
    }
}
