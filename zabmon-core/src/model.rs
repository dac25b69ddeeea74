//! Wire types for the Zabbix API plus display helpers.
//!
//! Field names follow the Zabbix JSON shapes (`eventid`, `objectid`, ...);
//! everything stays a string on the wire, including `clock` (unix seconds)
//! and `severity` (numeric enum "0".."5").

use chrono::{LocalResult, TimeZone};
use serde::{Deserialize, Serialize};

/// Sentinel host name for problems whose trigger could not be resolved.
pub const UNKNOWN_HOST: &str = "Unknown Host";

/// An active problem as returned by `problem.get`.
///
/// `host_name` is not part of the wire shape; the enrichment join fills
/// it in after `trigger.get` resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "eventid")]
    pub event_id: String,
    pub name: String,
    pub clock: String,
    pub severity: String,
    #[serde(default)]
    pub acknowledged: String,
    #[serde(rename = "objectid")]
    pub object_id: String,
    #[serde(skip_deserializing, default)]
    pub host_name: String,
}

/// Transient `trigger.get` row, only used to build the id to host-name map.
#[derive(Debug, Clone, Deserialize)]
pub struct Trigger {
    #[serde(rename = "triggerid")]
    pub trigger_id: String,
    #[serde(default)]
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Host {
    pub name: String,
}

/// Zabbix display name for a numeric severity string.
pub fn severity_label(severity: &str) -> &'static str {
    match severity {
        "0" => "Not classified",
        "1" => "Information",
        "2" => "Warning",
        "3" => "Average",
        "4" => "High",
        "5" => "Disaster",
        _ => "Unknown",
    }
}

/// Renders a unix-seconds string as local time `DD.MM HH:MM:SS`.
///
/// A clock that does not parse as an integer is returned unchanged;
/// display code never has to handle an error here.
pub fn format_clock(clock: &str) -> String {
    format_clock_in(clock, &chrono::Local)
}

/// Timezone-generic variant of [`format_clock`], used by tests that need
/// a deterministic reference zone.
pub fn format_clock_in<Tz: TimeZone>(clock: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Ok(timestamp) = clock.parse::<i64>() else {
        return clock.to_string();
    };
    match tz.timestamp_opt(timestamp, 0) {
        LocalResult::Single(datetime) => datetime.format("%d.%m %H:%M:%S").to_string(),
        _ => clock.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_clock_utc_reference() {
        assert_eq!(format_clock_in("1700000000", &Utc), "14.11 22:13:20");
    }

    #[test]
    fn test_format_clock_passthrough_on_garbage() {
        assert_eq!(format_clock_in("abc", &Utc), "abc");
        assert_eq!(format_clock_in("", &Utc), "");
        assert_eq!(format_clock("12.5"), "12.5");
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(severity_label("0"), "Not classified");
        assert_eq!(severity_label("3"), "Average");
        assert_eq!(severity_label("5"), "Disaster");
        assert_eq!(severity_label("9"), "Unknown");
    }

    #[test]
    fn test_problem_decodes_without_host_or_ack() {
        let raw = r#"{"eventid":"42","name":"CPU high","clock":"1700000000","severity":"3","objectid":"10"}"#;
        let problem: Problem = serde_json::from_str(raw).unwrap();
        assert_eq!(problem.event_id, "42");
        assert_eq!(problem.object_id, "10");
        assert_eq!(problem.acknowledged, "");
        assert_eq!(problem.host_name, "");
    }

    #[test]
    fn test_trigger_decodes_with_empty_hosts() {
        let raw = r#"{"triggerid":"10"}"#;
        let trigger: Trigger = serde_json::from_str(raw).unwrap();
        assert!(trigger.hosts.is_empty());
    }
}
