//! Zabmon core - Zabbix problem acquisition pipeline
//!
//! This crate owns the data path of the monitor:
//! - JSON-RPC transport to the Zabbix API (`rpc`)
//! - problem fetch, host resolution and the enrichment join (`pipeline`)
//! - the refresh scheduler that drives periodic and manual cycles and
//!   hands results to a presentation consumer over a channel (`scheduler`)
//! - preference access behind an opaque key-value trait (`prefs`)
//!
//! Presentation layers (console, GUI) live outside this crate and only
//! consume [`scheduler::DisplayUpdate`] messages.

pub mod error;
pub mod model;
pub mod pipeline;
pub mod prefs;
pub mod rpc;
pub mod scheduler;

pub use error::MonitorError;
pub use model::Problem;
pub use scheduler::{DisplayState, DisplayUpdate, Monitor, MonitorHandle};
