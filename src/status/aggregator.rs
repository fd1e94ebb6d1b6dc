//! Joins the host registry with the health checker's status map.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::environment::EnvironmentInfo;
use super::reader::StatusReader;
use crate::registry::{HostRecord, RegistryError, RegistryStore};

/// Category shown for hosts stored without one.
pub const STATUS_VIEW_CATEGORY: &str = "Uncategorized";

/// Status shown for hosts the health checker has not reported on.
pub const MISSING_STATUS: &str = "unknown";

/// Classified health of a host, used for the summary tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    Up,
    Down,
    Unknown,
}

impl HostStatus {
    /// Only the exact tokens `up` and `down` are recognised.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("up") => HostStatus::Up,
            Some("down") => HostStatus::Down,
            _ => HostStatus::Unknown,
        }
    }
}

/// Per-host row of the status view. `status` is the token exactly as the
/// health checker wrote it.
#[derive(Debug, Clone, Serialize)]
pub struct HostStatusView {
    pub ip: String,
    pub name: String,
    pub category: String,
    pub purpose: String,
    pub critical: bool,
    pub status: String,
    pub last_check: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub unknown: usize,
    pub uptime_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerIdentity {
    pub hostname: String,
    pub ip: String,
}

/// Full response of a status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub last_updated: DateTime<Utc>,
    pub summary: Summary,
    pub hosts: Vec<HostStatusView>,
    pub server: ServerIdentity,
}

/// Computes [`StatusReport`]s from the current registry and status files.
pub struct StatusAggregator {
    store: RegistryStore,
    reader: StatusReader,
    env: Arc<dyn EnvironmentInfo>,
}

impl StatusAggregator {
    pub fn new(store: RegistryStore, reader: StatusReader, env: Arc<dyn EnvironmentInfo>) -> Self {
        Self { store, reader, env }
    }

    /// Recompute the report from scratch.
    pub fn aggregate(&self) -> Result<StatusReport, RegistryError> {
        let records = self.store.load()?;
        let status_map = self.reader.read()?;
        let now = Utc::now();

        let (summary, hosts) = summarize(&records, &status_map, now);
        Ok(StatusReport {
            last_updated: now,
            summary,
            hosts,
            server: ServerIdentity {
                hostname: self.env.hostname(),
                ip: self.env.primary_address(),
            },
        })
    }
}

/// Build the view of every enabled host and tally their classified status.
pub fn summarize(
    records: &[HostRecord],
    status_map: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> (Summary, Vec<HostStatusView>) {
    let hosts: Vec<HostStatusView> = records
        .iter()
        .filter(|r| r.is_enabled())
        .map(|r| HostStatusView {
            ip: r.ip.clone(),
            name: r.display_name().to_string(),
            category: r
                .category
                .clone()
                .unwrap_or_else(|| STATUS_VIEW_CATEGORY.to_string()),
            purpose: r.purpose.clone().unwrap_or_default(),
            critical: r.is_critical(),
            status: status_map
                .get(&r.ip)
                .cloned()
                .unwrap_or_else(|| MISSING_STATUS.to_string()),
            last_check: now,
        })
        .collect();

    let total = hosts.len();
    let tally = |wanted: HostStatus| {
        hosts
            .iter()
            .filter(|h| HostStatus::from_token(Some(h.status.as_str())) == wanted)
            .count()
    };
    let up = tally(HostStatus::Up);
    let down = tally(HostStatus::Down);
    let uptime_percentage = if total > 0 {
        up as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let summary = Summary {
        total,
        up,
        down,
        unknown: total - up - down,
        uptime_percentage,
    };
    (summary, hosts)
}
