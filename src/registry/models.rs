//! Host registry model types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_HOST_TYPE: &str = "Unknown";
pub const DEFAULT_OS: &str = "Unknown";
pub const DEFAULT_LOCATION: &str = "Nakasero Hospital";
pub const DEFAULT_DEPARTMENT: &str = "IT";

/// One monitored machine, keyed by its IP address.
///
/// Every field other than `ip` is optional on disk. Records written by hand
/// may leave fields out, and those omissions survive a load/save cycle, as do
/// any extra keys (kept in `extra`). Records created through
/// [`HostRecord::from_input`] always carry every known field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    pub ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub host_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Keys outside the known field set, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Host fields as submitted by a client. Any subset may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostInput {
    pub ip: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub critical: Option<bool>,
    pub enabled: Option<bool>,
    #[serde(rename = "type")]
    pub host_type: Option<String>,
    pub os: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub notes: Option<String>,
}

impl HostRecord {
    /// Build a new record, filling unspecified fields with the creation defaults.
    pub fn from_input(ip: String, input: HostInput) -> Self {
        Self {
            name: Some(input.name.unwrap_or_else(|| ip.clone())),
            category: Some(input.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            purpose: Some(input.purpose.unwrap_or_default()),
            critical: Some(input.critical.unwrap_or(false)),
            enabled: Some(input.enabled.unwrap_or(true)),
            host_type: Some(input.host_type.unwrap_or_else(|| DEFAULT_HOST_TYPE.to_string())),
            os: Some(input.os.unwrap_or_else(|| DEFAULT_OS.to_string())),
            location: Some(input.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
            department: Some(input.department.unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string())),
            notes: Some(input.notes.unwrap_or_default()),
            extra: serde_json::Map::new(),
            ip,
        }
    }

    /// Merge `input` over this record under the key `ip`.
    ///
    /// Precedence per field: submitted value, then the existing value, then
    /// the creation default. Extra keys of the existing record are kept.
    pub fn merged(self, ip: String, input: HostInput) -> Self {
        let mut existing = self;
        let extra = std::mem::take(&mut existing.extra);
        let fallback = HostInput {
            ip: None,
            name: input.name.or(existing.name),
            category: input.category.or(existing.category),
            purpose: input.purpose.or(existing.purpose),
            critical: input.critical.or(existing.critical),
            enabled: input.enabled.or(existing.enabled),
            host_type: input.host_type.or(existing.host_type),
            os: input.os.or(existing.os),
            location: input.location.or(existing.location),
            department: input.department.or(existing.department),
            notes: input.notes.or(existing.notes),
        };
        Self {
            extra,
            ..Self::from_input(ip, fallback)
        }
    }

    /// Display name, falling back to the IP.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ip)
    }

    /// Hosts without an explicit `enabled` flag are monitored.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_critical(&self) -> bool {
        self.critical.unwrap_or(false)
    }
}
