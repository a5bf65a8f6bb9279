use serde::{Deserialize, Serialize};

/// A single `NAME=value` pair exported into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Step executed by the backend inside a container.
///
/// Serialized externally tagged, e.g. `{"run": {"path": "/app"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Download(DownloadAction),
    Run(RunAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadAction {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAction {
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_source: Option<String>,
}

/// Body of `POST /v1/desired_lrps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredLrpCreateRequest {
    pub process_guid: String,
    pub domain: String,
    #[serde(rename = "rootfs")]
    pub root_fs: String,
    pub instances: u32,
    pub stack: String,
    pub env: Vec<EnvironmentVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<Action>,
    pub disk_mb: u32,
    pub memory_mb: u32,
    pub ports: Vec<u32>,
    pub routes: Vec<String>,
    pub log_guid: String,
    pub log_source: String,
}

/// Partial update accepted by `PUT /v1/desired_lrps/:process_guid`.
///
/// Only fields that are `Some` are sent; the backend leaves everything else untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredLrpUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
}

/// Desired state of an application as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrp {
    pub process_guid: String,
    pub domain: String,
    #[serde(rename = "rootfs")]
    pub root_fs: String,
    pub instances: u32,
    pub stack: String,
    pub env: Vec<EnvironmentVariable>,
    pub disk_mb: u32,
    pub memory_mb: u32,
    pub ports: Vec<u32>,
    pub routes: Vec<String>,
    pub log_guid: String,
}

impl DesiredLrp {
    /// Minimal record carrying only a guid and an instance count.
    pub fn new(process_guid: impl Into<String>, instances: u32) -> Self {
        Self {
            process_guid: process_guid.into(),
            instances,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActualLrpState {
    Unclaimed,
    Claimed,
    Running,
    Crashed,
}

/// Observed state of one instance of a desired LRP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLrp {
    pub process_guid: String,
    #[serde(default)]
    pub instance_guid: String,
    #[serde(default)]
    pub index: u32,
    pub state: ActualLrpState,
}

impl ActualLrp {
    pub fn new(process_guid: impl Into<String>, state: ActualLrpState) -> Self {
        Self {
            process_guid: process_guid.into(),
            instance_guid: String::new(),
            index: 0,
            state,
        }
    }
}

/// Error body returned by the receptor for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}
