use std::collections::BTreeMap;

/// Parameters for desiring a new app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAppParams {
    /// Process guid; also the first label of the app's route.
    pub process_guid: String,
    /// Root filesystem reference, e.g. `docker:///library/redis`.
    pub root_fs: String,
    /// Executable run inside the container.
    pub start_command: String,
    pub args: Vec<String>,
    /// User-supplied environment. `PORT` is always overridden with `port`.
    pub env: BTreeMap<String, String>,
    /// Run the start command with elevated privileges.
    pub privileged: bool,
    pub memory_mb: u32,
    pub disk_mb: u32,
    /// Port the app listens on; exposed, monitored, and exported as `PORT`.
    pub port: u16,
}

impl StartAppParams {
    pub fn new(
        process_guid: impl Into<String>,
        root_fs: impl Into<String>,
        start_command: impl Into<String>,
    ) -> Self {
        Self {
            process_guid: process_guid.into(),
            root_fs: root_fs.into(),
            start_command: start_command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            privileged: false,
            memory_mb: DEFAULT_MEMORY_MB,
            disk_mb: DEFAULT_DISK_MB,
            port: DEFAULT_PORT,
        }
    }
}

pub const DEFAULT_MEMORY_MB: u32 = 128;
pub const DEFAULT_DISK_MB: u32 = 1024;
pub const DEFAULT_PORT: u16 = 8080;
