//! Core Lattice library API surface.

pub mod app_runner;
pub mod log_stream;
pub mod logs;
pub mod options;

pub use app_runner::AppRunner;
pub use log_stream::HttpLogReader;
pub use logs::{LogMessage, LogReader, LogStreamError, LogTail, LogUpdate};
pub use options::StartAppParams;
