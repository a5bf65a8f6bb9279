use std::io::Write;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::Result;
use crate::cli::LogsArgs;
use crate::core::logs::{LogMessage, LogReader, LogStreamError, LogTail, LogUpdate};

use super::common::{incorrect_usage, validate_app_name};
use super::display::{CYAN, YELLOW, colorize};

const USAGE: &str = "ltc logs APP_NAME";

/// Renders log events as `DD Mon HH:MM [TYPE|INSTANCE] message`.
#[derive(Debug, Clone, Copy)]
pub struct LogFormatter {
    offset: UtcOffset,
    color: bool,
}

impl LogFormatter {
    pub fn new(offset: UtcOffset, color: bool) -> Self {
        Self { offset, color }
    }

    pub fn format_message(&self, message: &LogMessage) -> String {
        let timestamp = colorize(&self.format_timestamp(message.timestamp), CYAN, self.color);
        let source_type = colorize(&message.source_type, YELLOW, self.color);
        let source_instance = colorize(&message.source_instance, YELLOW, self.color);
        format!(
            "{timestamp} [{source_type}|{source_instance}] {}\n",
            message.text()
        )
    }

    pub fn format_error(&self, error: &LogStreamError) -> String {
        format!("{error}\n")
    }

    pub fn format_update(&self, update: &LogUpdate) -> String {
        match update {
            LogUpdate::Message(message) => self.format_message(message),
            LogUpdate::Error(error) => self.format_error(error),
        }
    }

    fn format_timestamp(&self, nanos: i64) -> String {
        let format = format_description!("[day] [month repr:short] [hour]:[minute]");
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
            .ok()
            .and_then(|at| at.to_offset(self.offset).format(&format).ok())
            .unwrap_or_else(|| nanos.to_string())
    }
}

/// Tail `APP_NAME` and write every update to `out` until the stream closes.
pub fn handle_logs<R>(
    args: LogsArgs,
    reader: R,
    formatter: &LogFormatter,
    out: &mut dyn Write,
) -> Result<()>
where
    R: LogReader + 'static,
{
    let name = match validate_app_name(args.app_name.as_deref()) {
        Ok(name) => name,
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };

    writeln!(out, "Tailing logs for {name}. Press Ctrl-C to stop.")?;
    out.flush()?;

    let tail = LogTail::spawn(reader, name);
    for update in tail.iter() {
        out.write_all(formatter.format_update(&update).as_bytes())?;
        out.flush()?;
    }
    Ok(())
}
