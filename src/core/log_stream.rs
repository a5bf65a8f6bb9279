use std::io::BufRead;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use super::logs::{LogMessage, LogReader, LogStreamError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire frame on the newline-delimited JSON log stream.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogFrame {
    Log(LogFrameMessage),
    Error { message: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogFrameMessage {
    pub message: String,
    pub timestamp: i64,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_instance: String,
}

impl From<LogFrameMessage> for LogMessage {
    fn from(frame: LogFrameMessage) -> Self {
        LogMessage {
            message: frame.message.into_bytes(),
            timestamp: frame.timestamp,
            source_type: frame.source_type,
            source_instance: frame.source_instance,
        }
    }
}

pub fn decode_frame(line: &str) -> Result<LogFrame, serde_json::Error> {
    serde_json::from_str(line.trim())
}

/// Feed every frame read from `reader` to the callbacks until EOF or a read failure.
pub fn pump_frames<R: BufRead>(
    mut reader: R,
    on_message: &mut dyn FnMut(LogMessage),
    on_error: &mut dyn FnMut(LogStreamError),
) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                on_error(LogStreamError::Transport(err.to_string()));
                break;
            }
        }

        let raw = match std::str::from_utf8(&buf) {
            Ok(raw) => raw.trim_end_matches(['\n', '\r']),
            Err(err) => {
                warn!("dropping log frame with invalid UTF-8: {err}");
                on_error(LogStreamError::Decode(err.to_string()));
                continue;
            }
        };
        if raw.trim().is_empty() {
            continue;
        }

        match decode_frame(raw) {
            Ok(LogFrame::Log(frame)) => on_message(frame.into()),
            Ok(LogFrame::Error { message }) => on_error(LogStreamError::Remote(message)),
            Err(err) => {
                warn!("dropping undecodable log frame: {err}");
                on_error(LogStreamError::Decode(err.to_string()));
            }
        }
    }
}

/// Log reader consuming `GET <base>/tail/?app=<guid>` as newline-delimited JSON.
#[derive(Debug, Clone)]
pub struct HttpLogReader {
    base_url: String,
    agent: Agent,
}

impl HttpLogReader {
    pub fn new(base_url: impl Into<String>) -> Self {
        // No read timeout: a quiet app keeps the stream idle indefinitely.
        let agent = AgentBuilder::new().timeout_connect(CONNECT_TIMEOUT).build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn tail_url(&self) -> String {
        format!("{}/tail/", self.base_url)
    }
}

impl LogReader for HttpLogReader {
    fn tail_logs(
        &self,
        process_guid: &str,
        on_message: &mut dyn FnMut(LogMessage),
        on_error: &mut dyn FnMut(LogStreamError),
    ) {
        let url = self.tail_url();
        debug!("opening log stream {url} for {process_guid}");

        let response = match self.agent.get(&url).query("app", process_guid).call() {
            Ok(response) => response,
            Err(err) => {
                on_error(LogStreamError::Connect {
                    url,
                    message: err.to_string(),
                });
                return;
            }
        };

        pump_frames(
            std::io::BufReader::new(response.into_reader()),
            on_message,
            on_error,
        );
        debug!("log stream for {process_guid} closed");
    }
}
