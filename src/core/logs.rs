//! Live log subscriptions.
//!
//! A [`LogReader`] pushes events through two callbacks for as long as the
//! underlying stream stays open. [`LogTail`] runs a reader on its own thread and
//! re-exposes those callbacks as one ordered channel, so the caller can keep
//! doing other work (or simply block on the channel) while events arrive.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use async_channel::{Receiver, RecvError};
use thiserror::Error;

/// One log line emitted by an app instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub message: Vec<u8>,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    /// Emitter category, e.g. `APP`, `RTR`, `HEALTH`.
    pub source_type: String,
    /// Instance index or identifier within the source.
    pub source_instance: String,
}

impl LogMessage {
    pub fn new(
        message: impl Into<Vec<u8>>,
        timestamp: i64,
        source_type: impl Into<String>,
        source_instance: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            source_type: source_type.into(),
            source_instance: source_instance.into(),
        }
    }

    /// Message body with invalid UTF-8 replaced.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}

/// Stream-level error. Reported to the consumer; never ends the subscription by itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogStreamError {
    /// Error frame pushed by the log server.
    #[error("{0}")]
    Remote(String),
    #[error("failed to decode log frame: {0}")]
    Decode(String),
    #[error("log stream interrupted: {0}")]
    Transport(String),
    #[error("failed to connect to log stream at {url}: {message}")]
    Connect { url: String, message: String },
}

/// Source of live log events for one process guid.
pub trait LogReader: Send + Sync {
    /// Subscribe to `process_guid` and invoke the callbacks in delivery order.
    ///
    /// Blocks until the stream is closed by the server or the transport fails.
    fn tail_logs(
        &self,
        process_guid: &str,
        on_message: &mut dyn FnMut(LogMessage),
        on_error: &mut dyn FnMut(LogStreamError),
    );
}

impl<T: LogReader + ?Sized> LogReader for Arc<T> {
    fn tail_logs(
        &self,
        process_guid: &str,
        on_message: &mut dyn FnMut(LogMessage),
        on_error: &mut dyn FnMut(LogStreamError),
    ) {
        (**self).tail_logs(process_guid, on_message, on_error)
    }
}

/// Item delivered by a [`LogTail`], in the order the reader produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogUpdate {
    Message(LogMessage),
    Error(LogStreamError),
}

/// Running subscription backed by a dedicated reader thread.
///
/// The channel closes once the reader returns. Dropping (or [`close`](Self::close)-ing)
/// the tail stops delivery; the reader thread is detached and exits with its stream.
pub struct LogTail {
    process_guid: String,
    receiver: Receiver<LogUpdate>,
    _reader: JoinHandle<()>,
}

impl LogTail {
    pub fn spawn<R>(reader: R, process_guid: impl Into<String>) -> Self
    where
        R: LogReader + 'static,
    {
        let process_guid = process_guid.into();
        // Capacity 1: the reader is paced by the consumer instead of buffering ahead.
        let (sender, receiver) = async_channel::bounded(1);

        let guid = process_guid.clone();
        let handle = thread::spawn(move || {
            reader.tail_logs(
                &guid,
                &mut |message| {
                    let _ = sender.send_blocking(LogUpdate::Message(message));
                },
                &mut |error| {
                    let _ = sender.send_blocking(LogUpdate::Error(error));
                },
            );
        });

        Self {
            process_guid,
            receiver,
            _reader: handle,
        }
    }

    pub fn process_guid(&self) -> &str {
        &self.process_guid
    }

    /// Block for the next update; `None` once the stream has ended or been closed.
    pub fn recv(&self) -> Option<LogUpdate> {
        match self.receiver.recv_blocking() {
            Ok(update) => Some(update),
            Err(RecvError) => None,
        }
    }

    /// Channel handle for callers that want to poll or select themselves.
    pub fn updates(&self) -> Receiver<LogUpdate> {
        self.receiver.clone()
    }

    /// Stop delivery of further updates.
    pub fn close(&self) {
        self.receiver.close();
    }

    pub fn iter(&self) -> impl Iterator<Item = LogUpdate> + '_ {
        std::iter::from_fn(move || self.recv())
    }
}
