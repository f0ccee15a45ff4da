//! Ingestion engine
//!
//! `Relay` turns a parsed submission into a stored, broadcast message:
//! stamp the receipt time, append to the message log, then publish.
//!
//! - A failed append aborts the submission and nothing is published.
//! - A failed publish is logged and swallowed; the message is already durable.
//! - Append and publish run under one lock, so messages reach the broadcast
//!   transport in ID order.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, TimeZone};
use tracing::{error, info};

use crate::broker::message::{Draft, Message, Submission};
use crate::broker::publisher::Publisher;
use crate::config::RelaySettings;
use crate::persistence::MessageLog;
use crate::utils::RelayError;

#[derive(Debug)]
pub struct Relay {
    log: MessageLog,
    publisher: Publisher,
    channel: String,
    default_topic: String,
    ingest: Mutex<()>,
}

impl Relay {
    pub fn new(log: MessageLog, publisher: Publisher, settings: &RelaySettings) -> Self {
        Self {
            log,
            publisher,
            channel: settings.channel.clone(),
            default_topic: settings.default_topic.clone(),
            ingest: Mutex::new(()),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Store and broadcast a submission received now.
    pub fn submit(&self, submission: Submission) -> Result<Message, RelayError> {
        self.submit_at(submission, &Local::now())
    }

    pub fn submit_at<Tz>(
        &self,
        submission: Submission,
        received_at: &DateTime<Tz>,
    ) -> Result<Message, RelayError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let draft = Draft::from_submission(submission, received_at, &self.default_topic);

        let _guard = self.ingest.lock().unwrap_or_else(PoisonError::into_inner);

        let message = self.log.append(draft).inspect_err(|e| {
            error!("Failed to store message: {e}");
        })?;
        info!(id = message.id, topic = %message.topic, "Stored message");

        if let Err(e) = self.publisher.publish(&self.channel, &message) {
            error!(id = message.id, channel = %self.channel, "Failed to publish message: {e}");
        }

        Ok(message)
    }
}
