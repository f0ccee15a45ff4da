//! Message definitions for the relay
//!
//! `Message` is the canonical wire/storage record. The same encoding is used
//! for the durable log and for broadcast: a JSON array holding exactly one
//! record, so readers of either side see a uniform shape.
//!
//! Notes on fields:
//! - `id`: assigned once by the message log at append time
//! - `name`, `email`, `topic`, `content`: client supplied, stored unescaped
//! - `date`: local receipt time as `MM/DD/YYYY HH:MM:SS`, set on ingestion

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::utils::RelayError;

/// `chrono` pattern for `Message::date`.
pub const DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub date: String,
    pub topic: String,
    pub content: String,
}

/// A submission as extracted by the HTTP layer. Absent fields are empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub content: String,
}

impl Submission {
    /// Fill every empty field from `fallback`. Used to merge a form body
    /// over the query string, body first.
    pub fn or(self, fallback: Submission) -> Submission {
        fn pick(primary: String, fallback: String) -> String {
            if primary.is_empty() { fallback } else { primary }
        }

        Submission {
            name: pick(self.name, fallback.name),
            email: pick(self.email, fallback.email),
            topic: pick(self.topic, fallback.topic),
            content: pick(self.content, fallback.content),
        }
    }
}

/// A message that has not been sequenced yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub date: String,
    pub topic: String,
    pub content: String,
}

impl Draft {
    /// Stamp a submission with its receipt time. An empty topic becomes
    /// `default_topic`.
    pub fn from_submission<Tz>(
        submission: Submission,
        received_at: &DateTime<Tz>,
        default_topic: &str,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let topic = if submission.topic.is_empty() {
            default_topic.to_string()
        } else {
            submission.topic
        };

        Self {
            name: submission.name,
            email: submission.email,
            date: received_at.format(DATE_FORMAT).to_string(),
            topic,
            content: submission.content,
        }
    }

    pub fn into_message(self, id: u64) -> Message {
        Message {
            id,
            name: self.name,
            email: self.email,
            date: self.date,
            topic: self.topic,
            content: self.content,
        }
    }
}

/// Encode records as one JSON array.
pub fn encode_batch(messages: &[Message]) -> Result<Vec<u8>, RelayError> {
    Ok(serde_json::to_vec(messages)?)
}

pub fn decode_batch(bytes: &[u8]) -> Result<Vec<Message>, RelayError> {
    Ok(serde_json::from_slice(bytes)?)
}
