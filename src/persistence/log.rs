use std::sync::Arc;

use crate::broker::message::{Draft, Message, decode_batch, encode_batch};
use crate::persistence::Store;
use crate::utils::RelayError;

/// Counter key for message IDs.
pub const ID_KEY: &str = "id";
/// List key for the ordered message log.
pub const MESSAGES_KEY: &str = "messages";

/// Sequencer over a `Store`: the only way IDs are issued.
///
/// An ID taken by a failed append is never handed out again, so a failure
/// leaves a gap in the sequence rather than a duplicate.
#[derive(Clone)]
pub struct MessageLog {
    store: Arc<dyn Store>,
}

impl MessageLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Assign the next ID to `draft` and append it to the log.
    pub fn append(&self, draft: Draft) -> Result<Message, RelayError> {
        let id = self.store.increment_counter(ID_KEY)?;
        let message = draft.into_message(id);
        let record = encode_batch(std::slice::from_ref(&message))?;
        self.store.append_record(MESSAGES_KEY, &record)?;
        Ok(message)
    }

    /// All stored messages in append order.
    pub fn history(&self) -> Result<Vec<Message>, RelayError> {
        let mut messages = Vec::new();
        for record in self.store.records(MESSAGES_KEY)? {
            messages.extend(decode_batch(&record)?);
        }
        Ok(messages)
    }
}

impl std::fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLog")
            .field("store", &"dyn Store")
            .finish()
    }
}
