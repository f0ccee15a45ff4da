//! The `persistence` module holds the durable side of the relay.
//!
//! `Store` is the storage seam: an atomic counter plus append-only record
//! lists, both addressed by fixed key names. `SledStore` implements it on an
//! embedded `sled` database, and `MessageLog` is the sequencer built on top
//! of it: every append takes the next ID and writes the encoded record.

pub mod log;
pub mod sled_store;

pub use log::{ID_KEY, MESSAGES_KEY, MessageLog};
pub use sled_store::SledStore;

use crate::utils::RelayError;

pub trait Store: Send + Sync {
    /// Atomically increment the counter at `key` and return the new value.
    /// A missing counter counts as zero.
    fn increment_counter(&self, key: &str) -> Result<u64, RelayError>;

    /// Append `record` to the tail of the list at `key`.
    fn append_record(&self, key: &str, record: &[u8]) -> Result<(), RelayError>;

    /// Every record in the list at `key`, oldest first.
    fn records(&self, key: &str) -> Result<Vec<Vec<u8>>, RelayError>;
}
