//! Persistence layer backed by `sled`
//!
//! Counters live in the default tree as big-endian `u64` values and are
//! updated with a compare-and-swap loop (`update_and_fetch`), so concurrent
//! increments never observe the same value. A counter at `u64::MAX` is left
//! as it is and refuses further increments. Each record list is its own tree
//! keyed by `Db::generate_id`, which is monotonic, so iteration yields append
//! order.
//!
//! The `Db` handle is opened once; clones share the same database.

use sled::Db;

use crate::config::StorageSettings;
use crate::persistence::Store;
use crate::utils::RelayError;

#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create the database at `settings.path`.
    pub fn open(settings: &StorageSettings) -> Result<Self, RelayError> {
        let flush_every_ms = match settings.flush_every_ms {
            0 => None,
            ms => Some(ms),
        };
        let db = sled::Config::new()
            .path(&settings.path)
            .flush_every_ms(flush_every_ms)
            .open()?;
        Ok(Self { db })
    }

    /// Flush dirty buffers to disk, returning the number of bytes written.
    pub fn flush(&self) -> Result<usize, RelayError> {
        Ok(self.db.flush()?)
    }
}

fn decode_counter(bytes: &[u8]) -> Option<u64> {
    <[u8; 8]>::try_from(bytes).ok().map(u64::from_be_bytes)
}

impl Store for SledStore {
    fn increment_counter(&self, key: &str) -> Result<u64, RelayError> {
        let mut exhausted = false;
        let updated = self.db.update_and_fetch(key, |old| {
            let current = old.and_then(decode_counter).unwrap_or(0);
            match current.checked_add(1) {
                Some(next) => {
                    exhausted = false;
                    Some(next.to_be_bytes().to_vec())
                }
                None => {
                    exhausted = true;
                    old.map(<[u8]>::to_vec)
                }
            }
        })?;

        if exhausted {
            return Err(RelayError::StorageUnavailable(format!(
                "counter '{key}' is exhausted"
            )));
        }

        updated
            .as_deref()
            .and_then(decode_counter)
            .ok_or_else(|| RelayError::StorageUnavailable(format!("counter '{key}' is corrupt")))
    }

    fn append_record(&self, key: &str, record: &[u8]) -> Result<(), RelayError> {
        let list = self.db.open_tree(key)?;
        let position = self.db.generate_id()?;
        list.insert(position.to_be_bytes(), record)?;
        Ok(())
    }

    fn records(&self, key: &str) -> Result<Vec<Vec<u8>>, RelayError> {
        let list = self.db.open_tree(key)?;
        list.iter()
            .values()
            .map(|value| value.map(|v| v.to_vec()).map_err(RelayError::from))
            .collect()
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .finish()
    }
}
