use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rocksdb::{Direction, IteratorMode, Options, ReadOptions, DB};
use tracing::debug;

use crate::traits::{LedgerState, StateQueryIterator};
use crate::types::{KeyRange, KeyValue};

/// Persistent ledger on RocksDB.
///
/// Keys are stored as their UTF-8 bytes, so RocksDB's default byte-wise
/// comparator gives the same ordering as the in-memory ledger.
#[derive(Clone)]
pub struct RocksDbLedger {
    db: Arc<DB>,
}

impl RocksDbLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("failed to open RocksDB ledger at {}", path.display()))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn decode(raw_key: &[u8], value: &[u8]) -> Result<KeyValue> {
        let key = std::str::from_utf8(raw_key)
            .context("ledger key is not valid UTF-8")?
            .to_string();
        Ok(KeyValue {
            key,
            value: value.to_vec(),
        })
    }
}

impl LedgerState for RocksDbLedger {
    fn name(&self) -> &'static str {
        "rocksdb"
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key.as_bytes())?)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    fn get_state_by_range(&self, range: &KeyRange) -> Result<StateQueryIterator<'_>> {
        let mut read_opts = ReadOptions::default();
        if let Some(end) = &range.end {
            read_opts.set_iterate_upper_bound(end.as_bytes().to_vec());
        }

        let mode = match &range.start {
            Some(start) => IteratorMode::From(start.as_bytes(), Direction::Forward),
            None => IteratorMode::Start,
        };
        let iter = self.db.iterator_opt(mode, read_opts);
        debug!("rocksdb ledger: range cursor opened at {:?}", range.start);

        let items = iter.map(|item| -> Result<KeyValue> {
            let (raw_key, value) = item?;
            Self::decode(&raw_key, &value)
        });

        Ok(StateQueryIterator::new(items).with_close_hook(|| {
            debug!("rocksdb ledger: range cursor released");
        }))
    }
}
