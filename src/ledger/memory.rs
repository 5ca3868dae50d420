use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::traits::{LedgerState, StateQueryIterator};
use crate::types::{KeyRange, KeyValue};

/// In-process ledger backed by an ordered map.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    state: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of range cursors handed out and not yet released.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the whole state, in key order.
    #[cfg(test)]
    pub fn snapshot(&self) -> Result<Vec<KeyValue>> {
        let state = self.state.read().map_err(|_| anyhow!("ledger lock poisoned"))?;
        Ok(state
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }
}

impl LedgerState for MemoryLedger {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let state = self.state.read().map_err(|_| anyhow!("ledger lock poisoned"))?;
        Ok(state.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut state = self.state.write().map_err(|_| anyhow!("ledger lock poisoned"))?;
        state.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state_by_range(&self, range: &KeyRange) -> Result<StateQueryIterator<'_>> {
        let state = self.state.read().map_err(|_| anyhow!("ledger lock poisoned"))?;

        // Seek to the lower bound, then stop at the first key outside the range.
        let lower = range.start.as_deref().map_or(Bound::Unbounded, Bound::Included);
        let items: Vec<Result<KeyValue>> = state
            .range::<str, _>((lower, Bound::Unbounded))
            .take_while(|(k, _)| range.contains(k))
            .map(|(k, v)| {
                Ok(KeyValue {
                    key: k.clone(),
                    value: v.clone(),
                })
            })
            .collect();

        let open = Arc::clone(&self.open_iterators);
        open.fetch_add(1, Ordering::SeqCst);
        debug!("memory ledger: range cursor opened over {} entries", items.len());

        Ok(StateQueryIterator::new(items.into_iter()).with_close_hook(move || {
            open.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(keys: &[&str]) -> MemoryLedger {
        let ledger = MemoryLedger::new();
        for key in keys {
            ledger.put_state(key, key.as_bytes()).unwrap();
        }
        ledger
    }

    fn keys_in(ledger: &MemoryLedger, range: &KeyRange) -> Vec<String> {
        ledger
            .get_state_by_range(range)
            .unwrap()
            .map(|kv| kv.unwrap().key)
            .collect()
    }

    #[test]
    fn test_get_put_overwrite() -> Result<()> {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.get_state("a")?, None);

        ledger.put_state("a", b"one")?;
        ledger.put_state("a", b"two")?;
        assert_eq!(ledger.get_state("a")?, Some(b"two".to_vec()));
        assert_eq!(ledger.len(), 1);
        Ok(())
    }

    #[test]
    fn test_range_is_half_open_and_ordered() {
        let ledger = seeded(&["0", "1", "10", "2", "999", "abc"]);
        let keys = keys_in(&ledger, &KeyRange::tender_default());
        assert_eq!(keys, vec!["0", "1", "10", "2"]);
    }

    #[test]
    fn test_range_unbounded() {
        let ledger = seeded(&["b", "a", "c"]);
        assert_eq!(keys_in(&ledger, &KeyRange::all()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_range_inverted_is_empty() {
        let ledger = seeded(&["a", "b"]);
        let range = KeyRange::from_bounds("b", "a");
        assert!(keys_in(&ledger, &range).is_empty());
        let range = KeyRange::from_bounds("a", "a");
        assert!(keys_in(&ledger, &range).is_empty());
    }

    #[test]
    fn test_cursor_release_tracked() {
        let ledger = seeded(&["1", "2"]);
        let mut iter = ledger.get_state_by_range(&KeyRange::all()).unwrap();
        assert_eq!(ledger.open_iterators(), 1);
        iter.next();
        drop(iter);
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn test_clones_share_state() -> Result<()> {
        let ledger = MemoryLedger::new();
        let other = ledger.clone();
        other.put_state("k", b"v")?;
        assert_eq!(ledger.get_state("k")?, Some(b"v".to_vec()));
        Ok(())
    }
}
