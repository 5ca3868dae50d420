use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};

use crate::traits::{LedgerState, StateQueryIterator};
use crate::types::KeyRange;

use super::memory::MemoryLedger;

/// Faults a [`MockLedger`] injects into its calls.
#[derive(Debug, Clone, Default)]
pub struct MockFaults {
    pub fail_get: bool,
    pub fail_put: bool,
    pub fail_range_open: bool,
    /// Yield this many items, then an error.
    pub fail_iteration_after: Option<usize>,
}

/// Mock ledger for testing: an in-memory ledger with fault injection and
/// call accounting.
#[derive(Clone, Default)]
pub struct MockLedger {
    pub inner: MemoryLedger,
    pub faults: Arc<Mutex<MockFaults>>,
    pub puts: Arc<AtomicUsize>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: MockFaults) -> Self {
        Self {
            faults: Arc::new(Mutex::new(faults)),
            ..Self::default()
        }
    }

    pub fn set_faults(&self, faults: MockFaults) {
        *self.faults.lock().unwrap() = faults;
    }

    /// Successful writes so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn faults(&self) -> MockFaults {
        self.faults.lock().unwrap().clone()
    }
}

impl LedgerState for MockLedger {
    fn name(&self) -> &'static str {
        "mock-ledger"
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.faults().fail_get {
            bail!("mock ledger: get_state({}) failed", key);
        }
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.faults().fail_put {
            bail!("mock ledger: put_state({}) failed", key);
        }
        self.inner.put_state(key, value)?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_state_by_range(&self, range: &KeyRange) -> Result<StateQueryIterator<'_>> {
        let faults = self.faults();
        if faults.fail_range_open {
            bail!("mock ledger: range query could not be opened");
        }
        let cursor = self.inner.get_state_by_range(range)?;
        match faults.fail_iteration_after {
            None => Ok(cursor),
            Some(n) => {
                let failure = anyhow!("mock ledger: cursor failed after {} items", n);
                let failing = cursor.take(n).chain(std::iter::once(Err(failure)));
                Ok(StateQueryIterator::new(failing))
            }
        }
    }
}
