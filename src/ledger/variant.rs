use anyhow::Result;
use tracing::info;

use crate::config::{BaseConfig, LedgerType};
use crate::traits::{LedgerState, StateQueryIterator};
use crate::types::KeyRange;

use super::{memory::MemoryLedger, mock::MockLedger, rocks::RocksDbLedger};

/// Enum representing all possible ledger backends.
#[derive(Clone)]
pub enum LedgerVariant {
    Memory(MemoryLedger),
    RocksDb(RocksDbLedger),
    Mock(MockLedger),
}

impl LedgerVariant {
    /// Open the ledger backend selected by the configuration.
    pub fn open(config: &BaseConfig) -> Result<Self> {
        let ledger = match config.ledger {
            LedgerType::Memory => LedgerVariant::Memory(MemoryLedger::new()),
            LedgerType::RocksDb => {
                LedgerVariant::RocksDb(RocksDbLedger::open(&config.storage_path)?)
            }
            LedgerType::Mock => LedgerVariant::Mock(MockLedger::new()),
        };
        info!("Ledger backend: {}", ledger.name());
        Ok(ledger)
    }
}

impl LedgerState for LedgerVariant {
    fn name(&self) -> &'static str {
        match self {
            LedgerVariant::Memory(inner) => inner.name(),
            LedgerVariant::RocksDb(inner) => inner.name(),
            LedgerVariant::Mock(inner) => inner.name(),
        }
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            LedgerVariant::Memory(inner) => inner.get_state(key),
            LedgerVariant::RocksDb(inner) => inner.get_state(key),
            LedgerVariant::Mock(inner) => inner.get_state(key),
        }
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        match self {
            LedgerVariant::Memory(inner) => inner.put_state(key, value),
            LedgerVariant::RocksDb(inner) => inner.put_state(key, value),
            LedgerVariant::Mock(inner) => inner.put_state(key, value),
        }
    }

    fn get_state_by_range(&self, range: &KeyRange) -> Result<StateQueryIterator<'_>> {
        match self {
            LedgerVariant::Memory(inner) => inner.get_state_by_range(range),
            LedgerVariant::RocksDb(inner) => inner.get_state_by_range(range),
            LedgerVariant::Mock(inner) => inner.get_state_by_range(range),
        }
    }
}
