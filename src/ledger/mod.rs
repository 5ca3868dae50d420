pub mod memory;
pub mod mock;
pub mod rocks;
pub mod variant;

pub use memory::MemoryLedger;
pub use mock::{MockFaults, MockLedger};
pub use rocks::RocksDbLedger;
pub use variant::LedgerVariant;
