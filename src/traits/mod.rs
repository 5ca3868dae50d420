pub mod ledger;

pub use ledger::LedgerState;
pub use ledger::StateQueryIterator;
