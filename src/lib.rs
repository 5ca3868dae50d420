// Library exports for testing and external use

pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod response;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use config::{BaseConfig, Command, LedgerType};
pub use contract::{ContractFunction, SmartContract};
pub use error::ContractError;
pub use gateway::HttpGateway;
pub use response::Response;
pub use traits::{LedgerState, StateQueryIterator};
pub use types::{ChaincodeInput, Key, KeyRange, KeyValue, QueryResult, Tender, TenderEntry};

// Re-export variant enums for convenience
pub use ledger::{LedgerVariant, MemoryLedger, MockLedger, RocksDbLedger};
