//! Tender contract: function routing and ledger handlers.
//!
//! - `function`: closed set of callable functions and their wire names
//! - `core`: `SmartContract`, the router
//! - `handlers`: one ledger pass per function
//! - `seed`: fixed records written by `initLedger`

pub mod core;
pub mod function;
pub mod handlers;
pub mod seed;

pub use core::SmartContract;
pub use function::{ContractFunction, FUNCTION_TABLE};
pub use seed::seed_tenders;
