//! The contract itself: owns the ledger handle and routes invocations.

use tracing::{debug, info, warn};

use crate::error::ContractError;
use crate::response::Response;
use crate::traits::LedgerState;
use crate::types::{ChaincodeInput, KeyRange};

use super::function::ContractFunction;
use super::handlers;

/// Tender contract over a ledger backend.
pub struct SmartContract<L> {
    ledger: L,
    scan_range: KeyRange,
}

impl<L: LedgerState> SmartContract<L> {
    /// Contract scanning the historical `["0", "999")` range.
    pub fn new(ledger: L) -> Self {
        Self::with_scan_range(ledger, KeyRange::tender_default())
    }

    pub fn with_scan_range(ledger: L, scan_range: KeyRange) -> Self {
        Self { ledger, scan_range }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn scan_range(&self) -> &KeyRange {
        &self.scan_range
    }

    /// Instantiation hook. Leaves the ledger untouched; seeding is a
    /// separate `initLedger` call.
    pub fn init(&self) -> Response {
        info!("Contract instantiated on {} ledger", self.ledger.name());
        Response::success(Vec::new())
    }

    /// Entry point for a host-supplied argument vector.
    pub fn invoke_input(&self, input: &ChaincodeInput) -> Response {
        let (function, args) = input.function_and_parameters();
        self.invoke(function, args)
    }

    /// Run `function` and fold the outcome into a [`Response`].
    pub fn invoke(&self, function: &str, args: &[String]) -> Response {
        let result = self.execute(function, args);
        match &result {
            Ok(payload) => info!("{} succeeded ({} byte payload)", function, payload.len()),
            Err(e) => warn!("{} failed: {}", function, e),
        }
        result.into()
    }

    /// Parse `function` and dispatch to its handler.
    pub fn execute(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ContractError> {
        debug!("invoke {} with {} args", function, args.len());
        let function: ContractFunction = function.parse()?;
        self.dispatch(function, args)
    }

    pub fn dispatch(
        &self,
        function: ContractFunction,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        match function {
            ContractFunction::InitLedger => handlers::init_ledger(&self.ledger),
            ContractFunction::QueryTender => handlers::query_tender(&self.ledger, args),
            ContractFunction::RecordTender => handlers::record_tender(&self.ledger, args),
            ContractFunction::QueryAllTenders => {
                handlers::query_all_tenders(&self.ledger, &self.scan_range)
            }
        }
    }
}
