//! Handlers behind each contract function. Each one is a single pass over
//! the ledger with no state of its own.

use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::error::{expect_args, ContractError};
use crate::traits::LedgerState;
use crate::types::{KeyRange, QueryResult, Tender};

use super::seed::{seed_key, seed_tenders};

/// Write the ten seed tenders at keys "1".."10", overwriting.
pub fn init_ledger<L: LedgerState + ?Sized>(ledger: &L) -> Result<Vec<u8>, ContractError> {
    for (i, tender) in seed_tenders().iter().enumerate() {
        let key = seed_key(i);
        let bytes = tender.to_bytes()?;
        ledger
            .put_state(&key, &bytes)
            .map_err(|source| ContractError::RecordFailed {
                key: key.clone(),
                source,
            })?;
        debug!("Added tender {}: {:?}", key, tender);
    }
    Ok(Vec::new())
}

/// Return the raw bytes stored at `args[0]`.
///
/// A failing read is reported as not found, same as an absent key.
pub fn query_tender<L: LedgerState + ?Sized>(
    ledger: &L,
    args: &[String],
) -> Result<Vec<u8>, ContractError> {
    expect_args(args, 1)?;
    let key = &args[0];

    let found = match ledger.get_state(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Reading tender {} failed, reporting not found: {:#}", key, e);
            None
        }
    };
    found.ok_or_else(|| ContractError::TenderNotFound(key.clone()))
}

/// Store `[key, type, size, timestamp, lots]` as a tender at `key`.
pub fn record_tender<L: LedgerState + ?Sized>(
    ledger: &L,
    args: &[String],
) -> Result<Vec<u8>, ContractError> {
    expect_args(args, 5)?;
    let key = &args[0];
    let tender = Tender::new(&*args[1], &*args[2], &*args[3], &*args[4]);

    let bytes = tender.to_bytes()?;
    ledger
        .put_state(key, &bytes)
        .map_err(|source| ContractError::RecordFailed {
            key: key.clone(),
            source,
        })?;
    debug!("Recorded tender {}: {:?}", key, tender);
    Ok(Vec::new())
}

/// Scan `range` and return a JSON array of `{"Key", "Record"}` objects in
/// ledger order.
pub fn query_all_tenders<L: LedgerState + ?Sized>(
    ledger: &L,
    range: &KeyRange,
) -> Result<Vec<u8>, ContractError> {
    let cursor = ledger
        .get_state_by_range(range)
        .map_err(ContractError::Ledger)?;

    let mut buffer = Vec::new();
    buffer.push(b'[');
    let mut written = 0usize;
    for item in cursor {
        let kv = item.map_err(ContractError::Ledger)?;
        let record: &RawValue = serde_json::from_slice(&kv.value)?;
        if written > 0 {
            buffer.push(b',');
        }
        serde_json::to_writer(
            &mut buffer,
            &QueryResult {
                key: &kv.key,
                record,
            },
        )?;
        written += 1;
    }
    buffer.push(b']');

    debug!(
        "queryAllTenders: {} entries\n{}",
        written,
        String::from_utf8_lossy(&buffer)
    );
    Ok(buffer)
}
