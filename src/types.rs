use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Ledger key. Tender identifiers live only here, never inside the record.
pub type Key = String;

/// A tender record as persisted on the ledger.
///
/// Serialized as a flat JSON object with the four string fields below; all
/// four are always written, empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    #[serde(rename = "type")]
    pub tender_type: String,
    pub timestamp: String,
    pub size: String,
    pub lots: String,
}

impl Tender {
    /// Arguments follow `recordTender` order: type, size, timestamp, lots.
    pub fn new(
        tender_type: impl Into<String>,
        size: impl Into<String>,
        timestamp: impl Into<String>,
        lots: impl Into<String>,
    ) -> Self {
        Self {
            tender_type: tender_type.into(),
            timestamp: timestamp.into(),
            size: size.into(),
            lots: lots.into(),
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// One key/value pair yielded by a ledger range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Key,
    pub value: Vec<u8>,
}

/// Element of the `queryAllTenders` result array.
///
/// `Record` is the stored value embedded verbatim, not re-serialized.
#[derive(Debug, Serialize)]
pub struct QueryResult<'a> {
    #[serde(rename = "Key")]
    pub key: &'a str,
    #[serde(rename = "Record")]
    pub record: &'a RawValue,
}

/// Owned form of a scan element, used by clients and tests to read the
/// array back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TenderEntry {
    #[serde(rename = "Key")]
    pub key: Key,
    #[serde(rename = "Record")]
    pub record: Tender,
}

/// Half-open key interval `[start, end)`. `None` leaves that side open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyRange {
    pub start: Option<Key>,
    pub end: Option<Key>,
}

impl KeyRange {
    /// Unbounded on both sides.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from host-style bounds where an empty string means unbounded.
    pub fn from_bounds(start: &str, end: &str) -> Self {
        let bound = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            start: bound(start),
            end: bound(end),
        }
    }

    /// The range `queryAllTenders` has always scanned: `["0", "999")`.
    ///
    /// Byte-wise ordering means any key sorting at or after "999" (including
    /// every key starting with a letter) is silently left out.
    pub fn tender_default() -> Self {
        Self::from_bounds("0", "999")
    }

    pub fn contains(&self, key: &str) -> bool {
        let above_start = self.start.as_deref().map_or(true, |s| key >= s);
        let below_end = self.end.as_deref().map_or(true, |e| key < e);
        above_start && below_end
    }
}

/// Raw invocation arguments as delivered by the host: the first element
/// names the function, the rest are its parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInput {
    pub args: Vec<String>,
}

impl ChaincodeInput {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn function_and_parameters(&self) -> (&str, &[String]) {
        match self.args.split_first() {
            Some((function, params)) => (function.as_str(), params),
            None => ("", &[]),
        }
    }
}
