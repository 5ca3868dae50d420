use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::types::KeyRange;

/// Which ledger backend holds the world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    /// Process-local, lost on exit.
    Memory,
    /// Persistent RocksDB database at `storage_path`.
    #[value(name = "rocksdb")]
    #[serde(rename = "rocksdb")]
    RocksDb,
    /// In-memory with fault injection. Test-only: not selectable from the
    /// command line or environment.
    #[value(skip)]
    Mock,
}

/// Base configuration for the app.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dten", version, about = "Tender ledger contract")]
pub struct BaseConfig {
    /// Ledger backend.
    #[arg(long, value_enum, env = "DTEN_LEDGER", default_value = "memory", global = true)]
    pub ledger: LedgerType,

    /// Path for persistent storage (RocksDB).
    #[arg(long, env = "DTEN_STORAGE_PATH", default_value = "./data", global = true)]
    pub storage_path: String,

    /// Inclusive lower bound of `queryAllTenders`; empty means unbounded.
    #[arg(long, env = "DTEN_SCAN_START", default_value = "0", global = true)]
    pub scan_start: String,

    /// Exclusive upper bound of `queryAllTenders`; empty means unbounded.
    #[arg(long, env = "DTEN_SCAN_END", default_value = "999", global = true)]
    pub scan_end: String,

    #[command(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one contract function and print its payload.
    Invoke {
        /// Function name, e.g. `queryTender`.
        function: String,
        /// Function arguments.
        args: Vec<String>,
    },
    /// Serve the HTTP gateway.
    Serve {
        #[arg(long, env = "DTEN_BIND_ADDR", default_value = "127.0.0.1:3000")]
        bind_addr: String,
    },
}

impl BaseConfig {
    pub fn scan_range(&self) -> KeyRange {
        KeyRange::from_bounds(&self.scan_start, &self.scan_end)
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            ledger: LedgerType::Memory,
            storage_path: "./data".to_string(),
            scan_start: "0".to_string(),
            scan_end: "999".to_string(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scan_range_matches_tender_range() {
        assert_eq!(BaseConfig::default().scan_range(), KeyRange::tender_default());
    }

    #[test]
    fn test_parse_invoke() {
        let config = BaseConfig::try_parse_from([
            "dten",
            "--ledger",
            "rocksdb",
            "--storage-path",
            "/tmp/ledger",
            "invoke",
            "recordTender",
            "11",
            "Work",
            "5",
            "1500000000",
            "20",
        ])
        .unwrap();
        assert_eq!(config.ledger, LedgerType::RocksDb);
        assert_eq!(config.storage_path, "/tmp/ledger");
        match config.command {
            Some(Command::Invoke { function, args }) => {
                assert_eq!(function, "recordTender");
                assert_eq!(args.len(), 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mock_ledger_not_selectable() {
        assert!(BaseConfig::try_parse_from(["dten", "--ledger", "mock", "serve"]).is_err());
        let config = BaseConfig::try_parse_from(["dten", "--ledger", "memory", "serve"]).unwrap();
        assert_eq!(config.ledger, LedgerType::Memory);
    }

    #[test]
    fn test_parse_open_scan_bounds() {
        let config =
            BaseConfig::try_parse_from(["dten", "--scan-start", "", "--scan-end", "", "serve"])
                .unwrap();
        assert_eq!(config.scan_range(), KeyRange::all());
    }
}
