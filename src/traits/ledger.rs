use anyhow::Result;

use crate::types::{KeyRange, KeyValue};

/// Key-value world state the contract reads and writes.
///
/// Implementations own consistency and durability; the contract only relies
/// on point reads, point writes, and ordered range scans.
pub trait LedgerState: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &'static str;

    /// Read the value stored at `key`, `None` if absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing whatever was there.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Open a forward cursor over `range` in ascending byte-wise key order.
    fn get_state_by_range(&self, range: &KeyRange) -> Result<StateQueryIterator<'_>>;
}

type Items<'a> = Box<dyn Iterator<Item = Result<KeyValue>> + 'a>;
type OnClose<'a> = Box<dyn FnOnce() + 'a>;

/// Cursor over the result of a range query.
///
/// Backend resources held by the cursor are released when it is closed or
/// dropped, whichever happens first, so every exit path of a scan releases
/// them.
pub struct StateQueryIterator<'a> {
    items: Items<'a>,
    on_close: Option<OnClose<'a>>,
}

impl<'a> StateQueryIterator<'a> {
    pub fn new<I>(items: I) -> Self
    where
        I: Iterator<Item = Result<KeyValue>> + 'a,
    {
        Self {
            items: Box::new(items),
            on_close: None,
        }
    }

    /// Run `f` exactly once when the cursor is released.
    pub fn with_close_hook<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}

impl Iterator for StateQueryIterator<'_> {
    type Item = Result<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

impl Drop for StateQueryIterator<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
