use crate::types::Tender;

/// Ledger contents written by `initLedger`, in key order "1".."10".
pub fn seed_tenders() -> Vec<Tender> {
    vec![
        Tender::new("Service", "10", "1504054225", "100"),
        Tender::new("Supply", "10", "1504057825", "100"),
        Tender::new("Work", "10", "1493517025", "100"),
        Tender::new("Building", "10", "1496105425", "100"),
        Tender::new("Service", "10", "1493512301", "100"),
        Tender::new("Supply", "10", "1494117101", "100"),
        Tender::new("Work", "10", "1496104301", "100"),
        Tender::new("Service", "10", "1485066691", "100"),
        Tender::new("Building", "10", "1485153091", "100"),
        Tender::new("Service", "10", "1487745091", "100"),
    ]
}

/// Key of the seed record at zero-based `index`.
pub fn seed_key(index: usize) -> String {
    (index + 1).to_string()
}
