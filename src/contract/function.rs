use std::fmt;
use std::str::FromStr;

use crate::error::ContractError;

/// Every function the contract answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    InitLedger,
    QueryTender,
    RecordTender,
    QueryAllTenders,
}

/// Wire name of each function.
pub const FUNCTION_TABLE: [(&str, ContractFunction); 4] = [
    ("initLedger", ContractFunction::InitLedger),
    ("queryTender", ContractFunction::QueryTender),
    ("recordTender", ContractFunction::RecordTender),
    ("queryAllTenders", ContractFunction::QueryAllTenders),
];

impl ContractFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractFunction::InitLedger => "initLedger",
            ContractFunction::QueryTender => "queryTender",
            ContractFunction::RecordTender => "recordTender",
            ContractFunction::QueryAllTenders => "queryAllTenders",
        }
    }
}

impl FromStr for ContractFunction {
    type Err = ContractError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FUNCTION_TABLE
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, function)| *function)
            .ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
    }
}

impl fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_names() {
        for (wire, function) in FUNCTION_TABLE {
            assert_eq!(function.as_str(), wire);
            assert_eq!(wire.parse::<ContractFunction>().unwrap(), function);
        }
    }

    #[test]
    fn test_unknown_function() {
        let err = "deleteTender".parse::<ContractFunction>().unwrap_err();
        assert!(matches!(err, ContractError::UnknownFunction(ref name) if name == "deleteTender"));
        assert_eq!(err.to_string(), "Invalid Smart Contract function name.");
    }

    #[test]
    fn test_match_is_exact() {
        assert!("QueryTender".parse::<ContractFunction>().is_err());
        assert!("queryTender ".parse::<ContractFunction>().is_err());
        assert!("changeTenderHolder".parse::<ContractFunction>().is_err());
        assert!("".parse::<ContractFunction>().is_err());
    }
}
