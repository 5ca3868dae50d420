use thiserror::Error;

/// Failures a contract invocation can end with. Every variant is terminal
/// for the call; `Display` is the message handed back to the caller.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Incorrect number of arguments. Expecting {expected}")]
    InvalidArgumentCount { expected: usize, got: usize },

    #[error("Could not locate tender")]
    TenderNotFound(String),

    #[error("Failed to record Tender: {key}")]
    RecordFailed {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    Ledger(anyhow::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid Smart Contract function name.")]
    UnknownFunction(String),
}

impl ContractError {
    pub fn is_argument_error(&self) -> bool {
        matches!(self, ContractError::InvalidArgumentCount { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::TenderNotFound(_))
    }
}

/// Fail unless exactly `expected` arguments were passed.
pub fn expect_args(args: &[String], expected: usize) -> Result<(), ContractError> {
    if args.len() != expected {
        return Err(ContractError::InvalidArgumentCount {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ContractError::InvalidArgumentCount { expected: 5, got: 2 };
        assert_eq!(err.to_string(), "Incorrect number of arguments. Expecting 5");

        let err = ContractError::RecordFailed {
            key: "42".into(),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(err.to_string(), "Failed to record Tender: 42");

        let err = ContractError::Ledger(anyhow::anyhow!("iterator exhausted"));
        assert_eq!(err.to_string(), "iterator exhausted");

        let err = ContractError::UnknownFunction("deleteTender".into());
        assert_eq!(err.to_string(), "Invalid Smart Contract function name.");
    }

    #[test]
    fn test_expect_args() {
        assert!(expect_args(&["a".into()], 1).is_ok());
        let err = expect_args(&[], 1).unwrap_err();
        assert!(err.is_argument_error());
    }
}
