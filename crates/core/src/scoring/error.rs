use crate::scoring::Rule;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    InvalidAmount { field: String, value: String },
    InvalidDate { value: String },
    InvalidTime { value: String },
    /// Every rule that failed while scoring one receipt, in rule order.
    InvalidReceipt(Vec<RuleFailure>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule: Rule,
    pub error: ScoringError,
}

impl ScoringError {
    pub fn invalid_amount(field: impl Into<String>, value: &str) -> Self {
        Self::InvalidAmount {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub fn failed_rules(&self) -> Vec<Rule> {
        match self {
            Self::InvalidReceipt(failures) => failures.iter().map(|f| f.rule).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount { field, value } => {
                write!(f, "{field} is not a valid amount: {value:?}")
            }
            Self::InvalidDate { value } => {
                write!(f, "purchaseDate must be YYYY-MM-DD (got {value:?})")
            }
            Self::InvalidTime { value } => {
                write!(f, "purchaseTime must be HH:MM (got {value:?})")
            }
            Self::InvalidReceipt(failures) => {
                write!(f, "invalid receipt data: ")?;
                for (idx, failure) in failures.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{failure}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rule: {}", self.rule.name(), self.error)
    }
}

impl std::error::Error for ScoringError {}
