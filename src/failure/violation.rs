use std::fmt;

/// Misuse of the API itself, as opposed to a recorded validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A failure message was empty or contained only whitespace.
    BlankMessage,
    /// A validated value was given an empty name or one containing whitespace.
    InvalidName { name: String },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankMessage => f.write_str("failure message may not be blank"),
            Self::InvalidName { name } if name.is_empty() => f.write_str("name may not be empty"),
            Self::InvalidName { name } => {
                write!(f, "name may not contain whitespace.\nactual: {name:?}")
            }
        }
    }
}

impl std::error::Error for ContractViolation {}
