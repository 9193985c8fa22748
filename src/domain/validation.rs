use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidNumber { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidNumber { field, input } => {
                write!(f, "{field} must be a decimal number, got {input:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
