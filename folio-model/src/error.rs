use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidMedia(String),
    InvalidRecord { id: String, reason: String },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidMedia(msg) => write!(f, "invalid media: {msg}"),
            ModelError::InvalidRecord { id, reason } => {
                write!(f, "invalid media record {id}: {reason}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
