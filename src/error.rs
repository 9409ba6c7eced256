use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum MbrIndexError {
    #[error("Invalid index parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, MbrIndexError>;
