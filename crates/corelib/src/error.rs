//! Core error type (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("no selectable object with id {0}")]
    UnknownObject(u32),
    #[error("object id {0} is used more than once")]
    DuplicateId(u32),
}

pub type CoreResult<T> = Result<T, CoreError>;
