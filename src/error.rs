//! Error types for quarry.

use thiserror::Error;

use crate::ast::FuncOp;
use crate::types::{SqlType, Value};

/// The main error type for quarry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Two binds share a name but declare unrelated types.
    #[error("cannot combine bind '{name}': incompatible types {existing} and {incoming}")]
    BindTypeConflict {
        name: String,
        existing: SqlType,
        incoming: SqlType,
    },

    /// Two binds share a name but carry different non-null values.
    #[error("cannot combine bind '{name}': incompatible values {existing} and {incoming}")]
    BindValueConflict {
        name: String,
        existing: Value,
        incoming: Value,
    },

    /// An operator reached the renderer with no registered template.
    /// This is a configuration defect, not bad user input.
    #[error("no template registered for operator {0}")]
    UnknownTemplate(FuncOp),

    /// A value was rebound under a name the statement never declared.
    #[error("unknown bind name: '{0}'")]
    UnknownBindName(String),

    /// A statement was executed while a declared bind still had no
    /// value.
    #[error("bind '{0}' has no value")]
    MissingBindValue(String),

    /// `fetch_one` saw zero rows or more than one.
    #[error("expected exactly one row, got {got}")]
    NotExactlyOneRow { got: usize },

    #[error("connection error: {0}")]
    Connection(String),
}

impl Error {
    /// Create a connection error from a driver-side failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
