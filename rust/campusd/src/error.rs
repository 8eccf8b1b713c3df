//! Error type shared by the stores, repositories and list pipeline.
//!
//! Every variant maps to a stable wire code so IPC handlers can answer with
//! the usual `{ ok: false, error: { code, message } }` envelope.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No record with this id in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input failed deserialization or a form-level rule.
    #[error("{0}")]
    Invalid(String),

    /// A filter or sort referenced a field the entity does not have.
    #[error("unknown {kind} field: {field}")]
    UnknownField { kind: &'static str, field: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Wire code used in IPC error responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Invalid(_) | Self::UnknownField { .. } | Self::Json(_) => "bad_params",
            Self::Database(_) => "db_query_failed",
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => "internal",
        }
    }

    #[cfg(test)]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
