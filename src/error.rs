//! Error types for the NFC-e import pipeline
//!
//! Every failure that can happen while reading, parsing or persisting a single
//! document is expressed as an [`ImportError`]. The batch driver turns these into
//! per-document outcomes, so none of them ever aborts a whole batch.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

/// Extra information attached to persistence failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorContext {
    pub table: Option<&'static str>,
    pub detail: Option<String>,
    pub constraint: Option<String>,
}

impl ErrorContext {
    pub fn with_table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("invalid access key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("persistence failure: {reason}")]
    PersistenceFailure {
        reason: String,
        context: ErrorContext,
    },

    #[error("could not read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Coarse classification of an [`ImportError`], used in batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MalformedDocument,
    InvalidKey,
    PersistenceFailure,
    Unreadable,
    Configuration,
    Validation,
}

impl ImportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ImportError::MalformedDocument {
            reason: reason.into(),
        }
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ImportError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence(reason: impl Into<String>) -> Self {
        ImportError::PersistenceFailure {
            reason: reason.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ImportError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ImportError::Validation(message.into())
    }

    /// Enrich the context of a persistence failure. Other variants pass through untouched.
    pub fn with_context<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorContext) -> ErrorContext,
    {
        match self {
            ImportError::PersistenceFailure { reason, context } => {
                ImportError::PersistenceFailure {
                    reason,
                    context: f(context),
                }
            }
            other => other,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ImportError::MalformedDocument { .. } => FailureKind::MalformedDocument,
            ImportError::InvalidKey { .. } => FailureKind::InvalidKey,
            ImportError::PersistenceFailure { .. } => FailureKind::PersistenceFailure,
            ImportError::Unreadable { .. } => FailureKind::Unreadable,
            ImportError::Configuration(_) => FailureKind::Configuration,
            ImportError::Validation(_) => FailureKind::Validation,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ImportError::PersistenceFailure { context, .. } => Some(context),
            _ => None,
        }
    }
}

impl From<DieselError> for ImportError {
    fn from(err: DieselError) -> Self {
        if let DieselError::DatabaseError(kind, info) = &err {
            let reason = match kind {
                DatabaseErrorKind::UniqueViolation => {
                    format!("unique constraint violated: {}", info.message())
                }
                DatabaseErrorKind::ForeignKeyViolation => {
                    format!("foreign key violated: {}", info.message())
                }
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                    format!("row rejected by the database: {}", info.message())
                }
                DatabaseErrorKind::SerializationFailure => {
                    "transaction aborted due to concurrent access".to_string()
                }
                _ => info.message().to_string(),
            };

            let mut context = ErrorContext::default();
            if let Some(details) = info.details() {
                context = context.with_detail(details);
            }
            if let Some(constraint) = info.constraint_name() {
                context = context.with_constraint(constraint);
            }
            if let Some(table) = info.table_name() {
                context.detail.get_or_insert_with(|| format!("table {}", table));
            }

            return ImportError::PersistenceFailure { reason, context };
        }

        ImportError::PersistenceFailure {
            reason: err.to_string(),
            context: ErrorContext::default(),
        }
    }
}

impl From<r2d2::Error> for ImportError {
    fn from(err: r2d2::Error) -> Self {
        ImportError::persistence(format!("failed to get database connection: {}", err))
    }
}
