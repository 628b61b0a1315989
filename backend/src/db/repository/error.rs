//! Error types for climb-store operations.
//!
//! Every adapter reports failures through [`RepositoryError`]. The attached
//! [`ErrorContext`] names the operation and, when one is at fault, the
//! session or request field involved.

use std::fmt;

use crate::models::SessionId;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// What a failed operation was working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Session(SessionId),
    /// Request field, e.g. `userName` or `climbs[2].Grade`.
    Field(String),
}

/// Where an error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub subject: Option<Subject>,
    pub details: Option<String>,
    /// Transient failure; `with_conn` retries these.
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn session(mut self, id: SessionId) -> Self {
        self.subject = Some(Subject::Session(id));
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.subject = Some(Subject::Field(name.into()));
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(op) = &self.operation {
            parts.push(format!("operation={}", op));
        }
        match &self.subject {
            Some(Subject::Session(id)) => parts.push(format!("session={}", id)),
            Some(Subject::Field(name)) => parts.push(format!("field={}", name)),
            None => {}
        }
        if let Some(details) = &self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Failure reported by a climb store.
///
/// The `Display` form is for logs; HTTP bodies use [`message`](Self::message)
/// and the context separately.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::result_large_err)]
pub enum RepositoryError {
    /// Store unreachable: pool creation, checkout, or a failed health check.
    #[error("climb store unreachable: {message} {context}")]
    ConnectionError { message: String, context: ErrorContext },

    #[error("climb query failed: {message} {context}")]
    QueryError { message: String, context: ErrorContext },

    #[error("no such row: {message} {context}")]
    NotFound { message: String, context: ErrorContext },

    /// Rejected input; nothing was written.
    #[error("rejected climb data: {message} {context}")]
    ValidationError { message: String, context: ErrorContext },

    #[error("bad store settings: {message} {context}")]
    ConfigurationError { message: String, context: ErrorContext },

    #[error("climb store bug: {message} {context}")]
    InternalError { message: String, context: ErrorContext },

    /// A batch or session update could not commit.
    #[error("write not committed: {message} {context}")]
    TransactionError { message: String, context: ErrorContext },

    #[error("climb store too slow: {message} {context}")]
    TimeoutError { message: String, context: ErrorContext },
}

/// Constructors taking only a message, with an empty context.
macro_rules! bare_constructors {
    ($($fn_name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $fn_name(message: impl Into<String>) -> Self {
                Self::$variant {
                    message: message.into(),
                    context: ErrorContext::default(),
                }
            }
        )*
    };
}

impl RepositoryError {
    bare_constructors! {
        query => QueryError,
        not_found => NotFound,
        validation => ValidationError,
        configuration => ConfigurationError,
        internal => InternalError,
        transaction => TransactionError,
    }

    /// Unreachable store; always retryable.
    pub fn connection(message: impl Into<String>, context: ErrorContext) -> Self {
        let message = message.into();
        Self::ConnectionError { message, context: context.retryable() }
    }

    /// Pool checkout or statement timed out; always retryable.
    pub fn timeout(message: impl Into<String>, context: ErrorContext) -> Self {
        let message = message.into();
        Self::TimeoutError { message, context: context.retryable() }
    }

    /// `Missing '<field>'`, the message every ingestion path uses.
    pub fn missing_field(operation: &str, field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Missing '{}'", field);
        Self::ValidationError { message, context: ErrorContext::new(operation).field(field) }
    }

    /// A climb pointed at a session id the store does not hold.
    pub fn unknown_session(operation: &str, id: SessionId) -> Self {
        let message = format!("Session {} does not exist", id);
        Self::ValidationError { message, context: ErrorContext::new(operation).session(id) }
    }

    fn parts(&self) -> (&str, &ErrorContext) {
        match self {
            Self::ConnectionError { message, context }
            | Self::QueryError { message, context }
            | Self::NotFound { message, context }
            | Self::ValidationError { message, context }
            | Self::ConfigurationError { message, context }
            | Self::InternalError { message, context }
            | Self::TransactionError { message, context }
            | Self::TimeoutError { message, context } => (message, context),
        }
    }

    fn parts_mut(&mut self) -> (&mut String, &mut ErrorContext) {
        match self {
            Self::ConnectionError { message, context }
            | Self::QueryError { message, context }
            | Self::NotFound { message, context }
            | Self::ValidationError { message, context }
            | Self::ConfigurationError { message, context }
            | Self::InternalError { message, context }
            | Self::TransactionError { message, context }
            | Self::TimeoutError { message, context } => (message, context),
        }
    }

    /// Transient; the Postgres store retries these with backoff.
    pub fn is_retryable(&self) -> bool {
        self.parts().1.retryable
    }

    /// The store could not be reached or configured, as opposed to a
    /// request it rejected or a query that failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError { .. } | Self::TimeoutError { .. } | Self::ConfigurationError { .. }
        )
    }

    /// The message without its context suffix.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    /// Name the operation that failed, replacing any earlier name.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.parts_mut().1.operation = Some(operation.into());
        self
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => RepositoryError::not_found("Record not found"),
            // A session deleted between validation and insert, or a climb
            // with neither session id nor label.
            Error::DatabaseError(
                kind @ (DatabaseErrorKind::ForeignKeyViolation | DatabaseErrorKind::CheckViolation),
                info,
            ) => RepositoryError::ValidationError {
                message: info.message().to_string(),
                context: ErrorContext::default().with_details(format!("{:?}", kind)),
            },
            Error::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
                RepositoryError::TransactionError {
                    message: info.message().to_string(),
                    context: ErrorContext::default().retryable(),
                }
            }
            Error::DatabaseError(kind, info) => RepositoryError::QueryError {
                message: info.message().to_string(),
                context: ErrorContext::default().with_details(format!("{:?}", kind)),
            },
            Error::RollbackErrorOnCommit { .. }
            | Error::RollbackTransaction
            | Error::AlreadyInTransaction
            | Error::NotInTransaction
            | Error::BrokenTransactionManager => RepositoryError::transaction(err.to_string()),
            Error::DeserializationError(e) => {
                RepositoryError::internal(format!("Unreadable climb row: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

/// r2d2 only fails a checkout after waiting out the connection timeout.
#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::timeout(err.to_string(), ErrorContext::new("get_connection"))
    }
}
