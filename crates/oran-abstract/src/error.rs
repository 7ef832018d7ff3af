use crate::report::ReportKind;

/// Errors raised while registering, constructing or populating reports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    /// No factory is registered for the requested kind.
    #[error("unknown report kind '{0}'")]
    UnknownKind(String),

    /// A factory for this kind was already registered.
    #[error("report kind '{0}' is already registered")]
    DuplicateKind(String),

    /// A field name or value was rejected by the report type.
    #[error("invalid field '{field}' on {kind}: {reason}")]
    InvalidField {
        kind: String,
        field: String,
        reason: String,
    },

    /// A factory produced reports of a different kind than it was registered under.
    #[error("factory registered as '{registered}' produces '{produced}' reports")]
    KindMismatch { registered: String, produced: String },

    /// A repository setting is out of range.
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl ReportError {
    pub fn invalid_field(kind: ReportKind, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            kind: kind.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(kind: ReportKind, field: &str) -> Self {
        Self::invalid_field(kind, field, "no such field")
    }
}
