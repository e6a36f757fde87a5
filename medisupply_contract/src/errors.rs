//! Error types for the contract registry
//!
//! Every registry operation reports failure through [`ContractError`], which
//! only has the four kinds the application knows about. Each kind has a
//! canonical wire payload ([`ErrorPayload`]) and a matching shape returned by
//! [`error_shape`].

use crate::schema::{FieldSpec, ObjectShape, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic code attached to every error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::Code;

    pub const VALIDATION_FAILED: Code = Code::new("MSC-V001");
    pub const NOT_FOUND: Code = Code::new("MSC-N001");
    pub const UNAUTHORIZED: Code = Code::new("MSC-U001");
    pub const INTERNAL: Code = Code::new("MSC-I001");
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// The four error kinds of the application contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Unauthorized,
        ErrorKind::Internal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "notFound",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
        }
    }

    /// HTTP-style status code conventionally used for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    pub fn code(&self) -> Code {
        match self {
            ErrorKind::Validation => codes::VALIDATION_FAILED,
            ErrorKind::NotFound => codes::NOT_FOUND,
            ErrorKind::Unauthorized => codes::UNAUTHORIZED,
            ErrorKind::Internal => codes::INTERNAL,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ContractError::not_found(format!("Unknown error kind: {}", s)))
    }
}

// ============================================================================
// FIELD ISSUES
// ============================================================================

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum IssueKind {
    MissingField,
    UnknownField,
    WrongType { expected: &'static str },
    TooShort { min_len: usize },
    InvalidEmail,
    Negative,
    NotPositive,
    NotInteger,
    UnsafeInteger { max: u64 },
    NotInEnum { allowed: Vec<&'static str> },
    LiteralMismatch { expected: serde_json::Value },
    TooFewItems { min_items: usize },
    InvalidTimestamp,
    VersionMismatch { expected: u32 },
    Custom,
}

/// A single failing field, addressed by its path (`items[0].quantity`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub path: String,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        let path = path.into();
        let message = describe_issue(&path, &kind);
        Self {
            path,
            kind,
            message,
        }
    }

    pub fn with_message(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::Custom,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn describe_issue(path: &str, kind: &IssueKind) -> String {
    let field = if path.is_empty() { "value" } else { path };
    match kind {
        IssueKind::MissingField => format!("Field '{}' is required", field),
        IssueKind::UnknownField => format!("Field '{}' is not recognized", field),
        IssueKind::WrongType { expected } => {
            format!("Field '{}' must be {}", field, expected)
        }
        IssueKind::TooShort { min_len } if *min_len == 1 => {
            format!("Field '{}' must not be empty", field)
        }
        IssueKind::TooShort { min_len } => {
            format!("Field '{}' must be at least {} characters", field, min_len)
        }
        IssueKind::InvalidEmail => format!("Field '{}' must be a valid email address", field),
        IssueKind::Negative => format!("Field '{}' must not be negative", field),
        IssueKind::NotPositive => format!("Field '{}' must be greater than zero", field),
        IssueKind::NotInteger => format!("Field '{}' must be an integer", field),
        IssueKind::UnsafeInteger { max } => {
            format!("Field '{}' must be an integer no larger than {}", field, max)
        }
        IssueKind::NotInEnum { allowed } => format!(
            "Field '{}' must be one of: {}",
            field,
            allowed.join(", ")
        ),
        IssueKind::LiteralMismatch { expected } => {
            format!("Field '{}' must be exactly {}", field, expected)
        }
        IssueKind::TooFewItems { min_items } => {
            format!("Field '{}' must contain at least {} item(s)", field, min_items)
        }
        IssueKind::InvalidTimestamp => {
            format!("Field '{}' must be an RFC 3339 timestamp", field)
        }
        IssueKind::VersionMismatch { expected } => format!(
            "Field '{}' does not match the current state version {}",
            field, expected
        ),
        IssueKind::Custom => format!("Field '{}' is invalid", field),
    }
}

// ============================================================================
// CONTRACT ERROR
// ============================================================================

/// Error returned by every registry operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
        issues: Vec<FieldIssue>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl ContractError {
    /// Validation error for one field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let issue = FieldIssue::with_message(field, message);
        Self::from_issues(vec![issue])
    }

    /// Validation error built from collected issues; the first issue names the field
    pub fn from_issues(issues: Vec<FieldIssue>) -> Self {
        let (message, field) = match issues.first() {
            Some(first) if first.path.is_empty() => (first.message.clone(), None),
            Some(first) => (first.message.clone(), Some(first.path.clone())),
            None => ("Validation failed".to_string(), None),
        };
        ContractError::Validation {
            message,
            field,
            issues,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ContractError::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ContractError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ContractError::Internal {
            message: message.into(),
        }
    }

    /// Map a serde failure on an already validated value
    pub(crate) fn from_serde(error: serde_json::Error) -> Self {
        ContractError::Validation {
            message: format!("Value does not match the typed record: {}", error),
            field: None,
            issues: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Validation { .. } => ErrorKind::Validation,
            ContractError::NotFound { .. } => ErrorKind::NotFound,
            ContractError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ContractError::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> Code {
        self.kind().code()
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Field named by a validation error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ContractError::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Every issue carried by a validation error
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ContractError::Validation { issues, .. } => issues,
            _ => &[],
        }
    }

    /// Validation errors can be fixed by the caller and retried
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ContractError::Validation { .. })
    }

    /// Canonical wire payload for this error
    pub fn payload(&self) -> ErrorPayload {
        let field = self.field().map(str::to_string);
        ErrorPayload {
            message: self.to_string(),
            field,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        format!("[{}] {}: {}", self.code(), self.kind(), self)
    }
}

/// Wire payload of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Canonical payload shape for an error kind
pub fn error_shape(kind: ErrorKind) -> Shape {
    let shape = match kind {
        ErrorKind::Validation => ObjectShape::new("ValidationError")
            .field(FieldSpec::required("message", Shape::string()))
            .field(FieldSpec::optional("field", Shape::string())),
        ErrorKind::NotFound => ObjectShape::new("NotFoundError")
            .field(FieldSpec::required("message", Shape::string())),
        ErrorKind::Unauthorized => ObjectShape::new("UnauthorizedError")
            .field(FieldSpec::required("message", Shape::string())),
        ErrorKind::Internal => ObjectShape::new("InternalError")
            .field(FieldSpec::required("message", Shape::string())),
    };
    Shape::Object(shape)
}
