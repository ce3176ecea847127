//! Error handling for the electoral service layer

/// Result type alias for the electoral service layer
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the electoral service layer
///
/// Every variant maps onto one HTTP-style status code so the response
/// envelope can be built without inspecting the variant at the call site.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A referenced or requested entity does not exist
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// A uniqueness invariant would be violated
    #[error("{message}")]
    Conflict { message: String },

    /// Credential or session verification failed
    #[error("{message}")]
    Unauthorized { message: String },

    /// Malformed activation flow or invalid cross-field combination
    #[error("{message}")]
    BadRequest { message: String },

    /// Input validation errors
    #[error("Validation failed: {field} {reason}")]
    Validation { field: String, reason: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new not-found error naming the entity type
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new bad-request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status code reported in the response envelope
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Unauthorized { .. } => 401,
            Self::BadRequest { .. } | Self::Validation { .. } => 400,
            Self::Serialization(_) | Self::Internal { .. } => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. } | Self::Validation { .. })
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! conflict {
    ($msg:expr) => {
        $crate::Error::conflict($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::conflict(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! bad_request {
    ($msg:expr) => {
        $crate::Error::bad_request($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::bad_request(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::Error::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = Error::not_found("voting table");
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "voting table not found");

        let conflict = Error::conflict("document number already registered");
        assert!(conflict.is_conflict());

        let validation = Error::validation("email", "must contain '@'");
        assert!(validation.is_bad_request());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::not_found("account").status_code(), 404);
        assert_eq!(Error::conflict("dup").status_code(), 409);
        assert_eq!(Error::unauthorized("no").status_code(), 401);
        assert_eq!(Error::bad_request("bad").status_code(), 400);
        assert_eq!(Error::validation("name", "is empty").status_code(), 400);
        assert_eq!(Error::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_error_macros() {
        let err = conflict!("code {} already taken", "054321");
        assert!(matches!(err, Error::Conflict { ref message } if message == "code 054321 already taken"));

        let err = bad_request!("token expired");
        assert!(err.is_bad_request());

        let err = internal_error!("lock poisoned");
        assert_eq!(err.status_code(), 500);
    }
}
