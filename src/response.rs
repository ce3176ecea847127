//! Uniform response envelope
//!
//! Success and failure share one shape so callers can branch on `success`
//! and `statusCode` alone:
//!
//! ```json
//! { "statusCode": 409, "message": "...", "success": false, "data": null }
//! ```

use crate::Error;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;

/// Envelope returned by every service operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ServiceResponse<T> {
    /// 200 response carrying data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: STATUS_OK,
            message: message.into(),
            success: true,
            data: Some(data),
        }
    }

    /// 201 response carrying the created record
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: STATUS_CREATED,
            message: message.into(),
            success: true,
            data: Some(data),
        }
    }

    /// Failure envelope for an error; never carries data
    pub fn failure(error: &Error) -> Self {
        Self {
            status_code: error.status_code(),
            message: error.to_string(),
            success: false,
            data: None,
        }
    }

    /// Collapse a service result into an envelope
    pub fn from_result(result: crate::Result<Self>) -> Self {
        result.unwrap_or_else(|error| Self::failure(&error))
    }

    /// Borrow the payload of a successful response
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Take the payload out of a successful response
    pub fn into_data(self) -> crate::Result<T> {
        self.data
            .ok_or_else(|| Error::internal("response carries no data"))
    }
}

impl<T> From<Error> for ServiceResponse<T> {
    fn from(error: Error) -> Self {
        Self::failure(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_shape() {
        let response: ServiceResponse<u32> =
            ServiceResponse::failure(&Error::conflict("document number already registered"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 409);
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "document number already registered");
    }

    #[test]
    fn test_from_result() {
        let ok = ServiceResponse::from_result(Ok(ServiceResponse::created("created", 7)));
        assert_eq!(ok.status_code, 201);
        assert_eq!(ok.data(), Some(&7));

        let failed: ServiceResponse<u32> =
            ServiceResponse::from_result(Err(Error::not_found("election")));
        assert_eq!(failed.status_code, 404);
        assert!(!failed.success);
        assert_eq!(failed.message, "election not found");
    }
}
