use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::store::StoreError;

/// Workflow rejection taxonomy. Every variant except `Store` is a local
/// validation outcome returned synchronously with enough data for the
/// client to render without a second round trip.
#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("Employee record not found")]
    EmployeeNotFound,

    #[error("Invalid leave type: {0}")]
    InvalidLeaveType(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Signature is required")]
    SignatureRequired,

    #[error("date_from cannot be after date_to")]
    InvalidDateRange,

    #[error("{message}")]
    InsufficientBalance {
        available: f64,
        requested: f64,
        message: String,
    },

    #[error("Insufficient Vacation Leave balance for monetization. Available: {available} days")]
    InsufficientMonetizationBalance { available: f64, requested: f64 },

    #[error("No leave balance record found")]
    NoBalanceRecord,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmployeeNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::InsufficientBalance {
                available,
                requested,
                message,
            } => json!({
                "success": false,
                "message": message,
                "insufficient_balance": true,
                "available_balance": available,
                "requested_days": requested,
            }),
            Self::InsufficientMonetizationBalance {
                available,
                requested,
            } => json!({
                "success": false,
                "message": self.to_string(),
                "insufficient_balance": true,
                "available_balance": available,
                "requested_days": requested,
            }),
            Self::Store(e) => {
                error!(error = %e.0, "data store failure");
                json!({
                    "success": false,
                    "message": "Internal Server Error",
                })
            }
            _ => json!({
                "success": false,
                "message": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            LeaveError::SignatureRequired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LeaveError::InvalidLeaveType("Nap Leave".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LeaveError::EmployeeNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn insufficient_balance_message_is_carried_verbatim() {
        let err = LeaveError::InsufficientBalance {
            available: 2.0,
            requested: 5.0,
            message: "Insufficient VL credits. Available: 2.000 days, Required: 5 days".into(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient VL credits. Available: 2.000 days, Required: 5 days"
        );
    }
}
