//! Maps crate errors onto HTTP status codes and `{"detail": ...}` bodies.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable reason
    pub detail: String,
}

impl Error {
    /// Status code reported to HTTP clients.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidQuantity { .. }
            | Self::InvalidPrice { .. }
            | Self::Validation { .. }
            | Self::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            Self::OrderNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::ClientNotFound { .. }
            | Self::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ProductInUse { .. } => StatusCode::CONFLICT,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            warn!("Request rejected: {:?}", self);
            self.to_string()
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidQuantity { quantity: 0 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InsufficientStock {
                available: 1,
                requested: 1
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::OrderNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ProductNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ProductInUse {
                id: 1,
                line_items: 2
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Database(DbErr::Custom("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response =
            Error::Database(DbErr::Custom("password leaked".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.detail, "Internal server error");
        assert!(!body.detail.contains("password leaked"));
    }

    #[tokio::test]
    async fn test_client_errors_carry_reason() {
        let response = Error::OrderNotFound { id: 7 }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            ErrorBody {
                detail: "Order not found".to_string()
            }
        );
    }
}
