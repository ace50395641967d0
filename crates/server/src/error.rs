//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors a request handler can end with
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// JSON body sent with an error status
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Catalog(CatalogError::Validation(_))
            | ServerError::Catalog(CatalogError::InvalidValue { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Catalog(CatalogError::NotFound { .. }) => "NOT_FOUND",
            ServerError::Catalog(CatalogError::Validation(_))
            | ServerError::Catalog(CatalogError::InvalidValue { .. }) => "VALIDATION_ERROR",
            ServerError::Catalog(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ServerError::from(CatalogError::NotFound { id: 7 });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Couldn't find Movie with id=7");

        let invalid =
            ServerError::from(CatalogError::Validation("Title can't be blank".to_string()));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(invalid.code(), "VALIDATION_ERROR");

        let io = ServerError::from(CatalogError::IoError(std::io::Error::other("disk")));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
