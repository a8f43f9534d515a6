use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode};
use thiserror::Error;

use crate::api::ErrorBody;
use crate::credentials::CredentialError;

/// Everything that can end a proxied request early
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Image data is required")]
    MissingImage,

    #[error("Request body must be a JSON object: {0}")]
    InvalidBody(String),

    #[error("Could not read request body: {0}")]
    BodyRead(String),

    #[error("Firebase Admin SDK initialization failed")]
    CredentialInit(#[source] CredentialError),

    #[error("Project identifier is not configured")]
    ProjectNotConfigured,

    /// Network failure or unusable reply from the classification function.
    /// The message is relayed to the caller as is.
    #[error("{0}")]
    BackendCall(String),

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingImage | ProxyError::InvalidBody(_) | ProxyError::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::CredentialInit(_)
            | ProxyError::ProjectNotConfigured
            | ProxyError::BackendCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> Response<Body> {
        let body = ErrorBody {
            error: self.to_string(),
        };

        json_response(self.status(), &body)
    }
}

pub(crate) fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    json_response_as(status, "application/json", value)
}

pub(crate) fn json_response_as<T: serde::Serialize>(
    status: StatusCode,
    content_type: &'static str,
    value: &T,
) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            response
        }
        Err(err) => {
            let mut response = Response::new(Body::from(format!(
                "{{\"error\":\"could not encode response: {}\"}}",
                err.to_string().replace('"', "'")
            )));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
