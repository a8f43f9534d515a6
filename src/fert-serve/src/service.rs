//! HTTP surface of the inference proxy

use std::convert::Infallible;
use std::sync::Arc;

use hyper::{body, Body, Method, Request, Response, StatusCode};
use log::{debug, error, info};

use crate::api::{ImagePayload, PredictionBody};
use crate::backend::{function_url, Backend};
use crate::config::Config;
use crate::credentials::{CredentialError, CredentialGuard, ServiceAccountKey};
use crate::crop::CropType;
use crate::error::{json_response, json_response_as, ProxyError};
use crate::manifest::{WebManifest, MANIFEST_CONTENT_TYPE, MANIFEST_PATH};

/// State shared by every request the proxy serves
pub struct ProxyState {
    config: Config,
    credentials: CredentialGuard,
    backend: Backend,
}

impl ProxyState {
    pub fn new(config: Config) -> Self {
        ProxyState {
            config,
            credentials: CredentialGuard::new(),
            backend: Backend::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The admin credential, initialized on first successful call.
    pub fn credentials(&self) -> Result<&ServiceAccountKey, CredentialError> {
        self.credentials
            .acquire(self.config.service_account_key.as_deref())
    }

    fn project_id(&self) -> Option<&str> {
        self.config.project_id.as_deref().or_else(|| {
            self.credentials
                .get()
                .and_then(|key| key.project_id.as_deref())
        })
    }

    /// Forward one classification request and return the function's label.
    pub async fn classify(&self, function: &str, body: &[u8]) -> Result<String, ProxyError> {
        if let Err(err) = self.credentials() {
            if self.config.mode.is_development() {
                debug!("Ignoring credential initialization failure: {}", err);
            } else {
                error!("Admin credential initialization error: {}", err);
                return Err(ProxyError::CredentialInit(err));
            }
        }

        let payload: ImagePayload = serde_json::from_slice(body)
            .map_err(|err| ProxyError::InvalidBody(err.to_string()))?;
        let image = payload
            .image
            .filter(|image| !image.is_empty())
            .ok_or(ProxyError::MissingImage)?;

        let project = self.project_id().ok_or(ProxyError::ProjectNotConfigured)?;
        let url = function_url(&self.config, project, function);

        match CropType::from_function_name(function) {
            Some(crop) => info!("Classifying {} image ({} bytes base64)", crop, image.len()),
            None => info!("Forwarding to unrecognized function {}", function),
        }

        self.backend.classify(&url, image).await
    }
}

/// Function name from `/api/<name>`
fn api_function(path: &str) -> Option<&str> {
    let name = path.strip_prefix("/api/")?;
    let name = name.strip_suffix('/').unwrap_or(name);

    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name)
    }
}

async fn route(req: Request<Body>, state: &ProxyState) -> Result<Response<Body>, ProxyError> {
    let path = req.uri().path().to_owned();

    if path == MANIFEST_PATH {
        return match req.method() {
            &Method::GET | &Method::HEAD => Ok(json_response_as(
                StatusCode::OK,
                MANIFEST_CONTENT_TYPE,
                &WebManifest::default(),
            )),
            _ => Err(ProxyError::MethodNotAllowed),
        };
    }

    let function = api_function(&path).ok_or(ProxyError::NotFound)?;
    if req.method() != Method::POST {
        return Err(ProxyError::MethodNotAllowed);
    }

    let raw = body::to_bytes(req.into_body())
        .await
        .map_err(|err| ProxyError::BodyRead(err.to_string()))?;

    let prediction = state.classify(function, &raw).await?;

    Ok(json_response(StatusCode::OK, &PredictionBody { prediction }))
}

/// hyper service entry point; every failure becomes a JSON error body.
pub async fn handle(
    req: Request<Body>,
    state: Arc<ProxyState>,
) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = match route(req, &state).await {
        Ok(response) => response,
        Err(err) => {
            debug!("{} {} failed: {}", method, path, err);
            err.to_response()
        }
    };

    info!("{} {} -> {}", method, path, response.status().as_u16());

    Ok(response)
}
