//! Forwarding to the hosted classification functions

use log::{debug, warn};
use serde_json::Value;

use crate::api::{FunctionReply, ImagePayload};
use crate::config::{Config, RuntimeMode};
use crate::error::ProxyError;
use crate::Timer;

/// URL of a deployed classification function.
///
/// Development targets the local emulator, which serves functions under
/// `/<project>/<region>/<name>`.
pub fn function_url(config: &Config, project: &str, function: &str) -> String {
    match config.mode {
        RuntimeMode::Development => format!(
            "http://{}/{}/{}/{}",
            config.emulator_host, project, config.region, function
        ),
        RuntimeMode::Production => format!(
            "https://{}-{}.cloudfunctions.net/{}",
            config.region, project, function
        ),
    }
}

/// Single-shot caller for classification functions. No retries, no timeout.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    http: reqwest::Client,
}

impl Backend {
    pub fn new() -> Self {
        Backend::default()
    }

    pub async fn classify(&self, url: &str, image: String) -> Result<String, ProxyError> {
        let mut t = Timer::start(format!("Calling {}", url));

        let payload = ImagePayload { image: Some(image) };
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProxyError::BackendCall(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ProxyError::BackendCall(err.to_string()))?;

        t.stop();
        debug!("Function replied {} with {} bytes", status, text.len());

        let failed = || {
            warn!("Function failed with {}: {}", status, text.trim());
            ProxyError::BackendCall(format!("Function returned {}: {}", status, text.trim()))
        };

        let reply: FunctionReply = match serde_json::from_str(&text) {
            Ok(reply) => reply,
            Err(err) if status.is_success() => {
                return Err(ProxyError::BackendCall(format!(
                    "Function returned invalid JSON: {}",
                    err
                )))
            }
            Err(_) => return Err(failed()),
        };

        match reply.prediction {
            Some(Value::String(prediction)) => Ok(prediction),
            _ if !status.is_success() => Err(failed()),
            Some(other) => Err(ProxyError::BackendCall(format!(
                "Function prediction is not a string: {}",
                other
            ))),
            None => Err(ProxyError::BackendCall(
                "Function response did not include a prediction".to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: RuntimeMode) -> Config {
        Config {
            mode,
            region: "asia-northeast1".to_owned(),
            emulator_host: "localhost:5001".to_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn production_url_uses_hosted_functions() {
        assert_eq!(
            function_url(&config(RuntimeMode::Production), "smart-fert", "classify_rice"),
            "https://asia-northeast1-smart-fert.cloudfunctions.net/classify_rice"
        );
    }

    #[test]
    fn development_url_uses_emulator() {
        assert_eq!(
            function_url(&config(RuntimeMode::Development), "smart-fert", "classify_melon"),
            "http://localhost:5001/smart-fert/asia-northeast1/classify_melon"
        );
    }

    #[tokio::test]
    async fn unreachable_function_is_a_backend_error() {
        let err = Backend::new()
            .classify("http://127.0.0.1:1/p/r/classify_rice", "aGk=".to_owned())
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::BackendCall(ref msg) if !msg.is_empty()));
    }
}
