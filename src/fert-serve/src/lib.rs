use chrono::{DateTime, Utc};
use log::{debug, info};

pub mod api;
pub mod backend;
pub mod config;
pub mod credentials;
pub mod crop;
pub mod error;
pub mod instructions;
pub mod manifest;
pub mod recommend;
pub mod service;

pub use backend::{function_url, Backend};
pub use config::{Config, ConfigError, RuntimeMode};
pub use credentials::{CredentialError, CredentialGuard, ServiceAccountKey};
pub use crop::{ClassificationRequest, ClassificationResult, CropType, RequestError};
pub use error::ProxyError;
pub use instructions::capture_instructions;
pub use manifest::WebManifest;
pub use recommend::{resolve, Recommendation, Severity};
pub use service::{handle, ProxyState};

/// Wall-clock timer that logs how long a step took
pub struct Timer {
    label: String,
    started: Option<DateTime<Utc>>,
    elapsed_ms: i64,
}

impl Timer {
    /// Create a timer and start it right away
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        debug!("{}: started", label);

        Timer {
            label,
            started: Some(Utc::now()),
            elapsed_ms: 0,
        }
    }

    /// Stop the timer and return the elapsed milliseconds.
    ///
    /// Stopping twice keeps the first measurement.
    pub fn stop(&mut self) -> i64 {
        match self.started.take() {
            None => debug!("{}: already stopped", self.label),
            Some(started) => {
                self.elapsed_ms = (Utc::now() - started).num_milliseconds();
                info!("{} took {} msec", self.label, self.elapsed_ms);
            }
        }

        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn timer_keeps_first_measurement() {
        let mut t = Timer::start("test step");
        let first = t.stop();
        assert!(first >= 0);
        assert_eq!(t.stop(), first);
    }
}
