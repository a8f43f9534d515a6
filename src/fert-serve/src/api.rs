//! JSON bodies exchanged with callers and with the classification functions

use serde::{Deserialize, Serialize};

/// `{ image }` as sent by callers and forwarded to the function
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Reply from a classification function. Only `prediction` is read; it is
/// kept untyped so a non-string value can be reported as such.
#[derive(Debug, Deserialize)]
pub(crate) struct FunctionReply {
    #[serde(default)]
    pub prediction: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionBody {
    pub prediction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
