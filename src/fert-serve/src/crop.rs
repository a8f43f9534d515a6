use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crops the application knows how to advise on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Rice,
    Melon,
    Cucumber,
    Tomato,
    Other,
}

impl CropType {
    pub const ALL: [CropType; 5] = [
        CropType::Rice,
        CropType::Melon,
        CropType::Cucumber,
        CropType::Tomato,
        CropType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Rice => "rice",
            CropType::Melon => "melon",
            CropType::Cucumber => "cucumber",
            CropType::Tomato => "tomato",
            CropType::Other => "other",
        }
    }

    /// Name of the backend classification function for this crop.
    ///
    /// `Other` has no classifier behind it.
    pub fn function_name(&self) -> Option<&'static str> {
        match self {
            CropType::Rice => Some("classify_rice"),
            CropType::Melon => Some("classify_melon"),
            CropType::Cucumber => Some("classify_cucumber"),
            CropType::Tomato => Some("classify_tomato"),
            CropType::Other => None,
        }
    }

    pub fn from_function_name(name: &str) -> Option<CropType> {
        CropType::ALL
            .iter()
            .copied()
            .find(|crop| crop.function_name() == Some(name))
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown crop type '{0}', expected one of rice, melon, cucumber, tomato, other")]
pub struct UnknownCrop(pub String);

impl FromStr for CropType {
    type Err = UnknownCrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CropType::ALL
            .iter()
            .copied()
            .find(|crop| crop.as_str() == wanted)
            .ok_or_else(|| UnknownCrop(s.to_owned()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please upload or take a picture.")]
    MissingImage,

    #[error("Classification not available for 'Other Crops'.")]
    NoClassifier,
}

/// A single user submission: which crop, and the leaf photo as base64
/// without any data-URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    crop: CropType,
    image_base64: String,
}

impl ClassificationRequest {
    pub fn new(crop: CropType, image_base64: impl Into<String>) -> Result<Self, RequestError> {
        let image_base64 = image_base64.into();

        if image_base64.is_empty() {
            return Err(RequestError::MissingImage);
        }
        if crop.function_name().is_none() {
            return Err(RequestError::NoClassifier);
        }

        Ok(ClassificationRequest { crop, image_base64 })
    }

    pub fn crop(&self) -> CropType {
        self.crop
    }

    pub fn image_base64(&self) -> &str {
        &self.image_base64
    }

    pub fn function_name(&self) -> &'static str {
        // `new` rejects crops without a classifier
        self.crop.function_name().unwrap_or_default()
    }

    /// Request path on the inference proxy
    pub fn proxy_path(&self) -> String {
        format!("/api/{}", self.function_name())
    }
}

/// Label produced by the external classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>) -> Self {
        ClassificationResult {
            label: label.into(),
        }
    }
}
