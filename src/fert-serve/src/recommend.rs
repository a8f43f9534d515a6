use serde::{Deserialize, Serialize};

use crate::crop::CropType;

/// Fallback used whenever a label has no dedicated advice
pub const NO_RECOMMENDATION: &str = "No specific recommendation available.";

const DEFAULT_TITLE: &str = "Recommendation";
const HEALTHY_TITLE: &str = "Healthy Plant";
const DISEASE_TITLE: &str = "Disease Detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Recommendation {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Recommendation {
            severity,
            title: title.to_owned(),
            message: message.into(),
        }
    }

    fn fallback() -> Self {
        Recommendation::new(Severity::Info, DEFAULT_TITLE, NO_RECOMMENDATION)
    }
}

/// Rice is graded on a leaf-color chart; each level has fixed advice.
const RICE_LEVELS: [(&str, Severity, &str, &str); 4] = [
    (
        "Level 2",
        Severity::Warning,
        DEFAULT_TITLE,
        "Nitrogen Deficiency Detected. Consider increasing nitrogen fertilizer \
         application based on local guidelines.",
    ),
    (
        "Level 3",
        Severity::Warning,
        DEFAULT_TITLE,
        "Possible Nitrogen Deficiency. Monitor plant health and consider a slight \
         increase in nitrogen if growth is stunted.",
    ),
    (
        "Level 4",
        Severity::Success,
        HEALTHY_TITLE,
        "Optimal Nitrogen Level. Plant appears healthy based on leaf color. \
         Continue current fertilization practices.",
    ),
    (
        "Level 5",
        Severity::Info,
        DEFAULT_TITLE,
        "Slightly High Nitrogen Level. Plant is likely healthy, but consider \
         slightly reducing nitrogen in the next application to prevent overuse in \
         the long run. This is optional as current level might be acceptable.",
    ),
];

fn resolve_rice(label: &str) -> Recommendation {
    RICE_LEVELS
        .iter()
        .find(|(level, ..)| *level == label)
        .map(|(_, severity, title, message)| Recommendation::new(*severity, title, *message))
        .unwrap_or_else(Recommendation::fallback)
}

fn resolve_leaf(label: &str) -> Recommendation {
    if label == "Healthy" {
        Recommendation::new(
            Severity::Success,
            HEALTHY_TITLE,
            "Plant appears healthy. Continue current fertilization practices.",
        )
    } else if label.contains("Nitrogen Deficiency") {
        Recommendation::new(
            Severity::Warning,
            DEFAULT_TITLE,
            format!(
                "Nitrogen Deficiency Detected ({}). Consider increasing nitrogen \
                 fertilizer application based on local guidelines.",
                label
            ),
        )
    } else {
        Recommendation::new(
            Severity::Error,
            DISEASE_TITLE,
            format!(
                "Disease Detected: {}. Consult agricultural experts for \
                 disease-specific treatment and fertilization adjustments. Note that \
                 this disease might be related to nutrient imbalances.",
                label
            ),
        )
    }
}

/// Map a classifier label to the advice shown to the user.
///
/// Total over every `(crop, label)` pair: labels without dedicated advice
/// resolve to an informational fallback.
pub fn resolve(crop: CropType, label: &str) -> Recommendation {
    match crop {
        CropType::Rice => resolve_rice(label),
        CropType::Melon | CropType::Cucumber | CropType::Tomato => resolve_leaf(label),
        CropType::Other => Recommendation::fallback(),
    }
}
