//! User intent classification result

use serde::{Deserialize, Serialize};

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Turn a 2D garment image into a 3D try-on
    Generation,
    /// Search the catalog and recommend garments
    Recommendation,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generation => write!(f, "generation"),
            Self::Recommendation => write!(f, "recommendation"),
        }
    }
}

/// Classification of one request, derived once and never revisited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Classified intent
    pub kind: IntentKind,

    /// Classifier confidence in [0, 1] (the keyword rule pins this at 0.9)
    pub confidence: f64,

    /// Lower-cased request text the rule matched against
    pub raw_text: String,

    /// Whether the request carried an image
    pub has_image: bool,
}
