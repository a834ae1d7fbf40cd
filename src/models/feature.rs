//! ArcGIS feature set response models

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

/// Body of a layer `query` response
#[derive(Debug, Deserialize, Default)]
pub struct FeatureSet {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,

    #[serde(rename = "exceededTransferLimit", default)]
    pub exceeded_transfer_limit: bool,

    /// Present when the service rejected the query (often with HTTP 200)
    #[serde(default)]
    pub error: Option<ServiceError>,
}

impl FeatureSet {
    /// Features in the response; a missing array counts as empty
    pub fn into_features(self) -> Vec<Feature> {
        self.features.unwrap_or_default()
    }
}

/// A single feature: flat attributes plus optional polygon geometry
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, JsonValue>,

    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
}

impl Feature {
    /// Rings of the geometry, if the feature carries any
    pub fn rings(&self) -> Option<&[Vec<Vec<f64>>]> {
        self.geometry
            .as_ref()
            .and_then(|g| g.rings.as_deref())
            .filter(|rings| !rings.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureGeometry {
    /// Each ring is a list of `[x, y]` positions (extra ordinates allowed)
    #[serde(default)]
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub details: Vec<String>,
}
