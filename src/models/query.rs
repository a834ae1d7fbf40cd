//! Feature layer query definitions

/// Default ArcGIS services root for the World Bank boundary datasets
pub const DEFAULT_SERVICE_URL: &str =
    "https://services.arcgis.com/iQ1dY19aHwbSDYIF/ArcGIS/rest/services";

/// Spatial reference requested for all geometry (WGS 84)
pub const DEFAULT_OUT_SR: u32 = 4326;

/// Feature service layers the client knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Country,
    Admin1,
    Admin2,
}

impl Layer {
    /// Layer path relative to the services root
    pub fn path(&self) -> &'static str {
        match self {
            Self::Country => {
                "World_Bank_Official_Boundaries_World_Country_Polygons_(Very_High_Definition)/FeatureServer/0"
            }
            Self::Admin1 => "World_Bank_Global_Administrative_Divisions/FeatureServer/2",
            Self::Admin2 => "World_Bank_Global_Administrative_Divisions/FeatureServer/3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Admin1 => "admin 1",
            Self::Admin2 => "admin 2",
        }
    }
}

/// A query against one layer
#[derive(Debug, Clone)]
pub struct LayerQuery {
    pub layer: Layer,
    /// SQL-style `where` predicate
    pub predicate: String,
    pub out_sr: u32,
}

impl LayerQuery {
    /// Match features whose `attribute` equals `value` exactly
    pub fn attribute_equals(layer: Layer, attribute: &str, value: &str) -> Self {
        Self {
            layer,
            predicate: format!("{}='{}'", attribute, value.replace('\'', "''")),
            out_sr: DEFAULT_OUT_SR,
        }
    }

    /// Match subdivisions of a country by ISO 3166 alpha-3 code
    pub fn iso_code(layer: Layer, iso_code: &str) -> Self {
        Self::attribute_equals(layer, "ISO_A3", iso_code)
    }

    pub fn with_out_sr(mut self, out_sr: u32) -> Self {
        self.out_sr = out_sr;
        self
    }

    /// Build the full query URL under the given services root
    pub fn build_url(&self, service_url: &str) -> String {
        let parts = [
            format!("where={}", urlencoding::encode(&self.predicate)),
            "f=pjson".to_string(),
            "returnGeometry=true".to_string(),
            "outFields=*".to_string(),
            format!("outSR={}", self.out_sr),
        ];

        format!(
            "{}/{}/query?{}",
            service_url.trim_end_matches('/'),
            self.layer.path(),
            parts.join("&")
        )
    }
}
