//! Tabular shapes returned by boundary queries

use super::feature::Feature;
use super::query::Layer;
use crate::error::BoundaryError;
use crate::geometry::assemble_rings;
use geo::MultiPolygon;
use serde_json::{Map, Value as JsonValue};

/// Label of the geometry entry in a country record
pub const RINGS_LABEL: &str = "rings";

/// Name of the geometry column in a subdivision table
pub const GEOMETRY_COLUMN: &str = "geometry";

/// One country, transposed: every attribute is a labeled row
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    /// (attribute name, value) pairs in the order the service sent them
    pub rows: Vec<(String, JsonValue)>,
    /// Union of all rings of the feature
    pub rings: MultiPolygon<f64>,
    /// How many features matched the query; only the first is kept
    pub match_count: usize,
}

impl CountryRecord {
    pub fn from_feature(feature: Feature, match_count: usize) -> Result<Self, BoundaryError> {
        let rings = feature.rings().ok_or(BoundaryError::MissingGeometry)?;
        let rings = assemble_rings(rings)?;

        Ok(Self {
            rows: feature.attributes.into_iter().collect(),
            rings,
            match_count,
        })
    }

    /// Value of an attribute row
    pub fn get(&self, label: &str) -> Option<&JsonValue> {
        self.rows
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    /// Row labels, ending with the geometry entry
    pub fn labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(RINGS_LABEL))
            .collect()
    }

    pub fn attributes(&self) -> Map<String, JsonValue> {
        self.rows.iter().cloned().collect()
    }
}

/// One subdivision (province, district, ...) of a country
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionRow {
    pub attributes: Map<String, JsonValue>,
    /// `None` when the feature carried no rings
    pub geometry: Option<MultiPolygon<f64>>,
}

impl SubdivisionRow {
    pub fn from_feature(feature: Feature) -> Result<Self, BoundaryError> {
        let geometry = feature.rings().map(assemble_rings).transpose()?;

        Ok(Self {
            attributes: feature.attributes,
            geometry,
        })
    }

    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        self.attributes.get(column)
    }
}

/// All subdivisions of one country at one admin level
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionTable {
    pub layer: Layer,
    pub iso_code: String,
    /// Attribute columns in first-seen order, then `geometry`
    pub columns: Vec<String>,
    pub rows: Vec<SubdivisionRow>,
}

impl SubdivisionTable {
    pub fn from_features(
        layer: Layer,
        iso_code: &str,
        features: Vec<Feature>,
    ) -> Result<Self, BoundaryError> {
        let rows = features
            .into_iter()
            .map(SubdivisionRow::from_feature)
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns: Vec<String> = Vec::new();
        for name in rows.iter().flat_map(|row| row.attributes.keys()) {
            if name != GEOMETRY_COLUMN && !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        columns.push(GEOMETRY_COLUMN.to_string());

        Ok(Self {
            layer,
            iso_code: iso_code.to_string(),
            columns,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format a JSON value for display
pub fn format_json_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
