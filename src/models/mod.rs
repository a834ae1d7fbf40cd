//! Data models for boundary queries and their results

mod feature;
mod query;
mod table;

pub use feature::{Feature, FeatureGeometry, FeatureSet, ServiceError};
pub use query::{DEFAULT_OUT_SR, DEFAULT_SERVICE_URL, Layer, LayerQuery};
pub use table::{
    CountryRecord, GEOMETRY_COLUMN, RINGS_LABEL, SubdivisionRow, SubdivisionTable,
    format_json_value,
};
