use crate::models::{
    CountryRecord, GEOMETRY_COLUMN, RINGS_LABEL, SubdivisionTable, format_json_value,
};
use anyhow::{Context, Result};
use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, JsonObject};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Attributes as columns, geometry as GeoJSON text
    Csv,
    /// A GeoJSON FeatureCollection
    Geojson,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Geojson => "geojson",
        }
    }
}

/// Export a subdivision table to a file
pub fn export_subdivisions(
    table: &SubdivisionTable,
    format: ExportFormat,
    path: &Path,
) -> Result<String> {
    ensure_parent(path)?;

    match format {
        ExportFormat::Csv => subdivisions_to_csv(table, path),
        ExportFormat::Geojson => {
            let features = table
                .rows
                .iter()
                .map(|row| to_feature(row.attributes.clone(), row.geometry.as_ref()))
                .collect();
            write_collection(features, path)
        }
    }
}

/// Export a country record to a file
pub fn export_country(record: &CountryRecord, format: ExportFormat, path: &Path) -> Result<String> {
    ensure_parent(path)?;

    match format {
        ExportFormat::Csv => country_to_csv(record, path),
        ExportFormat::Geojson => {
            let feature = to_feature(record.attributes(), Some(&record.rings));
            write_collection(vec![feature], path)
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn subdivisions_to_csv(table: &SubdivisionTable, path: &Path) -> Result<String> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            if column == GEOMETRY_COLUMN {
                record.push(geometry_text(row.geometry.as_ref())?);
            } else {
                record.push(row.get(column).map(format_json_value).unwrap_or_default());
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(path.to_string_lossy().to_string())
}

// Transposed: one line per attribute, like the record itself
fn country_to_csv(record: &CountryRecord, path: &Path) -> Result<String> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["attribute", "value"])?;

    for (name, value) in &record.rows {
        writer.write_record([name.as_str(), format_json_value(value).as_str()])?;
    }
    writer.write_record([RINGS_LABEL, geometry_text(Some(&record.rings))?.as_str()])?;

    writer.flush()?;
    Ok(path.to_string_lossy().to_string())
}

fn geometry_text(geometry: Option<&MultiPolygon<f64>>) -> Result<String> {
    match geometry {
        Some(geometry) => {
            let geometry = geojson::Geometry::new(geojson::Value::from(geometry));
            Ok(serde_json::to_string(&geometry)?)
        }
        None => Ok(String::new()),
    }
}

fn to_feature(properties: JsonObject, geometry: Option<&MultiPolygon<f64>>) -> Feature {
    Feature {
        bbox: None,
        geometry: geometry.map(|g| geojson::Geometry::new(geojson::Value::from(g))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn write_collection(features: Vec<Feature>, path: &Path) -> Result<String> {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let mut file = File::create(path)?;
    let json = serde_json::to_string_pretty(&collection)?;
    file.write_all(json.as_bytes())?;

    Ok(path.to_string_lossy().to_string())
}
