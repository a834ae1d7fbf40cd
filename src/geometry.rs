//! Assembly of feature rings into boundary geometry
//!
//! Rings follow the ArcGIS polygon encoding: clockwise rings bound the
//! shape, counter-clockwise rings cut holes out of it. Rings are applied in
//! service order, so an island listed after the lake that holds it is kept.

use crate::error::BoundaryError;
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon, Winding};

/// Build one polygon per ring and merge them into a single boundary
pub fn assemble_rings(rings: &[Vec<Vec<f64>>]) -> Result<MultiPolygon<f64>, BoundaryError> {
    let lines = rings
        .iter()
        .enumerate()
        .map(|(index, ring)| ring_to_line(index, ring))
        .collect::<Result<Vec<_>, _>>()?;

    // Not ArcGIS-wound: every ring is its own piece
    if !lines.iter().any(|line| line.is_cw()) {
        return Ok(union_all(
            lines.into_iter().map(|line| Polygon::new(line, vec![])).collect(),
        ));
    }

    Ok(lines
        .into_iter()
        .fold(MultiPolygon::new(vec![]), |acc, line| {
            let exterior = line.is_cw();
            let polygon = Polygon::new(line, vec![]);
            if exterior {
                acc.union(&polygon)
            } else {
                acc.difference(&polygon)
            }
        }))
}

/// Union of any number of polygons
pub fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    polygons
        .into_iter()
        .fold(MultiPolygon::new(vec![]), |acc, polygon| acc.union(&polygon))
}

/// Convert raw positions into a closed ring
fn ring_to_line(index: usize, ring: &[Vec<f64>]) -> Result<LineString<f64>, BoundaryError> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.len() + 1);

    for position in ring {
        let (x, y) = match position.as_slice() {
            [x, y, ..] => (*x, *y),
            _ => {
                return Err(BoundaryError::InvalidRing {
                    index,
                    reason: format!("position has {} ordinates", position.len()),
                });
            }
        };

        if !x.is_finite() || !y.is_finite() {
            return Err(BoundaryError::InvalidRing {
                index,
                reason: "non-finite coordinate".to_string(),
            });
        }

        coords.push(Coord { x, y });
    }

    coords.dedup();
    let mut line = LineString::new(coords);
    line.close();

    if line.0.len() < 4 {
        return Err(BoundaryError::InvalidRing {
            index,
            reason: "fewer than 3 distinct positions".to_string(),
        });
    }

    Ok(line)
}
