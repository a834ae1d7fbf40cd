//! Administrative division queries (admin level 1 and 2)

use super::client::{BoundaryClient, FeatureSource, settle};
use crate::error::FetchOutcome;
use crate::models::{Layer, LayerQuery, SubdivisionTable};
use tracing::info;

impl<S: FeatureSource> BoundaryClient<S> {
    /// Get every admin level 1 subdivision (province, department, state) of a country
    ///
    /// Key columns: `ISO_A3`, `NAM_0`, `NAM_1`, `ADM1CD_c`, `geometry`.
    pub async fn fetch_admin1(&self, iso_code: &str) -> FetchOutcome<SubdivisionTable> {
        self.fetch_subdivisions(Layer::Admin1, iso_code).await
    }

    /// Get every admin level 2 subdivision (district, commune, county) of a country
    ///
    /// Key columns: `ISO_A3`, `NAM_0`, `NAM_1`, `NAM_2`, `ADM2CD_c`, `geometry`.
    pub async fn fetch_admin2(&self, iso_code: &str) -> FetchOutcome<SubdivisionTable> {
        self.fetch_subdivisions(Layer::Admin2, iso_code).await
    }

    async fn fetch_subdivisions(
        &self,
        layer: Layer,
        iso_code: &str,
    ) -> FetchOutcome<SubdivisionTable> {
        let query = LayerQuery::iso_code(layer, iso_code).with_out_sr(self.out_sr);
        let subject = format!("{} ISO='{}'", layer.label(), iso_code);

        let result = self.query_layer(&query).await.and_then(|features| {
            if features.is_empty() {
                return Ok(None);
            }
            SubdivisionTable::from_features(layer, iso_code, features).map(Some)
        });

        if let Ok(Some(table)) = &result {
            info!(
                "Found {} {} subdivisions for {}",
                table.len(),
                layer.label(),
                iso_code
            );
        }

        settle(result, &subject)
    }
}

#[cfg(test)]
mod tests {
    use super::super::client::fixtures::*;
    use crate::error::{BoundaryError, FetchOutcome};
    use crate::models::Layer;
    use serde_json::Value as JsonValue;

    const HAITI_ADMIN1: &str = r#"
    {
        "features": [
            {
                "attributes": { "ISO_A3": "HTI", "NAM_0": "Haiti", "NAM_1": "Nord", "ADM1CD_c": "HTI003" },
                "geometry": { "rings": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]] }
            },
            {
                "attributes": { "ISO_A3": "HTI", "NAM_0": "Haiti", "NAM_1": "Ouest", "ADM1CD_c": "HTI001" },
                "geometry": { "rings": [
                    [[2, 0], [2, 1], [3, 1], [3, 0], [2, 0]],
                    [[5, 0], [5, 1], [6, 1], [6, 0], [5, 0]]
                ] }
            },
            {
                "attributes": { "ISO_A3": "HTI", "NAM_0": "Haiti", "NAM_1": "Nippes", "ADM1CD_c": "HTI010" },
                "geometry": { "x": -73.4, "y": 18.4 }
            },
            {
                "attributes": { "ISO_A3": "HTI", "NAM_0": "Haiti", "NAM_1": "Centre", "ADM1CD_c": "HTI005" }
            }
        ]
    }
    "#;

    #[tokio::test]
    async fn test_fetch_admin1_keeps_every_feature() {
        let client = client(FixtureSource::body(HAITI_ADMIN1));

        let table = client.fetch_admin1("HTI").await.success().unwrap();

        assert_eq!(table.layer, Layer::Admin1);
        assert_eq!(table.iso_code, "HTI");
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.columns,
            vec!["ISO_A3", "NAM_0", "NAM_1", "ADM1CD_c", "geometry"]
        );

        let with_geometry: Vec<bool> = table.rows.iter().map(|r| r.geometry.is_some()).collect();
        assert_eq!(with_geometry, vec![true, true, false, false]);
        assert_eq!(table.rows[1].geometry.as_ref().map(|g| g.0.len()), Some(2));
        assert_eq!(table.rows[2].get("NAM_1"), Some(&JsonValue::from("Nippes")));
    }

    #[tokio::test]
    async fn test_fetch_admin2_uses_district_layer() {
        let client = client(FixtureSource::body(
            r#"{ "features": [ { "attributes": { "ISO_A3": "MMR", "NAM_2": "Hpakant", "ADM2CD_c": "MMR001001" },
                 "geometry": { "rings": [[[0,0],[0,1],[1,1],[0,0]]] } } ] }"#,
        ));

        let table = client.fetch_admin2("MMR").await.success().unwrap();
        assert_eq!(table.layer, Layer::Admin2);
        assert_eq!(table.len(), 1);

        let requested = client_requests(&client);
        assert!(requested[0].contains("/FeatureServer/3/query?where=ISO_A3%3D%27MMR%27"));
    }

    #[tokio::test]
    async fn test_empty_admin_result() {
        let client = client(FixtureSource::body(r#"{ "features": [] }"#));
        assert!(client.fetch_admin2("ATA").await.is_not_found());
    }

    #[tokio::test]
    async fn test_admin_diagnostics() {
        let (logs, _guard) = LogCapture::install();

        let found = client(FixtureSource::body(HAITI_ADMIN1));
        assert!(found.fetch_admin1("HTI").await.success().is_some());

        let empty = client(FixtureSource::body(r#"{ "features": [] }"#));
        assert!(empty.fetch_admin2("ATA").await.is_not_found());

        let contents = logs.contents();
        assert!(contents.contains("Found 4 admin 1 subdivisions for HTI"));
        assert!(contents.contains("No features found for admin 2 ISO='ATA'"));
    }

    #[tokio::test]
    async fn test_bad_ring_is_parse_failure() {
        let client = client(FixtureSource::body(
            r#"{ "features": [ { "attributes": {}, "geometry": { "rings": [[[0,0],[1,1]]] } } ] }"#,
        ));
        assert!(matches!(
            client.fetch_admin1("HTI").await,
            FetchOutcome::ParseFailure(BoundaryError::InvalidRing { index: 0, .. })
        ));
    }
}
