//! Country boundary queries

use super::client::{BoundaryClient, FeatureSource, settle};
use crate::error::FetchOutcome;
use crate::models::{CountryRecord, Layer, LayerQuery};
use tracing::{info, warn};

impl<S: FeatureSource> BoundaryClient<S> {
    /// Get the boundary of the country whose `attribute` equals `value`
    ///
    /// Common attributes are `ISO_A3`, `NAME_EN`, `WB_A2` and `WB_A3`. Only the
    /// first matching feature is used; extra matches are logged and dropped.
    pub async fn fetch_country(&self, attribute: &str, value: &str) -> FetchOutcome<CountryRecord> {
        let query =
            LayerQuery::attribute_equals(Layer::Country, attribute, value).with_out_sr(self.out_sr);
        let subject = format!("{}='{}'", attribute, value);

        let result = self.query_layer(&query).await.and_then(|features| {
            let match_count = features.len();
            let Some(first) = features.into_iter().next() else {
                return Ok(None);
            };

            if match_count > 1 {
                warn!(
                    "{} countries matched {}, keeping the first and dropping {}",
                    match_count,
                    subject,
                    match_count - 1
                );
            }

            CountryRecord::from_feature(first, match_count).map(Some)
        });

        if let Ok(Some(record)) = &result {
            info!(
                "Found country for {} ({} polygon parts)",
                subject,
                record.rings.0.len()
            );
        }

        settle(result, &subject)
    }
}

#[cfg(test)]
mod tests {
    use super::super::client::fixtures::*;
    use crate::error::{BoundaryError, FetchOutcome};
    use geo::Area;
    use serde_json::Value as JsonValue;

    const HAITI: &str = r#"
    {
        "features": [
            {
                "attributes": { "ISO_A3": "HTI", "NAME_EN": "Haiti" },
                "geometry": { "rings": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]] }
            }
        ]
    }
    "#;

    #[tokio::test]
    async fn test_fetch_haiti() {
        let client = client(FixtureSource::body(HAITI));

        let record = client.fetch_country("ISO_A3", "HTI").await.success().unwrap();

        assert_eq!(record.get("NAME_EN"), Some(&JsonValue::from("Haiti")));
        assert_eq!(record.get("ISO_A3"), Some(&JsonValue::from("HTI")));
        assert_eq!(record.rows.len(), 2);
        assert_eq!(record.rings.0.len(), 1);
        assert!((record.rings.unsigned_area() - 1.0).abs() < 1e-9);
        assert_eq!(record.match_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let client = client(FixtureSource::body(HAITI));

        let first = client.fetch_country("NAME_EN", "Haiti").await.success();
        let second = client.fetch_country("NAME_EN", "Haiti").await.success();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_features_is_not_found() {
        let client = client(FixtureSource::body(r#"{ "features": [] }"#));
        assert!(client.fetch_country("ISO_A3", "XXX").await.is_not_found());
    }

    #[tokio::test]
    async fn test_not_found_names_attribute_and_value() {
        let (logs, _guard) = LogCapture::install();
        let client = client(FixtureSource::body(r#"{ "features": [] }"#));

        assert!(client.fetch_country("ISO_A3", "XXX").await.is_not_found());

        let contents = logs.contents();
        let line = contents
            .lines()
            .find(|l| l.contains("No features found"))
            .expect("not-found line");
        assert!(line.contains("ISO_A3"));
        assert!(line.contains("XXX"));
    }

    #[tokio::test]
    async fn test_first_match_is_kept() {
        let client = client(FixtureSource::body(
            r#"{ "features": [
                { "attributes": { "NAME_EN": "First" }, "geometry": { "rings": [[[0,0],[0,1],[1,1],[0,0]]] } },
                { "attributes": { "NAME_EN": "Second" }, "geometry": { "rings": [[[0,0],[0,1],[1,1],[0,0]]] } }
            ] }"#,
        ));

        let record = client.fetch_country("WB_A2", "XX").await.success().unwrap();
        assert_eq!(record.get("NAME_EN"), Some(&JsonValue::from("First")));
        assert_eq!(record.match_count, 2);
    }

    #[tokio::test]
    async fn test_hole_reduces_area() {
        let client = client(FixtureSource::body(
            r#"{ "features": [ { "attributes": { "ISO_A3": "LSO" }, "geometry": { "rings": [
                [[0,0],[0,10],[10,10],[10,0],[0,0]],
                [[2,2],[4,2],[4,4],[2,4],[2,2]]
            ] } } ] }"#,
        ));

        let record = client.fetch_country("ISO_A3", "LSO").await.success().unwrap();
        assert!(record.rings.unsigned_area() < 100.0);
    }

    #[tokio::test]
    async fn test_timeout_is_network_failure() {
        let client = client(FixtureSource::new(Reply::Timeout));
        let outcome = client.fetch_country("ISO_A3", "HTI").await;
        assert!(matches!(
            outcome,
            FetchOutcome::NetworkFailure(BoundaryError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_http_status_is_network_failure() {
        let client = client(FixtureSource::new(Reply::Status(503)));
        let outcome = client.fetch_country("ISO_A3", "HTI").await;
        assert!(matches!(
            outcome,
            FetchOutcome::NetworkFailure(BoundaryError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_rings_is_parse_failure() {
        let client = client(FixtureSource::body(
            r#"{ "features": [ { "attributes": { "ISO_A3": "HTI" }, "geometry": {} } ] }"#,
        ));
        let outcome = client.fetch_country("ISO_A3", "HTI").await;
        assert!(matches!(
            outcome,
            FetchOutcome::ParseFailure(BoundaryError::MissingGeometry)
        ));
    }

    #[tokio::test]
    async fn test_predicate_is_encoded() {
        let client = client(FixtureSource::body(r#"{ "features": [] }"#));
        client.fetch_country("NAME_EN", "Cote d'Ivoire").await;

        let requested = client_requests(&client);
        assert!(requested[0].contains("where=NAME_EN%3D%27Cote%20d%27%27Ivoire%27"));
        assert!(requested[0].contains("/FeatureServer/0/query?"));
    }
}
