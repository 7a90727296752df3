use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetch::{HttpClient, fetch_bytes};
use crate::query::{AttributeRecord, FeatureQuery, FeatureSource, QueryError};

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default, rename = "exceededTransferLimit")]
    exceeded_transfer_limit: bool,
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    attributes: AttributeRecord,
}

#[derive(Deserialize)]
struct ServiceError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// One layer of an ArcGIS feature service, queried over its REST endpoint.
pub struct ArcGisLayer {
    name: String,
    endpoint: Url,
    client: Arc<dyn HttpClient>,
}

impl ArcGisLayer {
    /// `url` may point at a layer (`.../FeatureServer/0`) or at the service
    /// root (`.../FeatureServer`), in which case layer 0 is used.
    pub fn new(
        name: impl Into<String>,
        url: &str,
        client: Arc<dyn HttpClient>,
    ) -> Result<Self, QueryError> {
        let invalid = |reason: String| QueryError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let mut endpoint = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        endpoint.set_query(None);
        endpoint.set_fragment(None);

        let trimmed = endpoint.path().trim_end_matches('/');
        let service_root = trimmed.ends_with("/FeatureServer") || trimmed.ends_with("/MapServer");

        endpoint
            .path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(if service_root { &["0", "query"][..] } else { &["query"][..] });

        Ok(Self {
            name: name.into(),
            endpoint,
            client,
        })
    }

    /// The full GET URL for `query`.
    pub fn query_url(&self, query: &FeatureQuery) -> Url {
        let out_fields = if query.out_fields.is_empty() {
            "*".to_string()
        } else {
            query.out_fields.join(",")
        };

        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("where", &query.filter.to_where())
                .append_pair("outFields", &out_fields)
                .append_pair("returnGeometry", "false");

            if let Some(extent) = &query.extent {
                pairs
                    .append_pair("geometry", &extent.to_geometry_param())
                    .append_pair("geometryType", "esriGeometryEnvelope")
                    .append_pair("inSR", "4326")
                    .append_pair("spatialRel", "esriSpatialRelIntersects");
            }

            pairs.append_pair("f", "json");
        }
        url
    }
}

#[async_trait]
impl FeatureSource for ArcGisLayer {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(skip(self, query), fields(layer = %self.name, filter = %query.filter.to_where()))]
    async fn query_features(&self, query: &FeatureQuery) -> Result<Vec<AttributeRecord>, QueryError> {
        let url = self.query_url(query);
        debug!(%url, "Querying feature layer");

        let bytes = fetch_bytes(self.client.as_ref(), url).await?;
        let records = parse_query_response(&bytes)?;

        debug!(records = records.len(), "Feature query complete");
        Ok(records)
    }
}

/// Decodes a `f=json` query response into attribute rows, in service order.
///
/// ArcGIS reports most failures with HTTP 200 and an `error` object in the
/// body; those surface as [`QueryError::Service`].
pub fn parse_query_response(bytes: &[u8]) -> Result<Vec<AttributeRecord>, QueryError> {
    let response: QueryResponse = serde_json::from_slice(bytes)?;

    if let Some(err) = response.error {
        return Err(QueryError::Service {
            code: err.code,
            message: err.message,
        });
    }

    if response.exceeded_transfer_limit {
        warn!(
            returned = response.features.len(),
            "Feature service truncated the result set"
        );
    }

    Ok(response.features.into_iter().map(|f| f.attributes).collect())
}
