//! Runtime settings for the two feature layers and their transport.
//!
//! Values normally arrive from the command line, each flag falling back to
//! an environment variable (a `.env` file is loaded first).

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::dashboard::Dashboard;
use crate::fetch::auth::{ApiKey, TokenMode, UrlParam};
use crate::fetch::{BasicClient, HttpClient};
use crate::infra::arcgis::ArcGisLayer;
use crate::query::Extent;

pub const DEFAULT_MUNICIPIOS_URL: &str =
    "https://services6.arcgis.com/cdylwBTTDF2F9FTY/ArcGIS/rest/services/BCS/FeatureServer/0";

pub const DEFAULT_PROYECTOS_URL: &str =
    "https://services6.arcgis.com/cdylwBTTDF2F9FTY/ArcGIS/rest/services/CAPA_PROYECTOS/FeatureServer";

/// Initial map centre (longitude, latitude).
pub const DEFAULT_CENTER: (f64, f64) = (-110.309, 24.142);

/// Half extent of the initial view in degrees, roughly what a zoom-6 map
/// shows around the centre.
pub const DEFAULT_HALF_SPAN: (f64, f64) = (5.6, 3.4);

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub municipios_url: String,
    pub proyectos_url: String,
    pub token: Option<String>,
    pub token_mode: TokenMode,
    pub timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            municipios_url: DEFAULT_MUNICIPIOS_URL.to_string(),
            proyectos_url: DEFAULT_PROYECTOS_URL.to_string(),
            token: None,
            token_mode: TokenMode::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Viewport used until the user supplies one.
    pub fn default_extent() -> Extent {
        Extent::around(
            DEFAULT_CENTER.0,
            DEFAULT_CENTER.1,
            DEFAULT_HALF_SPAN.0,
            DEFAULT_HALF_SPAN.1,
        )
    }

    /// Transport shared by both layers, wrapped with the token decorator when
    /// a token is configured.
    pub fn http_client(&self) -> Result<Arc<dyn HttpClient>> {
        let basic = BasicClient::new(self.timeout).context("building HTTP client")?;

        let client: Arc<dyn HttpClient> = match (self.token.as_deref(), self.token_mode) {
            (None, _) | (Some(""), _) => Arc::new(basic),
            (Some(token), TokenMode::Query) => Arc::new(UrlParam::arcgis_token(basic, token)),
            (Some(token), TokenMode::Header) => Arc::new(
                ApiKey::esri_bearer(basic, token).context("invalid ARCGIS_TOKEN for header auth")?,
            ),
        };
        Ok(client)
    }

    pub fn dashboard(&self) -> Result<Dashboard<ArcGisLayer>> {
        let client = self.http_client()?;
        info!(
            municipios = %self.municipios_url,
            proyectos = %self.proyectos_url,
            authenticated = self.token.is_some(),
            "Binding feature layers"
        );

        let municipios = ArcGisLayer::new("municipios", &self.municipios_url, client.clone())
            .context("municipality layer URL")?;
        let proyectos = ArcGisLayer::new("proyectos", &self.proyectos_url, client)
            .context("project layer URL")?;

        Ok(Dashboard::new(municipios, proyectos))
    }
}
