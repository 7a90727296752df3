//! Request decorators that attach an ArcGIS token.
//!
//! ArcGIS accepts a token either as the `token` query parameter or as an
//! `X-Esri-Authorization: Bearer <token>` header; [`TokenMode`] picks one.

mod api_key;
mod url_param;

pub use api_key::{ApiKey, ApiKeyError};
pub use url_param::UrlParam;

use std::str::FromStr;

/// Where the token travels on each request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenMode {
    #[default]
    Query,
    Header,
}

impl FromStr for TokenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(TokenMode::Query),
            "header" => Ok(TokenMode::Header),
            other => Err(format!("unknown token mode '{other}' (expected 'query' or 'header')")),
        }
    }
}
