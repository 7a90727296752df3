//! HTTP plumbing shared by every feature layer query.
//!
//! [`HttpClient`] is the seam the layer clients are written against, so the
//! token decorators in [`auth`] can wrap the plain [`BasicClient`].

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use tracing::debug;

use crate::query::QueryError;

/// Issues a GET for `url` and returns the body, rejecting non-2xx statuses.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: Url) -> Result<Vec<u8>, QueryError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(QueryError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}
