use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends a token as a URL query parameter.
///
/// For ArcGIS services `param_name` is `"token"`.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    pub fn arcgis_token(inner: C, token: impl Into<String>) -> Self {
        Self {
            inner,
            param_name: "token".to_string(),
            key: token.into(),
        }
    }

    fn apply(&self, url: &mut reqwest::Url) {
        url.query_pairs_mut().append_pair(&self.param_name, &self.key);
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.apply(req.url_mut());
        self.inner.execute(req).await
    }
}
