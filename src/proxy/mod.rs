//! Same-origin `/api/*` rewrite to the contact directory.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};
use reqwest::Client;

use crate::errors::AppError;
use crate::AppState;

/// Request headers passed through to the directory.
const FORWARDED_HEADERS: [header::HeaderName; 3] =
    [header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION];

/// Forwards requests to `{upstream}{path}?{query}` unchanged.
pub struct ApiProxy {
    http: Client,
    upstream: String,
}

impl ApiProxy {
    pub fn new(http: Client, upstream: impl Into<String>) -> Self {
        Self {
            http,
            upstream: upstream.into(),
        }
    }

    /// Destination for an incoming request URI. Path and query are kept
    /// byte-for-byte.
    pub fn target_url(&self, uri: &Uri) -> String {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        format!("{}{}", self.upstream, path_and_query)
    }

    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let target = self.target_url(uri);
        tracing::debug!(%method, %target, "Proxying request");

        let mut request = self.http.request(method, &target);
        for name in FORWARDED_HEADERS.iter() {
            if let Some(value) = headers.get(name) {
                request = request.header(name, value);
            }
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let upstream = request.send().await.map_err(|e| {
            tracing::error!(%target, error = %e, "Proxy request failed");
            AppError::from(e)
        })?;

        let status = upstream.status();
        let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
        let body = upstream.bytes().await?;

        let mut response = (status, body).into_response();
        if let Some(value) = content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        } else {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
        Ok(response)
    }
}

/// ANY /api/{*path} - Forward to the directory.
pub async fn proxy_api(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    state.proxy.forward(method, &uri, &headers, body).await
}
