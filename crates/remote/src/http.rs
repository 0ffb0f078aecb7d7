//! HTTP client for the remote file manager CGI.
//!
//! Async client using `reqwest`. Endpoints live under a common base URL:
//! `{base}/info`, `{base}/get`, `{base}/put`, `{base}/delete`.

use std::time::Duration;

use remotefm_protocol::{InfoQuery, InfoResponse, StatusResponse, path_query, put_query};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{RemoteApi, RemoteFuture};
use crate::error::RemoteError;

/// Remote file manager API client.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Creates a client for the CGI mounted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().build()?;
        Self::with_client(base_url, http)
    }

    /// Creates a client whose requests time out after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, RemoteError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str, query: &str) -> String {
        format!("{}/{name}?{query}", self.base_url)
    }

    /// Sends a request and decodes its JSON body.
    ///
    /// The CGI answers rejections with a non-2xx status *and* an
    /// `{"ok": false, "msg": ...}` body, so the body is decoded whenever it
    /// parses; the status only matters when it does not.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        match serde_json::from_slice::<T>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(RemoteError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(e) => Err(RemoteError::Json(e)),
        }
    }
}

impl RemoteApi for HttpRemote {
    fn info<'a>(&'a self, query: &'a InfoQuery) -> RemoteFuture<'a, InfoResponse> {
        Box::pin(async move {
            let url = self.endpoint("info", query.query());
            debug!(url = %url, "Tx info");
            let resp: InfoResponse = self.send_json(self.http.get(&url)).await?;
            debug!(ok = resp.ok, paths = resp.paths.len(), "Rx info");
            Ok(resp)
        })
    }

    fn put<'a>(
        &'a self,
        path: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> RemoteFuture<'a, StatusResponse> {
        Box::pin(async move {
            let url = self.endpoint("put", &put_query(path, offset));
            debug!(url = %url, bytes = data.len(), "Tx put");
            let request = self
                .http
                .post(&url)
                .header(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/octet-stream"),
                )
                .body(data.to_vec());
            let resp: StatusResponse = self.send_json(request).await?;
            debug!(ok = resp.ok, "Rx put");
            Ok(resp)
        })
    }

    fn get<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let url = self.endpoint("get", &path_query(path));
            debug!(url = %url, "Tx get");
            let resp = self.http.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(RemoteError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(resp.bytes().await?.to_vec())
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> RemoteFuture<'a, StatusResponse> {
        Box::pin(async move {
            let url = self.endpoint("delete", &path_query(path));
            debug!(url = %url, "Tx delete");
            let resp: StatusResponse = self.send_json(self.http.get(&url)).await?;
            debug!(ok = resp.ok, "Rx delete");
            Ok(resp)
        })
    }

    fn download_url(&self, path: &str) -> String {
        self.endpoint("get", &path_query(path))
    }
}
