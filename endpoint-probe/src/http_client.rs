use crate::{error::Error, util, RequestData, ResponseData};
use async_trait::async_trait;
use hyper::HeaderMap;
use std::{fmt::Debug, time::Duration};

/// The transport seam the harness sends every request through.
///
/// An `Err` means no response was obtained at all; any status code, including
/// 4xx and 5xx, comes back as `Ok`.
#[async_trait]
pub trait HttpClient: Debug {
    async fn send(&self, request: &RequestData, timeout: Duration)
        -> Result<ResponseData, Error>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        request_data: &RequestData,
        timeout: Duration,
    ) -> Result<ResponseData, Error> {
        let method = reqwest::Method::from_bytes(request_data.method.as_bytes())
            .map_err(|e| Error::HttpError(e.into()))?;

        let mut headers = HeaderMap::new();
        util::put_headers(&mut headers, &request_data.headers)?;

        let mut request_builder = self
            .client
            .request(method, request_data.uri.as_str())
            .headers(headers)
            .timeout(timeout);

        if !request_data.body.is_empty() {
            request_builder = request_builder.body(request_data.body.clone());
        }

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::from(e)
            }
        })?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::from(e)
            }
        })?;

        Ok(ResponseData {
            status_code,
            body: String::from_utf8_lossy(&body).into(),
            headers,
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
