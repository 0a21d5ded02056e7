use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use crate::worker::error::WorkerError;
use crate::worker::request::{AssetRequest, AssetResponse};

/// The live network as seen from the worker. Any HTTP status is a response;
/// only a request that never completes is an error.
pub trait Network: Send + Sync {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, WorkerError>;
}

pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, WorkerError> {
        let network_error = |e: reqwest::Error| WorkerError::Network {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| WorkerError::InvalidUrl(format!("{} {}", request.method, request.url)))?;

        let resp = self
            .client
            .request(method, &request.url)
            .send()
            .map_err(network_error)?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().map_err(network_error)?.to_vec();

        Ok(AssetResponse {
            url: request.url.clone(),
            status,
            content_type,
            body,
        })
    }
}
