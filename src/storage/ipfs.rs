//! IPFS HTTP API backend.
//!
//! - Upload: `POST {api}/api/v0/add?cid-version=1&pin=true` (multipart `file`)
//! - Download: `POST {api}/api/v0/cat?arg=<cid>`
//!
//! Kubo reports missing content as HTTP 500 with a JSON `Message`; both that
//! and a plain 404 map to `StorageError::NotFound`.

use super::cid::Cid;
use super::traits::*;
use crate::config::StorageConfig;
use crate::net::{retry_with_backoff, RetryPolicy};
use crate::provenance::Provenance;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

const ADD_PATH: &str = "/api/v0/add";
const CAT_PATH: &str = "/api/v0/cat";

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

#[derive(Clone)]
pub struct IpfsHttpStore {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl IpfsHttpStore {
    pub fn new(api_url: &str, config: &StorageConfig) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            retry: config.retry,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Public retrieval URL for `cid`.
    pub fn gateway_url_for(&self, cid: &Cid) -> String {
        format!("{}/ipfs/{}", self.gateway_url, cid)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn add_once(&self, bytes: &[u8]) -> StorageResult<Cid> {
        let part = Part::bytes(bytes.to_vec()).file_name("blob");
        let form = Form::new().part("file", part);

        let request = self
            .http
            .post(format!("{}{}", self.api_url, ADD_PATH))
            .query(&[("cid-version", "1"), ("pin", "true")])
            .multipart(form);

        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StorageError::Http {
                status: status.as_u16(),
                body,
            });
        }

        // `add` streams one JSON object per line; the last one names the root.
        let last = body
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| StorageError::InvalidResponse("empty add response".to_string()))?;
        let added: AddResponse = serde_json::from_str(last)
            .map_err(|e| StorageError::InvalidResponse(format!("{}: {}", e, last)))?;

        if added.hash.trim().is_empty() {
            return Err(StorageError::InvalidResponse("add response has empty Hash".to_string()));
        }
        Ok(Cid::Content(added.hash))
    }
}

#[async_trait]
impl ContentStore for IpfsHttpStore {
    async fn store(&self, bytes: &[u8]) -> StorageResult<StoredAsset> {
        let cid = retry_with_backoff(
            &self.retry,
            || self.add_once(bytes),
            StorageError::is_transient,
        )
        .await?;

        info!(cid = %cid, size = bytes.len(), "payload pinned");
        let url = self.gateway_url_for(&cid);
        Ok(StoredAsset::new(cid, url, bytes))
    }

    async fn retrieve(&self, cid: &Cid) -> StorageResult<Vec<u8>> {
        if cid.is_fallback() {
            return Err(StorageError::SyntheticCid {
                cid: cid.to_string(),
            });
        }

        debug!(cid = %cid, "fetching content");
        let request = self
            .http
            .post(format!("{}{}", self.api_url, CAT_PATH))
            .query(&[("arg", cid.as_str())]);

        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let body = response.text().await.unwrap_or_default();
        if is_not_found(status, &body) {
            Err(StorageError::NotFound {
                cid: cid.to_string(),
            })
        } else {
            Err(StorageError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn provenance(&self) -> Provenance {
        Provenance::Live
    }
}

fn is_not_found(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let lowered = body.to_ascii_lowercase();
    status == StatusCode::INTERNAL_SERVER_ERROR
        && (lowered.contains("not found") || lowered.contains("no link named"))
}
