//! HTTP implementation of the matching service contract

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use shared::{
    review_debug, CommitResponse, Component, ErrorBody, ExportFormat, MasterCatalogEntry,
    MasterEntryId, MatchRunSummary, RecordId, RecordPayload, ReconciliationRecord, UploadReceipt,
};

use crate::config::ReviewConfig;
use crate::core::filter::ResultsQuery;
use crate::error::{ReviewError, ReviewResult};
use crate::traits::MatchingService;
use crate::types::{Page, PriceListUpload};

const RESULTS_PATH: &str = "api/results/";
const SEARCH_PATH: &str = "api/search-master-items/";
const UPLOAD_PATH: &str = "api/upload/";
const MATCH_PATH: &str = "api/match/";
const MANUAL_MATCH_PATH: &str = "api/manual-match/";
const EXPORT_PATH: &str = "api/export/";
const MASTER_ITEMS_PATH: &str = "api/master-items/";

/// Matching service reached over its REST API
#[derive(Clone)]
pub struct RealMatchingService {
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
    page: Page,
}

impl RealMatchingService {
    pub fn new(config: &ReviewConfig) -> ReviewResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ReviewError::transport("client setup", e.to_string()))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
            timeout: config.request_timeout,
            page: config.page,
        })
    }

    /// Direct download link of the export file
    pub fn export_url(&self, format: ExportFormat) -> ReviewResult<Url> {
        let mut url = self.endpoint(EXPORT_PATH)?;
        url.query_pairs_mut().append_pair("format", format.as_str());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> ReviewResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ReviewError::config("api_url", e.to_string()))
    }

    /// Send a request and turn transport failures and non-2xx into errors
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> ReviewResult<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ReviewError::Timeout {
                    operation,
                    after: self.timeout,
                }
            } else {
                ReviewError::transport(operation, e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a non-JSON body leaves the detail empty
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail_text());

        Err(ReviewError::HttpStatus {
            operation,
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> ReviewResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ReviewError::transport(operation, format!("invalid response body: {e}")))
    }

    fn page_params(page: Page) -> [(&'static str, String); 2] {
        [("skip", page.skip.to_string()), ("limit", page.limit.to_string())]
    }
}

#[async_trait]
impl MatchingService for RealMatchingService {
    async fn list_results(&self, query: ResultsQuery) -> ReviewResult<Vec<ReconciliationRecord>> {
        let operation = "list results";
        let url = self.endpoint(RESULTS_PATH)?;
        let request = self
            .client
            .get(url)
            .query(&query.params())
            .query(&Self::page_params(self.page));

        let response = self.send(operation, request).await?;
        let payloads: Vec<RecordPayload> = Self::decode(operation, response).await?;

        // One bad record fails the whole response
        let records = payloads
            .into_iter()
            .map(ReconciliationRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        review_debug!(Component::Client, count = records.len(), "Fetched reconciliation records");
        Ok(records)
    }

    async fn search_catalog(&self, query: String) -> ReviewResult<Vec<MasterCatalogEntry>> {
        let operation = "catalog search";
        let url = self.endpoint(SEARCH_PATH)?;
        let request = self.client.get(url).query(&[("query", query.as_str())]);

        let response = self.send(operation, request).await?;
        let entries: Vec<MasterCatalogEntry> = Self::decode(operation, response).await?;

        review_debug!(Component::Client, query = %query, count = entries.len(), "Catalog search returned");
        Ok(entries)
    }

    async fn upload_price_list(&self, upload: PriceListUpload) -> ReviewResult<UploadReceipt> {
        let operation = "price list upload";
        let url = self.endpoint(UPLOAD_PATH)?;

        let part = Part::bytes(upload.file.bytes).file_name(upload.file.file_name);
        let form = Form::new()
            .text("supplier_name", upload.supplier_name)
            .part("file", part);

        let response = self.send(operation, self.client.post(url).multipart(form)).await?;
        Self::decode(operation, response).await
    }

    async fn trigger_match(&self) -> ReviewResult<MatchRunSummary> {
        let operation = "automatic match";
        let url = self.endpoint(MATCH_PATH)?;

        let response = self.send(operation, self.client.post(url)).await?;
        Self::decode(operation, response).await
    }

    async fn commit_manual_match(&self, record_id: RecordId, master_id: MasterEntryId) -> ReviewResult<()> {
        let operation = "manual match";
        let url = self.endpoint(&format!("{MANUAL_MATCH_PATH}{record_id}"))?;
        let request = self
            .client
            .post(url)
            .query(&[("master_item_id", master_id.to_string())]);

        let response = match self.send(operation, request).await {
            Ok(response) => response,
            // 4xx means the server refused this association
            Err(ReviewError::HttpStatus { status, detail, .. }) if (400..500).contains(&status) => {
                return Err(ReviewError::CommitConflict {
                    record_id,
                    detail: detail.unwrap_or_else(|| format!("HTTP {status}")),
                });
            }
            Err(e) => return Err(e),
        };

        let ack: CommitResponse = Self::decode(operation, response).await?;
        if !ack.success {
            return Err(ReviewError::CommitConflict {
                record_id,
                detail: "server did not confirm the match".to_string(),
            });
        }
        Ok(())
    }

    async fn export(&self, format: ExportFormat) -> ReviewResult<Vec<u8>> {
        let operation = "export";
        let url = self.export_url(format)?;

        let response = self.send(operation, self.client.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReviewError::transport(operation, e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn list_master_items(&self, page: Page) -> ReviewResult<Vec<MasterCatalogEntry>> {
        let operation = "master catalog listing";
        let url = self.endpoint(MASTER_ITEMS_PATH)?;
        let request = self.client.get(url).query(&Self::page_params(page));

        let response = self.send(operation, request).await?;
        Self::decode(operation, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_under_base_path() {
        let config = ReviewConfig::default().with_api_url("http://matcher:9000/prefix").unwrap();
        let service = RealMatchingService::new(&config).unwrap();

        assert_eq!(
            service.endpoint(RESULTS_PATH).unwrap().as_str(),
            "http://matcher:9000/prefix/api/results/"
        );
        assert_eq!(
            service.export_url(ExportFormat::Xml).unwrap().as_str(),
            "http://matcher:9000/prefix/api/export/?format=xml"
        );
    }
}
