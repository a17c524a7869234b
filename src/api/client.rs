use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use super::{
    ApiError, HealthStatus, LeadRecord, LeadResult, LeadService, LeadStats, LeadSubmission,
    StatusMessage,
};
use crate::config::AppConfig;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the lead service. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| transport_error(&e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(config.backend_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json")
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        log::info!("API request: {} {}", method, path);

        let response = request.send().await.map_err(|e| {
            log::error!("API request failed: {} {}: {}", method, path, e);
            transport_error(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("API error response: {} {}: {}", status.as_u16(), path, body);
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        log::info!("API response: {} {}", status.as_u16(), path);

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to read response to {} {}: {}", method, path, e);
            transport_error(&e)
        })
    }

    pub async fn create_lead(&self, lead: &LeadSubmission) -> Result<LeadResult, ApiError> {
        let path = "/leads";
        let request = self.request(Method::POST, path).json(lead);
        self.dispatch(Method::POST, path, request).await
    }

    pub async fn list_leads(&self, skip: u32, limit: u32) -> Result<Vec<LeadRecord>, ApiError> {
        let path = "/leads";
        let request = self
            .request(Method::GET, path)
            .query(&[("skip", skip), ("limit", limit)]);
        self.dispatch(Method::GET, path, request).await
    }

    pub async fn lead_stats(&self) -> Result<LeadStats, ApiError> {
        let path = "/leads/stats";
        self.dispatch(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    pub async fn mark_whatsapp_joined(&self, lead_id: Uuid) -> Result<StatusMessage, ApiError> {
        let path = format!("/leads/{}/whatsapp-joined", lead_id);
        self.dispatch(Method::PUT, &path, self.request(Method::PUT, &path))
            .await
    }

    pub async fn mark_ebook_sent(&self, lead_id: Uuid) -> Result<StatusMessage, ApiError> {
        let path = format!("/leads/{}/ebook-sent", lead_id);
        self.dispatch(Method::PUT, &path, self.request(Method::PUT, &path))
            .await
    }

    pub async fn delete_lead(&self, lead_id: Uuid) -> Result<StatusMessage, ApiError> {
        let path = format!("/leads/{}", lead_id);
        self.dispatch(Method::DELETE, &path, self.request(Method::DELETE, &path))
            .await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let path = "/health";
        self.dispatch(Method::GET, path, self.request(Method::GET, path))
            .await
    }
}

impl LeadService for ApiClient {
    fn submit_lead(
        &self,
        lead: &LeadSubmission,
    ) -> impl Future<Output = Result<LeadResult, ApiError>> + Send {
        self.create_lead(lead)
    }
}

fn transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_builder() {
        let message = err.to_string();
        ApiError::Request((!message.is_empty()).then_some(message))
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Connection
    }
}
