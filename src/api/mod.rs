pub mod client;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

pub use client::ApiClient;

const INVALID_DATA: &str = "Invalid data.";
const UNKNOWN_ERROR: &str = "Unknown error.";

/// Body of `POST /leads`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadSubmission {
    pub email: String,
    /// Digits only.
    pub phone: String,
    pub source: String,
}

/// Response of `POST /leads`. Everything except the group URL is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadResult {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub source: String,
    /// Naive UTC timestamp as the service emits it.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub whatsapp_group_url: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl LeadResult {
    /// The group URL, treating an empty string as absent.
    pub fn group_url(&self) -> Option<&str> {
        self.whatsapp_group_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadRecord {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub whatsapp_joined: bool,
    #[serde(default)]
    pub ebook_sent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadStats {
    pub total_leads: u64,
    pub leads_today: u64,
    pub leads_this_week: u64,
    pub leads_this_month: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
}

/// Every way a call to the lead service can fail. `Display` is the message
/// shown to the user; server internals never leak through it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400, with the server's `detail` when it sent a readable one.
    #[error("{}", .0.as_deref().unwrap_or(INVALID_DATA))]
    Validation(Option<String>),

    #[error("Resource not found.")]
    NotFound,

    #[error("Internal server error.")]
    Server,

    #[error("{}", .detail.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Unexpected { status: u16, detail: Option<String> },

    /// The request went out but no response came back (refused, reset, timed out).
    #[error("Connection error. Check your internet connection.")]
    Connection,

    /// The request could not be built or sent at all.
    #[error("{}", .0.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Request(Option<String>),

    /// A success status with a body we could not read.
    #[error("Unknown error.")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response by status and raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            400 => ApiError::Validation(extract_detail(body)),
            404 => ApiError::NotFound,
            500 => ApiError::Server,
            _ => ApiError::Unexpected {
                status,
                detail: extract_detail(body),
            },
        }
    }
}

/// Pull a string `detail` out of an error body like `{"detail": "..."}`.
/// Structured details (lists of field errors) are not user-facing.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// The one call the signup form needs from the lead service.
pub trait LeadService {
    fn submit_lead(
        &self,
        lead: &LeadSubmission,
    ) -> impl Future<Output = Result<LeadResult, ApiError>> + Send;
}
