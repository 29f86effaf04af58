//! Zoho CRM API client
//! Records API for module reads, COQL API for queries

pub mod client;
pub mod query;

pub use client::ZohoCrmClient;
pub use query::CoqlQuery;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Rate limited")]
    RateLimited,
    #[error("Invalid client configuration: {0}")]
    Config(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Paging parameters for a records request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsParams {
    pub page: u32,
    pub per_page: u32,
}

/// Input for the "get records" operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsRequest {
    /// API name of the module, e.g. `Leads`
    pub module: String,
    pub params: RecordsParams,
}

impl RecordsRequest {
    pub fn new(module: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            module: module.into(),
            params: RecordsParams { page, per_page },
        }
    }
}

/// Parsed API reply. The body shape depends on the endpoint and is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Operations the SDK exposes against a CRM account
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Fetch one page of records from a module
    async fn get_records(
        &self,
        request: &RecordsRequest,
    ) -> Result<ApiResponse, ApiError>;

    /// Run a COQL select query
    async fn coql_query(
        &self,
        query: &CoqlQuery,
    ) -> Result<ApiResponse, ApiError>;
}

/// Sanitize API error message to avoid leaking sensitive information
/// In production, returns generic error message for 5xx
/// In debug mode, returns detailed error
pub fn sanitize_api_error(status: u16, detailed_message: String) -> ApiError {
    if status == 429 {
        return ApiError::RateLimited;
    }

    if cfg!(not(debug_assertions)) && status >= 500 {
        tracing::error!("API error {}: {}", status, detailed_message);
        return ApiError::ApiError {
            status,
            message: "Internal server error".to_string(),
        };
    }

    // 4xx bodies carry Zoho's error code, keep them but cap the length
    let safe_message = if detailed_message.chars().count() > 500 {
        let truncated: String = detailed_message.chars().take(500).collect();
        format!("{}... (truncated)", truncated)
    } else {
        detailed_message
    };

    ApiError::ApiError {
        status,
        message: safe_message,
    }
}
