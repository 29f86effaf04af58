//! Zoho CRM REST client
//! Handles client initialization, OAuth token acquisition and record reads

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{ApiError, ApiResponse, CoqlQuery, CrmApi, RecordsRequest};
use crate::config::CrmConfig;

/// Reply of the accounts server token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// Zoho CRM API client
///
/// Constructed once at startup through [`ZohoCrmClient::initialize`] and shared
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct ZohoCrmClient {
    client: Client,
    api_base: String,
    access_token: String,
}

impl ZohoCrmClient {
    /// Validate the config, build the HTTP client and obtain an access token.
    ///
    /// A configured `access_token` is used as-is. Otherwise one refresh-token
    /// grant is made against the accounts server.
    pub async fn initialize(config: &CrmConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|e| ApiError::Config(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let access_token = match config.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => Self::refresh_access_token(&client, config).await?,
        };

        let api_base = format!(
            "{}/crm/{}",
            config.api_domain.trim_end_matches('/'),
            config.api_version
        );
        info!("CRM client initialized for {}", api_base);

        Ok(Self {
            client,
            api_base,
            access_token,
        })
    }

    async fn refresh_access_token(
        client: &Client,
        config: &CrmConfig,
    ) -> Result<String, ApiError> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            config.refresh_token.as_deref(),
            config.client_id.as_deref(),
            config.client_secret.as_deref(),
        ) else {
            return Err(ApiError::Config(
                "refresh_token, client_id and client_secret are required without an access_token"
                    .to_string(),
            ));
        };

        let url = format!("{}/oauth/v2/token", config.accounts_url.trim_end_matches('/'));
        debug!("Requesting access token from {}", url);

        let response = client
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!("token endpoint returned {}: {}", status.as_u16(), error_text)));
        }

        let token: TokenResponse = response.json().await?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(access_token),
            _ => Err(ApiError::Auth(
                token.error.unwrap_or_else(|| "no access_token in response".to_string()),
            )),
        }
    }

    /// Get headers with the OAuth token
    pub(crate) fn get_headers(&self) -> Result<reqwest::header::HeaderMap, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth: reqwest::header::HeaderValue = format!("Zoho-oauthtoken {}", self.access_token)
            .parse()
            .map_err(|_| ApiError::Auth("access token is not a valid header value".to_string()))?;
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        Ok(headers)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Turn a reply into an [`ApiResponse`], mapping non-2xx statuses to errors
    pub(crate) async fn into_api_response(
        response: reqwest::Response,
    ) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(crate::api::sanitize_api_error(status.as_u16(), text));
        }

        // 204 No Content is how the API reports an empty module
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl CrmApi for ZohoCrmClient {
    async fn get_records(
        &self,
        request: &RecordsRequest,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.module);

        let response = self.client
            .get(&url)
            .headers(self.get_headers()?)
            .query(&request.params)
            .send()
            .await?;

        Self::into_api_response(response).await
    }

    async fn coql_query(
        &self,
        query: &CoqlQuery,
    ) -> Result<ApiResponse, ApiError> {
        query.send(self).await
    }
}
