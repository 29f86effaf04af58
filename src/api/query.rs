//! COQL (CRM Object Query Language) requests
//! `POST /coql` with a `select_query` body

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{ApiError, ApiResponse, ZohoCrmClient};

/// A COQL select query, sent as `{"select_query": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoqlQuery {
    pub select_query: String,
}

impl CoqlQuery {
    /// Wrap a raw query string
    pub fn new(select_query: impl Into<String>) -> Self {
        Self {
            select_query: select_query.into(),
        }
    }

    /// Start building a `select ... from ...` query
    pub fn select<I, S>(fields: I) -> SelectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectBuilder {
            fields: fields.into_iter().map(Into::into).collect(),
            ..SelectBuilder::default()
        }
    }

    pub(crate) async fn send(
        &self,
        client: &ZohoCrmClient,
    ) -> Result<ApiResponse, ApiError> {
        let url = client.url("coql");
        debug!("COQL query: {}", self.select_query);

        let response = client
            .http()
            .post(&url)
            .headers(client.get_headers()?)
            .json(self)
            .send()
            .await?;

        ZohoCrmClient::into_api_response(response).await
    }
}

/// Builder for [`CoqlQuery`]
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    fields: Vec<String>,
    module: Option<String>,
    criteria: Option<String>,
    order_by: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl SelectBuilder {
    pub fn from(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Raw criteria placed after `where`
    pub fn filter(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(self) -> Result<CoqlQuery, ApiError> {
        if self.fields.is_empty() {
            return Err(ApiError::Config("COQL query needs at least one field".to_string()));
        }
        let Some(module) = self.module.filter(|m| !m.is_empty()) else {
            return Err(ApiError::Config("COQL query needs a module".to_string()));
        };

        let mut query = format!("select {} from {}", self.fields.join(", "), module);
        if let Some(criteria) = self.criteria {
            query.push_str(&format!(" where {}", criteria));
        }
        if let Some(order_by) = self.order_by {
            query.push_str(&format!(" order by {}", order_by));
        }
        // COQL only accepts an offset as part of `limit offset, count`
        match (self.offset, self.limit) {
            (Some(offset), Some(limit)) => query.push_str(&format!(" limit {}, {}", offset, limit)),
            (None, Some(limit)) => query.push_str(&format!(" limit {}", limit)),
            _ => {}
        }

        Ok(CoqlQuery::new(query))
    }
}
