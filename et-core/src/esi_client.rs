use crate::pagination::{fetch_all_pages, Page};
use anyhow::{Context, Result};
use async_trait::async_trait;
use et_domain::RegionId;
use et_store::{MarketOrderSource, OrderType};
use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EsiClientError {
    #[error("ESI request failed. Status: {status}, Body: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Error decoding ESI response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct EsiClient {
    pub client: ClientWithMiddleware,
    base_url: String,
    datasource: String,
}

/// The `X-Pages` header announces how many pages a listing has.
fn total_pages(headers: &HeaderMap, current_page: u32) -> u32 {
    headers
        .get("x-pages")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(current_page)
}

impl EsiClient {
    pub fn new(client: ClientWithMiddleware, base_url: &str, datasource: &str) -> Self {
        EsiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            datasource: datasource.to_string(),
        }
    }

    pub async fn get_market_orders_page(&self, region_id: RegionId, order_type: OrderType, page: u32) -> Result<Page<Value>> {
        let mut query = vec![("datasource", self.datasource.clone()), ("page", page.to_string())];
        if order_type != OrderType::All {
            query.push(("order_type", order_type.to_string()));
        }

        let resp = self
            .client
            .get(format!("{}/markets/{}/orders/", self.base_url, region_id.0))
            .query(&query)
            .send()
            .await
            .context("Failed to send request")?;

        let status = resp.status();
        let total_pages = total_pages(resp.headers(), page);
        let body = resp.text().await.context("Failed to get response body")?;

        if !status.is_success() {
            return Err(EsiClientError::UnexpectedStatus { status: status.as_u16(), body }.into());
        }

        let data: Vec<Value> = serde_json::from_str(&body).map_err(EsiClientError::from)?;
        Ok(Page { data, total_pages })
    }
}

#[async_trait]
impl MarketOrderSource for EsiClient {
    async fn fetch_market_orders(&self, region_id: RegionId, order_type: OrderType) -> Result<Vec<Value>> {
        fetch_all_pages(|input| self.get_market_orders_page(region_id, order_type, input.page))
            .await
            .with_context(|| format!("Failed to fetch market orders of region {}", region_id))
    }
}
