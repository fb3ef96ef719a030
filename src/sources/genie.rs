use crate::config::ApiConfig;
use crate::models::{ListingPage, SortOrder};
use crate::sources::traits::ListingSource;
use crate::sources::types::PageRequest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the Property Genie listing API
pub struct PropertyGenieApi {
    client: Client,
    base_url: String,
}

impl PropertyGenieApi {
    /// Create a client from the API section of the configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ListingSource for PropertyGenieApi {
    async fn fetch_page(&self, page: usize, sort: SortOrder) -> Result<ListingPage> {
        let request = PageRequest::new(page, sort);
        debug!("POST {} {:?}", self.base_url, request.query_pairs());

        // The API only answers POST, with an empty JSON request
        let response = self
            .client
            .post(&self.base_url)
            .query(&request.query_pairs())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .context("Failed to reach listing API")?;

        if !response.status().is_success() {
            warn!("Listing API returned status: {}", response.status());
            anyhow::bail!("Failed to fetch properties: {}", response.status());
        }

        let listing = response
            .json::<ListingPage>()
            .await
            .context("Failed to decode listing page")?;

        debug!(
            "Page {}/{}: {} items",
            listing.meta.current_page,
            listing.meta.page_count,
            listing.items.len()
        );
        Ok(listing)
    }

    fn source_name(&self) -> &'static str {
        "Property Genie"
    }
}
