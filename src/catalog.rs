use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Number of gallery images shown in the detail overlay.
pub const MAX_OVERLAY_IMAGES: usize = 4;

/// A single product as served by the catalog endpoint.
///
/// Only `id` is required. Every other field falls back to its default when
/// absent or `null`, so sparse records still render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub price: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub discount_percentage: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub stock: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub brand: String,
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "nullable")]
    pub images: Vec<String>,
}

impl Product {
    /// Whether the title or description contains `needle`.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// The leading images shown in the detail overlay.
    pub fn overlay_images(&self) -> &[String] {
        let end = self.images.len().min(MAX_OVERLAY_IMAGES);
        &self.images[..end]
    }
}

/// Envelope of the catalog endpoint. Paging fields (`total`, `skip`,
/// `limit`) are ignored.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<Product>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a price with two decimals, rounding half away from zero.
pub fn format_price(price: f64, symbol: &str) -> String {
    let scaled = price * 100.0;
    let mut rounded = if scaled.is_finite() { scaled.round() / 100.0 } else { price };
    if rounded == 0.0 {
        // Drops the sign of -0.0
        rounded = 0.0;
    }
    format!("{symbol}{rounded:.2}")
}

/// Parse a catalog payload of the shape `{ "products": [...] }`.
pub fn parse_catalog(body: &str) -> Result<Vec<Product>, CatalogError> {
    let response: CatalogResponse = serde_json::from_str(body)?;
    Ok(response.products)
}

/// Errors raised while loading the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog endpoint {url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("Malformed catalog payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Catalog loader stopped before reporting a result")]
    Interrupted,
}

impl CatalogError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Http(e) => format!("Network error: {}", e),
            CatalogError::Status { status, .. } => {
                format!("Server responded with HTTP {}", status)
            }
            CatalogError::Payload(e) => format!("Unexpected response format: {}", e),
            CatalogError::Interrupted => "Loading was interrupted".to_string(),
        }
    }
}

/// HTTP client bound to a single catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one GET against the endpoint and parse the product list.
    pub async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        debug!(url = %self.endpoint, "requesting catalog");
        let response = self.http.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let products = parse_catalog(&body)?;
        info!(count = products.len(), "catalog fetched");
        Ok(products)
    }
}
