use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataModelError {
    #[error("unknown platform `{0}`")]
    UnknownPlatform(String),
    #[error("unknown export format `{0}`")]
    UnknownExportFormat(String),
}

/// A loosely typed value the scraper hands back as either text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(text) => write!(f, "{text}"),
            Scalar::Number(number) => write!(f, "{number}"),
            Scalar::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, alias = "name")]
    pub title: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub rating: Option<Scalar>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `/scrape` answered with a bare array at first and with `{results: [...]}`
/// in older deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScrapeResponse {
    Products(Vec<Product>),
    Legacy { results: Vec<Product> },
}

impl From<ScrapeResponse> for Vec<Product> {
    fn from(response: ScrapeResponse) -> Self {
        match response {
            ScrapeResponse::Products(products) => products,
            ScrapeResponse::Legacy { results } => results,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProduct {
    pub id: u32,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub product_url: String,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub previous_price: Option<Decimal>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub price_threshold: Option<Decimal>,
}

type TrackedRow = (
    u32,
    Option<String>,
    String,
    Option<String>,
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
    Option<String>,
);

/// Tracked products arrive as objects, or as raw table rows in column order
/// `id, product_name, product_url, platform, current_price, previous_price,
/// price_threshold, last_updated` when the backend dumps them unmapped.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TrackedProductRecord {
    Row(TrackedRow),
    Object(TrackedProduct),
}

impl From<TrackedProductRecord> for TrackedProduct {
    fn from(record: TrackedProductRecord) -> Self {
        match record {
            TrackedProductRecord::Object(product) => product,
            TrackedProductRecord::Row((
                id,
                product_name,
                product_url,
                platform,
                current_price,
                previous_price,
                price_threshold,
                last_updated,
            )) => Self {
                id,
                product_name,
                platform,
                product_url,
                current_price,
                previous_price,
                last_updated,
                price_threshold,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user: serde_json::Value,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn message_or(self, fallback: &str) -> String {
        self.message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Flipkart,
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Amazon => write!(f, "amazon"),
            Platform::Flipkart => write!(f, "flipkart"),
        }
    }
}

impl FromStr for Platform {
    type Err = DataModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" => Ok(Platform::Amazon),
            "flipkart" => Ok(Platform::Flipkart),
            other => Err(DataModelError::UnknownPlatform(other.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DataModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(DataModelError::UnknownExportFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SearchRequest {
    pub platform: Platform,
    #[validate(length(min = 1, message = "Please enter a search query."))]
    pub query: String,
}

impl SearchRequest {
    pub fn new(platform: Platform, query: &str) -> Self {
        Self {
            platform,
            query: query.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct TrackRequest {
    #[validate(length(min = 1, message = "Please enter a product URL."))]
    pub product_url: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_threshold: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter a password."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct Registration {
    #[validate(length(min = 1, message = "Please enter your name."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter a password."))]
    pub password: String,
}

/// First human readable message out of a failed validation.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| "Invalid input.".to_string())
}
