use crate::data_models::{
    AuthSession, Credentials, ExportFormat, MessageResponse, Product, Registration,
    ScrapeResponse, SearchRequest, TrackRequest, TrackedProduct, TrackedProductRecord,
};
use crate::navigation::Navigator;
use crate::session::SessionStorage;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

mod errors;

pub use errors::ApiError;

const USER_AGENT: &str = concat!("tracker-client/", env!("CARGO_PKG_VERSION"));

pub const SCRAPE_PATH: &str = "scrape";
pub const TRACK_PATH: &str = "track";
pub const TRACKED_PRODUCTS_PATH: &str = "tracked_products";
pub const UPDATE_PRICES_PATH: &str = "update_prices";
pub const DOWNLOAD_PATH: &str = "download";
pub const CHECK_AUTH_PATH: &str = "check-auth";
pub const LOGIN_PATH: &str = "login";
pub const REGISTER_PATH: &str = "register";

pub fn remove_tracked_product_path(id: u32) -> String {
    format!("remove_tracked_product/{id}")
}

/// Picks the server's `error` (or `message`) field out of a failed response,
/// `Server error: <status>` otherwise.
pub fn server_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(|field| field.as_str())
                    .filter(|text| !text.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

/// HTTP client for the tracking backend. Attaches the bearer token of the
/// current session to every request and tears the session down on 401.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    login_url: String,
    http: Client,
    session: Arc<SessionStorage>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("login_url", &self.login_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        mut base_url: Url,
        login_url: impl Into<String>,
        session: Arc<SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .redirect(Policy::limited(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            base_url,
            login_url: login_url.into(),
            http,
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &SessionStorage {
        &self.session
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn auth_header(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.token()? {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub fn is_authenticated(&self) -> bool {
        match self.session.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!("failed to read session: {e}");
                false
            }
        }
    }

    /// Drops the stored session and sends the user to the login view.
    pub fn end_session(&self) {
        if let Err(e) = self.session.clear() {
            error!("failed to clear session: {e}");
        }
        self.navigator.redirect(&self.login_url);
    }

    pub async fn handle_api_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "request unauthorized, ending session");
            self.end_session();
            return Err(ApiError::Unauthorized);
        }
        Self::decode_response(response).await
    }

    async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_error_message(status, &body);
            debug!(%status, "request failed: {message}");
            return Err(ApiError::Server(message));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending request");
        Ok(self.http.request(method, url).headers(self.auth_header()?))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        self.handle_api_response(response).await
    }

    pub async fn scrape(&self, request: &SearchRequest) -> Result<Vec<Product>, ApiError> {
        let builder = self.request(Method::POST, SCRAPE_PATH)?.json(request);
        let response: ScrapeResponse = self.send(builder).await?;
        Ok(response.into())
    }

    pub async fn track(&self, request: &TrackRequest) -> Result<MessageResponse, ApiError> {
        let builder = self.request(Method::POST, TRACK_PATH)?.json(request);
        self.send(builder).await
    }

    pub async fn tracked_products(&self) -> Result<Vec<TrackedProduct>, ApiError> {
        let builder = self.request(Method::GET, TRACKED_PRODUCTS_PATH)?;
        let records: Vec<TrackedProductRecord> = self.send(builder).await?;
        Ok(records.into_iter().map(TrackedProduct::from).collect())
    }

    pub async fn remove_tracked_product(&self, id: u32) -> Result<MessageResponse, ApiError> {
        let builder = self.request(Method::DELETE, &remove_tracked_product_path(id))?;
        self.send(builder).await
    }

    pub async fn update_prices(&self) -> Result<MessageResponse, ApiError> {
        let builder = self.request(Method::POST, UPDATE_PRICES_PATH)?;
        self.send(builder).await
    }

    pub async fn check_auth(&self) -> Result<serde_json::Value, ApiError> {
        let builder = self.request(Method::GET, CHECK_AUTH_PATH)?;
        self.send(builder).await
    }

    /// `t` only defeats caches; the browser or the host performs the download.
    pub fn download_url(&self, format: ExportFormat, timestamp_ms: i64) -> Result<Url, ApiError> {
        let mut url = self.endpoint(DOWNLOAD_PATH)?;
        url.query_pairs_mut()
            .append_pair("format", &format.to_string())
            .append_pair("t", &timestamp_ms.to_string());
        Ok(url)
    }

    /// A rejected login is a plain failure, never a redirect.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let request = self.request(Method::POST, LOGIN_PATH)?.json(credentials);
        let response = request.send().await?;
        let session: AuthSession = Self::decode_response(response).await?;
        self.session.save(&session)?;
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<MessageResponse, ApiError> {
        let request = self.request(Method::POST, REGISTER_PATH)?.json(registration);
        let response = request.send().await?;
        Self::decode_response(response).await
    }

    pub fn logout(&self) {
        self.end_session();
    }
}
