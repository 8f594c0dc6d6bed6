use crate::client::{ApiClient, ApiError};
use crate::data_models::{
    first_validation_message, AuthSession, Credentials, ExportFormat, Platform, Registration,
    SearchRequest,
};
use crate::errors::AppErrors;
use crate::navigation::Navigator;
use crate::render::{
    self, error_row, loading_row, search_result_rows, tracked_product_rows, Action, Row,
    StatusMessage, TableHeader, RESULTS_COLUMNS, TRACKED_COLUMNS,
};
use crate::templates::{header_html, rows_html, status_html};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};
use url::Url;
use validator::Validate;

mod forms;

pub use forms::{TrackForm, EMPTY_URL_MESSAGE, INVALID_THRESHOLD_MESSAGE};

pub const TRACKING_IN_PROGRESS: &str = "Adding product to tracking...";
pub const TRACKING_SUCCEEDED: &str = "Product is now being tracked.";
pub const TRACKING_FAILED: &str = "Failed to track product. Please try again.";
pub const REMOVE_SUCCEEDED: &str = "Product removed.";
pub const REMOVE_FAILED: &str = "Failed to remove product.";
pub const PRICES_UPDATED: &str = "Prices updated.";
pub const REGISTRATION_SUCCEEDED: &str = "Registration successful. Please sign in.";

/// Everything the page shows, as view fragments.
#[derive(Debug, Clone)]
pub struct Document {
    pub results_header: TableHeader,
    pub results: Vec<Row>,
    pub tracked_header: TableHeader,
    pub tracked: Vec<Row>,
    pub track_status: Option<StatusMessage>,
    pub track_form: TrackForm,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            results_header: TableHeader::search_results(),
            results: vec![],
            tracked_header: TableHeader::tracked_products(),
            tracked: vec![],
            track_status: None,
            track_form: TrackForm::default(),
        }
    }
}

impl Document {
    pub fn bindings(&self) -> BTreeMap<String, Action> {
        render::bindings(self.results.iter().chain(self.tracked.iter()))
    }

    pub fn to_html(&self) -> Result<String, AppErrors> {
        let status = match &self.track_status {
            Some(status) => status_html(status)?,
            None => String::new(),
        };
        Ok(format!(
            "<table id=\"results-table\"><thead>{}</thead><tbody>{}</tbody></table>\n\
             <div id=\"track-status\">{}</div>\n\
             <table id=\"tracked-table\"><thead>{}</thead><tbody>{}</tbody></table>\n",
            header_html(&self.results_header)?,
            rows_html(&self.results)?,
            status,
            header_html(&self.tracked_header)?,
            rows_html(&self.tracked)?,
        ))
    }
}

/// The tracker page: one document, one authenticated client.
///
/// Flows never return errors. Failures end up in the document or in an
/// alert, and the page stays usable for the next attempt.
#[derive(Debug)]
pub struct Page {
    client: ApiClient,
    document: Document,
}

impl Page {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            document: Document::default(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn navigator(&self) -> &dyn Navigator {
        self.client.navigator()
    }

    /// Returns whether the page is ready to use.
    pub async fn bootstrap(&mut self) -> bool {
        if !self.client.is_authenticated() {
            info!("no session, redirecting to login");
            self.navigator().redirect(self.client.login_url());
            return false;
        }
        if let Err(e) = self.client.check_auth().await {
            warn!("auth check failed: {e}");
            return false;
        }
        self.fetch_tracked_products().await;
        true
    }

    pub async fn search(&mut self, platform: Platform, query: &str) {
        let request = SearchRequest::new(platform, query);
        if let Err(errors) = request.validate() {
            self.navigator().alert(&first_validation_message(&errors));
            return;
        }

        self.document.results = vec![loading_row(RESULTS_COLUMNS)];
        match self.client.scrape(&request).await {
            Ok(products) => {
                debug!(count = products.len(), %platform, "search finished");
                if !products.is_empty() {
                    self.document.results_header.ensure_actions_column();
                }
                self.document.results = search_result_rows(&products);
            }
            Err(e) => {
                error!("search failed: {e}");
                self.document.results = vec![error_row(&e.to_string(), RESULTS_COLUMNS)];
            }
        }
    }

    pub async fn track_product(&mut self) {
        let request = match self.document.track_form.to_request() {
            Ok(request) => request,
            Err(message) => {
                self.navigator().alert(&message);
                return;
            }
        };

        self.document.track_status = Some(StatusMessage::info(TRACKING_IN_PROGRESS));
        match self.client.track(&request).await {
            Ok(response) => {
                info!(url = %request.product_url, "product tracked");
                self.document.track_status =
                    Some(StatusMessage::success(response.message_or(TRACKING_SUCCEEDED)));
                self.fetch_tracked_products().await;
                self.document.track_form.clear();
            }
            Err(e) => {
                error!("tracking failed: {e}");
                self.document.track_status = Some(StatusMessage::error(TRACKING_FAILED));
            }
        }
    }

    pub async fn remove_product(&mut self, id: u32) {
        match self.client.remove_tracked_product(id).await {
            Ok(response) => {
                info!(id, "product removed");
                self.navigator().alert(&response.message_or(REMOVE_SUCCEEDED));
                self.fetch_tracked_products().await;
            }
            Err(e) => {
                error!(id, "removing product failed: {e}");
                self.navigator().alert(REMOVE_FAILED);
            }
        }
    }

    pub async fn fetch_tracked_products(&mut self) {
        self.document.tracked = match self.client.tracked_products().await {
            Ok(products) => tracked_product_rows(&products),
            Err(e) => {
                error!("fetching tracked products failed: {e}");
                vec![error_row(&e.to_string(), TRACKED_COLUMNS)]
            }
        };
    }

    pub async fn update_prices(&mut self) {
        match self.client.update_prices().await {
            Ok(response) => {
                self.navigator().alert(&response.message_or(PRICES_UPDATED));
                self.fetch_tracked_products().await;
            }
            Err(e) => error!("updating prices failed: {e}"),
        }
    }

    pub fn download_data(&self, format: ExportFormat) -> Result<Url, ApiError> {
        let url = self
            .client
            .download_url(format, Utc::now().timestamp_millis())?;
        self.navigator().open(&url);
        Ok(url)
    }

    /// Dispatches the action bound to `element_id` in the current document.
    /// Returns false when nothing is bound to it.
    pub async fn click(&mut self, element_id: &str) -> bool {
        let Some(action) = self.document.bindings().remove(element_id) else {
            debug!(element_id, "click on unbound element");
            return false;
        };
        match action {
            Action::Track { product_url } => {
                self.document.track_form.product_url = product_url;
                self.track_product().await;
            }
            Action::Remove { id } => self.remove_product(id).await,
        }
        true
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<AuthSession, AppErrors> {
        credentials.validate()?;
        let session = self.client.login(credentials).await?;
        info!("signed in");
        Ok(session)
    }

    /// Creates the account and returns the message to show. Does not sign in.
    pub async fn register(&mut self, registration: &Registration) -> Result<String, AppErrors> {
        registration.validate()?;
        let response = self.client.register(registration).await?;
        info!("registered");
        Ok(response.message_or(REGISTRATION_SUCCEEDED))
    }

    pub fn logout(&mut self) {
        self.client.logout();
        self.document = Document::default();
    }
}
