pub mod client;
pub mod configuration;
pub mod data_models;
pub mod errors;
pub mod navigation;
pub mod page;
pub mod render;
pub mod session;
pub mod templates;

use crate::client::ApiClient;
use crate::configuration::Settings;
use crate::errors::{AppErrors, Error};
use crate::navigation::Navigator;
use crate::page::Page;
use crate::session::SessionStorage;
use std::sync::Arc;

pub fn create_page(settings: &Settings, navigator: Arc<dyn Navigator>) -> Result<Page, Error> {
    let base_url = settings.application.base_url()?;
    let session = Arc::new(SessionStorage::try_from(&settings.session)?);
    let client = ApiClient::new(
        base_url,
        settings.application.login_url.clone(),
        session,
        navigator,
    )
    .map_err(AppErrors::from)?;
    Ok(Page::new(client))
}
