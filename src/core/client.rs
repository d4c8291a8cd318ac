use crate::core::config::Config;
use crate::core::item::{DownloadTarget, ShelfItem};
use crate::core::session::{Resource, Session};
use crate::error::{Result, ShelfError};
use crate::utils::html;
use reqwest::blocking::{Client, Response};
use tracing::{debug, info, warn};
use url::Url;

const LOGIN_PAGE: &str = "signin/login";
const LOGIN_CHECK: &str = "user/login_check";
const LOGOUT: &str = "user/logout";
const SHELF: &str = "my-shelf";

/// Blocking HTTP session against the store, keeping its cookies between requests.
pub struct StoreClient {
    client: Client,
    config: Config,
}

impl StoreClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("shelfdl/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ShelfError::transport(&config.base_url, e))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let token = self.login_token()?;
        let url = self.config.page_url(LOGIN_CHECK);
        info!(%username, "logging in");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("_token", token.as_str()),
                ("_remember_me", "1"),
                ("login", ""),
                ("_failure_path", "login"),
                ("_username", username),
                ("_password", password),
            ])
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| ShelfError::transport(&url, e))?;

        if is_login_page(response.url()) {
            return Err(ShelfError::LoginFailed {
                username: username.to_string(),
            });
        }

        debug!(landing = %response.url(), "logged in");
        Ok(())
    }

    /// Ends the session. Failures are logged and otherwise ignored.
    pub fn logout(&self) {
        let url = self.config.page_url(LOGOUT);
        match self.client.get(&url).send() {
            Ok(response) => debug!(status = %response.status(), "logged out"),
            Err(e) => warn!(error = %e, "logout request failed"),
        }
    }

    /// Items on the user's shelf, in page order.
    pub fn shelf(&self) -> Result<Vec<ShelfItem>> {
        let url = self.config.page_url(SHELF);
        let page = self.get_page(&url)?;

        let items: Vec<ShelfItem> = html::shelf_links(&page)
            .into_iter()
            .map(|(name, href)| ShelfItem { name, href })
            .collect();

        debug!(count = items.len(), "scraped shelf");
        Ok(items)
    }

    pub fn target_for(&self, reference: &str) -> Result<DownloadTarget> {
        DownloadTarget::from_reference(&self.config.base_url, &self.config.locale, reference)
    }

    fn login_token(&self) -> Result<String> {
        let url = self.config.page_url(LOGIN_PAGE);
        let page = self.get_page(&url)?;

        html::input_value(&page, "_token").ok_or_else(|| ShelfError::ScrapeError {
            url,
            message: "login form has no _token field".to_string(),
        })
    }

    fn get_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| ShelfError::transport(url, e))?;

        response.text().map_err(|e| ShelfError::transport(url, e))
    }
}

impl Session for StoreClient {
    fn get(&self, url: &str) -> Result<Resource<'_>> {
        debug!(%url, "requesting resource");

        let response = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| ShelfError::transport(url, e))?;

        let content_length = response.content_length();
        Ok(Resource::new(response, content_length))
    }
}

/// The store answers a rejected login by redirecting back to the login form.
fn is_login_page(url: &Url) -> bool {
    let path = url.path().trim_end_matches('/');
    path.ends_with(&format!("/{LOGIN_PAGE}"))
        || path.ends_with(&format!("/{LOGIN_CHECK}"))
        || path.ends_with("/login")
}
