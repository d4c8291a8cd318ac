pub mod config;
pub mod download;
pub mod extract;
pub mod list;

use crate::core::client::StoreClient;
use crate::core::config::Config;
use crate::error::{Result, ShelfError};

/// Login details gathered from the command line, the environment and the config file.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    fn resolve(&self, config: &Config) -> Result<(String, String)> {
        let username = self
            .username
            .clone()
            .or_else(|| config.username.clone())
            .ok_or_else(|| {
                ShelfError::config_error("a username is required (--username or config file)")
            })?;
        let password = self.password.clone().ok_or_else(|| {
            ShelfError::config_error("a password is required (--password or SHELFDL_PASSWORD)")
        })?;
        Ok((username, password))
    }
}

/// Logs out of the store when dropped, however the command ends.
pub struct LoggedIn<'a> {
    client: &'a StoreClient,
}

impl<'a> LoggedIn<'a> {
    pub fn new(client: &'a StoreClient, config: &Config, credentials: &Credentials) -> Result<Self> {
        let (username, password) = credentials.resolve(config)?;
        if let Err(e) = client.login(&username, &password) {
            client.logout();
            return Err(e);
        }
        Ok(Self { client })
    }
}

impl Drop for LoggedIn<'_> {
    fn drop(&mut self) {
        self.client.logout();
    }
}
