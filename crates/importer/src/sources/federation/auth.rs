use std::fmt;

use tracing::{debug, error};

use super::models::TokenResponse;
use crate::config::RemoteConfig;
use crate::traits::TokenSource;
use crate::{ImporterError, Result};

/// Bearer token for the federation API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Client-credentials exchange against `REMOTE_AUTH_URL`. No caching: every
/// call performs a fresh exchange.
pub struct TokenProvider {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    fn credentials(&self) -> [(&'static str, &str); 4] {
        [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", "openid"),
            ("grant_type", "client_credentials"),
        ]
    }

    async fn exchange(&self, auth_url: &str) -> reqwest::Result<TokenResponse> {
        self.client
            .post(auth_url)
            .form(&self.credentials())
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await
    }
}

#[async_trait::async_trait]
impl TokenSource for TokenProvider {
    async fn get_token(&self) -> Result<AccessToken> {
        let auth_url = self.config.auth_url.as_deref().ok_or_else(|| {
            ImporterError::ConfigurationError("REMOTE_AUTH_URL is not defined".to_string())
        })?;

        debug!("Requesting access token from {}", auth_url);
        match self.exchange(auth_url).await {
            Ok(response) => Ok(AccessToken::new(response.access_token)),
            Err(source) => {
                error!("An error occurred while getting the token: {}", source);
                Err(ImporterError::AuthenticationError {
                    url: auth_url.to_string(),
                    source,
                })
            }
        }
    }
}
