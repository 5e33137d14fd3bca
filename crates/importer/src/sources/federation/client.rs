use serde::de::DeserializeOwned;
use tracing::debug;

use super::auth::AccessToken;
use super::models::{
    AthleteResults, RemoteAthlete, RemoteCategory, RemoteOrganization, SearchPartition,
};
use crate::config::RemoteConfig;
use crate::traits::FederationSource;
use crate::{ImporterError, Result};

const USER_AGENT: &str = concat!("athletics-importer/", env!("CARGO_PKG_VERSION"));

/// Bearer-protected collections served in full by `{api_url}/api/<name>/all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Organizations,
    Athletes,
    Categories,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Organizations => "api/organization/all",
            Self::Athletes => "api/athlete/all",
            Self::Categories => "api/category/all",
        }
    }
}

pub struct FederationClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl FederationClient {
    pub fn new(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    pub fn http_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ImporterError::ConfigurationError(format!("cannot build HTTP client: {}", e))
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&AccessToken>,
    ) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token.secret());
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ImporterError::fetch(url))?;

        response.json::<T>().await.map_err(ImporterError::fetch(url))
    }

    /// Fetches a whole collection. There is no server-side paging: the
    /// endpoint returns every record at once.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
        token: &AccessToken,
    ) -> Result<Vec<T>> {
        let url = self.config.api_endpoint(collection.path());
        self.get_json(&url, Some(token)).await
    }
}

#[async_trait::async_trait]
impl FederationSource for FederationClient {
    async fn fetch_organizations(&self, token: &AccessToken) -> Result<Vec<RemoteOrganization>> {
        self.fetch_collection(Collection::Organizations, token).await
    }

    async fn fetch_athletes(&self, token: &AccessToken) -> Result<Vec<RemoteAthlete>> {
        self.fetch_collection(Collection::Athletes, token).await
    }

    async fn fetch_categories(&self, token: &AccessToken) -> Result<Vec<RemoteCategory>> {
        self.fetch_collection(Collection::Categories, token).await
    }

    async fn fetch_athlete_results(&self, live_id: &str) -> Result<AthleteResults> {
        let url = self
            .config
            .api_endpoint(&format!("api/athlete/{}", live_id));
        self.get_json(&url, None).await
    }

    async fn fetch_search_partition(&self, prefix: char) -> Result<SearchPartition> {
        let url = self
            .config
            .search_endpoint(&format!("api/search/public/{}", prefix));
        self.get_json(&url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        let config = RemoteConfig::new("https://api.example.org");
        assert_eq!(
            config.api_endpoint(Collection::Organizations.path()),
            "https://api.example.org/api/organization/all"
        );
        assert_eq!(Collection::Athletes.path(), "api/athlete/all");
        assert_eq!(Collection::Categories.path(), "api/category/all");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_a_fetch_error() {
        let config = RemoteConfig::new("http://127.0.0.1:9");
        let client = FederationClient::new(FederationClient::http_client().unwrap(), config);

        let err = client.fetch_athlete_results("abc").await.unwrap_err();
        match err {
            ImporterError::FetchError { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:9/api/athlete/abc");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
