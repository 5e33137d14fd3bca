use crate::Result;
use crate::sources::federation::{
    AccessToken, AthleteResults, RemoteAthlete, RemoteCategory, RemoteOrganization,
    SearchPartition,
};

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    async fn get_token(&self) -> Result<AccessToken>;
}

/// Read side of the import: everything the remote federation API serves.
#[async_trait::async_trait]
pub trait FederationSource: Send + Sync {
    async fn fetch_organizations(&self, token: &AccessToken) -> Result<Vec<RemoteOrganization>>;

    async fn fetch_athletes(&self, token: &AccessToken) -> Result<Vec<RemoteAthlete>>;

    async fn fetch_categories(&self, token: &AccessToken) -> Result<Vec<RemoteCategory>>;

    async fn fetch_athlete_results(&self, live_id: &str) -> Result<AthleteResults>;

    async fn fetch_search_partition(&self, prefix: char) -> Result<SearchPartition>;
}
