mod auth;
mod client;
pub mod de;
mod models;
mod transformer;

pub use auth::{AccessToken, TokenProvider};
pub use client::{Collection, FederationClient};
pub use models::*;
pub use transformer::{ResultBundle, split_search_chunk};
