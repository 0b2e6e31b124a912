use std::{fmt, time::Duration};

use serde::Deserialize;
use tokio::time::timeout;
use tracing::debug;

use crate::{config::Endpoints, http::Transport};

pub mod access_token;
pub use access_token::Credential;

pub mod credential;
pub use credential::{CredentialStore, TokenState};

pub mod catalog;
pub use catalog::{CatalogSections, HomeFeed};

pub mod normalize;
pub use normalize::{DisplayItem, normalize};

pub mod search;
pub use search::SearchResults;

pub mod types;
pub use types::{CatalogItem, ItemKind};

/// What a request was for, so failures can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Token,
    NewReleases,
    Categories,
    Artists,
    Search,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Token => "access token",
            Section::NewReleases => "new releases",
            Section::Categories => "categories",
            Section::Artists => "popular artists",
            Section::Search => "search",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The token exchange failed. Nothing that needs a token will run.
    #[error("could not get access token: {0}")]
    Credential(String),

    #[error("failed to fetch {section}: {reason}")]
    Fetch { section: Section, reason: String },

    #[error("unexpected {section} response: {reason}")]
    MalformedResponse { section: Section, reason: String },

    /// A token-gated call was made without a ready token. No request was sent.
    #[error("no access token yet")]
    NotReady,

    /// Search was submitted with nothing to search for. No request was sent.
    #[error("search query was empty")]
    EmptyQuery,
}

/// The spotify web api, reached through `T`.
///
/// Reads its token from a [`CredentialStore`]; only [`SpotifyApi::acquire`] writes to it.
pub struct SpotifyApi<'a, T> {
    transport: &'a T,
    endpoints: &'a Endpoints,
    store: &'a CredentialStore,
    timeout: Duration,
}

impl<'a, T: Transport> SpotifyApi<'a, T> {
    #[must_use]
    pub fn new(
        transport: &'a T,
        endpoints: &'a Endpoints,
        store: &'a CredentialStore,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            endpoints,
            store,
            timeout,
        }
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        self.store
    }

    /// The token to send, or [`Error::NotReady`].
    fn token(&self) -> Result<Credential, Error> {
        self.store.get().ok_or(Error::NotReady)
    }

    /// Get `path` under the api url, parsing as json to `R`, using `token` for authorization.
    ///
    /// # Errors
    ///
    /// - [`Error::Fetch`] if the request could not be sent, timed out, or was not successful.
    /// - [`Error::MalformedResponse`] if the body could not be deserialized to `R`.
    async fn get_resp<R: for<'de> Deserialize<'de>>(
        &self,
        section: Section,
        token: &Credential,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, Error> {
        let url = format!("{}{path}", self.endpoints.api_url);
        debug!("GET {url} {query:?}");

        let resp = timeout(self.timeout, self.transport.get(&url, token.as_ref(), query))
            .await
            .map_err(|_| Error::Fetch {
                section,
                reason: format!("timed out after {:?}", self.timeout),
            })?
            .map_err(|err| Error::Fetch {
                section,
                reason: err.to_string(),
            })?;

        if !resp.status.is_success() {
            return Err(Error::Fetch {
                section,
                reason: format!("got {}: {:?}", resp.status, resp.body),
            });
        }

        serde_json::from_str(&resp.body).map_err(|err| Error::MalformedResponse {
            section,
            reason: err.to_string(),
        })
    }
}
