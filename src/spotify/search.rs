use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::http::Transport;

use super::{CatalogItem, Error, ItemKind, Section, SpotifyApi, types::Page};

/// Results per type.
pub const SEARCH_LIMIT: u32 = 10;

const SEARCH_TYPES: &str = "album,artist,playlist";

/// Every collection is optional.
#[derive(Deserialize, Debug, Default)]
struct SearchResponse {
    #[serde(default)]
    albums: Option<Page>,
    #[serde(default)]
    artists: Option<Page>,
    #[serde(default)]
    playlists: Option<Page>,
}

impl SearchResponse {
    /// Albums, then artists, then playlists, each in the order they came.
    /// Entries without an id are dropped.
    fn merge(self) -> Vec<CatalogItem> {
        [
            (self.albums, ItemKind::Album),
            (self.artists, ItemKind::Artist),
            (self.playlists, ItemKind::Playlist),
        ]
        .into_iter()
        .flat_map(|(page, kind)| page.unwrap_or_default().into_items(kind))
        .collect()
    }
}

/// What the search screen shows. Replaced whole on every successful search.
#[derive(Debug, Default, Clone)]
pub struct SearchResults {
    query: Option<String>,
    items: Vec<CatalogItem>,
    last_error: Option<Error>,
}

impl SearchResults {
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// The query that produced [`SearchResults::items`].
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Why the last submitted search failed, if it did.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn from_items(query: &str, items: Vec<CatalogItem>) -> Self {
        Self {
            query: Some(query.to_string()),
            items,
            last_error: None,
        }
    }
}

impl<T: Transport> SpotifyApi<'_, T> {
    /// Search albums, artists and playlists for `query`, [`SEARCH_LIMIT`] of each.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`] if there is no token, and [`Error::EmptyQuery`] if `query` is
    ///   blank. Nothing is sent in either case.
    /// - [`Error::Fetch`] or [`Error::MalformedResponse`] if the request went wrong.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, Error> {
        let token = self.token()?;

        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        info!("searching for `{query}`");

        let limit = SEARCH_LIMIT.to_string();
        let resp: SearchResponse = self
            .get_resp(
                Section::Search,
                &token,
                "/search",
                &[("q", query), ("type", SEARCH_TYPES), ("limit", limit.as_str())],
            )
            .await?;

        let items = resp.merge();
        debug!("got {} results", items.len());

        Ok(items)
    }

    /// [`SpotifyApi::search`] into `results`.
    ///
    /// Without a token or a query this does nothing, keeping the previous results.
    /// If the search fails, the previous results are kept and the error is remembered.
    ///
    /// # Errors
    ///
    /// See [`SpotifyApi::search`].
    pub async fn submit(&self, results: &mut SearchResults, query: &str) -> Result<(), Error> {
        match self.search(query).await {
            Ok(items) => {
                results.query = Some(query.trim().to_string());
                results.items = items;
                results.last_error = None;
                Ok(())
            }
            Err(err @ (Error::NotReady | Error::EmptyQuery)) => {
                debug!("not searching: {err}");
                Err(err)
            }
            Err(err) => {
                warn!("{err}");
                results.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}
