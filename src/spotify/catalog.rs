use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};

use crate::http::Transport;

use super::{
    CatalogItem, Error, ItemKind, Section, SpotifyApi,
    types::{Page, PartialItem, into_items},
};

/// The artists shown under "popular artists".
pub const POPULAR_ARTISTS: [&str; 5] = [
    "4YRxDV8wJFPHPTeXepOstw", // Arijit Singh
    "06HL4z0CvFAxyc27GXpf02", // Taylor Swift
    "3TVXtAsR1Inumwj472S9r4", // Drake
    "3Nrfpe0tUJi4K4DXYWgMUX", // BTS
    "4dpARuHxo51G3z768sgnrY", // Adele
];

#[derive(Deserialize, Debug)]
struct NewReleases {
    albums: Page,
}

#[derive(Deserialize, Debug)]
struct Categories {
    categories: Page,
}

#[derive(Deserialize, Debug)]
struct Artists {
    /// unknown ids come back as `null`
    artists: Vec<Option<PartialItem>>,
}

/// Each section of the home feed, fetched independently.
#[derive(Debug)]
pub struct CatalogSections {
    pub releases: Result<Vec<CatalogItem>, Error>,
    pub categories: Result<Vec<CatalogItem>, Error>,
    pub artists: Result<Vec<CatalogItem>, Error>,
}

/// What the home screen shows. A section that fails to load keeps what it had.
#[derive(Debug, Default, Clone)]
pub struct HomeFeed {
    pub releases: Vec<CatalogItem>,
    pub categories: Vec<CatalogItem>,
    pub artists: Vec<CatalogItem>,
    /// Failures of the last [`HomeFeed::apply`].
    pub errors: Vec<Error>,
}

impl HomeFeed {
    /// Take every section that loaded, keep the rest as they were.
    pub fn apply(&mut self, sections: CatalogSections) {
        self.errors.clear();

        for (slot, result) in [
            (&mut self.releases, sections.releases),
            (&mut self.categories, sections.categories),
            (&mut self.artists, sections.artists),
        ] {
            match result {
                Ok(items) => *slot = items,
                Err(err) => {
                    warn!("{err}");
                    self.errors.push(err);
                }
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty() && self.categories.is_empty() && self.artists.is_empty()
    }
}

/// Later items with an already seen id are dropped.
fn unique(items: impl Iterator<Item = CatalogItem>) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.id().to_string()))
        .collect()
}

impl<T: Transport> SpotifyApi<'_, T> {
    /// Fetch new releases, categories and [`POPULAR_ARTISTS`] at the same time.
    ///
    /// A section failing does not affect the others.
    ///
    /// # Errors
    ///
    /// [`Error::NotReady`] if there is no token, in which case nothing is sent.
    pub async fn fetch_all(&self) -> Result<CatalogSections, Error> {
        let token = self.token()?;
        let ids = POPULAR_ARTISTS.join(",");

        let releases = async {
            info!("fetching new releases");
            let resp: NewReleases = self
                .get_resp(Section::NewReleases, &token, "/browse/new-releases", &[])
                .await?;
            Ok::<_, Error>(unique(resp.albums.into_items(ItemKind::Album)))
        };

        let categories = async {
            info!("fetching categories");
            let resp: Categories = self
                .get_resp(Section::Categories, &token, "/browse/categories", &[])
                .await?;
            Ok::<_, Error>(unique(resp.categories.into_items(ItemKind::Category)))
        };

        let artists = async {
            info!("fetching popular artists");
            let resp: Artists = self
                .get_resp(Section::Artists, &token, "/artists", &[("ids", ids.as_str())])
                .await?;
            Ok::<_, Error>(unique(into_items(resp.artists, ItemKind::Artist)))
        };

        let (releases, categories, artists) = tokio::join!(releases, categories, artists);

        Ok(CatalogSections {
            releases,
            categories,
            artists,
        })
    }

    /// [`SpotifyApi::fetch_all`] into `feed`.
    ///
    /// # Errors
    ///
    /// [`Error::NotReady`] if there is no token. `feed` is left untouched.
    pub async fn refresh_home(&self, feed: &mut HomeFeed) -> Result<(), Error> {
        let sections = self.fetch_all().await?;
        feed.apply(sections);
        Ok(())
    }
}
