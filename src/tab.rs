use std::fmt;

use clap::ValueEnum;

use crate::spotify::CatalogItem;

/// The tabs above the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ActiveTab {
    #[default]
    All,
    Music,
    Podcasts,
    Audiobooks,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::All,
        ActiveTab::Music,
        ActiveTab::Podcasts,
        ActiveTab::Audiobooks,
    ];

    /// Whether `item` belongs under this tab.
    ///
    /// Albums, artists, categories and playlists are all music, and no podcast or
    /// audiobook collection is ever fetched, so those two tabs are always empty.
    #[must_use]
    pub fn admits(self, _item: &CatalogItem) -> bool {
        match self {
            ActiveTab::All | ActiveTab::Music => true,
            ActiveTab::Podcasts | ActiveTab::Audiobooks => false,
        }
    }

    pub fn filter<'a>(
        self,
        items: &'a [CatalogItem],
    ) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        items.iter().filter(move |item| self.admits(item))
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActiveTab::All => "All",
            ActiveTab::Music => "Music",
            ActiveTab::Podcasts => "Podcasts",
            ActiveTab::Audiobooks => "Audiobooks",
        })
    }
}
