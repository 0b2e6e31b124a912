use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
}

/// Which collection an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Album,
    Artist,
    Category,
    Playlist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub artists: Vec<String>,
    /// y-m-d, or just y
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub genres: Vec<String>,
}

/// Categories have `icons` where everything else has `images`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icons: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub owner: Option<String>,
}

/// An entry of one of the catalog collections, tagged with that collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogItem {
    Album(Album),
    Artist(Artist),
    Category(Category),
    Playlist(Playlist),
}

impl CatalogItem {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Album(_) => ItemKind::Album,
            CatalogItem::Artist(_) => ItemKind::Artist,
            CatalogItem::Category(_) => ItemKind::Category,
            CatalogItem::Playlist(_) => ItemKind::Playlist,
        }
    }

    /// Unique within its collection.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Album(a) => &a.id,
            CatalogItem::Artist(a) => &a.id,
            CatalogItem::Category(c) => &c.id,
            CatalogItem::Playlist(p) => &p.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Album(a) => &a.name,
            CatalogItem::Artist(a) => &a.name,
            CatalogItem::Category(c) => &c.name,
            CatalogItem::Playlist(p) => &p.name,
        }
    }
}

/// An image as the api sends it. Some come without a `url`.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct RawImage {
    #[serde(default)]
    url: Option<String>,
}

/// Drops `null` entries and images without a usable `url`.
fn images(raw: Option<Vec<Option<RawImage>>>) -> Vec<Image> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|image| image?.url.filter(|url| !url.is_empty()))
        .map(|url| Image { url })
        .collect()
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct SimplifiedArtist {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Owner {
    #[serde(default)]
    display_name: Option<String>,
}

/// Any item as the api sends it. Everything may be missing or `null`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct PartialItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    images: Option<Vec<Option<RawImage>>>,
    #[serde(default)]
    icons: Option<Vec<Option<RawImage>>>,
    #[serde(default)]
    artists: Option<Vec<Option<SimplifiedArtist>>>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genres: Option<Vec<Option<String>>>,
    #[serde(default)]
    owner: Option<Owner>,
}

impl PartialItem {
    /// `None` if the item has no usable `id`.
    pub(crate) fn into_item(self, kind: ItemKind) -> Option<CatalogItem> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let name = self.name.unwrap_or_default();

        Some(match kind {
            ItemKind::Album => CatalogItem::Album(Album {
                id,
                name,
                images: images(self.images),
                artists: self
                    .artists
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|a| a?.name)
                    .collect(),
                release_date: self.release_date,
            }),
            ItemKind::Artist => CatalogItem::Artist(Artist {
                id,
                name,
                images: images(self.images),
                genres: self.genres.unwrap_or_default().into_iter().flatten().collect(),
            }),
            ItemKind::Category => CatalogItem::Category(Category {
                id,
                name,
                icons: images(self.icons),
            }),
            ItemKind::Playlist => CatalogItem::Playlist(Playlist {
                id,
                name,
                images: images(self.images),
                owner: self.owner.and_then(|o| o.display_name),
            }),
        })
    }
}

/// `{ "items": [...] }`, the paging object around every collection. `items` may be `null`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct Page {
    #[serde(default)]
    pub items: Option<Vec<Option<PartialItem>>>,
}

impl Page {
    pub(crate) fn into_items(self, kind: ItemKind) -> impl Iterator<Item = CatalogItem> {
        into_items(self.items.unwrap_or_default(), kind)
    }
}

/// Drops `null` entries and entries without an `id`, keeping order.
pub(crate) fn into_items(
    items: Vec<Option<PartialItem>>,
    kind: ItemKind,
) -> impl Iterator<Item = CatalogItem> {
    items
        .into_iter()
        .filter_map(move |item| item?.into_item(kind))
}
