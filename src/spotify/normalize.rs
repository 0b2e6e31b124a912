use std::borrow::Cow;

use super::{CatalogItem, types::Image};

/// Names longer than this many characters are shortened.
pub const MAX_NAME_LEN: usize = 20;

const ELLIPSIS: &str = "...";

/// How an item's image should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageShape {
    Round,
    Square,
}

/// What a list row needs to show an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub name: String,
    /// `None` means draw no image at all.
    pub image_url: Option<String>,
    pub shape: ImageShape,
}

/// Shorten `name` to its first `max` characters followed by `...`, if it is longer than `max`.
#[must_use]
pub fn shorten_name(name: &str, max: usize) -> Cow<'_, str> {
    match name.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &name[..end])),
        None => Cow::Borrowed(name),
    }
}

/// Never fails, whatever is missing from `item`.
#[must_use]
pub fn normalize(item: &CatalogItem) -> DisplayItem {
    let (images, shape) = match item {
        CatalogItem::Album(a) => (&a.images, ImageShape::Square),
        CatalogItem::Artist(a) => (&a.images, ImageShape::Round),
        CatalogItem::Category(c) => (&c.icons, ImageShape::Square),
        CatalogItem::Playlist(p) => (&p.images, ImageShape::Square),
    };

    DisplayItem {
        name: shorten_name(item.name(), MAX_NAME_LEN).into_owned(),
        image_url: first_url(images),
        shape,
    }
}

fn first_url(images: &[Image]) -> Option<String> {
    images
        .first()
        .map(|i| i.url.clone())
        .filter(|url| !url.is_empty())
}
