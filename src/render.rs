//! Text lists of what was fetched.

use std::fmt::Write;

use console::style;

use crate::{
    spotify::{
        CatalogItem, HomeFeed, SearchResults,
        normalize::{DisplayItem, ImageShape, MAX_NAME_LEN, normalize},
    },
    tab::ActiveTab,
};

/// Wide enough for a shortened name.
const NAME_WIDTH: usize = MAX_NAME_LEN + 3;

fn row(out: &mut String, shown: DisplayItem) {
    let _ = match (shown.image_url, shown.shape) {
        (Some(url), ImageShape::Round) => writeln!(
            out,
            "  ● {:<NAME_WIDTH$} {}",
            shown.name,
            style(url).dim()
        ),
        (Some(url), ImageShape::Square) => writeln!(
            out,
            "  ■ {:<NAME_WIDTH$} {}",
            shown.name,
            style(url).dim()
        ),
        (None, _) => writeln!(out, "    {}", shown.name),
    };
}

fn section(out: &mut String, title: &str, rows: impl Iterator<Item = DisplayItem>) {
    let _ = writeln!(out, "{}", style(title).bold());

    let mut empty = true;
    for shown in rows {
        empty = false;
        row(out, shown);
    }

    if empty {
        let _ = writeln!(out, "    {}", style("nothing here").dim());
    }
}

/// Search rows keep the whole name, and every image is round.
fn search_row(item: &CatalogItem) -> DisplayItem {
    DisplayItem {
        name: item.name().to_string(),
        shape: ImageShape::Round,
        ..normalize(item)
    }
}

fn tabs(out: &mut String, active: ActiveTab) {
    let tabs: Vec<String> = ActiveTab::ALL
        .iter()
        .map(|&tab| {
            if tab == active {
                style(format!("[{tab}]")).bold().green().to_string()
            } else {
                format!(" {tab} ")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" "));
}

/// The home screen: tabs, categories, popular artists and new albums, then any failures.
#[must_use]
pub fn home(feed: &HomeFeed, tab: ActiveTab) -> String {
    let mut out = String::new();

    tabs(&mut out, tab);
    out.push('\n');

    section(&mut out, "Spotify Categories", tab.filter(&feed.categories).map(normalize));
    section(&mut out, "Popular Artists", tab.filter(&feed.artists).map(normalize));
    section(&mut out, "Popular Albums", tab.filter(&feed.releases).map(normalize));

    for err in &feed.errors {
        let _ = writeln!(out, "{} {err}", style("!").yellow().bold());
    }

    out
}

/// Search results, or why the last search failed.
#[must_use]
pub fn search(results: &SearchResults) -> String {
    let mut out = String::new();

    if let Some(err) = results.last_error() {
        let _ = writeln!(out, "{} {err}", style("!").yellow().bold());
    }

    let title = match results.query() {
        Some(query) => format!("Results for `{query}`"),
        None => "Results".to_string(),
    };
    section(&mut out, &title, results.items().iter().map(search_row));

    out
}

#[cfg(test)]
mod tests {
    use console::strip_ansi_codes;

    use crate::spotify::{
        Error, Section,
        types::{Album, Artist, Category, Image},
    };

    use super::*;

    fn feed() -> HomeFeed {
        HomeFeed {
            categories: vec![CatalogItem::Category(Category {
                id: "pop".to_string(),
                name: "Pop".to_string(),
                icons: vec![Image {
                    url: "https://i/pop".to_string(),
                }],
            })],
            artists: vec![CatalogItem::Artist(Artist {
                id: "a".to_string(),
                name: "A very long artist name indeed".to_string(),
                images: Vec::new(),
                genres: Vec::new(),
            })],
            releases: Vec::new(),
            errors: vec![Error::Fetch {
                section: Section::NewReleases,
                reason: "got 500".to_string(),
            }],
        }
    }

    #[test]
    fn home_lists_sections_in_order() {
        let out = strip_ansi_codes(&home(&feed(), ActiveTab::All)).to_string();

        let categories = out.find("Spotify Categories").expect("categories");
        let artists = out.find("Popular Artists").expect("artists");
        let albums = out.find("Popular Albums").expect("albums");
        assert!(categories < artists && artists < albums);

        assert!(out.contains("■ Pop"));
        assert!(out.contains("https://i/pop"));
        assert!(out.contains("A very long artist n..."));
        assert!(out.contains("failed to fetch new releases: got 500"));
        assert!(out.contains("[All]"));
    }

    #[test]
    fn podcasts_tab_is_empty() {
        let out = strip_ansi_codes(&home(&feed(), ActiveTab::Podcasts)).to_string();

        assert!(!out.contains("■ Pop"));
        assert_eq!(out.matches("nothing here").count(), 3);
    }

    #[test]
    fn search_rows_show_whole_names_and_round_images() {
        let results = SearchResults::from_items(
            "long",
            vec![CatalogItem::Album(Album {
                id: "al".to_string(),
                name: "An album name longer than twenty".to_string(),
                images: vec![Image {
                    url: "https://i/al".to_string(),
                }],
                artists: Vec::new(),
                release_date: None,
            })],
        );

        let out = strip_ansi_codes(&search(&results)).to_string();

        assert!(out.contains("Results for `long`"));
        assert!(out.contains("● An album name longer than twenty"));
        assert!(!out.contains("..."));
    }

    #[test]
    fn empty_search_says_so() {
        let out = strip_ansi_codes(&search(&SearchResults::default())).to_string();
        assert!(out.contains("Results"));
        assert!(out.contains("nothing here"));
    }
}
