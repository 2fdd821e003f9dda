use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::extractors::playlist;
use crate::filters::{Filter, FilterList, SelectFilter};
use crate::models::{Anime, AnimesPage, Episode, Status, Video};
use crate::preferences::{prefer_quality, Preference, SourcePreferences};
use crate::traits::{AnimeSource, SourceInfo};
use crate::utils::{
    absolute_url, attr, attr_at, encode_query, join_base, select_all, select_all_in, select_first_in,
    select_opt, substring_between, text_at, text_of, url_without_domain, HttpClient,
};
use scraper::Html;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://allmoviesforyou.net";
const PREF_QUALITY_KEY: &str = "preferred_quality";
const PREF_QUALITY_DEFAULT: &str = "1080";

const GENRES: &[(&str, &str)] = &[
    ("Action & Adventure", "action-adventure"),
    ("Adventure", "aventure"),
    ("Animation", "animation"),
    ("Comedy", "comedy"),
    ("Crime", "crime"),
    ("Disney", "disney"),
    ("Drama", "drama"),
    ("Family", "family"),
    ("Fantasy", "fantasy"),
    ("History", "fistory"),
    ("Horror", "horror"),
    ("Kids", "kids"),
    ("Music", "music"),
    ("Mystery", "mystery"),
    ("Reality", "reality"),
    ("Romance", "romance"),
    ("Sci-Fi & Fantasy", "sci-fi-fantasy"),
    ("Science Fiction", "science-fiction"),
    ("Thriller", "thriller"),
    ("War", "war"),
    ("War & Politics", "war-politics"),
    ("Western", "western"),
];

/// Movie and series catalogue; no latest listing.
pub struct AllMovies {
    http_client: HttpClient,
    base_url: String,
    prefs: SourcePreferences,
}

impl AllMovies {
    pub fn new(config: &Config, prefs: SourcePreferences) -> Result<Self> {
        let (http_client, base_url, _) = super::site_client(config, "allmovies", DEFAULT_BASE_URL)?;
        Ok(Self {
            http_client,
            base_url,
            prefs,
        })
    }

    async fn listing(&self, url: &str, item_selector: &str, anchor_selector: Option<&str>) -> Result<AnimesPage> {
        info!("[ALLMOVIES] Listing {}", url);
        let html = self.http_client.get(url).await?;
        parse_listing(&html, &self.base_url, item_selector, anchor_selector)
    }

    async fn videos_from_master(&self, master_url: &str) -> Result<Vec<Video>> {
        playlist::fetch_videos(&self.http_client, master_url, &[], "").await
    }
}

pub fn parse_listing(
    html: &str,
    base_url: &str,
    item_selector: &str,
    anchor_selector: Option<&str>,
) -> Result<AnimesPage> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    for element in select_all_in(&document, item_selector)? {
        let href = match anchor_selector {
            Some(css) => attr_at(&element, css, "href"),
            None => attr(&element, "href"),
        };
        if href.is_empty() {
            continue;
        }
        let mut anime = Anime::new(url_without_domain(&href), text_at(&element, "h2.Title"));
        let thumbnail = attr_at(&element, "div.Image figure img", "data-src");
        if !thumbnail.is_empty() {
            anime.thumbnail_url = Some(absolute_url(base_url, &thumbnail)?);
        }
        items.push(anime);
    }
    let has_next = select_opt(&document.root_element(), "div.nav-links a:last-child").is_some();
    Ok(AnimesPage::new(items, has_next))
}

pub fn parse_details(html: &str, anime: &Anime) -> Result<Anime> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut details = anime.clone();
    details.title = text_of(&select_first_in(&document, "h1.Title")?);
    details.genres = select_all(&root, "p.Genre a")?.iter().map(text_of).collect();
    details.status = if text_at(&root, "div.Info > span.Qlty").contains("ON AIR") {
        Status::Ongoing
    } else {
        Status::Completed
    };
    let description = text_at(&root, "div.Description p:first-child");
    details.description = (!description.is_empty()).then_some(description);
    Ok(details)
}

pub fn parse_episode(html: &str) -> Result<Episode> {
    let document = Html::parse_document(html);
    let canonical = attr(&select_first_in(&document, "link[rel=canonical]")?, "href");
    let name = text_at(&document.root_element(), "div.TPMvCn h1.Title");
    Ok(Episode::new(url_without_domain(&canonical), name, 1.0))
}

/// The outer player iframe hosted on the site's own player domain.
pub fn player_iframe(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_all_in(&document, "iframe[data-src]")
        .ok()?
        .iter()
        .map(|iframe| attr(iframe, "data-src"))
        .find(|src| src.contains("allmovies") || src.starts_with(base_url))
}

pub fn inner_iframe(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_all_in(&document, "iframe")
        .ok()?
        .iter()
        .map(|iframe| attr(iframe, "data-src"))
        .find(|src| !src.is_empty())
}

/// Master playlist URLs listed in the player's `sources: [...]` setup.
pub fn master_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(scripts) = select_all_in(&document, "script") else {
        return Vec::new();
    };
    scripts
        .iter()
        .map(|s| s.inner_html())
        .find(|data| data.contains("sources"))
        .and_then(|data| substring_between(&data, "sources: [", "],").map(str::to_string))
        .map(|list| {
            list.split("src: \"")
                .skip(1)
                .filter_map(|s| s.split('"').next())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl AnimeSource for AllMovies {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("AllMovies", "en", &self.base_url, false)
    }

    async fn popular(&self, page: u32) -> Result<AnimesPage> {
        let url = format!("{}/movies/page/{}", self.base_url, page);
        self.listing(&url, "article.TPost > a", None).await
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<AnimesPage> {
        let url = if !query.trim().is_empty() {
            format!("{}/page/{}?s={}", self.base_url, page, encode_query(query.trim()))
        } else {
            let genre = match filters.select("genre") {
                Some(select) => select.value().to_string(),
                None => GENRES[0].1.to_string(),
            };
            format!("{}/category/{}/page/{}", self.base_url, genre, page)
        };
        self.listing(&url, "ul.MovieList li", Some("article a")).await
    }

    async fn details(&self, anime: &Anime) -> Result<Anime> {
        let html = self.http_client.get(&join_base(&self.base_url, &anime.url)).await?;
        parse_details(&html, anime)
    }

    async fn episodes(&self, anime: &Anime) -> Result<Vec<Episode>> {
        let html = self.http_client.get(&join_base(&self.base_url, &anime.url)).await?;
        Ok(vec![parse_episode(&html)?])
    }

    async fn videos(&self, episode: &Episode) -> Result<Vec<Video>> {
        let page_url = join_base(&self.base_url, &episode.url);
        let html = self.http_client.get(&page_url).await?;
        let outer = player_iframe(&html, &self.base_url)
            .ok_or_else(|| SourceError::not_found("AllMovies player iframe"))?;

        let outer_html = self.http_client.get(&outer).await?;
        let inner = inner_iframe(&outer_html)
            .ok_or_else(|| SourceError::not_found("AllMovies embedded iframe"))?;

        let inner_html = self
            .http_client
            .get_with_headers(&inner, &[("Referer", page_url.as_str())])
            .await?;

        let mut videos = Vec::new();
        for master in master_urls(&inner_html) {
            match self.videos_from_master(&master).await {
                Ok(found) => videos.extend(found),
                Err(e) => warn!("[ALLMOVIES] Skipping playlist {}: {}", master, e),
            }
        }
        info!("[ALLMOVIES] {} videos for {}", videos.len(), episode.url);

        let quality = self.prefs.get_string(PREF_QUALITY_KEY, PREF_QUALITY_DEFAULT);
        Ok(prefer_quality(videos, &quality))
    }

    fn filters(&self) -> FilterList {
        FilterList::new(vec![
            Filter::header("NOTE: Ignored if using text search!"),
            Filter::Separator,
            Filter::Select(SelectFilter::new("genre", "Genre", "genre", GENRES)),
        ])
    }

    fn preference_screen(&self) -> Vec<Preference> {
        vec![Preference::list(
            PREF_QUALITY_KEY,
            "Preferred quality",
            &["1080p", "720p", "480p", "360p", "240p"],
            &["1080", "720", "480", "360", "240"],
            PREF_QUALITY_DEFAULT,
        )]
    }
}
