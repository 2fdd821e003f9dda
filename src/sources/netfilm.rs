use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::filters::{Filter, FilterList, SelectFilter};
use crate::models::{format_number, Anime, AnimesPage, Episode, Track, Video};
use crate::preferences::{prefer_quality, Preference, SourcePreferences};
use crate::traits::{AnimeSource, SourceInfo};
use crate::utils::{encode_query, HttpClient};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://net-film.vercel.app/api";
const PAGE_SIZE: usize = 30;
const APP_ID: &str = "eyJhbGciOiJIUzI1NiJ9";
const PREF_QUALITY_KEY: &str = "preferred_quality";
const PREF_QUALITY_DEFAULT: &str = "1080";

const SUB_PAGES: &[(&str, &str)] = &[
    ("Popular Movie", "/category?area=&category=1&order=count&params=MOVIE,TVSPECIAL&size=30"),
    ("Recent Movie", "/category?area=&category=1&order=up&params=MOVIE,TVSPECIAL&size=30"),
    (
        "Popular TV Series",
        "/category?area=&category=1&order=count&params=TV,SETI,MINISERIES,VARIETY,TALK,DOCUMENTARY&size=30",
    ),
    (
        "Recent TV Series",
        "/category?area=&category=1&order=up&params=TV,SETI,MINISERIES,VARIETY,TALK,DOCUMENTARY&size=30",
    ),
    ("Popular Anime", "/category?area=&category=1&order=count&params=COMIC&size=30"),
    ("Recent Anime", "/category?area=&category=1&order=up&params=COMIC&size=30"),
];

/// Ids come back as either strings or numbers depending on the endpoint.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub data: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: SearchData,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub cover_vertical_url: Option<String>,
    pub domain_type: i32,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub sort: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    pub data: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    pub name: String,
    #[serde(default)]
    pub cover_vertical_url: Option<String>,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub tag_list: Vec<Tag>,
    #[serde(default)]
    pub episode_vo: Vec<EpisodeEntry>,
    pub category: i32,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub series_no: f32,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeResponse {
    pub data: EpisodeData,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeData {
    #[serde(default)]
    pub qualities: Vec<Quality>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

#[derive(Debug, Deserialize)]
pub struct Quality {
    pub quality: i32,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Subtitle {
    pub url: String,
    pub language: String,
}

/// The JSON token stored as `Anime::url` and `Episode::url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    pub category: String,
    pub id: String,
    /// The request the item was found on; sent as Referer downstream.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
}

impl LinkData {
    fn parse(token: &str) -> Result<Self> {
        Ok(serde_json::from_str(token)?)
    }

    fn to_token(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// JSON catalogue with a last-sort-key pagination cursor.
pub struct NetFilm {
    http_client: HttpClient,
    base_url: String,
    explore_referer: String,
    prefs: SourcePreferences,
    /// `sort` of the last item served; page 1 resets it.
    cursor: Mutex<String>,
}

impl NetFilm {
    pub fn new(config: &Config, prefs: SourcePreferences) -> Result<Self> {
        let (http_client, base_url, _) = super::site_client(config, "netfilm", DEFAULT_BASE_URL)?;
        let explore_referer = Url::parse(&base_url)?.join("/explore")?.to_string();
        Ok(Self {
            http_client,
            base_url,
            explore_referer,
            prefs,
            cursor: Mutex::new(String::new()),
        })
    }

    fn cursor_for(&self, page: u32) -> String {
        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        if page <= 1 {
            cursor.clear();
        }
        cursor.clone()
    }

    fn remember(&self, page: &ParsedPage) {
        if let Some(sort) = &page.last_sort {
            *self.cursor.lock().unwrap_or_else(|e| e.into_inner()) = sort.clone();
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str, referer: &str) -> Result<T> {
        debug!("[NETFILM] GET {}", url);
        self.http_client
            .get_json(
                url,
                &[
                    ("Accept", "application/json, text/plain, */*"),
                    ("appid", APP_ID),
                    ("Referer", referer),
                    ("Sec-Fetch-Dest", "empty"),
                    ("Sec-Fetch-Mode", "cors"),
                    ("Sec-Fetch-Site", "same-origin"),
                ],
            )
            .await
    }

    async fn category_page(&self, listing: &str, page: u32) -> Result<AnimesPage> {
        let cursor = self.cursor_for(page);
        let url = format!(
            "{}{}&sort={}&subtitles=&year=",
            self.base_url,
            listing,
            encode_query(&cursor)
        );
        let response: CategoryResponse = self.fetch(&url, &self.explore_referer).await?;
        let parsed = catalog_page(response.data, &url)?;
        self.remember(&parsed);
        info!("[NETFILM] {} items on page {}", parsed.page.items.len(), page);
        Ok(parsed.page)
    }

    async fn detail(&self, link: &LinkData) -> Result<Detail> {
        let url = format!("{}/detail?category={}&id={}", self.base_url, link.category, link.id);
        let response: DetailResponse = self.fetch(&url, &link.url).await?;
        Ok(response.data)
    }
}

pub struct ParsedPage {
    pub page: AnimesPage,
    pub last_sort: Option<String>,
}

/// Turns catalogue rows into a page; a full page means there is another.
pub fn catalog_page(items: Vec<CatalogItem>, request_url: &str) -> Result<ParsedPage> {
    if items.is_empty() {
        return Ok(ParsedPage {
            page: AnimesPage::empty(),
            last_sort: None,
        });
    }
    let last_sort = items.last().map(|item| item.sort.clone());
    let has_next = items.len() == PAGE_SIZE;
    let mut animes = Vec::with_capacity(items.len());
    for item in items {
        let link = LinkData {
            category: item.domain_type.to_string(),
            id: item.id,
            url: request_url.to_string(),
            episode_id: None,
        };
        let mut anime = Anime::new(link.to_token()?, item.name);
        anime.thumbnail_url = item.cover_vertical_url;
        animes.push(anime);
    }
    Ok(ParsedPage {
        page: AnimesPage::new(animes, has_next),
        last_sort,
    })
}

/// Episodes newest first, each carrying its own `episodeId`.
pub fn episode_list(detail: &Detail, detail_url: &str) -> Result<Vec<Episode>> {
    let mut episodes = Vec::with_capacity(detail.episode_vo.len());
    for entry in &detail.episode_vo {
        let link = LinkData {
            category: detail.category.to_string(),
            id: detail.id.clone(),
            url: detail_url.to_string(),
            episode_id: Some(entry.id.clone()),
        };
        episodes.push(Episode::new(
            link.to_token()?,
            format!("Episode {}", format_number(entry.series_no)),
            entry.series_no,
        ));
    }
    episodes.reverse();
    Ok(episodes)
}

pub fn video_list(data: EpisodeData) -> Vec<Video> {
    let subtitles: Vec<Track> = data
        .subtitles
        .into_iter()
        .map(|s| Track::new(s.url, s.language))
        .collect();
    data.qualities
        .into_iter()
        .map(|q| Video::new(q.url, format!("{}p", q.quality)).with_subtitles(subtitles.clone()))
        .collect()
}

#[async_trait::async_trait]
impl AnimeSource for NetFilm {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("NetFilm", "all", &self.base_url, true)
    }

    async fn popular(&self, page: u32) -> Result<AnimesPage> {
        self.category_page("/category?area=&category=1&order=count&params=COMIC&size=30", page)
            .await
    }

    async fn latest(&self, page: u32) -> Result<AnimesPage> {
        self.category_page("/category?area=&category=1&order=up&params=COMIC&size=30", page)
            .await
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<AnimesPage> {
        let query = query.trim();
        if query.is_empty() {
            let listing = match filters.select("subpage") {
                Some(select) => select.value().to_string(),
                None => SUB_PAGES[0].1.to_string(),
            };
            return self.category_page(&listing, page).await;
        }

        self.cursor_for(page);
        let url = format!("{}/search?keyword={}&size=30", self.base_url, encode_query(query));
        let response: SearchResponse = self.fetch(&url, &url).await?;
        let parsed = catalog_page(response.data.results, &url)?;
        self.remember(&parsed);
        Ok(parsed.page)
    }

    async fn details(&self, anime: &Anime) -> Result<Anime> {
        let link = LinkData::parse(&anime.url)?;
        let detail = self.detail(&link).await?;
        let mut out = anime.clone();
        out.title = detail.name;
        out.thumbnail_url = detail.cover_vertical_url;
        out.description = detail.introduction;
        out.genres = detail.tag_list.into_iter().map(|t| t.name).collect();
        Ok(out)
    }

    async fn episodes(&self, anime: &Anime) -> Result<Vec<Episode>> {
        let link = LinkData::parse(&anime.url)?;
        let detail = self.detail(&link).await?;
        let detail_url = format!("{}/detail?category={}&id={}", self.base_url, link.category, link.id);
        episode_list(&detail, &detail_url)
    }

    async fn videos(&self, episode: &Episode) -> Result<Vec<Video>> {
        let link = LinkData::parse(&episode.url)?;
        let episode_id = link
            .episode_id
            .as_deref()
            .ok_or_else(|| SourceError::not_found("NetFilm episodeId in episode token"))?;
        let url = format!(
            "{}/episode?category={}&id={}&episode={}",
            self.base_url, link.category, link.id, episode_id
        );
        let response: EpisodeResponse = self.fetch(&url, &link.url).await?;
        let videos = video_list(response.data);
        let quality = self.prefs.get_string(PREF_QUALITY_KEY, PREF_QUALITY_DEFAULT);
        Ok(prefer_quality(videos, &quality))
    }

    fn filters(&self) -> FilterList {
        FilterList::new(vec![
            Filter::header("Text search ignores filters"),
            Filter::Select(SelectFilter::new("subpage", "Sub Page", "subpage", SUB_PAGES)),
        ])
    }

    fn preference_screen(&self) -> Vec<Preference> {
        vec![Preference::list(
            PREF_QUALITY_KEY,
            "Preferred quality",
            &["1080p", "720p", "480p", "360p", "240p", "80p"],
            &["1080", "720", "480", "360", "240", "80"],
            PREF_QUALITY_DEFAULT,
        )]
    }
}
