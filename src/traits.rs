use crate::error::{Result, SourceError};
use crate::filters::FilterList;
use crate::models::{Anime, AnimesPage, Chapter, Episode, Manga, MangasPage, Page, Video};
use crate::preferences::Preference;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub lang: String,
    pub base_url: String,
    pub supports_latest: bool,
}

impl SourceInfo {
    pub fn new(name: &str, lang: &str, base_url: &str, supports_latest: bool) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
            base_url: base_url.to_string(),
            supports_latest,
        }
    }
}

/// Contract for sites that serve episodes and streams.
#[async_trait::async_trait]
pub trait AnimeSource: Send + Sync {
    fn info(&self) -> SourceInfo;

    async fn popular(&self, page: u32) -> Result<AnimesPage>;

    async fn latest(&self, _page: u32) -> Result<AnimesPage> {
        Err(SourceError::unsupported(format!("{} has no latest listing", self.info().name)))
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<AnimesPage>;

    /// Fills in the detail fields of an item returned by a listing.
    async fn details(&self, anime: &Anime) -> Result<Anime>;

    async fn episodes(&self, anime: &Anime) -> Result<Vec<Episode>>;

    async fn videos(&self, episode: &Episode) -> Result<Vec<Video>>;

    fn filters(&self) -> FilterList {
        FilterList::default()
    }

    fn preference_screen(&self) -> Vec<Preference> {
        Vec::new()
    }
}

/// Contract for sites that serve chapters and page images.
#[async_trait::async_trait]
pub trait MangaSource: Send + Sync {
    fn info(&self) -> SourceInfo;

    async fn popular(&self, page: u32) -> Result<MangasPage>;

    async fn latest(&self, _page: u32) -> Result<MangasPage> {
        Err(SourceError::unsupported(format!("{} has no latest listing", self.info().name)))
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<MangasPage>;

    async fn details(&self, manga: &Manga) -> Result<Manga>;

    async fn chapters(&self, manga: &Manga) -> Result<Vec<Chapter>>;

    async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>>;

    fn filters(&self) -> FilterList {
        FilterList::default()
    }

    fn preference_screen(&self) -> Vec<Preference> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    /// Sent as `Referer` when fetching the embed page.
    pub referer: Option<String>,
    /// Prepended to every quality label, e.g. `"FileLions - "`.
    pub prefix: Option<String>,
}

impl ExtractorOptions {
    pub fn with_referer(referer: &str) -> Self {
        Self {
            referer: Some(referer.to_string()),
            prefix: None,
        }
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }
}

/// Resolves a hoster's embed page into playable videos.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn videos_from_url(&self, url: &str, options: &ExtractorOptions) -> Result<Vec<Video>>;
}
