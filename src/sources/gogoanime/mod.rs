mod filters;

use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::extractors::{DoodExtractor, GogoCdnExtractor, Mp4uploadExtractor, StreamWishExtractor};
use crate::filters::{FilterList, QueryParams};
use crate::models::{Anime, AnimesPage, Episode, Status, Video};
use crate::preferences::{sort_videos, Preference, SourcePreferences};
use crate::traits::{AnimeSource, Extractor, ExtractorOptions, SourceInfo};
use crate::utils::{
    absolute_url, attr, attr_at, join_base, own_text, select_all, select_all_in, select_opt, text_of,
    url_without_domain, HttpClient,
};
use futures::future::join_all;
use scraper::Html;
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://anitaku.to";
const DEFAULT_AJAX_URL: &str = "https://ajax.gogo-load.com";

const PREF_DOMAIN_KEY: &str = "preferred_domain";
const PREF_QUALITY_KEY: &str = "preferred_quality";
const PREF_QUALITY_DEFAULT: &str = "1080";
const PREF_SERVER_KEY: &str = "preferred_server";
const PREF_SERVER_DEFAULT: &str = "Gogostream";
const PREF_HOSTER_KEY: &str = "hoster_selection";

/// Display names and the mirror class names they appear under.
const HOSTERS: &[&str] = &["Gogostream", "Vidstreaming", "Doodstream", "StreamWish", "Mp4upload", "FileLions"];
const HOSTER_NAMES: &[&str] = &["vidcdn", "anime", "doodstream", "streamwish", "mp4upload", "filelions"];

const LISTING_SELECTOR: &str = "div.img a";
const NEXT_PAGE_SELECTOR: &str = "ul.pagination-list li:last-child:not(.selected)";

pub struct GogoAnime {
    http_client: HttpClient,
    default_base_url: String,
    ajax_url: String,
    prefs: SourcePreferences,
    gogocdn: GogoCdnExtractor,
    dood: DoodExtractor,
    streamwish: StreamWishExtractor,
    mp4upload: Mp4uploadExtractor,
}

/// A hoster mirror listed on an episode page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    pub class_name: String,
    pub url: String,
}

impl GogoAnime {
    pub fn new(config: &Config, prefs: SourcePreferences) -> Result<Self> {
        let (http_client, default_base_url, site) = super::site_client(config, "gogoanime", DEFAULT_BASE_URL)?;
        let ajax_url = site
            .api_url
            .unwrap_or_else(|| DEFAULT_AJAX_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            gogocdn: GogoCdnExtractor::new(http_client.clone()),
            dood: DoodExtractor::new(http_client.clone()),
            streamwish: StreamWishExtractor::new(http_client.clone()),
            mp4upload: Mp4uploadExtractor::new(http_client.clone()),
            http_client,
            default_base_url,
            ajax_url,
            prefs,
        })
    }

    /// The domain preference wins over the configured base URL.
    fn base_url(&self) -> String {
        self.prefs
            .get_string(PREF_DOMAIN_KEY, &self.default_base_url)
            .trim()
            .trim_end_matches('/')
            .to_string()
    }

    async fn listing(&self, url: &str, from_cover: bool) -> Result<AnimesPage> {
        info!("[GOGOANIME] Listing {}", url);
        let html = self.http_client.get(url).await?;
        parse_listing(&html, from_cover)
    }

    fn extractor_for(&self, class_name: &str) -> Option<(&dyn Extractor, ExtractorOptions)> {
        match class_name {
            "anime" | "vidcdn" => Some((&self.gogocdn as &dyn Extractor, ExtractorOptions::default())),
            "doodstream" => Some((&self.dood as &dyn Extractor, ExtractorOptions::default())),
            "streamwish" => Some((&self.streamwish as &dyn Extractor, ExtractorOptions::default())),
            "filelions" => Some((
                &self.streamwish as &dyn Extractor,
                ExtractorOptions::default().prefix("FileLions - "),
            )),
            "mp4upload" => Some((&self.mp4upload as &dyn Extractor, ExtractorOptions::default())),
            _ => None,
        }
    }

    async fn mirror_videos(&self, mirror: &Mirror) -> Vec<Video> {
        let Some((extractor, options)) = self.extractor_for(&mirror.class_name) else {
            debug!("[GOGOANIME] No extractor for {}", mirror.class_name);
            return Vec::new();
        };
        match extractor.videos_from_url(&mirror.url, &options).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!("[GOGOANIME] Mirror {} failed: {}", mirror.class_name, e);
                Vec::new()
            }
        }
    }
}

/// Series URL from a latest-episode cover, e.g.
/// `https://cdn/cover/one-piece-1676.png` -> `/category/one-piece`.
pub fn series_url_from_cover(image_url: &str) -> String {
    let without_scheme = image_url.trim_start_matches("https://");
    let path = without_scheme
        .split_once('/')
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let path = path.replacen("cover", "/category", 1);
    let path = match path.rfind('.') {
        Some(dot) => path[..dot].to_string(),
        None => path,
    };
    match path.rfind('-') {
        Some(dash) => {
            let suffix = &path[dash + 1..];
            if suffix.len() >= 3 && suffix.chars().all(|c| c.is_ascii_digit()) {
                path[..dash].to_string()
            } else {
                path
            }
        }
        None => path,
    }
}

pub fn parse_listing(html: &str, from_cover: bool) -> Result<AnimesPage> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    for link in select_all_in(&document, LISTING_SELECTOR)? {
        let image = attr_at(&link, "img", "src");
        let url = if from_cover {
            series_url_from_cover(&image)
        } else {
            url_without_domain(&attr(&link, "href"))
        };
        let mut anime = Anime::new(url, attr(&link, "title"));
        anime.thumbnail_url = (!image.is_empty()).then_some(image);
        items.push(anime);
    }
    let has_next = select_opt(&document.root_element(), NEXT_PAGE_SELECTOR).is_some();
    Ok(AnimesPage::new(items, has_next))
}

/// The series page linked from an episode page, if `html` is one.
pub fn info_link(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let href = attr_at(&document.root_element(), "div.anime-info a[href]", "href");
    if href.is_empty() {
        return None;
    }
    absolute_url(page_url, &href).ok()
}

fn parse_status(label: &str) -> Status {
    match label.trim() {
        "Ongoing" => Status::Ongoing,
        "Completed" => Status::Completed,
        _ => Status::Unknown,
    }
}

pub fn parse_details(html: &str, anime: &Anime) -> Result<Anime> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut details = anime.clone();
    if let Some(title) = select_opt(&root, "div.anime_info_body_bg h1") {
        details.title = text_of(&title);
    }

    let mut description = String::new();
    let mut other_names = String::new();
    for row in select_all(&root, "p.type")? {
        let label = select_opt(&row, "span").map(|s| text_of(&s)).unwrap_or_default().to_lowercase();
        if label.starts_with("plot summary") {
            description = own_text(&row);
        } else if label.starts_with("genre") {
            details.genres = select_all(&row, "a")?
                .iter()
                .map(|a| text_of(a).trim_start_matches(',').trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
        } else if label.starts_with("status") {
            let status = select_all(&row, "a")?.iter().map(text_of).collect::<String>();
            details.status = parse_status(&status);
        } else if label.starts_with("other name") {
            other_names = own_text(&row);
        }
    }
    if description.is_empty() {
        description = select_opt(&root, "div.description").map(|d| text_of(&d)).unwrap_or_default();
    }
    if !other_names.is_empty() {
        description = if description.is_empty() {
            format!("Other name(s): {}", other_names)
        } else {
            format!("{}\n\nOther name(s): {}", description, other_names)
        };
    }
    details.description = (!description.is_empty()).then_some(description);
    Ok(details)
}

/// `(ep_end, movie_id)` for the AJAX episode list request.
pub fn episode_range(html: &str) -> Result<(String, String)> {
    let document = Html::parse_document(html);
    let ranges = select_all_in(&document, "ul#episode_page li a")?;
    let last = ranges
        .last()
        .ok_or_else(|| SourceError::not_found("episode range in ul#episode_page"))?;
    let movie_id = attr_at(&document.root_element(), "input#movie_id", "value");
    if movie_id.is_empty() {
        return Err(SourceError::not_found("input#movie_id"));
    }
    Ok((attr(last, "ep_end"), movie_id))
}

pub fn parse_episode_list(html: &str, base_url: &str) -> Result<Vec<Episode>> {
    let document = Html::parse_document(html);
    let mut episodes = Vec::new();
    for link in select_all_in(&document, "a")? {
        let Some(name) = select_opt(&link, "div.name") else {
            continue;
        };
        let label = own_text(&name);
        let number = label.split_once(' ').map(|(_, n)| n.trim()).unwrap_or(label.as_str()).to_string();
        let Ok(episode_number) = number.parse::<f32>() else {
            continue;
        };
        let href = absolute_url(base_url, attr(&link, "href").trim())?;
        episodes.push(Episode::new(
            url_without_domain(&href),
            format!("Episode {}", number),
            episode_number,
        ));
    }
    Ok(episodes)
}

/// Mirrors whose class is in `hosters`, in page order. A mirror without a
/// usable URL is skipped.
pub fn parse_mirrors(html: &str, page_url: &str, hosters: &[String]) -> Result<Vec<Mirror>> {
    let document = Html::parse_document(html);
    let mut mirrors = Vec::new();
    for server in select_all_in(&document, "div.anime_muti_link > ul > li")? {
        let class_name = attr(&server, "class").trim().to_string();
        if !hosters.contains(&class_name) {
            continue;
        }
        let data_video = attr_at(&server, "a", "data-video");
        if data_video.is_empty() {
            continue;
        }
        match absolute_url(page_url, &data_video) {
            Ok(url) => mirrors.push(Mirror { class_name, url }),
            Err(e) => warn!("[GOGOANIME] Skipping {} mirror {}: {}", class_name, data_video, e),
        }
    }
    Ok(mirrors)
}

impl GogoAnime {
    fn search_url(&self, page: u32, query: &str, filters: &FilterList) -> String {
        let base_url = self.base_url();
        let genre = filters.select_value("genre_page");
        let recent = filters.select_value("recent");
        let season = filters.select_value("season_page");
        if !genre.is_empty() {
            format!("{}/genre/{}?page={}", base_url, genre, page)
        } else if !recent.is_empty() {
            format!(
                "{}/ajax/page-recent-release.html?page={}&type={}",
                self.ajax_url, page, recent
            )
        } else if !season.is_empty() {
            format!("{}/{}?page={}", base_url, season, page)
        } else {
            let mut query_params = QueryParams::new();
            query_params.push("keyword", query.trim());
            query_params.extend(filters.to_query_for(filters::ADVANCED_KEYS));
            query_params.push("page", &page.to_string());
            query_params.apply_to(&format!("{}/filter.html", base_url))
        }
    }
}

#[async_trait::async_trait]
impl AnimeSource for GogoAnime {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("Gogoanime", "en", &self.base_url(), true)
    }

    async fn popular(&self, page: u32) -> Result<AnimesPage> {
        self.listing(&format!("{}/popular.html?page={}", self.base_url(), page), false)
            .await
    }

    async fn latest(&self, page: u32) -> Result<AnimesPage> {
        self.listing(&format!("{}/?page={}", self.base_url(), page), true).await
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<AnimesPage> {
        let url = self.search_url(page, query, filters);
        self.listing(&url, false).await
    }

    async fn details(&self, anime: &Anime) -> Result<Anime> {
        let page_url = join_base(&self.base_url(), &anime.url);
        let mut html = self.http_client.get(&page_url).await?;
        if let Some(series_url) = info_link(&html, &page_url) {
            debug!("[GOGOANIME] Following series link {}", series_url);
            html = self.http_client.get(&series_url).await?;
        }
        parse_details(&html, anime)
    }

    async fn episodes(&self, anime: &Anime) -> Result<Vec<Episode>> {
        let base_url = self.base_url();
        let html = self.http_client.get(&join_base(&base_url, &anime.url)).await?;
        let (ep_end, movie_id) = episode_range(&html)?;
        let url = format!(
            "{}/ajax/load-list-episode?ep_start=0&ep_end={}&id={}",
            self.ajax_url, ep_end, movie_id
        );
        let list = self.http_client.get(&url).await?;
        let episodes = parse_episode_list(&list, &base_url)?;
        info!("[GOGOANIME] {} episodes for {}", episodes.len(), anime.url);
        Ok(episodes)
    }

    async fn videos(&self, episode: &Episode) -> Result<Vec<Video>> {
        let page_url = join_base(&self.base_url(), &episode.url);
        let html = self.http_client.get(&page_url).await?;

        let hosters = self.prefs.get_string_set(PREF_HOSTER_KEY, HOSTER_NAMES);
        let mirrors = parse_mirrors(&html, &page_url, &hosters)?;
        info!("[GOGOANIME] Resolving {} mirrors for {}", mirrors.len(), episode.url);

        let results = join_all(mirrors.iter().map(|mirror| self.mirror_videos(mirror))).await;
        let videos: Vec<Video> = results.into_iter().flatten().collect();
        if videos.is_empty() {
            return Err(SourceError::not_found(format!("videos for {}", episode.url)));
        }

        let quality = self.prefs.get_string(PREF_QUALITY_KEY, PREF_QUALITY_DEFAULT);
        let server = self.prefs.get_string(PREF_SERVER_KEY, PREF_SERVER_DEFAULT);
        Ok(sort_videos(videos, &quality, &server))
    }

    fn filters(&self) -> FilterList {
        filters::filter_list()
    }

    fn preference_screen(&self) -> Vec<Preference> {
        vec![
            Preference::edit_text(
                PREF_DOMAIN_KEY,
                "Override BaseUrl",
                &format!("Default: {}", self.default_base_url),
                &self.default_base_url,
            ),
            Preference::list(
                PREF_QUALITY_KEY,
                "Preferred quality",
                &["1080p", "720p", "480p", "360p"],
                &["1080", "720", "480", "360"],
                PREF_QUALITY_DEFAULT,
            ),
            Preference::list(PREF_SERVER_KEY, "Preferred server", HOSTERS, HOSTERS, PREF_SERVER_DEFAULT),
            Preference::multi_select(PREF_HOSTER_KEY, "Enable/Disable Hosts", HOSTERS, HOSTER_NAMES, HOSTER_NAMES),
        ]
    }
}
