mod filters;

use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::filters::{FilterList, QueryParams};
use crate::models::{Chapter, Manga, MangasPage, Page, Status};
use crate::preferences::{Preference, SourcePreferences};
use crate::traits::{MangaSource, SourceInfo};
use crate::utils::{
    absolute_url, attr, join_base, select_all, select_all_in, select_opt, substring_between, text_at, text_of,
    url_without_domain, HttpClient,
};
use chrono::{DateTime, Duration, Months, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://mangapark.net";

const DIRECTORY_SELECTOR: &str = ".ls1 .item";
const DIRECTORY_NEXT_PAGE_SELECTOR: &str = ".paging.full > li:last-child > a";
const SEARCH_SELECTOR: &str = ".item";
const SEARCH_NEXT_PAGE_SELECTOR: &str = ".paging:not(.order) > li:last-child > a";

const PREF_SOURCE_KEY: &str = "Manga_Park_Source";
const PREF_SOURCE_DEFAULT: &str = "all";
const SOURCE_ENTRIES: &[&str] = &[
    "All sources, all chapters",
    "Source with most chapters",
    "Smart list",
    "Prioritize source: Rock",
    "Prioritize source: Duck",
    "Prioritize source: Mini",
    "Prioritize source: Fox",
    "Prioritize source: Panda",
];
const SOURCE_VALUES: &[&str] = &["all", "most", "smart", "rock", "duck", "mini", "fox", "panda"];

static CHAPTER_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\.?\d?\b").unwrap());

pub struct MangaPark {
    http_client: HttpClient,
    base_url: String,
    prefs: SourcePreferences,
}

#[derive(Debug, Deserialize)]
struct LoadedPage {
    u: String,
}

impl MangaPark {
    pub fn new(config: &Config, prefs: SourcePreferences) -> Result<Self> {
        let (http_client, base_url, _) = super::site_client(config, "mangapark", DEFAULT_BASE_URL)?;
        Ok(Self {
            http_client,
            base_url,
            prefs,
        })
    }

    async fn listing(&self, url: &str, item_selector: &str, next_selector: &str) -> Result<MangasPage> {
        info!("[MANGAPARK] Listing {}", url);
        let html = self.http_client.get(url).await?;
        parse_listing(&html, &self.base_url, item_selector, next_selector)
    }

    fn search_url(&self, page: u32, query: &str, filters: &FilterList) -> String {
        let mut params = QueryParams::new();
        params.push("q", query.trim());
        params.extend(filters.to_query());
        params.push("page", &page.to_string());
        params.apply_to(&format!("{}/search", self.base_url))
    }
}

pub fn parse_listing(html: &str, base_url: &str, item_selector: &str, next_selector: &str) -> Result<MangasPage> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    for element in select_all_in(&document, item_selector)? {
        let Some(cover) = select_opt(&element, ".cover") else {
            continue;
        };
        let mut manga = Manga::new(url_without_domain(&attr(&cover, "href")), attr(&cover, "title"));
        if let Some(img) = select_opt(&cover, "img") {
            let src = attr(&img, "src");
            if !src.is_empty() {
                manga.thumbnail_url = Some(absolute_url(base_url, &src)?);
            }
        }
        items.push(manga);
    }
    let has_next = select_opt(&document.root_element(), next_selector).is_some();
    Ok(MangasPage::new(items, has_next))
}

fn links_joined(row: &scraper::ElementRef) -> Result<String> {
    Ok(select_all(row, "a")?.iter().map(text_of).collect::<Vec<_>>().join(", "))
}

pub fn parse_details(html: &str, base_url: &str, manga: &Manga) -> Result<Manga> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut details = manga.clone();

    if let Some(cover) = select_opt(&root, ".cover > img") {
        details.title = attr(&cover, "title");
        let src = attr(&cover, "src");
        if !src.is_empty() {
            details.thumbnail_url = Some(absolute_url(base_url, &src)?);
        }
    }

    for row in select_all(&root, ".attr > tbody > tr")? {
        match text_at(&row, "th").to_lowercase().as_str() {
            "author(s)" => details.author = Some(links_joined(&row)?),
            "artist(s)" => details.artist = Some(links_joined(&row)?),
            "genre(s)" => {
                details.genres = select_all(&row, "a")?.iter().map(text_of).collect();
            }
            "status" => {
                details.status = match text_at(&row, "td").to_lowercase().as_str() {
                    "ongoing" => Status::Ongoing,
                    "completed" => Status::Completed,
                    _ => Status::Unknown,
                };
            }
            _ => {}
        }
    }

    let summary = select_all(&root, ".summary")?.iter().map(text_of).collect::<Vec<_>>().join(" ");
    details.description = (!summary.trim().is_empty()).then(|| summary.trim().to_string());
    Ok(details)
}

/// `String.hashCode` over UTF-16 code units; gives unnumbered chapters a
/// stable fractional number.
fn java_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

pub fn chapter_number(name: &str) -> f32 {
    CHAPTER_NUMBER_REGEX
        .find(name)
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .or_else(|| format!("0.{}", java_hash(name).unsigned_abs()).parse().ok())
        .unwrap_or(0.0)
}

/// Dates as shown on chapter rows: `Jan 5, 2021, 10:24 am`, `3 days ago`,
/// `a minute ago`, `yesterday 10:24 pm` or `today 08:00 am`.
///
/// The site's clock values are 24-hour despite the am/pm marker, which is ignored.
pub fn parse_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = text.trim().to_lowercase();
    if lower.ends_with("ago") {
        return parse_relative_date(&lower, now);
    }

    let day_offset = if lower.starts_with("yesterday") {
        Some(1)
    } else if lower.starts_with("today") {
        Some(0)
    } else {
        None
    };
    if let Some(days) = day_offset {
        let time = strip_meridiem(lower.split_once(' ').map(|(_, t)| t).unwrap_or(""));
        let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
        let date = (now - Duration::days(days)).date_naive();
        return Some(date.and_time(time).and_utc());
    }

    NaiveDateTime::parse_from_str(strip_meridiem(&lower), "%b %d, %Y, %H:%M")
        .ok()
        .map(|dt| dt.and_utc())
}

fn strip_meridiem(text: &str) -> &str {
    text.trim()
        .trim_end_matches("am")
        .trim_end_matches("pm")
        .trim_end()
}

fn parse_relative_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() < 3 || parts[2] != "ago" {
        return None;
    }
    let number: u32 = match parts[0] {
        "a" | "an" => 1,
        n => n.parse().ok()?,
    };
    let amount = i64::from(number);
    match parts[1].trim_end_matches('s') {
        "year" => now.checked_sub_months(Months::new(number * 12)),
        "month" => now.checked_sub_months(Months::new(number)),
        "week" => Some(now - Duration::weeks(amount)),
        "day" => Some(now - Duration::days(amount)),
        "hour" => Some(now - Duration::hours(amount)),
        "minute" => Some(now - Duration::minutes(amount)),
        "second" => Some(now - Duration::seconds(amount)),
        _ => None,
    }
}

/// Chapter rows grouped by stream, each tagged with the stream's name.
pub fn parse_streams(html: &str, now: DateTime<Utc>) -> Result<Vec<Vec<Chapter>>> {
    let document = Html::parse_document(html);
    let mut streams = Vec::new();
    for stream in select_all_in(&document, "div[id^=stream]")? {
        let scanlator = text_at(&stream, "i + span");
        let mut chapters = Vec::new();
        for row in select_all(&stream, ".volume .chapter li")? {
            let Some(link) = select_opt(&row, ".tit > a") else {
                continue;
            };
            let href = attr(&link, "href");
            let url = match href.rfind('/') {
                Some(slash) => href[..=slash].to_string(),
                None => href,
            };
            let name = text_of(&link);
            let mut chapter = Chapter::new(url_without_domain(&url), name.clone(), chapter_number(&name));
            chapter.date_upload = parse_date(&text_at(&row, ".time"), now);
            chapter.scanlator = Some(scanlator.clone());
            chapters.push(chapter);
        }
        streams.push(chapters);
    }
    Ok(streams)
}

fn sort_descending(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        b.chapter_number
            .partial_cmp(&a.chapter_number)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Chapters of `all` whose number is absent from `chosen`, first of each number.
fn missing_chapters(chosen: &[Chapter], all: &[Chapter]) -> Vec<Chapter> {
    let mut seen: Vec<f32> = chosen.iter().map(|c| c.chapter_number).collect();
    let mut missing = Vec::new();
    for chapter in all {
        if !seen.contains(&chapter.chapter_number) {
            seen.push(chapter.chapter_number);
            missing.push(chapter.clone());
        }
    }
    missing
}

fn prefer_scanlator(all: Vec<Chapter>, name: &str) -> Vec<Chapter> {
    let chosen: Vec<Chapter> = all
        .iter()
        .filter(|c| c.scanlator.as_deref().unwrap_or("").contains(name))
        .cloned()
        .collect();
    if chosen.is_empty() {
        return all;
    }
    let mut merged = missing_chapters(&chosen, &all);
    merged.splice(0..0, chosen);
    sort_descending(&mut merged);
    merged
}

/// Merges per-stream chapter lists according to the chapter source preference.
pub fn select_chapters(streams: Vec<Vec<Chapter>>, preference: &str) -> Vec<Chapter> {
    match preference {
        "most" => {
            let all: Vec<Chapter> = streams.iter().flatten().cloned().collect();
            let Some(largest) = streams
                .into_iter()
                .reduce(|best, next| if next.len() > best.len() { next } else { best })
            else {
                return Vec::new();
            };
            let mut merged = missing_chapters(&largest, &all);
            merged.splice(0..0, largest);
            sort_descending(&mut merged);
            merged
        }
        "smart" => {
            let all: Vec<Chapter> = streams.into_iter().flatten().collect();
            let mut merged = missing_chapters(&[], &all);
            sort_descending(&mut merged);
            merged
        }
        "rock" | "duck" | "mini" | "fox" | "panda" => {
            let mut name = preference.to_string();
            name[..1].make_ascii_uppercase();
            prefer_scanlator(streams.into_iter().flatten().collect(), &name)
        }
        _ => streams.into_iter().flatten().collect(),
    }
}

pub fn parse_pages(html: &str) -> Result<Vec<Page>> {
    let json = substring_between(html, "var _load_pages = ", ";")
        .ok_or_else(|| SourceError::not_found("_load_pages script"))?;
    let loaded: Vec<LoadedPage> = serde_json::from_str(json)?;
    Ok(loaded
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            let url = if page.u.starts_with("//") {
                format!("https:{}", page.u)
            } else {
                page.u
            };
            Page::new(index, url)
        })
        .collect())
}

#[async_trait::async_trait]
impl MangaSource for MangaPark {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("MangaPark", "en", &self.base_url, true)
    }

    async fn popular(&self, page: u32) -> Result<MangasPage> {
        let url = format!("{}/genre/{}?views_a", self.base_url, page);
        self.listing(&url, DIRECTORY_SELECTOR, DIRECTORY_NEXT_PAGE_SELECTOR).await
    }

    async fn latest(&self, _page: u32) -> Result<MangasPage> {
        let url = format!("{}/latest", self.base_url);
        self.listing(&url, DIRECTORY_SELECTOR, DIRECTORY_NEXT_PAGE_SELECTOR).await
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<MangasPage> {
        let url = self.search_url(page, query, filters);
        self.listing(&url, SEARCH_SELECTOR, SEARCH_NEXT_PAGE_SELECTOR).await
    }

    async fn details(&self, manga: &Manga) -> Result<Manga> {
        let html = self.http_client.get(&join_base(&self.base_url, &manga.url)).await?;
        parse_details(&html, &self.base_url, manga)
    }

    async fn chapters(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let html = self.http_client.get(&join_base(&self.base_url, &manga.url)).await?;
        let streams = parse_streams(&html, Utc::now())?;
        let preference = self.prefs.get_string(PREF_SOURCE_KEY, PREF_SOURCE_DEFAULT);
        let chapters = select_chapters(streams, &preference);
        info!("[MANGAPARK] {} chapters for {} ({})", chapters.len(), manga.url, preference);
        Ok(chapters)
    }

    async fn pages(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let html = self.http_client.get(&join_base(&self.base_url, &chapter.url)).await?;
        parse_pages(&html)
    }

    fn filters(&self) -> FilterList {
        filters::filter_list()
    }

    fn preference_screen(&self) -> Vec<Preference> {
        vec![Preference::list(
            PREF_SOURCE_KEY,
            "Chapter List Source",
            SOURCE_ENTRIES,
            SOURCE_VALUES,
            PREF_SOURCE_DEFAULT,
        )]
    }
}
