use crate::config::Config;
use crate::error::Result;
use crate::extractors::{playlist, unpacker};
use crate::filters::{Filter, FilterList, SelectFilter};
use crate::models::{format_number, Anime, AnimesPage, Episode, Status, Video};
use crate::preferences::{prefer_quality, Preference, SourcePreferences};
use crate::traits::{AnimeSource, SourceInfo};
use crate::utils::{
    attr, attr_at, encode_query, join_base, select_all, select_all_in, select_opt, substring_between, text_at,
    url_without_domain, HttpClient,
};
use scraper::Html;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://www.mundodonghua.com";
const PREF_QUALITY_KEY: &str = "preferred_quality";
const PREF_QUALITY_DEFAULT: &str = "720";

const GENRES: &[(&str, &str)] = &[
    ("<Selecionar>", ""),
    ("Acción", "Acción"),
    ("Artes Marciales", "Artes Marciales"),
    ("Aventura", "Aventura"),
    ("Ciencia Ficción", "Ciencia Ficción"),
    ("Comedia", "Comedia"),
    ("Comida", "Comida"),
    ("Cultivación", "Cultivación"),
    ("Demonios", "Demonios"),
    ("Deportes", "Deportes"),
    ("Drama", "Drama"),
    ("Ecchi", "Ecchi"),
    ("Escolar", "Escolar"),
    ("Fantasía", "Fantasía"),
    ("Harem", "Harem"),
    ("Harem Inverso", "Harem Inverso"),
    ("Historico", "Historico"),
    ("Idols", "Idols"),
    ("Juegos", "Juegos"),
    ("Lucha", "Lucha"),
    ("Magia", "Magia"),
    ("Mechas", "Mechas"),
    ("Militar", "Militar"),
    ("Misterio", "Misterio"),
    ("Música", "Música"),
    ("Por Definir", "Por Definir"),
    ("Psicológico", "Psicológico"),
    ("Reencarnación", "Reencarnación"),
    ("Romance", "Romance"),
    ("Seinen", "Seinen"),
    ("Shojo", "Shojo"),
    ("Shonen", "Shonen"),
    ("Sobrenatural", "Sobrenatural"),
    ("Sucesos de la Vida", "Sucesos de la Vida"),
    ("Superpoderes", "Superpoderes"),
    ("Suspenso", "Suspenso"),
    ("Terror", "Terror"),
    ("Vampiros", "Vampiros"),
    ("Viaje a Otro Mundo", "Viaje a Otro Mundo"),
    ("Videojuegos", "Videojuegos"),
    ("Zombis", "Zombis"),
];

pub struct MundoDonghua {
    http_client: HttpClient,
    base_url: String,
    prefs: SourcePreferences,
}

impl MundoDonghua {
    pub fn new(config: &Config, prefs: SourcePreferences) -> Result<Self> {
        let (http_client, base_url, _) = super::site_client(config, "mundodonghua", DEFAULT_BASE_URL)?;
        Ok(Self {
            http_client,
            base_url,
            prefs,
        })
    }

    async fn listing(&self, url: &str) -> Result<AnimesPage> {
        info!("[MUNDODONGHUA] Listing {}", url);
        let html = self.http_client.get(url).await?;
        parse_listing(&html, &self.base_url)
    }

    async fn videos_from_source(&self, source: &str, referer: &str) -> Result<Vec<Video>> {
        if source.contains(".m3u8") {
            return playlist::fetch_videos(&self.http_client, source, &[("Referer", referer)], "").await;
        }
        Ok(vec![Video::new(source, "Default").with_headers([("Referer", referer)])])
    }
}

/// Links on the site are either absolute or relative without a leading slash.
fn external_or_internal(base_url: &str, href: &str) -> String {
    if href.contains("https") {
        href.to_string()
    } else {
        join_base(base_url, href)
    }
}

pub fn parse_listing(html: &str, base_url: &str) -> Result<AnimesPage> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    for element in select_all_in(&document, "div.col-md-9 div.row div.item")? {
        let href = attr_at(&element, "a.angled-img", "href");
        if href.is_empty() {
            continue;
        }
        let title = text_at(&element, "a.angled-img h5").trim_matches('"').to_string();
        let mut anime = Anime::new(url_without_domain(&external_or_internal(base_url, &href)), title);
        let image = attr_at(&element, "a.angled-img img", "src");
        if !image.is_empty() {
            anime.thumbnail_url = Some(format!("{}{}", base_url, image));
        }
        items.push(anime);
    }
    let has_next = select_opt(&document.root_element(), "ul.pagination li:last-child a").is_some();
    Ok(AnimesPage::new(items, has_next))
}

pub fn parse_status(label: &str) -> Status {
    if label.contains("En Emisión") {
        Status::Ongoing
    } else if label.contains("Finalizada") {
        Status::Completed
    } else {
        Status::Unknown
    }
}

pub fn parse_details(html: &str, base_url: &str, anime: &Anime) -> Result<Anime> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut details = anime.clone();

    let style = attr_at(&root, "div.banner-side-serie", "style");
    if let Some(image) = substring_between(&style, "background-image: url(", ")") {
        details.thumbnail_url = Some(external_or_internal(base_url, image.trim_matches(|c| c == '\'' || c == '"')));
    }
    let title = text_at(&root, "div.ls-title-serie");
    if !title.is_empty() {
        details.title = title;
    }
    let description = text_at(&root, "p.text-justify").trim_matches('"').to_string();
    details.description = (!description.is_empty()).then_some(description);
    details.genres = select_all(&root, "a.generos span.label")?
        .iter()
        .map(crate::utils::text_of)
        .collect();
    details.status = parse_status(&text_at(&root, "span.badge"));
    Ok(details)
}

pub fn parse_episodes(html: &str, base_url: &str) -> Result<Vec<Episode>> {
    let document = Html::parse_document(html);
    let mut episodes = Vec::new();
    for link in select_all_in(&document, "ul.donghua-list a")? {
        let href = attr(&link, "href");
        let Some(number) = href
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|last| last.parse::<f32>().ok())
        else {
            continue;
        };
        episodes.push(Episode::new(
            url_without_domain(&external_or_internal(base_url, &href)),
            format!("Episodio {}", format_number(number)),
            number,
        ));
    }
    Ok(episodes)
}

/// Stream URLs found in the page's packed player scripts, in page order.
pub fn player_sources(html: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for script in unpacker::unpack_all(html) {
        if let Some(url) = unpacker::extract_source_url(&script) {
            if !sources.contains(&url) {
                sources.push(url);
            }
        }
    }
    sources
}

#[async_trait::async_trait]
impl AnimeSource for MundoDonghua {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("MundoDonghua", "es", &self.base_url, false)
    }

    async fn popular(&self, page: u32) -> Result<AnimesPage> {
        self.listing(&format!("{}/lista-donghuas/{}", self.base_url, page)).await
    }

    async fn search(&self, page: u32, query: &str, filters: &FilterList) -> Result<AnimesPage> {
        let genre = filters.select_value("genre");
        if !query.trim().is_empty() {
            let query = encode_query(query.trim()).replace('+', "%20");
            self.listing(&format!("{}/busquedas/{}", self.base_url, query)).await
        } else if !genre.is_empty() {
            let genre = encode_query(genre).replace('+', "%20");
            self.listing(&format!("{}/genero/{}", self.base_url, genre)).await
        } else {
            self.popular(page).await
        }
    }

    async fn details(&self, anime: &Anime) -> Result<Anime> {
        let html = self.http_client.get(&join_base(&self.base_url, &anime.url)).await?;
        parse_details(&html, &self.base_url, anime)
    }

    async fn episodes(&self, anime: &Anime) -> Result<Vec<Episode>> {
        let html = self.http_client.get(&join_base(&self.base_url, &anime.url)).await?;
        parse_episodes(&html, &self.base_url)
    }

    async fn videos(&self, episode: &Episode) -> Result<Vec<Video>> {
        let page_url = join_base(&self.base_url, &episode.url);
        let html = self.http_client.get(&page_url).await?;

        let mut videos = Vec::new();
        for source in player_sources(&html) {
            match self.videos_from_source(&source, &page_url).await {
                Ok(found) => videos.extend(found),
                Err(e) => warn!("[MUNDODONGHUA] Skipping {}: {}", source, e),
            }
        }
        info!("[MUNDODONGHUA] {} videos for {}", videos.len(), episode.url);

        let quality = self.prefs.get_string(PREF_QUALITY_KEY, PREF_QUALITY_DEFAULT);
        Ok(prefer_quality(videos, &quality))
    }

    fn filters(&self) -> FilterList {
        FilterList::new(vec![
            Filter::header("La busqueda por texto ignora el filtro"),
            Filter::Select(SelectFilter::new("genre", "Géneros", "genre", GENRES)),
        ])
    }

    fn preference_screen(&self) -> Vec<Preference> {
        vec![Preference::list(
            PREF_QUALITY_KEY,
            "Preferred quality",
            &["1080p", "720p", "480p", "360p"],
            &["1080", "720", "480", "360"],
            PREF_QUALITY_DEFAULT,
        )]
    }
}
