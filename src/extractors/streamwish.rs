use crate::error::{Result, SourceError};
use crate::extractors::{playlist, unpacker};
use crate::models::Video;
use crate::traits::{Extractor, ExtractorOptions};
use crate::utils::HttpClient;
use tracing::debug;
use url::Url;

/// StreamWish and its FileLions clone: a packed jwplayer setup pointing at an
/// HLS master playlist.
pub struct StreamWishExtractor {
    client: HttpClient,
}

impl StreamWishExtractor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// Master playlist URL from an embed page, packed or not.
pub fn playlist_url_from_page(page: &str) -> Option<String> {
    let scripts = if unpacker::is_packed(page) {
        unpacker::unpack_all(page)
    } else {
        vec![page.to_string()]
    };
    scripts
        .iter()
        .filter_map(|script| unpacker::extract_source_url(script))
        .find(|url| url.contains(".m3u8"))
}

fn origin_referer(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    Some(format!("{}/", parsed.origin().ascii_serialization()))
}

#[async_trait::async_trait]
impl Extractor for StreamWishExtractor {
    async fn videos_from_url(&self, url: &str, options: &ExtractorOptions) -> Result<Vec<Video>> {
        let mut headers: Vec<(&str, &str)> = Vec::new();
        if let Some(referer) = options.referer.as_deref() {
            headers.push(("Referer", referer));
        }
        let page = self.client.get_with_headers(url, &headers).await?;

        let playlist_url = playlist_url_from_page(&page)
            .ok_or_else(|| SourceError::not_found(format!("StreamWish playlist in {}", url)))?;
        debug!("[STREAMWISH] playlist {}", playlist_url);

        let referer = origin_referer(url).unwrap_or_else(|| url.to_string());
        let prefix = options.prefix.as_deref().unwrap_or("StreamWish - ");
        playlist::fetch_videos(&self.client, &playlist_url, &[("Referer", referer.as_str())], prefix).await
    }
}
