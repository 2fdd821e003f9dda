use crate::error::{Result, SourceError};
use crate::models::Video;
use crate::traits::{Extractor, ExtractorOptions};
use crate::utils::{substring_between, HttpClient};
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use tracing::debug;

static QUALITY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,4}p").unwrap());

/// DoodStream: the embed page names a `/pass_md5/` endpoint that returns the
/// stream prefix, completed with a random suffix, the token and an expiry.
pub struct DoodExtractor {
    client: HttpClient,
}

impl DoodExtractor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// `<hash>/<token>` from `$.get('/pass_md5/<hash>/<token>', ...)`.
pub fn pass_md5_path(page: &str) -> Option<&str> {
    substring_between(page, "'/pass_md5/", "'").filter(|path| !path.is_empty())
}

/// Resolution named in the page title, e.g. `720p`.
pub fn title_quality(page: &str) -> Option<String> {
    let title = substring_between(page, "<title>", "</title>")?;
    QUALITY_REGEX.find(title).map(|m| m.as_str().to_string())
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[async_trait::async_trait]
impl Extractor for DoodExtractor {
    async fn videos_from_url(&self, url: &str, options: &ExtractorOptions) -> Result<Vec<Video>> {
        let response = self.client.get_raw(url, &[]).await?;
        // Dood redirects between its many domains; the final host serves pass_md5.
        let page_url = response.url().clone();
        let page = response.text().await?;

        let md5_path = pass_md5_path(&page)
            .ok_or_else(|| SourceError::not_found(format!("Dood pass_md5 in {}", url)))?;
        let token = md5_path.rsplit('/').next().unwrap_or(md5_path);
        let origin = page_url.origin().ascii_serialization();

        let md5_url = format!("{}/pass_md5/{}", origin, md5_path);
        debug!("[DOOD] {}", md5_url);
        let stream_prefix = self
            .client
            .get_with_headers(&md5_url, &[("Referer", page_url.as_str())])
            .await?;

        let video_url = format!(
            "{}{}?token={}&expiry={}",
            stream_prefix.trim(),
            random_suffix(10),
            token,
            chrono::Utc::now().timestamp_millis()
        );
        let prefix = options.prefix.as_deref().unwrap_or("Doodstream - ");
        let quality = title_quality(&page).unwrap_or_else(|| "Default".to_string());
        let referer = format!("{}/", origin);

        Ok(vec![
            Video::new(video_url, format!("{}{}", prefix, quality)).with_headers([("Referer", referer)])
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_pass_md5_path_and_title_quality() {
        let page = r#"<html><head><title>Frieren 01 1080p - DoodStream</title></head>
<script>$.get('/pass_md5/48213-91-55-1697-abc/kq0r7x3', function(data){ dsplayer.src(data) });</script></html>"#;
        assert_eq!(pass_md5_path(page), Some("48213-91-55-1697-abc/kq0r7x3"));
        assert_eq!(title_quality(page).as_deref(), Some("1080p"));
        assert_eq!(pass_md5_path("<p>Not Found</p>"), None);
        assert_eq!(title_quality("<title>video</title>"), None);
    }

    #[test]
    fn random_suffix_is_alphanumeric() {
        let suffix = random_suffix(10);
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
