use crate::error::{Result, SourceError};
use crate::extractors::unpacker;
use crate::models::Video;
use crate::traits::{Extractor, ExtractorOptions};
use crate::utils::HttpClient;
use once_cell::sync::Lazy;
use regex::Regex;

const REFERER: &str = "https://www.mp4upload.com/";

static HEIGHT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\WHEIGHT=(\d+)").unwrap());

pub struct Mp4uploadExtractor {
    client: HttpClient,
}

impl Mp4uploadExtractor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// `(video url, quality)` from the embed page's `player.src(...)` call.
pub fn source_from_page(page: &str) -> Option<(String, String)> {
    let script = if unpacker::is_packed(page) {
        unpacker::unpack_all(page)
            .into_iter()
            .find(|s| s.contains("player.src"))?
    } else {
        page.to_string()
    };
    let url = unpacker::extract_source_url(&script)?;
    let quality = HEIGHT_REGEX
        .captures(&script)
        .and_then(|c| c.get(1))
        .map(|h| format!("{}p", h.as_str()))
        .unwrap_or_else(|| "Unknown resolution".to_string());
    Some((url, quality))
}

#[async_trait::async_trait]
impl Extractor for Mp4uploadExtractor {
    async fn videos_from_url(&self, url: &str, options: &ExtractorOptions) -> Result<Vec<Video>> {
        let referer = options.referer.as_deref().unwrap_or(REFERER);
        let page = self.client.get_with_headers(url, &[("Referer", referer)]).await?;
        let (video_url, quality) = source_from_page(&page)
            .ok_or_else(|| SourceError::not_found(format!("Mp4upload source in {}", url)))?;

        let prefix = options.prefix.as_deref().unwrap_or("Mp4Upload - ");
        Ok(vec![
            Video::new(video_url, format!("{}{}", prefix, quality)).with_headers([("Referer", REFERER)])
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_source_and_height_from_packed_player() {
        let page = r#"<script>eval(function(p,a,c,k,e,d){while(c--)if(k[c])p=p.replace(new RegExp('\\b'+c.toString(a)+'\\b','g'),k[c]);return p}('0.1({2:"3",1:"4"});5.6="7"',10,8,'player|src|type|video/mp4|https://a4.mp4upload.com:183/d/xyz/video.mp4|meta|tag|WIDTH=1280,HEIGHT=720'.split('|')))</script>"#;
        let (url, quality) = source_from_page(page).unwrap();
        assert_eq!(url, "https://a4.mp4upload.com:183/d/xyz/video.mp4");
        assert_eq!(quality, "720p");
    }

    #[test]
    fn missing_height_is_unknown() {
        let page = r#"player.src("https://a4.mp4upload.com/d/v.mp4");"#;
        assert_eq!(
            source_from_page(page),
            Some(("https://a4.mp4upload.com/d/v.mp4".to_string(), "Unknown resolution".to_string()))
        );
        assert_eq!(source_from_page("<html></html>"), None);
    }
}
