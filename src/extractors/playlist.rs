use crate::error::Result;
use crate::models::{Track, Video};
use crate::utils::HttpClient;
use tracing::debug;
use url::Url;

const STREAM_INF: &str = "#EXT-X-STREAM-INF:";
const MEDIA: &str = "#EXT-X-MEDIA:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub uri: String,
    pub height: Option<u32>,
    pub average_bandwidth: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
    pub audio_tracks: Vec<Track>,
}

/// Splits an HLS attribute list on commas outside quoted strings.
pub fn parse_attributes(list: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in list.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                push_attribute(&mut attributes, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_attribute(&mut attributes, &current);
    attributes
}

fn push_attribute(attributes: &mut Vec<(String, String)>, raw: &str) {
    if let Some((key, value)) = raw.split_once('=') {
        attributes.push((
            key.trim().to_uppercase(),
            value.trim().trim_matches('"').to_string(),
        ));
    }
}

fn attribute<'a>(attributes: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn resolve(playlist_url: &str, uri: &str) -> Result<String> {
    Ok(Url::parse(playlist_url)?.join(uri)?.to_string())
}

/// Parses a master playlist body fetched from `playlist_url`.
pub fn parse_master(body: &str, playlist_url: &str) -> Result<MasterPlaylist> {
    let mut playlist = MasterPlaylist::default();

    for line in body.lines().map(str::trim) {
        let Some(list) = line.strip_prefix(MEDIA) else {
            continue;
        };
        let attributes = parse_attributes(list);
        if attribute(&attributes, "TYPE") != Some("AUDIO") {
            continue;
        }
        if let Some(uri) = attribute(&attributes, "URI") {
            let lang = attribute(&attributes, "NAME")
                .or_else(|| attribute(&attributes, "LANGUAGE"))
                .unwrap_or("Audio");
            playlist.audio_tracks.push(Track::new(resolve(playlist_url, uri)?, lang));
        }
    }

    for chunk in body.split(STREAM_INF).skip(1) {
        let mut lines = chunk.lines();
        let attributes = parse_attributes(lines.next().unwrap_or_default());
        let Some(uri) = lines
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
        else {
            debug!("Variant without URI in {}", playlist_url);
            continue;
        };

        let height = attribute(&attributes, "RESOLUTION")
            .and_then(|r| r.split_once('x'))
            .and_then(|(_, h)| h.parse().ok());
        let average_bandwidth =
            attribute(&attributes, "AVERAGE-BANDWIDTH").and_then(|b| b.parse().ok());

        playlist.variants.push(Variant {
            uri: resolve(playlist_url, uri)?,
            height,
            average_bandwidth,
        });
    }

    Ok(playlist)
}

/// Bits per second on a 1000-based scale, truncated: `2 mb/s`.
pub fn human_bandwidth(bits: u64) -> String {
    const UNITS: [&str; 5] = ["b/s", "kb/s", "mb/s", "gb/s", "tb/s"];
    let mut value = bits;
    let mut unit = 0;
    while value >= 1000 && unit < UNITS.len() - 1 {
        value /= 1000;
        unit += 1;
    }
    format!("{} {}", value, UNITS[unit])
}

impl Variant {
    /// `1080p`, `1080p 2 mb/s` or `1080p 2 mb/s (server)`.
    pub fn label(&self, server: Option<&str>) -> String {
        let mut label = match self.height {
            Some(height) => format!("{}p", height),
            None => "Unknown".to_string(),
        };
        if let Some(bandwidth) = self.average_bandwidth {
            label.push(' ');
            label.push_str(&human_bandwidth(bandwidth));
        }
        if let Some(server) = server {
            label.push_str(&format!(" ({})", server));
        }
        label
    }
}

/// One video per variant in manifest order, each carrying the audio tracks.
/// A media playlist yields the playlist itself.
pub fn videos_from_master(
    body: &str,
    playlist_url: &str,
    prefix: &str,
    server: Option<&str>,
) -> Result<Vec<Video>> {
    let playlist = parse_master(body, playlist_url)?;
    if !body.contains(STREAM_INF) {
        return Ok(vec![Video::new(playlist_url, format!("{}Default", prefix))]);
    }
    Ok(playlist
        .variants
        .iter()
        .map(|variant| {
            Video::new(variant.uri.clone(), format!("{}{}", prefix, variant.label(server)))
                .with_audio(playlist.audio_tracks.clone())
        })
        .collect())
}

/// Fetches a master playlist and splits it; request headers are carried on
/// every resulting video.
pub async fn fetch_videos(
    client: &HttpClient,
    playlist_url: &str,
    headers: &[(&str, &str)],
    prefix: &str,
) -> Result<Vec<Video>> {
    let body = client.get_with_headers(playlist_url, headers).await?;
    let videos = videos_from_master(&body, playlist_url, prefix, None)?;
    Ok(videos
        .into_iter()
        .map(|video| {
            if headers.is_empty() {
                video
            } else {
                video.with_headers(headers.iter().copied())
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aud\",NAME=\"English\",LANGUAGE=\"en\",URI=\"audio/en.m3u8\"
#EXT-X-STREAM-INF:BANDWIDTH=2500000,AVERAGE-BANDWIDTH=2100000,RESOLUTION=1920x1080,CODECS=\"avc1.640028,mp4a.40.2\",AUDIO=\"aud\"
hd/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=1280x720,CODECS=\"avc1.4d401f,mp4a.40.2\"

# comment between tag and uri
https://other.example/720/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=1280x720
hd/index.m3u8
";

    #[test]
    fn variants_keep_manifest_order_and_heights() {
        let videos = videos_from_master(MASTER, "https://cdn.example/v/master.m3u8", "", None).unwrap();
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].quality, "1080p 2 mb/s");
        assert_eq!(videos[0].url, "https://cdn.example/v/hd/index.m3u8");
        assert_eq!(videos[1].quality, "720p");
        assert_eq!(videos[1].url, "https://other.example/720/index.m3u8");
        assert_eq!(videos[2].url, videos[0].url);
        assert_eq!(videos[0].audio_tracks, vec![Track::new("https://cdn.example/v/audio/en.m3u8", "English")]);
    }

    #[test]
    fn quoted_commas_do_not_split_attributes() {
        let attributes = parse_attributes("CODECS=\"avc1,mp4a\",RESOLUTION=640x360");
        assert_eq!(attribute(&attributes, "CODECS"), Some("avc1,mp4a"));
        assert_eq!(attribute(&attributes, "RESOLUTION"), Some("640x360"));
    }

    #[test]
    fn labels_carry_prefix_and_server() {
        let videos = videos_from_master(MASTER, "https://cdn.example/v/master.m3u8", "StreamWish - ", Some("Luf-mp4"))
            .unwrap();
        assert_eq!(videos[1].quality, "StreamWish - 720p (Luf-mp4)");
    }

    #[test]
    fn media_playlist_is_returned_whole() {
        let body = "#EXTM3U\n#EXTINF:10,\nseg0.ts\n";
        let videos = videos_from_master(body, "https://cdn.example/index.m3u8", "", None).unwrap();
        assert_eq!(videos, vec![Video::new("https://cdn.example/index.m3u8", "Default")]);
    }

    #[test]
    fn bandwidth_scale_truncates() {
        assert_eq!(human_bandwidth(999), "999 b/s");
        assert_eq!(human_bandwidth(1_999), "1 kb/s");
        assert_eq!(human_bandwidth(2_100_000), "2 mb/s");
        assert_eq!(human_bandwidth(3_000_000_000), "3 gb/s");
    }
}
