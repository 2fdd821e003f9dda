use mockito::Matcher;
use serde_json::json;
use sourcekit::config::{HttpConfig, SiteConfig};
use sourcekit::extractors::gogocdn::encrypt;
use sourcekit::extractors::{DoodExtractor, GogoCdnExtractor};
use sourcekit::traits::{Extractor, ExtractorOptions};
use sourcekit::utils::HttpClient;

const SECRET_KEY: &[u8] = b"37911490979715163134003223491201";
const DECRYPTION_KEY: &[u8] = b"54674138327930866480207815084989";
const IV: &[u8] = b"3134003223491201";
const EPISODE_ID: &str = "MjIzNDU=";

const MASTER: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1920x1080
ep.1.1080.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=900000,RESOLUTION=854x480
ep.1.480.m3u8
";

fn client() -> HttpClient {
    HttpClient::new(&HttpConfig::default(), &SiteConfig::default()).unwrap()
}

fn embed_page() -> String {
    let data_value = encrypt(&format!("{}&token=abc&expires=1700000000", EPISODE_ID), SECRET_KEY, IV).unwrap();
    format!(
        r#"<html><body class="container-{secret}">
<div class="wrapper container-{iv}">
<div class="videocontent videocontent-{decryption}"></div></div>
<script type="text/javascript" data-name="episode" data-value="{data_value}"></script>
</body></html>"#,
        secret = std::str::from_utf8(SECRET_KEY).unwrap(),
        iv = std::str::from_utf8(IV).unwrap(),
        decryption = std::str::from_utf8(DECRYPTION_KEY).unwrap(),
        data_value = data_value,
    )
}

async fn mock_gogocdn(server: &mut mockito::Server, sources: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", "/streaming.php")
        .match_query(Matcher::UrlEncoded("id".into(), EPISODE_ID.into()))
        .with_body(embed_page())
        .create_async()
        .await;

    let encrypted_id = encrypt(EPISODE_ID, SECRET_KEY, IV).unwrap();
    let payload = encrypt(&json!({ "source": sources }).to_string(), DECRYPTION_KEY, IV).unwrap();
    server
        .mock("GET", "/encrypt-ajax.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), encrypted_id),
            Matcher::UrlEncoded("token".into(), "abc".into()),
            Matcher::UrlEncoded("expires".into(), "1700000000".into()),
            Matcher::UrlEncoded("alias".into(), EPISODE_ID.into()),
        ]))
        .match_header("x-requested-with", "XMLHttpRequest")
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": payload }).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn gogocdn_single_hls_source_is_split_into_variants() {
    let mut server = mockito::Server::new_async().await;
    let playlist_url = format!("{}/hls/ep.1.m3u8", server.url());
    let ajax = mock_gogocdn(&mut server, json!([{ "file": playlist_url, "label": "hls P", "type": "hls" }])).await;
    server
        .mock("GET", "/hls/ep.1.m3u8")
        .with_body(MASTER)
        .create_async()
        .await;

    let embed_url = format!("{}/streaming.php?id=MjIzNDU%3D&token=xyz", server.url());
    let videos = GogoCdnExtractor::new(client())
        .videos_from_url(&embed_url, &ExtractorOptions::default())
        .await
        .unwrap();

    ajax.assert_async().await;
    let labels: Vec<&str> = videos.iter().map(|v| v.quality.as_str()).collect();
    assert_eq!(labels, vec!["Gogostream - 1080p", "Gogostream - 480p"]);
    assert_eq!(videos[0].url, format!("{}/hls/ep.1.1080.m3u8", server.url()));
    assert_eq!(
        videos[0].headers.as_ref().unwrap().get("Referer"),
        Some(&embed_url)
    );
}

#[tokio::test]
async fn gogocdn_direct_sources_keep_their_labels() {
    let mut server = mockito::Server::new_async().await;
    mock_gogocdn(
        &mut server,
        json!([
            { "file": "https://cdn.example/360.mp4", "label": "360 P", "type": "mp4" },
            { "file": "https://cdn.example/720.mp4", "label": "720 P", "type": "mp4" }
        ]),
    )
    .await;

    let videos = GogoCdnExtractor::new(client())
        .videos_from_url(
            &format!("{}/streaming.php?id=MjIzNDU%3D&title=Frieren", server.url()),
            &ExtractorOptions::default(),
        )
        .await
        .unwrap();

    let labels: Vec<&str> = videos.iter().map(|v| v.quality.as_str()).collect();
    assert_eq!(labels, vec!["Vidstreaming - 360 P", "Vidstreaming - 720 P"]);
    assert_eq!(videos[1].url, "https://cdn.example/720.mp4");
}

#[tokio::test]
async fn dood_builds_a_tokened_stream_url() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/e/xyz")
        .with_body(
            r#"<html><head><title>Frieren 01 720p - DoodStream</title></head>
<script>$.get('/pass_md5/48213-91-55-1697-abc/tok987', function(data){ dsplayer.src(data) });</script></html>"#,
        )
        .create_async()
        .await;
    let pass = server
        .mock("GET", "/pass_md5/48213-91-55-1697-abc/tok987")
        .match_header("referer", format!("{}/e/xyz", server.url()).as_str())
        .with_body("https://cdn.example/stream/abc~")
        .create_async()
        .await;

    let videos = DoodExtractor::new(client())
        .videos_from_url(&format!("{}/e/xyz", server.url()), &ExtractorOptions::default())
        .await
        .unwrap();

    pass.assert_async().await;
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].quality, "Doodstream - 720p");

    let rest = videos[0].url.strip_prefix("https://cdn.example/stream/abc~").unwrap();
    let (suffix, query) = rest.split_once('?').unwrap();
    assert_eq!(suffix.len(), 10);
    assert!(query.starts_with("token=tok987&expiry="));
    assert_eq!(
        videos[0].headers.as_ref().unwrap().get("Referer"),
        Some(&format!("{}/", server.url()))
    );
}

#[tokio::test]
async fn dood_without_pass_md5_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/e/gone")
        .with_body("<title>Video not found</title>")
        .create_async()
        .await;

    let result = DoodExtractor::new(client())
        .videos_from_url(&format!("{}/e/gone", server.url()), &ExtractorOptions::default())
        .await;
    assert!(matches!(result, Err(sourcekit::SourceError::NotFound(_))));
}
