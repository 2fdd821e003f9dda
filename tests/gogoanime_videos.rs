use sourcekit::config::{Config, SiteConfig};
use sourcekit::models::Episode;
use sourcekit::preferences::SourcePreferences;
use sourcekit::sources::GogoAnime;
use sourcekit::traits::AnimeSource;
use sourcekit::SourceError;

const MASTER: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1920x1080
1080/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=900000,RESOLUTION=854x480
480/index.m3u8
";

fn source_for(server: &mockito::Server) -> GogoAnime {
    let mut config = Config::default();
    config.sites.insert(
        "gogoanime".to_string(),
        SiteConfig {
            base_url: Some(server.url()),
            api_url: Some(server.url()),
            ..Default::default()
        },
    );
    GogoAnime::new(&config, SourcePreferences::detached("gogoanime")).unwrap()
}

fn episode_page(server: &mockito::Server) -> String {
    format!(
        r#"<html><body><div class="anime_muti_link"><ul>
<li class="anime"><a data-video="{url}/streaming.php?id=1">Vidstreaming</a></li>
<li class="filelions"><a data-video="{url}/e/fl">FileLions</a></li>
<li class="streamwish"><a data-video="{url}/e/sw">StreamWish</a></li>
<li class="mp4upload"><a data-video="{url}/embed-m.html">Mp4upload</a></li>
</ul></div></body></html>"#,
        url = server.url()
    )
}

#[tokio::test]
async fn failing_mirrors_are_dropped_and_the_rest_sorted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/frieren-episode-1")
        .with_body(episode_page(&server))
        .create_async()
        .await;
    let filelions = server
        .mock("GET", "/e/fl")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/e/sw")
        .with_body(format!(
            r#"<script>jwplayer("vplayer").setup({{sources:[{{file:"{}/hls/master.m3u8"}}]}});</script>"#,
            server.url()
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/hls/master.m3u8")
        .with_body(MASTER)
        .create_async()
        .await;
    server
        .mock("GET", "/embed-m.html")
        .with_body(format!(
            r#"<script>player.src("{}/d/video.mp4"); var meta = "WIDTH=1280,HEIGHT=720";</script>"#,
            server.url()
        ))
        .create_async()
        .await;

    let gogoanime = source_for(&server);
    let videos = gogoanime
        .videos(&Episode::new("/frieren-episode-1", "Episode 1", 1.0))
        .await
        .unwrap();

    filelions.assert_async().await;
    let labels: Vec<&str> = videos.iter().map(|v| v.quality.as_str()).collect();
    assert_eq!(
        labels,
        vec!["StreamWish - 1080p", "Mp4Upload - 720p", "StreamWish - 480p"]
    );
    assert_eq!(videos[1].url, format!("{}/d/video.mp4", server.url()));
}

#[tokio::test]
async fn no_working_mirror_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/frieren-episode-1")
        .with_body(episode_page(&server))
        .create_async()
        .await;
    for path in ["/e/fl", "/e/sw", "/embed-m.html"] {
        server.mock("GET", path).with_status(500).create_async().await;
    }

    let result = source_for(&server)
        .videos(&Episode::new("/frieren-episode-1", "Episode 1", 1.0))
        .await;
    assert!(matches!(result, Err(SourceError::NotFound(_))));
}
