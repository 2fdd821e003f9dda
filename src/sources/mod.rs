pub mod allmovies;
pub mod gogoanime;
pub mod mangapark;
pub mod mundodonghua;
pub mod netfilm;

pub use allmovies::AllMovies;
pub use gogoanime::GogoAnime;
pub use mangapark::MangaPark;
pub use mundodonghua::MundoDonghua;
pub use netfilm::NetFilm;

use crate::config::{Config, SiteConfig};
use crate::error::Result;
use crate::utils::HttpClient;

/// Client and base URL for a source, honouring `[sites.<key>]` overrides.
pub(crate) fn site_client(config: &Config, key: &str, default_base_url: &str) -> Result<(HttpClient, String, SiteConfig)> {
    let site = config.get_site_config(key);
    let client = HttpClient::new(&config.http, &site)?;
    let base_url = site
        .base_url
        .clone()
        .unwrap_or_else(|| default_base_url.to_string())
        .trim_end_matches('/')
        .to_string();
    Ok((client, base_url, site))
}
