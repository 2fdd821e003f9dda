use crate::config::Config;
use crate::error::{Result, SourceError};
use crate::preferences::PreferenceStore;
use crate::sources::{AllMovies, GogoAnime, MangaPark, MundoDonghua, NetFilm};
use crate::traits::{AnimeSource, MangaSource, SourceInfo};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Anime,
    Manga,
}

/// One row of `sourcekit sources`.
#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry {
    pub key: String,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub info: SourceInfo,
}

/// Registry for the built-in sources, keyed by the name used on the command
/// line and in `[sites.<key>]`.
pub struct SourceRegistry {
    anime: HashMap<String, Box<dyn AnimeSource>>,
    manga: HashMap<String, Box<dyn MangaSource>>,
    preferences: Arc<PreferenceStore>,
}

impl SourceRegistry {
    pub fn new(config: &Config, preferences: Arc<PreferenceStore>) -> Result<Self> {
        let mut registry = Self {
            anime: HashMap::new(),
            manga: HashMap::new(),
            preferences,
        };

        let prefs = |key: &str| registry.preferences.for_source(key);
        let allmovies = AllMovies::new(config, prefs("allmovies"))?;
        let gogoanime = GogoAnime::new(config, prefs("gogoanime"))?;
        let mundodonghua = MundoDonghua::new(config, prefs("mundodonghua"))?;
        let netfilm = NetFilm::new(config, prefs("netfilm"))?;
        let mangapark = MangaPark::new(config, prefs("mangapark"))?;

        registry.register_anime("allmovies", Box::new(allmovies));
        registry.register_anime("gogoanime", Box::new(gogoanime));
        registry.register_anime("mundodonghua", Box::new(mundodonghua));
        registry.register_anime("netfilm", Box::new(netfilm));
        registry.register_manga("mangapark", Box::new(mangapark));

        Ok(registry)
    }

    pub fn register_anime(&mut self, key: &str, source: Box<dyn AnimeSource>) {
        debug!("Registered anime source {}", key);
        self.anime.insert(key.to_string(), source);
    }

    pub fn register_manga(&mut self, key: &str, source: Box<dyn MangaSource>) {
        debug!("Registered manga source {}", key);
        self.manga.insert(key.to_string(), source);
    }

    pub fn kind_of(&self, key: &str) -> Option<SourceKind> {
        if self.anime.contains_key(key) {
            Some(SourceKind::Anime)
        } else if self.manga.contains_key(key) {
            Some(SourceKind::Manga)
        } else {
            None
        }
    }

    /// Anime source by key. A manga key gives `Unsupported`, anything else
    /// `UnknownSource`.
    pub fn get_anime(&self, key: &str) -> Result<&dyn AnimeSource> {
        match self.anime.get(key) {
            Some(source) => Ok(source.as_ref()),
            None if self.manga.contains_key(key) => {
                Err(SourceError::unsupported(format!("{} is a manga source", key)))
            }
            None => Err(SourceError::unknown_source(key)),
        }
    }

    pub fn get_manga(&self, key: &str) -> Result<&dyn MangaSource> {
        match self.manga.get(key) {
            Some(source) => Ok(source.as_ref()),
            None if self.anime.contains_key(key) => {
                Err(SourceError::unsupported(format!("{} is an anime source", key)))
            }
            None => Err(SourceError::unknown_source(key)),
        }
    }

    pub fn preferences(&self) -> &Arc<PreferenceStore> {
        &self.preferences
    }

    /// Every source sorted by key.
    pub fn list(&self) -> Vec<SourceEntry> {
        let mut entries: Vec<SourceEntry> = self
            .anime
            .iter()
            .map(|(key, source)| SourceEntry {
                key: key.clone(),
                kind: SourceKind::Anime,
                info: source.info(),
            })
            .chain(self.manga.iter().map(|(key, source)| SourceEntry {
                key: key.clone(),
                kind: SourceKind::Manga,
                info: source.info(),
            }))
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }
}
