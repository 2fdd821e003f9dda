use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Ongoing,
    Completed,
    Licensed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Anime {
    /// Opaque token the owning source re-parses; usually a path without the domain.
    pub url: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Manga {
    pub url: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub url: String,
    pub name: String,
    pub episode_number: f32,
    pub date_upload: Option<DateTime<Utc>>,
    pub scanlator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub url: String,
    pub name: String,
    pub chapter_number: f32,
    pub date_upload: Option<DateTime<Utc>>,
    pub scanlator: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub url: String,
    pub lang: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub url: String,
    pub quality: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitle_tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub url: String,
    pub image_url: Option<String>,
}

/// One page of listing results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaPage<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
}

pub type AnimesPage = MediaPage<Anime>;
pub type MangasPage = MediaPage<Manga>;

impl<T> MediaPage<T> {
    pub fn new(items: Vec<T>, has_next_page: bool) -> Self {
        Self { items, has_next_page }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_next_page: false,
        }
    }
}

impl Anime {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Manga {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Episode {
    pub fn new(url: impl Into<String>, name: impl Into<String>, episode_number: f32) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            episode_number,
            date_upload: None,
            scanlator: None,
        }
    }
}

impl Chapter {
    pub fn new(url: impl Into<String>, name: impl Into<String>, chapter_number: f32) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            chapter_number,
            date_upload: None,
            scanlator: None,
        }
    }
}

impl Track {
    pub fn new(url: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lang: lang.into(),
        }
    }
}

impl Video {
    pub fn new(url: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quality: quality.into(),
            ..Default::default()
        }
    }

    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = self.headers.get_or_insert_with(BTreeMap::new);
        for (key, value) in headers {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_subtitles(mut self, tracks: Vec<Track>) -> Self {
        self.subtitle_tracks = tracks;
        self
    }

    pub fn with_audio(mut self, tracks: Vec<Track>) -> Self {
        self.audio_tracks = tracks;
        self
    }
}

impl Page {
    pub fn new(index: usize, image_url: impl Into<String>) -> Self {
        Self {
            index,
            url: String::new(),
            image_url: Some(image_url.into()),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unknown => write!(f, "Unknown"),
            Status::Ongoing => write!(f, "Ongoing"),
            Status::Completed => write!(f, "Completed"),
            Status::Licensed => write!(f, "Licensed"),
        }
    }
}

/// Formats an episode or chapter number without a trailing `.0`.
pub fn format_number(number: f32) -> String {
    if number.fract() == 0.0 {
        format!("{}", number as i64)
    } else {
        format!("{}", number)
    }
}
