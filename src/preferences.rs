use crate::error::{Result, SourceError};
use crate::models::Video;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PrefValue {
    Text(String),
    Set(Vec<String>),
}

type Sections = BTreeMap<String, BTreeMap<String, PrefValue>>;

/// Key-value settings for every source, one TOML table per source key.
#[derive(Debug)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    sections: RwLock<Sections>,
}

impl PreferenceStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            sections: RwLock::new(Sections::new()),
        }
    }

    /// Opens the store at `path`; a missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sections = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Sections::new()
        };
        debug!("Loaded preferences from {}", path.display());
        Ok(Self {
            path: Some(path),
            sections: RwLock::new(sections),
        })
    }

    pub fn get(&self, source: &str, key: &str) -> Option<PrefValue> {
        let sections = self.sections.read().unwrap_or_else(|e| e.into_inner());
        sections.get(source).and_then(|s| s.get(key)).cloned()
    }

    /// Stores the value and writes the file through, when file-backed.
    pub fn set(&self, source: &str, key: &str, value: PrefValue) -> Result<()> {
        {
            let mut sections = self.sections.write().unwrap_or_else(|e| e.into_inner());
            sections
                .entry(source.to_string())
                .or_default()
                .insert(key.to_string(), value);
        }
        self.save()
    }

    pub fn entries(&self, source: &str) -> BTreeMap<String, PrefValue> {
        let sections = self.sections.read().unwrap_or_else(|e| e.into_inner());
        sections.get(source).cloned().unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = {
            let sections = self.sections.read().unwrap_or_else(|e| e.into_inner());
            toml::to_string_pretty(&*sections)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn for_source(self: &Arc<Self>, source: &str) -> SourcePreferences {
        SourcePreferences {
            store: Arc::clone(self),
            source: source.to_string(),
        }
    }
}

/// One source's view of the shared store.
#[derive(Debug, Clone)]
pub struct SourcePreferences {
    store: Arc<PreferenceStore>,
    source: String,
}

impl SourcePreferences {
    pub fn detached(source: &str) -> Self {
        Arc::new(PreferenceStore::in_memory()).for_source(source)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.store.get(&self.source, key) {
            Some(PrefValue::Text(value)) => value,
            _ => default.to_string(),
        }
    }

    pub fn get_string_set(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.store.get(&self.source, key) {
            Some(PrefValue::Set(values)) => values,
            _ => default.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.store.set(&self.source, key, PrefValue::Text(value.to_string()))
    }

    pub fn put_string_set(&self, key: &str, values: Vec<String>) -> Result<()> {
        self.store.set(&self.source, key, PrefValue::Set(values))
    }

    pub fn entries(&self) -> BTreeMap<String, PrefValue> {
        self.store.entries(&self.source)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListPreference {
    pub key: String,
    pub title: String,
    pub entries: Vec<String>,
    pub entry_values: Vec<String>,
    pub default: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MultiSelectPreference {
    pub key: String,
    pub title: String,
    pub entries: Vec<String>,
    pub entry_values: Vec<String>,
    pub default: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditTextPreference {
    pub key: String,
    pub title: String,
    pub summary: String,
    pub default: String,
}

/// One settings control offered by a source.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Preference {
    List(ListPreference),
    MultiSelect(MultiSelectPreference),
    EditText(EditTextPreference),
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Preference {
    pub fn list(key: &str, title: &str, entries: &[&str], entry_values: &[&str], default: &str) -> Self {
        Preference::List(ListPreference {
            key: key.to_string(),
            title: title.to_string(),
            entries: strings(entries),
            entry_values: strings(entry_values),
            default: default.to_string(),
        })
    }

    pub fn multi_select(
        key: &str,
        title: &str,
        entries: &[&str],
        entry_values: &[&str],
        default: &[&str],
    ) -> Self {
        Preference::MultiSelect(MultiSelectPreference {
            key: key.to_string(),
            title: title.to_string(),
            entries: strings(entries),
            entry_values: strings(entry_values),
            default: strings(default),
        })
    }

    pub fn edit_text(key: &str, title: &str, summary: &str, default: &str) -> Self {
        Preference::EditText(EditTextPreference {
            key: key.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            default: default.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        match self {
            Preference::List(p) => &p.key,
            Preference::MultiSelect(p) => &p.key,
            Preference::EditText(p) => &p.key,
        }
    }

    /// Parses raw input into a storable value. Lists accept an entry value or
    /// its display entry; multi-selects take a comma-separated list.
    pub fn parse_value(&self, raw: &str) -> Result<PrefValue> {
        let raw = raw.trim();
        match self {
            Preference::List(p) => {
                let index = p
                    .entry_values
                    .iter()
                    .position(|v| v == raw)
                    .or_else(|| p.entries.iter().position(|e| e.eq_ignore_ascii_case(raw)))
                    .ok_or_else(|| {
                        SourceError::invalid_preference(format!(
                            "'{}' is not one of {:?} for {}",
                            raw, p.entry_values, p.key
                        ))
                    })?;
                Ok(PrefValue::Text(p.entry_values[index].clone()))
            }
            Preference::MultiSelect(p) => {
                let mut values = Vec::new();
                for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if !p.entry_values.iter().any(|v| v == item) {
                        return Err(SourceError::invalid_preference(format!(
                            "'{}' is not one of {:?} for {}",
                            item, p.entry_values, p.key
                        )));
                    }
                    if !values.iter().any(|v| v == item) {
                        values.push(item.to_string());
                    }
                }
                Ok(PrefValue::Set(values))
            }
            Preference::EditText(_) => Ok(PrefValue::Text(raw.to_string())),
        }
    }
}

/// Applies a `key=value` argument against a source's preference screen.
pub fn apply_preference(screen: &[Preference], prefs: &SourcePreferences, arg: &str) -> Result<()> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| SourceError::invalid_preference(format!("expected key=value, got '{}'", arg)))?;
    let preference = screen
        .iter()
        .find(|p| p.key() == key.trim())
        .ok_or_else(|| SourceError::invalid_preference(format!("unknown preference '{}'", key.trim())))?;
    match preference.parse_value(raw)? {
        PrefValue::Text(value) => prefs.put_string(preference.key(), &value),
        PrefValue::Set(values) => prefs.put_string_set(preference.key(), values),
    }
}

static RESOLUTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)p").unwrap());

fn resolution_of(label: &str) -> u32 {
    RESOLUTION_REGEX
        .captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Orders videos best-first: preferred quality, then resolution, then
/// preferred server. The server is matched ignoring case. Equal keys keep
/// their extraction order.
pub fn sort_videos(mut videos: Vec<Video>, quality: &str, server: &str) -> Vec<Video> {
    let server = server.to_lowercase();
    videos.sort_by_cached_key(|video| {
        std::cmp::Reverse((
            video.quality.contains(quality),
            resolution_of(&video.quality),
            !server.is_empty() && video.quality.to_lowercase().contains(&server),
        ))
    });
    videos
}

/// Moves videos whose label contains `quality` to the front, keeping the
/// relative order of both groups.
pub fn prefer_quality(mut videos: Vec<Video>, quality: &str) -> Vec<Video> {
    videos.sort_by_key(|video| !video.quality.contains(quality));
    videos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_quality_comes_first_then_resolution() {
        let videos = vec![
            Video::new("a", "Vidstreaming - 480p"),
            Video::new("b", "StreamWish - 1080p"),
            Video::new("c", "Vidstreaming - 720p"),
            Video::new("d", "Mp4Upload - 720p"),
        ];
        let sorted = sort_videos(videos, "720", "Mp4Upload");
        let urls: Vec<&str> = sorted.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn server_preference_ignores_case() {
        let videos = vec![
            Video::new("sw", "StreamWish - 720p"),
            Video::new("mp4", "Mp4Upload - 720p"),
        ];
        let sorted = sort_videos(videos, "1080", "Mp4upload");
        let urls: Vec<&str> = sorted.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["mp4", "sw"]);
    }

    #[test]
    fn equal_keys_keep_extraction_order() {
        let videos = vec![
            Video::new("first", "720p"),
            Video::new("second", "720p"),
            Video::new("third", "720p"),
        ];
        let sorted = sort_videos(videos, "1080", "");
        let urls: Vec<&str> = sorted.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["first", "second", "third"]);
    }

    #[test]
    fn prefer_quality_only_moves_matches_forward() {
        let videos = vec![
            Video::new("a", "1080p"),
            Video::new("b", "720p"),
            Video::new("c", "480p"),
            Video::new("d", "720p 2 mb/s"),
        ];
        let urls: Vec<String> = prefer_quality(videos, "720").into_iter().map(|v| v.url).collect();
        assert_eq!(urls, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn list_preference_accepts_value_or_entry() {
        let pref = Preference::list(
            "preferred_quality",
            "Preferred quality",
            &["1080p", "720p"],
            &["1080", "720"],
            "1080",
        );
        assert_eq!(pref.parse_value("720").unwrap(), PrefValue::Text("720".into()));
        assert_eq!(pref.parse_value("1080P").unwrap(), PrefValue::Text("1080".into()));
        assert!(matches!(
            pref.parse_value("4k"),
            Err(SourceError::InvalidPreference(_))
        ));
    }

    #[test]
    fn multi_select_rejects_unknown_values() {
        let pref = Preference::multi_select("hosts", "Hosts", &["A", "B"], &["a", "b"], &["a", "b"]);
        assert_eq!(
            pref.parse_value("b, a, b").unwrap(),
            PrefValue::Set(vec!["b".into(), "a".into()])
        );
        assert!(pref.parse_value("a,z").is_err());
    }

    #[test]
    fn in_memory_store_scopes_by_source() {
        let store = Arc::new(PreferenceStore::in_memory());
        let gogo = store.for_source("gogoanime");
        let film = store.for_source("netfilm");
        gogo.put_string("preferred_quality", "720").unwrap();

        assert_eq!(gogo.get_string("preferred_quality", "1080"), "720");
        assert_eq!(film.get_string("preferred_quality", "1080"), "1080");
        assert_eq!(gogo.get_string_set("hosts", &["x"]), vec!["x".to_string()]);
    }
}
