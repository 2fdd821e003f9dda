use sourcekit::preferences::{apply_preference, PrefValue, Preference, PreferenceStore};
use std::sync::Arc;

fn screen() -> Vec<Preference> {
    vec![
        Preference::list(
            "preferred_quality",
            "Preferred quality",
            &["1080p", "720p"],
            &["1080", "720"],
            "1080",
        ),
        Preference::multi_select(
            "hoster_selection",
            "Enable/Disable Hosts",
            &["StreamWish", "Mp4upload", "FileLions"],
            &["streamwish", "mp4upload", "filelions"],
            &["streamwish", "mp4upload", "filelions"],
        ),
    ]
}

#[test]
fn values_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.toml");

    {
        let store = Arc::new(PreferenceStore::load(&path).unwrap());
        let prefs = store.for_source("gogoanime");
        apply_preference(&screen(), &prefs, "preferred_quality=720").unwrap();
        apply_preference(&screen(), &prefs, "hoster_selection=streamwish,filelions").unwrap();
    }

    let store = Arc::new(PreferenceStore::load(&path).unwrap());
    let prefs = store.for_source("gogoanime");
    assert_eq!(prefs.get_string("preferred_quality", "1080"), "720");
    assert_eq!(
        prefs.get_string_set("hoster_selection", &[]),
        vec!["streamwish".to_string(), "filelions".to_string()]
    );
    assert!(store.entries("netfilm").is_empty());
}

#[test]
fn values_outside_the_screen_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    let store = Arc::new(PreferenceStore::load(&path).unwrap());
    let prefs = store.for_source("gogoanime");

    assert!(apply_preference(&screen(), &prefs, "preferred_quality=4k").is_err());
    assert!(apply_preference(&screen(), &prefs, "unknown_key=1").is_err());
    assert!(apply_preference(&screen(), &prefs, "no-equals-sign").is_err());
    assert_eq!(store.get("gogoanime", "preferred_quality"), None);
    assert!(!path.exists());
}

#[test]
fn sources_do_not_share_values() {
    let store = Arc::new(PreferenceStore::in_memory());
    store
        .set("allmovies", "preferred_quality", PrefValue::Text("720".into()))
        .unwrap();
    assert_eq!(
        store.for_source("mundodonghua").get_string("preferred_quality", "1080"),
        "1080"
    );
    assert_eq!(
        store.for_source("allmovies").get_string("preferred_quality", "1080"),
        "720"
    );
}
