//! Search controls for `/search`: text, match modes, sort, tri-state genres
//! and the "any"-defaulted selects.

use crate::filters::{
    Filter, FilterList, SelectFilter, SortFilter, TextFilter, TriStateGroup, TriStateStyle,
};
use chrono::{Datelike, Utc};

const MATCH_MODES: &[(&str, &str)] = &[("Contain", "contain"), ("Begin", "begin"), ("End", "end")];

const SORTS: &[(&str, &str)] = &[
    ("A-Z", "a-z"),
    ("Views", "views"),
    ("Rating", "rating"),
    ("Latest", "latest"),
    ("New manga", "add"),
];

const GENRE_MODES: &[(&str, &str)] = &[("And mode", ""), ("Or mode", "or")];

const CHAPTER_COUNTS: &[(&str, &str)] = &[
    ("Any", ""),
    ("1 +", "1"),
    ("5 +", "5"),
    ("10 +", "10"),
    ("20 +", "20"),
    ("30 +", "30"),
    ("40 +", "40"),
    ("50 +", "50"),
    ("100 +", "100"),
    ("150 +", "150"),
    ("200 +", "200"),
];

const STATUSES: &[(&str, &str)] = &[("Any", ""), ("Completed", "completed"), ("Ongoing", "ongoing")];

const RATINGS: &[(&str, &str)] = &[
    ("Any", ""),
    ("5 stars", "5"),
    ("4 stars", "4"),
    ("3 stars", "3"),
    ("2 stars", "2"),
    ("1 star", "1"),
    ("0 stars", "0"),
];

const TYPES: &[(&str, &str)] = &[
    ("Any", ""),
    ("Japanese Manga", "manga"),
    ("Korean Manhwa", "manhwa"),
    ("Chinese Manhua", "manhua"),
    ("Unknown", "unknown"),
];

const FIRST_YEAR: i32 = 1946;

/// `Any` followed by every year from the current one back to 1946.
fn year_filter() -> SelectFilter {
    let years: Vec<String> = (FIRST_YEAR..=Utc::now().year()).rev().map(|y| y.to_string()).collect();
    let mut pairs: Vec<(&str, &str)> = vec![("Any", "")];
    pairs.extend(years.iter().map(|y| (y.as_str(), y.as_str())));
    SelectFilter::new("years", "Release year", "years", &pairs)
}

pub fn filter_list() -> FilterList {
    FilterList::new(vec![
        Filter::Text(TextFilter::new("autart", "Author/Artist", "autart")),
        Filter::Select(SelectFilter::new("name_match", "Title query", "name-match", MATCH_MODES)),
        Filter::Select(SelectFilter::new("autart_match", "Author/Artist query", "autart-match", MATCH_MODES)),
        Filter::Sort(SortFilter::new("sort", "Sort", "orderby", SORTS).with_default(1, false)),
        Filter::TriStateGroup(TriStateGroup::new(
            "genres",
            "Genres",
            "genres",
            "genres-exclude",
            TriStateStyle::Joined,
            GENRES,
        )),
        Filter::Select(SelectFilter::new("genres_mode", "Genre inclusion", "genres-mode", GENRE_MODES)),
        Filter::Select(SelectFilter::new("chapters", "Chapter count", "chapters", CHAPTER_COUNTS)),
        Filter::Select(SelectFilter::new("status", "Status", "status", STATUSES)),
        Filter::Select(SelectFilter::new("rating", "Rating", "rating", RATINGS)),
        Filter::Select(SelectFilter::new("types", "Type", "types", TYPES)),
        Filter::Select(year_filter()),
    ])
}

const GENRES: &[(&str, &str)] = &[
    ("4 koma", "4-koma"),
    ("Action", "action"),
    ("Adaptation", "adaptation"),
    ("Adult", "adult"),
    ("Adventure", "adventure"),
    ("Aliens", "aliens"),
    ("Animals", "animals"),
    ("Anthology", "anthology"),
    ("Award winning", "award-winning"),
    ("Comedy", "comedy"),
    ("Cooking", "cooking"),
    ("Crime", "crime"),
    ("Crossdressing", "crossdressing"),
    ("Delinquents", "delinquents"),
    ("Demons", "demons"),
    ("Doujinshi", "doujinshi"),
    ("Drama", "drama"),
    ("Ecchi", "ecchi"),
    ("Fantasy", "fantasy"),
    ("Full color", "full-color"),
    ("Game", "game"),
    ("Gender bender", "gender-bender"),
    ("Genderswap", "genderswap"),
    ("Ghosts", "ghosts"),
    ("Gore", "gore"),
    ("Gossip", "gossip"),
    ("Gyaru", "gyaru"),
    ("Harem", "harem"),
    ("Historical", "historical"),
    ("Horror", "horror"),
    ("Incest", "incest"),
    ("Isekai", "isekai"),
    ("Josei", "josei"),
    ("Kids", "kids"),
    ("Loli", "loli"),
    ("Lolicon", "lolicon"),
    ("Long strip", "long-strip"),
    ("Magic", "magic"),
    ("Magical girls", "magical-girls"),
    ("Manhwa", "manhwa"),
    ("Martial arts", "martial-arts"),
    ("Mature", "mature"),
    ("Mecha", "mecha"),
    ("Medical", "medical"),
    ("Military", "military"),
    ("Monster girls", "monster-girls"),
    ("Monsters", "monsters"),
    ("Music", "music"),
    ("Mystery", "mystery"),
    ("Office workers", "office-workers"),
    ("Official colored", "official-colored"),
    ("One shot", "one-shot"),
    ("Parody", "parody"),
    ("Philosophical", "philosophical"),
    ("Police", "police"),
    ("Post apocalyptic", "post-apocalyptic"),
    ("Psychological", "psychological"),
    ("Reincarnation", "reincarnation"),
    ("Reverse harem", "reverse-harem"),
    ("Romance", "romance"),
    ("School life", "school-life"),
    ("Sci fi", "sci-fi"),
    ("Seinen", "seinen"),
    ("Shota", "shota"),
    ("Shotacon", "shotacon"),
    ("Shoujo", "shoujo"),
    ("Shoujo ai", "shoujo-ai"),
    ("Shounen", "shounen"),
    ("Shounen ai", "shounen-ai"),
    ("Slice of life", "slice-of-life"),
    ("Smut", "smut"),
    ("Space", "space"),
    ("Sports", "sports"),
    ("Super power", "super-power"),
    ("Superhero", "superhero"),
    ("Supernatural", "supernatural"),
    ("Survival", "survival"),
    ("Suspense", "suspense"),
    ("Thriller", "thriller"),
    ("Time travel", "time-travel"),
    ("Tragedy", "tragedy"),
    ("User created", "user-created"),
    ("Vampire", "vampire"),
    ("Vampires", "vampires"),
    ("Video games", "video-games"),
    ("Web comic", "web-comic"),
    ("Webtoon", "webtoon"),
    ("Wuxia", "wuxia"),
    ("Yaoi", "yaoi"),
    ("Yuri", "yuri"),
    ("Zombies", "zombies"),
];
