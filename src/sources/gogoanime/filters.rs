//! Search controls offered on the site's `/filter.html` page and sub-pages.

use crate::filters::{CheckBoxGroup, Filter, FilterList, SelectFilter};

/// Keys of the groups that are encoded into `/filter.html`.
pub const ADVANCED_KEYS: &[&str] = &["genre", "country", "season", "year", "language", "type", "status", "sort"];

pub fn filter_list() -> FilterList {
    FilterList::new(vec![
        Filter::header("Advanced search"),
        Filter::CheckBoxGroup(CheckBoxGroup::new("genre", "Genre", "genre", GENRE_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("country", "Country", "country", COUNTRY_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("season", "Season", "season", SEASON_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("year", "Year", "year", YEAR_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("language", "Language", "language", LANGUAGE_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("type", "Type", "type", TYPE_SEARCH_LIST)),
        Filter::CheckBoxGroup(CheckBoxGroup::new("status", "Status", "status", STATUS_SEARCH_LIST)),
        Filter::Select(SelectFilter::new("sort", "Sort by", "sort", SORT_SEARCH_LIST)),
        Filter::Separator,
        Filter::header("Select sub-page"),
        Filter::header("Note: Ignores search & other filters"),
        Filter::Select(SelectFilter::new("genre_page", "Genre", "genre_page", GENRE_LIST)),
        Filter::Select(SelectFilter::new("recent", "Recent episodes", "recent", RECENT_LIST)),
        Filter::Select(SelectFilter::new("season_page", "Season", "season_page", SEASON_LIST)),
    ])
}

const GENRE_SEARCH_LIST: &[(&str, &str)] = &[
    ("Action", "action"),
    ("Adult Cast", "adult-cast"),
    ("Adventure", "adventure"),
    ("Anthropomorphic", "anthropomorphic"),
    ("Avant Garde", "avant-garde"),
    ("Boys Love", "shounen-ai"),
    ("Cars", "cars"),
    ("CGDCT", "cgdct"),
    ("Childcare", "childcare"),
    ("Comedy", "comedy"),
    ("Comic", "comic"),
    ("Crime", "crime"),
    ("Crossdressing", "crossdressing"),
    ("Delinquents", "delinquents"),
    ("Dementia", "dementia"),
    ("Demons", "demons"),
    ("Detective", "detective"),
    ("Drama", "drama"),
    ("Dub", "dub"),
    ("Ecchi", "ecchi"),
    ("Erotica", "erotica"),
    ("Family", "family"),
    ("Fantasy", "fantasy"),
    ("Gag Humor", "gag-humor"),
    ("Game", "game"),
    ("Gender Bender", "gender-bender"),
    ("Gore", "gore"),
    ("Gourmet", "gourmet"),
    ("Harem", "harem"),
    ("Hentai", "hentai"),
    ("High Stakes Game", "high-stakes-game"),
    ("Historical", "historical"),
    ("Horror", "horror"),
    ("Isekai", "isekai"),
    ("Iyashikei", "iyashikei"),
    ("Josei", "josei"),
    ("Kids", "kids"),
    ("Magic", "magic"),
    ("Magical Sex Shift", "magical-sex-shift"),
    ("Mahou Shoujo", "mahou-shoujo"),
    ("Martial Arts", "martial-arts"),
    ("Mecha", "mecha"),
    ("Medical", "medical"),
    ("Military", "military"),
    ("Music", "music"),
    ("Mystery", "mystery"),
    ("Mythology", "mythology"),
    ("Organized Crime", "organized-crime"),
    ("Parody", "parody"),
    ("Performing Arts", "performing-arts"),
    ("Pets", "pets"),
    ("Police", "police"),
    ("Psychological", "psychological"),
    ("Racing", "racing"),
    ("Reincarnation", "reincarnation"),
    ("Romance", "romance"),
    ("Romantic Subtext", "romantic-subtext"),
    ("Samurai", "samurai"),
    ("School", "school"),
    ("Sci-Fi", "sci-fi"),
    ("Seinen", "seinen"),
    ("Shoujo", "shoujo"),
    ("Shoujo Ai", "shoujo-ai"),
    ("Shounen", "shounen"),
    ("Showbiz", "showbiz"),
    ("Slice of Life", "slice-of-life"),
    ("Space", "space"),
    ("Sports", "sports"),
    ("Strategy Game", "strategy-game"),
    ("Super Power", "super-power"),
    ("Supernatural", "supernatural"),
    ("Survival", "survival"),
    ("Suspense", "suspense"),
    ("Team Sports", "team-sports"),
    ("Thriller", "thriller"),
    ("Time Travel", "time-travel"),
    ("Vampire", "vampire"),
    ("Visual Arts", "visual-arts"),
    ("Work Life", "work-life"),
    ("Workplace", "workplace"),
    ("Yaoi", "yaoi"),
    ("Yuri", "yuri"),
];

const COUNTRY_SEARCH_LIST: &[(&str, &str)] = &[
    ("China", "5"),
    ("Japan", "2"),
];

const SEASON_SEARCH_LIST: &[(&str, &str)] = &[
    ("Fall", "fall"),
    ("Summer", "summer"),
    ("Spring", "spring"),
    ("Winter", "winter"),
];

const YEAR_SEARCH_LIST: &[(&str, &str)] = &[
    ("2024", "2024"),
    ("2023", "2023"),
    ("2022", "2022"),
    ("2021", "2021"),
    ("2020", "2020"),
    ("2019", "2019"),
    ("2018", "2018"),
    ("2017", "2017"),
    ("2016", "2016"),
    ("2015", "2015"),
    ("2014", "2014"),
    ("2013", "2013"),
    ("2012", "2012"),
    ("2011", "2011"),
    ("2010", "2010"),
    ("2009", "2009"),
    ("2008", "2008"),
    ("2007", "2007"),
    ("2006", "2006"),
    ("2005", "2005"),
    ("2004", "2004"),
    ("2003", "2003"),
    ("2002", "2002"),
    ("2001", "2001"),
    ("2000", "2000"),
    ("1999", "1999"),
];

const LANGUAGE_SEARCH_LIST: &[(&str, &str)] = &[
    ("Sub & Dub", "subdub"),
    ("Sub", "sub"),
    ("Dub", "dub"),
];

const TYPE_SEARCH_LIST: &[(&str, &str)] = &[
    ("Movie", "3"),
    ("TV", "1"),
    ("OVA", "26"),
    ("ONA", "30"),
    ("Special", "2"),
    ("Music", "32"),
];

const STATUS_SEARCH_LIST: &[(&str, &str)] = &[
    ("Not Yet Aired", "Upcoming"),
    ("Ongoing", "Ongoing"),
    ("Completed", "Completed"),
];

const SORT_SEARCH_LIST: &[(&str, &str)] = &[
    ("Name A-Z", "title_az"),
    ("Recently updated", "recently_updated"),
    ("Recently added", "recently_added"),
    ("Release date", "release_date"),
];

const GENRE_LIST: &[(&str, &str)] = &[
    ("<select>", ""),
    ("Action", "action"),
    ("Adult Cast", "adult-cast"),
    ("Adventure", "adventure"),
    ("Anthropomorphic", "anthropomorphic"),
    ("Avant Garde", "avant-garde"),
    ("Boys Love", "shounen-ai"),
    ("Cars", "cars"),
    ("CGDCT", "cgdct"),
    ("Childcare", "childcare"),
    ("Comedy", "comedy"),
    ("Comic", "comic"),
    ("Crime", "crime"),
    ("Crossdressing", "crossdressing"),
    ("Delinquents", "delinquents"),
    ("Dementia", "dementia"),
    ("Demons", "demons"),
    ("Detective", "detective"),
    ("Drama", "drama"),
    ("Dub", "dub"),
    ("Ecchi", "ecchi"),
    ("Erotica", "erotica"),
    ("Family", "family"),
    ("Fantasy", "fantasy"),
    ("Gag Humor", "gag-humor"),
    ("Game", "game"),
    ("Gender Bender", "gender-bender"),
    ("Gore", "gore"),
    ("Gourmet", "gourmet"),
    ("Harem", "harem"),
    ("Hentai", "hentai"),
    ("High Stakes Game", "high-stakes-game"),
    ("Historical", "historical"),
    ("Horror", "horror"),
    ("Isekai", "isekai"),
    ("Iyashikei", "iyashikei"),
    ("Josei", "josei"),
    ("Kids", "kids"),
    ("Magic", "magic"),
    ("Magical Sex Shift", "magical-sex-shift"),
    ("Mahou Shoujo", "mahou-shoujo"),
    ("Martial Arts", "martial-arts"),
    ("Mecha", "mecha"),
    ("Medical", "medical"),
    ("Military", "military"),
    ("Music", "music"),
    ("Mystery", "mystery"),
    ("Mythology", "mythology"),
    ("Organized Crime", "organized-crime"),
    ("Parody", "parody"),
    ("Performing Arts", "performing-arts"),
    ("Pets", "pets"),
    ("Police", "police"),
    ("Psychological", "psychological"),
    ("Racing", "racing"),
    ("Reincarnation", "reincarnation"),
    ("Romance", "romance"),
    ("Romantic Subtext", "romantic-subtext"),
    ("Samurai", "samurai"),
    ("School", "school"),
    ("Sci-Fi", "sci-fi"),
    ("Seinen", "seinen"),
    ("Shoujo", "shoujo"),
    ("Shoujo Ai", "shoujo-ai"),
    ("Shounen", "shounen"),
    ("Showbiz", "showbiz"),
    ("Slice of Life", "slice-of-life"),
    ("Space", "space"),
    ("Sports", "sports"),
    ("Strategy Game", "strategy-game"),
    ("Super Power", "super-power"),
    ("Supernatural", "supernatural"),
    ("Survival", "survival"),
    ("Suspense", "suspense"),
    ("Team Sports", "team-sports"),
    ("Thriller", "thriller"),
    ("Time Travel", "time-travel"),
    ("Vampire", "vampire"),
    ("Visual Arts", "visual-arts"),
    ("Work Life", "work-life"),
    ("Workplace", "workplace"),
    ("Yaoi", "yaoi"),
    ("Yuri", "yuri"),
];

const RECENT_LIST: &[(&str, &str)] = &[
    ("<select>", ""),
    ("Recent Release", "1"),
    ("Recent Dub", "2"),
    ("Recent Chinese", "3"),
];

const SEASON_LIST: &[(&str, &str)] = &[
    ("<select>", ""),
    ("Latest season", "new-season.html"),
    ("Spring 2024", "sub-category/spring-2024-anime"),
    ("Winter 2024", "sub-category/winter-2024-anime"),
    ("Fall 2023", "sub-category/fall-2023-anime"),
    ("Summer 2023", "sub-category/summer-2023-anime"),
    ("Spring 2023", "sub-category/spring-2023-anime"),
    ("Winter 2023", "sub-category/winter-2023-anime"),
    ("Fall 2022", "sub-category/fall-2022-anime"),
    ("Summer 2022", "sub-category/summer-2022-anime"),
    ("Spring 2022", "sub-category/spring-2022-anime"),
    ("Winter 2022", "sub-category/winter-2022-anime"),
    ("Fall 2021", "sub-category/fall-2021-anime"),
    ("Summer 2021", "sub-category/summer-2021-anime"),
    ("Spring 2021", "sub-category/spring-2021-anime"),
    ("Winter 2021", "sub-category/winter-2021-anime"),
    ("Fall 2020", "sub-category/fall-2020-anime"),
    ("Summer 2020", "sub-category/summer-2020-anime"),
    ("Spring 2020", "sub-category/spring-2020-anime"),
    ("Winter 2020", "sub-category/winter-2020-anime"),
    ("Fall 2019", "sub-category/fall-2019-anime"),
    ("Summer 2019", "sub-category/summer-2019-anime"),
    ("Spring 2019", "sub-category/spring-2019-anime"),
    ("Winter 2019", "sub-category/winter-2019-anime"),
    ("Fall 2018", "sub-category/fall-2018-anime"),
    ("Summer 2018", "sub-category/summer-2018-anime"),
    ("Spring 2018", "sub-category/spring-2018-anime"),
    ("Winter 2018", "sub-category/winter-2018-anime"),
    ("Fall 2017", "sub-category/fall-2017-anime"),
    ("Summer 2017", "sub-category/summer-2017-anime"),
    ("Spring 2017", "sub-category/spring-2017-anime"),
    ("Winter 2017", "sub-category/winter-2017-anime"),
    ("Fall 2016", "sub-category/fall-2016-anime"),
    ("Summer 2016", "sub-category/summer-2016-anime"),
    ("Spring 2016", "sub-category/spring-2016-anime"),
    ("Winter 2016", "sub-category/winter-2016-anime"),
    ("Fall 2015", "sub-category/fall-2015-anime"),
    ("Summer 2015", "sub-category/summer-2015-anime"),
    ("Spring 2015", "sub-category/spring-2015-anime"),
    ("Winter 2015", "sub-category/winter-2015-anime"),
    ("Fall 2014", "sub-category/fall-2014-anime"),
    ("Summer 2014", "sub-category/summer-2014-anime"),
    ("Spring 2014", "sub-category/spring-2014-anime"),
    ("Winter 2014", "sub-category/winter-2014-anime"),
];
