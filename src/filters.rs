//! Search filters exposed by sources and their encoding into request parameters.
//!
//! Every source publishes a [`FilterList`] of site-defined controls. The host
//! mutates their state (from CLI arguments via [`FilterList::apply`]) and hands
//! the list back to `search`, where the source turns it into query parameters.

use crate::error::{Result, SourceError};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectFilter {
    pub key: String,
    pub name: String,
    pub param: String,
    pub options: Vec<FilterOption>,
    pub state: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckBox {
    pub label: String,
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckBoxGroup {
    pub key: String,
    pub name: String,
    pub param: String,
    pub boxes: Vec<CheckBox>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Ignore,
    Include,
    Exclude,
}

/// How a tri-state group is written into the query.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriStateStyle {
    /// `genres=a,b&genres-exclude=c`
    Joined,
    /// `includeGenres[]=a&includeGenres[]=b&excludeGenres[]=c`
    Repeated,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TriStateItem {
    pub label: String,
    pub value: String,
    pub state: TriState,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TriStateGroup {
    pub key: String,
    pub name: String,
    pub include_param: String,
    pub exclude_param: String,
    pub style: TriStateStyle,
    pub items: Vec<TriStateItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextFilter {
    pub key: String,
    pub name: String,
    pub param: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SortSelection {
    pub index: usize,
    pub ascending: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SortFilter {
    pub key: String,
    pub name: String,
    pub param: String,
    /// Receives `asc`/`desc` when the site takes the direction separately.
    pub order_param: Option<String>,
    pub options: Vec<FilterOption>,
    pub selection: Option<SortSelection>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Header { text: String },
    Separator,
    Select(SelectFilter),
    CheckBoxGroup(CheckBoxGroup),
    TriStateGroup(TriStateGroup),
    Text(TextFilter),
    Sort(SortFilter),
}

/// Ordered request parameters. Keys are written verbatim so that `name[]`
/// survives; values are form-url-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FilterList {
    filters: Vec<Filter>,
}

fn options_from(pairs: &[(&str, &str)]) -> Vec<FilterOption> {
    pairs
        .iter()
        .map(|(label, value)| FilterOption {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn find_option(options: &[FilterOption], wanted: &str) -> Option<usize> {
    options
        .iter()
        .position(|o| o.value == wanted)
        .or_else(|| options.iter().position(|o| o.label.eq_ignore_ascii_case(wanted)))
}

impl SelectFilter {
    /// `pairs` are `(label, value)`.
    pub fn new(key: &str, name: &str, param: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            param: param.to_string(),
            options: options_from(pairs),
            state: 0,
        }
    }

    pub fn with_default(mut self, index: usize) -> Self {
        self.state = index.min(self.options.len().saturating_sub(1));
        self
    }

    pub fn value(&self) -> &str {
        self.options.get(self.state).map(|o| o.value.as_str()).unwrap_or("")
    }

    pub fn label(&self) -> &str {
        self.options.get(self.state).map(|o| o.label.as_str()).unwrap_or("")
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        let value = self.value();
        if !value.trim().is_empty() {
            query.push(&self.param, value);
        }
    }

    pub fn select(&mut self, wanted: &str) -> Result<()> {
        self.state = find_option(&self.options, wanted).ok_or_else(|| {
            SourceError::invalid_filter(format!("'{}' is not an option of {}", wanted, self.key))
        })?;
        Ok(())
    }
}

impl CheckBoxGroup {
    pub fn new(key: &str, name: &str, param: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            param: param.to_string(),
            boxes: pairs
                .iter()
                .map(|(label, value)| CheckBox {
                    label: label.to_string(),
                    value: value.to_string(),
                    checked: false,
                })
                .collect(),
        }
    }

    /// Values of the checked boxes in table order, blanks skipped.
    pub fn checked_values(&self) -> Vec<&str> {
        self.boxes
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.value.as_str())
            .filter(|v| !v.trim().is_empty())
            .collect()
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        let key = format!("{}[]", self.param);
        for value in self.checked_values() {
            query.push(&key, value);
        }
    }

    pub fn check(&mut self, wanted: &[&str]) -> Result<()> {
        for b in self.boxes.iter_mut() {
            b.checked = false;
        }
        for &w in wanted {
            let index = self
                .boxes
                .iter()
                .position(|b| b.value == w)
                .or_else(|| self.boxes.iter().position(|b| b.label.eq_ignore_ascii_case(w)))
                .ok_or_else(|| {
                    SourceError::invalid_filter(format!("'{}' is not a box of {}", w, self.key))
                })?;
            self.boxes[index].checked = true;
        }
        Ok(())
    }
}

impl TriStateGroup {
    pub fn new(
        key: &str,
        name: &str,
        include_param: &str,
        exclude_param: &str,
        style: TriStateStyle,
        pairs: &[(&str, &str)],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            include_param: include_param.to_string(),
            exclude_param: exclude_param.to_string(),
            style,
            items: pairs
                .iter()
                .map(|(label, value)| TriStateItem {
                    label: label.to_string(),
                    value: value.to_string(),
                    state: TriState::Ignore,
                })
                .collect(),
        }
    }

    /// Splits the group into `(included, excluded)` values.
    ///
    /// The two lists never share a value and never repeat one: a value that
    /// is both included and excluded (only possible with duplicate table rows)
    /// stays included.
    pub fn partition(&self) -> (Vec<&str>, Vec<&str>) {
        let mut included: Vec<&str> = Vec::new();
        for item in self.items.iter().filter(|i| i.state == TriState::Include) {
            let value = item.value.as_str();
            if !included.contains(&value) {
                included.push(value);
            }
        }
        let mut excluded: Vec<&str> = Vec::new();
        for item in self.items.iter().filter(|i| i.state == TriState::Exclude) {
            let value = item.value.as_str();
            if !included.contains(&value) && !excluded.contains(&value) {
                excluded.push(value);
            }
        }
        (included, excluded)
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        let (included, excluded) = self.partition();
        match self.style {
            TriStateStyle::Joined => {
                if !included.is_empty() {
                    query.push(&self.include_param, &included.join(","));
                }
                if !excluded.is_empty() {
                    query.push(&self.exclude_param, &excluded.join(","));
                }
            }
            TriStateStyle::Repeated => {
                let include_key = format!("{}[]", self.include_param);
                let exclude_key = format!("{}[]", self.exclude_param);
                for value in included {
                    query.push(&include_key, value);
                }
                for value in excluded {
                    query.push(&exclude_key, value);
                }
            }
        }
    }

    /// Accepts `+value` / `value` to include and `-value` to exclude.
    pub fn set(&mut self, tokens: &[&str]) -> Result<()> {
        for item in self.items.iter_mut() {
            item.state = TriState::Ignore;
        }
        for &token in tokens {
            let (state, wanted) = match token.strip_prefix('-') {
                Some(rest) => (TriState::Exclude, rest),
                None => (TriState::Include, token.strip_prefix('+').unwrap_or(token)),
            };
            let item = self
                .items
                .iter_mut()
                .find(|i| i.value == wanted || i.label.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| {
                    SourceError::invalid_filter(format!("'{}' is not an item of {}", wanted, self.key))
                })?;
            item.state = state;
        }
        Ok(())
    }
}

impl TextFilter {
    pub fn new(key: &str, name: &str, param: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            param: param.to_string(),
            state: String::new(),
        }
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        if !self.state.trim().is_empty() {
            query.push(&self.param, self.state.trim());
        }
    }
}

impl SortFilter {
    pub fn new(key: &str, name: &str, param: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            param: param.to_string(),
            order_param: None,
            options: options_from(pairs),
            selection: None,
        }
    }

    pub fn with_order_param(mut self, param: &str) -> Self {
        self.order_param = Some(param.to_string());
        self
    }

    pub fn with_default(mut self, index: usize, ascending: bool) -> Self {
        if index < self.options.len() {
            self.selection = Some(SortSelection { index, ascending });
        }
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.selection
            .and_then(|s| self.options.get(s.index))
            .map(|o| o.value.as_str())
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        let (Some(selection), Some(value)) = (self.selection, self.value()) else {
            return;
        };
        if value.trim().is_empty() {
            return;
        }
        query.push(&self.param, value);
        if let Some(order_param) = &self.order_param {
            query.push(order_param, if selection.ascending { "asc" } else { "desc" });
        }
    }

    /// Accepts `value`, `value:asc` or `value:desc`; descending by default.
    pub fn set(&mut self, raw: &str) -> Result<()> {
        let (wanted, ascending) = match raw.rsplit_once(':') {
            Some((v, "asc")) => (v, true),
            Some((v, "desc")) => (v, false),
            _ => (raw, false),
        };
        let index = find_option(&self.options, wanted).ok_or_else(|| {
            SourceError::invalid_filter(format!("'{}' is not a sort of {}", wanted, self.key))
        })?;
        self.selection = Some(SortSelection { index, ascending });
        Ok(())
    }
}

impl Filter {
    pub fn header(text: &str) -> Self {
        Filter::Header {
            text: text.to_string(),
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Filter::Header { .. } | Filter::Separator => None,
            Filter::Select(f) => Some(&f.key),
            Filter::CheckBoxGroup(f) => Some(&f.key),
            Filter::TriStateGroup(f) => Some(&f.key),
            Filter::Text(f) => Some(&f.key),
            Filter::Sort(f) => Some(&f.key),
        }
    }

    pub fn append_to(&self, query: &mut QueryParams) {
        match self {
            Filter::Header { .. } | Filter::Separator => {}
            Filter::Select(f) => f.append_to(query),
            Filter::CheckBoxGroup(f) => f.append_to(query),
            Filter::TriStateGroup(f) => f.append_to(query),
            Filter::Text(f) => f.append_to(query),
            Filter::Sort(f) => f.append_to(query),
        }
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                let encoded: String = url::form_urlencoded::byte_serialize(v.as_bytes()).collect();
                format!("{}={}", k, encoded)
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Appends the parameters to `base`, which may already carry a query.
    pub fn apply_to(&self, base: &str) -> String {
        if self.pairs.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, self.to_query_string())
    }
}

impl FilterList {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.key() == Some(key))
    }

    pub fn select(&self, key: &str) -> Option<&SelectFilter> {
        match self.get(key) {
            Some(Filter::Select(f)) => Some(f),
            _ => None,
        }
    }

    pub fn checkbox_group(&self, key: &str) -> Option<&CheckBoxGroup> {
        match self.get(key) {
            Some(Filter::CheckBoxGroup(f)) => Some(f),
            _ => None,
        }
    }

    pub fn tri_state_group(&self, key: &str) -> Option<&TriStateGroup> {
        match self.get(key) {
            Some(Filter::TriStateGroup(f)) => Some(f),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&TextFilter> {
        match self.get(key) {
            Some(Filter::Text(f)) => Some(f),
            _ => None,
        }
    }

    pub fn sort(&self, key: &str) -> Option<&SortFilter> {
        match self.get(key) {
            Some(Filter::Sort(f)) => Some(f),
            _ => None,
        }
    }

    /// Value of a select filter, empty when absent.
    pub fn select_value(&self, key: &str) -> &str {
        self.select(key).map(|f| f.value()).unwrap_or("")
    }

    /// Encodes every filter, in list order.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        for filter in &self.filters {
            filter.append_to(&mut query);
        }
        query
    }

    /// Encodes only the filters whose key is listed, in list order.
    pub fn to_query_for(&self, keys: &[&str]) -> QueryParams {
        let mut query = QueryParams::new();
        for filter in &self.filters {
            if filter.key().map(|k| keys.contains(&k)).unwrap_or(false) {
                filter.append_to(&mut query);
            }
        }
        query
    }

    /// Sets filter state from a `key=value` argument.
    pub fn apply(&mut self, arg: &str) -> Result<()> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| SourceError::invalid_filter(format!("expected key=value, got '{}'", arg)))?;
        let key = key.trim();
        let value = value.trim();
        let filter = self
            .filters
            .iter_mut()
            .find(|f| f.key() == Some(key))
            .ok_or_else(|| SourceError::invalid_filter(format!("unknown filter '{}'", key)))?;

        let list: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        match filter {
            Filter::Select(f) => f.select(value),
            Filter::CheckBoxGroup(f) => f.check(&list),
            Filter::TriStateGroup(f) => f.set(&list),
            Filter::Text(f) => {
                f.state = value.to_string();
                Ok(())
            }
            Filter::Sort(f) => f.set(value),
            Filter::Header { .. } | Filter::Separator => Ok(()),
        }
    }
}
