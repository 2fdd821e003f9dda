use crate::config::{HttpConfig, SiteConfig};
use crate::error::{Result, SourceError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use scraper::{ElementRef, Html, Selector};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Builds a client carrying the site's user agent and default headers.
    pub fn new(http: &HttpConfig, site: &SiteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = site.user_agent.as_deref().unwrap_or(&http.user_agent);
        headers.insert(USER_AGENT, header_value(user_agent)?);
        if let Some(extra) = &site.headers {
            for (key, value) in extra {
                headers.insert(header_name(key)?, header_value(value)?);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.get_with_headers(url, &[]).await
    }

    pub async fn get_with_headers(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        debug!("GET {}", url);
        let response = self.send(self.client.get(url), headers).await?;
        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, headers: &[(&str, &str)]) -> Result<T> {
        let body = self.get_with_headers(url, headers).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> Result<String> {
        debug!("POST {}", url);
        let response = self.send(self.client.post(url).form(form), headers).await?;
        Ok(response.text().await?)
    }

    /// Returns the response itself, for callers that need the final URL.
    pub async fn get_raw(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.send(self.client.get(url), headers).await
    }

    async fn send(&self, mut request: reqwest::RequestBuilder, headers: &[(&str, &str)]) -> Result<Response> {
        for (key, value) in headers {
            request = request.header(header_name(key)?, header_value(value)?);
        }
        let response = request.send().await?;
        Ok(response.error_for_status()?)
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| SourceError::InvalidHeader(format!("bad header name {}: {}", name, e)))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SourceError::InvalidHeader(format!("bad header value {}: {}", value, e)))
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SourceError::not_found(format!("invalid selector {}: {:?}", css, e)))
}

/// First match of `css` under `scope`; missing matches are a parse failure.
pub fn select_first<'a>(scope: &ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    let sel = selector(css)?;
    scope
        .select(&sel)
        .next()
        .ok_or_else(|| SourceError::not_found(format!("selector {}", css)))
}

pub fn select_first_in<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>> {
    select_first(&document.root_element(), css)
}

pub fn select_opt<'a>(scope: &ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css).ok()?;
    scope.select(&sel).next()
}

pub fn select_all<'a>(scope: &ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

pub fn select_all_in<'a>(document: &'a Html, css: &str) -> Result<Vec<ElementRef<'a>>> {
    select_all(&document.root_element(), css)
}

/// Whitespace-normalised text of the element and its descendants.
pub fn text_of(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text directly inside the element, ignoring child elements.
pub fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn attr(element: &ElementRef, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

/// Text of the first match, empty when absent.
pub fn text_at(scope: &ElementRef, css: &str) -> String {
    select_opt(scope, css).map(|e| text_of(&e)).unwrap_or_default()
}

pub fn attr_at(scope: &ElementRef, css: &str, name: &str) -> String {
    select_opt(scope, css).map(|e| attr(&e, name)).unwrap_or_default()
}

/// Resolves `href` against `base`; protocol-relative links get https.
pub fn absolute_url(base: &str, href: &str) -> Result<String> {
    if href.starts_with("//") {
        return Ok(format!("https:{}", href));
    }
    Ok(Url::parse(base)?.join(href)?.to_string())
}

/// Path, query and fragment of an absolute URL, which is what sources store
/// as the opaque `url` token. Relative input is returned as-is.
pub fn url_without_domain(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => {
            let mut out = url.path().to_string();
            if let Some(query) = url.query() {
                out.push('?');
                out.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
        Err(_) => href.to_string(),
    }
}

/// Joins a source's base URL with a stored path token.
pub fn join_base(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Form-url-encodes a single query value.
pub fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// `haystack` between the first `start` and the next `end` after it.
pub fn substring_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let rest = &haystack[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_domain_but_keeps_query() {
        assert_eq!(
            url_without_domain("https://site.example/anime/one-piece?ep=3#top"),
            "/anime/one-piece?ep=3#top"
        );
        assert_eq!(url_without_domain("/already/relative"), "/already/relative");
    }

    #[test]
    fn resolves_relative_and_protocol_relative_links() {
        assert_eq!(
            absolute_url("https://a.example/x/y", "z.jpg").unwrap(),
            "https://a.example/x/z.jpg"
        );
        assert_eq!(
            absolute_url("https://a.example/x/y", "//cdn.example/i.png").unwrap(),
            "https://cdn.example/i.png"
        );
    }

    #[test]
    fn join_base_handles_slashes() {
        assert_eq!(join_base("https://a.example/", "/b"), "https://a.example/b");
        assert_eq!(join_base("https://a.example", "b"), "https://a.example/b");
        assert_eq!(join_base("https://a.example", "https://c/d"), "https://c/d");
    }

    #[test]
    fn missing_selector_is_not_found() {
        let doc = Html::parse_document("<div class='a'>x</div>");
        assert!(matches!(
            select_first_in(&doc, "div.b"),
            Err(SourceError::NotFound(_))
        ));
        assert_eq!(text_of(&select_first_in(&doc, "div.a").unwrap()), "x");
    }

    #[test]
    fn own_text_skips_children() {
        let doc = Html::parse_fragment("<p class='t'>Plot <span>Label</span> summary</p>");
        let p = select_first_in(&doc, "p.t").unwrap();
        assert_eq!(own_text(&p), "Plot  summary");
    }

    #[test]
    fn query_values_are_form_encoded() {
        assert_eq!(encode_query("one piece & co"), "one+piece+%26+co");
    }

    #[test]
    fn substring_between_finds_first_window() {
        assert_eq!(substring_between("a [x] [y]", "[", "]"), Some("x"));
        assert_eq!(substring_between("abc", "[", "]"), None);
    }
}
