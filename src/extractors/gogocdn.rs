use crate::error::{Result, SourceError};
use crate::extractors::playlist;
use crate::models::Video;
use crate::traits::{Extractor, ExtractorOptions};
use crate::utils::{attr, encode_query, select_first_in, HttpClient};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use scraper::Html;
use serde::Deserialize;
use tracing::debug;
use url::Url;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Gogo's own player (`streaming.php`): the AJAX source list is AES-CBC
/// encrypted with keys hidden in the embed page's class names.
pub struct GogoCdnExtractor {
    client: HttpClient,
}

impl GogoCdnExtractor {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// Key material read from the embed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKeys {
    pub iv: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub decryption_key: Vec<u8>,
    /// Encrypted extra AJAX parameters from `script[data-value]`.
    pub data_value: String,
}

#[derive(Debug, Deserialize)]
struct EncryptedData {
    data: String,
}

#[derive(Debug, Deserialize)]
pub struct DecryptedData {
    #[serde(default)]
    pub source: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    pub file: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

fn digits_after(class: &str, marker: &str) -> Vec<u8> {
    class
        .split_once(marker)
        .map(|(_, rest)| rest.bytes().filter(u8::is_ascii_digit).collect())
        .unwrap_or_default()
}

pub fn page_keys(html: &str) -> Result<PageKeys> {
    let document = Html::parse_document(html);
    let class_of = |css: &str| -> Result<String> { Ok(attr(&select_first_in(&document, css)?, "class")) };

    Ok(PageKeys {
        iv: digits_after(&class_of("div.wrapper")?, "container-"),
        secret_key: digits_after(&class_of("body[class]")?, "container-"),
        decryption_key: digits_after(&class_of("div.videocontent")?, "videocontent-"),
        data_value: attr(&select_first_in(&document, "script[data-value]")?, "data-value"),
    })
}

pub fn encrypt(plain: &str, key: &[u8], iv: &[u8]) -> Result<String> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| SourceError::decrypt(format!("key or iv: {}", e)))?;
    Ok(STANDARD.encode(cipher.encrypt_padded_vec_mut::<Pkcs7>(plain.as_bytes())))
}

/// Decodes base64 (line breaks allowed) and decrypts to UTF-8 text.
pub fn decrypt(encoded: &str, key: &[u8], iv: &[u8]) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD.decode(compact)?;
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| SourceError::decrypt(format!("key or iv: {}", e)))?;
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&data)
        .map_err(|e| SourceError::decrypt(e.to_string()))?;
    String::from_utf8(plain).map_err(|e| SourceError::decrypt(e.to_string()))
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

#[async_trait::async_trait]
impl Extractor for GogoCdnExtractor {
    async fn videos_from_url(&self, url: &str, options: &ExtractorOptions) -> Result<Vec<Video>> {
        let html = self.client.get(url).await?;
        let keys = page_keys(&html)?;

        let params = decrypt(&keys.data_value, &keys.secret_key, &keys.iv)?;
        let extra = match params.split_once('&') {
            Some((_, rest)) => rest.to_string(),
            None => params,
        };

        let server = Url::parse(url)?;
        let id = query_value(&server, "id").ok_or_else(|| SourceError::not_found(format!("id in {}", url)))?;
        let prefix = match (&options.prefix, query_value(&server, "token")) {
            (Some(prefix), _) => prefix.clone(),
            (None, Some(_)) => "Gogostream - ".to_string(),
            (None, None) => "Vidstreaming - ".to_string(),
        };

        let mut ajax_url = format!(
            "{}/encrypt-ajax.php?id={}",
            server.origin().ascii_serialization(),
            encode_query(&encrypt(&id, &keys.secret_key, &keys.iv)?)
        );
        if !extra.is_empty() {
            ajax_url.push('&');
            ajax_url.push_str(&extra);
        }
        ajax_url.push_str(&format!("&alias={}", encode_query(&id)));
        debug!("[GOGOCDN] {}", ajax_url);

        let response: EncryptedData = self
            .client
            .get_json(&ajax_url, &[("X-Requested-With", "XMLHttpRequest")])
            .await?;
        let data: DecryptedData =
            serde_json::from_str(&decrypt(&response.data, &keys.decryption_key, &keys.iv)?)?;

        match data.source.as_slice() {
            [single] if single.kind == "hls" => {
                playlist::fetch_videos(&self.client, &single.file, &[("Referer", url)], &prefix).await
            }
            sources => Ok(sources
                .iter()
                .map(|s| Video::new(s.file.clone(), format!("{}{}", prefix, s.label)))
                .collect()),
        }
    }
}
