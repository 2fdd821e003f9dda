use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preference file error: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("Preference file error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// An encrypted player payload could not be decrypted with the page keys.
    #[error("Decryption error: {0}")]
    Decrypt(String),

    /// The site has no such capability; not a transient failure.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A selector, JSON field or script the parser depends on was absent.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

impl SourceError {
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn decrypt(msg: impl Into<String>) -> Self {
        Self::Decrypt(msg.into())
    }

    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    pub fn invalid_preference(msg: impl Into<String>) -> Self {
        Self::InvalidPreference(msg.into())
    }

    pub fn unknown_source(name: impl Into<String>) -> Self {
        Self::UnknownSource(name.into())
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
