use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Package archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Translation engine error: {0}")]
    Engine(String),

    #[error("Language package error: {0}")]
    Package(String),

    #[error("Language '{code}' is not installed (installed: {installed})")]
    LanguageNotInstalled { code: String, installed: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, RuenError>;
