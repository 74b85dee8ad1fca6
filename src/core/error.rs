use std::fmt;

/// Error types for urlsweep operations
#[derive(Debug)]
pub enum SweepError {
    /// IO error (config files, stdout, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// The input directory could not be listed
    FileAccess {
        path: String,
        source: std::io::Error,
    },

    /// A file could not be opened or decompressed
    Decode {
        file: String,
        source: std::io::Error,
    },

    /// A line could not be parsed as a URL
    UrlFormat(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// The worker pool could not be started
    Pool(rayon::ThreadPoolBuildError),
}

impl SweepError {
    /// Wrap an IO error raised while opening or reading `file`.
    pub fn decode(file: impl Into<String>, source: std::io::Error) -> Self {
        SweepError::Decode {
            file: file.into(),
            source,
        }
    }
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Io(err) => write!(f, "IO error: {err}"),
            SweepError::Config(msg) => write!(f, "Configuration error: {msg}"),
            SweepError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            SweepError::FileAccess { path, source } => {
                write!(f, "Cannot list directory '{path}': {source}")
            }
            SweepError::Decode { file, source } => {
                write!(f, "Cannot decode file '{file}': {source}")
            }
            SweepError::UrlFormat(msg) => write!(f, "Malformed URL: {msg}"),
            SweepError::Http(err) => write!(f, "HTTP error: {err}"),
            SweepError::Pool(err) => write!(f, "Worker pool error: {err}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Io(err) => Some(err),
            SweepError::TomlParsing(err) => Some(err),
            SweepError::FileAccess { source, .. } => Some(source),
            SweepError::Decode { source, .. } => Some(source),
            SweepError::Http(err) => Some(err),
            SweepError::Pool(err) => Some(err),
            SweepError::Config(_) | SweepError::UrlFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        SweepError::Io(err)
    }
}

impl From<reqwest::Error> for SweepError {
    fn from(err: reqwest::Error) -> Self {
        SweepError::Http(err)
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(err: toml::de::Error) -> Self {
        SweepError::TomlParsing(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for SweepError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SweepError::Pool(err)
    }
}

/// Type alias for Results using SweepError
pub type Result<T> = std::result::Result<T, SweepError>;
