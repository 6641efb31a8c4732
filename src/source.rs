//! Where the page markup comes from: the live archive URL, or a saved copy on
//! disk for offline runs.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::EtlError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const TIMEOUT: Duration = Duration::from_secs(30);

pub trait MarkupSource {
    /// Human-readable location, used in progress and error messages.
    fn location(&self) -> String;

    fn fetch(&self) -> Result<String, EtlError>;
}

pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn fetch_error(&self, error: reqwest::Error) -> EtlError {
        EtlError::Fetch {
            location: self.url.clone(),
            reason: error.to_string(),
        }
    }
}

impl MarkupSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, EtlError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| self.fetch_error(e))?;

        tracing::debug!(url = %self.url, "requesting page");
        client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| self.fetch_error(e))
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MarkupSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, EtlError> {
        std::fs::read_to_string(&self.path).map_err(|e| EtlError::Fetch {
            location: self.location(),
            reason: e.to_string(),
        })
    }
}

/// `http://` and `https://` locations are fetched over the network; anything
/// else is treated as a local file path.
pub fn source_for(location: &str) -> Box<dyn MarkupSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}
