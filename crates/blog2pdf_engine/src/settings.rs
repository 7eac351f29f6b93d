use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to the health probe and the accessibility check.
    pub check_timeout: Duration,
    /// Applies to the conversion request, body included.
    pub convert_timeout: Duration,
    pub max_pdf_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            check_timeout: Duration::from_secs(30),
            convert_timeout: Duration::from_secs(120),
            max_pdf_bytes: 50 * 1024 * 1024,
        }
    }
}
