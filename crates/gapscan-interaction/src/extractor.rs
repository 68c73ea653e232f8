//! Document extraction - downloads an attached file and turns it into text.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use gapscan_core::config::MAX_FILE_SIZE_BYTES;
use gapscan_core::error::ExtractionError;
use gapscan_core::session::FileRef;

use crate::parsers;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// File extensions the extractor knows how to parse.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "doc"];

/// Fetches an attachment and extracts its plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, file: &FileRef) -> Result<String, ExtractionError>;
}

/// Extractor that downloads attachments over HTTP before parsing them.
#[derive(Clone)]
pub struct HttpDocumentExtractor {
    client: Client,
    auth_token: Option<String>,
    max_file_size: usize,
}

impl HttpDocumentExtractor {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            auth_token: None,
            max_file_size: MAX_FILE_SIZE_BYTES,
        }
    }

    /// Sets a bearer token sent with every download request. Attachment
    /// URLs on authenticated surfaces require it.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[cfg(test)]
    fn with_max_file_size(mut self, max: usize) -> Self {
        self.max_file_size = max;
        self
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ExtractionError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ExtractionError::Download(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(ExtractionError::Download(format!(
                "download returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ExtractionError::Download(format!("failed to read body: {err}")))?;
        Ok(bytes.to_vec())
    }
}

impl Default for HttpDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for HttpDocumentExtractor {
    async fn extract(&self, file: &FileRef) -> Result<String, ExtractionError> {
        if !is_supported(&file.filename) {
            return Err(ExtractionError::UnsupportedType {
                filename: file.filename.clone(),
            });
        }

        let bytes = self.download(&file.url).await?;
        debug!(
            filename = %file.filename,
            size_bytes = bytes.len(),
            "downloaded attachment"
        );

        if bytes.len() > self.max_file_size {
            return Err(ExtractionError::FileTooLarge {
                size_bytes: bytes.len(),
            });
        }

        parsers::extract_text(&bytes, &file.filename)
    }
}

/// Returns the lowercased extension of a filename, or an empty string
/// when there is none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Whether the extractor can handle a file of this name.
pub fn is_supported(filename: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&file_extension(filename).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_last_component() {
        assert_eq!(file_extension("Report.PDF"), "pdf");
        assert_eq!(file_extension("notes.final.docx"), "docx");
        assert_eq!(file_extension("summary.txt"), "txt");
    }

    #[test]
    fn missing_extension_is_empty() {
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".gitignore"), "");
    }

    #[test]
    fn supported_types() {
        assert!(is_supported("a.txt"));
        assert!(is_supported("b.pdf"));
        assert!(is_supported("c.docx"));
        assert!(is_supported("d.doc"));
        assert!(!is_supported("e.exe"));
        assert!(!is_supported("f.csv"));
        assert!(!is_supported("no_extension"));
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected_before_download() {
        // URL is unreachable on purpose; the gate must fire first.
        let extractor = HttpDocumentExtractor::new();
        let file = FileRef::new("http://127.0.0.1:1/nope", "malware.exe");
        let err = extractor.extract(&file).await.unwrap_err();
        assert_eq!(
            err,
            ExtractionError::UnsupportedType {
                filename: "malware.exe".into()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_url_is_a_download_error() {
        let extractor = HttpDocumentExtractor::new().with_max_file_size(16);
        let file = FileRef::new("http://127.0.0.1:1/doc.txt", "doc.txt");
        let err = extractor.extract(&file).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Download(_)));
    }
}
