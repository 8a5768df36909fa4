use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image bytes captured from the host's file picker
///
/// The session only ever holds its own copy of the bytes; nothing here keeps
/// the host's file handle alive past the capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlob {
    /// Original file name, forwarded as the multipart file name
    pub file_name: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Advisory MIME type from the picker, forwarded verbatim when present.
    /// Not validated; the accept filter on the picker side is advisory only.
    pub mime_type: Option<String>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The search query input, exactly one mode at a time
///
/// URL and file input are mutually exclusive: assigning one variant replaces
/// whatever was selected before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum InputSelection {
    /// Nothing selected yet
    #[default]
    None,
    /// An image URL typed by the user
    Url(String),
    /// An uploaded image file
    File(ImageBlob),
}

impl InputSelection {
    pub fn is_none(&self) -> bool {
        matches!(self, InputSelection::None)
    }
}

/// One match returned by the search service
///
/// Deserialized from the service's camelCase wire form. Entries are immutable
/// once received; no validation beyond deserialization is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier, unique within one response
    pub id: String,
    /// Display label
    pub name: String,
    /// Resolvable image resource for the match
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Percentage match in [0, 100]
    pub similarity: f64,
}

/// Submission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Complete session state as observed by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    /// Current query input
    pub selection: InputSelection,
    /// Submission lifecycle status
    pub status: SessionStatus,
    /// Results of the most recent successful submission, service order
    pub results: Vec<SearchResult>,
    /// User-facing message of the most recent failure, if any
    pub error_message: Option<String>,
    /// Minimum similarity for the filtered view, in [0, 100]
    pub min_score_threshold: f64,
    /// When the most recent submission was dispatched
    pub last_submitted_at: Option<DateTime<Utc>>,
    /// When the most recent submission settled (success or error)
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Results at or above the current threshold, recomputed per call
    ///
    /// The stored results are never mutated; a result exactly at the
    /// threshold is included.
    pub fn filtered_results(&self) -> Vec<SearchResult> {
        self.results
            .iter()
            .filter(|result| result.similarity >= self.min_score_threshold)
            .cloned()
            .collect()
    }
}
