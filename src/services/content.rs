//! One item of a batch submission, carrying its own upload outcome so that
//! partial failure stays a first-class result.

use std::path::PathBuf;

use uuid::Uuid;

/// Prefix of generated source ids, so callers can tell a generated
/// correlation id from one they supplied themselves.
pub const CUSTOM_ID_PREFIX: &str = "CUSTOM_ID-";

pub fn custom_source_id() -> String {
    format!("{CUSTOM_ID_PREFIX}{}", Uuid::new_v4())
}

#[derive(Debug, Clone)]
enum ContentBody {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Content submitted for processing, identified by a caller-supplied source
/// id (or a generated one). Upload success/failure and the server-assigned
/// object key are recorded per item; items that failed their upload step
/// are excluded from the processing request.
#[derive(Debug, Clone)]
pub struct ContentToProcess {
    source_id: String,
    mime_type: String,
    body: ContentBody,
    object_key: Option<String>,
    error_message: Option<String>,
    uploaded: bool,
}

impl ContentToProcess {
    pub fn from_file(
        source_id: Option<String>,
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.filter(|s| !s.trim().is_empty()).unwrap_or_else(custom_source_id),
            mime_type: mime_type.into(),
            body: ContentBody::File(path.into()),
            object_key: None,
            error_message: None,
            uploaded: false,
        }
    }

    pub fn from_bytes(
        source_id: Option<String>,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.filter(|s| !s.trim().is_empty()).unwrap_or_else(custom_source_id),
            mime_type: mime_type.into(),
            body: ContentBody::Bytes(bytes),
            object_key: None,
            error_message: None,
            uploaded: false,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn object_key(&self) -> Option<&str> {
        self.object_key.as_deref()
    }

    /// True once the item's upload step completed.
    pub fn is_processing_success(&self) -> bool {
        self.uploaded
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub(crate) fn set_object_key(&mut self, object_key: String) {
        self.object_key = Some(object_key);
    }

    pub(crate) fn mark_uploaded(&mut self) {
        self.uploaded = true;
        self.error_message = None;
    }

    pub(crate) fn mark_failed(&mut self, message: String) {
        self.uploaded = false;
        self.error_message = Some(message);
    }

    pub(crate) async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.body {
            ContentBody::Bytes(bytes) => Ok(bytes.clone()),
            ContentBody::File(path) => tokio::fs::read(path).await,
        }
    }
}
