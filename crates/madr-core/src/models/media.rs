use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file picked for upload, held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

/// Where a banner or gallery image comes from: a fresh upload sent in the
/// same multipart form, or a URL that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MediaSource {
    File(UploadFile),
    Url(String),
}

impl MediaSource {
    pub fn is_blank(&self) -> bool {
        match self {
            MediaSource::File(file) => file.bytes.is_empty(),
            MediaSource::Url(url) => url.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
}

impl UploadResponse {
    /// Public address of the stored file: `url`, then `public_url`.
    pub fn resolved_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.public_url.as_deref().filter(|u| !u.is_empty()))
    }
}
