use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Article cover; stored as permanent material and referenced by `media_id`.
    Cover,
    /// Image embedded in the article body; referenced by `url`.
    InlineContent,
}

/// Identifier handed back by the platform for uploaded local content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaAsset {
    Cover { media_id: String },
    ContentImage { url: String },
    /// A content image upload failed; the original local path is kept.
    LocalFallback { path: PathBuf },
}

impl MediaAsset {
    /// The string later calls expect: media id, image url, or the local path.
    pub fn identifier(&self) -> String {
        match self {
            MediaAsset::Cover { media_id } => media_id.clone(),
            MediaAsset::ContentImage { url } => url.clone(),
            MediaAsset::LocalFallback { path } => path.display().to_string(),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        !matches!(self, MediaAsset::LocalFallback { .. })
    }
}

/// Result of submitting a draft for publication.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub publish_id: Option<String>,
    pub msg_data_id: Option<String>,
    pub raw: Value,
}

/// Raw payload of a publish status query.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishStatus {
    pub raw: Value,
}

impl PublishStatus {
    pub fn code(&self) -> Option<i64> {
        self.raw.get("publish_status").and_then(Value::as_i64)
    }

    pub fn label(&self) -> &'static str {
        match self.code() {
            Some(0) => "published",
            Some(1) => "publishing",
            Some(2) => "originality check failed",
            Some(3) => "failed",
            Some(4) => "rejected by platform review",
            Some(5) => "deleted after publishing",
            Some(6) => "banned after publishing",
            Some(_) => "unknown status",
            None => "no status reported",
        }
    }
}

/// Reads an identifier that the API may send either as a string or a number.
pub(crate) fn id_field(response: &Value, field: &str) -> Option<String> {
    match response.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn guess_image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
