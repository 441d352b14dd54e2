use serde::{Serialize, Serializer};

/// Author used when none is given on the command line.
pub const DEFAULT_AUTHOR: &str = "技术编辑";

/// One article of a draft submission.
///
/// Field names follow the draft API; the two comment switches go over the
/// wire as `0`/`1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftArticle {
    pub title: String,
    pub author: String,
    pub digest: String,
    pub content: String,
    pub content_source_url: String,
    pub thumb_media_id: String,
    #[serde(serialize_with = "as_flag")]
    pub need_open_comment: bool,
    #[serde(serialize_with = "as_flag")]
    pub only_fans_can_comment: bool,
}

#[derive(Serialize)]
struct DraftEnvelope<'a> {
    articles: [&'a DraftArticle; 1],
}

impl DraftArticle {
    /// Serializes the `{"articles": [...]}` request body as UTF-8 JSON.
    ///
    /// Non-ASCII text is written verbatim rather than as `\u` escapes.
    pub fn to_request_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&DraftEnvelope { articles: [self] })
    }
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Identifier of a created draft (`media_id` in the draft API).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftHandle(pub String);

impl DraftHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DraftHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
