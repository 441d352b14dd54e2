use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use pulldown_cmark_escape::escape_html;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use url::Url;
use writer_logging::{writer_debug, writer_warn};

use crate::client::WeChatClient;
use crate::error::PublishError;
use crate::media::{AssetKind, MediaAsset};

/// Uploads images referenced from an article body.
#[async_trait::async_trait]
pub trait ImageUploader: Send {
    async fn upload_content_image(&mut self, path: &Path) -> Result<MediaAsset, PublishError>;
}

#[async_trait::async_trait]
impl ImageUploader for WeChatClient {
    async fn upload_content_image(&mut self, path: &Path) -> Result<MediaAsset, PublishError> {
        self.upload_asset(path, AssetKind::InlineContent).await
    }
}

/// The `src` attribute of an `<img>` tag, split into everything up to the
/// value and the value as written (double, single or unquoted).
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?P<head><img\b[^>]*?[\s/]src\s*=\s*)(?P<value>"[^"]*"|'[^']*'|[^\s"'=<>`]+)"#,
    )
    .expect("static img src pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRewrite {
    pub html: String,
    pub uploaded: usize,
    pub kept_local: usize,
}

/// Distinct `<img src>` values that point at local files, in document order.
pub fn local_image_sources(html: &str) -> Vec<String> {
    let doc = Html::parse_fragment(html);
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };
    let mut sources: Vec<String> = Vec::new();
    for src in doc.select(&selector).filter_map(|img| img.value().attr("src")) {
        let src = src.trim();
        if resolve_local(src, Path::new("")).is_some() && !sources.iter().any(|s| s == src) {
            sources.push(src.to_string());
        }
    }
    sources
}

/// Uploads every local image and points its `src` at the hosted copy.
///
/// Relative paths resolve against `base_dir`. Missing files and failed uploads
/// keep their original `src`; only errors the uploader treats as fatal
/// (for example an authentication failure) are returned.
pub async fn rewrite_inline_images(
    html: &str,
    base_dir: &Path,
    uploader: &mut dyn ImageUploader,
) -> Result<ImageRewrite, PublishError> {
    let mut rewritten = html.to_string();
    let mut uploaded = 0;
    let mut kept_local = 0;

    for src in local_image_sources(html) {
        let Some(path) = resolve_local(&src, base_dir) else {
            continue;
        };
        if !path.is_file() {
            writer_warn!("Article image not found, keeping reference: {}", path.display());
            kept_local += 1;
            continue;
        }
        match uploader.upload_content_image(&path).await? {
            MediaAsset::ContentImage { url } => {
                let (updated, replaced) = replace_src(&rewritten, &src, &url);
                if replaced == 0 {
                    writer_warn!("Uploaded {} but found no src attribute to rewrite", src);
                    kept_local += 1;
                    continue;
                }
                writer_debug!("Rewrote {} reference(s) {} -> {}", replaced, src, url);
                rewritten = updated;
                uploaded += 1;
            }
            _ => kept_local += 1,
        }
    }

    Ok(ImageRewrite {
        html: rewritten,
        uploaded,
        kept_local,
    })
}

fn resolve_local(src: &str, base_dir: &Path) -> Option<PathBuf> {
    if src.is_empty() || src.starts_with("data:") || src.starts_with("//") {
        return None;
    }
    match Url::parse(src) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Ok(_) => None,
        Err(_) => Some(base_dir.join(src)),
    }
}

/// Points every `<img>` whose decoded `src` equals `from` at `to`.
///
/// Returns the new HTML and how many attributes changed.
fn replace_src(html: &str, from: &str, to: &str) -> (String, usize) {
    let mut escaped = String::with_capacity(to.len());
    let _ = escape_html(&mut escaped, to);

    let mut replaced = 0;
    let rewritten = IMG_SRC.replace_all(html, |caps: &Captures| {
        if decode_src(&caps["value"]).as_deref() == Some(from) {
            replaced += 1;
            format!("{}\"{}\"", &caps["head"], escaped)
        } else {
            caps[0].to_string()
        }
    });
    (rewritten.into_owned(), replaced)
}

/// Decodes a raw attribute value the way the HTML parser sees it.
fn decode_src(raw: &str) -> Option<String> {
    let doc = Html::parse_fragment(&format!("<img src={raw}>"));
    let selector = Selector::parse("img[src]").ok()?;
    doc.select(&selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.trim().to_string())
}
