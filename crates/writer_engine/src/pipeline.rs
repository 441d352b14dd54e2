use std::path::{Path, PathBuf};

use writer_core::{derive_digest, DraftArticle, DraftHandle, PipelineStage};
use writer_logging::{writer_info, writer_warn};

use crate::client::WeChatClient;
use crate::error::PublishError;
use crate::images::{rewrite_inline_images, ImageRewrite};
use crate::media::{AssetKind, PublishResult, PublishStatus};

/// Everything a single publish run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub article: PathBuf,
    pub title: String,
    pub author: String,
    /// Derived from the article body when absent.
    pub digest: Option<String>,
    pub source_url: String,
    pub cover: PathBuf,
    pub open_comment: bool,
    pub fans_only: bool,
    pub dry_run: bool,
    pub upload_inline_images: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunSummary {
    pub title: String,
    pub author: String,
    pub digest: String,
    pub cover_media_id: String,
    pub content_chars: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub draft: DraftHandle,
    pub result: PublishResult,
    pub status: Option<PublishStatus>,
    pub images: Option<ImageRewrite>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    DryRun(DryRunSummary),
    Published(PublishReport),
}

/// Drives token → cover → draft → publish → status for one article.
///
/// Any failure stops the run where it is and is wrapped in
/// [`PublishError::Halted`]; nothing already uploaded is rolled back.
pub struct PublishPipeline {
    client: WeChatClient,
    stage: PipelineStage,
}

impl PublishPipeline {
    pub fn new(client: WeChatClient) -> Self {
        Self {
            client,
            stage: PipelineStage::NoToken,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Each run starts from [`PipelineStage::NoToken`]; a token cached by an
    /// earlier run on the same client is still reused.
    pub async fn run(&mut self, request: &PublishRequest) -> Result<PipelineOutcome, PublishError> {
        self.stage = PipelineStage::NoToken;
        writer_info!("Loading article: {}", request.article.display());
        let content = load_html(&request.article)?;
        if !request.cover.is_file() {
            return Err(PublishError::FileNotFound(request.cover.clone()));
        }

        let digest = match request.digest.as_deref() {
            Some(digest) if !digest.is_empty() => digest.to_string(),
            _ => derive_digest(&content),
        };

        let result = self.client.acquire_token().await;
        self.complete(PipelineStage::TokenCached, result)?;

        let result = self
            .client
            .upload_asset(&request.cover, AssetKind::Cover)
            .await;
        let cover_media_id = self.complete(PipelineStage::CoverUploaded, result)?.identifier();

        if request.dry_run {
            return Ok(PipelineOutcome::DryRun(DryRunSummary {
                title: request.title.clone(),
                author: request.author.clone(),
                digest,
                cover_media_id,
                content_chars: content.chars().count(),
            }));
        }

        let (content, images) = if request.upload_inline_images {
            let base_dir = request.article.parent().unwrap_or_else(|| Path::new("."));
            let rewrite = rewrite_inline_images(&content, base_dir, &mut self.client)
                .await
                .map_err(|err| self.halt(err))?;
            if rewrite.kept_local > 0 {
                writer_warn!(
                    "{} article image(s) still reference local files",
                    rewrite.kept_local
                );
            }
            (rewrite.html.clone(), Some(rewrite))
        } else {
            (content, None)
        };

        let draft = DraftArticle {
            title: request.title.clone(),
            author: request.author.clone(),
            digest,
            content,
            content_source_url: request.source_url.clone(),
            thumb_media_id: cover_media_id,
            need_open_comment: request.open_comment,
            only_fans_can_comment: request.fans_only,
        };
        let result = self.client.create_draft(&draft).await;
        let handle = self.complete(PipelineStage::DraftCreated, result)?;

        let result = self.client.publish(&handle).await;
        let published = self.complete(PipelineStage::Published, result)?;

        let status = match published.publish_id.as_deref() {
            Some(publish_id) => {
                writer_info!("Checking publish status...");
                tokio::time::sleep(self.client.settings().status_delay).await;
                let result = self.client.get_publish_status(publish_id).await;
                let status = self.complete(PipelineStage::StatusChecked, result)?;
                writer_info!("Status: {} ({})", status.label(), status.raw);
                Some(status)
            }
            None => None,
        };

        Ok(PipelineOutcome::Published(PublishReport {
            draft: handle,
            result: published,
            status,
            images,
        }))
    }

    fn complete<T>(
        &mut self,
        to: PipelineStage,
        result: Result<T, PublishError>,
    ) -> Result<T, PublishError> {
        let value = result.map_err(|err| self.halt(err))?;
        self.stage
            .advance(to)
            .map_err(|err| self.halt(PublishError::Stage(err)))?;
        Ok(value)
    }

    fn halt(&self, err: PublishError) -> PublishError {
        PublishError::Halted {
            stage: self.stage,
            source: Box::new(err),
        }
    }
}

fn load_html(path: &Path) -> Result<String, PublishError> {
    if !path.exists() {
        return Err(PublishError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    })
}
