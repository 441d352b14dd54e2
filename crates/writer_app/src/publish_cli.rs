use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use writer_core::DEFAULT_AUTHOR;
use writer_engine::{
    Credentials, PipelineOutcome, PublishPipeline, PublishRequest, WeChatClient, WeChatSettings,
    DEFAULT_API_BASE,
};
use writer_logging::writer_debug;

/// Publish an HTML article to a WeChat Official Account.
#[derive(Parser, Debug, Clone)]
#[command(name = "publish_wechat", version, about, long_about = None)]
pub struct PublishArgs {
    /// Path to the article HTML file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub article: PathBuf,

    /// Article title
    #[arg(long)]
    pub title: String,

    /// Author name
    #[arg(long, default_value = DEFAULT_AUTHOR)]
    pub author: String,

    /// Article summary (derived from the article when omitted)
    #[arg(long)]
    pub digest: Option<String>,

    /// Original article URL
    #[arg(long)]
    pub source_url: Option<String>,

    /// Path to the cover image
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub cover: PathBuf,

    /// WeChat App ID
    #[arg(long, env = "WECHAT_APP_ID", hide_env_values = true)]
    pub app_id: Option<String>,

    /// WeChat App Secret
    #[arg(long, env = "WECHAT_APP_SECRET", hide_env_values = true)]
    pub app_secret: Option<String>,

    /// Open comments (0=close, 1=open)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub open_comment: u8,

    /// Fans only comment (0=all, 1=fans)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub fans_only: u8,

    /// Upload the cover to validate credentials, then stop before drafting
    #[arg(long)]
    pub dry_run: bool,

    /// Leave local <img> references untouched instead of uploading them
    #[arg(long)]
    pub keep_local_images: bool,

    /// API base URL
    #[arg(long, env = "WECHAT_API_BASE", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

impl PublishArgs {
    pub fn to_request(&self) -> PublishRequest {
        PublishRequest {
            article: self.article.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            digest: self.digest.clone(),
            source_url: self.source_url.clone().unwrap_or_default(),
            cover: self.cover.clone(),
            open_comment: self.open_comment == 1,
            fans_only: self.fans_only == 1,
            dry_run: self.dry_run,
            upload_inline_images: !self.keep_local_images,
        }
    }
}

pub async fn run(args: &PublishArgs, out: &mut impl Write) -> Result<()> {
    let credentials = Credentials::new(args.app_id.clone(), args.app_secret.clone())?;
    writer_debug!("Using app id {}", credentials.app_id());

    let settings = WeChatSettings {
        base_url: args.api_base.clone(),
        ..WeChatSettings::default()
    };
    let client = WeChatClient::new(credentials, settings)?;
    let mut pipeline = PublishPipeline::new(client);

    match pipeline.run(&args.to_request()).await? {
        PipelineOutcome::DryRun(summary) => {
            writeln!(out, "\nDry run completed. Would publish:")?;
            writeln!(out, "  Title: {}", summary.title)?;
            writeln!(out, "  Author: {}", summary.author)?;
            writeln!(out, "  Digest: {}", summary.digest)?;
            writeln!(out, "  Cover: {}", summary.cover_media_id)?;
            writeln!(out, "  Content length: {} chars", summary.content_chars)?;
        }
        PipelineOutcome::Published(report) => {
            writeln!(out, "Article published successfully!")?;
            writeln!(out, "  Draft: {}", report.draft)?;
            writeln!(
                out,
                "  Publish ID: {}",
                report.result.publish_id.as_deref().unwrap_or("<none>")
            )?;
            if let Some(images) = &report.images {
                writeln!(
                    out,
                    "  Images: {} uploaded, {} kept local",
                    images.uploaded, images.kept_local
                )?;
            }
            if let Some(status) = &report.status {
                writeln!(out, "  Status: {} {}", status.label(), status.raw)?;
            }
            writeln!(
                out,
                "\nNote: Article is visible in 'View History' but no push notification was sent."
            )?;
        }
    }
    Ok(())
}
