//! Writer engine: WeChat publishing client, publish pipeline, and Markdown formatting.
mod client;
mod error;
mod format;
mod images;
mod media;
mod persist;
mod pipeline;
mod render;
pub mod theme;

pub use client::{Credentials, WeChatClient, WeChatSettings, DEFAULT_API_BASE};
pub use error::{Operation, PublishError};
pub use format::{find_generated, format_article, FormatError, FormatRequest};
pub use images::{local_image_sources, rewrite_inline_images, ImageRewrite, ImageUploader};
pub use media::{AssetKind, MediaAsset, PublishResult, PublishStatus};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{DryRunSummary, PipelineOutcome, PublishPipeline, PublishReport, PublishRequest};
pub use render::{PulldownRenderer, RenderError, RenderOptions, Renderer, ThemeEntry, HTML_EXTENSION};
