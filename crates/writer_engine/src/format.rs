use std::path::{Path, PathBuf};

use glob::Pattern;
use writer_core::Platform;
use writer_logging::{writer_debug, writer_info};

use crate::render::{RenderError, RenderOptions, Renderer, HTML_EXTENSION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub article: PathBuf,
    pub platform: Platform,
    pub theme: String,
    pub code_theme: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("article not found: {}", .0.display())]
    ArticleNotFound(PathBuf),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("invalid output pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Render an article and locate the file the renderer produced.
///
/// Returns `Ok(None)` when rendering succeeded but nothing matches
/// `{stem}_*.html` in the output directory.
pub fn format_article(
    request: &FormatRequest,
    renderer: &dyn Renderer,
) -> Result<Option<PathBuf>, FormatError> {
    if !request.article.is_file() {
        return Err(FormatError::ArticleNotFound(request.article.clone()));
    }

    writer_info!(
        "Formatting article: {}",
        request
            .article
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    writer_info!("Platform: {}", request.platform);
    writer_info!("Theme: {}", request.theme);

    let options = RenderOptions {
        platform: request.platform,
        theme: request.theme.clone(),
        code_theme: request.code_theme.clone(),
    };
    renderer.render_file(&request.article, &options, &request.output_dir)?;

    let stem = request
        .article
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(find_generated(&request.output_dir, &stem)?)
}

/// First file (in path order) matching `{output_dir}/{stem}_*.html`.
pub fn find_generated(output_dir: &Path, stem: &str) -> Result<Option<PathBuf>, glob::PatternError> {
    let pattern = format!(
        "{}/{}_*.{HTML_EXTENSION}",
        Pattern::escape(&output_dir.to_string_lossy()),
        Pattern::escape(stem)
    );
    writer_debug!("Looking for generated output with pattern {}", pattern);
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}
