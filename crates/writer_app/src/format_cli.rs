use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use writer_core::Platform;
use writer_engine::{format_article, FormatRequest, Renderer};

/// Format a Markdown article for publishing platforms.
#[derive(Parser, Debug, Clone)]
#[command(name = "format_article", version, about, long_about = None)]
pub struct FormatArgs {
    /// Path to the Markdown article
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub article: Option<PathBuf>,

    /// Target platform (wechat, zhihu, juejin)
    #[arg(short, long, default_value = "wechat")]
    pub platform: Platform,

    /// Article theme
    #[arg(short, long, default_value = "rose")]
    pub theme: String,

    /// Code highlighting theme
    #[arg(short, long, default_value = "monokai")]
    pub code_theme: String,

    /// Output directory
    #[arg(short, long, default_value = "output", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// List available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

pub fn run(args: &FormatArgs, renderer: &dyn Renderer, out: &mut impl Write) -> Result<()> {
    if args.list_themes {
        return list_themes(renderer, out);
    }

    let article = args
        .article
        .clone()
        .ok_or_else(|| anyhow!("Please specify article path with --article"))?;

    let request = FormatRequest {
        article,
        platform: args.platform,
        theme: args.theme.clone(),
        code_theme: args.code_theme.clone(),
        output_dir: args.output_dir.clone(),
    };
    match format_article(&request, renderer)? {
        Some(path) => writeln!(out, "SUCCESS: Article formatted: {}", path.display())?,
        None => writeln!(out, "SUCCESS: Article formatted successfully")?,
    }
    Ok(())
}

fn list_themes(renderer: &dyn Renderer, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nArticle Themes:")?;
    for theme in renderer.article_themes() {
        writeln!(out, "  - {}: {}", theme.name, theme.display_name)?;
    }
    writeln!(out, "\nCode Themes:")?;
    for theme in renderer.code_themes() {
        writeln!(out, "  - {}: {}", theme.name, theme.display_name)?;
    }
    Ok(())
}
