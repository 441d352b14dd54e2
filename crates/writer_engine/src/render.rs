use std::path::{Path, PathBuf};

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_escape::{escape_href, escape_html};
use writer_core::Platform;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::theme::{find_article_theme, find_code_theme, ArticleTheme, CodeTheme, ARTICLE_THEMES, CODE_THEMES};

pub const HTML_EXTENSION: &str = "html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub platform: Platform,
    pub theme: String,
    pub code_theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("unknown code theme: {0}")]
    UnknownCodeTheme(String),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Persist(#[from] PersistError),
}

/// Markdown conversion capability used by the formatter.
///
/// Implementations own the theme catalogue and its validation, and decide the
/// name of the file they write. The formatter only relies on the
/// `{stem}_*.html` naming convention to find it afterwards.
pub trait Renderer: Send + Sync {
    fn article_themes(&self) -> Vec<ThemeEntry>;
    fn code_themes(&self) -> Vec<ThemeEntry>;
    fn render_file(
        &self,
        article: &Path,
        options: &RenderOptions,
        output_dir: &Path,
    ) -> Result<(), RenderError>;
}

/// Renders with pulldown-cmark and inlines theme styles, since the WeChat
/// editor drops `<style>` blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownRenderer;

impl PulldownRenderer {
    pub fn render_html(&self, markdown: &str, options: &RenderOptions) -> Result<String, RenderError> {
        let theme = find_article_theme(&options.theme)
            .ok_or_else(|| RenderError::UnknownTheme(options.theme.clone()))?;
        let code = find_code_theme(&options.code_theme)
            .ok_or_else(|| RenderError::UnknownCodeTheme(options.code_theme.clone()))?;
        let styles = Styles::new(theme, code, options.platform == Platform::Wechat);

        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_FOOTNOTES);
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);

        let events = Parser::new_ext(markdown, opts).map(|event| styles.restyle(event));
        let mut body = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut body, events);

        Ok(format!(
            "<section id=\"nice\" style=\"{}\">\n{}</section>\n",
            styles.section, body
        ))
    }
}

impl Renderer for PulldownRenderer {
    fn article_themes(&self) -> Vec<ThemeEntry> {
        ARTICLE_THEMES
            .iter()
            .map(|t| ThemeEntry {
                name: t.name.to_string(),
                display_name: t.display_name.to_string(),
            })
            .collect()
    }

    fn code_themes(&self) -> Vec<ThemeEntry> {
        CODE_THEMES
            .iter()
            .map(|t| ThemeEntry {
                name: t.name.to_string(),
                display_name: t.display_name.to_string(),
            })
            .collect()
    }

    /// Writes `{stem}_{platform}.html` into `output_dir`.
    fn render_file(
        &self,
        article: &Path,
        options: &RenderOptions,
        output_dir: &Path,
    ) -> Result<(), RenderError> {
        let markdown = std::fs::read_to_string(article).map_err(|source| RenderError::Read {
            path: article.to_path_buf(),
            source,
        })?;
        let html = self.render_html(&markdown, options)?;
        let stem = article
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "article".to_string());
        let filename = format!("{stem}_{}.{HTML_EXTENSION}", options.platform);
        AtomicFileWriter::new(output_dir.to_path_buf()).write(&filename, &html)?;
        Ok(())
    }
}

struct Styles {
    section: String,
    paragraph: String,
    headings: [String; 6],
    blockquote: String,
    link: String,
    pre: String,
    block_code: String,
    inline_code: String,
    mac_bar: Option<String>,
}

impl Styles {
    fn new(theme: &ArticleTheme, code: &CodeTheme, mac_style: bool) -> Self {
        let heading = |size: &str| {
            format!(
                "margin: 1.2em 0 0.8em; font-size: {size}; font-weight: bold; color: {};",
                theme.accent
            )
        };
        Self {
            section: format!(
                "font-size: 16px; color: {}; line-height: 1.75; letter-spacing: 0.05em; \
                 word-break: break-word; padding: 0 10px;",
                theme.text
            ),
            paragraph: format!("margin: 1em 0; color: {};", theme.text),
            headings: [
                heading("24px"),
                heading("22px"),
                heading("20px"),
                heading("18px"),
                heading("16px"),
                heading("16px"),
            ],
            blockquote: format!(
                "margin: 1em 0; padding: 10px 15px; border-left: 4px solid {}; background: {}; color: #666666;",
                theme.accent, theme.quote_background
            ),
            link: format!("color: {}; text-decoration: none; border-bottom: 1px solid {};", theme.accent, theme.accent),
            pre: format!(
                "margin: 1em 0; padding: 0; border-radius: 5px; overflow-x: auto; background: {};",
                code.background
            ),
            block_code: format!(
                "display: block; padding: 12px 15px; font-size: 13px; line-height: 1.6; \
                 white-space: pre; font-family: Consolas, Monaco, Menlo, monospace; color: {};",
                code.foreground
            ),
            inline_code: format!(
                "padding: 2px 4px; margin: 0 2px; border-radius: 4px; font-size: 90%; \
                 color: {}; background: rgba(27, 31, 35, 0.05);",
                theme.accent
            ),
            mac_bar: mac_style.then(mac_bar),
        }
    }

    fn restyle<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::Paragraph) => raw(format!("<p style=\"{}\">", self.paragraph)),
            Event::Start(Tag::Heading { level, .. }) => {
                let n = level as usize;
                raw(format!("<h{n} style=\"{}\">", self.headings[n - 1]))
            }
            Event::Start(Tag::BlockQuote(_)) => {
                raw(format!("<blockquote style=\"{}\">\n", self.blockquote))
            }
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(" title=\"{}\"", html_text(&title))
                };
                raw(format!(
                    "<a href=\"{}\"{title_attr} style=\"{}\">",
                    href(&dest_url),
                    self.link
                ))
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let class = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        format!(" class=\"language-{}\"", html_text(lang.split(' ').next().unwrap_or("")))
                    }
                    _ => String::new(),
                };
                raw(format!(
                    "<pre style=\"{}\">{}<code{class} style=\"{}\">",
                    self.pre,
                    self.mac_bar.as_deref().unwrap_or(""),
                    self.block_code
                ))
            }
            Event::End(TagEnd::CodeBlock) => raw("</code></pre>\n".to_string()),
            Event::Code(text) => raw(format!(
                "<code style=\"{}\">{}</code>",
                self.inline_code,
                html_text(&text)
            )),
            other => other,
        }
    }
}

fn raw<'a>(html: String) -> Event<'a> {
    Event::Html(CowStr::from(html))
}

/// Traffic-light dots shown above code blocks in WeChat output.
fn mac_bar() -> String {
    let dot = |color: &str| {
        format!(
            "<span style=\"display: inline-block; width: 12px; height: 12px; \
             border-radius: 50%; margin-right: 6px; background: {color};\"></span>"
        )
    };
    format!(
        "<span style=\"display: block; padding: 10px 15px 0;\">{}{}{}</span>",
        dot("#ff5f56"),
        dot("#ffbd2e"),
        dot("#27c93f")
    )
}

fn html_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let _ = escape_html(&mut out, text);
    out
}

/// Percent-encodes and HTML-escapes a link target.
fn href(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let _ = escape_href(&mut out, url);
    out
}
