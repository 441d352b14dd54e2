//! Built-in article and code themes for [`crate::PulldownRenderer`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleTheme {
    pub name: &'static str,
    pub display_name: &'static str,
    /// Headings, links, blockquote border.
    pub accent: &'static str,
    pub text: &'static str,
    pub quote_background: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTheme {
    pub name: &'static str,
    pub display_name: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const ARTICLE_THEMES: &[ArticleTheme] = &[
    ArticleTheme {
        name: "default",
        display_name: "Default",
        accent: "#333333",
        text: "#3f3f3f",
        quote_background: "#f7f7f7",
    },
    ArticleTheme {
        name: "rose",
        display_name: "Rose Purple",
        accent: "#9f3c8f",
        text: "#3f3f3f",
        quote_background: "#fbf3fa",
    },
    ArticleTheme {
        name: "lapis",
        display_name: "Lapis Blue",
        accent: "#3a6fc4",
        text: "#40464f",
        quote_background: "#f1f5fc",
    },
    ArticleTheme {
        name: "orange",
        display_name: "Orange Heart",
        accent: "#ef7060",
        text: "#3e3e3e",
        quote_background: "#fff5f3",
    },
    ArticleTheme {
        name: "green",
        display_name: "Fresh Green",
        accent: "#35b378",
        text: "#3e3e3e",
        quote_background: "#f2fbf6",
    },
];

pub const CODE_THEMES: &[CodeTheme] = &[
    CodeTheme {
        name: "monokai",
        display_name: "Monokai",
        background: "#272822",
        foreground: "#f8f8f2",
    },
    CodeTheme {
        name: "github",
        display_name: "GitHub",
        background: "#f6f8fa",
        foreground: "#24292e",
    },
    CodeTheme {
        name: "atom-one-dark",
        display_name: "Atom One Dark",
        background: "#282c34",
        foreground: "#abb2bf",
    },
    CodeTheme {
        name: "dracula",
        display_name: "Dracula",
        background: "#282a36",
        foreground: "#f8f8f2",
    },
];

pub fn find_article_theme(name: &str) -> Option<&'static ArticleTheme> {
    ARTICLE_THEMES.iter().find(|theme| theme.name == name)
}

pub fn find_code_theme(name: &str) -> Option<&'static CodeTheme> {
    CODE_THEMES.iter().find(|theme| theme.name == name)
}
