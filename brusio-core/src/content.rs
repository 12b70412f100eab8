use pulldown_cmark::{html, Parser};
use serde::{Deserialize, Serialize};

/// How stored raw text is turned into a display string.
///
/// The enum is closed on purpose: a new content type means a new variant here
/// and a new arm in [`ContentType::render`], nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Plain,
    #[default]
    Markdown,
}

impl ContentType {
    /// Database column representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Plain => "PLAIN",
            ContentType::Markdown => "MARKDOWN",
        }
    }

    /// Inverse of [`ContentType::as_str`]. `None` for anything else.
    pub fn parse(s: &str) -> Option<ContentType> {
        match s {
            "PLAIN" => Some(ContentType::Plain),
            "MARKDOWN" => Some(ContentType::Markdown),
            _ => None,
        }
    }

    /// Render raw content for display. Pure, never fails: plain text passes
    /// through unchanged, markdown is parsed as CommonMark and serialized to
    /// HTML inside a `<body>` wrapper. Text with no markdown syntax simply
    /// comes out as a paragraph; there is no error path.
    pub fn render(self, content: &str) -> String {
        match self {
            ContentType::Plain => content.to_owned(),
            ContentType::Markdown => {
                let mut out = String::with_capacity(content.len() + 16);
                html::push_html(&mut out, Parser::new(content));
                // push_html terminates each block with a newline; the wire
                // shape is a single <body> element with no trailing break.
                format!("<body>{}</body>", out.trim_end())
            }
        }
    }
}
