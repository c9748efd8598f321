//! Purpose: Render a bookmark tree as Netscape Bookmark HTML.
//! Exports: `HtmlOptions`, `TextMode`, `render_bookmarks`, `escape_html`.
//! Role: Small, pure formatter; the last step before the output sink.
//! Invariants: With `TextMode::Verbatim`, output is byte-compatible with existing exports.
//! Invariants: Each nesting level adds exactly one tab; top-level nodes get one.
//! Invariants: No trailing newline after the closing `</DL><p>`.
use std::borrow::Cow;

use crate::core::tree::BookmarkNode;

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>";
const FOOTER: &str = "\n</DL><p>";
const INDENT: char = '\t';

/// How titles and URLs are written into the markup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextMode {
    /// Inserted as-is, matching exports produced by earlier tools.
    #[default]
    Verbatim,
    /// `&`, `<`, `>`, `"` and `'` replaced by entities.
    Escaped,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HtmlOptions {
    pub text: TextMode,
}

impl HtmlOptions {
    pub fn escaped() -> Self {
        Self {
            text: TextMode::Escaped,
        }
    }
}

pub fn render_bookmarks(nodes: &[BookmarkNode], options: HtmlOptions) -> String {
    let mut out = String::from(HEADER);
    write_nodes(nodes, options, &mut out);
    out.push_str(FOOTER);
    out
}

/// Pre-order walk with an explicit stack of sibling iterators, one per open folder.
fn write_nodes(nodes: &[BookmarkNode], options: HtmlOptions, out: &mut String) {
    let mut open = vec![(nodes.iter(), 1usize)];
    while let Some((siblings, level)) = open.last_mut() {
        let level = *level;
        let Some(node) = siblings.next() else {
            open.pop();
            if level > 1 {
                push_line(level - 1, out);
                out.push_str("</DL><p>");
            }
            continue;
        };
        match node {
            BookmarkNode::Folder { title, children } => {
                push_line(level, out);
                out.push_str("<DT><H3>");
                out.push_str(&text(title, options));
                out.push_str("</H3>");
                push_line(level, out);
                out.push_str("<DL><p>");
                open.push((children.iter(), level + 1));
            }
            BookmarkNode::Bookmark { title, url } => {
                push_line(level, out);
                out.push_str("<DT><A HREF=\"");
                out.push_str(&text(url, options));
                out.push_str("\">");
                out.push_str(&text(title, options));
                out.push_str("</A>");
            }
        }
    }
}

fn push_line(level: usize, out: &mut String) {
    out.push('\n');
    for _ in 0..level {
        out.push(INDENT);
    }
}

fn text(value: &str, options: HtmlOptions) -> Cow<'_, str> {
    match options.text {
        TextMode::Verbatim => Cow::Borrowed(value),
        TextMode::Escaped => escape_html(value),
    }
}

pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
