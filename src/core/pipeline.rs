//! Purpose: Compose locate → index → build → render into one conversion call.
//! Exports: `Conversion`, `ConversionReport`, `bookmark_tree`, `convert_document`, `convert_str`.
//! Role: Pure core entry point used by the CLI; performs no file or console I/O.
//! Invariants: Only pinned spaces are expanded; one top-level folder per pinned root.
//! Invariants: HTML is fully rendered in memory before any caller writes it.
use serde::Serialize;
use serde_json::Value;

use crate::core::error::Error;
use crate::core::html::{HtmlOptions, render_bookmarks};
use crate::core::sidebar::{decode_container, locate_container};
use crate::core::spaces::index_spaces;
use crate::core::tree::{BookmarkNode, TreeBuilder};
use crate::json::parse;

/// Counts gathered during one conversion, for receipts and diagnostics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ConversionReport {
    pub spaces: usize,
    pub pinned: usize,
    pub unpinned: usize,
    pub folders: usize,
    pub bookmarks: usize,
    pub dropped: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conversion {
    pub html: String,
    pub report: ConversionReport,
}

pub fn bookmark_tree(document: &Value) -> Result<(Vec<BookmarkNode>, ConversionReport), Error> {
    let container = decode_container(locate_container(document)?)?;
    let spaces = index_spaces(&container.spaces);

    let mut builder = TreeBuilder::new(&container.items);
    let roots = builder.build(&spaces)?;
    let stats = builder.stats();

    let report = ConversionReport {
        spaces: spaces.spaces_seen,
        pinned: spaces.pinned.len(),
        unpinned: spaces.unpinned.len(),
        folders: stats.folders,
        bookmarks: stats.bookmarks,
        dropped: stats.dropped,
    };
    Ok((roots, report))
}

pub fn convert_document(document: &Value, options: HtmlOptions) -> Result<Conversion, Error> {
    let (roots, report) = bookmark_tree(document)?;
    let html = render_bookmarks(&roots, options);
    tracing::info!(bytes = html.len(), "> HTML converted.");
    Ok(Conversion { html, report })
}

pub fn convert_str(input: &str, options: HtmlOptions) -> Result<Conversion, Error> {
    let document: Value =
        parse::from_str(input).map_err(|err| parse::parse_error(err, "sidebar document"))?;
    convert_document(&document, options)
}
