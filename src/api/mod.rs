//! Purpose: Define the public Rust API boundary for arcmark.
//! Exports: Conversion entry points, tree/report types, rendering options, errors.
//! Role: Additive-only surface used by the CLI and integration tests.
//! Invariants: This module is the only public path to the core modules.

pub use crate::core::error::{Error, ErrorKind, io_error_kind, to_exit_code};
pub use crate::core::html::{HtmlOptions, TextMode, escape_html, render_bookmarks};
pub use crate::core::pipeline::{
    Conversion, ConversionReport, bookmark_tree, convert_document, convert_str,
};
pub use crate::core::sidebar::{
    ContainerMarker, ItemEntry, ItemId, RawItem, SidebarContainer, SpaceEntry, SpaceRecord,
    TabData, decode_container, locate_container,
};
pub use crate::core::spaces::{SpaceIndex, index_spaces};
pub use crate::core::tree::{BookmarkNode, MAX_FOLDER_DEPTH, TreeBuilder, TreeStats};
