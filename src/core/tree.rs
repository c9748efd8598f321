//! Purpose: Resolve the flat parent-pointer item list into a folder/bookmark tree.
//! Exports: `BookmarkNode`, `TreeStats`, `TreeBuilder`.
//! Role: Graph-to-tree step of the conversion pipeline; owns no I/O.
//! Invariants: Children keep item-list order (first occurrence of an ID fixes its slot).
//! Invariants: Tab data always yields a bookmark; untitled non-tab items are dropped with
//!             their whole subtree.
//! Invariants: A parent-pointer cycle reachable from a root is an error, not a recursion.
//! Invariants: Folders nest at most `MAX_FOLDER_DEPTH` levels below a root; deeper is an error.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::core::error::Error;
use crate::core::sidebar::{ItemEntry, ItemId, RawItem};
use crate::core::spaces::SpaceIndex;

/// Deepest folder chain accepted below a space root.
pub const MAX_FOLDER_DEPTH: usize = 256;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BookmarkNode {
    Folder {
        title: String,
        children: Vec<BookmarkNode>,
    },
    Bookmark {
        title: String,
        url: String,
    },
}

impl BookmarkNode {
    pub fn title(&self) -> &str {
        match self {
            BookmarkNode::Folder { title, .. } | BookmarkNode::Bookmark { title, .. } => title,
        }
    }

    pub fn children(&self) -> &[BookmarkNode] {
        match self {
            BookmarkNode::Folder { children, .. } => children,
            BookmarkNode::Bookmark { .. } => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    /// Folders emitted, including one per pinned space.
    pub folders: usize,
    pub bookmarks: usize,
    /// Reached items with neither tab data nor a title.
    pub dropped: usize,
}

pub struct TreeBuilder<'a> {
    children: HashMap<&'a ItemId, Vec<&'a RawItem>>,
    stats: TreeStats,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(items: &'a [ItemEntry]) -> Self {
        // Last write wins per ID, but the first occurrence keeps its position.
        let mut by_id: IndexMap<Option<&'a ItemId>, &'a RawItem> = IndexMap::new();
        let mut skipped = 0usize;
        for entry in items {
            match entry.as_item() {
                Some(item) => {
                    by_id.insert(item.id.as_ref(), item);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "ignoring non-object item entries");
        }

        let mut children: HashMap<&'a ItemId, Vec<&'a RawItem>> = HashMap::new();
        for item in by_id.into_values() {
            if let Some(parent) = item.parent_id.as_ref() {
                children.entry(parent).or_default().push(item);
            }
        }

        Self {
            children,
            stats: TreeStats::default(),
        }
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// One folder per pinned space, in space-index order.
    pub fn build(&mut self, spaces: &SpaceIndex) -> Result<Vec<BookmarkNode>, Error> {
        let mut roots = Vec::with_capacity(spaces.pinned.len());
        for (root, title) in spaces.pinned_roots() {
            let children = self.children_of(root)?;
            self.stats.folders += 1;
            roots.push(BookmarkNode::Folder {
                title: title.to_string(),
                children,
            });
        }
        tracing::info!(
            bookmarks = self.stats.bookmarks,
            folders = self.stats.folders,
            dropped = self.stats.dropped,
            "> Found {} bookmarks.",
            self.stats.bookmarks
        );
        Ok(roots)
    }

    /// Direct and transitive children of `root`.
    pub fn children_of(&mut self, root: &ItemId) -> Result<Vec<BookmarkNode>, Error> {
        let mut ancestors = HashSet::new();
        ancestors.insert(root.clone());
        self.collect(root, &mut ancestors)
    }

    fn collect(
        &mut self,
        parent: &ItemId,
        ancestors: &mut HashSet<ItemId>,
    ) -> Result<Vec<BookmarkNode>, Error> {
        let Some(items) = self.children.get(parent).cloned() else {
            return Ok(Vec::new());
        };

        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            if let Some(tab) = &item.tab {
                let title = item
                    .title
                    .clone()
                    .or_else(|| tab.saved_title.clone())
                    .unwrap_or_default();
                let url = tab.saved_url.clone().unwrap_or_default();
                self.stats.bookmarks += 1;
                nodes.push(BookmarkNode::Bookmark { title, url });
            } else if let Some(title) = &item.title {
                let children = match &item.id {
                    Some(id) => self.folder_children(id, ancestors)?,
                    None => Vec::new(),
                };
                self.stats.folders += 1;
                nodes.push(BookmarkNode::Folder {
                    title: title.clone(),
                    children,
                });
            } else {
                tracing::debug!(
                    id = item.id.as_ref().map(ItemId::as_str),
                    parent = parent.as_str(),
                    "dropping untitled item and its subtree"
                );
                self.stats.dropped += 1;
            }
        }
        Ok(nodes)
    }

    fn folder_children(
        &mut self,
        id: &ItemId,
        ancestors: &mut HashSet<ItemId>,
    ) -> Result<Vec<BookmarkNode>, Error> {
        if ancestors.contains(id) {
            return Err(Error::malformed(format!(
                "parent-pointer cycle through item {id}"
            ))
            .with_hint("The sidebar file links an item to one of its own descendants."));
        }
        if ancestors.len() > MAX_FOLDER_DEPTH {
            return Err(Error::malformed(format!(
                "folder nesting deeper than {MAX_FOLDER_DEPTH} levels at item {id}"
            ))
            .with_hint("The sidebar file nests folders deeper than any Arc export would."));
        }
        ancestors.insert(id.clone());
        let children = self.collect(id, ancestors);
        ancestors.remove(id);
        children
    }
}
