//! Purpose: Resolve each space's positional marker list into root-container mappings.
//! Exports: `SpaceIndex`, `index_spaces`.
//! Role: The one place that knows a tag object refers to the element after it.
//! Invariants: Auto-named spaces are "Space {n}", `n` counting only auto-named object spaces.
//! Invariants: A repeated container ID keeps its first position and takes the latest title.
//! Invariants: `pinned` is checked before `unpinned` on the same tag object.
use indexmap::IndexMap;

use crate::core::sidebar::{ContainerMarker, ItemId, SpaceEntry, SpaceRecord};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpaceIndex {
    pub pinned: IndexMap<ItemId, String>,
    pub unpinned: IndexMap<ItemId, String>,
    /// Object-shaped spaces seen, including ones without any root.
    pub spaces_seen: usize,
}

impl SpaceIndex {
    /// Pinned roots in index order, each with its space title.
    pub fn pinned_roots(&self) -> impl Iterator<Item = (&ItemId, &str)> {
        self.pinned.iter().map(|(id, title)| (id, title.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RootKind {
    Pinned,
    Unpinned,
}

pub fn index_spaces(spaces: &[SpaceEntry]) -> SpaceIndex {
    let mut index = SpaceIndex::default();
    let mut auto_named = 0usize;

    for entry in spaces {
        let SpaceEntry::Space(space) = entry else {
            tracing::debug!("skipping non-object space entry");
            continue;
        };
        let title = match &space.title {
            Some(title) => title.clone(),
            None => {
                auto_named += 1;
                format!("Space {auto_named}")
            }
        };

        for (kind, id) in space_roots(space, &title) {
            let target = match kind {
                RootKind::Pinned => &mut index.pinned,
                RootKind::Unpinned => &mut index.unpinned,
            };
            target.insert(id.clone(), title.clone());
        }
        index.spaces_seen += 1;
    }

    tracing::info!(
        spaces = index.spaces_seen,
        pinned = index.pinned.len(),
        unpinned = index.unpinned.len(),
        "> Found {} spaces.",
        index.spaces_seen
    );
    index
}

/// Pair every tag marker with the identity that follows it.
fn space_roots<'a>(space: &'a SpaceRecord, title: &str) -> Vec<(RootKind, &'a ItemId)> {
    let mut roots = Vec::new();
    for (pos, marker) in space.markers.iter().enumerate() {
        let kind = match marker {
            ContainerMarker::Pinned => RootKind::Pinned,
            ContainerMarker::Unpinned => RootKind::Unpinned,
            _ => continue,
        };
        match space.markers.get(pos + 1) {
            Some(ContainerMarker::Id(id)) => roots.push((kind, id)),
            Some(_) => {
                tracing::warn!(
                    space = title,
                    pos,
                    "space marker is not followed by a container id"
                );
            }
            None => {
                tracing::warn!(
                    space = title,
                    pos,
                    "space marker is the last element; no container id"
                );
            }
        }
    }
    roots
}
