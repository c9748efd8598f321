//! Purpose: Decode the vendor sidebar document into typed, tolerant records.
//! Exports: `ItemId`, `ContainerMarker`, `SpaceEntry`, `SpaceRecord`, `ItemEntry`, `RawItem`,
//!          `TabData`, `SidebarContainer`, `locate_container`, `decode_container`.
//! Role: Ingestion boundary; downstream code sees tagged variants, never raw `Value` shapes.
//! Invariants: The container is the first `sidebar.containers` entry with `topAppsContainerIDs`.
//! Invariants: Non-object spaces/items decode to `Other` and are never errors.
//! Invariants: Only missing/non-array `containers`, `spaces`, `items` are shape errors.
use std::fmt;

use serde_json::{Map, Value};

use crate::core::error::Error;

/// Marker key identifying the container that owns the space list.
pub const TOP_APPS_KEY: &str = "topAppsContainerIDs";

/// Opaque identity of an item or root container.
///
/// Strings and numbers both decode to the same textual form so `"7"` and `7`
/// refer to one identity.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self(text.clone())),
            Value::Number(num) => Some(Self(num.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of a space's `newContainerIDs` sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContainerMarker {
    /// Tag object: the next element is the space's pinned root.
    Pinned,
    /// Tag object: the next element is the space's unpinned root.
    Unpinned,
    /// Tag object carrying neither key.
    OtherTag,
    Id(ItemId),
    Other,
}

impl ContainerMarker {
    pub fn from_value(value: &Value) -> Self {
        match value {
            // `pinned` wins when both keys are present.
            Value::Object(map) if map.contains_key("pinned") => ContainerMarker::Pinned,
            Value::Object(map) if map.contains_key("unpinned") => ContainerMarker::Unpinned,
            Value::Object(_) => ContainerMarker::OtherTag,
            other => ItemId::from_value(other)
                .map(ContainerMarker::Id)
                .unwrap_or(ContainerMarker::Other),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpaceRecord {
    pub title: Option<String>,
    pub markers: Vec<ContainerMarker>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SpaceEntry {
    Space(SpaceRecord),
    Other,
}

impl SpaceEntry {
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return SpaceEntry::Other;
        };
        let markers = match map.get("newContainerIDs") {
            Some(Value::Array(values)) => values.iter().map(ContainerMarker::from_value).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                tracing::debug!("space newContainerIDs is not an array; treating as empty");
                Vec::new()
            }
        };
        SpaceEntry::Space(SpaceRecord {
            title: non_empty_str(map, "title"),
            markers,
        })
    }
}

/// Saved-tab payload found under `data.tab`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TabData {
    pub saved_title: Option<String>,
    pub saved_url: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawItem {
    pub id: Option<ItemId>,
    pub parent_id: Option<ItemId>,
    pub title: Option<String>,
    pub tab: Option<TabData>,
}

impl RawItem {
    fn from_map(map: &Map<String, Value>) -> Self {
        let tab = map
            .get("data")
            .and_then(|data| data.get("tab"))
            .filter(|tab| is_present(tab))
            .map(|tab| match tab {
                Value::Object(tab) => TabData {
                    saved_title: non_empty_str(tab, "savedTitle"),
                    saved_url: non_empty_str(tab, "savedURL"),
                },
                _ => TabData::default(),
            });
        Self {
            id: map.get("id").and_then(ItemId::from_value),
            parent_id: map.get("parentID").and_then(ItemId::from_value),
            title: non_empty_str(map, "title"),
            tab,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ItemEntry {
    Item(RawItem),
    Other,
}

impl ItemEntry {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => ItemEntry::Item(RawItem::from_map(map)),
            _ => ItemEntry::Other,
        }
    }

    pub fn as_item(&self) -> Option<&RawItem> {
        match self {
            ItemEntry::Item(item) => Some(item),
            ItemEntry::Other => None,
        }
    }
}

/// The decoded top-apps container: the only part of the document the pipeline reads.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SidebarContainer {
    pub spaces: Vec<SpaceEntry>,
    pub items: Vec<ItemEntry>,
}

pub fn locate_container(document: &Value) -> Result<&Map<String, Value>, Error> {
    let containers = document
        .get("sidebar")
        .and_then(|sidebar| sidebar.get("containers"))
        .ok_or_else(|| Error::malformed("document has no sidebar.containers"))?
        .as_array()
        .ok_or_else(|| Error::malformed("sidebar.containers is not an array"))?;

    containers
        .iter()
        .filter_map(Value::as_object)
        .find(|container| container.contains_key(TOP_APPS_KEY))
        .ok_or_else(|| {
            Error::malformed(format!(
                "no sidebar container with {TOP_APPS_KEY} ({} containers scanned)",
                containers.len()
            ))
        })
}

pub fn decode_container(container: &Map<String, Value>) -> Result<SidebarContainer, Error> {
    let spaces = required_array(container, "spaces")?
        .iter()
        .map(SpaceEntry::from_value)
        .collect();
    let items = required_array(container, "items")?
        .iter()
        .map(ItemEntry::from_value)
        .collect();
    Ok(SidebarContainer { spaces, items })
}

fn required_array<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], Error> {
    match map.get(key) {
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(Error::malformed(format!(
            "sidebar container field `{key}` is not an array"
        ))),
        None => Err(Error::malformed(format!(
            "sidebar container has no `{key}` field"
        ))),
    }
}

/// `null`, `false`, `0` and `""` all mean "absent" for payload flags such as `data.tab`.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn locate_picks_first_container_with_top_apps_key() {
        let doc = json!({"sidebar": {"containers": [
            {"global": {}},
            {"topAppsContainerIDs": [], "spaces": [], "items": [], "tag": "first"},
            {"topAppsContainerIDs": [], "tag": "second"}
        ]}});
        let container = locate_container(&doc).expect("container");
        assert_eq!(container.get("tag").and_then(Value::as_str), Some("first"));
    }

    #[test]
    fn locate_fails_on_empty_or_unmatched_lists() {
        let empty = json!({"sidebar": {"containers": []}});
        assert_eq!(
            locate_container(&empty).unwrap_err().kind(),
            ErrorKind::Malformed
        );

        let unmatched = json!({"sidebar": {"containers": [{"spaces": []}, "noise"]}});
        assert_eq!(
            locate_container(&unmatched).unwrap_err().kind(),
            ErrorKind::Malformed
        );

        let missing = json!({"other": true});
        assert_eq!(
            locate_container(&missing).unwrap_err().kind(),
            ErrorKind::Malformed
        );
    }

    #[test]
    fn markers_decode_into_tagged_variants() {
        let values = [
            json!({"pinned": true}),
            json!({"unpinned": {}}),
            json!({"pinned": 1, "unpinned": 2}),
            json!({"shared": true}),
            json!("C1"),
            json!(42),
            json!(null),
        ];
        let markers: Vec<_> = values.iter().map(ContainerMarker::from_value).collect();
        assert_eq!(
            markers,
            vec![
                ContainerMarker::Pinned,
                ContainerMarker::Unpinned,
                ContainerMarker::Pinned,
                ContainerMarker::OtherTag,
                ContainerMarker::Id(ItemId::new("C1")),
                ContainerMarker::Id(ItemId::new("42")),
                ContainerMarker::Other,
            ]
        );
    }

    #[test]
    fn item_decoding_reads_tab_payload_and_ignores_empty_strings() {
        let entry = ItemEntry::from_value(&json!({
            "id": "I1",
            "parentID": 7,
            "title": "",
            "data": {"tab": {"savedTitle": "Saved", "savedURL": "https://e.com"}}
        }));
        let item = entry.as_item().expect("item");
        assert_eq!(item.id, Some(ItemId::new("I1")));
        assert_eq!(item.parent_id, Some(ItemId::new("7")));
        assert_eq!(item.title, None);
        let tab = item.tab.as_ref().expect("tab");
        assert_eq!(tab.saved_title.as_deref(), Some("Saved"));
        assert_eq!(tab.saved_url.as_deref(), Some("https://e.com"));

        assert_eq!(ItemEntry::from_value(&json!("I2")), ItemEntry::Other);
        let no_tab = ItemEntry::from_value(&json!({"id": "F", "data": {"tab": null}}));
        assert_eq!(no_tab.as_item().and_then(|item| item.tab.clone()), None);
    }

    #[test]
    fn falsy_tab_payloads_mean_no_tab() {
        for tab in [json!(null), json!(false), json!(0), json!("")] {
            let entry =
                ItemEntry::from_value(&json!({"id": "F", "title": "Folder", "data": {"tab": tab}}));
            assert_eq!(entry.as_item().and_then(|item| item.tab.clone()), None, "tab = {tab}");
        }
        for tab in [json!(true), json!(1), json!("yes"), json!([])] {
            let entry = ItemEntry::from_value(&json!({"id": "T", "data": {"tab": tab}}));
            assert_eq!(
                entry.as_item().and_then(|item| item.tab.clone()),
                Some(TabData::default()),
                "tab = {tab}"
            );
        }
    }

    #[test]
    fn decode_requires_spaces_and_items_arrays() {
        let ok = json!({"topAppsContainerIDs": [], "spaces": [{"title": "A"}, 3], "items": []});
        let container = decode_container(ok.as_object().expect("object")).expect("decoded");
        assert_eq!(container.spaces.len(), 2);
        assert_eq!(container.spaces[1], SpaceEntry::Other);

        let no_items = json!({"topAppsContainerIDs": [], "spaces": []});
        let err = decode_container(no_items.as_object().expect("object")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(err.message().unwrap_or_default().contains("items"));

        let bad_spaces = json!({"topAppsContainerIDs": [], "spaces": {}, "items": []});
        let err = decode_container(bad_spaces.as_object().expect("object")).unwrap_err();
        assert!(err.message().unwrap_or_default().contains("not an array"));
    }
}
