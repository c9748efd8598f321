//! Purpose: Contract tests for the sidebar → bookmark HTML conversion.
//! Exports: Integration tests only.
//! Role: Pin the observable behavior of the public pipeline on realistic documents.
//! Invariants: Fixtures are built with `json!` so each case shows its whole input.
use arcmark::api::{
    BookmarkNode, ErrorKind, HtmlOptions, MAX_FOLDER_DEPTH, bookmark_tree, convert_document,
    convert_str,
};
use serde_json::{Value, json};

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
<TITLE>Bookmarks</TITLE>\n\
<H1>Bookmarks</H1>\n\
<DL><p>";

fn document(spaces: Value, items: Value) -> Value {
    json!({"sidebar": {"containers": [
        {"global": {}},
        {"topAppsContainerIDs": [], "spaces": spaces, "items": items}
    ]}})
}

fn html(doc: &Value) -> String {
    convert_document(doc, HtmlOptions::default())
        .expect("conversion")
        .html
}

#[test]
fn single_space_with_one_bookmark() {
    let doc = json!({"sidebar": {"containers": [{
        "topAppsContainerIDs": [],
        "spaces": [{"title": "Work", "newContainerIDs": [{"pinned": true}, "C1"]}],
        "items": [
            {"id": "C1"},
            {"id": "I1", "parentID": "C1", "title": "Example",
             "data": {"tab": {"savedURL": "https://e.com", "savedTitle": "Example"}}}
        ]
    }]}});

    let expected = format!(
        "{HEADER}\n\t<DT><H3>Work</H3>\n\t<DL><p>\n\
         \t\t<DT><A HREF=\"https://e.com\">Example</A>\n\t</DL><p>\n</DL><p>"
    );
    assert_eq!(html(&doc), expected);
}

#[test]
fn top_level_folders_follow_pinned_order() {
    let doc = document(
        json!([
            {"title": "B", "newContainerIDs": [{"pinned": true}, "PB", {"unpinned": true}, "UB"]},
            {"newContainerIDs": [{"unpinned": true}, "UX"]},
            {"title": "A", "newContainerIDs": [{"pinned": true}, "PA"]},
            {"newContainerIDs": [{"pinned": true}, "PC"]}
        ]),
        json!([]),
    );
    let (roots, report) = bookmark_tree(&doc).expect("tree");
    let titles: Vec<_> = roots.iter().map(BookmarkNode::title).collect();
    assert_eq!(titles, vec!["B", "A", "Space 2"]);
    assert_eq!(report.pinned, roots.len());
    assert!(roots.iter().all(|root| root.children().is_empty()));
}

#[test]
fn titled_item_without_children_renders_empty_folder() {
    let doc = document(
        json!([{"title": "S", "newContainerIDs": [{"pinned": true}, "R"]}]),
        json!([{"id": "F", "parentID": "R", "title": "Reading"}]),
    );
    let out = html(&doc);
    assert!(out.contains("\t\t<DT><H3>Reading</H3>\n\t\t<DL><p>\n\t\t</DL><p>"));
}

#[test]
fn unpinned_only_space_produces_no_nodes() {
    let doc = document(
        json!([{"title": "Hidden", "newContainerIDs": [{"unpinned": true}, "U"]}]),
        json!([{"id": "T", "parentID": "U", "data": {"tab": {"savedURL": "https://x"}}}]),
    );
    let (roots, report) = bookmark_tree(&doc).expect("tree");
    assert!(roots.is_empty());
    assert_eq!(report.unpinned, 1);
    assert_eq!(report.bookmarks, 0);
    assert_eq!(html(&doc), format!("{HEADER}\n</DL><p>"));
}

#[test]
fn untitled_container_hides_its_subtree() {
    let doc = document(
        json!([{"title": "S", "newContainerIDs": [{"pinned": true}, "R"]}]),
        json!([
            {"id": "G", "parentID": "R", "title": null},
            {"id": "F", "parentID": "G", "title": "Would be a folder"},
            {"id": "T", "parentID": "F", "data": {"tab": {"savedURL": "https://deep"}}},
            {"id": "K", "parentID": "R",
             "data": {"tab": {"savedURL": "https://kept", "savedTitle": "Kept"}}}
        ]),
    );
    let out = html(&doc);
    assert!(!out.contains("Would be a folder"));
    assert!(!out.contains("https://deep"));
    assert!(out.contains("\t\t<DT><A HREF=\"https://kept\">Kept</A>"));
}

#[test]
fn depth_matches_indentation() {
    let doc = document(
        json!([{"title": "S", "newContainerIDs": [{"pinned": true}, "R"]}]),
        json!([
            {"id": "A", "parentID": "R", "title": "A"},
            {"id": "B", "parentID": "A", "title": "B"},
            {"id": "C", "parentID": "B", "title": "C"},
            {"id": "T", "parentID": "C", "data": {"tab": {"savedURL": "u", "savedTitle": "leaf"}}}
        ]),
    );
    let out = html(&doc);
    assert!(out.contains("\n\t\t\t\t\t<DT><A HREF=\"u\">leaf</A>"));
    for line in out.lines().skip(5) {
        let tabs = line.chars().take_while(|c| *c == '\t').count();
        assert!(tabs <= 5, "unexpected depth in {line:?}");
    }
}

fn folder_chain(depth: usize) -> Value {
    let items: Vec<Value> = (0..depth)
        .map(|level| {
            let parent = match level {
                0 => "R".to_string(),
                _ => format!("F{}", level - 1),
            };
            json!({"id": format!("F{level}"), "parentID": parent, "title": format!("L{level}")})
        })
        .collect();
    document(
        json!([{"title": "Deep", "newContainerIDs": [{"pinned": true}, "R"]}]),
        Value::Array(items),
    )
}

#[test]
fn deepest_accepted_chain_renders_one_tab_per_level() {
    let out = html(&folder_chain(MAX_FOLDER_DEPTH));
    let deepest = format!(
        "{}<DT><H3>L{}</H3>",
        "\t".repeat(MAX_FOLDER_DEPTH + 1),
        MAX_FOLDER_DEPTH - 1
    );
    assert!(out.contains(&deepest));
    assert!(out.ends_with("\n\t</DL><p>\n</DL><p>"));
}

#[test]
fn runaway_folder_chain_is_malformed_not_a_crash() {
    let err = convert_document(&folder_chain(50_000), HtmlOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(err.message().unwrap_or_default().contains("nesting deeper than"));
}

#[test]
fn non_object_entries_are_ignored() {
    let doc = document(
        json!(["loose", 3, {"title": "S", "newContainerIDs": ["R0", {"pinned": true}, "R"]}]),
        json!(["R", 17, null, {"id": "T", "parentID": "R", "title": "T", "data": {"tab": {}}}]),
    );
    let (roots, report) = bookmark_tree(&doc).expect("tree");
    assert_eq!(report.spaces, 1);
    assert_eq!(
        roots,
        vec![BookmarkNode::Folder {
            title: "S".to_string(),
            children: vec![BookmarkNode::Bookmark {
                title: "T".to_string(),
                url: String::new(),
            }],
        }]
    );
}

#[test]
fn missing_container_is_malformed() {
    let doc = json!({"sidebar": {"containers": [{"global": {}}]}});
    let err = convert_document(&doc, HtmlOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);

    let err = convert_str("[1, 2, 3]", HtmlOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn serialization_is_repeatable() {
    let doc = document(
        json!([{"title": "S", "newContainerIDs": [{"pinned": true}, "R"]}]),
        json!([{"id": "T", "parentID": "R", "data": {"tab": {"savedURL": "u"}}}]),
    );
    assert_eq!(html(&doc), html(&doc));
}
