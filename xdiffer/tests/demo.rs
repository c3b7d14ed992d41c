//! End-to-end tests on the demo travel profiles: parse, compare, select
//! nodes through the shared state and apply the accepted changes.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use xdiffer::{
    apply_changes, build_diff_tree, Change, DiffNode, DiffNodeHandle, DiffNodeKind, DiffTree,
    DiffTreeKind, UiState, DEMO_XML_1, DEMO_XML_2,
};

fn demo_tree() -> DiffTree {
    build_diff_tree(DEMO_XML_1, DEMO_XML_2).unwrap()
}

/// Finds the first node with the given name below `node`, depth first.
fn find<'t>(tree: &'t DiffTree, name: &str) -> Option<(DiffNodeHandle, &'t DiffNode)> {
    tree.walk().into_iter().find(|(_, node)| node.name() == name)
}

fn slice(text: &str, range: xdiffer::Range) -> &str {
    &text[range.start..range.end]
}

#[test]
fn test_demo_edit_count() {
    let tree = demo_tree();
    assert_eq!(tree.kind(), DiffTreeKind::PartialDiff);
    // Foo, Attr, GivenName text, NewStuff, Bio, one Address, Planet and
    // three RelatedTraveler elements
    assert_eq!(tree.diff_count(), 10);
}

#[test]
fn test_demo_updated_given_name() {
    let tree = demo_tree();
    let (_, given_name) = find(&tree, "<GivenName>").unwrap();
    let text = given_name
        .children()
        .iter()
        .find(|child| child.kind() == DiffNodeKind::UpdatedNode)
        .unwrap();
    assert_eq!(slice(DEMO_XML_1, text.range1().unwrap()), "George");
    assert_eq!(slice(DEMO_XML_2, text.range2().unwrap()), "Fred");

    let attr = given_name
        .children()
        .iter()
        .find(|child| child.is_attribute())
        .unwrap();
    assert_eq!(attr.kind(), DiffNodeKind::AddedNode);
    assert_eq!(slice(DEMO_XML_2, attr.range2().unwrap()), r#"Attr="cool""#);
}

#[test]
fn test_demo_deleted_bio() {
    let tree = demo_tree();
    let (_, bio) = find(&tree, "<Bio>").unwrap();
    assert_eq!(bio.kind(), DiffNodeKind::DeletedNode);
    assert!(slice(DEMO_XML_1, bio.range1().unwrap()).starts_with("<Bio>A skilled engineer"));
    assert!(bio
        .children()
        .iter()
        .all(|child| child.kind() == DiffNodeKind::DeletedSubNode));
}

#[test]
fn test_demo_whitespace_only_changes_are_ignored() {
    let tree = demo_tree();
    let (_, phone) = find(&tree, "<TelephoneInfo>").unwrap();
    assert!(!phone.has_diff());
}

#[test]
fn test_demo_keeps_closest_address() {
    let tree = demo_tree();
    let addresses: Vec<&DiffNode> = tree
        .walk()
        .into_iter()
        .map(|(_, node)| node)
        .filter(|node| node.name() == "<Address>")
        .collect();
    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0].kind(), DiffNodeKind::DeletedNode);
    assert!(slice(DEMO_XML_1, addresses[0].range1().unwrap()).contains("From hell"));
    assert_eq!(addresses[1].kind(), DiffNodeKind::NoDiff);
    assert!(addresses[1]
        .children()
        .iter()
        .any(|child| child.name() == "<Planet>" && child.kind() == DiffNodeKind::AddedNode));
}

#[test]
fn test_applying_every_change_reproduces_second_document() {
    let tree = demo_tree();
    let changes: Vec<Change> = tree.changes().into_iter().map(|(_, c)| c).collect();
    assert_eq!(changes.len(), 10);

    let merged = apply_changes(DEMO_XML_1, DEMO_XML_2, &changes).unwrap();
    let check = build_diff_tree(&merged, DEMO_XML_2).unwrap();
    assert_eq!(check.kind(), DiffTreeKind::Same);
    // Untouched parts keep their original formatting
    assert!(merged.starts_with("<?xml version=\"1.0\"?>\n<Profile>\n    <Customer>"));
}

#[test]
fn test_applying_no_change_keeps_first_document() {
    let merged = apply_changes(DEMO_XML_1, DEMO_XML_2, &[]).unwrap();
    assert_eq!(merged, DEMO_XML_1);
}

#[test]
fn test_view_workflow_through_shared_state() {
    let tree = demo_tree();
    let state = Rc::new(UiState::new());

    // The tree view selects nodes, the detail view reads the selection
    let tree_view = state.clone();
    let detail_view = state.clone();

    let (bio_handle, _) = find(&tree, "<Bio>").unwrap();
    let (planet_handle, _) = find(&tree, "<Planet>").unwrap();

    tree_view.set_current_diff_node(Some(bio_handle.clone()));
    let selected = detail_view.current_diff_node().unwrap();
    assert_eq!(tree.node(&selected).unwrap().name(), "<Bio>");

    tree_view.set_current_diff_node(Some(planet_handle.clone()));
    assert_eq!(detail_view.current_diff_node(), Some(planet_handle.clone()));

    tree_view.set_current_diff_node(None);
    assert_eq!(detail_view.current_diff_node(), None);

    // Accept two of the changes
    for handle in [&bio_handle, &planet_handle] {
        let change = tree.node(handle).and_then(DiffNode::change).unwrap();
        state.applied_edits().insert(handle.to_string(), change);
    }
    assert_eq!(state.applied_edits().len(), 2);

    let preview = state.applied_edits().apply(DEMO_XML_1, DEMO_XML_2).unwrap();
    assert!(!preview.contains("<Bio>"));
    assert!(preview.contains("<Planet>Earth</Planet>"));
    assert!(preview.contains("George"));

    // Undo one of them
    state.applied_edits().remove(&bio_handle.to_string());
    let preview = state.applied_edits().apply(DEMO_XML_1, DEMO_XML_2).unwrap();
    assert!(preview.contains("<Bio>"));
    assert!(preview.contains("<Planet>Earth</Planet>"));
}
