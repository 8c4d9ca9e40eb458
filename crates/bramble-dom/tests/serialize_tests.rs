//! Tests for HTML serialization, text extraction and subtree statistics.

use bramble_dom::{AttributesMap, ClosingMode, DomTree, ElementData, NodeId};

/// Build `<ul id="menu"><li class="on">one</li><!-- x --><li>two<br /></li></ul>`.
fn menu() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("id".to_string(), Some("menu".to_string()));
    let ul = tree.create_element_from(ElementData::from_attributes(
        "ul",
        ClosingMode::Closed,
        attrs,
    ));
    tree.append_child(NodeId::ROOT, ul).unwrap();

    let first = tree.create_element("li", ClosingMode::Closed);
    tree.add_class(first, "on").unwrap();
    let one = tree.create_text("one");
    tree.append_child(first, one).unwrap();

    let comment = tree.create_comment(" x ");

    let second = tree.create_element("li", ClosingMode::Closed);
    let two = tree.create_text(" two ");
    let br = tree.create_element("br", ClosingMode::SelfClosing);
    tree.append_children(second, &[two, br]).unwrap();

    tree.append_children(ul, &[first, comment, second]).unwrap();
    (tree, ul)
}

// ========== to_html / inner_html ==========

#[test]
fn test_created_comment_is_delimited() {
    let mut tree = DomTree::new();
    let note = tree.create_comment("note");
    tree.append_child(NodeId::ROOT, note).unwrap();

    assert_eq!(tree.to_html(NodeId::ROOT), "<!--note-->");

    tree.set_text(note, "changed").unwrap();
    assert_eq!(tree.to_html(NodeId::ROOT), "<!--changed-->");
}

#[test]
fn test_comment_markup_is_kept_verbatim() {
    let mut tree = DomTree::new();
    let raw = tree.create_comment_markup("<!-- raw -->");
    tree.append_child(NodeId::ROOT, raw).unwrap();

    assert_eq!(tree.to_html(NodeId::ROOT), "<!-- raw -->");
}

#[test]
fn test_to_html_nested() {
    let (tree, ul) = menu();

    let expected = r#"<ul id="menu"><li class="on">one</li><!-- x --><li> two <br /></li></ul>"#;
    assert_eq!(tree.to_html(ul), expected);
    assert_eq!(tree.to_html(NodeId::ROOT), expected);
}

#[test]
fn test_inner_html() {
    let (tree, ul) = menu();
    let first = tree.first_child(ul).unwrap();

    assert_eq!(tree.inner_html(first), "one");
    assert!(tree.inner_html(ul).starts_with(r#"<li class="on">"#));
}

#[test]
fn test_open_element_has_no_close_tag() {
    let mut tree = DomTree::new();
    let p = tree.create_element("p", ClosingMode::Open);
    let text = tree.create_text("dangling");
    tree.append_child(NodeId::ROOT, p).unwrap();
    tree.append_child(p, text).unwrap();

    assert_eq!(tree.to_html(NodeId::ROOT), "<p>dangling");
}

#[test]
fn test_attribute_quoting() {
    let mut tree = DomTree::new();
    let a = tree.create_element("a", ClosingMode::Closed);
    tree.append_child(NodeId::ROOT, a).unwrap();
    tree.set_attribute(a, "title", Some(r#"say "hi""#)).unwrap();
    tree.set_attribute(a, "alt", Some("it's")).unwrap();
    tree.set_attribute(a, "download", None).unwrap();

    assert_eq!(
        tree.to_html(a),
        r#"<a title='say "hi"' alt="it's" download></a>"#
    );
}

#[test]
fn test_unknown_node_serializes_empty() {
    let tree = DomTree::new();
    assert_eq!(tree.to_html(NodeId(7)), "");
}

// ========== text_content ==========

#[test]
fn test_text_content_includes_comments() {
    let (tree, ul) = menu();

    assert_eq!(tree.text_content(ul), "one<!-- x --> two ");
    assert_eq!(tree.text_content(NodeId::ROOT), tree.text_content(ul));
}

// ========== info ==========

#[test]
fn test_info_counts() {
    let (tree, ul) = menu();
    let info = tree.info(NodeId::ROOT);

    assert_eq!(info.elements, 4);
    assert_eq!(
        info.tags.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
        vec![("ul", 1), ("li", 2), ("br", 1)]
    );
    assert_eq!(info.text_nodes, 2);
    assert_eq!(info.text_length, 8);
    assert_eq!(info.text_trimmed_length, 6);
    assert_eq!(info.comments, 1);
    assert_eq!(info.comment_length, 10);

    let li = tree.first_child(ul).unwrap();
    let sub = tree.info(li);
    assert_eq!(sub.elements, 1);
    assert_eq!(sub.comments, 0);
}
