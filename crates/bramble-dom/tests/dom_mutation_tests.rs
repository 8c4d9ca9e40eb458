//! Tests for DOM tree mutation methods: append, detach, insert, replace, wrap, destroy.

use bramble_dom::{AttributesMap, ClosingMode, DomError, DomTree, NodeId};

/// Helper to create a closed element attached under `parent`.
fn element_under(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag, ClosingMode::Closed);
    tree.append_child(parent, id).unwrap();
    id
}

/// Helper building `<div>` with three children `a`, `b`, `c`.
fn div_abc(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let div = element_under(tree, NodeId::ROOT, "div");
    let a = element_under(tree, div, "a");
    let b = element_under(tree, div, "b");
    let c = element_under(tree, div, "c");
    (div, a, b, c)
}

// ========== append_child ==========

#[test]
fn test_append_child_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    assert_eq!(tree.children(div), &[a, b, c]);
    assert_eq!(tree.parent(a), Some(div));
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_append_child_moves_instead_of_sharing() {
    let mut tree = DomTree::new();
    let (div, a, b, _c) = div_abc(&mut tree);
    let section = element_under(&mut tree, NodeId::ROOT, "section");

    tree.append_child(section, a).unwrap();

    assert!(!tree.children(div).contains(&a));
    assert_eq!(tree.children(section), &[a]);
    assert_eq!(tree.parent(a), Some(section));
    assert_eq!(tree.first_child(div), Some(b));
}

#[test]
fn test_append_child_reappend_moves_to_end() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    tree.append_child(div, a).unwrap();

    assert_eq!(tree.children(div), &[b, c, a]);
}

#[test]
fn test_append_child_rejects_cycle() {
    let mut tree = DomTree::new();
    let (div, a, _b, _c) = div_abc(&mut tree);
    let before = tree.to_html(NodeId::ROOT);

    assert_eq!(
        tree.append_child(a, div),
        Err(DomError::WouldCreateCycle { node: div, parent: a })
    );
    assert_eq!(
        tree.append_child(div, div),
        Err(DomError::WouldCreateCycle { node: div, parent: div })
    );
    assert_eq!(tree.to_html(NodeId::ROOT), before);
}

#[test]
fn test_append_child_rejects_root_and_leaf_parents() {
    let mut tree = DomTree::new();
    let div = element_under(&mut tree, NodeId::ROOT, "div");
    let text = tree.create_text("hello");
    tree.append_child(div, text).unwrap();
    let p = tree.create_element("p", ClosingMode::Closed);

    assert_eq!(tree.append_child(div, NodeId::ROOT), Err(DomError::RootNotMovable));
    assert_eq!(tree.append_child(text, p), Err(DomError::CannotHaveChildren(text)));
    assert_eq!(tree.parent(p), None);
}

#[test]
fn test_append_children_validates_before_moving() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let section = element_under(&mut tree, NodeId::ROOT, "section");

    assert_eq!(
        tree.append_children(section, &[a, b, a]),
        Err(DomError::DuplicateNode(a))
    );
    assert_eq!(tree.children(div), &[a, b, c]);
    assert!(tree.children(section).is_empty());

    tree.append_children(section, &[c, a]).unwrap();
    assert_eq!(tree.children(section), &[c, a]);
    assert_eq!(tree.children(div), &[b]);
}

#[test]
fn test_append_child_unknown_id() {
    let mut tree = DomTree::new();
    let ghost = NodeId(42);

    assert_eq!(
        tree.append_child(NodeId::ROOT, ghost),
        Err(DomError::UnknownNode(ghost))
    );
}

// ========== detach ==========

#[test]
fn test_detach_keeps_subtree() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    assert_eq!(tree.detach(div), Ok(div));

    assert!(tree.children(NodeId::ROOT).is_empty());
    assert_eq!(tree.parent(div), None);
    assert_eq!(tree.children(div), &[a, b, c]);
    assert_eq!(tree.top(a), div);
}

#[test]
fn test_detach_unattached_fails() {
    let mut tree = DomTree::new();
    let loose = tree.create_text("loose");

    assert_eq!(tree.detach(loose), Err(DomError::NotAttached(loose)));
    assert_eq!(tree.detach(NodeId::ROOT), Err(DomError::NotAttached(NodeId::ROOT)));
}

#[test]
fn test_detach_all_is_atomic() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let loose = tree.create_text("loose");

    assert_eq!(tree.detach_all(&[a, loose]), Err(DomError::NotAttached(loose)));
    assert_eq!(tree.children(div), &[a, b, c]);

    tree.detach_all(&[a, c]).unwrap();
    assert_eq!(tree.children(div), &[b]);
}

// ========== insert_before / insert_after ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let x = tree.create_element("x", ClosingMode::Closed);

    tree.insert_before(a, &[x]).unwrap();

    assert_eq!(tree.children(div), &[x, a, b, c]);
    assert_eq!(tree.parent(x), Some(div));
}

#[test]
fn test_insert_after_last() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let x = tree.create_text("x");
    let y = tree.create_text("y");

    tree.insert_after(c, &[x, y]).unwrap();

    assert_eq!(tree.children(div), &[a, b, c, x, y]);
}

#[test]
fn test_insert_after_with_sibling_moving_forward() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    // `a` is detached first, so `b` shifts left before the splice
    tree.insert_after(b, &[a]).unwrap();

    assert_eq!(tree.children(div), &[b, a, c]);
}

#[test]
fn test_insert_rejects_anchor_in_nodes() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    assert_eq!(tree.insert_before(b, &[a, b]), Err(DomError::AnchorInNodes(b)));
    assert_eq!(tree.children(div), &[a, b, c]);
}

#[test]
fn test_insert_requires_attached_anchor() {
    let mut tree = DomTree::new();
    let loose = tree.create_element("span", ClosingMode::Closed);
    let x = tree.create_text("x");

    assert_eq!(tree.insert_before(loose, &[x]), Err(DomError::NotAttached(loose)));
}

// ========== replace ==========

#[test]
fn test_replace_child() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let x = tree.create_text("x");
    let y = tree.create_text("y");

    tree.replace_child(b, &[x, y]).unwrap();

    assert_eq!(tree.children(div), &[a, x, y, c]);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.parent(y), Some(div));
}

#[test]
fn test_replace_child_with_nothing_removes() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    tree.replace_child(a, &[]).unwrap();

    assert_eq!(tree.children(div), &[b, c]);
    assert_eq!(tree.parent(a), None);
}

#[test]
fn test_replace_with_children_unwraps() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let section = element_under(&mut tree, NodeId::ROOT, "section");
    let after = element_under(&mut tree, NodeId::ROOT, "footer");

    tree.replace_with_children(div).unwrap();

    assert_eq!(tree.children(NodeId::ROOT), &[a, b, c, section, after]);
    assert_eq!(tree.parent(b), Some(NodeId::ROOT));
    assert_eq!(tree.parent(div), None);
    assert!(tree.children(div).is_empty());
}

// ========== wrap ==========

#[test]
fn test_wrap_takes_slot() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("class".to_string(), Some("box wide".to_string()));
    let _ = attrs.insert("role".to_string(), Some("note".to_string()));

    let wrapper = tree.wrap(b, "span", attrs).unwrap();

    assert_eq!(tree.children(div), &[a, wrapper, c]);
    assert_eq!(tree.children(wrapper), &[b]);
    let data = tree.as_element(wrapper).unwrap();
    assert_eq!(data.closing, ClosingMode::Closed);
    assert!(data.has_class("box") && data.has_class("wide"));
    assert_eq!(data.attribute("role"), Some("note"));
    assert_eq!(
        tree.to_html(div),
        r#"<div><a></a><span class="box wide" role="note"><b></b></span><c></c></div>"#
    );
}

#[test]
fn test_wrap_detached_fails_without_allocating() {
    let mut tree = DomTree::new();
    let loose = tree.create_text("loose");
    let len = tree.len();

    assert_eq!(
        tree.wrap(loose, "p", AttributesMap::new()),
        Err(DomError::NotAttached(loose))
    );
    assert_eq!(tree.len(), len);
}

#[test]
fn test_wrap_all_each_in_own_wrapper() {
    let mut tree = DomTree::new();
    let (div, a, _b, c) = div_abc(&mut tree);

    let wrappers = tree.wrap_all(&[a, c], "li", &AttributesMap::new()).unwrap();

    assert_eq!(wrappers.len(), 2);
    assert_eq!(tree.children(wrappers[0]), &[a]);
    assert_eq!(tree.children(wrappers[1]), &[c]);
    assert_eq!(tree.to_html(div), "<div><li><a></a></li><b></b><li><c></c></li></div>");
}

// ========== ancestor ==========

#[test]
fn test_ancestor_respects_depth() {
    let mut tree = DomTree::new();
    let outer = element_under(&mut tree, NodeId::ROOT, "div");
    let middle = element_under(&mut tree, outer, "section");
    let inner = element_under(&mut tree, middle, "p");
    let is_div = |t: &DomTree, id: NodeId| t.as_element(id).is_some_and(|e| e.is("div"));

    assert_eq!(tree.ancestor(inner, is_div, None), Some(outer));
    assert_eq!(tree.ancestor(inner, is_div, Some(2)), Some(outer));
    assert_eq!(tree.ancestor(inner, is_div, Some(1)), None);
    assert_eq!(tree.ancestor(inner, |_, _| true, Some(0)), None);
    assert_eq!(tree.ancestor(inner, |t, id| t.is_root(id), None), Some(NodeId::ROOT));
    assert_eq!(tree.ancestor(NodeId::ROOT, |_, _| true, None), None);
}

// ========== clear_children / destroy ==========

#[test]
fn test_clear_children_returns_detached() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = div_abc(&mut tree);

    assert_eq!(tree.clear_children(div), Ok(vec![a, b, c]));
    assert!(tree.children(div).is_empty());
    assert_eq!(tree.parent(b), None);
}

#[test]
fn test_destroy_frees_subtree() {
    let mut tree = DomTree::new();
    let (div, a, _b, _c) = div_abc(&mut tree);
    let live = tree.live_count();

    assert_eq!(tree.destroy(div), Err(DomError::StillAttached(div)));
    let _ = tree.detach(div).unwrap();
    tree.destroy(div).unwrap();

    assert_eq!(tree.live_count(), live - 4);
    assert!(tree.get(a).is_none());
    assert_eq!(tree.append_child(NodeId::ROOT, a), Err(DomError::UnknownNode(a)));
    assert_eq!(tree.destroy(NodeId::ROOT), Err(DomError::RootNotMovable));

    // ids are never reused
    let fresh = tree.create_text("new");
    assert_eq!(fresh.0, tree.len() - 1);
    assert!(fresh.0 > a.0);
}

// ========== editing ==========

#[test]
fn test_attribute_editing() {
    let mut tree = DomTree::new();
    let p = element_under(&mut tree, NodeId::ROOT, "p");

    tree.set_attribute(p, "Title", Some("hi")).unwrap();
    tree.set_attribute(p, "hidden", None).unwrap();
    tree.set_attribute(p, "class", Some("a  b")).unwrap();
    tree.add_class(p, "c").unwrap();
    tree.add_class(p, "a").unwrap();
    tree.add_id(p, "main").unwrap();
    assert_eq!(
        tree.to_html(p),
        r#"<p id="main" class="a b c" title="hi" hidden></p>"#
    );

    tree.remove_class(p, "a").unwrap();
    tree.remove_attribute(p, "TITLE").unwrap();
    tree.remove_id(p, "main").unwrap();
    assert_eq!(tree.to_html(p), r#"<p class="b c" hidden></p>"#);
}

#[test]
fn test_editing_wrong_kind() {
    let mut tree = DomTree::new();
    let text = tree.create_text("t");
    let p = tree.create_element("p", ClosingMode::Closed);

    assert_eq!(tree.add_class(text, "x"), Err(DomError::NotAnElement(text)));
    assert_eq!(
        tree.set_closing(NodeId::ROOT, ClosingMode::Open),
        Err(DomError::NotAnElement(NodeId::ROOT))
    );
    assert_eq!(tree.set_text(p, "x"), Err(DomError::NotCharacterData(p)));

    tree.set_text(text, "changed").unwrap();
    assert_eq!(tree.as_text(text), Some("changed"));
}

#[test]
fn test_set_closing_and_tag_name() {
    let mut tree = DomTree::new();
    let br = element_under(&mut tree, NodeId::ROOT, "br");

    tree.set_closing(br, ClosingMode::SelfClosing).unwrap();
    assert_eq!(tree.to_html(NodeId::ROOT), "<br />");

    tree.set_tag_name(br, "hr").unwrap();
    tree.set_closing(br, ClosingMode::Open).unwrap();
    assert_eq!(tree.to_html(NodeId::ROOT), "<hr>");
}
