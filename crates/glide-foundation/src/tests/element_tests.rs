use super::*;

fn sample_tree() -> (ElementTree, ElementId, ElementId, ElementId) {
    let mut tree = ElementTree::new();
    let page = tree.create_element("main");
    let track = tree.create_element("div");
    let thumb = tree.create_element("div");
    tree.append_child(page, track).unwrap();
    tree.append_child(track, thumb).unwrap();
    tree.set_bounds(page, Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
    tree.set_bounds(track, Rect::new(100.0, 100.0, 200.0, 20.0)).unwrap();
    tree.set_bounds(thumb, Rect::new(100.0, 100.0, 20.0, 20.0)).unwrap();
    (tree, page, track, thumb)
}

#[test]
fn ancestors_start_at_the_element_itself() {
    let (tree, page, track, thumb) = sample_tree();
    let chain: Vec<_> = tree.ancestors(thumb).collect();
    assert_eq!(chain, vec![thumb, track, page]);
    assert!(tree.contains(track, thumb));
    assert!(tree.contains(thumb, thumb));
    assert!(!tree.contains(thumb, track));
}

#[test]
fn append_child_rejects_cycles_and_missing_elements() {
    let (mut tree, page, _, thumb) = sample_tree();
    assert_eq!(
        tree.append_child(thumb, page),
        Err(TreeError::Cycle {
            parent: thumb,
            child: page
        })
    );
    assert_eq!(
        tree.append_child(page, 999),
        Err(TreeError::Missing { id: 999 })
    );
}

#[test]
fn append_child_moves_between_parents() {
    let (mut tree, page, track, thumb) = sample_tree();
    tree.append_child(page, thumb).unwrap();
    assert_eq!(tree.parent(thumb), Some(page));
    assert!(tree.children(track).is_empty());
    assert_eq!(tree.children(page), &[track, thumb]);
}

#[test]
fn remove_drops_whole_subtree() {
    let (mut tree, page, track, thumb) = sample_tree();
    tree.remove(track).unwrap();
    assert!(!tree.exists(track));
    assert!(!tree.exists(thumb));
    assert!(tree.children(page).is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn hit_test_prefers_deepest_and_topmost_element() {
    let (mut tree, page, track, thumb) = sample_tree();
    assert_eq!(tree.hit_test(Point::new(110.0, 110.0)), Some(thumb));
    assert_eq!(tree.hit_test(Point::new(200.0, 110.0)), Some(track));
    assert_eq!(tree.hit_test(Point::new(500.0, 500.0)), Some(page));
    assert_eq!(tree.hit_test(Point::new(900.0, 10.0)), None);

    let overlay = tree.create_element("div");
    tree.append_child(page, overlay).unwrap();
    tree.set_bounds(overlay, Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
    assert_eq!(tree.hit_test(Point::new(110.0, 110.0)), Some(overlay));
}

#[test]
fn classes_are_deduplicated_and_toggleable() {
    let (mut tree, _, track, _) = sample_tree();
    tree.add_class(track, "slider").unwrap();
    tree.add_class(track, "slider").unwrap();
    assert_eq!(tree.get(track).unwrap().classes(), &["slider".to_string()]);

    tree.set_class(track, "disabled", true).unwrap();
    assert!(tree.has_class(track, "disabled"));
    tree.set_class(track, "disabled", false).unwrap();
    assert!(!tree.has_class(track, "disabled"));
}

#[test]
fn closest_finds_matching_ancestor() {
    let (mut tree, page, track, thumb) = sample_tree();
    tree.add_class(track, "no-drag").unwrap();
    let selector = Selector::parse(".no-drag").unwrap();
    assert_eq!(tree.closest(thumb, &selector), Some(track));
    assert_eq!(tree.closest(page, &selector), None);
}

#[test]
fn tree_error_messages() {
    assert_eq!(TreeError::Missing { id: 3 }.to_string(), "element 3 missing");
    assert_eq!(
        TreeError::Cycle { parent: 1, child: 2 }.to_string(),
        "appending element 2 under 1 would create a cycle"
    );
}
