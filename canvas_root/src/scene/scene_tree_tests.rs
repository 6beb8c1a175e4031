/// Tests for SceneTree, SceneNode and SceneHandle

use super::*;
use slotmap::SlotMap;

fn box_mesh() -> SceneNode {
    SceneNode::new("mesh")
        .key("box")
        .prop("position", [0.0f32, 1.0, 0.0])
        .prop("castShadow", true)
        .child(SceneNode::new("boxGeometry").prop("args", [1.0f32, 1.0, 1.0]))
        .child(SceneNode::new("meshStandardMaterial").prop("color", "hotpink"))
}

// ============================================================================
// Tests: SceneNode
// ============================================================================

#[test]
fn test_node_builder() {
    let node = box_mesh();

    assert_eq!(node.tag(), "mesh");
    assert_eq!(node.node_key(), Some("box"));
    assert_eq!(node.get_prop("castShadow"), Some(&PropValue::Bool(true)));
    assert_eq!(node.get_prop("position"), Some(&PropValue::Vector(vec![0.0, 1.0, 0.0])));
    assert_eq!(node.child_nodes().len(), 2);
}

#[test]
fn test_prop_overwrite_keeps_last_value() {
    let node = SceneNode::new("group").prop("visible", true).prop("visible", false);
    assert_eq!(node.get_prop("visible"), Some(&PropValue::Bool(false)));
    assert_eq!(node.props().len(), 1);
}

#[test]
fn test_prop_conversions() {
    assert_eq!(PropValue::from(2i32), PropValue::Number(2.0));
    assert_eq!(PropValue::from(0.5f32), PropValue::Number(0.5));
    assert_eq!(PropValue::from("red".to_string()), PropValue::Text("red".to_string()));
    assert_eq!(PropValue::from(vec![1.0, 2.0]), PropValue::Vector(vec![1.0, 2.0]));
}

// ============================================================================
// Tests: SceneTree
// ============================================================================

#[test]
fn test_empty_tree() {
    let tree = SceneTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
}

#[test]
fn test_node_count_includes_descendants() {
    let tree = SceneTree::new().with(box_mesh()).with(SceneNode::new("ambientLight"));
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn test_walk_is_preorder_with_depth() {
    let tree = SceneTree::from(SceneNode::new("group").child(box_mesh()));
    let mut visited = Vec::new();
    tree.walk(|node, depth| visited.push((node.tag().to_string(), depth)));

    assert_eq!(
        visited,
        vec![
            ("group".to_string(), 0),
            ("mesh".to_string(), 1),
            ("boxGeometry".to_string(), 2),
            ("meshStandardMaterial".to_string(), 2),
        ]
    );
}

#[test]
fn test_walk_handles_deep_chain() {
    const DEPTH: usize = 200_000;
    let mut node = SceneNode::new("leaf");
    for _ in 0..DEPTH {
        node = SceneNode::new("group").child(node);
    }
    let tree = SceneTree::from(node);

    let mut deepest = 0;
    tree.walk(|_, depth| deepest = deepest.max(depth));

    assert_eq!(deepest, DEPTH);
    assert_eq!(tree.node_count(), DEPTH + 1);
}

#[test]
fn test_tree_from_iterator() {
    let tree: SceneTree = vec![SceneNode::new("a"), SceneNode::new("b")].into_iter().collect();
    assert_eq!(tree.roots().len(), 2);
}

#[test]
fn test_structural_equality() {
    assert_eq!(SceneTree::from(box_mesh()), SceneTree::from(box_mesh()));
    assert_ne!(
        SceneTree::from(box_mesh()),
        SceneTree::from(box_mesh().prop("visible", false))
    );
}

// ============================================================================
// Tests: SceneHandle
// ============================================================================

#[test]
fn test_handle_matches_equal_and_shared_trees() {
    let mut ids: SlotMap<SceneId, ()> = SlotMap::with_key();
    let tree = Arc::new(SceneTree::from(box_mesh()));
    let handle = SceneHandle::new(ids.insert(()), tree.clone());

    assert!(handle.matches(&tree));
    assert!(handle.matches(&Arc::new(SceneTree::from(box_mesh()))));
    assert!(!handle.matches(&Arc::new(SceneTree::new())));
}
