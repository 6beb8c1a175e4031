/// Declarative scene description.
///
/// A `SceneTree` is what callers hand to `Root::render`. The root never
/// interprets it; backends resolve each node's tag through an
/// `ElementRegistry` when the tree is mounted.

use std::collections::BTreeMap;
use std::sync::Arc;
use crate::backend::SceneId;

/// Value of a node property
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Vector(Vec<f64>),
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl<const N: usize> From<[f32; N]> for PropValue {
    fn from(value: [f32; N]) -> Self {
        PropValue::Vector(value.iter().map(|v| *v as f64).collect())
    }
}

impl From<Vec<f64>> for PropValue {
    fn from(value: Vec<f64>) -> Self {
        PropValue::Vector(value)
    }
}

/// One declared element: a type tag, its properties and its children
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    tag: String,
    key: Option<String>,
    props: BTreeMap<String, PropValue>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            props: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set the sibling-unique key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    // ===== GETTERS =====

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn node_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    pub fn props(&self) -> &BTreeMap<String, PropValue> {
        &self.props
    }

    pub fn child_nodes(&self) -> &[SceneNode] {
        &self.children
    }
}

impl Drop for SceneNode {
    // Flatten descendants first so a deep chain is not dropped recursively
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Top-level list of declared elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneTree {
    roots: Vec<SceneNode>,
}

impl SceneTree {
    /// Empty tree (renders nothing)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, node: SceneNode) -> Self {
        self.roots.push(node);
        self
    }

    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Depth-first pre-order traversal; roots have depth 0
    ///
    /// Uses an explicit stack, so tree depth is not bounded by the call stack.
    pub fn walk<F: FnMut(&SceneNode, usize)>(&self, mut visit: F) {
        let mut stack: Vec<(&SceneNode, usize)> = self.roots.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }
}

impl From<SceneNode> for SceneTree {
    fn from(node: SceneNode) -> Self {
        SceneTree::new().with(node)
    }
}

impl FromIterator<SceneNode> for SceneTree {
    fn from_iter<I: IntoIterator<Item = SceneNode>>(iter: I) -> Self {
        Self { roots: iter.into_iter().collect() }
    }
}

/// Scene currently mounted on a root's render target
#[derive(Debug, Clone)]
pub struct SceneHandle {
    id: SceneId,
    tree: Arc<SceneTree>,
}

impl SceneHandle {
    pub(crate) fn new(id: SceneId, tree: Arc<SceneTree>) -> Self {
        Self { id, tree }
    }

    /// Backend scene id
    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn tree(&self) -> &Arc<SceneTree> {
        &self.tree
    }

    /// True when `tree` describes the same scene
    pub fn matches(&self, tree: &Arc<SceneTree>) -> bool {
        Arc::ptr_eq(&self.tree, tree) || *self.tree == **tree
    }
}

#[cfg(test)]
#[path = "scene_tree_tests.rs"]
mod tests;
