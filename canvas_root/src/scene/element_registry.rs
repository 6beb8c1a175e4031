/// Registry of constructible scene elements.
///
/// Maps a node's type tag to a factory producing the backend-side `Element`.
/// Registries are plain values: populate one at startup, share it through an
/// `Arc`, and hand it to the backend that mounts scenes.

use std::fmt;
use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use super::scene_tree::{PropValue, SceneNode, SceneTree};

/// Broad family of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Scene, group or any plain transform node
    Object,
    Mesh,
    Light,
    Camera,
    Geometry,
    Material,
}

impl ElementKind {
    /// Parent slot this kind attaches to when no `attach` prop is given
    pub fn default_attach(&self) -> Option<&'static str> {
        match self {
            ElementKind::Geometry => Some("geometry"),
            ElementKind::Material => Some("material"),
            _ => None,
        }
    }
}

/// Instantiated element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub kind: ElementKind,
    /// Parent slot (`geometry`, `material`, ...), `None` for child objects
    pub attach: Option<String>,
}

/// Element constructor
pub type ElementFactory = Arc<dyn Fn(&SceneNode) -> Result<Element> + Send + Sync>;

/// Built-in element catalog
const DEFAULT_ELEMENTS: &[(&str, ElementKind)] = &[
    ("scene", ElementKind::Object),
    ("group", ElementKind::Object),
    ("object3D", ElementKind::Object),
    ("primitive", ElementKind::Object),
    ("mesh", ElementKind::Mesh),
    ("instancedMesh", ElementKind::Mesh),
    ("points", ElementKind::Mesh),
    ("lineSegments", ElementKind::Mesh),
    ("ambientLight", ElementKind::Light),
    ("directionalLight", ElementKind::Light),
    ("pointLight", ElementKind::Light),
    ("spotLight", ElementKind::Light),
    ("hemisphereLight", ElementKind::Light),
    ("perspectiveCamera", ElementKind::Camera),
    ("orthographicCamera", ElementKind::Camera),
    ("bufferGeometry", ElementKind::Geometry),
    ("boxGeometry", ElementKind::Geometry),
    ("sphereGeometry", ElementKind::Geometry),
    ("planeGeometry", ElementKind::Geometry),
    ("meshBasicMaterial", ElementKind::Material),
    ("meshStandardMaterial", ElementKind::Material),
    ("meshPhysicalMaterial", ElementKind::Material),
];

/// Tag → factory registry
#[derive(Clone, Default)]
pub struct ElementRegistry {
    factories: FxHashMap<String, ElementFactory>,
}

impl ElementRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.extend(DEFAULT_ELEMENTS.iter().copied());
        registry
    }

    /// Register a tag with the default constructor for its kind
    pub fn register(&mut self, tag: &str, kind: ElementKind) {
        let factory: ElementFactory = Arc::new(move |node: &SceneNode| {
            let attach = match node.get_prop("attach") {
                Some(PropValue::Text(slot)) => Some(slot.clone()),
                _ => kind.default_attach().map(str::to_string),
            };
            Ok(Element {
                tag: node.tag().to_string(),
                kind,
                attach,
            })
        });
        self.factories.insert(tag.to_string(), factory);
    }

    /// Register a tag with a custom constructor, replacing any previous one
    pub fn register_factory<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&SceneNode) -> Result<Element> + Send + Sync + 'static,
    {
        self.factories.insert(tag.to_string(), Arc::new(factory));
    }

    /// Register several tags at once
    pub fn extend<'a, I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = (&'a str, ElementKind)>,
    {
        for (tag, kind) in elements {
            self.register(tag, kind);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        tags.sort_unstable();
        tags
    }

    /// Instantiate a single node
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` when the tag has not been registered.
    pub fn instantiate(&self, node: &SceneNode) -> Result<Element> {
        let factory = self.factories.get(node.tag()).ok_or_else(|| {
            Error::Backend(format!(
                "'{}' is not a registered element, register it before rendering",
                node.tag()
            ))
        })?;
        factory(node)
    }

    /// Instantiate every node of a tree in pre-order
    ///
    /// Fails on the first unknown tag; nothing is returned in that case.
    pub fn instantiate_tree(&self, tree: &SceneTree) -> Result<Vec<Element>> {
        let mut elements = Vec::with_capacity(tree.node_count());
        let mut failure = None;
        tree.walk(|node, _| {
            if failure.is_some() {
                return;
            }
            match self.instantiate(node) {
                Ok(element) => elements.push(element),
                Err(err) => failure = Some(err),
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(elements),
        }
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
#[path = "element_registry_tests.rs"]
mod tests;
