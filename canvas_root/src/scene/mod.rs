//! Scene module
//!
//! Declarative scene trees handed to roots, and the element registry that
//! backends use to instantiate them.

mod element_registry;
mod scene_tree;

pub use element_registry::{Element, ElementFactory, ElementKind, ElementRegistry};
pub use scene_tree::{PropValue, SceneHandle, SceneNode, SceneTree};
