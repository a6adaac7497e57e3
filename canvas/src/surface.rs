//! Rendering surface: the element tree a canvas draws into.
//!
//! The surface mirrors the parts of the host document the core cares about:
//! one root per canvas, one container per item directly under the root, and
//! the content and overlay elements inside each container. Child order is
//! document order, which is the order items are serialized in.
//!
//! Element ids come from a process-wide counter so an id from one surface
//! never resolves inside another.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of an element on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Element {
    parent: Option<ElementId>,
    class: String,
    children: Vec<ElementId>,
}

/// Element tree rooted at the canvas element.
#[derive(Debug)]
pub struct Surface {
    root: ElementId,
    elements: HashMap<ElementId, Element>,
}

impl Surface {
    /// Create a surface whose root carries `root_class`.
    #[must_use]
    pub fn new(root_class: &str) -> Self {
        let root = ElementId::next();
        let mut elements = HashMap::new();
        elements.insert(root, Element { parent: None, class: root_class.to_owned(), children: Vec::new() });
        Self { root, elements }
    }

    /// The canvas element itself.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Append a new element under `parent`. Returns `None` if `parent` is not
    /// on this surface.
    pub fn append(&mut self, parent: ElementId, class: &str) -> Option<ElementId> {
        let id = ElementId::next();
        self.elements.get_mut(&parent)?.children.push(id);
        self.elements.insert(id, Element { parent: Some(parent), class: class.to_owned(), children: Vec::new() });
        Some(id)
    }

    /// Append a new element directly under the root.
    pub fn append_to_root(&mut self, class: &str) -> ElementId {
        let id = ElementId::next();
        if let Some(root) = self.elements.get_mut(&self.root) {
            root.children.push(id);
        }
        self.elements.insert(id, Element { parent: Some(self.root), class: class.to_owned(), children: Vec::new() });
        id
    }

    /// Remove an element and everything beneath it. The root cannot be
    /// removed. Returns false if nothing was removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(element) = self.elements.remove(&id) else {
            return false;
        };
        if let Some(parent) = element.parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut pending = element.children;
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.elements.remove(&child) {
                pending.extend(removed.children);
            }
        }
        true
    }

    /// Remove every element except the root.
    pub fn clear(&mut self) {
        let root = self.root;
        self.elements.retain(|id, _| *id == root);
        if let Some(el) = self.elements.get_mut(&root) {
            el.children.clear();
        }
    }

    /// Children of `id` in document order; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements.get(&id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|el| el.parent)
    }

    #[must_use]
    pub fn class(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|el| el.class.as_str())
    }

    /// Whether `id` is on this surface.
    #[must_use]
    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Whether `id` is `ancestor` or lies somewhere beneath it.
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return self.exists(current);
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Number of direct children of `parent` carrying `class`.
    #[must_use]
    pub fn count_class(&self, parent: ElementId, class: &str) -> usize {
        self.children(parent)
            .iter()
            .filter(|c| self.class(**c) == Some(class))
            .count()
    }

    /// Number of elements below the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len() - 1
    }

    /// Returns `true` if only the root is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
