//! Element registry - the authoritative store of placed elements.
//!
//! Elements live in a single id-keyed map; insertion order is tracked
//! separately so each kind keeps its creation order. Paint order is kind
//! first (text, rectangles, circles, images), then insertion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element::clamp_scale;
use crate::{CanvasError, CanvasResult, Element, ElementId, ElementKind, KindTag, Transform};

/// The authoritative set of elements on a canvas.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// All elements, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Element IDs in insertion order.
    order: Vec<ElementId>,
    /// Last allocated raw ID.
    last_id: u64,
}

/// Serialized form of a [`Registry`].
#[derive(Debug, Serialize, Deserialize)]
struct RegistrySnapshot {
    last_id: u64,
    elements: Vec<Element>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new element at the origin with unit scale.
    ///
    /// Returns the freshly allocated ID.
    pub fn add(&mut self, kind: ElementKind) -> ElementId {
        self.last_id += 1;
        let id = ElementId::from_raw(self.last_id);
        tracing::info!("Added {} element {id}", kind.tag());
        self.elements.insert(id, Element::new(id, kind));
        self.order.push(id);
        id
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Check whether an element is present.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Replace an element's position.
    ///
    /// Returns `false` (and changes nothing) if the element is gone.
    pub fn update_position(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            tracing::debug!("Position update for missing element {id} ignored");
            return false;
        };
        element.transform.x = x;
        element.transform.y = y;
        true
    }

    /// Replace an element's position and scale.
    ///
    /// Scale is clamped to the floor; text elements keep unit scale.
    /// Returns `false` (and changes nothing) if the element is gone.
    pub fn update_transform(&mut self, id: ElementId, x: f32, y: f32, scale: f32) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            tracing::debug!("Transform update for missing element {id} ignored");
            return false;
        };
        let scale = if element.kind.is_scalable() {
            clamp_scale(scale)
        } else {
            1.0
        };
        element.transform = Transform { x, y, scale };
        true
    }

    /// Replace a text element's label.
    ///
    /// Returns `false` if the element is gone or is not text.
    pub fn update_label(&mut self, id: ElementId, text: &str) -> bool {
        match self.elements.get_mut(&id).map(|e| &mut e.kind) {
            Some(ElementKind::Text { label }) => {
                text.clone_into(label);
                true
            }
            Some(_) => {
                tracing::debug!("Label update for non-text element {id} ignored");
                false
            }
            None => {
                tracing::debug!("Label update for missing element {id} ignored");
                false
            }
        }
    }

    /// Remove an element. Removing an absent ID is a no-op.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.elements.remove(&id)?;
        self.order.retain(|&eid| eid != id);
        tracing::info!("Removed {} element {id}", removed.tag());
        Some(removed)
    }

    /// Remove every element. IDs are still never reused.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
    }

    /// Element IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.order.iter().copied()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Elements of one kind, in insertion order.
    pub fn elements_of(&self, tag: KindTag) -> impl Iterator<Item = &Element> {
        self.elements().filter(move |e| e.tag() == tag)
    }

    /// Elements in paint order: kind first, then insertion.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<_> = self.elements().collect();
        // Stable sort keeps insertion order within a kind.
        ordered.sort_by_key(|e| e.tag());
        ordered
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the registry to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        let snapshot = RegistrySnapshot {
            last_id: self.last_id,
            elements: self.elements().cloned().collect(),
        };
        serde_json::to_string_pretty(&snapshot).map_err(CanvasError::Serialization)
    }

    /// Deserialize a registry from JSON.
    ///
    /// The ID counter is advanced past every stored ID so new elements never
    /// collide with loaded ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicate IDs.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json)?;
        let mut registry = Self {
            last_id: snapshot.last_id,
            ..Self::default()
        };
        for mut element in snapshot.elements {
            let id = element.id;
            if registry.elements.contains_key(&id) {
                return Err(CanvasError::InvalidSnapshot(format!("duplicate element {id}")));
            }
            element.transform.scale = if element.kind.is_scalable() {
                clamp_scale(element.transform.scale)
            } else {
                1.0
            };
            registry.last_id = registry.last_id.max(id.get());
            registry.order.push(id);
            registry.elements.insert(id, element);
        }
        Ok(registry)
    }
}
