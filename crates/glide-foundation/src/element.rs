//! Element tree.
//!
//! Elements carry a tag, an optional id attribute, a class list and bounds in
//! client coordinates. The host owns layout and writes bounds in; widgets read
//! them back when a gesture needs measurements.

use crate::selector::Selector;
use glide_ui_graphics::{Point, Rect};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

pub type ElementId = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    Missing { id: ElementId },
    Cycle { parent: ElementId, child: ElementId },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Missing { id } => write!(f, "element {id} missing"),
            TreeError::Cycle { parent, child } => {
                write!(f, "appending element {child} under {parent} would create a cycle")
            }
        }
    }
}

impl std::error::Error for TreeError {}

#[derive(Clone, Debug)]
pub struct ElementData {
    tag: String,
    id_attr: Option<String>,
    classes: SmallVec<[String; 2]>,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
    bounds: Rect,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id_attr: None,
            classes: SmallVec::new(),
            parent: None,
            children: SmallVec::new(),
            bounds: Rect::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id_attr(&self) -> Option<&str> {
        self.id_attr.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[derive(Debug, Default)]
pub struct ElementTree {
    elements: FxHashMap<ElementId, ElementData>,
    next_id: ElementId,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            elements: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Creates a detached element; attach it with [`append_child`](Self::append_child).
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.elements.insert(id, ElementData::new(tag));
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(&id)
    }

    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut ElementData, TreeError> {
        self.elements
            .get_mut(&id)
            .ok_or(TreeError::Missing { id })
    }

    /// Moves `child` (and its subtree) under `parent`, after any existing children.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::Missing { id: parent });
        }
        if !self.exists(child) {
            return Err(TreeError::Missing { id: child });
        }
        if self.contains(child, parent) {
            log::warn!("refusing to append element {child} under its own descendant {parent}");
            return Err(TreeError::Cycle { parent, child });
        }
        self.detach(child)?;
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlinks `id` from its parent, keeping its own subtree intact.
    pub fn detach(&mut self, id: ElementId) -> Result<(), TreeError> {
        let parent = self.get_mut(id)?.parent.take();
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|child| *child != id);
        }
        Ok(())
    }

    /// Removes `id` and every descendant.
    pub fn remove(&mut self, id: ElementId) -> Result<(), TreeError> {
        self.detach(id)?;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(data) = self.elements.remove(&current) {
                pending.extend(data.children.iter().copied());
            }
        }
        Ok(())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(ElementData::parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(ElementData::children).unwrap_or(&[])
    }

    /// `id` followed by each of its ancestors, innermost first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.exists(id).then_some(id);
        std::iter::successors(start, move |current| self.parent(*current))
    }

    /// True when `node` is `ancestor` or lies anywhere beneath it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.ancestors(node).any(|current| current == ancestor)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), TreeError> {
        self.get_mut(id)?.bounds = bounds;
        Ok(())
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(ElementData::bounds)
    }

    pub fn set_id_attr(&mut self, id: ElementId, value: &str) -> Result<(), TreeError> {
        self.get_mut(id)?.id_attr = Some(value.to_string());
        Ok(())
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) -> Result<(), TreeError> {
        let data = self.get_mut(id)?;
        if !data.has_class(class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> Result<(), TreeError> {
        self.get_mut(id)?
            .classes
            .retain(|existing| existing != class);
        Ok(())
    }

    pub fn set_class(&mut self, id: ElementId, class: &str, enabled: bool) -> Result<(), TreeError> {
        if enabled {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|data| data.has_class(class))
    }

    /// Nearest element, starting at `id` itself, that matches `selector`.
    pub fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        self.ancestors(id)
            .find(|current| selector.matches(self, *current))
    }

    /// Deepest element under `point`; later siblings are on top of earlier ones.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        let mut roots: SmallVec<[ElementId; 4]> = self
            .elements
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| *id)
            .collect();
        roots.sort_unstable();
        roots
            .iter()
            .rev()
            .find_map(|root| self.hit_test_from(*root, point))
    }

    fn hit_test_from(&self, id: ElementId, point: Point) -> Option<ElementId> {
        let data = self.get(id)?;
        data.children
            .iter()
            .rev()
            .find_map(|child| self.hit_test_from(*child, point))
            .or_else(|| data.bounds.contains_point(point).then_some(id))
    }
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
