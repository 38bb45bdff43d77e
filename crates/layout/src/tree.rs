//! Arena-backed renderer tree.
//!
//! Nodes are addressed by [`NodeId`]. Children are owned through the id
//! lists of their parent and hold a plain back-reference to it, so split and
//! overflow fragments can be created and re-parented without touching the
//! rest of the tree. Nodes are never removed: a fragment that is replaced by
//! its split/overflow pair simply becomes unreachable.

use crate::LayoutError;
use crate::interface::LayoutArea;
use crate::model::{ElementKind, SharedElement};
use crate::nodes::paragraph::ParagraphState;
use crate::nodes::text::TextState;
use crate::properties::{FromProperty, Property, PropertyStore, PropertyValue};
use folio_style::{BaseDirection, Float, Position};
use folio_types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The tree root. Holds fixed-position children and owns the deferred
    /// paint pass.
    Document,
    Block,
    Paragraph(ParagraphState),
    Text(TextState),
    Image,
    Table,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Block => "Block",
            NodeKind::Paragraph(_) => "Paragraph",
            NodeKind::Text(_) => "Text",
            NodeKind::Image => "Image",
            NodeKind::Table => "Table",
        }
    }

    fn for_element(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Document => NodeKind::Document,
            ElementKind::Div | ElementKind::Cell => NodeKind::Block,
            ElementKind::Paragraph => NodeKind::Paragraph(ParagraphState::default()),
            ElementKind::Text(_) => NodeKind::Text(TextState::default()),
            ElementKind::Image(_) => NodeKind::Image,
            ElementKind::Table { .. } => NodeKind::Table,
        }
    }

    /// Renderer-level defaults, consulted before the model element's.
    fn default_property(&self, key: Property) -> Option<PropertyValue> {
        match (self, key) {
            (NodeKind::Document, Property::BaseDirection) => {
                Some(PropertyValue::Direction(BaseDirection::LeftToRight))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderNode {
    pub kind: NodeKind,
    pub properties: PropertyStore,
    /// Shared with every other renderer of the same element.
    pub model: Option<SharedElement>,
    pub parent: Option<NodeId>,
    /// Flow children, in document order.
    pub children: Vec<NodeId>,
    /// Fixed and absolute children held by this node.
    pub positioned: Vec<NodeId>,
    pub occupied: Option<LayoutArea>,
    flushed: bool,
}

impl RenderNode {
    pub fn new(kind: NodeKind, model: Option<SharedElement>) -> Self {
        Self {
            kind,
            properties: PropertyStore::new(),
            model,
            parent: None,
            children: Vec::new(),
            positioned: Vec::new(),
            occupied: None,
            flushed: false,
        }
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }
}

#[derive(Debug, Default)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, node: RenderNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &RenderNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut RenderNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn positioned_children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].positioned
    }

    pub fn occupied(&self, id: NodeId) -> Option<LayoutArea> {
        self.nodes[id.0].occupied
    }

    pub fn set_occupied(&mut self, id: NodeId, area: LayoutArea) {
        self.nodes[id.0].occupied = Some(area);
    }

    pub fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.nodes[id.0].parent {
            id = parent;
        }
        id
    }

    // --- Construction ---

    /// Creates the renderer for a model element, without its children.
    pub fn create_renderer(&mut self, model: &SharedElement) -> NodeId {
        let kind = NodeKind::for_element(&model.borrow().kind);
        self.insert(RenderNode::new(kind, Some(model.clone())))
    }

    /// Creates the renderer for `model` and, recursively, for its children.
    pub fn build(&mut self, model: &SharedElement) -> NodeId {
        let id = self.create_renderer(model);
        let children: Vec<SharedElement> = model.borrow().children().to_vec();
        for child in &children {
            let child_id = self.build(child);
            self.add_child(id, child_id);
        }
        id
    }

    /// A fresh renderer for the same model element, with no layout state.
    pub fn create_next_renderer(&mut self, id: NodeId) -> Result<NodeId, LayoutError> {
        let model = self.nodes[id.0].model.clone().ok_or_else(|| {
            LayoutError::InvalidTree(format!("node {} has no model element", id.0))
        })?;
        Ok(self.create_renderer(&model))
    }

    /// Copies a node for use as a split or overflow fragment.
    ///
    /// The copy shares the model element, takes a copy of the property store
    /// and the node state, and starts with no children and no occupied area.
    pub fn create_copy(&mut self, id: NodeId) -> NodeId {
        let source = &self.nodes[id.0];
        let mut copy = RenderNode::new(source.kind.clone(), source.model.clone());
        copy.properties = source.properties.clone();
        copy.parent = source.parent;
        self.insert(copy)
    }

    /// Replaces the flow children of `id`, re-parenting them.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes[id.0].children = children;
    }

    /// Routes `child` to the list it belongs in according to its positioning
    /// scheme.
    ///
    /// Static and relative children join `parent`'s flow. Fixed children go
    /// to the root's positioned list; absolute children to the nearest
    /// positioned ancestor, or stay with `parent` when they declare no
    /// offsets. Positioned children that were queued on `child` while it had
    /// no parent are routed again from `parent` afterwards.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        match self.position(child) {
            Position::Static | Position::Relative => {
                self.nodes[parent.0].children.push(child);
                self.nodes[child.0].parent = Some(parent);
            }
            Position::Fixed => {
                let root = self.root_of(parent);
                if root == parent {
                    self.push_positioned(parent, child);
                } else {
                    self.add_child(root, child);
                }
            }
            Position::Absolute => {
                let no_position_info = self.no_absolute_position_info(child);
                let mut holder = parent;
                while !self.is_positioned(holder) && !no_position_info {
                    match self.nodes[holder.0].parent {
                        Some(next) => holder = next,
                        None => break,
                    }
                }
                if holder == parent {
                    self.push_positioned(parent, child);
                } else {
                    self.add_child(holder, child);
                }
            }
        }

        if self.nodes[child.0].positioned.is_empty() {
            return;
        }
        // Fixed entries always travel to the root. Absolute entries stop at
        // the first positioned holder or when they declare no offsets.
        let holds_absolute = self.is_positioned(child);
        let queued = std::mem::take(&mut self.nodes[child.0].positioned);
        let (lift, stay): (Vec<NodeId>, Vec<NodeId>) = queued.into_iter().partition(|p| {
            self.position(*p) == Position::Fixed
                || (!holds_absolute && !self.no_absolute_position_info(*p))
        });
        self.nodes[child.0].positioned = stay;
        for p in lift {
            self.add_child(parent, p);
        }
    }

    fn push_positioned(&mut self, holder: NodeId, child: NodeId) {
        self.nodes[holder.0].positioned.push(child);
        self.nodes[child.0].parent = Some(holder);
    }

    // --- Property resolution ---

    /// Resolves `key`: own store, model element, parent (inherited keys
    /// only), renderer default, model default.
    pub fn property(&self, id: NodeId, key: Property) -> Option<PropertyValue> {
        let node = &self.nodes[id.0];
        if let Some(value) = node.properties.get(key) {
            return Some(value.clone());
        }
        if let Some(model) = &node.model
            && let Some(value) = model.borrow().property(key)
        {
            return Some(value);
        }
        if key.is_inherited()
            && let Some(parent) = node.parent
            && let Some(value) = self.property(parent, key)
        {
            return Some(value);
        }
        if let Some(value) = node.kind.default_property(key) {
            return Some(value);
        }
        match &node.model {
            Some(model) => model.borrow().default_property(key),
            None => key.default_value(),
        }
    }

    pub fn get<T: FromProperty>(&self, id: NodeId, key: Property) -> Option<T> {
        self.property(id, key)
            .and_then(|value| T::from_property(&value))
    }

    pub fn get_or_default<T: FromProperty>(&self, id: NodeId, key: Property, default: T) -> T {
        self.get(id, key).unwrap_or(default)
    }

    pub fn as_float(&self, id: NodeId, key: Property) -> Option<f32> {
        self.property(id, key).and_then(|v| v.as_float())
    }

    pub fn as_int(&self, id: NodeId, key: Property) -> Option<i32> {
        self.property(id, key).and_then(|v| v.as_int())
    }

    pub fn as_bool(&self, id: NodeId, key: Property) -> Option<bool> {
        self.property(id, key).and_then(|v| v.as_bool())
    }

    pub fn as_color(&self, id: NodeId, key: Property) -> Option<Color> {
        self.property(id, key).and_then(|v| v.as_color())
    }

    /// Mirrors [`property`](Self::property): true when resolution yields a value.
    pub fn has_property(&self, id: NodeId, key: Property) -> bool {
        self.property(id, key).is_some()
    }

    pub fn has_own_property(&self, id: NodeId, key: Property) -> bool {
        self.nodes[id.0].properties.contains(key)
    }

    pub fn set_own(&mut self, id: NodeId, key: Property, value: PropertyValue) {
        self.nodes[id.0].properties.set(key, value);
    }

    pub fn delete_own(&mut self, id: NodeId, key: Property) -> Option<PropertyValue> {
        self.nodes[id.0].properties.remove(key)
    }

    /// Removes `key` from the node if it declares it, otherwise from its
    /// model element.
    pub fn delete(&mut self, id: NodeId, key: Property) -> Option<PropertyValue> {
        let node = &mut self.nodes[id.0];
        if node.properties.contains(key) {
            return node.properties.remove(key);
        }
        node.model
            .as_ref()
            .and_then(|model| model.borrow_mut().remove_property(key))
    }

    // --- Positioning predicates ---

    pub fn position(&self, id: NodeId) -> Position {
        self.get(id, Property::Position).unwrap_or_default()
    }

    pub fn is_positioned(&self, id: NodeId) -> bool {
        self.position(id).is_positioned()
    }

    pub fn is_floating(&self, id: NodeId) -> bool {
        !matches!(
            self.get::<Float>(id, Property::Float).unwrap_or_default(),
            Float::None
        )
    }

    /// None of top/right/bottom/left is declared.
    pub fn no_absolute_position_info(&self, id: NodeId) -> bool {
        [Property::Top, Property::Right, Property::Bottom, Property::Left]
            .into_iter()
            .all(|key| !self.has_property(id, key))
    }

    // --- Geometry and paint state ---

    /// Moves the occupied areas of `id` and everything it contains.
    pub fn move_node(&mut self, id: NodeId, dx: f32, dy: f32) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            if let Some(area) = node.occupied.as_mut() {
                area.rect.x += dx;
                area.rect.y += dy;
            }
            stack.extend(node.positioned.iter().copied());
            match &mut node.kind {
                // Laid-out paragraphs own their content through line fragments.
                NodeKind::Paragraph(state) if !state.lines.is_empty() => {
                    for line in &mut state.lines {
                        line.rect.x += dx;
                        line.rect.y += dy;
                        line.baseline += dy;
                        stack.extend(line.fragments.iter().copied());
                    }
                }
                _ => stack.extend(node.children.iter().copied()),
            }
        }
    }

    pub fn is_flushed(&self, id: NodeId) -> bool {
        self.nodes[id.0].flushed
    }

    /// Marks the node as drawn. Drawing a node twice is a contract violation.
    pub fn mark_flushed(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = &mut self.nodes[id.0];
        if node.flushed {
            return Err(LayoutError::InvalidTree(format!(
                "{} node {} was already flushed",
                node.kind.name(),
                id.0
            )));
        }
        node.flushed = true;
        Ok(())
    }
}
