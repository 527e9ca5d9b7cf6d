use glam::{Mat4, Vec3};
use spatialplane_common::{Color, NodeId, Placement};
use std::collections::BTreeMap;

/// An event record produced by every mutation to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Node was attached under `parent`.
    NodeAdded {
        id: NodeId,
        parent: NodeId,
        name: Option<String>,
    },
    /// Node transform was overwritten.
    TransformUpdated { id: NodeId, old: Mat4, new: Mat4 },
    /// Material emission changed.
    EmissionChanged { id: NodeId, old: Color, new: Color },
}

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("no node named {0:?}")]
    NameNotFound(String),
    #[error("node {0:?} has no geometry")]
    NoGeometry(NodeId),
    #[error("node {0:?} has no camera")]
    NoCamera(NodeId),
}

/// Surface material. Only emission is animated at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Color,
    pub emission: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            diffuse: Color::rgba(0.8, 0.8, 0.8, 1.0),
            emission: Color::BLACK,
        }
    }
}

/// Renderable geometry, reduced to what hit testing needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Radius of the bounding sphere in node-local units.
    pub bounding_radius: f32,
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// `scale` is half the visible height in world units.
    Orthographic { scale: f32 },
    Perspective { fov_degrees: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Projection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Omni,
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: Option<String>,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    pub geometry: Option<Geometry>,
    pub camera: Option<Camera>,
    pub light: Option<Light>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: None,
            transform: Mat4::IDENTITY,
            geometry: None,
            camera: None,
            light: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl SceneNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.transform = placement.matrix();
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    /// Local position: the translation column of the transform.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The scene graph.
///
/// Nodes are keyed by id in a BTreeMap; traversal order follows each node's
/// child list, so lookups by name are deterministic.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    root: NodeId,
    event_log: Vec<SceneEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene containing only an unnamed root node.
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = BTreeMap::new();
        nodes.insert(root, SceneNode::new());
        Self {
            nodes,
            root,
            event_log: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Attach `node` as the last child of `parent`. Returns its id.
    pub fn add_node(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        Ok(self.attach(parent, node))
    }

    /// Attach `node` directly under the root.
    pub fn add_child(&mut self, node: SceneNode) -> NodeId {
        self.attach(self.root, node)
    }

    fn attach(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId::new();
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        node.parent = Some(parent);
        node.children.clear();
        tracing::trace!(id = %id.short(), name = ?node.name, "node added");
        self.event_log.push(SceneEvent::NodeAdded {
            id,
            parent,
            name: node.name.clone(),
        });
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Depth-first, pre-order search from the root for the first node named `name`.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(&id)?;
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Like [`Scene::find_node`], but a missing node is an error.
    pub fn require_node(&self, name: &str) -> Result<NodeId, SceneError> {
        self.find_node(name)
            .ok_or_else(|| SceneError::NameNotFound(name.to_string()))
    }

    /// All node ids in depth-first, pre-order from the root.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Overwrite a node's local transform and log the change.
    pub fn set_transform(&mut self, id: NodeId, new: Mat4) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        let old = node.transform;
        node.transform = new;
        self.event_log
            .push(SceneEvent::TransformUpdated { id, old, new });
        Ok(())
    }

    /// Set the emission color of a node's material and log the change.
    pub fn set_emission(&mut self, id: NodeId, new: Color) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        let geometry = node.geometry.as_mut().ok_or(SceneError::NoGeometry(id))?;
        let old = geometry.material.emission;
        geometry.material.emission = new;
        self.event_log
            .push(SceneEvent::EmissionChanged { id, old, new });
        Ok(())
    }

    /// Node transform in scene space: ancestors' transforms applied outermost first.
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;
        let mut m = node.transform;
        while let Some(parent) = node.parent {
            node = self
                .nodes
                .get(&parent)
                .ok_or(SceneError::NodeNotFound(parent))?;
            m = node.transform * m;
        }
        Ok(m)
    }
}
