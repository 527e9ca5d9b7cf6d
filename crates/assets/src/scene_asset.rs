use serde::{Deserialize, Serialize};
use spatialplane_common::{Color, NodeId, Placement};
use spatialplane_kernel::{Geometry, Material, Scene, SceneNode};

use crate::AssetError;

/// Material as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    #[serde(default = "default_material_name")]
    pub name: String,
    #[serde(default = "default_diffuse")]
    pub diffuse: Color,
}

fn default_material_name() -> String {
    "default".into()
}

fn default_diffuse() -> Color {
    Material::default().diffuse
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: default_material_name(),
            diffuse: default_diffuse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDesc {
    pub bounding_radius: f32,
    #[serde(default)]
    pub material: MaterialDesc,
}

/// One node of a scene file, with its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(default)]
    pub geometry: Option<GeometryDesc>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

/// A parsed `*.scene.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAsset {
    pub nodes: Vec<NodeDesc>,
}

impl SceneAsset {
    /// Parse and validate a scene document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AssetError> {
        let asset: Self = serde_json::from_slice(bytes)?;
        asset.validate()?;
        Ok(asset)
    }

    /// The ship the demo ships with when no scene file is configured: a `ship`
    /// group holding a single hull mesh.
    pub fn builtin_ship() -> Self {
        Self {
            nodes: vec![NodeDesc {
                name: Some("ship".into()),
                placement: Placement::default(),
                geometry: None,
                children: vec![NodeDesc {
                    name: Some("shipMesh".into()),
                    placement: Placement::default(),
                    geometry: Some(GeometryDesc {
                        bounding_radius: 1.5,
                        material: MaterialDesc {
                            name: "hull".into(),
                            diffuse: Color::rgba(0.7, 0.7, 0.75, 1.0),
                        },
                    }),
                    children: Vec::new(),
                }],
            }],
        }
    }

    pub fn node_count(&self) -> usize {
        fn count(nodes: &[NodeDesc]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.nodes)
    }

    pub fn contains(&self, name: &str) -> bool {
        fn any(nodes: &[NodeDesc], name: &str) -> bool {
            nodes
                .iter()
                .any(|n| n.name.as_deref() == Some(name) || any(&n.children, name))
        }
        any(&self.nodes, name)
    }

    /// Fail unless a node called `name` exists somewhere in the tree.
    pub fn require(&self, name: &str) -> Result<(), AssetError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(AssetError::MissingNode(name.to_string()))
        }
    }

    /// Attach every top-level node (and its subtree) under the scene root.
    /// Returns the ids of the top-level nodes.
    pub fn instantiate(&self, scene: &mut Scene) -> Result<Vec<NodeId>, AssetError> {
        let root = scene.root();
        self.nodes
            .iter()
            .map(|desc| attach(scene, root, desc))
            .collect()
    }

    fn validate(&self) -> Result<(), AssetError> {
        fn check(nodes: &[NodeDesc]) -> Result<(), AssetError> {
            for node in nodes {
                let label = node.name.as_deref().unwrap_or("<unnamed>");
                let p = &node.placement;
                if !(p.position.is_finite() && p.euler.is_finite() && p.scale.is_finite()) {
                    return Err(AssetError::InvalidScene(format!(
                        "node {label} has a non-finite placement"
                    )));
                }
                if let Some(g) = &node.geometry {
                    if !(g.bounding_radius.is_finite() && g.bounding_radius > 0.0) {
                        return Err(AssetError::InvalidScene(format!(
                            "node {label} has bounding radius {}",
                            g.bounding_radius
                        )));
                    }
                }
                check(&node.children)?;
            }
            Ok(())
        }
        if self.nodes.is_empty() {
            return Err(AssetError::InvalidScene("scene has no nodes".into()));
        }
        check(&self.nodes)
    }
}

fn attach(scene: &mut Scene, parent: NodeId, desc: &NodeDesc) -> Result<NodeId, AssetError> {
    let mut node = SceneNode::new().with_placement(desc.placement);
    node.name = desc.name.clone();
    if let Some(g) = &desc.geometry {
        node = node.with_geometry(Geometry {
            bounding_radius: g.bounding_radius,
            material: Material {
                name: g.material.name.clone(),
                diffuse: g.material.diffuse,
                emission: Color::BLACK,
            },
        });
    }
    let id = scene.add_node(parent, node)?;
    for child in &desc.children {
        attach(scene, id, child)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn parses_nested_nodes_with_defaults() {
        let json = r#"{
            "nodes": [
                {
                    "name": "ship",
                    "position": [1.0, 0.0, 2.0],
                    "children": [
                        { "name": "shipMesh", "geometry": { "bounding_radius": 2.0 } }
                    ]
                }
            ]
        }"#;
        let asset = SceneAsset::from_slice(json.as_bytes()).unwrap();
        assert_eq!(asset.node_count(), 2);
        let mesh = &asset.nodes[0].children[0];
        assert_eq!(mesh.placement, Placement::default());
        assert_eq!(mesh.geometry.as_ref().unwrap().material, MaterialDesc::default());
        assert_eq!(asset.nodes[0].placement.position, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn rejects_empty_scene() {
        let err = SceneAsset::from_slice(br#"{ "nodes": [] }"#).unwrap_err();
        assert!(matches!(err, AssetError::InvalidScene(_)));
    }

    #[test]
    fn rejects_non_positive_radius() {
        let json = br#"{ "nodes": [ { "name": "x", "geometry": { "bounding_radius": 0.0 } } ] }"#;
        assert!(matches!(
            SceneAsset::from_slice(json),
            Err(AssetError::InvalidScene(_))
        ));
    }

    #[test]
    fn require_finds_nested_names() {
        let asset = SceneAsset::builtin_ship();
        assert!(asset.require("ship").is_ok());
        assert!(asset.require("shipMesh").is_ok());
        assert!(matches!(
            asset.require("plane"),
            Err(AssetError::MissingNode(ref n)) if n == "plane"
        ));
    }

    #[test]
    fn instantiate_builds_the_subtree() {
        let mut scene = Scene::new();
        let ids = SceneAsset::builtin_ship().instantiate(&mut scene).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(scene.node_count(), 3);

        let ship = scene.find_node("ship").unwrap();
        assert_eq!(ids[0], ship);
        let mesh = scene.find_node("shipMesh").unwrap();
        assert_eq!(scene.node(mesh).unwrap().parent(), Some(ship));
        let geometry = scene.node(mesh).unwrap().geometry.as_ref().unwrap();
        assert_eq!(geometry.material.name, "hull");
        assert_eq!(geometry.material.emission, Color::BLACK);
    }
}
