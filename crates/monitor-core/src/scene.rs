//! Minimal typed scene graph mirrored from the loaded 3D asset.
//!
//! The rendering framework owns the real asset; the monitor only needs named
//! lookup, local transforms to compose world matrices, and mesh vertex
//! positions to compute bounding boxes.

use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Mesh geometry reduced to what bounding-box computation needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Eight corners of a box of `size` centered on `center`.
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        let h = size * 0.5;
        let positions = (0..8)
            .map(|i| {
                let sx = if i & 1 == 0 { -h.x } else { h.x };
                let sy = if i & 2 == 0 { -h.y } else { h.y };
                let sz = if i & 4 == 0 { -h.z } else { h.z };
                center + Vec3::new(sx, sy, sz)
            })
            .collect();
        Self { positions }
    }

    /// Build from a flat `[x, y, z, x, y, z, ...]` buffer; trailing partial triples are ignored.
    pub fn from_flat(buffer: &[f32]) -> Self {
        let positions = buffer
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self { positions }
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub geometry: Option<Geometry>,
    pub children: Vec<SceneNode>,
}

/// A node found during traversal together with its accumulated world matrix.
#[derive(Clone, Copy, Debug)]
pub struct NodeHit<'a> {
    pub node: &'a SceneNode,
    pub world: Mat4,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// First node (depth-first, pre-order, self included) named exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_name(name))
    }

    /// Same traversal as [`find_by_name`](Self::find_by_name), composing
    /// `parent_world · local` down the path to the match.
    pub fn find_with_world(&self, name: &str, parent_world: Mat4) -> Option<NodeHit<'_>> {
        let world = parent_world * self.transform.matrix();
        if self.name == name {
            return Some(NodeHit { node: self, world });
        }
        self.children
            .iter()
            .find_map(|c| c.find_with_world(name, world))
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}

/// Flat node list filled in from a host that cannot hand over a tree, e.g.
/// across the JS boundary. Parents must be added before their children.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    nodes: Vec<SceneNode>,
    parents: Vec<Option<usize>>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` and return its index. Unknown parents
    /// (including forward references) attach the node at the root.
    pub fn add(&mut self, parent: Option<usize>, node: SceneNode) -> usize {
        let index = self.nodes.len();
        let parent = parent.filter(|&p| p < index);
        self.nodes.push(node);
        self.parents.push(parent);
        index
    }

    pub fn set_geometry(&mut self, index: usize, geometry: Geometry) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.geometry = Some(geometry);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.parents.clear();
    }

    /// Assemble the tree under an identity root named `root_name`, keeping insertion order among siblings.
    pub fn build(&self, root_name: &str) -> SceneNode {
        let mut nodes: Vec<Option<SceneNode>> = self.nodes.iter().cloned().map(Some).collect();
        // children always come after parents, so folding back to front completes each subtree first
        for i in (0..nodes.len()).rev() {
            if let Some(p) = self.parents[i] {
                if let Some(child) = nodes[i].take() {
                    if let Some(parent) = nodes[p].as_mut() {
                        parent.children.insert(0, child);
                    }
                }
            }
        }
        let mut root = SceneNode::new(root_name);
        root.children = nodes.into_iter().flatten().collect();
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_returns_first_preorder_match() {
        let scene = SceneNode::new("root")
            .with_child(SceneNode::new("a").with_child(SceneNode::new("Screen")))
            .with_child(
                SceneNode::new("Screen")
                    .with_transform(Transform::from_translation(Vec3::X)),
            );
        let hit = scene.find_with_world("Screen", Mat4::IDENTITY).unwrap();
        assert_eq!(hit.node.transform, Transform::IDENTITY);
        assert_eq!(scene.node_count(), 4);
    }

    #[test]
    fn cuboid_bounds_match_size() {
        let g = Geometry::cuboid(Vec3::new(0.0, 1.0, 0.2), Vec3::new(0.4, 0.3, 0.02));
        let b = g.bounding_box().unwrap();
        assert!((b.size() - Vec3::new(0.4, 0.3, 0.02)).length() < 1e-6);
        assert!((b.center() - Vec3::new(0.0, 1.0, 0.2)).length() < 1e-6);
    }

    #[test]
    fn flat_buffer_drops_partial_triple() {
        let g = Geometry::from_flat(&[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 9.0]);
        assert_eq!(g.positions.len(), 2);
    }

    #[test]
    fn builder_assembles_tree_in_order() {
        let mut b = SceneBuilder::new();
        let pc = b.add(None, SceneNode::new("PC"));
        let case = b.add(Some(pc), SceneNode::new("Case"));
        let screen = b.add(Some(pc), SceneNode::new("Screen"));
        b.add(Some(case), SceneNode::new("Fan"));
        b.add(Some(99), SceneNode::new("Orphan"));
        assert!(b.set_geometry(screen, Geometry::cuboid(Vec3::ZERO, Vec3::ONE)));
        assert!(!b.set_geometry(42, Geometry::default()));

        let root = b.build("asset");
        assert_eq!(root.node_count(), 6);
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["PC", "Orphan"]);
        let pc_names: Vec<&str> = root.children[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(pc_names, ["Case", "Screen"]);
        assert!(root.find_by_name("Screen").and_then(|n| n.geometry.as_ref()).is_some());
        assert!(root.find_by_name("Fan").is_some());
    }
}
