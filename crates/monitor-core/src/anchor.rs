//! Locates the monitor's screen mesh inside the loaded PC asset and derives
//! where the overlay panel and the close-up camera should go.

use crate::constants::{reference_viewpoint_vec3, SCREEN_MESH_NAME};
use crate::scene::SceneNode;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use thiserror::Error;

const MIN_EXTENT: f32 = 1e-6;
const MIN_DETERMINANT: f32 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocateError {
    #[error("mesh named {name:?} not found in asset")]
    MeshNotFound { name: String },
    #[error("node {name:?} has no geometry")]
    MissingGeometry { name: String },
    #[error("mesh {name:?} has degenerate bounds")]
    DegenerateBounds { name: String },
    #[error("ancestor transform is not invertible")]
    SingularAncestor,
}

/// World and ancestor-local placement of the screen surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenAnchor {
    pub world_center: Vec3,
    /// Unit length, facing the reference viewpoint.
    pub world_normal: Vec3,
    pub world_width: f32,
    pub world_height: f32,
    pub local_center: Vec3,
    /// Axis-corrected orientation relative to the ancestor.
    pub local_rotation: Quat,
    /// `local_rotation` as XYZ Euler angles in radians.
    pub local_euler: Vec3,
    pub local_width: f32,
    pub local_height: f32,
    /// Accumulated world scale (x) of the ancestor group.
    pub ancestor_scale: f32,
}

impl ScreenAnchor {
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.world_width / self.world_height
    }
}

/// Rotation mapping the asset's Z-up, Y-back authoring frame onto Y-up, Z-forward.
#[inline]
pub fn axis_correction() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2) * Quat::from_rotation_y(PI)
}

#[derive(Clone, Debug)]
pub struct ScreenLocator {
    pub mesh_name: String,
    pub reference_viewpoint: Vec3,
}

impl Default for ScreenLocator {
    fn default() -> Self {
        Self {
            mesh_name: SCREEN_MESH_NAME.to_string(),
            reference_viewpoint: reference_viewpoint_vec3(),
        }
    }
}

impl ScreenLocator {
    pub fn new(mesh_name: impl Into<String>, reference_viewpoint: Vec3) -> Self {
        Self {
            mesh_name: mesh_name.into(),
            reference_viewpoint,
        }
    }

    /// `scene_root` is treated as a direct child of the ancestor group whose
    /// world matrix is `ancestor`.
    pub fn locate(&self, scene_root: &SceneNode, ancestor: Mat4) -> Result<ScreenAnchor, LocateError> {
        locate(scene_root, &self.mesh_name, ancestor, self.reference_viewpoint)
    }
}

pub fn locate(
    scene_root: &SceneNode,
    mesh_name: &str,
    ancestor: Mat4,
    reference_viewpoint: Vec3,
) -> Result<ScreenAnchor, LocateError> {
    if ancestor.determinant().abs() < MIN_DETERMINANT {
        return Err(LocateError::SingularAncestor);
    }
    let hit = scene_root
        .find_with_world(mesh_name, ancestor)
        .ok_or_else(|| LocateError::MeshNotFound {
            name: mesh_name.to_string(),
        })?;
    let bounds = hit
        .node
        .geometry
        .as_ref()
        .and_then(|g| g.bounding_box())
        .ok_or_else(|| LocateError::MissingGeometry {
            name: mesh_name.to_string(),
        })?;
    let size = bounds.size();
    let mesh_world = hit.world;

    // Pose relative to the ancestor: ancestor^-1 * mesh_world
    let local_matrix = ancestor.inverse() * mesh_world;
    let (local_scale, local_quat, _) = local_matrix.to_scale_rotation_translation();
    let (world_scale, world_quat, _) = mesh_world.to_scale_rotation_translation();
    let (ancestor_scale, _, _) = ancestor.to_scale_rotation_translation();

    let fix = axis_correction();
    let local_rotation = (local_quat * fix).normalize();
    let (ex, ey, ez) = local_rotation.to_euler(EulerRot::XYZ);

    let world_center = mesh_world.transform_point3(bounds.center());
    let local_center = local_matrix.transform_point3(bounds.center());

    let world_normal = facing_normal(world_quat * fix, world_center, reference_viewpoint);

    let [local_width, local_height, _] = sorted_extents(size * local_scale.abs());
    let [world_width, world_height, _] = sorted_extents(size * world_scale.abs());
    if world_height <= MIN_EXTENT || local_height <= MIN_EXTENT {
        return Err(LocateError::DegenerateBounds {
            name: mesh_name.to_string(),
        });
    }

    log::debug!(
        "[locator] {:?} {:.3}x{:.3} world, {:.3}x{:.3} local",
        mesh_name,
        world_width,
        world_height,
        local_width,
        local_height
    );
    Ok(ScreenAnchor {
        world_center,
        world_normal,
        world_width,
        world_height,
        local_center,
        local_rotation,
        local_euler: Vec3::new(ex, ey, ez),
        local_width,
        local_height,
        ancestor_scale: ancestor_scale.x.abs(),
    })
}

/// Local +Z under `rotation`, flipped if it points away from `viewpoint`.
fn facing_normal(rotation: Quat, center: Vec3, viewpoint: Vec3) -> Vec3 {
    let n = (rotation * Vec3::Z).normalize();
    if n.dot(viewpoint - center) < 0.0 {
        -n
    } else {
        n
    }
}

/// Extents sorted largest first: width, height, depth.
fn sorted_extents(v: Vec3) -> [f32; 3] {
    let mut dims = v.to_array();
    dims.sort_by(|a, b| b.total_cmp(a));
    dims
}
