// Host-side tests for locating the screen mesh inside a loaded asset.

use glam::{Mat4, Quat, Vec3};
use monitor_core::anchor::{axis_correction, locate, LocateError, ScreenLocator};
use monitor_core::constants::{reference_viewpoint_vec3, SCREEN_MESH_NAME};
use monitor_core::scene::{Geometry, SceneNode, Transform};

fn pc_asset(screen_size: Vec3, screen_center: Vec3) -> SceneNode {
    SceneNode::new("PC")
        .with_child(SceneNode::new("Case").with_geometry(Geometry::cuboid(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.5, 0.4, 0.5),
        )))
        .with_child(
            SceneNode::new(SCREEN_MESH_NAME)
                .with_transform(Transform::from_translation(screen_center))
                .with_geometry(Geometry::cuboid(Vec3::ZERO, screen_size)),
        )
}

#[test]
fn locates_reference_screen() {
    let scene = pc_asset(Vec3::new(0.4, 0.3, 0.02), Vec3::new(0.0, 1.0, 0.2));
    let anchor = ScreenLocator::default()
        .locate(&scene, Mat4::IDENTITY)
        .unwrap();

    assert!((anchor.world_width - 0.4).abs() < 1e-5);
    assert!((anchor.world_height - 0.3).abs() < 1e-5);
    assert!((anchor.local_width - 0.4).abs() < 1e-5);
    assert!((anchor.local_height - 0.3).abs() < 1e-5);
    assert!(anchor.world_center.abs_diff_eq(Vec3::new(0.0, 1.0, 0.2), 1e-5));
    assert!(anchor.local_center.abs_diff_eq(Vec3::new(0.0, 1.0, 0.2), 1e-5));
    assert!((anchor.ancestor_scale - 1.0).abs() < 1e-6);
}

#[test]
fn dimensions_positive_and_normal_unit_facing_viewer() {
    let viewpoint = reference_viewpoint_vec3();
    let rotations = [
        Quat::IDENTITY,
        Quat::from_rotation_y(0.7),
        Quat::from_rotation_x(-1.2),
        Quat::from_rotation_z(2.5) * Quat::from_rotation_y(-0.4),
    ];
    for rotation in rotations {
        let scene = SceneNode::new("PC").with_child(
            SceneNode::new("Screen")
                .with_transform(
                    Transform::from_translation(Vec3::new(0.1, 0.9, 0.3)).with_rotation(rotation),
                )
                .with_geometry(Geometry::cuboid(Vec3::ZERO, Vec3::new(0.5, 0.35, 0.03))),
        );
        let anchor = locate(&scene, "Screen", Mat4::IDENTITY, viewpoint).unwrap();
        assert!(anchor.world_width > 0.0 && anchor.world_height > 0.0);
        assert!(anchor.world_width >= anchor.world_height);
        assert!((anchor.world_normal.length() - 1.0).abs() < 1e-4);
        assert!(anchor.world_normal.dot(viewpoint - anchor.world_center) >= 0.0);
    }
}

#[test]
fn ancestor_scale_and_offset_are_factored_out() {
    let scene = pc_asset(Vec3::new(0.4, 0.3, 0.02), Vec3::new(0.0, 1.0, 0.2));
    let ancestor = Mat4::from_scale_rotation_translation(
        Vec3::splat(2.0),
        Quat::IDENTITY,
        Vec3::new(3.0, 0.0, -1.0),
    );
    let anchor = locate(&scene, "Screen", ancestor, reference_viewpoint_vec3()).unwrap();

    assert!((anchor.world_width - 0.8).abs() < 1e-4);
    assert!((anchor.world_height - 0.6).abs() < 1e-4);
    assert!((anchor.local_width - 0.4).abs() < 1e-4);
    assert!((anchor.local_height - 0.3).abs() < 1e-4);
    assert!(anchor.world_center.abs_diff_eq(Vec3::new(3.0, 2.0, -0.6), 1e-4));
    assert!(anchor.local_center.abs_diff_eq(Vec3::new(0.0, 1.0, 0.2), 1e-4));
    assert!((anchor.ancestor_scale - 2.0).abs() < 1e-5);
}

#[test]
fn repeated_locate_on_unchanged_scene_is_identical() {
    let scene = SceneNode::new("Desk").with_child(
        pc_asset(Vec3::new(0.4, 0.3, 0.02), Vec3::new(0.0, 1.0, 0.2)).with_transform(
            Transform::from_translation(Vec3::new(0.3, 0.7, -0.2))
                .with_rotation(Quat::from_rotation_y(0.35)),
        ),
    );
    let ancestor = Mat4::from_scale_rotation_translation(
        Vec3::splat(0.8),
        Quat::from_rotation_y(-0.6),
        Vec3::new(1.2, 0.0, -0.6),
    );
    let locator = ScreenLocator::default();
    let first = locator.locate(&scene, ancestor).unwrap();
    let second = locator.locate(&scene, ancestor).unwrap();
    assert_eq!(first, second);
}

#[test]
fn local_rotation_includes_axis_correction() {
    let scene = pc_asset(Vec3::new(0.4, 0.3, 0.02), Vec3::ZERO);
    let anchor = locate(&scene, "Screen", Mat4::IDENTITY, reference_viewpoint_vec3()).unwrap();
    assert!(anchor.local_rotation.abs_diff_eq(axis_correction(), 1e-5));
    let rebuilt = Quat::from_euler(
        glam::EulerRot::XYZ,
        anchor.local_euler.x,
        anchor.local_euler.y,
        anchor.local_euler.z,
    );
    assert!(rebuilt.dot(anchor.local_rotation).abs() > 0.9999);
}

#[test]
fn missing_mesh_is_reported() {
    let scene = SceneNode::new("PC").with_child(SceneNode::new("Keyboard"));
    let err = ScreenLocator::default()
        .locate(&scene, Mat4::IDENTITY)
        .unwrap_err();
    assert_eq!(
        err,
        LocateError::MeshNotFound {
            name: "Screen".into()
        }
    );
}

#[test]
fn screen_without_geometry_is_reported() {
    let scene = SceneNode::new("PC").with_child(SceneNode::new("Screen"));
    let err = ScreenLocator::default()
        .locate(&scene, Mat4::IDENTITY)
        .unwrap_err();
    assert!(matches!(err, LocateError::MissingGeometry { .. }));
}

#[test]
fn flat_line_is_degenerate() {
    let scene = pc_asset(Vec3::new(0.4, 0.0, 0.0), Vec3::ZERO);
    let err = ScreenLocator::default()
        .locate(&scene, Mat4::IDENTITY)
        .unwrap_err();
    assert!(matches!(err, LocateError::DegenerateBounds { .. }));
}

#[test]
fn singular_ancestor_is_rejected() {
    let scene = pc_asset(Vec3::new(0.4, 0.3, 0.02), Vec3::ZERO);
    let err = locate(
        &scene,
        "Screen",
        Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)),
        reference_viewpoint_vec3(),
    )
    .unwrap_err();
    assert_eq!(err, LocateError::SingularAncestor);
}

#[test]
fn custom_mesh_name() {
    let scene = SceneNode::new("PC").with_child(
        SceneNode::new("Monitor_Glass")
            .with_geometry(Geometry::cuboid(Vec3::ZERO, Vec3::new(0.6, 0.45, 0.01))),
    );
    let locator = ScreenLocator::new("Monitor_Glass", reference_viewpoint_vec3());
    let anchor = locator.locate(&scene, Mat4::IDENTITY).unwrap();
    assert!((anchor.aspect() - 0.6 / 0.45).abs() < 1e-4);
}
