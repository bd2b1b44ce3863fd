use crate::anchor::ScreenAnchor;
use crate::constants::{
    BEZEL_MARGIN, COVER_Z_FRACTION, DEFAULT_PIXEL_HEIGHT, PANEL_LOCAL_Y_OFFSET,
    PANEL_WORLD_Z_OFFSET, TARGET_PIXEL_WIDTH, UI_SCALE,
};
use glam::{Quat, Vec2, Vec3};
use std::f32::consts::PI;

/// Pixel size and local scale for the 2D interface panel on the screen glass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelFit {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub uniform_scale: f32,
    pub z_offset: f32,
}

impl Default for PanelFit {
    // Geometry used before any anchor has been computed
    fn default() -> Self {
        Self {
            pixel_width: TARGET_PIXEL_WIDTH,
            pixel_height: DEFAULT_PIXEL_HEIGHT,
            uniform_scale: 1.0,
            z_offset: PANEL_WORLD_Z_OFFSET,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PanelFitter {
    pub target_pixel_width: u32,
    /// Fraction of the glass the panel may cover, in `(0, 1]`.
    pub bezel_margin: f32,
    pub world_z_offset: f32,
}

impl Default for PanelFitter {
    fn default() -> Self {
        Self {
            target_pixel_width: TARGET_PIXEL_WIDTH,
            bezel_margin: BEZEL_MARGIN,
            world_z_offset: PANEL_WORLD_Z_OFFSET,
        }
    }
}

impl PanelFitter {
    pub fn fit(&self, anchor: &ScreenAnchor) -> PanelFit {
        let mut out = fit(anchor, self.target_pixel_width, self.bezel_margin);
        out.z_offset = self.world_z_offset / anchor.ancestor_scale.max(f32::EPSILON);
        out
    }
}

/// Fit-to-contain: the scaled panel never exceeds the glass on either axis.
pub fn fit(anchor: &ScreenAnchor, target_pixel_width: u32, bezel_margin: f32) -> PanelFit {
    let margin = bezel_margin.clamp(f32::EPSILON, 1.0);
    let pixel_width = target_pixel_width.max(1);
    let w = pixel_width as f32;
    let pixel_height = ((w / anchor.aspect()).round() as u32).max(1);
    let h = pixel_height as f32;

    let scale_w = anchor.local_width * margin / w;
    let scale_h = anchor.local_height * margin / h;

    PanelFit {
        pixel_width,
        pixel_height,
        uniform_scale: scale_w.min(scale_h),
        z_offset: PANEL_WORLD_Z_OFFSET / anchor.ancestor_scale.max(f32::EPSILON),
    }
}

/// Transforms for the panel group, the panel itself and the black cover behind it,
/// all in the ancestor group's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelPlacement {
    pub group_position: Vec3,
    pub group_rotation: Quat,
    pub panel_offset: Vec3,
    pub panel_rotation: Quat,
    pub panel_scale: f32,
    pub cover_offset: Vec3,
    pub cover_size: Vec2,
}

pub fn placement(anchor: &ScreenAnchor, fit: &PanelFit, ui_scale: f32) -> PanelPlacement {
    PanelPlacement {
        group_position: anchor.local_center,
        group_rotation: anchor.local_rotation,
        panel_offset: Vec3::new(0.0, PANEL_LOCAL_Y_OFFSET, fit.z_offset),
        // panel content is authored facing -Z
        panel_rotation: Quat::from_rotation_y(PI),
        panel_scale: fit.uniform_scale * ui_scale,
        cover_offset: Vec3::new(0.0, 0.0, fit.z_offset * COVER_Z_FRACTION),
        cover_size: Vec2::new(anchor.local_width, anchor.local_height),
    }
}

pub fn default_placement(anchor: &ScreenAnchor) -> PanelPlacement {
    let fit = PanelFitter::default().fit(anchor);
    placement(anchor, &fit, UI_SCALE)
}
