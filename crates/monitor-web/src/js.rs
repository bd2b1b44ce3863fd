//! Conversions between glam/core types and plain JS values.

use glam::{Mat4, Quat, Vec3};
use js_sys::{Float32Array, Object, Reflect};
use monitor_core::anchor::ScreenAnchor;
use monitor_core::camera::CameraShot;
use monitor_core::fitter::{PanelFit, PanelPlacement};
use wasm_bindgen::JsValue;

pub fn vec3_or(values: &[f32], fallback: Vec3) -> Vec3 {
    match values {
        [x, y, z, ..] => Vec3::new(*x, *y, *z),
        _ => fallback,
    }
}

/// `[x, y, z, w]`, normalized; anything unusable maps to identity.
pub fn quat_or_identity(values: &[f32]) -> Quat {
    match values {
        [x, y, z, w, ..] => {
            let q = Quat::from_xyzw(*x, *y, *z, *w);
            if q.length_squared() > f32::EPSILON && q.is_finite() {
                q.normalize()
            } else {
                Quat::IDENTITY
            }
        }
        _ => Quat::IDENTITY,
    }
}

/// Column-major 4x4, the layout `Matrix4.elements` uses.
pub fn mat4(values: &[f32]) -> Result<Mat4, JsValue> {
    if values.len() != 16 {
        return Err(JsValue::from_str("expected 16 matrix elements"));
    }
    Ok(Mat4::from_cols_slice(values))
}

fn array(values: &[f32]) -> JsValue {
    Float32Array::from(values).into()
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

pub fn anchor_object(
    anchor: &ScreenAnchor,
    fit: &PanelFit,
    placement: Option<&PanelPlacement>,
    close_up: Option<CameraShot>,
) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "worldCenter", &array(&anchor.world_center.to_array()))?;
    set(&obj, "worldNormal", &array(&anchor.world_normal.to_array()))?;
    set(&obj, "width", &anchor.world_width.into())?;
    set(&obj, "height", &anchor.world_height.into())?;
    set(&obj, "localCenter", &array(&anchor.local_center.to_array()))?;
    set(&obj, "localEuler", &array(&anchor.local_euler.to_array()))?;
    set(&obj, "localWidth", &anchor.local_width.into())?;
    set(&obj, "localHeight", &anchor.local_height.into())?;
    set(&obj, "pixelWidth", &fit.pixel_width.into())?;
    set(&obj, "pixelHeight", &fit.pixel_height.into())?;
    if let Some(p) = placement {
        set(&obj, "panelOffset", &array(&p.panel_offset.to_array()))?;
        set(&obj, "panelScale", &p.panel_scale.into())?;
        set(&obj, "coverOffset", &array(&p.cover_offset.to_array()))?;
        set(&obj, "coverSize", &array(&p.cover_size.to_array()))?;
    }
    if let Some(shot) = close_up {
        set(&obj, "closeUpPosition", &array(&shot.position.to_array()))?;
        set(&obj, "closeUpLookAt", &array(&shot.look_at.to_array()))?;
    }
    Ok(obj.into())
}
