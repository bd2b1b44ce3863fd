//! Camera shots and the damped rig that flies between them.

use crate::anchor::ScreenAnchor;
use crate::constants::*;
use crate::damp::damp_vec3;
use fnv::FnvHashMap;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraShot {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraShot {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraRigConfig {
    pub fov_degrees: f32,
    /// Fraction of the frame height the screen should fill, in `(0, 1]`.
    pub fill_fraction: f32,
    pub lambda: f32,
    pub up_offset: f32,
    pub lateral_offset: f32,
    pub default_shot: String,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            fov_degrees: CAMERA_FOV_DEGREES,
            fill_fraction: CLOSE_SHOT_FILL,
            lambda: CAMERA_LAMBDA,
            up_offset: 0.0,
            lateral_offset: 0.0,
            default_shot: WIDE_SHOT_KEY.to_string(),
        }
    }
}

/// Fixed shots of the room.
pub fn named_shots() -> FnvHashMap<String, CameraShot> {
    let look_at = Vec3::from_array(ROOM_LOOK_AT);
    let mut shots = FnvHashMap::default();
    shots.insert(
        WIDE_SHOT_KEY.to_string(),
        CameraShot::new(reference_viewpoint_vec3(), look_at),
    );
    shots.insert(
        OVERVIEW_SHOT_KEY.to_string(),
        CameraShot::new(Vec3::from_array(OVERVIEW_POSITION), look_at),
    );
    shots
}

/// Close-up that fits the screen height into `fill_fraction` of the vertical FOV.
pub fn compute_close_shot(anchor: &ScreenAnchor, fov_degrees: f32, fill_fraction: f32) -> CameraShot {
    compute_close_shot_with_offsets(anchor, fov_degrees, fill_fraction, 0.0, 0.0)
}

pub fn compute_close_shot_with_offsets(
    anchor: &ScreenAnchor,
    fov_degrees: f32,
    fill_fraction: f32,
    up_offset: f32,
    lateral_offset: f32,
) -> CameraShot {
    let fill = fill_fraction.clamp(f32::EPSILON, 1.0);
    let half_fov = fov_degrees.to_radians() * 0.5;
    let distance = (anchor.world_height * 0.5) / half_fov.tan() / fill;

    let normal = anchor.world_normal;
    let mut right = Vec3::Y.cross(normal).normalize_or_zero();
    if right == Vec3::ZERO {
        right = Vec3::X;
    }
    let up = normal.cross(right).normalize_or_zero();

    CameraShot {
        position: anchor.world_center
            + normal * distance
            + up * up_offset
            + right * lateral_offset,
        look_at: anchor.world_center,
    }
}

pub struct CameraRig {
    config: CameraRigConfig,
    shots: FnvHashMap<String, CameraShot>,
    selected: String,
    position: Vec3,
    look_at: Vec3,
}

impl CameraRig {
    pub fn new(config: CameraRigConfig) -> Self {
        Self::with_shots(config, named_shots())
    }

    pub fn with_shots(config: CameraRigConfig, shots: FnvHashMap<String, CameraShot>) -> Self {
        let start = shots
            .get(&config.default_shot)
            .copied()
            .unwrap_or(CameraShot::new(Vec3::from_array(OVERVIEW_POSITION), Vec3::ZERO));
        Self {
            selected: config.default_shot.clone(),
            config,
            shots,
            position: start.position,
            look_at: start.look_at,
        }
    }

    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }

    pub fn set_shot(&mut self, key: impl Into<String>, shot: CameraShot) {
        self.shots.insert(key.into(), shot);
    }

    pub fn shot(&self, key: &str) -> Option<CameraShot> {
        self.shots.get(key).copied()
    }

    /// Install the computed close-up for `anchor` under the `pc` key.
    pub fn set_close_shot(&mut self, anchor: &ScreenAnchor) -> CameraShot {
        let c = &self.config;
        let shot = compute_close_shot_with_offsets(
            anchor,
            c.fov_degrees,
            c.fill_fraction,
            c.up_offset,
            c.lateral_offset,
        );
        self.set_shot(CLOSE_SHOT_KEY, shot);
        shot
    }

    /// Select a shot by key. Unknown keys select the default shot; returns
    /// whether `key` itself was known.
    pub fn select(&mut self, key: &str) -> bool {
        if self.shots.contains_key(key) {
            self.selected = key.to_string();
            true
        } else {
            log::debug!("[camera] unknown shot {:?}, using {:?}", key, self.config.default_shot);
            self.selected = self.config.default_shot.clone();
            false
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Shot the rig is currently heading for.
    pub fn target(&self) -> CameraShot {
        self.shots
            .get(&self.selected)
            .or_else(|| self.shots.get(&self.config.default_shot))
            .copied()
            .unwrap_or(CameraShot::new(self.position, self.look_at))
    }

    pub fn update(&mut self, dt_sec: f32) -> CameraShot {
        let target = self.target();
        self.position = damp_vec3(self.position, target.position, self.config.lambda, dt_sec);
        self.look_at = damp_vec3(self.look_at, target.look_at, self.config.lambda, dt_sec);
        self.pose()
    }

    pub fn pose(&self) -> CameraShot {
        CameraShot::new(self.position, self.look_at)
    }

    /// Jump straight to the selected shot without damping.
    pub fn snap(&mut self) {
        let t = self.target();
        self.position = t.position;
        self.look_at = t.look_at;
    }
}
