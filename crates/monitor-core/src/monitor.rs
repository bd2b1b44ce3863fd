//! The interactive PC monitor: one instance per monitor in the room.
//!
//! Owns the screen anchor, power model, glitch timers, effect tuning and
//! camera rig, and turns them into one [`MonitorFrame`] per rendered frame.

use crate::anchor::{LocateError, ScreenAnchor, ScreenLocator};
use crate::camera::{CameraRig, CameraRigConfig, CameraShot};
use crate::compositor::{self, CompositorInput, CrtFrame, Tuning};
use crate::constants::*;
use crate::fitter::{placement, PanelFit, PanelFitter, PanelPlacement};
use crate::glitch::{GlitchChange, GlitchConfig, GlitchScheduler};
use crate::power::{PowerConfig, PowerEdge, PowerState, PowerStateMachine};
use crate::scene::SceneNode;
use glam::{Mat4, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    pub screen_mesh_name: String,
    pub reference_viewpoint: Vec3,
    pub ui_scale: f32,
    pub bezel_margin: f32,
    pub target_pixel_width: u32,
    pub power: PowerConfig,
    pub glitches: GlitchConfig,
    pub camera: CameraRigConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            screen_mesh_name: SCREEN_MESH_NAME.to_string(),
            reference_viewpoint: reference_viewpoint_vec3(),
            ui_scale: UI_SCALE,
            bezel_margin: BEZEL_MARGIN,
            target_pixel_width: TARGET_PIXEL_WIDTH,
            power: PowerConfig::default(),
            glitches: GlitchConfig::default(),
            camera: CameraRigConfig::default(),
        }
    }
}

/// Effects the terminal program may trigger by name.
pub trait TerminalApi {
    fn degauss(&mut self);
    fn static_burst(&mut self, duration_ms: Option<f64>);
    fn set_stutter_strength(&mut self, strength: f32);
    fn set_green_glitch_strength(&mut self, strength: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorFrame {
    pub crt: CrtFrame,
    pub power: PowerState,
    pub power_edge: Option<PowerEdge>,
    pub camera: CameraShot,
}

pub struct Monitor {
    config: MonitorConfig,
    locator: ScreenLocator,
    fitter: PanelFitter,
    power: PowerStateMachine,
    glitches: GlitchScheduler,
    tuning: Tuning,
    rig: CameraRig,
    anchor: Option<ScreenAnchor>,
    fit: PanelFit,
    placement: Option<PanelPlacement>,
    locate_failures: u32,
    locate_warnings: u32,
    now_ms: f64,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        let locator = ScreenLocator::new(config.screen_mesh_name.clone(), config.reference_viewpoint);
        let fitter = PanelFitter {
            target_pixel_width: config.target_pixel_width,
            bezel_margin: config.bezel_margin,
            ..PanelFitter::default()
        };
        Self {
            locator,
            fitter,
            power: PowerStateMachine::new(config.power),
            glitches: GlitchScheduler::new(config.glitches.clone()),
            tuning: Tuning::default(),
            rig: CameraRig::new(config.camera.clone()),
            anchor: None,
            fit: PanelFit::default(),
            placement: None,
            locate_failures: 0,
            locate_warnings: 0,
            now_ms: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Locate the screen in a freshly loaded asset. On failure the previous
    /// geometry is kept and the problem is logged once per monitor.
    pub fn on_asset_loaded(
        &mut self,
        scene: &SceneNode,
        ancestor: Mat4,
    ) -> Result<ScreenAnchor, LocateError> {
        match self.locator.locate(scene, ancestor) {
            Ok(anchor) => {
                self.apply_anchor(anchor);
                Ok(anchor)
            }
            Err(e) => {
                self.locate_failures += 1;
                if self.locate_warnings == 0 {
                    self.locate_warnings = 1;
                    log::warn!("[monitor] screen anchor unavailable: {e}");
                } else {
                    log::debug!("[monitor] screen anchor still unavailable: {e}");
                }
                Err(e)
            }
        }
    }

    /// Failed `on_asset_loaded` calls so far.
    pub fn locate_failures(&self) -> u32 {
        self.locate_failures
    }

    /// Warnings logged for those failures; never more than one.
    pub fn locate_warnings(&self) -> u32 {
        self.locate_warnings
    }

    fn apply_anchor(&mut self, anchor: ScreenAnchor) {
        self.fit = self.fitter.fit(&anchor);
        self.placement = Some(placement(&anchor, &self.fit, self.config.ui_scale));
        let shot = self.rig.set_close_shot(&anchor);
        self.anchor = Some(anchor);
        log::info!(
            "[monitor] anchor {:.3}x{:.3} at ({:.2},{:.2},{:.2}) panel {}x{} close-up ({:.2},{:.2},{:.2})",
            anchor.world_width,
            anchor.world_height,
            anchor.world_center.x,
            anchor.world_center.y,
            anchor.world_center.z,
            self.fit.pixel_width,
            self.fit.pixel_height,
            shot.position.x,
            shot.position.y,
            shot.position.z
        );
    }

    /// Advance one rendered frame.
    pub fn frame(&mut self, now_ms: f64, dt_sec: f32, pc_active: bool) -> MonitorFrame {
        self.now_ms = now_ms;
        self.glitches.start(now_ms);

        let power_edge = self.power.update(pc_active, now_ms, dt_sec);
        if power_edge == Some(PowerEdge::On) {
            self.glitches.degauss(now_ms);
        }
        let power = self.power.state();

        for change in self.glitches.poll(now_ms, power.power) {
            match change {
                GlitchChange::Started(ev) => log::debug!("[glitch] start {:?}", ev),
                GlitchChange::Ended(kind) => log::debug!("[glitch] end {:?}", kind),
                GlitchChange::GateMissed(kind) => log::trace!("[glitch] gated {:?}", kind),
            }
        }

        let camera = self.rig.update(dt_sec);
        let active = self.glitches.active_glitches();
        let crt = compositor::render(&CompositorInput {
            power: power.power,
            shutter: power.shutter,
            streak: power.streak,
            cover_opacity: power.cover_opacity,
            glitches: &active,
            tuning: self.tuning,
            now_ms,
            pixel_width: self.fit.pixel_width,
            pixel_height: self.fit.pixel_height,
        });

        MonitorFrame {
            crt,
            power,
            power_edge,
            camera,
        }
    }

    /// Clicks on the PC model only count while it is not already focused.
    pub fn accepts_click(pc_active: bool) -> bool {
        !pc_active
    }

    pub fn select_shot(&mut self, key: &str) -> bool {
        self.rig.select(key)
    }

    pub fn anchor(&self) -> Option<&ScreenAnchor> {
        self.anchor.as_ref()
    }

    pub fn panel_fit(&self) -> PanelFit {
        self.fit
    }

    pub fn placement(&self) -> Option<&PanelPlacement> {
        self.placement.as_ref()
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn power(&self) -> PowerState {
        self.power.state()
    }

    pub fn glitches(&self) -> &GlitchScheduler {
        &self.glitches
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    /// Tear down every pending timer; the monitor stops glitching for good.
    pub fn dispose(&mut self) {
        self.glitches.dispose();
        log::info!("[monitor] disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.glitches.is_disposed()
    }
}

impl TerminalApi for Monitor {
    fn degauss(&mut self) {
        self.glitches.degauss(self.now_ms);
    }

    fn static_burst(&mut self, duration_ms: Option<f64>) {
        self.glitches.static_burst(self.now_ms, duration_ms);
    }

    fn set_stutter_strength(&mut self, strength: f32) {
        self.tuning.set_stutter_strength(strength);
    }

    fn set_green_glitch_strength(&mut self, strength: f32) {
        self.tuning.set_green_strength(strength);
    }
}
