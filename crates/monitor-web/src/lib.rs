#![cfg(target_arch = "wasm32")]
use instant::Instant;
use monitor_core::constants::CLOSE_SHOT_KEY;
use monitor_core::glitch::GlitchConfig;
use monitor_core::monitor::{Monitor, MonitorConfig, TerminalApi};
use monitor_core::scene::{Geometry, SceneBuilder, SceneNode, Transform};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod constants;
mod dom;
mod frame;
mod js;
mod overlay;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("monitor-web starting");
    Ok(())
}

/// One interactive PC monitor, driven by the host page's 3D scene.
#[wasm_bindgen]
pub struct MonitorHandle {
    monitor: Rc<RefCell<Monitor>>,
    scene: SceneBuilder,
    pc_active: Rc<Cell<bool>>,
    alive: Rc<Cell<bool>>,
    on_frame: Rc<RefCell<Option<js_sys::Function>>>,
    on_anchor: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl MonitorHandle {
    /// `seed` makes glitch timing reproducible; omit it for entropy.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> MonitorHandle {
        let config = MonitorConfig {
            glitches: GlitchConfig {
                seed: seed.map(|s| s as u64),
                ..GlitchConfig::default()
            },
            ..MonitorConfig::default()
        };
        let monitor = Rc::new(RefCell::new(Monitor::new(config)));
        let overlay = match dom::window_document().map(|d| overlay::Overlay::new(&d)) {
            Some(Ok(o)) => Some(o),
            Some(Err(e)) => {
                log::warn!("[web] running without overlay: {e}");
                None
            }
            None => None,
        };

        let handle = MonitorHandle {
            monitor,
            scene: SceneBuilder::new(),
            pc_active: Rc::new(Cell::new(false)),
            alive: Rc::new(Cell::new(true)),
            on_frame: Rc::new(RefCell::new(None)),
            on_anchor: None,
        };
        let now = Instant::now();
        frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
            monitor: handle.monitor.clone(),
            overlay,
            pc_active: handle.pc_active.clone(),
            alive: handle.alive.clone(),
            on_frame: handle.on_frame.clone(),
            epoch: now,
            last_instant: now,
        })));
        handle
    }

    /// Forget any previously mirrored asset.
    pub fn begin_asset(&mut self) {
        self.scene.clear();
    }

    /// Mirror one asset node. `parent < 0` attaches at the asset root;
    /// rotation is an `[x, y, z, w]` quaternion.
    pub fn add_node(
        &mut self,
        parent: i32,
        name: &str,
        translation: &[f32],
        rotation: &[f32],
        scale: &[f32],
    ) -> u32 {
        let transform = Transform::from_translation(js::vec3_or(translation, glam::Vec3::ZERO))
            .with_rotation(js::quat_or_identity(rotation))
            .with_scale(js::vec3_or(scale, glam::Vec3::ONE));
        let parent = usize::try_from(parent).ok();
        self.scene
            .add(parent, SceneNode::new(name).with_transform(transform)) as u32
    }

    /// Flat `[x, y, z, ...]` vertex positions for a mirrored node.
    pub fn set_geometry(&mut self, node: u32, positions: &[f32]) -> bool {
        self.scene
            .set_geometry(node as usize, Geometry::from_flat(positions))
    }

    /// Locate the screen in the mirrored asset. `ancestor` is the world matrix
    /// of the group the asset was added to, column-major.
    ///
    /// Returns `null` when the asset has no usable screen; the previous
    /// placement stays in effect and `onAnchor` is not called. Only a
    /// malformed `ancestor` throws.
    pub fn locate_screen(&mut self, ancestor: &[f32]) -> Result<JsValue, JsValue> {
        let ancestor = js::mat4(ancestor)?;
        let scene = self.scene.build("asset");
        let mut monitor = self.monitor.borrow_mut();
        let anchor = match monitor.on_asset_loaded(&scene, ancestor) {
            Ok(anchor) => anchor,
            Err(e) => {
                log::debug!("[web] keeping previous screen placement: {e}");
                return Ok(JsValue::NULL);
            }
        };
        let value = js::anchor_object(
            &anchor,
            &monitor.panel_fit(),
            monitor.placement(),
            monitor.rig().shot(CLOSE_SHOT_KEY),
        )?;
        drop(monitor);
        if let Some(cb) = &self.on_anchor {
            cb.call1(&JsValue::NULL, &value)?;
        }
        Ok(value)
    }

    pub fn set_on_anchor(&mut self, callback: Option<js_sys::Function>) {
        self.on_anchor = callback;
    }

    /// Called every frame with a `Float32Array`:
    /// `[camX, camY, camZ, lookX, lookY, lookZ, coverOpacity, power, streak]`.
    pub fn set_on_frame(&mut self, callback: Option<js_sys::Function>) {
        *self.on_frame.borrow_mut() = callback;
    }

    pub fn set_pc_active(&mut self, active: bool) {
        self.pc_active.set(active);
    }

    pub fn accepts_click(&self) -> bool {
        Monitor::accepts_click(self.pc_active.get())
    }

    pub fn select_shot(&mut self, key: &str) -> bool {
        self.monitor.borrow_mut().select_shot(key)
    }

    pub fn panel_size(&self) -> Vec<u32> {
        let fit = self.monitor.borrow().panel_fit();
        vec![fit.pixel_width, fit.pixel_height]
    }

    pub fn degauss(&mut self) {
        TerminalApi::degauss(&mut *self.monitor.borrow_mut());
    }

    pub fn static_burst(&mut self, duration_ms: Option<f64>) {
        self.monitor.borrow_mut().static_burst(duration_ms);
    }

    pub fn set_stutter_strength(&mut self, strength: f32) {
        self.monitor.borrow_mut().set_stutter_strength(strength);
    }

    pub fn set_green_glitch_strength(&mut self, strength: f32) {
        self.monitor.borrow_mut().set_green_glitch_strength(strength);
    }

    /// Stop the frame loop and every pending glitch timer.
    pub fn dispose(&mut self) {
        if !self.alive.replace(false) {
            return;
        }
        self.monitor.borrow_mut().dispose();
        *self.on_frame.borrow_mut() = None;
        self.on_anchor = None;
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
